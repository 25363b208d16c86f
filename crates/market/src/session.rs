//! Session manager.
//!
//! Holds the in-memory view of who is signed in, wraps the auth operations so
//! that every change is broadcast to subscribers, and answers ownership
//! questions for the presentation layer.
//!
//! Several managers may share one store (one per open window, for example).
//! A manager only learns about another's changes through
//! [`SessionManager::handle_storage_event`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use secondhand_core::UserId;

use crate::models::session::AuthSession;
use crate::models::user::ProfileUpdate;
use crate::services::auth::{AuthError, AuthService, AuthSettings};
use crate::store::{Storage, StorageEvent, keys};

/// Callback invoked with the session after every change.
pub type SessionListener = Arc<dyn Fn(Option<&AuthSession>) + Send + Sync>;

/// Handle returned by [`SessionManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Cached session state with change notification.
pub struct SessionManager {
    storage: Storage,
    settings: AuthSettings,
    current: Mutex<Option<AuthSession>>,
    listeners: Mutex<Vec<(SubscriptionId, SessionListener)>>,
    next_subscription: AtomicU64,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("current", &self.current_user().map(|s| s.id))
            .field("listeners", &self.lock_listeners().len())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a manager and load any session already in `storage`.
    #[must_use]
    pub fn new(storage: Storage, settings: AuthSettings) -> Self {
        let manager = Self {
            storage,
            settings,
            current: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        };
        manager.sync_from_storage();
        manager
    }

    /// The auth service behind this manager.
    #[must_use]
    pub const fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.storage, &self.settings)
    }

    /// Sign in and notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on a bad email or password.
    pub fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let session = self.auth().login(email, password)?;
        self.replace_current(Some(session.clone()));
        self.notify();
        Ok(session)
    }

    /// Register, sign in, and notify subscribers.
    ///
    /// # Errors
    ///
    /// See [`AuthService::register`].
    pub fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let session = self.auth().register(email, username, password)?;
        self.replace_current(Some(session.clone()));
        self.notify();
        Ok(session)
    }

    /// Sign out. Subscribers are notified only if someone was signed in.
    pub fn logout(&self) {
        let auth = self.auth();
        let was_signed_in = self.replace_current(None).is_some() || auth.current_session().is_some();
        auth.logout();

        if was_signed_in {
            tracing::info!("User logged out");
            self.notify();
        }
    }

    /// The cached session.
    #[must_use]
    pub fn current_user(&self) -> Option<AuthSession> {
        self.lock_current().clone()
    }

    /// Whether a session is cached and its token is still stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some() && self.storage.contains(keys::AUTH_TOKEN)
    }

    /// Whether the signed-in user is `owner_id`.
    #[must_use]
    pub fn is_owner(&self, owner_id: &UserId) -> bool {
        self.lock_current()
            .as_ref()
            .is_some_and(|session| &session.id == owner_id)
    }

    /// The cached session, or an error when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` if there is no session.
    pub fn require_session(&self) -> Result<AuthSession, AuthError> {
        self.current_user().ok_or(AuthError::Unauthenticated)
    }

    /// Update the signed-in user's profile and notify subscribers.
    ///
    /// The cache is reloaded from storage afterwards, so a user switch made
    /// elsewhere wins over the edited account. Returns the edited account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` if nobody is signed in; otherwise
    /// see [`AuthService::update_profile`].
    pub fn update_profile(&self, update: ProfileUpdate) -> Result<AuthSession, AuthError> {
        let current = self.require_session()?;
        let session = self.auth().update_profile(&current.id, update)?;
        self.sync_from_storage();
        self.notify();
        Ok(session)
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` if nobody is signed in; otherwise
    /// see [`AuthService::change_password`].
    pub fn change_password(&self, current: &str, new: &str) -> Result<(), AuthError> {
        let session = self.require_session()?;
        self.auth().change_password(&session.id, current, new)
    }

    /// Register a listener. Listeners run in registration order, on the
    /// calling thread, after the change has been stored.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Option<&AuthSession>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// React to a change made through the shared store by someone else.
    ///
    /// Returns whether the event concerned the session.
    pub fn handle_storage_event(&self, event: &StorageEvent) -> bool {
        if !event.affects(keys::CURRENT_USER) && !event.affects(keys::AUTH_TOKEN) {
            return false;
        }
        tracing::debug!(key = ?event.key, "Session changed externally");
        self.refresh();
        true
    }

    /// Reload the session from storage and notify subscribers.
    pub fn refresh(&self) -> Option<AuthSession> {
        let session = self.sync_from_storage();
        self.notify();
        session
    }

    /// A session counts only while its token is also stored.
    fn sync_from_storage(&self) -> Option<AuthSession> {
        let auth = self.auth();
        let session = auth
            .current_session()
            .filter(|_| auth.session_token().is_some());
        self.replace_current(session.clone());
        session
    }

    fn replace_current(&self, session: Option<AuthSession>) -> Option<AuthSession> {
        std::mem::replace(&mut *self.lock_current(), session)
    }

    fn notify(&self) {
        // Snapshot so listeners can call back into the manager
        let listeners: Vec<SessionListener> = self
            .lock_listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        let session = self.current_user();
        for listener in listeners {
            listener(session.as_ref());
        }
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<AuthSession>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, SessionListener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::MarketConfig;

    fn settings() -> AuthSettings {
        AuthSettings::from_config(&MarketConfig::for_tests()).unwrap()
    }

    fn manager(storage: &Storage) -> SessionManager {
        SessionManager::new(storage.clone(), settings())
    }

    /// Records every notification as the username seen, or `None`.
    fn recorder(manager: &SessionManager) -> Arc<Mutex<Vec<Option<String>>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        manager.subscribe(move |session| {
            sink.lock()
                .unwrap()
                .push(session.map(|s| s.username.clone()));
        });
        seen
    }

    #[test]
    fn test_starts_signed_out() {
        let manager = manager(&Storage::in_memory());
        assert!(manager.current_user().is_none());
        assert!(!manager.is_authenticated());
        assert!(matches!(
            manager.require_session(),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn test_register_login_logout_notify() {
        let storage = Storage::in_memory();
        let manager = manager(&storage);
        let seen = recorder(&manager);

        manager
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();
        assert!(manager.is_authenticated());

        manager.logout();
        assert!(!manager.is_authenticated());

        manager.login("ann@example.com", "password123").unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("ann_sells".to_owned()), None, Some("ann_sells".to_owned())]
        );
    }

    #[test]
    fn test_failures_do_not_notify() {
        let manager = manager(&Storage::in_memory());
        let seen = recorder(&manager);

        assert!(manager.login("ghost@example.com", "password123").is_err());
        manager.logout();

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let manager = manager(&Storage::in_memory());
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let id = manager.subscribe(move |_| *sink.lock().unwrap() += 1);

        manager
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();
        assert!(manager.unsubscribe(id));
        assert!(!manager.unsubscribe(id));
        manager.logout();

        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn test_listeners_run_in_order() {
        let manager = manager(&Storage::in_memory());
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let sink = Arc::clone(&order);
            manager.subscribe(move |_| sink.lock().unwrap().push(n));
        }

        manager
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_listener_can_call_back() {
        let manager = Arc::new(manager(&Storage::in_memory()));
        let observed = Arc::new(Mutex::new(None));

        let inner = Arc::clone(&manager);
        let sink = Arc::clone(&observed);
        manager.subscribe(move |_| {
            *sink.lock().unwrap() = Some(inner.is_authenticated());
        });

        manager
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();
        assert_eq!(*observed.lock().unwrap(), Some(true));
    }

    #[test]
    fn test_ownership() {
        let manager = manager(&Storage::in_memory());
        let session = manager
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();

        assert!(manager.is_owner(&session.id));
        assert!(!manager.is_owner(&UserId::new("someone-else")));

        manager.logout();
        assert!(!manager.is_owner(&session.id));
    }

    #[test]
    fn test_update_profile_requires_session() {
        let manager = manager(&Storage::in_memory());
        let err = manager.update_profile(ProfileUpdate::default()).unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[test]
    fn test_update_profile_refreshes_cache() {
        let manager = manager(&Storage::in_memory());
        let seen = recorder(&manager);
        manager
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();

        manager
            .update_profile(ProfileUpdate {
                username: Some("ann_renamed".to_owned()),
                ..ProfileUpdate::default()
            })
            .unwrap();

        assert_eq!(manager.current_user().unwrap().username, "ann_renamed");
        assert_eq!(
            seen.lock().unwrap().last().cloned().flatten().as_deref(),
            Some("ann_renamed")
        );
    }

    #[test]
    fn test_update_profile_after_switch_elsewhere() {
        let storage = Storage::in_memory();
        let window_a = manager(&storage);
        let window_b = manager(&storage);
        window_a
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();
        window_b
            .register("bob@example.com", "bob_sells", "password123")
            .unwrap();

        // Window A has not seen the switch to bob yet
        let edited = window_a
            .update_profile(ProfileUpdate {
                bio: Some("Vintage lamps".to_owned()),
                ..ProfileUpdate::default()
            })
            .unwrap();
        assert_eq!(edited.username, "ann_sells");
        assert_eq!(edited.bio.as_deref(), Some("Vintage lamps"));

        let cached = window_a.current_user().unwrap();
        assert_eq!(cached.username, "bob_sells");
        assert_eq!(Some(cached), window_a.auth().current_session());
    }

    #[test]
    fn test_change_password() {
        let manager = manager(&Storage::in_memory());
        manager
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();
        manager.change_password("password123", "new password").unwrap();
        manager.logout();

        assert!(manager.login("ann@example.com", "password123").is_err());
        assert!(manager.login("ann@example.com", "new password").is_ok());
    }

    #[test]
    fn test_resumes_session_from_storage() {
        let storage = Storage::in_memory();
        let first = manager(&storage);
        let session = first
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();

        let second = manager(&storage);
        assert_eq!(second.current_user(), Some(session));
        assert!(second.is_authenticated());
    }

    #[test]
    fn test_external_changes() {
        let storage = Storage::in_memory();
        let window_a = manager(&storage);
        let window_b = manager(&storage);
        let seen = recorder(&window_b);

        window_a
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();
        assert!(window_b.current_user().is_none());

        assert!(window_b.handle_storage_event(&StorageEvent::changed(keys::CURRENT_USER)));
        assert_eq!(window_b.current_user().unwrap().username, "ann_sells");

        window_a.logout();
        assert!(window_b.handle_storage_event(&StorageEvent::changed(keys::AUTH_TOKEN)));
        assert!(window_b.current_user().is_none());

        assert!(!window_b.handle_storage_event(&StorageEvent::changed(keys::PRODUCTS)));
        assert!(window_b.handle_storage_event(&StorageEvent::cleared()));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("ann_sells".to_owned()), None, None]
        );
    }

    #[test]
    fn test_projection_without_token_is_not_a_session() {
        let storage = Storage::in_memory();
        manager(&storage)
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();
        storage.remove(keys::AUTH_TOKEN);

        let manager = manager(&storage);
        assert!(manager.current_user().is_none());
    }
}

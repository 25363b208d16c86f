//! Marketplace state shared by front ends.

use std::sync::Arc;

use crate::config::{ConfigError, MarketConfig};
use crate::services::auth::AuthSettings;
use crate::services::{AuthService, CartService, ProductService, PurchaseService};
use crate::session::SessionManager;
use crate::store::{FileStore, Storage, StoreError};

/// Error opening a marketplace.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// The marketplace: configuration, storage, and the session manager.
///
/// This struct is cheaply cloneable via `Arc`. Entity services borrow its
/// storage and are created per call.
#[derive(Clone, Debug)]
pub struct Marketplace {
    inner: Arc<MarketplaceInner>,
}

#[derive(Debug)]
struct MarketplaceInner {
    config: MarketConfig,
    storage: Storage,
    session: SessionManager,
}

impl Marketplace {
    /// Open a marketplace stored in `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the hashing parameters are invalid or the data
    /// directory cannot be created.
    pub fn open(config: MarketConfig) -> Result<Self, StartupError> {
        let store = FileStore::open(&config.data_dir)?;
        Self::with_storage(config, Storage::new(store))
    }

    /// A marketplace that forgets everything when dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the hashing parameters are invalid.
    pub fn in_memory(config: MarketConfig) -> Result<Self, StartupError> {
        Self::with_storage(config, Storage::in_memory())
    }

    /// A marketplace over an existing storage handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the hashing parameters are invalid.
    pub fn with_storage(config: MarketConfig, storage: Storage) -> Result<Self, StartupError> {
        let settings = AuthSettings::from_config(&config)?;
        let session = SessionManager::new(storage.clone(), settings);

        tracing::debug!(attached = storage.is_attached(), "Marketplace ready");

        Ok(Self {
            inner: Arc::new(MarketplaceInner {
                config,
                storage,
                session,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &MarketConfig {
        &self.inner.config
    }

    /// Get a reference to the storage handle.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    /// Get a reference to the session manager.
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    /// Auth operations without session notifications.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        self.inner.session.auth()
    }

    /// Product listing service.
    #[must_use]
    pub fn products(&self) -> ProductService<'_> {
        ProductService::new(&self.inner.storage)
    }

    /// Cart service.
    #[must_use]
    pub fn cart(&self) -> CartService<'_> {
        CartService::new(&self.inner.storage)
    }

    /// Purchase service.
    #[must_use]
    pub fn purchases(&self) -> PurchaseService<'_> {
        PurchaseService::new(&self.inner.storage)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::HashingConfig;

    #[test]
    fn test_invalid_hashing_rejected() {
        let config = MarketConfig {
            hashing: HashingConfig {
                memory_kib: 1,
                iterations: 0,
                parallelism: 1,
            },
            ..MarketConfig::for_tests()
        };
        assert!(matches!(
            Marketplace::in_memory(config),
            Err(StartupError::Config(_))
        ));
    }

    #[test]
    fn test_open_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let config = MarketConfig {
            data_dir: dir.path().join("market"),
            ..MarketConfig::for_tests()
        };

        let first = Marketplace::open(config.clone()).unwrap();
        let session = first
            .session()
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();

        let second = Marketplace::open(config).unwrap();
        assert_eq!(second.session().current_user(), Some(session));
    }

    #[test]
    fn test_clones_share_state() {
        let market = Marketplace::in_memory(MarketConfig::for_tests()).unwrap();
        let clone = market.clone();
        market
            .session()
            .register("ann@example.com", "ann_sells", "password123")
            .unwrap();
        assert!(clone.session().is_authenticated());
    }
}

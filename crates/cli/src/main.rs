//! Secondhand Market CLI - drive the marketplace data layer from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Load the demo catalogue into an empty store
//! sh-market seed
//!
//! # Create an account (signs in)
//! sh-market register -e ann@example.com -u ann_sells -p 'correct horse'
//!
//! # Browse and search
//! sh-market products list
//! sh-market products search jacket --category fashion
//!
//! # Buy
//! sh-market cart add <product-id> -q 1
//! sh-market checkout
//! ```
//!
//! # Environment Variables
//!
//! - `MARKET_DATA_DIR` - Store directory (default: `.secondhand`)
//! - `MARKET_LOG_FORMAT` - Set to `json` for JSON log lines
//! - `RUST_LOG` - Log filter (default: `secondhand_market=info,secondhand_cli=info`)
//!
//! The signed-in session is kept in the store, so it carries over between
//! invocations until `sh-market logout`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use secondhand_core::{CartItemId, ProductCategory, ProductId};
use secondhand_market::{MarketConfig, Marketplace};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "sh-market")]
#[command(author, version, about = "Secondhand Market command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load demo users and listings into an empty store
    Seed {
        /// YAML catalogue to load instead of the built-in demo data
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Edit the signed-in user's profile
    Profile {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        username: Option<String>,
        /// New bio; pass an empty string to clear it
        #[arg(long)]
        bio: Option<String>,
        /// New avatar URL; pass an empty string to clear it
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Change the signed-in user's password
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
    /// Browse and manage listings
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage the signed-in user's cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Buy a single listing now
    Buy {
        product_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Buy everything in the cart
    Checkout,
    /// Show the signed-in user's purchases
    History,
    /// Show the signed-in user's sales
    Sales,
}

#[derive(Subcommand)]
enum ProductAction {
    /// Available listings, newest first
    List,
    /// Search available listings by text and category
    Search {
        #[arg(default_value = "")]
        text: String,
        /// Category slug (`electronics`, `home-garden`, ...)
        #[arg(short, long)]
        category: Option<ProductCategory>,
    },
    /// Show one listing
    Show { product_id: String },
    /// The signed-in user's listings, sold ones included
    Mine,
    /// Post a listing
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Price in dollars, e.g. `45.00`
        #[arg(short, long)]
        price: String,
        #[arg(short, long, default_value = "other")]
        category: ProductCategory,
        #[arg(short, long)]
        image_url: String,
    },
    /// Edit one of the signed-in user's listings
    Update {
        product_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        category: Option<ProductCategory>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        available: Option<bool>,
    },
    /// Delete one of the signed-in user's listings
    Delete { product_id: String },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    List,
    /// Add a listing to the cart
    Add {
        product_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Change a cart row's quantity; 0 removes it
    Set { item_id: String, quantity: u32 },
    /// Remove a cart row
    Remove { item_id: String },
    /// Empty the cart
    Clear,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Log to stderr so command output stays clean.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "secondhand_market=info,secondhand_cli=info".into());

    let json = std::env::var("MARKET_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = MarketConfig::from_env()?;
    let market = Marketplace::open(config)?;

    match cli.command {
        Commands::Seed { file } => commands::seed::run(&market, file.as_deref())?,
        Commands::Register {
            email,
            username,
            password,
        } => commands::account::register(
            &market,
            &email,
            &username,
            &SecretString::from(password),
        )?,
        Commands::Login { email, password } => {
            commands::account::login(&market, &email, &SecretString::from(password))?;
        }
        Commands::Logout => commands::account::logout(&market),
        Commands::Whoami => commands::account::whoami(&market),
        Commands::Profile {
            email,
            username,
            bio,
            avatar,
        } => commands::account::update_profile(&market, email, username, bio, avatar)?,
        Commands::Password { current, new } => {
            commands::account::change_password(
                &market,
                &SecretString::from(current),
                &SecretString::from(new),
            )?;
        }
        Commands::Products { action } => match action {
            ProductAction::List => commands::products::list(&market),
            ProductAction::Search { text, category } => {
                commands::products::search(&market, &text, category);
            }
            ProductAction::Show { product_id } => {
                commands::products::show(&market, &ProductId::new(product_id))?;
            }
            ProductAction::Mine => commands::products::mine(&market)?,
            ProductAction::Create {
                title,
                description,
                price,
                category,
                image_url,
            } => commands::products::create(
                &market,
                commands::products::Draft {
                    title,
                    description,
                    price,
                    category,
                    image_url,
                },
            )?,
            ProductAction::Update {
                product_id,
                title,
                description,
                price,
                category,
                image_url,
                available,
            } => commands::products::update(
                &market,
                &ProductId::new(product_id),
                commands::products::Edit {
                    title,
                    description,
                    price,
                    category,
                    image_url,
                    available,
                },
            )?,
            ProductAction::Delete { product_id } => {
                commands::products::delete(&market, &ProductId::new(product_id))?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&market)?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&market, &ProductId::new(product_id), quantity)?,
            CartAction::Set { item_id, quantity } => {
                commands::cart::set(&market, &CartItemId::new(item_id), quantity)?;
            }
            CartAction::Remove { item_id } => {
                commands::cart::remove(&market, &CartItemId::new(item_id))?;
            }
            CartAction::Clear => commands::cart::clear(&market)?,
        },
        Commands::Buy {
            product_id,
            quantity,
        } => commands::orders::buy(&market, &ProductId::new(product_id), quantity)?,
        Commands::Checkout => commands::orders::checkout(&market)?,
        Commands::History => commands::orders::history(&market)?,
        Commands::Sales => commands::orders::sales(&market)?,
    }
    Ok(())
}

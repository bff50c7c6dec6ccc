//! Ecru CLI - Storefront and admin console over the REST record store.
//!
//! # Usage
//!
//! ```bash
//! # Shopper flow
//! ecru shop signup -n "Ada Lovelace" -e ada@example.com -p secret
//! ecru shop login -e ada@example.com -p secret
//! ecru shop products --category Tops --sort price-asc
//! ecru shop cart add p-123
//! ecru shop checkout --first-name Ada --last-name Lovelace \
//!     --address "12 Analytical Row" --city London --zip "E1 6AN" \
//!     --country UK --card-number 4242424242424242 --expiry 12/30 \
//!     --cvv 123 --email ada@example.com
//!
//! # Admin console (requires an admin login)
//! ecru admin orders --status Processing
//! ecru admin set-status o-456 Shipped
//! ecru admin dashboard
//!
//! # Seed demo data
//! ecru seed
//! ```
//!
//! # Environment Variables
//!
//! - `ECRU_API_URL` - Base URL of the record store (required)
//! - `ECRU_SESSION_FILE` - Session token path (default `.ecru-session.json`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};

use ecru_core::{Category, OrderStatus};

mod commands;

#[derive(Parser)]
#[command(name = "ecru")]
#[command(author, version, about = "Ecru storefront and admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shopper-facing storefront
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
    /// Admin console (requires an admin login)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the store with demo products and an admin account
    Seed,
}

#[derive(Subcommand)]
enum ShopAction {
    /// Create an account and log in
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log in and persist the session
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log out and discard the persisted session
    Logout,
    /// Browse the catalog
    Products {
        /// Substring to match against product names
        #[arg(long)]
        search: Option<String>,

        /// Restrict to one category
        #[arg(long)]
        category: Option<Category>,

        /// Price ordering
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Wishlist operations
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Place an order from the current cart
    Checkout(commands::shop::CheckoutArgs),
    /// List your past orders
    Orders,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and the running total
    Show,
    /// Add a product (no-op if already in the cart)
    Add {
        product_id: String,

        /// Size variant
        #[arg(long)]
        size: Option<String>,
    },
    /// Remove a line outright
    Remove { product_id: String },
    /// Increase a line's quantity by one
    Inc { product_id: String },
    /// Decrease a line's quantity by one (floors at 1 unless --remove-on-zero)
    Dec {
        product_id: String,

        /// Drop the line instead of flooring at quantity 1
        #[arg(long)]
        remove_on_zero: bool,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show wishlist entries
    Show,
    /// Add a product (no-op if already saved)
    Add { product_id: String },
    /// Remove a product
    Remove { product_id: String },
    /// Move a product into the cart
    Move { product_id: String },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List every order across every account
    Orders {
        /// Keep only orders in this status
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Set one order's status
    SetStatus {
        order_id: String,
        status: OrderStatus,
    },
    /// List every account
    Users,
    /// Toggle an account's block flag
    Block { user_id: String },
    /// Delete an account outright
    DeleteUser { user_id: String },
    /// List the whole catalog, hidden products included
    Products,
    /// Catalog management
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Print a dashboard snapshot (or keep refreshing with --watch)
    Dashboard {
        /// Keep polling instead of printing once
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Create a product
    Add(commands::admin::ProductArgs),
    /// Replace a product's fields
    Update {
        product_id: String,

        #[command(flatten)]
        fields: commands::admin::ProductArgs,
    },
    /// Hide a product from browsing
    Hide { product_id: String },
    /// Make a product browsable again
    Show { product_id: String },
    /// Delete a product outright
    Delete { product_id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may be set directly.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::load()?;

    match cli.command {
        Commands::Shop { action } => match action {
            ShopAction::Signup {
                name,
                email,
                password,
            } => commands::shop::signup(&ctx, &name, &email, password).await?,
            ShopAction::Login { email, password } => {
                commands::shop::login(&ctx, &email, password).await?;
            }
            ShopAction::Logout => commands::shop::logout(&ctx).await?,
            ShopAction::Products {
                search,
                category,
                sort,
            } => {
                let sort = match sort {
                    Some(SortArg::PriceAsc) => ecru_storefront::SortOrder::PriceLowToHigh,
                    Some(SortArg::PriceDesc) => ecru_storefront::SortOrder::PriceHighToLow,
                    None => ecru_storefront::SortOrder::Unsorted,
                };
                commands::shop::products(&ctx, search, category, sort).await?;
            }
            ShopAction::Cart { action } => match action {
                CartAction::Show => commands::shop::cart_show(&ctx).await?,
                CartAction::Add { product_id, size } => {
                    commands::shop::cart_add(&ctx, &product_id, size).await?;
                }
                CartAction::Remove { product_id } => {
                    commands::shop::cart_remove(&ctx, &product_id).await?;
                }
                CartAction::Inc { product_id } => {
                    commands::shop::cart_inc(&ctx, &product_id).await?;
                }
                CartAction::Dec {
                    product_id,
                    remove_on_zero,
                } => commands::shop::cart_dec(&ctx, &product_id, remove_on_zero).await?,
                CartAction::Clear => commands::shop::cart_clear(&ctx).await?,
            },
            ShopAction::Wishlist { action } => match action {
                WishlistAction::Show => commands::shop::wishlist_show(&ctx).await?,
                WishlistAction::Add { product_id } => {
                    commands::shop::wishlist_add(&ctx, &product_id).await?;
                }
                WishlistAction::Remove { product_id } => {
                    commands::shop::wishlist_remove(&ctx, &product_id).await?;
                }
                WishlistAction::Move { product_id } => {
                    commands::shop::wishlist_move(&ctx, &product_id).await?;
                }
            },
            ShopAction::Checkout(args) => commands::shop::checkout(&ctx, args).await?,
            ShopAction::Orders => commands::shop::orders(&ctx).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Orders { status } => commands::admin::orders(&ctx, status).await?,
            AdminAction::SetStatus { order_id, status } => {
                commands::admin::set_status(&ctx, &order_id, status).await?;
            }
            AdminAction::Users => commands::admin::users(&ctx).await?,
            AdminAction::Block { user_id } => commands::admin::block(&ctx, &user_id).await?,
            AdminAction::DeleteUser { user_id } => {
                commands::admin::delete_user(&ctx, &user_id).await?;
            }
            AdminAction::Products => commands::admin::products_list(&ctx).await?,
            AdminAction::Product { action } => match action {
                ProductAction::Add(args) => commands::admin::product_add(&ctx, args).await?,
                ProductAction::Update { product_id, fields } => {
                    commands::admin::product_update(&ctx, &product_id, fields).await?;
                }
                ProductAction::Hide { product_id } => {
                    commands::admin::product_set_active(&ctx, &product_id, false).await?;
                }
                ProductAction::Show { product_id } => {
                    commands::admin::product_set_active(&ctx, &product_id, true).await?;
                }
                ProductAction::Delete { product_id } => {
                    commands::admin::product_delete(&ctx, &product_id).await?;
                }
            },
            AdminAction::Dashboard { watch } => commands::admin::dashboard(&ctx, watch).await?,
        },
        Commands::Seed => commands::seed::run(&ctx).await?,
    }
    Ok(())
}

//! Zudio CLI - browse the catalog and manage the local cart and wishlist.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! zudio products --category electronics --max-price 50
//! zudio product 9
//! zudio categories
//! zudio search backpack
//!
//! # Cart
//! zudio cart add 9
//! zudio cart update 9 3
//! zudio cart show
//!
//! # Wishlist
//! zudio wishlist add 3
//! zudio wishlist move 3
//! ```
//!
//! Cart and wishlist are shared with the storefront server through the
//! data directory (`ZUDIO_DATA_DIR`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use zudio_core::ProductId;

mod commands;
mod view;

use commands::catalog::ListingArgs;
use commands::{CliError, Session};

#[derive(Parser)]
#[command(name = "zudio")]
#[command(author, version, about = "Zudio storefront in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, filtered and paginated
    Products {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Lowest price to show
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Highest price to show
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show one product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// List product categories
    Categories,
    /// Search product titles
    Search {
        /// Text to look for in titles
        query: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show {
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Add a product
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Set the quantity of a product
    Update {
        /// Product ID
        id: ProductId,
        /// New quantity; zero or less is ignored
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product
    Remove {
        /// Product ID
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show the wishlist
    Show,
    /// Save a product
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Move a product into the cart
    Move {
        /// Product ID
        id: ProductId,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the views
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let session = Session::open()?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Products {
            category,
            min_price,
            max_price,
            page,
        } => {
            let args = ListingArgs {
                category,
                min_price,
                max_price,
                page,
            };
            commands::catalog::products(&session, args, &mut out).await?;
        }
        Commands::Product { id } => commands::catalog::product(&session, id, &mut out).await?,
        Commands::Categories => commands::catalog::categories(&session, &mut out).await?,
        Commands::Search { query } => commands::catalog::search(&session, &query, &mut out).await?,
        Commands::Cart { action } => match action {
            CartAction::Show { page } => commands::cart::show(&session, page, &mut out)?,
            CartAction::Add { id } => commands::cart::add(&session, id, &mut out).await?,
            CartAction::Update { id, quantity } => {
                commands::cart::update(&session, id, quantity, &mut out)?;
            }
            CartAction::Remove { id } => commands::cart::remove(&session, id, &mut out)?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&session, &mut out)?,
            WishlistAction::Add { id } => commands::wishlist::add(&session, id, &mut out).await?,
            WishlistAction::Remove { id } => commands::wishlist::remove(&session, id, &mut out)?,
            WishlistAction::Move { id } => {
                commands::wishlist::move_to_cart(&session, id, &mut out)?;
            }
        },
    }

    out.flush()?;
    Ok(())
}

//! RocketShoes CLI - Manage the locally persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! cart-cli list
//!
//! # Add one unit of product 3
//! cart-cli add 3
//!
//! # Set product 3 to four units
//! cart-cli set 3 4
//!
//! # Remove product 3
//! cart-cli remove 3
//! ```
//!
//! The resulting cart is written to stdout as JSON. Logs go to stderr and
//! honor `RUST_LOG`. Configuration is read from the environment (see
//! `rocketshoes_cart::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_cart::ProductId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current cart
    List,
    /// Add one unit of a product
    Add {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product in the cart
    Set {
        /// Catalog product ID
        product_id: ProductId,

        /// New quantity (must be at least 1)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

fn init_tracing(json: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_cart=info,cart_cli=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.json_logs);

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let cart = commands::open_cart()?;

    let snapshot = match cli.command {
        Commands::List => cart.cart(),
        Commands::Add { product_id } => commands::cart::add(&cart, product_id).await?,
        Commands::Remove { product_id } => commands::cart::remove(&cart, product_id)?,
        Commands::Set { product_id, amount } => {
            commands::cart::set(&cart, product_id, amount).await?
        }
    };

    commands::cart::print(&snapshot)
}

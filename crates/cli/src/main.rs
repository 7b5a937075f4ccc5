//! Shopfront CLI - saved cart inspection and maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Print the saved cart
//! sf-cli cart show
//!
//! # Print it as JSON
//! sf-cli cart show --json
//!
//! # Delete the saved cart
//! sf-cli cart clear
//!
//! # Rewrite a legacy or repaired cart in the current format
//! sf-cli cart migrate
//! ```
//!
//! # Commands
//!
//! - `cart show` - Print saved lines and totals
//! - `cart clear` - Delete the saved cart
//! - `cart migrate` - Upgrade the saved cart to the current format
//!
//! `--dir` and `--key` default to `STOREFRONT_CART_DIR` and
//! `STOREFRONT_CART_KEY`, the same settings the storefront reads.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopfront_cart::{CartPersistence, FileStorage};
use shopfront_storefront::config::CartConfig;

mod commands;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "Shopfront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or maintain the saved cart
    Cart {
        /// Directory holding the saved cart (default: `STOREFRONT_CART_DIR`)
        #[arg(long, global = true)]
        dir: Option<PathBuf>,

        /// Storage key of the saved cart (default: `STOREFRONT_CART_KEY`)
        #[arg(long, global = true)]
        key: Option<String>,

        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the saved cart
    Show {
        /// Print the raw decoded lines as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the saved cart
    Clear,
    /// Rewrite the saved cart in the current format
    Migrate,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopfront_cli=info,shopfront_cart=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Cart { dir, key, action } => {
            let defaults = CartConfig::from_env()?;
            let dir = dir.unwrap_or(defaults.dir);
            let key = key.unwrap_or(defaults.key);
            let persistence = CartPersistence::new(FileStorage::new(dir), key);

            let mut stdout = std::io::stdout().lock();
            match action {
                CartAction::Show { json } => {
                    commands::cart::show(&persistence, json, &mut stdout)?;
                }
                CartAction::Clear => commands::cart::clear(&persistence, &mut stdout)?,
                CartAction::Migrate => commands::cart::migrate(&persistence, &mut stdout)?,
            }
        }
    }
    Ok(())
}

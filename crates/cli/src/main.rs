//! Bookstore CLI - Session store migrations and backend checks.
//!
//! # Usage
//!
//! ```bash
//! # Create the session table
//! bs-cli migrate
//!
//! # List the second catalog page as the storefront would show it
//! bs-cli catalog --page 2
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the `tower_sessions` schema and table
//! - `catalog` - Fetch books from the bookstore backend and log one page

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bs-cli")]
#[command(author, version, about = "Bookstore CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run session store migrations
    Migrate,
    /// Fetch the catalog from the bookstore backend
    Catalog {
        /// Backend base URL (falls back to `BOOKSTORE_API_URL`)
        #[arg(long)]
        api_url: Option<String>,

        /// 1-based catalog page to print
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Catalog { api_url, page } => {
            commands::catalog::list(api_url.as_deref(), page).await?;
        }
    }
    Ok(())
}

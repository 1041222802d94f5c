//! Furima CLI - drive the marketplace from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Create an account, then log in to obtain a bearer token
//! furima register -n alice -p secret
//! furima login -u 1 -p secret
//!
//! # List a new item (creates the category on demand)
//! furima list --name Chair --price 1000 --new-category Furniture \
//!     --description "A sturdy chair" --image ./chair.jpg
//!
//! # Buy an item, or redeem an in-person passcode
//! furima buy 42
//! furima redeem 42 --passcode "#VW-4869"
//! ```
//!
//! # Environment Variables
//!
//! - `FURIMA_API_URL` - Base URL of the marketplace API
//! - `FURIMA_USER_ID` / `FURIMA_TOKEN` - Credential for authenticated
//!   commands, as printed by `furima login`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "furima")]
#[command(author, version, about = "Furima marketplace CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log in and print the bearer credential
    Login {
        /// User id issued at registration
        #[arg(short, long)]
        user_id: i64,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Show all categories
    Categories,
    /// Show items currently on sale
    Browse,
    /// Search on-sale items by keyword
    Search {
        /// Keyword to match against item names
        keyword: String,
    },
    /// List a new item for sale, or update an existing one
    List(commands::listing::ListArgs),
    /// Retry the on-sale transition for an item that was saved but not listed
    Relist {
        /// Item id reported by a failed `list`
        item_id: i64,
    },
    /// Show an item's detail view
    Show {
        /// Item id
        item_id: i64,
    },
    /// Buy an item outright
    Buy {
        /// Item id
        item_id: i64,
    },
    /// Redeem an in-person passcode to finalize a purchase
    Redeem {
        /// Item id
        item_id: i64,

        /// Passcode handed over by the owner
        #[arg(short, long)]
        passcode: String,
    },
    /// Request a suggested description for a draft item
    Suggest {
        /// Item name
        #[arg(short, long)]
        name: String,

        /// Category name
        #[arg(short, long)]
        category: String,
    },
    /// Show the account balance, optionally depositing funds first
    Balance {
        /// Amount in yen to deposit
        #[arg(short, long)]
        deposit: Option<i64>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
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
        Commands::Register { name, password } => {
            commands::auth::register(&name, &password).await?;
        }
        Commands::Login { user_id, password } => {
            commands::auth::login(user_id, &password).await?;
        }
        Commands::Categories => commands::browse::categories().await?,
        Commands::Browse => commands::browse::on_sale().await?,
        Commands::Search { keyword } => commands::browse::search(&keyword).await?,
        Commands::List(args) => commands::listing::submit(args).await?,
        Commands::Relist { item_id } => commands::listing::relist(item_id).await?,
        Commands::Show { item_id } => commands::trade::show(item_id).await?,
        Commands::Buy { item_id } => commands::trade::buy(item_id).await?,
        Commands::Redeem { item_id, passcode } => {
            commands::trade::redeem(item_id, &passcode).await?;
        }
        Commands::Suggest { name, category } => {
            commands::listing::suggest(&name, &category).await?;
        }
        Commands::Balance { deposit } => commands::trade::balance(deposit).await?,
    }
    Ok(())
}

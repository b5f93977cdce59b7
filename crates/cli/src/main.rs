//! terrace-admin entry point.
//!
//! One-shot admin bootstrap tooling over the JSON file store: creates
//! admin users and promotes existing ones. Runs outside the app
//! runtime.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use terrace_core::AccountService;
use terrace_store::{FileStore, UsersCollection};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "terrace-admin")]
#[command(about = "Admin bootstrap tooling for the terrace club database")]
#[command(version)]
struct Cli {
    /// Path to the JSON database file
    #[arg(long, env = "TERRACE_DATA", default_value = "terrace.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user document with the admin flag already set
    CreateAdmin {
        /// User ID to create
        user_id: String,

        /// Display name for the new user
        #[arg(long)]
        name: String,
    },

    /// Set the admin flag on an existing user
    GrantAdmin {
        /// User ID to promote
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "terrace=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let store = Arc::new(FileStore::open(&cli.data).await?);
    let accounts = AccountService::new(UsersCollection::new(store));

    match cli.command {
        Commands::CreateAdmin { user_id, name } => {
            let profile = accounts.create_admin(&user_id, &name).await?;
            info!(user_id = %profile.id, "Created admin user");
            println!("Created admin {} ({})", profile.display_name, profile.id);
        }
        Commands::GrantAdmin { user_id } => {
            accounts.grant_admin(&user_id).await?;
            info!(%user_id, "Granted admin flag");
            println!("Granted admin to {user_id}");
        }
    }

    Ok(())
}

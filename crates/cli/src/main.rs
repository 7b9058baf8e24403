//! Hrom CLI - Database migrations and staff provisioning.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! hrom-cli migrate
//!
//! # Create a logist account (password from HROM_USER_PASSWORD or generated)
//! hrom-cli user create -u aigerim -e aigerim@hrom.kz -n "Айгерим Садыкова" --phone 77011234567 -r logist
//!
//! # Register a driver
//! hrom-cli driver create -n "Ерлан Ахметов" --phone 77017654321 --vehicle "Газель, 123 ABC 01"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create staff accounts with any role
//! - `driver create` - Register drivers

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hrom-cli")]
#[command(author, version, about = "Hrom CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage staff accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage drivers
    Driver {
        #[command(subcommand)]
        action: DriverAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new staff account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Full name
        #[arg(short = 'n', long)]
        full_name: String,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Role (`employee` or `logist`)
        #[arg(short, long, default_value = "employee")]
        role: String,
    },
}

#[derive(Subcommand)]
enum DriverAction {
    /// Register a new driver
    Create {
        /// Driver name
        #[arg(short, long)]
        name: String,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Vehicle description, e.g. model and plate
        #[arg(long)]
        vehicle: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                email,
                full_name,
                phone,
                role,
            } => {
                commands::users::create_user(&username, &email, &full_name, &phone, &role).await?;
            }
        },
        Commands::Driver { action } => match action {
            DriverAction::Create {
                name,
                phone,
                vehicle,
            } => {
                commands::drivers::create_driver(&name, &phone, vehicle.as_deref()).await?;
            }
        },
    }
    Ok(())
}

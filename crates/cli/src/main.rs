mod commands;
mod errors;
mod photo;
mod session_store;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use rental_furnish_core::models::settings::Settings;
use rental_furnish_core::RentalFurnish;
use tracing_subscriber::EnvFilter;

use crate::session_store::SessionStore;

/// Rent furniture, track what you spend and get furniture suggestions.
#[derive(Parser, Debug)]
#[command(name = "rental-furnish", version, about, long_about = None)]
struct Cli {
    /// Sealed session file (defaults to $RENTAL_FURNISH_SESSION_FILE or ./.rental-furnish-session).
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session, sealed with a passphrase.
    Login {
        #[arg(long)]
        email: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user's profile.
    Whoami,
    /// List the furniture catalog.
    Furniture {
        /// Only show one category (e.g. living-room, bedroom).
        #[arg(long)]
        category: Option<String>,
    },
    /// Rent a piece of furniture.
    Buy {
        furniture_id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Save rental preferences on the profile.
    Preferences {
        /// Desired style, colors and materials.
        #[arg(long)]
        text: String,
        /// Monthly budget in dollars.
        #[arg(long)]
        budget: f64,
        /// small, medium or large.
        #[arg(long)]
        size: String,
    },
    /// Spending summary and transaction history.
    Dashboard,
    /// Personalised furniture recommendations.
    Recommend {
        #[arg(long)]
        preferences: String,
        #[arg(long)]
        budget: f64,
        #[arg(long)]
        size: String,
        /// Optional photo of the space.
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Assess the style of a room photo.
    AssessStyle {
        #[arg(long)]
        photo: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenv().ok();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> errors::Result<()> {
    let settings = Settings::from_env()?;
    tracing::debug!(?settings, "loaded settings");

    let mut client = RentalFurnish::from_settings(&settings)?;
    let mut store = SessionStore::new(cli.session_file);

    commands::dispatch(&mut client, &mut store, cli.command, cli.json).await
}

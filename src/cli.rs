//! CLI argument definitions for the flashcards binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use flashcards_app::auth::JwtConfig;
use flashcards_app::auth::jwt::{DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS};
use flashcards_app::config::{AppConfig, ConfigError, ttl_from_secs};
use flashcards_app::models::SchedulerConfig;
use flashcards_app::models::flashcard::DEFAULT_DECK;

/// Flashcards spaced-repetition study server
#[derive(Parser, Debug)]
#[command(name = "flashcards")]
#[command(about = "Flashcards: spaced-repetition study server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Create an admin account, or promote an existing one
    CreateAdmin(CreateAdminArgs),
    /// Export one of a user's decks to a JSON file
    Export(ExportArgs),
    /// Import a deck JSON file into a user's account
    Import(ImportArgs),
}

#[derive(clap::Args, Debug)]
pub struct DatabaseArgs {
    /// SQLite database file
    #[arg(
        short = 'D',
        long,
        default_value = "flashcards.sqlite3",
        env = "FLASHCARDS_DATABASE"
    )]
    pub database: PathBuf,
}

/// Arguments for the serve command
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "FLASHCARDS_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "FLASHCARDS_HOST")]
    pub host: String,

    /// Secret used to sign access and refresh tokens
    #[arg(long, env = "FLASHCARDS_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[arg(long, default_value_t = DEFAULT_ACCESS_TTL_SECS, env = "FLASHCARDS_ACCESS_TTL_SECS")]
    pub access_ttl_secs: i64,

    /// Refresh token lifetime in seconds
    #[arg(long, default_value_t = DEFAULT_REFRESH_TTL_SECS, env = "FLASHCARDS_REFRESH_TTL_SECS")]
    pub refresh_ttl_secs: i64,
}

impl ServeArgs {
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        Ok(AppConfig {
            database: self.db.database,
            host: self.host,
            port: self.port,
            jwt: JwtConfig {
                secret: self.jwt_secret,
                access_ttl: ttl_from_secs("access token lifetime", self.access_ttl_secs)?,
                refresh_ttl: ttl_from_secs("refresh token lifetime", self.refresh_ttl_secs)?,
            },
            scheduler: SchedulerConfig::default(),
        })
    }
}

#[derive(clap::Args, Debug)]
pub struct CreateAdminArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,

    #[arg(long)]
    pub email: String,

    /// Only used when the account does not exist yet
    #[arg(long, env = "FLASHCARDS_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Owner of the deck
    #[arg(long)]
    pub email: String,

    #[arg(long, default_value = DEFAULT_DECK)]
    pub deck: String,

    /// Destination JSON file
    #[arg(short, long)]
    pub out: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Account receiving the cards
    #[arg(long)]
    pub email: String,

    /// Deck JSON file
    #[arg(short, long)]
    pub file: PathBuf,
}

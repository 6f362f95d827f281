//! CLI command definitions.

pub mod favorites;
pub mod movies;

use clap::{Parser, Subcommand, ValueEnum};

/// Browse the movie catalog with offline persistence.
#[derive(Debug, Parser)]
#[command(name = "moviesync")]
#[command(version, about = "Browse the movie catalog with offline persistence", long_about = None)]
pub struct Cli {
    /// Catalog API base URL.
    #[arg(long, env = "MOVIESYNC_API_URL")]
    pub api_url: Option<String>,

    /// Catalog API key.
    #[arg(long, env = "MOVIESYNC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to the SQLite database.
    #[arg(long, env = "MOVIESYNC_DB_PATH")]
    pub db_path: Option<String>,

    /// Keep local data in memory for this run only.
    #[arg(long)]
    pub ephemeral: bool,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse catalog movies.
    Movies(movies::MoviesCommand),
    /// Manage favorite movies.
    Favorites(favorites::FavoritesCommand),
}

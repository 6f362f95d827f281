//! Movie CLI commands.

use clap::{Parser, Subcommand, ValueEnum};

use moviesync_core::datasource::SortOrder;

/// Movie browsing commands.
#[derive(Debug, Parser)]
pub struct MoviesCommand {
    #[command(subcommand)]
    pub action: MoviesAction,
}

/// CLI sort order (with clap ValueEnum).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Popularity,
    Rating,
    Release,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Popularity => SortOrder::Popularity,
            SortArg::Rating => SortOrder::Rating,
            SortArg::Release => SortOrder::ReleaseDate,
        }
    }
}

/// Available movie actions.
#[derive(Debug, Subcommand)]
pub enum MoviesAction {
    /// List movies, from the cache when possible.
    List {
        /// Sort order. Queries both stores instead of the cache.
        #[arg(long)]
        sort: Option<SortArg>,
        /// Page number, starting at 1.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,
        /// Invalidate the repository and fetch from the catalog.
        #[arg(long)]
        refresh: bool,
        /// Ask the catalog directly, bypassing the repository.
        #[arg(long, conflicts_with = "refresh")]
        direct: bool,
    },
    /// Show one movie.
    Show {
        /// Movie ID.
        id: String,
    },
    /// Print the poster URL of a movie.
    Poster {
        /// Movie ID.
        id: String,
        /// Artwork size segment.
        #[arg(long, default_value = "w500")]
        size: String,
    },
}

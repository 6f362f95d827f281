//! Favorite CLI commands.

use clap::{Parser, Subcommand};

/// Favorite management commands.
#[derive(Debug, Parser)]
pub struct FavoritesCommand {
    #[command(subcommand)]
    pub action: FavoritesAction,
}

/// Available favorite actions.
#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// Mark a movie as favorite.
    Add {
        /// Movie ID.
        id: String,
    },
    /// Remove a favorite.
    Remove {
        /// Movie ID.
        id: String,
    },
    /// List favorites.
    List,
    /// Print the favorites list every time it changes.
    Watch,
}

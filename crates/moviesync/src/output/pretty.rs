//! Pretty output formatting.

use moviesync_core::movie::{FavoriteMovie, Movie};

/// Format a movie for display.
pub fn format_movie(movie: &Movie) -> String {
    let mut output = match movie.release_year() {
        Some(year) => format!("{} ({})", movie.title, year),
        None => movie.title.clone(),
    };
    output.push_str(&format!("\n  ID: {}", movie.id));
    output.push_str(&format!(
        "\n  Rating: {:.1} ({} votes)",
        movie.vote_average, movie.vote_count
    ));
    output.push_str(&format!("\n  Popularity: {:.1}", movie.popularity));
    if !movie.overview.is_empty() {
        output.push_str(&format!("\n  Overview: {}", movie.overview));
    }
    output
}

/// Format movies for display.
pub fn format_movies(movies: &[Movie]) -> String {
    if movies.is_empty() {
        return "No movies found.".to_string();
    }
    let mut output = format!("MOVIES ({})\n", movies.len());
    output.push_str(&"-".repeat(40));
    for movie in movies {
        output.push_str(&format!("\n{}", format_movie(movie)));
        output.push('\n');
    }
    output
}

/// Format a favorite for display.
pub fn format_favorite(favorite: &FavoriteMovie) -> String {
    format!(
        "{}\n  ID: {}\n  Added: {}",
        favorite.title,
        favorite.id,
        favorite.added_at.format("%Y-%m-%d %H:%M")
    )
}

/// Format favorites for display.
pub fn format_favorites(favorites: &[FavoriteMovie]) -> String {
    if favorites.is_empty() {
        return "No favorites yet.".to_string();
    }
    let mut output = format!("FAVORITES ({})\n", favorites.len());
    output.push_str(&"-".repeat(40));
    for favorite in favorites {
        output.push_str(&format!("\n{}", format_favorite(favorite)));
        output.push('\n');
    }
    output
}

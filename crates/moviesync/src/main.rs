//! moviesync CLI entry point.

use anyhow::Result;
use clap::Parser;
use futures_util::StreamExt;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moviesync::app::{App, ListMovies};
use moviesync::cli::favorites::FavoritesAction;
use moviesync::cli::movies::MoviesAction;
use moviesync::cli::{Cli, Commands};
use moviesync::output::{pretty, render};
use moviesync::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "moviesync=info".into()),
    );
    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let mut config = Config::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(api_key) = cli.api_key {
        config.api_key = Some(api_key);
    }
    if let Some(db_path) = cli.db_path {
        config.db_path = db_path;
    }

    let app = if cli.ephemeral {
        App::ephemeral(&config)?
    } else {
        open_app(&config).await?
    };

    let format = cli.format;
    match cli.command {
        Commands::Movies(movies_cmd) => match movies_cmd.action {
            MoviesAction::List {
                sort,
                page,
                refresh,
                direct,
            } => {
                let movies = app
                    .list_movies(ListMovies {
                        sort: sort.map(Into::into),
                        page,
                        refresh,
                        direct,
                    })
                    .await?;
                println!("{}", render(movies.as_slice(), format, pretty::format_movies));
            }
            MoviesAction::Show { id } => {
                let movie = app.show_movie(&id).await?;
                println!("{}", render(&movie, format, pretty::format_movie));
            }
            MoviesAction::Poster { id, size } => {
                let url = app.poster_url(&id, &size).await?;
                let value = serde_json::json!({ "id": id, "size": size, "url": url });
                println!("{}", render(&value, format, |_| url.clone()));
            }
        },
        Commands::Favorites(favorites_cmd) => match favorites_cmd.action {
            FavoritesAction::Add { id } => {
                let favorite = app.add_favorite(&id).await?;
                println!(
                    "{}",
                    render(&favorite, format, |f| format!(
                        "Added:\n{}",
                        pretty::format_favorite(f)
                    ))
                );
            }
            FavoritesAction::Remove { id } => {
                app.remove_favorite(&id).await?;
                if !cli.quiet {
                    println!("Removed favorite {}", id);
                }
            }
            FavoritesAction::List => {
                let favorites = app.list_favorites().await?;
                println!(
                    "{}",
                    render(favorites.as_slice(), format, pretty::format_favorites)
                );
            }
            FavoritesAction::Watch => {
                if !cli.quiet {
                    eprintln!("Watching favorites, press Ctrl+C to stop...");
                }
                let mut stream = app.watch_favorites();
                loop {
                    tokio::select! {
                        batch = stream.next() => match batch {
                            Some(Ok(favorites)) => println!(
                                "{}",
                                render(favorites.as_slice(), format, pretty::format_favorites)
                            ),
                            Some(Err(e)) => {
                                eprintln!("Error: {}", e);
                                break;
                            }
                            None => break,
                        },
                        _ = tokio::signal::ctrl_c() => {
                            tracing::debug!("Interrupted, stopping watch");
                            break;
                        }
                    }
                }
            }
        },
    }

    Ok(())
}

#[cfg(feature = "sqlite")]
async fn open_app(config: &Config) -> Result<App> {
    App::open(config).await
}

#[cfg(not(feature = "sqlite"))]
async fn open_app(config: &Config) -> Result<App> {
    tracing::warn!("Built without SQLite support, local data will not persist");
    App::ephemeral(config)
}

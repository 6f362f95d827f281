//! Movie catalog domain: entities and upstream wire types.

mod api;
mod order;
mod types;

pub use api::{movie_from_dto, movies_from_page, MovieDto, Page};
pub use order::movie_order;
pub use types::{FavoriteMovie, Movie};

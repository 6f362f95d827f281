use std::cmp::Ordering;

use crate::datasource::SortOrder;

use super::Movie;

/// Orders movies the way the catalog does for `order`: descending by the
/// selected field, then by id so the result is stable across stores.
///
/// Movies without a release date sort after every dated movie.
pub fn movie_order(order: SortOrder, a: &Movie, b: &Movie) -> Ordering {
    let primary = match order {
        SortOrder::Popularity => b.popularity.total_cmp(&a.popularity),
        SortOrder::Rating => b.vote_average.total_cmp(&a.vote_average),
        SortOrder::ReleaseDate => match (a.release_date, b.release_date) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };

    primary.then_with(|| a.id.cmp(&b.id))
}

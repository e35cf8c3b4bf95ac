//! Name search over places

use crate::errors::{Error, Result};
use crate::models::Place;

/// Case-insensitive substring match
pub fn name_matches(query: &str, name: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Keep the places whose name contains `query`, ignoring case.
///
/// A blank query is rejected rather than matching everything.
pub fn search_by_name(query: &str, places: Vec<Place>) -> Result<Vec<Place>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::MissingParam("name".to_string()));
    }

    Ok(places
        .into_iter()
        .filter(|p| name_matches(query, &p.name))
        .collect())
}

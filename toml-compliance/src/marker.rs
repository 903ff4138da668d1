//! Marker-based fixture selection.
//!
//! A marker selects a pair when it is a substring of the fixture stem (so
//! `-m array` picks every array fixture) or equals the category directory name
//! (so `-m invalid` picks every invalid fixture). No markers selects all.

use crate::fixture::FixturePair;

/// Returns `true` when `pair` is selected by `markers`.
#[must_use]
pub fn is_selected(pair: &FixturePair, markers: &[String]) -> bool {
    if markers.is_empty() {
        return true;
    }
    let stem = pair.stem();
    let category = pair.category().as_str();
    markers
        .iter()
        .any(|marker| stem.contains(marker.as_str()) || marker == category)
}

/// Keeps the pairs selected by `markers`, passing errors through untouched.
pub fn filter_pairs<I, E>(
    pairs: I,
    markers: Vec<String>,
) -> impl Iterator<Item = Result<FixturePair, E>>
where
    I: IntoIterator<Item = Result<FixturePair, E>>,
{
    pairs.into_iter().filter(move |item| match item {
        Ok(pair) => is_selected(pair, &markers),
        Err(_) => true,
    })
}

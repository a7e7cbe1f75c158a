//! Media item id extraction from page locations.

use url::Url;

/// Returns the value of query parameter `param` in `location`.
///
/// Unparsable locations, a missing parameter, and an empty value all yield
/// `None`.
pub fn resource_id_from_location(location: &str, param: &str) -> Option<String> {
    let url = Url::parse(location).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

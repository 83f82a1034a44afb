use std::borrow::Cow;

use multimap::MultiMap;
use url::Url;

/// Replacement for query values carrying an executable scheme.
const NEUTRALIZED: &str = "about:blank";

/// Collects query parameters into a multimap, preserving repeated names.
pub fn query_multimap(url: &Url) -> MultiMap<String, String> {
    url.query_pairs()
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect()
}

/// Neutralizes a single query value when it smuggles an executable scheme.
///
/// Control characters and whitespace are ignored when matching, so
/// `java\tscript:` is caught as well.
pub fn sanitize_value(value: &str) -> Cow<'_, str> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_control() && !c.is_whitespace())
        .collect();
    let lowered = compact.to_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("data:")
        || lowered.starts_with("vbscript:")
    {
        Cow::Borrowed(NEUTRALIZED)
    } else {
        Cow::Borrowed(value)
    }
}

/// Rewrites every query value of `url` through [`sanitize_value`].
pub fn sanitize_query(url: &mut Url) {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let clean = sanitize_value(&value).into_owned();
            (name.into_owned(), clean)
        })
        .collect();
    if pairs.is_empty() {
        return;
    }
    let mut serializer = url.query_pairs_mut();
    serializer.clear();
    serializer.extend_pairs(pairs);
}

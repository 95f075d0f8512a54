use std::collections::{BTreeSet, HashSet};
use url::Url;

/// Resolves `href` against `base` and drops any fragment.
///
/// Returns `None` for hrefs that cannot form an http(s) URL, such as
/// `mailto:` or `javascript:` links.
pub fn absolutize(base: &Url, href: &str) -> Option<String> {
    let mut resolved = base.join(href.trim()).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved.to_string())
}

/// Absolutizes a whole result set and returns it sorted
pub fn absolutize_all(base: &Url, hrefs: &HashSet<String>) -> Vec<String> {
    hrefs
        .iter()
        .filter_map(|href| {
            let resolved = absolutize(base, href);
            if resolved.is_none() {
                ::log::debug!("Dropping unresolvable link: {}", href);
            }
            resolved
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

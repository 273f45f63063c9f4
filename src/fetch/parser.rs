//! Link extraction from HTML

use scraper::{Html, Selector};
use url::Url;

/// Collects the followable links of an HTML page as absolute URLs.
///
/// Takes every `<a href="...">` without a `download` attribute, resolves
/// relative hrefs against `base`, and keeps http/https targets only.
/// `javascript:`, `mailto:`, `tel:` and `data:` schemes, fragment-only
/// anchors, and unresolvable hrefs are skipped.
pub fn collect_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute) = resolve_link(href, base) {
                    links.push(absolute);
                }
            }
        }
    }

    links
}

/// Resolves one href to an absolute URL, or None if it should be skipped.
fn resolve_link(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Same-page anchors
    if href.starts_with('#') {
        return None;
    }

    match base.join(href) {
        Ok(absolute) => {
            if absolute.scheme() == "http" || absolute.scheme() == "https" {
                Some(absolute.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

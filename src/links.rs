use itertools::Itertools;
use url::Url;

use crate::{
    session::BrowserSession,
    types::{CrawlError, CrawlOptions},
};

/// A container selector yields its anchor descendants; a selector that
/// already targets anchors (trailing " a") is used verbatim. The empty
/// selector therefore queries " a", i.e. every anchor in the document.
pub fn anchor_selector(selector: &str) -> String {
    if selector.ends_with(" a") {
        selector.to_string()
    } else {
        format!("{} a", selector)
    }
}

/// Collects the raw href of every anchor matching the link selector.
/// The list is returned as found: relative urls, duplicates and
/// fragment-only links are the caller's problem.
pub fn extract_links<S: BrowserSession>(
    session: &S,
    selector: &str,
) -> Result<Vec<String>, CrawlError> {
    let query = anchor_selector(selector);
    debug!("collecting anchors matching {:?}", query);

    let elements = session
        .find_elements(&query)
        .map_err(|e| CrawlError::Navigation(format!("anchor query {:?} failed: {:#}", query, e)))?;

    let mut links = vec![];
    for element in &elements {
        let href = session
            .attribute(element, "href")
            .map_err(|e| CrawlError::Navigation(format!("could not read href: {:#}", e)))?;
        if let Some(href) = href {
            links.push(href);
        }
    }
    debug!("found {} raw links", links.len());
    Ok(links)
}

/// Strips the fragment, then resolves the link to an absolute url:
/// links carrying a scheme are re-serialized to their canonical form,
/// schemeless ones are concatenated onto the base url verbatim. A link
/// with nothing left after fragment removal resolves to nothing.
pub fn normalize(link: &str, base_url: &str) -> Option<String> {
    // we remove the fragments (#)
    let link = match link.split_once('#') {
        Some((before, _)) => before,
        None => link,
    };
    if link.is_empty() {
        return None;
    }
    match Url::parse(link) {
        Ok(url) => Some(url.to_string()),
        Err(_) => Some(format!("{}{}", base_url, link)),
    }
}

// first occurrence wins, insertion order is preserved
pub fn dedup_links(links: Vec<String>) -> Vec<String> {
    links.into_iter().unique().collect()
}

pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

/// Applies the site and domain restrictions. Both rules are independent;
/// an unparsable link counts as a host mismatch under domain restriction.
pub fn accept(link: &str, base_url: &str, root_domain: &str, options: &CrawlOptions) -> bool {
    if options.site_restricted && !link.starts_with(base_url) {
        debug!("skipping {} as it is a site only crawl", link);
        return false;
    }
    if options.domain_restricted && host_of(link).as_deref() != Some(root_domain) {
        debug!("skipping {} as it is a domain only crawl", link);
        return false;
    }
    true
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn container_selectors_get_the_anchor_suffix() {
        assert_eq!(anchor_selector(""), " a");
        assert_eq!(anchor_selector("div.content"), "div.content a");
        assert_eq!(anchor_selector("a"), "a a");
    }

    #[test]
    fn anchor_selectors_are_used_verbatim() {
        assert_eq!(anchor_selector("nav a"), "nav a");
        assert_eq!(anchor_selector("div.content > ul a"), "div.content > ul a");
    }

    #[test]
    fn removes_path_fragments() {
        assert_eq!(
            normalize("https://x.com/p#section", "https://x.com"),
            Some("https://x.com/p".to_string())
        );
        assert_eq!(
            normalize("https://example.com#hello", "https://example.com"),
            Some("https://example.com/".to_string())
        );
        assert_eq!(
            normalize("/hello#test", "https://example.com"),
            Some("https://example.com/hello".to_string())
        );
    }

    #[test]
    fn fragment_only_links_resolve_to_nothing() {
        assert_eq!(normalize("#top", "https://x.com"), None);
        assert_eq!(normalize("", "https://x.com"), None);
    }

    #[test]
    fn relative_links_resolve_against_the_base() {
        assert_eq!(
            normalize("/about", "https://x.com"),
            Some("https://x.com/about".to_string())
        );
    }

    #[test]
    fn absolute_links_are_idempotent() {
        let base = "https://x.com";
        let once = normalize("https://x.com/p", base).unwrap();
        assert_eq!(normalize(&once, base), Some(once.clone()));
        let relative = normalize("/about", base).unwrap();
        assert_eq!(normalize(&relative, base), Some(relative.clone()));
    }

    #[test]
    fn dedup_preserves_first_seen_order() {
        let links = vec![
            "https://x.com/a".to_string(),
            "https://x.com/b".to_string(),
            "https://x.com/a".to_string(),
            "https://x.com/c".to_string(),
        ];
        assert_eq!(
            dedup_links(links),
            vec!["https://x.com/a", "https://x.com/b", "https://x.com/c"]
        );
    }

    #[test]
    fn site_restriction_is_a_literal_prefix_check() {
        let options = CrawlOptions::default_builder()
            .site_restricted(true)
            .build()
            .unwrap();
        assert!(accept("https://x.com/a", "https://x.com", "x.com", &options));
        assert!(!accept("https://y.com/a", "https://x.com", "x.com", &options));
    }

    #[test]
    fn domain_restriction_requires_an_exact_host_match() {
        let options = CrawlOptions::default_builder()
            .domain_restricted(true)
            .build()
            .unwrap();
        assert!(accept("https://x.com/a", "https://x.com", "x.com", &options));
        assert!(!accept("https://sub.x.com/a", "https://x.com", "x.com", &options));
        assert!(!accept("not a url", "https://x.com", "x.com", &options));
    }

    #[test]
    fn unrestricted_crawls_accept_everything() {
        let options = CrawlOptions::default_builder().build().unwrap();
        assert!(accept("https://y.com/a", "https://x.com", "x.com", &options));
    }
}

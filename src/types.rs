use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("session: {0}")]
    Session(String),
    #[error("navigation: {0}")]
    Navigation(String),
    #[error("invalid_url: {0}")]
    InvalidUrl(String),
    #[error("page did not reach readyState \"complete\" within {waited_ms}ms")]
    LoadTimeout { waited_ms: u64 },
    #[error("early_termination")]
    EarlyTermination,
}

#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct CrawlOptions {
    // css selector whose anchor descendants are collected, empty means every anchor
    #[builder(default = "String::new()")]
    pub link_selector: String,
    // restricts the fetched markup to the first element matching this selector
    #[builder(default = "None")]
    pub content_selector: Option<String>,
    // only keep links that start with the base url
    #[builder(default = "false")]
    pub site_restricted: bool,
    // only keep links whose host equals the root page's host
    #[builder(default = "false")]
    pub domain_restricted: bool,
    // overrides the scheme://host base derived from the crawled url
    #[builder(default = "None")]
    pub base_url: Option<String>,
    // wait after navigation before the first readiness probe, in milliseconds
    #[builder(default = "1000")]
    pub initial_wait_ms: u64,
    // wait between readiness probes, in milliseconds
    #[builder(default = "100")]
    pub retry_wait_ms: u64,
    // ceiling on the total time spent waiting for one page to load
    #[builder(default = "30_000")]
    pub load_timeout_ms: u64,
}

impl CrawlOptions {
    pub fn default_builder() -> CrawlOptionsBuilder {
        CrawlOptionsBuilder::default()
    }
}

// content[i] is the markup fetched by navigating to links[i]
#[derive(Debug, Serialize)]
pub struct CrawlResult {
    pub url: String,
    pub links: Vec<String>,
    pub content: Vec<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn options_defaults() {
        let options = CrawlOptions::default_builder().build().unwrap();
        assert_eq!(options.link_selector, "");
        assert_eq!(options.content_selector, None);
        assert!(!options.site_restricted);
        assert!(!options.domain_restricted);
        assert_eq!(options.base_url, None);
        assert_eq!(options.initial_wait_ms, 1000);
        assert_eq!(options.retry_wait_ms, 100);
        assert_eq!(options.load_timeout_ms, 30_000);
    }
}

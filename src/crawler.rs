use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use url::Url;

use crate::{
    browser_controller::BrowserController,
    fetcher::fetch_content,
    links::{accept, dedup_links, extract_links, host_of, normalize},
    session::BrowserSession,
    types::{CrawlError, CrawlOptions, CrawlResult},
    waiter::wait_for_load,
};

// floor for the browser's own idle timeout, independent of page-load timings
const MIN_BROWSER_TIMEOUT_MS: u64 = 45_000;

pub struct Crawler {
    options: CrawlOptions,
    should_terminate: Arc<AtomicBool>,
}

impl Crawler {
    pub fn new(options: CrawlOptions) -> Crawler {
        Crawler {
            options,
            should_terminate: Arc::new(AtomicBool::new(false)),
        }
    }

    // observed between content fetches, settable from a signal handler
    pub fn termination_flag(&self) -> Arc<AtomicBool> {
        self.should_terminate.clone()
    }

    /// Crawls one page a single hop deep: loads `url`, collects and
    /// filters its links, then fetches the rendered content of each one.
    /// The browser session lives exactly as long as this call.
    pub async fn crawl(&self, url: &str) -> Result<CrawlResult, CrawlError> {
        Url::parse(url).map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", url, e)))?;

        let timeout = self.options.load_timeout_ms.max(MIN_BROWSER_TIMEOUT_MS);
        let session = BrowserController::new(Duration::from_millis(timeout))
            .map_err(|e| CrawlError::Session(format!("could not start a session: {:#}", e)))?;

        self.crawl_session(session, url).await
    }

    /// Runs the crawl against a caller-supplied session. The session is
    /// closed exactly once on every exit path, errors included; errors
    /// are reported at this boundary rather than panicking through
    /// teardown.
    pub async fn crawl_session<S: BrowserSession>(
        &self,
        session: S,
        url: &str,
    ) -> Result<CrawlResult, CrawlError> {
        let out = self.run(&session, url).await;

        if let Err(e) = session.close() {
            error!("could not close browser session: {:#}", e);
        }

        match &out {
            Ok(res) => info!("crawl of {} completed with {} links", url, res.links.len()),
            Err(e) => error!("crawl of {} failed: {}", url, e),
        }
        out
    }

    async fn run<S: BrowserSession>(
        &self,
        session: &S,
        url: &str,
    ) -> Result<CrawlResult, CrawlError> {
        session
            .navigate(url)
            .map_err(|e| CrawlError::Navigation(format!("could not navigate to {}: {:#}", url, e)))?;
        wait_for_load(session, &self.options).await?;

        let base_url = match &self.options.base_url {
            Some(base) => base.clone(),
            None => derive_base_url(url)?,
        };
        let root_domain = host_of(&base_url)
            .or_else(|| host_of(url))
            .unwrap_or_default();
        debug!("crawling {} against base {} ({})", url, base_url, root_domain);

        let raw = extract_links(session, &self.options.link_selector)?;
        let links = dedup_links(
            raw.iter()
                .filter_map(|link| normalize(link, &base_url))
                .collect(),
        )
        .into_iter()
        .filter(|link| accept(link, &base_url, &root_domain, &self.options))
        .collect::<Vec<String>>();

        info!("{} links retained on {}", links.len(), url);

        let mut content = Vec::with_capacity(links.len());
        for link in &links {
            if self.should_terminate.load(Ordering::Relaxed) {
                warn!("terminating crawl of {} early", url);
                return Err(CrawlError::EarlyTermination);
            }
            content.push(fetch_content(session, link, &self.options).await?);
        }

        Ok(CrawlResult {
            url: url.into(),
            links,
            content,
        })
    }
}

fn derive_base_url(url: &str) -> Result<String, CrawlError> {
    let parsed = Url::parse(url).map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", url, e)))?;
    match parsed.host_str() {
        Some(host) => Ok(format!("{}://{}", parsed.scheme(), host)),
        None => Err(CrawlError::InvalidUrl(format!("{} has no host", url))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn base_url_is_scheme_and_host() {
        assert_eq!(
            derive_base_url("https://x.com/some/page?q=1").unwrap(),
            "https://x.com"
        );
        assert_eq!(
            derive_base_url("http://sub.x.com/p").unwrap(),
            "http://sub.x.com"
        );
    }

    #[test]
    fn hostless_urls_are_rejected() {
        assert!(matches!(
            derive_base_url("data:text/plain,hi"),
            Err(CrawlError::InvalidUrl(_))
        ));
    }
}

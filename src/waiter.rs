use std::time::Duration;

use tokio::time::sleep;

use crate::{
    session::BrowserSession,
    types::{CrawlError, CrawlOptions},
};

pub const READY_STATE_PROBE: &str = "document.readyState";

/// Blocks until the current document reports `readyState == "complete"`.
///
/// The initial wait absorbs the navigation's network turnaround and runs
/// exactly once; every re-probe only waits `retry_wait_ms`. Waiting is
/// capped by `load_timeout_ms` so a page that never finishes loading
/// surfaces as an error instead of hanging the crawl.
pub async fn wait_for_load<S: BrowserSession>(
    session: &S,
    options: &CrawlOptions,
) -> Result<(), CrawlError> {
    sleep(Duration::from_millis(options.initial_wait_ms)).await;

    let mut waited_ms = options.initial_wait_ms;
    loop {
        let state = session
            .execute_script(READY_STATE_PROBE, &[])
            .map_err(|e| CrawlError::Navigation(format!("readiness probe failed: {:#}", e)))?;
        if state.as_str() == Some("complete") {
            return Ok(());
        }
        if waited_ms >= options.load_timeout_ms {
            warn!("document still reports {} after {}ms", state, waited_ms);
            return Err(CrawlError::LoadTimeout { waited_ms });
        }
        debug!(
            "document not ready yet ({}), retrying in {}ms",
            state, options.retry_wait_ms
        );
        sleep(Duration::from_millis(options.retry_wait_ms)).await;
        waited_ms += options.retry_wait_ms;
    }
}

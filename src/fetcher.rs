use serde_json::json;

use crate::{
    session::BrowserSession,
    types::{CrawlError, CrawlOptions},
    waiter::wait_for_load,
};

pub const DOCUMENT_MARKUP_JS: &str = "document.documentElement.outerHTML";
pub const SELECTED_MARKUP_JS: &str =
    "document.querySelector(arguments[0]) ? document.querySelector(arguments[0]).outerHTML : \"\"";

/// Navigates the session to `link`, waits for the document to finish
/// loading and returns its rendered markup: the whole document, or with
/// a content selector the first matching element. A selector matching
/// nothing yields an empty string, not an error.
pub async fn fetch_content<S: BrowserSession>(
    session: &S,
    link: &str,
    options: &CrawlOptions,
) -> Result<String, CrawlError> {
    info!("fetching content of {}", link);
    session
        .navigate(link)
        .map_err(|e| CrawlError::Navigation(format!("could not navigate to {}: {:#}", link, e)))?;
    wait_for_load(session, options).await?;

    let markup = match &options.content_selector {
        Some(selector) => session
            .execute_script(SELECTED_MARKUP_JS, &[json!(selector)])
            .map_err(|e| {
                CrawlError::Navigation(format!(
                    "could not extract {:?} from {}: {:#}",
                    selector, link, e
                ))
            })?,
        None => session.execute_script(DOCUMENT_MARKUP_JS, &[]).map_err(|e| {
            CrawlError::Navigation(format!(
                "could not extract document markup from {}: {:#}",
                link, e
            ))
        })?,
    };

    Ok(markup.as_str().unwrap_or_default().to_string())
}

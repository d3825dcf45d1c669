use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use headless_chrome::{browser::default_executable, Browser, LaunchOptions, Tab};
use serde_json::Value;
use sysinfo::{Pid, PidExt, ProcessExt, System, SystemExt};

use crate::session::BrowserSession;

pub struct BrowserController {
    browser: Browser,
    tab: Arc<Tab>,
}

impl BrowserController {
    pub fn new(timeout: Duration) -> Result<Self> {
        let is_docker = std::env::var("IN_DOCKER").is_ok();
        let options = LaunchOptions::default_builder()
            .path(Some(default_executable().map_err(|e| anyhow!(e))?))
            .window_size(Some((1920, 1080)))
            .idle_browser_timeout(timeout)
            // warning only do this if in docker env
            .sandbox(!is_docker)
            .build()
            .map_err(|e| anyhow!("could not assemble launch options: {}", e))?;
        let browser = Browser::new(options).context("browser launching error")?;

        // we crawl from a single tab in an incognito context
        let tab = {
            let ctx = browser
                .new_context()
                .context("could not create incognito context")?;
            ctx.new_tab().context("could not create new tab")?
        };

        Ok(BrowserController { browser, tab })
    }

    pub fn kill(&self) -> bool {
        let pid = match self.browser.get_process_id() {
            Some(pid) => pid,
            None => return false,
        };
        let s = System::new_all();
        if let Some(process) = s.process(Pid::from_u32(pid)) {
            debug!("killing process with id {}", pid);
            process.kill();
            return true;
        }
        false
    }
}

impl BrowserSession for BrowserController {
    // the handle carries the element's attributes as the flat name/value
    // list the protocol reports them in
    type Elem = Vec<String>;

    fn navigate(&self, url: &str) -> Result<()> {
        debug!("navigating to {}", url);
        self.tab
            .navigate_to(url)
            .context(format!("could not navigate to {}", url))?;
        Ok(())
    }

    fn execute_script(&self, js: &str, args: &[Value]) -> Result<Value> {
        let expr = if args.is_empty() {
            js.to_string()
        } else {
            // scripts read their arguments the way a webdriver script would
            format!(
                "(function() {{ return ({js}); }}).apply(null, {})",
                serde_json::to_string(args)?
            )
        };
        let obj = self
            .tab
            .evaluate(&expr, false)
            .context("script evaluation failed")?;
        Ok(obj.value.unwrap_or(Value::Null))
    }

    fn find_elements(&self, selector: &str) -> Result<Vec<Vec<String>>> {
        // a selector matching nothing surfaces as an error, we treat it as no matches
        let elems = match self.tab.find_elements(selector) {
            Ok(elems) => elems,
            Err(e) => {
                debug!("no elements for {} ({})", selector, e);
                return Ok(vec![]);
            }
        };
        elems
            .iter()
            .map(|e| {
                Ok(e.get_attributes()
                    .context("could not get attributes")?
                    .unwrap_or_default())
            })
            .collect()
    }

    fn attribute(&self, element: &Vec<String>, name: &str) -> Result<Option<String>> {
        for pair in element.chunks(2) {
            if pair[0] == name {
                return Ok(pair.get(1).cloned());
            }
        }
        Ok(None)
    }

    fn close(&self) -> Result<()> {
        debug!("closing browser session...");
        self.kill();
        Ok(())
    }
}

impl Drop for BrowserController {
    fn drop(&mut self) {
        debug!("killing browser process...");
        self.kill();
    }
}

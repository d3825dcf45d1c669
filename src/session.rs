use anyhow::Result;
use serde_json::Value;

/// Capability surface of one live browser-automation session.
///
/// Every crawl step receives the session as an explicit handle, so a
/// different backend (or a scripted double in tests) drops in without
/// touching the crawl logic. Implementations are expected to open the
/// session when they are constructed; `close` must be safe to call even
/// if the backing browser is already gone.
pub trait BrowserSession {
    type Elem;

    fn navigate(&self, url: &str) -> Result<()>;
    /// Evaluates `js` in the current document. Arguments are exposed to
    /// the script as `arguments[0]`, `arguments[1]`, ...
    fn execute_script(&self, js: &str, args: &[Value]) -> Result<Value>;
    fn find_elements(&self, selector: &str) -> Result<Vec<Self::Elem>>;
    fn attribute(&self, element: &Self::Elem, name: &str) -> Result<Option<String>>;
    fn close(&self) -> Result<()>;
}

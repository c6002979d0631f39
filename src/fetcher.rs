//! Page fetcher abstraction for retrieving result pages.

use async_trait::async_trait;

use crate::Result;

/// Trait for fetching the raw content of a result page.
///
/// All transport configuration (timeout, headers) is set at construction
/// time; `fetch` is a simple URL-in, body-out interface. Any error returned
/// here is reported by the provider as a fetch failure.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the body of the given absolute URL.
    async fn fetch(&self, url: &str) -> Result<String>;
}

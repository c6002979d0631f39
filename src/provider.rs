//! Search provider trait, configuration and the shared paginated scan.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::extract::UrlExtractor;
use crate::fetcher::PageFetcher;
use crate::fetcher_http::HttpFetcher;
use crate::{ProviderFailure, RadarError, Result};

/// A single request header sent with every page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomHeader {
    pub name: String,
    pub value: String,
}

impl CustomHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Configuration for a search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Absolute address that page queries are resolved against.
    pub base_address: String,
    /// Relative query with a `{keyword}` placeholder.
    pub query_template: String,
    /// Extra query component with a `{start}` placeholder, added after the first page.
    pub page_template: String,
    /// Pattern whose first capturing group yields a result URL.
    pub extraction_pattern: String,
    /// Results per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Pattern matching budget per page in milliseconds.
    #[serde(default = "default_extraction_timeout_ms")]
    pub extraction_timeout_ms: u64,
    /// Pause before every page request after the first, in milliseconds.
    #[serde(default)]
    pub inter_request_delay_ms: u64,
    /// Headers sent with every request, in order.
    #[serde(default)]
    pub custom_headers: Vec<CustomHeader>,
}

fn default_page_size() -> usize {
    10
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_extraction_timeout_ms() -> u64 {
    1_000
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_address: String::new(),
            query_template: String::new(),
            page_template: String::new(),
            extraction_pattern: String::new(),
            page_size: default_page_size(),
            request_timeout_ms: default_request_timeout_ms(),
            extraction_timeout_ms: default_extraction_timeout_ms(),
            inter_request_delay_ms: 0,
            custom_headers: Vec::new(),
        }
    }
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_millis(self.extraction_timeout_ms)
    }

    pub fn inter_request_delay(&self) -> Duration {
        Duration::from_millis(self.inter_request_delay_ms)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// The extraction pattern itself is checked when it is compiled.
    pub fn validate(&self) -> Result<()> {
        if self.base_address.trim().is_empty() {
            return Err(RadarError::Config("base_address must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(RadarError::Config(
                "page_size must be greater than 0".into(),
            ));
        }
        if !self.query_template.contains("{keyword}") {
            return Err(RadarError::Config(
                "query_template must contain {keyword}".into(),
            ));
        }
        if !self.page_template.contains("{start}") {
            return Err(RadarError::Config(
                "page_template must contain {start}".into(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(RadarError::Config(
                "request_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.extraction_timeout_ms == 0 {
            return Err(RadarError::Config(
                "extraction_timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Trait for search providers.
///
/// A provider turns a keyword into the ordered URLs of its first `take`
/// results, index 0 being the top result.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable identifier; half of every cache key.
    fn name(&self) -> &str;

    /// Returns up to `take` result URLs in rank order.
    async fn query(&self, keyword: &str, take: usize) -> Result<Vec<String>>;
}

/// Maps a zero-based page offset to the value substituted for `{start}`.
pub type PageOffset = fn(usize) -> usize;

/// The offset transform used unless a provider overrides it.
pub fn identity_offset(start: usize) -> usize {
    start
}

/// Rewrites one extracted URL before it is returned.
pub type UrlRewrite = fn(String) -> String;

/// Leaves extracted URLs unchanged.
pub fn keep_url(url: String) -> String {
    url
}

/// Builds the relative query address for one page.
///
/// The keyword is trimmed, lowercased, and its space-separated tokens are
/// percent-encoded and joined with `+`. The page component is appended only
/// when `start` is non-zero.
pub fn build_query_address(config: &ProviderConfig, keyword: &str, start: usize) -> Result<String> {
    if keyword.trim().is_empty() {
        return Err(RadarError::InvalidArgument(
            "keyword cannot be empty".to_string(),
        ));
    }

    let mut query = config
        .query_template
        .replace("{keyword}", &normalize_keyword(keyword));

    if start > 0 {
        let page = config.page_template.replace("{start}", &start.to_string());
        query.push('&');
        query.push_str(&page);
    }

    Ok(query)
}

fn normalize_keyword(keyword: &str) -> String {
    keyword
        .trim()
        .to_lowercase()
        .split(' ')
        .map(|token| urlencoding::encode(token).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

/// A provider driven by configuration: paginate, fetch, extract.
///
/// Built-in engines differ only in their name, configuration and
/// [`PageOffset`] transform.
pub struct PagedProvider {
    name: String,
    config: ProviderConfig,
    base: Url,
    extractor: UrlExtractor,
    fetcher: Arc<dyn PageFetcher>,
    page_offset: PageOffset,
    url_rewrite: UrlRewrite,
}

impl PagedProvider {
    /// Creates a provider that fetches pages through `fetcher`.
    pub fn new(
        name: impl Into<String>,
        config: ProviderConfig,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self> {
        config.validate()?;
        let base = Url::parse(&config.base_address)?;
        let extractor = UrlExtractor::new(&config.extraction_pattern, config.extraction_timeout())?;

        Ok(Self {
            name: name.into(),
            config,
            base,
            extractor,
            fetcher,
            page_offset: identity_offset,
            url_rewrite: keep_url,
        })
    }

    /// Creates a provider backed by an [`HttpFetcher`] built from `config`.
    pub fn with_http(name: impl Into<String>, config: ProviderConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::from_config(&config)?);
        Self::new(name, config, fetcher)
    }

    /// Overrides the page offset transform.
    pub fn with_page_offset(mut self, page_offset: PageOffset) -> Self {
        self.page_offset = page_offset;
        self
    }

    /// Sets a rewrite applied to every extracted URL, e.g. to unwrap
    /// redirect targets.
    pub fn with_url_rewrite(mut self, url_rewrite: UrlRewrite) -> Self {
        self.url_rewrite = url_rewrite;
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Returns the absolute address of the page starting at `start`.
    pub fn query_address(&self, keyword: &str, start: usize) -> Result<Url> {
        let relative = build_query_address(&self.config, keyword, (self.page_offset)(start))?;
        Ok(self.base.join(&relative)?)
    }

    fn failure(&self, start: usize, kind: ProviderFailure) -> RadarError {
        RadarError::Provider {
            provider: self.name.clone(),
            start,
            kind,
        }
    }
}

#[async_trait]
impl Provider for PagedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, keyword: &str, take: usize) -> Result<Vec<String>> {
        if keyword.trim().is_empty() {
            return Err(RadarError::InvalidArgument(
                "keyword cannot be empty".to_string(),
            ));
        }

        let mut results: Vec<String> = Vec::new();
        let mut start = 0;

        while start < take {
            if start != 0 {
                tokio::time::sleep(self.config.inter_request_delay()).await;
            }

            let address = self.query_address(keyword, start)?;
            debug!(provider = %self.name, keyword, start, url = %address, "Querying provider");

            let content = match self.fetcher.fetch(address.as_str()).await {
                Ok(content) => content,
                Err(e) => {
                    error!(provider = %self.name, keyword, start, error = %e, "Request failed");
                    return Err(self.failure(start, ProviderFailure::FetchFailed(e.to_string())));
                }
            };

            if content.trim().is_empty() {
                error!(provider = %self.name, keyword, start, "Empty search content");
                return Err(self.failure(start, ProviderFailure::EmptyResponse));
            }

            let mut urls: Vec<String> = match self.extractor.extract(&content).await {
                Ok(urls) => urls.into_iter().map(self.url_rewrite).collect(),
                Err(kind) => {
                    error!(provider = %self.name, keyword, start, error = %kind, content = %content, "Pattern matching aborted");
                    return Err(self.failure(start, kind));
                }
            };

            if urls.is_empty() {
                error!(provider = %self.name, keyword, start, content = %content, "Cannot extract urls");
                return Err(self.failure(start, ProviderFailure::ExtractionFailed));
            }

            // A page never pushes the running total past `take`.
            let room = (take - start).min(take - results.len());
            urls.truncate(room);
            results.extend(urls);

            start += self.config.page_size;
        }

        Ok(results)
    }
}

//! Scan orchestration across providers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::{Host, Url};

use crate::cache::{cache_key, ResultCache};
use crate::{Provider, ProviderScanResult, RadarError, Result, ScanOutcome};

/// What a scan does when one provider fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Any provider failure fails the whole scan.
    #[default]
    FailAll,
    /// A failed provider is reported in its own result; the others still count.
    Isolate,
}

/// Options shared by every scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarOptions {
    /// Number of results requested from each provider.
    #[serde(default = "default_search_depth")]
    pub search_depth: usize,
    /// How long fetched result lists stay cached, in seconds.
    #[serde(default = "default_cache_duration_secs")]
    pub cache_duration_secs: u64,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_search_depth() -> usize {
    100
}

fn default_cache_duration_secs() -> u64 {
    3600
}

impl Default for RadarOptions {
    fn default() -> Self {
        Self {
            search_depth: default_search_depth(),
            cache_duration_secs: default_cache_duration_secs(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl RadarOptions {
    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration_secs)
    }
}

/// Finds where a site ranks across a set of search providers.
pub struct Radar {
    providers: Vec<Arc<dyn Provider>>,
    cache: Arc<dyn ResultCache>,
    options: RadarOptions,
}

impl Radar {
    /// Creates a radar with no providers.
    pub fn new(cache: Arc<dyn ResultCache>, options: RadarOptions) -> Self {
        Self {
            providers: Vec::new(),
            cache,
            options,
        }
    }

    /// Registers a provider. Results follow registration order.
    pub fn add_provider<P: Provider + 'static>(&mut self, provider: P) {
        self.providers.push(Arc::new(provider));
    }

    /// Returns the number of registered providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub fn options(&self) -> &RadarOptions {
        &self.options
    }

    /// Scans every provider concurrently for `keyword` and reports the
    /// positions of `target_site` in each.
    ///
    /// All providers run to completion before this returns. Under
    /// [`FailurePolicy::FailAll`] the first failure in registration order
    /// is returned and no results are.
    pub async fn scan(&self, keyword: &str, target_site: &Url) -> Result<ScanOutcome> {
        if self.providers.is_empty() {
            return Err(RadarError::NoProviders);
        }

        if keyword.trim().is_empty() {
            return Err(RadarError::InvalidArgument(
                "keyword cannot be empty".to_string(),
            ));
        }

        let started = Instant::now();
        debug!(keyword, site = %target_site, "Scanning {} providers", self.providers.len());

        let scans = self
            .providers
            .iter()
            .map(|provider| self.scan_provider(provider.as_ref(), keyword, target_site));
        let outcomes = join_all(scans).await;

        let mut results = Vec::with_capacity(outcomes.len());
        for (provider, outcome) in self.providers.iter().zip(outcomes) {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => match self.options.failure_policy {
                    FailurePolicy::FailAll => return Err(e),
                    FailurePolicy::Isolate => {
                        warn!(provider = provider.name(), error = %e, "Provider failed");
                        results.push(ProviderScanResult::failed(provider.name(), e.to_string()));
                    }
                },
            }
        }

        let mut outcome = ScanOutcome::new(results);
        outcome.set_duration(started.elapsed().as_millis() as u64);
        Ok(outcome)
    }

    async fn scan_provider(
        &self,
        provider: &dyn Provider,
        keyword: &str,
        target_site: &Url,
    ) -> Result<ProviderScanResult> {
        let key = cache_key(keyword, provider.name());

        let mut urls = self.cache.get(&key).await;
        if urls.is_empty() {
            debug!(provider = provider.name(), keyword, "Cache miss");
            urls = provider.query(keyword, self.options.search_depth).await?;
            self.cache
                .set(&key, urls.clone(), self.options.cache_duration())
                .await;
        } else {
            debug!(provider = provider.name(), keyword, "Cache hit with {} urls", urls.len());
        }

        // Cached lists may come from a deeper scan; providers may over-return.
        urls.truncate(self.options.search_depth);

        Ok(ProviderScanResult::new(
            provider.name(),
            positions_of(&urls, target_site),
        ))
    }
}

/// Returns the 1-based positions in `urls` that point at `target_site`.
///
/// Entries that do not parse as absolute URLs never match.
pub fn positions_of(urls: &[String], target_site: &Url) -> Vec<usize> {
    let target = comparable_form(target_site);

    urls.iter()
        .enumerate()
        .filter_map(|(i, raw)| match Url::parse(raw) {
            Ok(url) => comparable_form(&url)
                .eq_ignore_ascii_case(&target)
                .then_some(i + 1),
            Err(e) => {
                debug!(url = %raw, error = %e, "Skipping unparseable result url");
                None
            }
        })
        .collect()
}

/// Returns true if both addresses name the same host, path and query.
///
/// Comparison ignores case, scheme, port and fragment. Paths are not
/// otherwise normalized, so `/about` and `/about/` differ.
pub fn site_matches(a: &Url, b: &Url) -> bool {
    comparable_form(a).eq_ignore_ascii_case(&comparable_form(b))
}

fn comparable_form(url: &Url) -> String {
    let mut form = match url.host() {
        Some(Host::Ipv6(addr)) => addr.to_string(),
        Some(host) => host.to_string(),
        None => String::new(),
    };
    form.push_str(url.path());
    if let Some(query) = url.query() {
        form.push('?');
        form.push_str(query);
    }
    form
}

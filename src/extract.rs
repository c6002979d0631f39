//! Bounded-time URL extraction from result pages.

use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tokio::task;
use tokio::time::timeout;

use crate::{ProviderFailure, RadarError, Result};

/// Pulls result URLs out of a page with a configured pattern.
///
/// The pattern's first capturing group is the URL. Matching runs on the
/// blocking pool under a wall-clock deadline; once the deadline passes the
/// caller gets [`ProviderFailure::ExtractionTimeout`] and the worker thread
/// is left to finish on its own.
#[derive(Debug, Clone)]
pub struct UrlExtractor {
    pattern: Arc<Regex>,
    budget: Duration,
}

impl UrlExtractor {
    /// Compiles `pattern`, which must contain at least one capturing group.
    pub fn new(pattern: &str, budget: Duration) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| RadarError::Config(format!("invalid extraction pattern: {}", e)))?;

        // captures_len counts the implicit whole-match group
        if regex.captures_len() < 2 {
            return Err(RadarError::Config(
                "extraction pattern must contain a capturing group".to_string(),
            ));
        }

        Ok(Self {
            pattern: Arc::new(regex),
            budget,
        })
    }

    /// Extracts URLs in document order.
    ///
    /// An empty vector means the pattern matched nothing; deciding whether
    /// that is an error is left to the caller.
    pub async fn extract(&self, content: &str) -> std::result::Result<Vec<String>, ProviderFailure> {
        let pattern = Arc::clone(&self.pattern);
        let content: Arc<str> = Arc::from(content);

        let matching = task::spawn_blocking(move || capture_urls(&pattern, &content));

        match timeout(self.budget, matching).await {
            Ok(Ok(urls)) => Ok(urls),
            Ok(Err(_)) => Err(ProviderFailure::ExtractionFailed),
            Err(_) => Err(ProviderFailure::ExtractionTimeout),
        }
    }
}

fn capture_urls(pattern: &Regex, content: &str) -> Vec<String> {
    pattern
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

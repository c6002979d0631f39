//! Scan result types.

use serde::{Deserialize, Serialize};

/// Where the target site ranked in one provider's results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderScanResult {
    /// Provider name.
    pub provider: String,
    /// 1-based positions of the target site, ascending.
    pub indices: Vec<usize>,
    /// Failure message when the provider failed and failures are isolated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProviderScanResult {
    pub fn new(provider: impl Into<String>, indices: Vec<usize>) -> Self {
        Self {
            provider: provider.into(),
            indices,
            error: None,
        }
    }

    /// A result standing in for a provider that failed.
    pub fn failed(provider: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            indices: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Returns true if the target site appeared at least once.
    pub fn is_found(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Results of one scan, one entry per provider in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanOutcome {
    results: Vec<ProviderScanResult>,
    /// Scan duration in milliseconds.
    pub duration_ms: u64,
}

impl ScanOutcome {
    pub fn new(results: Vec<ProviderScanResult>) -> Self {
        Self {
            results,
            duration_ms: 0,
        }
    }

    /// Returns the per-provider results.
    pub fn items(&self) -> &[ProviderScanResult] {
        &self.results
    }

    /// Looks up the result for a provider by name.
    pub fn get(&self, provider: &str) -> Option<&ProviderScanResult> {
        self.results.iter().find(|r| r.provider == provider)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Sets the scan duration.
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }
}

impl IntoIterator for ScanOutcome {
    type Item = ProviderScanResult;
    type IntoIter = std::vec::IntoIter<ProviderScanResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

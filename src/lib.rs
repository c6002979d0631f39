//! # site-radar
//!
//! Finds where a website ranks in the result pages of several search
//! engines for a keyword.
//!
//! A [`Radar`] fans one scan out to every registered [`Provider`]
//! concurrently, serves repeated keywords from a [`ResultCache`], and
//! reports the 1-based positions at which the target site appears among
//! each provider's first results.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use site_radar::{engines::{Bing, Google}, MemoryCache, Radar, RadarOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut radar = Radar::new(Arc::new(MemoryCache::new()), RadarOptions::default());
//!     radar.add_provider(Google::new(Google::default_config())?);
//!     radar.add_provider(Bing::new(Bing::default_config())?);
//!
//!     let site = url::Url::parse("https://www.rust-lang.org")?;
//!     let outcome = radar.scan("rust programming", &site).await?;
//!
//!     for result in outcome.items() {
//!         println!("{}: {:?}", result.provider, result.indices);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod extract;
mod fetcher;
mod fetcher_http;
mod radar;
mod result;

pub mod cache;
pub mod engines;
pub mod provider;
pub mod settings;

pub use cache::{MemoryCache, ResultCache};
pub use error::{ProviderFailure, RadarError, Result};
pub use extract::UrlExtractor;
pub use fetcher::PageFetcher;
pub use fetcher_http::HttpFetcher;
pub use provider::{PagedProvider, Provider, ProviderConfig};
pub use radar::{positions_of, site_matches, FailurePolicy, Radar, RadarOptions};
pub use result::{ProviderScanResult, ScanOutcome};
pub use settings::RadarSettings;

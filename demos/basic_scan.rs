//! Example: scan Google and Bing for where a site ranks.

use std::sync::Arc;

use site_radar::{
    engines::{Bing, Google},
    FailurePolicy, MemoryCache, Radar, RadarOptions,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let options = RadarOptions {
        search_depth: 50,
        failure_policy: FailurePolicy::Isolate,
        ..Default::default()
    };
    let mut radar = Radar::new(Arc::new(MemoryCache::new()), options);
    radar.add_provider(Google::new(Google::default_config())?);
    radar.add_provider(Bing::new(Bing::default_config())?);

    println!("Configured {} search engines", radar.provider_count());

    let site = url::Url::parse("https://www.rust-lang.org")?;
    let outcome = radar.scan("rust programming language", &site).await?;

    println!("Scanned in {}ms", outcome.duration_ms);
    for result in outcome.items() {
        match &result.error {
            Some(error) => println!("{}: failed ({})", result.provider, error),
            None if result.indices.is_empty() => println!("{}: not in top 50", result.provider),
            None => println!("{}: {:?}", result.provider, result.indices),
        }
    }

    Ok(())
}

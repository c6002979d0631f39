//! site-radar CLI - reports where a site ranks for a keyword.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use url::Url;

use site_radar::{
    engines::{Bing, Google},
    FailurePolicy, MemoryCache, ProviderScanResult, Radar, RadarSettings, ScanOutcome,
};

/// site-radar - search engine ranking monitor
#[derive(Parser)]
#[command(name = "site-radar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find where a site ranks for a keyword
    Scan(ScanArgs),

    /// List built-in search engines
    Engines,
}

#[derive(Parser)]
struct ScanArgs {
    /// Keyword to search for
    keyword: String,

    /// Web address to look for (https:// is assumed when no scheme is given)
    site: String,

    /// Search engines to scan (comma-separated)
    /// Available: google, bing
    #[arg(short, long, value_delimiter = ',')]
    engines: Option<Vec<String>>,

    /// Number of results to inspect per engine
    #[arg(short, long)]
    depth: Option<usize>,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report failing engines individually instead of failing the scan
    #[arg(long)]
    isolate: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else if std::env::var_os("RUST_LOG").is_some() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    match cli.command {
        Commands::Scan(args) => run_scan(args).await,
        Commands::Engines => list_engines(),
    }
}

fn list_engines() -> Result<()> {
    println!("Available search engines:\n");
    println!("    google   - Google Search");
    println!("    bing     - Bing");
    println!();
    println!("Usage: site-radar scan \"keyword\" www.example.com -e google,bing");
    Ok(())
}

async fn run_scan(args: ScanArgs) -> Result<()> {
    let mut settings = match &args.config {
        Some(path) => RadarSettings::from_file(path)?,
        None => RadarSettings::default(),
    };
    if let Some(depth) = args.depth {
        settings.radar.search_depth = depth;
    }
    if args.isolate {
        settings.radar.failure_policy = FailurePolicy::Isolate;
    }
    settings.validate()?;

    let site = match parse_site(&args.site) {
        Some(site) => site,
        None => {
            eprintln!("Invalid web address.");
            std::process::exit(2);
        }
    };

    let mut radar = Radar::new(Arc::new(MemoryCache::new()), settings.radar.clone());

    let engine_names: Vec<String> = args
        .engines
        .unwrap_or_else(|| vec!["google".to_string(), "bing".to_string()]);

    for name in &engine_names {
        match name.as_str() {
            "google" | "g" => radar.add_provider(Google::new(settings.google.clone())?),
            "bing" | "b" => radar.add_provider(Bing::new(settings.bing.clone())?),
            _ => {
                eprintln!("Warning: Unknown engine '{}', skipping", name);
            }
        }
    }

    if radar.provider_count() == 0 {
        anyhow::bail!("No valid engines specified");
    }

    let outcome = match radar.scan(&args.keyword, &site).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("An error occurred while scanning search engines: {}", e);
            std::process::exit(1);
        }
    };

    match args.format {
        OutputFormat::Text => print_text(&args.keyword, &site, settings.radar.search_depth, &outcome),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }

    Ok(())
}

fn print_text(keyword: &str, site: &Url, depth: usize, outcome: &ScanOutcome) {
    println!(
        "\nRanking of {} for \"{}\" (top {} results, {}ms):\n",
        site, keyword, depth, outcome.duration_ms
    );

    for result in outcome.items() {
        println!("  {}", result_line(result));
    }
    println!();
}

/// Formats one provider's result as `Name: 3, 17` or `Name: not found`.
fn result_line(result: &ProviderScanResult) -> String {
    let positions = if let Some(error) = &result.error {
        format!("error: {}", error)
    } else if result.indices.is_empty() {
        "not found".to_string()
    } else {
        result
            .indices
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("{}: {}", result.provider, positions)
}

/// Parses a user-supplied web address, assuming https when no scheme is given.
fn parse_site(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let lower = raw.to_ascii_lowercase();
    let address = if lower.starts_with("http://") || lower.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    Url::parse(&address).ok().filter(|url| url.host().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_site_adds_https() {
        let site = parse_site("www.sympli.com.au").unwrap();
        assert_eq!(site.as_str(), "https://www.sympli.com.au/");
    }

    #[test]
    fn test_parse_site_keeps_scheme() {
        let site = parse_site("HTTP://example.com/page").unwrap();
        assert_eq!(site.scheme(), "http");
        assert_eq!(site.path(), "/page");
    }

    #[test]
    fn test_parse_site_rejects_garbage() {
        assert!(parse_site("").is_none());
        assert!(parse_site("   ").is_none());
        assert!(parse_site("http://").is_none());
        assert!(parse_site("exa mple.com").is_none());
    }

    #[test]
    fn test_result_line_formats() {
        assert_eq!(
            result_line(&ProviderScanResult::new("Google", vec![3, 17])),
            "Google: 3, 17"
        );
        assert_eq!(
            result_line(&ProviderScanResult::new("Bing", vec![])),
            "Bing: not found"
        );
        assert_eq!(
            result_line(&ProviderScanResult::failed("Bing", "timed out".to_string())),
            "Bing: error: timed out"
        );
    }

    #[test]
    fn test_cli_parses_scan() {
        let cli = Cli::try_parse_from([
            "site-radar",
            "scan",
            "e-settlement",
            "www.sympli.com.au",
            "-e",
            "google,bing",
            "-d",
            "50",
            "--isolate",
        ])
        .unwrap();
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.keyword, "e-settlement");
                assert_eq!(args.engines.unwrap(), vec!["google", "bing"]);
                assert_eq!(args.depth, Some(50));
                assert!(args.isolate);
            }
            Commands::Engines => panic!("Expected scan"),
        }
    }
}

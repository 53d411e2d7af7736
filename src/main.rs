use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cloud_link_checker::config::Config;
use cloud_link_checker::{CheckReport, LinkChecker};

/// Check whether shared Mega, Google Drive and MediaFire links are still online.
#[derive(Debug, Parser)]
#[command(name = "cloud-link-checker", version)]
struct Cli {
    /// Links to check. Read from stdin when neither links nor --file are given.
    links: Vec<String>,

    /// Read links from a file, one per line.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Report unreachable links as unknown instead of stopping.
    #[arg(long)]
    continue_on_error: bool,

    /// Do not verify TLS certificates.
    #[arg(long)]
    insecure: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if cli.continue_on_error {
        config.continue_on_error = true;
    }
    if cli.insecure {
        config.verify_certificate = false;
    }
    config.validate().context("Invalid configuration")?;

    let links = collect_links(&cli)?;
    info!(
        links = links.len(),
        continue_on_error = config.continue_on_error,
        verify_certificate = config.verify_certificate,
        "Checking links"
    );

    let checker = LinkChecker::from_config(&config).context("Failed to build HTTP client")?;
    let report = checker
        .resolve_all(&links, config.continue_on_error)
        .await
        .context("Link check aborted")?;

    print_report(&report, cli.json)
}

fn collect_links(cli: &Cli) -> Result<Vec<String>> {
    let mut links = cli.links.clone();

    if let Some(path) = &cli.file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read links file: {}", path.display()))?;
        links.extend(non_blank_lines(contents.lines().map(str::to_string)));
    }

    if links.is_empty() && cli.file.is_none() {
        let stdin = std::io::stdin().lock();
        let lines = stdin
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .context("Failed to read links from stdin")?;
        links.extend(non_blank_lines(lines));
    }

    Ok(links)
}

fn non_blank_lines(lines: impl IntoIterator<Item = String>) -> impl Iterator<Item = String> {
    lines.into_iter().filter(|l| !l.trim().is_empty())
}

fn print_report(report: &CheckReport, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{out}");
    } else {
        for entry in &report.entries {
            println!("{}\t{}", entry.status, entry.link);
        }
    }
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,cloud_link_checker=info"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    // Logs go to stderr so the report on stdout stays machine readable
    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "cloud-link-checker",
            "--json",
            "--continue-on-error",
            "https://mega.nz/file/xxxxxxxx",
            "https://mega.nz/#!xxxxxxxx",
        ]);
        assert!(cli.json);
        assert!(cli.continue_on_error);
        assert!(!cli.insecure);
        assert_eq!(cli.links.len(), 2);
    }

    #[test]
    fn test_non_blank_lines() {
        let lines = vec![
            "https://mega.nz/file/xxxxxxxx".to_string(),
            "   ".to_string(),
            String::new(),
            "https://www.mediafire.com/folder/xxxxxxxxx".to_string(),
        ];
        assert_eq!(non_blank_lines(lines).count(), 2);
    }
}

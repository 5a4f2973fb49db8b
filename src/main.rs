use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use iptv_catalog::{
    catalog::Catalog,
    config::{Config, defaults::DEFAULT_CONFIG_FILE},
    ingestor::CatalogLoader,
    models::{Progress, SourceUrl},
    observability::init_logging,
    services::{PlayerLauncher, export_playlist},
    sources::{HttpFetcher, group_channels, parse_source_list},
    utils::UrlUtils,
};

#[derive(Parser)]
#[command(name = "iptv-catalog")]
#[command(version)]
#[command(about = "Load IPTV playlists concurrently and browse their channels")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level
    #[arg(short = 'v', long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load playlists and list their channels grouped by category
    List {
        /// Playlist URLs
        urls: Vec<String>,

        /// File with one playlist URL per line ("-" reads stdin)
        #[arg(short, long, value_name = "FILE")]
        sources: Option<PathBuf>,

        /// Only show channels whose name contains this text (case-insensitive)
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Only show this source
        #[arg(long, value_name = "URL")]
        source: Option<String>,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save the raw playlist text of a source to a file
    Export {
        url: String,
        path: PathBuf,
    },

    /// Open a source in the configured external player
    Play { url: String },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = Config::load_from_file(&cli.config)?;
    info!("Configuration resolved from {}", cli.config.display());

    match cli.command {
        Command::List {
            urls,
            sources,
            filter,
            source,
            json,
        } => {
            let mut text = urls.join("\n");
            if let Some(path) = sources {
                text.push('\n');
                text.push_str(&read_source_file(&path).await?);
            }
            let urls = parse_source_list(&text);
            for url in urls.iter().filter(|url| !UrlUtils::is_http_url(url.as_str())) {
                warn!("{} does not look like an http(s) URL", url);
            }

            let catalog = load_catalog(&config, &urls).await?;
            print_catalog(&catalog, &filter, source.map(SourceUrl::from).as_ref(), json)?;
        }
        Command::Export { url, path } => {
            let fetcher = HttpFetcher::new(&config.fetch)?;
            let written = export_playlist(&fetcher, &SourceUrl::from(url), &path).await?;
            if written == 0 {
                eprintln!("Playlist is empty, {} left unchanged", path.display());
            } else {
                eprintln!("Saved {} bytes to {}", written, path.display());
            }
        }
        Command::Play { url } => {
            PlayerLauncher::new(&config.player).launch(&SourceUrl::from(url))?;
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

async fn read_source_file(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("Failed to read source list from stdin")?;
        return Ok(buffer);
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read source list {}", path.display()))
}

/// Run a load with progress on stderr; Ctrl-C cancels it.
async fn load_catalog(config: &Config, urls: &[SourceUrl]) -> Result<Catalog> {
    let loader = CatalogLoader::new(HttpFetcher::new(&config.fetch)?, &config.ingestion);
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<Progress>();
    let cancel = CancellationToken::new();

    let reporter = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            eprintln!(
                "Loaded {} sources ({:.0}%)",
                progress,
                progress.percentage()
            );
        }
    });

    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling load");
            ctrl_c.cancel();
        }
    });

    let mut catalog = Catalog::new();
    let result = loader
        .load_into(&mut catalog, urls, Some(&progress_tx), &cancel)
        .await;
    drop(progress_tx);
    let _ = reporter.await;

    let report = result?;
    if report.all_failed() {
        warn!("None of the {} sources could be loaded", report.total);
    }
    Ok(catalog)
}

fn print_catalog(
    catalog: &Catalog,
    query: &str,
    only: Option<&SourceUrl>,
    json: bool,
) -> Result<()> {
    if let Some(url) = only
        && catalog.get(url).is_none()
    {
        bail!("Source {url} is not part of the loaded catalog");
    }

    let listings: Vec<_> = catalog
        .listings(query)
        .into_iter()
        .filter(|listing| only.is_none_or(|url| url == listing.url))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    for listing in &listings {
        println!("== {} ({} channels)", listing.url, listing.channels.len());
        if listing.failed {
            for channel in &listing.channels {
                println!("  [unavailable] {}", channel.group);
            }
            continue;
        }
        for (group, channels) in group_channels(&listing.channels) {
            for channel in channels {
                println!("  {} - {}", group, channel.name);
            }
        }
    }

    Ok(())
}

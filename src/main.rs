use anyhow::Context;
use clap::Parser;
use listing_scout::export;
use listing_scout::{
    stream_sse, ChannelSink, HttpFetcher, PaginationDriver, ParserRegistry, ProgressEvent,
    RunSummary, ScrapeConfig, ScrapeRequest, HEARTBEAT_INTERVAL,
};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "listing-scout")]
#[command(about = "Scrape paginated listings from books.toscrape.com or quotes.toscrape.com")]
#[command(version)]
struct Args {
    /// Listing URL to start from
    url: String,

    /// Maximum number of pages to visit
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of fetch retries
    #[arg(long)]
    retries: Option<u32>,

    /// Directory for the run's JSON and CSV files
    #[arg(short, long, default_value = "data")]
    out_dir: PathBuf,

    /// Print progress to stdout as server-sent event frames; logs stay on stderr
    #[arg(long)]
    sse: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for the event stream
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ScrapeConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScrapeConfig::default(),
    };
    if let Some(retries) = args.retries {
        config.fetch.retries = retries;
    }

    let request = ScrapeRequest::new(args.url.as_str(), args.pages)?;
    let fetcher = HttpFetcher::new(config.fetch.clone())?;
    let driver = PaginationDriver::new(ParserRegistry::global(), &fetcher, &config);

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling scrape");
                cancel.cancel();
            }
        }
    });

    let (sink, mut events) = ChannelSink::new();
    let reporter = if args.sse {
        tokio::spawn(async move {
            if let Err(e) = stream_sse(events, tokio::io::stdout(), HEARTBEAT_INTERVAL).await {
                warn!(error = %e, "Event stream closed");
            }
        })
    } else {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if let ProgressEvent::Progress { message, percent } = &event {
                    info!("[{percent:>3}%] {message}");
                }
            }
        })
    };

    info!("🔎 Scraping {} ({} page(s) max)", request.seed_url(), request.max_pages());
    let result = driver.run(&request, &sink, &cancel).await;

    // Closing the sink lets the reporter drain and exit
    drop(sink);
    let _ = reporter.await;

    let outcome = result?;
    info!("✅ Scraped {} records", outcome.records.len());

    let summary = RunSummary::new(&request, outcome);
    let files = export::write_run(&args.out_dir, &summary)?;
    info!("💾 Saved {} and {}", files.json.display(), files.csv.display());

    Ok(())
}

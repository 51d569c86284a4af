mod classify;
mod fetch;
mod output;
mod parser;
mod pipeline;
mod record;
mod seeds;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

const DEFAULT_ROOT: &str =
    "https://en.wikipedia.org/wiki/Lists_of_disasters_by_country_and_by_death_toll";
const DEFAULT_CACHE_TTL_SECS: i64 = 7 * 24 * 3600;

#[derive(Parser)]
#[command(name = "disaster_scraper", about = "Disaster event dataset builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover list pages, scrape them, and write the dataset
    Run {
        /// Root index to discover list pages from
        #[arg(long, default_value = DEFAULT_ROOT)]
        url: String,
        /// Output CSV path
        #[arg(short, long, default_value = "disasters.csv")]
        output: PathBuf,
        /// Concurrent page fetches
        #[arg(short, long, default_value = "10")]
        workers: usize,
        /// Max list pages to scrape (default: all discovered)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Page cache directory
        #[arg(long, default_value = ".page_cache")]
        cache_dir: PathBuf,
        /// Cache entry lifetime in seconds
        #[arg(long, default_value_t = DEFAULT_CACHE_TTL_SECS)]
        cache_ttl: i64,
    },
    /// List the pages discovery would scrape, without scraping
    Pages {
        #[arg(long, default_value = DEFAULT_ROOT)]
        url: String,
        #[arg(long, default_value = ".page_cache")]
        cache_dir: PathBuf,
    },
    /// Rebuild the dataset from cached pages, without network access
    Process {
        #[arg(long, default_value = ".page_cache")]
        cache_dir: PathBuf,
        #[arg(short, long, default_value = "disasters.csv")]
        output: PathBuf,
    },
    /// Print the summary for an existing dataset
    Report {
        #[arg(default_value = "disasters.csv")]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            url,
            output,
            workers,
            limit,
            cache_dir,
            cache_ttl,
        } => {
            let fetcher = Arc::new(fetch::Fetcher::new(cache_dir, cache_ttl)?);
            let mut pages = seeds::discover_pages(&fetcher, &url).await?;
            if pages.is_empty() {
                println!("No disaster list pages found under {url}.");
                return Ok(());
            }
            if let Some(n) = limit {
                pages.truncate(n);
            }

            let t_scrape = Instant::now();
            println!("Scraping {} list pages...", pages.len());
            let (raw, stats) = pipeline::scrape_pages(fetcher, pages, workers).await?;
            println!(
                "Scraped {} pages ({} failed, {} raw records) in {:.1}s",
                stats.pages,
                stats.failed_pages,
                stats.raw_records,
                t_scrape.elapsed().as_secs_f64()
            );

            let records = pipeline::merge(raw);
            output::write_csv(&records, &output)?;
            println!("Wrote {} events to {}", records.len(), output.display());
            output::Summary::of(&records).print();
            Ok(())
        }
        Commands::Pages { url, cache_dir } => {
            let fetcher = fetch::Fetcher::new(cache_dir, DEFAULT_CACHE_TTL_SECS)?;
            let pages = seeds::discover_pages(&fetcher, &url).await?;
            for page in &pages {
                println!("{page}");
            }
            println!("\n{} pages", pages.len());
            Ok(())
        }
        Commands::Process { cache_dir, output } => {
            let raw = pipeline::process_cached(&cache_dir)?;
            if raw.is_empty() {
                println!("No cached pages in {}. Run 'run' first.", cache_dir.display());
                return Ok(());
            }
            let records = pipeline::merge(raw);
            output::write_csv(&records, &output)?;
            println!("Wrote {} events to {}", records.len(), output.display());
            output::Summary::of(&records).print();
            Ok(())
        }
        Commands::Report { input } => {
            let records = output::read_csv(&input)?;
            output::Summary::of(&records).print();
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

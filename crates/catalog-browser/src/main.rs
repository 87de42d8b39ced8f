//! Catalog browser CLI application.

use anyhow::{Context, Result};
use catalog_browser::{
    Browser, Explorer, Filters, JikanClient, RatingFilter, ResponseCache, ResultSet,
    SearchPipeline, SearchRequest, SeasonFilter, SortKey, StatusFilter,
};
use clap::{Parser, Subcommand};
use shared::{CatalogDetails, CatalogRecord, Config, MediaType};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Clear cache before running
    #[arg(long)]
    clear_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search anime or manga, then filter and sort the results
    Search {
        /// Free-text query
        query: String,

        /// anime or manga
        #[arg(short = 't', long = "type", default_value = "anime")]
        media_type: MediaType,

        /// score, title, popularity or rank
        #[arg(short, long, default_value = "score")]
        sort: SortKey,

        /// all, airing, complete or upcoming
        #[arg(long, default_value = "all")]
        status: StatusFilter,

        /// all, g, pg, pg13, r17, r or rx (anime only)
        #[arg(long, default_value = "all")]
        rating: RatingFilter,

        /// all, winter, spring, summer or fall (anime only)
        #[arg(long, default_value = "all")]
        season: SeasonFilter,
    },

    /// Show the top 10 anime and manga
    Top,

    /// Show the detail page of one entry
    Details {
        /// anime or manga
        media_type: MediaType,
        /// MyAnimeList ID
        id: u32,
    },

    /// Pick a random entry
    Random {
        /// anime or manga
        #[arg(short = 't', long = "type", default_value = "anime")]
        media_type: MediaType,
    },

    /// List manga magazines
    Magazines,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        shared::logging::parse_level(&config.logging.default_level)
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        component: "catalog-browser".to_string(),
        default_level: log_level,
        console: config.logging.console,
        file: config.logging.file,
        json_format: config.logging.json_format,
    })?;

    info!(config_file = %args.config.display(), "Catalog browser starting");

    // Initialize cache
    let cache_config = &config.catalog.cache;
    let cache = ResponseCache::new(
        config.cache_dir(),
        cache_config.enabled,
        cache_config.expiration_seconds,
    )
    .context("Failed to initialize cache")?;

    if args.clear_cache {
        info!("Clearing cache");
        cache.clear().context("Failed to clear cache")?;
    }

    let cache_stats = cache.stats().context("Failed to get cache stats")?;
    info!(
        cached_files = cache_stats.total_files,
        cache_size_kb = cache_stats.total_size_bytes / 1_000,
        "Cache statistics"
    );

    // Initialize API client
    let client =
        JikanClient::from_config(&config.catalog).context("Failed to create Jikan client")?;

    let browser = Browser::new(
        client,
        cache,
        config.catalog.showcase_size,
        config.catalog.magazine_limit,
    );

    match args.command {
        Command::Search {
            query,
            media_type,
            sort,
            status,
            rating,
            season,
        } => {
            let request = SearchRequest::new(query, media_type)
                .with_filters(Filters {
                    status,
                    rating,
                    season,
                })
                .with_sort(sort);
            run_search(&browser, &request).await;
        }
        Command::Top => match browser.showcase().await {
            Ok(showcase) => {
                print_section("Top Anime", &showcase.top_anime);
                print_section("Top Manga", &showcase.top_manga);
            }
            Err(_) => println!("Failed to fetch data. Please try again later."),
        },
        Command::Details { media_type, id } => match browser.details(media_type, id).await {
            Some(details) => print_details(&details),
            None => println!("Not found: {} {}", media_type, id),
        },
        Command::Random { media_type } => run_random(&browser, media_type).await?,
        Command::Magazines => {
            let magazines = browser.magazines().await;
            if magazines.is_empty() {
                println!("No magazines found");
            }
            for magazine in magazines {
                println!("{:<40} {:>6} entries  {}", magazine.name, magazine.count, magazine.url);
            }
        }
    }

    Ok(())
}

async fn run_search(browser: &Browser, request: &SearchRequest) {
    let pipeline = SearchPipeline::new(browser.client());
    let mut results = ResultSet::default();

    if !results.apply(pipeline.run(request).await) {
        return;
    }

    if results.is_empty() {
        println!("No results found");
        return;
    }

    for record in results.records() {
        println!("{}", format_record(record));
    }
}

async fn run_random(browser: &Browser, media_type: MediaType) -> Result<()> {
    let mut explorer = Explorer::new(browser.client(), media_type);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    explorer.shuffle().await;
    loop {
        if let Some(details) = explorer.content() {
            print_details(details);
            return Ok(());
        }

        if let Some(message) = explorer.error() {
            println!("{}", message);
        }
        println!("Try again? [y/N]");

        let answer = stdin.next_line().await.context("Failed to read answer")?;
        match answer.as_deref().map(str::trim) {
            Some("y") | Some("Y") => {
                explorer.retry().await;
            }
            _ => return Ok(()),
        }
    }
}

fn format_record(record: &CatalogRecord) -> String {
    let score = record
        .score
        .map(|s| format!("{:.2}", s))
        .unwrap_or_else(|| "N/A".to_string());
    let rank = record
        .rank
        .map(|r| r.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "[{:>6}] {:<50} Score: {:<5} #{:<6} {}",
        record.id,
        record.title,
        score,
        rank,
        record.status.as_deref().unwrap_or("")
    )
}

fn print_section(heading: &str, records: &[CatalogRecord]) {
    println!("== {} ==", heading);
    for record in records {
        println!("{}", format_record(record));
    }
    println!();
}

fn print_details(details: &CatalogDetails) {
    let record = &details.record;
    println!("{}", record.title);
    if let Some(english) = &record.title_english {
        println!("  English:  {}", english);
    }
    if let Some(japanese) = &details.title_japanese {
        println!("  Japanese: {}", japanese);
    }
    println!("{}", format_record(record));

    match details.media_type {
        MediaType::Anime => {
            if let Some(episodes) = details.episodes {
                println!("  Episodes: {}", episodes);
            }
            if let Some(duration) = &details.duration {
                println!("  Duration: {}", duration);
            }
            if !details.studios.is_empty() {
                println!("  Studios:  {}", details.studios.join(", "));
            }
            if let Some(rating) = &record.rating {
                println!("  Rating:   {}", rating);
            }
        }
        MediaType::Manga => {
            if let Some(chapters) = details.chapters {
                println!("  Chapters: {}", chapters);
            }
            if let Some(volumes) = details.volumes {
                println!("  Volumes:  {}", volumes);
            }
            if !details.authors.is_empty() {
                println!("  Authors:  {}", details.authors.join(", "));
            }
        }
    }

    if let Some(run) = &details.run {
        println!("  Run:      {}", run);
    }
    if !details.genres.is_empty() {
        println!("  Genres:   {}", details.genres.join(", "));
    }
    if !details.themes.is_empty() {
        println!("  Themes:   {}", details.themes.join(", "));
    }
    if let Some(url) = &record.url {
        println!("  {}", url);
    }
    if let Some(synopsis) = &details.synopsis {
        println!();
        println!("{}", synopsis);
    }
}

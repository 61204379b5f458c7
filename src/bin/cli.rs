//! CLI binary for hnscope.

use clap::{Parser, Subcommand};
use hnscope::hnscope_dirs;
use hnscope::{AppConfig, Session};
use hnscope_search::{CacheManager, FileStore, KeyValueStore, ThumbnailLookup, ThumbnailResolver};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// hnscope: tag-based Hacker News search with link thumbnails.
#[derive(Parser)]
#[command(name = "hnscope", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, env = "HNSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// List saved search tags.
    Tags,

    /// Add search tags, then search and print results.
    Add {
        /// Terms to add. Each becomes one tag.
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Remove search tags, then search again and print results.
    Remove {
        /// Tags to remove.
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Search with the saved tags and print results with thumbnails.
    Search,

    /// Resolve the thumbnail for one page URL.
    Resolve {
        /// Page URL.
        url: String,
    },

    /// Inspect or clear the thumbnail cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Write or print the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a config file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration as TOML.
    Show,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Print cached entries, oldest first.
    Show,
    /// Drop every cached entry.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "hnscope=debug,hnscope_search=debug"
    } else {
        "hnscope=info,hnscope_search=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config_path = cli.config.unwrap_or_else(hnscope_dirs::config_file);
    if let Command::Config {
        action: ConfigAction::Init { force },
    } = cli.command
    {
        AppConfig::init_file(&config_path, force)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let config = AppConfig::load_or_default(&config_path)?;
    config.validate()?;

    match cli.command {
        Command::Tags => list_tags(&config),
        Command::Add { terms } => {
            let mut session = Session::from_config(&config)?;
            if session.add_tags(&terms).await == 0 {
                // Nothing changed, so nothing was queried yet.
                session.refresh().await;
            }
            print_results(&session);
            Ok(())
        }
        Command::Remove { terms } => {
            let mut session = Session::from_config(&config)?;
            if session.remove_tags(&terms).await == 0 {
                eprintln!("No matching tags.");
                session.refresh().await;
            }
            print_results(&session);
            Ok(())
        }
        Command::Search => {
            let mut session = Session::from_config(&config)?;
            session.refresh().await;
            print_results(&session);
            Ok(())
        }
        Command::Resolve { url } => resolve(&config, &url).await,
        Command::Cache { action } => cache(&config, action),
        Command::Config { .. } => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn list_tags(config: &AppConfig) -> anyhow::Result<()> {
    let session = Session::from_config(config)?;
    if session.tags().is_empty() {
        println!("No saved tags.");
    }
    for tag in session.tags().iter() {
        println!("{tag}");
    }
    Ok(())
}

fn print_results<L: ThumbnailLookup>(session: &Session<L>) {
    if session.tags().is_empty() {
        println!("No saved tags. Add some with `hnscope add <TERM>...`.");
        return;
    }

    let tags: Vec<&str> = session.tags().iter().collect();
    println!("Tags: {}", tags.join(", "));

    if session.results().is_empty() {
        println!("No results.");
        return;
    }

    for (i, hit) in session.results().iter().enumerate() {
        println!("{}. {}", i + 1, hit.title);
        if let Some(link) = hit.link() {
            println!("   {link}");
        }
        if hit.has_thumbnail_slot() {
            match hit.link().and_then(|url| session.thumbnails().get(url)) {
                Some(image) => println!("   thumbnail: {image}"),
                None => println!("   thumbnail: none"),
            }
        }
        let words = hit.matched_words();
        if !words.is_empty() {
            println!("   matched: {}", words.join(", "));
        }
    }
}

async fn resolve(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let resolver = ThumbnailResolver::new(&config.thumbnails)?;
    match resolver.resolve_thumbnail(url).await {
        Some(thumb) => println!("{} ({})", thumb.url, thumb.source),
        None => println!("none"),
    }
    Ok(())
}

fn cache(config: &AppConfig, action: CacheAction) -> anyhow::Result<()> {
    let store: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::new(config.storage.resolved_data_dir()));
    let resolver = ThumbnailResolver::new(&config.thumbnails)?;
    let manager = CacheManager::new(resolver, store, config.thumbnails.max_cached_entries);

    match action {
        CacheAction::Show => {
            let map = manager.load();
            if map.is_empty() {
                println!("Thumbnail cache is empty.");
            }
            for (url, image) in map.iter() {
                println!("{url} -> {}", image.unwrap_or("null"));
            }
        }
        CacheAction::Clear => {
            manager.clear()?;
            println!("Thumbnail cache cleared.");
        }
    }
    Ok(())
}

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use content_curator::{
    AgentClientConfig, ArticleScraper, ContentPipeline, CuratorService, FeedFetcher, FetchConfig,
    HttpAgentClient, PostCategory, Store,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "content-curator", about = "RSS curation and post generation")]
struct Cli {
    /// Path of the JSON data file.
    #[arg(long, default_value = "curator-data.json")]
    data: PathBuf,

    /// Base URL of the agent orchestration server.
    #[arg(long, default_value = "http://localhost:4112")]
    agent_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch every active source once and store the new items.
    Fetch,
    /// Print source and feed-item statistics.
    Stats,
    /// Generate posts from stored news, a scraped article or pasted text.
    Generate {
        #[arg(long, default_value = "tech")]
        category: String,
        /// "multi" for one post per selected item, "single" for one
        /// polished post with alternatives.
        #[arg(long, default_value = "multi")]
        mode: String,
        /// Generate from a scraped article instead of stored news.
        #[arg(long, conflicts_with = "text")]
        url: Option<String>,
        /// Generate from raw text instead of stored news.
        #[arg(long)]
        text: Option<String>,
    },
    /// Scrape one article and generate three posts from it.
    Scrape { url: String },
    /// Run the periodic refresh loop.
    Watch {
        #[arg(long, default_value_t = 60)]
        interval_mins: u64,
    },
}

fn parse_category(s: &str) -> anyhow::Result<PostCategory> {
    match s {
        "tech" => Ok(PostCategory::Tech),
        "business" => Ok(PostCategory::Business),
        "personal" => Ok(PostCategory::Personal),
        other => bail!("unknown category: {} (expected tech, business or personal)", other),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let store = Store::open(&cli.data).context("opening data store")?;
    let fetcher = FeedFetcher::new(FetchConfig::default());
    let scraper = ArticleScraper::new();

    let agent_config = AgentClientConfig {
        base_url: cli.agent_url.clone(),
        ..Default::default()
    };
    let analyzer = Arc::new(HttpAgentClient::new("newsAnalyzer", agent_config.clone()));
    let creator = Arc::new(HttpAgentClient::new("contentCreator", agent_config));
    let pipeline = ContentPipeline::new(analyzer, creator);

    let mut service = CuratorService::new(store, fetcher, scraper, pipeline);

    match cli.command {
        Command::Fetch => {
            let summary = service.refresh_sources().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Stats => {
            let sources = service.store().source_stats();
            let items = service.store().feed_item_stats();
            println!("{}", serde_json::to_string_pretty(&sources)?);
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Command::Generate {
            category,
            mode,
            url,
            text,
        } => {
            if let Some(url) = url {
                let bundles = service.generate_content_from_article(&url).await?;
                println!("{}", serde_json::to_string_pretty(&bundles)?);
            } else if let Some(text) = text {
                let bundles = service.generate_content_from_text(&text).await?;
                println!("{}", serde_json::to_string_pretty(&bundles)?);
            } else {
                let category = parse_category(&category)?;
                match mode.as_str() {
                    "multi" => {
                        let posts = service.generate_content_from_news(category).await?;
                        info!("Generated {} posts", posts.len());
                        println!("{}", serde_json::to_string_pretty(&posts)?);
                    }
                    "single" => {
                        let bundle = service.generate_single_from_news(category).await?;
                        println!("{}", serde_json::to_string_pretty(&bundle)?);
                    }
                    other => bail!("unknown mode: {} (expected multi or single)", other),
                }
            }
        }
        Command::Scrape { url } => {
            let bundles = service.generate_content_from_article(&url).await?;
            println!("{}", serde_json::to_string_pretty(&bundles)?);
        }
        Command::Watch { interval_mins } => {
            info!("Auto-update every {} minutes", interval_mins);
            service
                .run_auto_update(Duration::from_secs(interval_mins * 60))
                .await?;
        }
    }

    Ok(())
}

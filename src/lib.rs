pub mod agent;
pub mod catalog;
pub mod extract;
pub mod fetcher;
pub mod pipeline;
pub mod scoring;
pub mod scraper;
pub mod service;
pub mod store;
pub mod types;

pub use agent::{Agent, AgentClientConfig, AgentMessage, AgentReply, HttpAgentClient, MockAgent};
pub use fetcher::{FeedFetcher, FetchConfig};
pub use pipeline::ContentPipeline;
pub use scraper::ArticleScraper;
pub use service::{CuratorService, RefreshSummary};
pub use store::Store;
pub use types::*;

pub mod crawler;
pub mod error;
pub mod fetcher;
pub mod graph;

pub use crawler::{Crawler, ProgressCallback, get_followers};
pub use error::CrawlError;
pub use fetcher::{FollowerFetcher, GitHubFetcher};
pub use graph::{FollowerGraph, FollowerNode};

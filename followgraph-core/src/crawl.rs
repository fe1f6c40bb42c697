use crate::config::CrawlLimits;
use followgraph_scanner::error::Result;
use followgraph_scanner::{Crawler, FollowerFetcher, FollowerGraph};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub username: String,
    pub limits: CrawlLimits,
    pub workers: usize,
    pub deadline: Option<Duration>,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            limits: CrawlLimits::default(),
            workers: 1,
            deadline: None,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Execute a crawl with the given options and return the follower graph
pub async fn execute_crawl(
    fetcher: Arc<dyn FollowerFetcher>,
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<FollowerGraph> {
    let CrawlOptions {
        username,
        limits,
        workers,
        deadline,
        show_progress_bars,
    } = options;

    debug!(
        "Crawl options for {}: {:?}, {} worker(s), deadline {:?}",
        username, limits, workers, deadline
    );

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Crawling followers of {}...", username));
        Some(Arc::new(pb))
    } else {
        None
    };

    let fetched_count = Arc::new(AtomicUsize::new(0));

    let count_clone = fetched_count.clone();
    let pb_clone = progress_bar.clone();
    let internal_progress_callback: followgraph_scanner::ProgressCallback =
        Arc::new(move |level: usize, user: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!("Level {}: {} ({} fetched)", level, user, count));
            }
            if let Some(ref callback) = progress_callback {
                callback(format!("[level {}] fetching {}", level, user));
            }
        });

    let mut crawler = Crawler::new(fetcher)
        .with_max_nodes(limits.max_followers)
        .with_max_depth(limits.max_depth)
        .with_workers(workers)
        .with_progress_callback(internal_progress_callback);
    if let Some(deadline) = deadline {
        crawler = crawler.with_deadline(deadline);
    }

    let result = crawler.crawl(&username).await;

    if let Some(ref pb) = progress_bar {
        let total = fetched_count.load(Ordering::Relaxed);
        match result {
            Ok(ref graph) => pb.finish_with_message(format!(
                "Crawl complete! {} users fetched, {} admitted",
                total,
                graph.len()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}

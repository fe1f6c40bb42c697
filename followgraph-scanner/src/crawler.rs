use crate::error::{CrawlError, Result};
use crate::fetcher::FollowerFetcher;
use crate::graph::{FollowerGraph, FollowerNode};
use futures::stream::{self, StreamExt};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Called with `(level, username)` right before each fetch.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Bounded breadth-first crawler over follower lists.
///
/// Usernames are fetched level by level. A login discovered while fetching
/// level `L` is admitted with depth `L` and fetched at level `L + 1`, so the
/// root's direct followers have depth 0 and nothing deeper than `max_depth`
/// is ever admitted or fetched. Once `max_nodes` users are admitted the
/// crawl ends with the level in progress; nodes admitted on that level keep
/// empty follower lists. Each crawl owns its own state; a `Crawler`
/// can be reused for any number of independent crawls.
pub struct Crawler {
    fetcher: Arc<dyn FollowerFetcher>,
    max_nodes: usize,
    max_depth: usize,
    workers: usize,
    deadline: Option<Duration>,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn FollowerFetcher>) -> Self {
        Self {
            fetcher,
            max_nodes: 100,
            max_depth: 4,
            workers: 1,
            deadline: None,
            progress_callback: None,
        }
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Fetches in flight per level. `1` keeps the crawl strictly sequential.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Overall time budget for one crawl; expiry aborts it as a fetch failure.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub async fn crawl(&self, root: &str) -> Result<FollowerGraph> {
        if root.is_empty() {
            return Err(CrawlError::InvalidInput("expected username".to_string()));
        }

        info!(
            "Starting crawl of {} (max nodes {}, max depth {}, {} worker(s))",
            root, self.max_nodes, self.max_depth, self.workers
        );

        let outcome = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.traverse(root))
                .await
                .unwrap_or_else(|_| {
                    Err(CrawlError::FetchFailed(format!(
                        "crawl of {} exceeded deadline of {:?}",
                        root, deadline
                    )))
                }),
            None => self.traverse(root).await,
        };

        match outcome {
            Ok(graph) => {
                info!("Crawl of {} complete. Admitted {} users", root, graph.len());
                Ok(graph)
            }
            Err(e) => {
                warn!("Crawl of {} aborted: {}", root, e);
                Err(e)
            }
        }
    }

    async fn traverse(&self, root: &str) -> Result<FollowerGraph> {
        let mut graph = FollowerGraph::new();
        // Marked on enqueue, so nobody is queued or fetched twice.
        let mut visited: HashSet<String> = HashSet::from([root.to_string()]);
        let mut frontier: VecDeque<String> = VecDeque::from([root.to_string()]);
        // Kept aside in case the root turns up as someone's follower later.
        let mut root_followers: Option<Vec<String>> = None;
        let mut level = 0;

        while !frontier.is_empty() && level <= self.max_depth {
            let batch: Vec<String> = frontier.drain(..).collect();
            debug!("Level {}: fetching {} user(s)", level, batch.len());

            let fetched = self.fetch_level(&batch, level).await?;

            for (username, followers) in batch.into_iter().zip(fetched) {
                for login in &followers {
                    if graph.len() >= self.max_nodes {
                        break;
                    }
                    if graph.contains(login) {
                        continue;
                    }

                    let node = if login == root {
                        match root_followers {
                            Some(ref list) => FollowerNode::with_followers(level, list.clone()),
                            None => FollowerNode::new(level),
                        }
                    } else {
                        FollowerNode::new(level)
                    };
                    debug!("Admitted {} at depth {}", login, level);
                    graph.insert(login.clone(), node);

                    if visited.insert(login.clone()) {
                        frontier.push_back(login.clone());
                    }
                }

                if username == root {
                    root_followers = Some(followers.clone());
                }
                if let Some(node) = graph.get_mut(&username) {
                    node.followers = followers;
                }
            }

            if graph.len() >= self.max_nodes {
                debug!(
                    "Node cap of {} reached at level {}; {} queued user(s) dropped",
                    self.max_nodes,
                    level,
                    frontier.len()
                );
                frontier.clear();
                break;
            }

            level += 1;
        }

        if !frontier.is_empty() {
            debug!(
                "Depth cap reached; {} queued user(s) left unfetched",
                frontier.len()
            );
        }

        Ok(graph)
    }

    /// Fetches one level, returning follower lists in `batch` order.
    ///
    /// Up to `workers` requests run at once. The first failure drops every
    /// fetch still in flight and is returned as-is.
    async fn fetch_level(&self, batch: &[String], level: usize) -> Result<Vec<Vec<String>>> {
        let mut slots: Vec<Option<Vec<String>>> = vec![None; batch.len()];

        let mut in_flight = stream::iter(batch.iter().cloned().enumerate())
            .map(|(idx, username)| {
                if let Some(ref callback) = self.progress_callback {
                    callback(level, username.clone());
                }
                let fetcher = self.fetcher.clone();
                async move { (idx, fetcher.fetch_followers(&username).await) }
            })
            .buffer_unordered(self.workers);

        while let Some((idx, result)) = in_flight.next().await {
            match result {
                Ok(followers) => slots[idx] = Some(followers),
                Err(e) => {
                    warn!("Fetch of {} failed at level {}: {}", batch[idx], level, e);
                    return Err(e);
                }
            }
        }

        Ok(slots.into_iter().map(Option::unwrap_or_default).collect())
    }
}

/// Crawls the follower graph of `username` with a fresh sequential crawler.
pub async fn get_followers(
    fetcher: Arc<dyn FollowerFetcher>,
    username: &str,
    max_follower_count: usize,
    max_depth: usize,
) -> Result<FollowerGraph> {
    Crawler::new(fetcher)
        .with_max_nodes(max_follower_count)
        .with_max_depth(max_depth)
        .crawl(username)
        .await
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One admitted user in a follower graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerNode {
    /// Edges from the crawl root; the root's direct followers are depth 0.
    pub depth: usize,
    /// Direct followers in API response order. Empty until the node is fetched.
    pub followers: Vec<String>,
}

impl FollowerNode {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            followers: Vec::new(),
        }
    }

    pub fn with_followers(depth: usize, followers: Vec<String>) -> Self {
        Self { depth, followers }
    }
}

/// Login -> node mapping produced by a single crawl.
///
/// Serializes as a plain JSON object keyed by login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FollowerGraph {
    nodes: HashMap<String, FollowerNode>,
}

impl FollowerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, login: &str) -> bool {
        self.nodes.contains_key(login)
    }

    pub fn get(&self, login: &str) -> Option<&FollowerNode> {
        self.nodes.get(login)
    }

    pub(crate) fn get_mut(&mut self, login: &str) -> Option<&mut FollowerNode> {
        self.nodes.get_mut(login)
    }

    pub(crate) fn insert(&mut self, login: String, node: FollowerNode) {
        self.nodes.insert(login, node);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FollowerNode)> {
        self.nodes.iter()
    }

    /// Deepest depth present, `None` for an empty graph.
    pub fn max_depth(&self) -> Option<usize> {
        self.nodes.values().map(|node| node.depth).max()
    }

    /// Total number of recorded follower edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.followers.len()).sum()
    }

    /// Logins sorted by (depth, login), for stable output.
    pub fn sorted_logins(&self) -> Vec<&String> {
        let mut logins: Vec<&String> = self.nodes.keys().collect();
        logins.sort_by(|a, b| {
            let da = self.nodes[*a].depth;
            let db = self.nodes[*b].depth;
            da.cmp(&db).then_with(|| a.cmp(b))
        });
        logins
    }

    pub fn into_inner(self) -> HashMap<String, FollowerNode> {
        self.nodes
    }
}

impl From<HashMap<String, FollowerNode>> for FollowerGraph {
    fn from(nodes: HashMap<String, FollowerNode>) -> Self {
        Self { nodes }
    }
}

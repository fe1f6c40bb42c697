// Report generation from a crawled follower graph

use followgraph_scanner::FollowerGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub total_users: usize,
    pub total_edges: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deepest_level: Option<usize>,
    pub users_with_followers: usize,
    /// Admitted users per depth, keyed by depth.
    pub users_per_depth: BTreeMap<usize, usize>,
}

impl GraphSummary {
    pub fn from_graph(graph: &FollowerGraph) -> Self {
        let mut users_per_depth = BTreeMap::new();
        for (_, node) in graph.iter() {
            *users_per_depth.entry(node.depth).or_insert(0) += 1;
        }

        Self {
            total_users: graph.len(),
            total_edges: graph.edge_count(),
            deepest_level: graph.max_depth(),
            users_with_followers: graph.iter().filter(|(_, n)| !n.followers.is_empty()).count(),
            users_per_depth,
        }
    }
}

pub fn generate_report(
    root: &str,
    graph: &FollowerGraph,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(root, graph)),
        ReportFormat::Json => generate_json_report(root, graph),
    }
}

pub fn generate_text_report(root: &str, graph: &FollowerGraph) -> String {
    let summary = GraphSummary::from_graph(graph);
    let mut report = String::new();

    // Header
    report.push_str(RULE);
    report.push('\n');
    report.push_str("                         FOLLOWGRAPH FOLLOWER REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Root:         {}\n", root));
    report.push_str(&format!("Users:        {}\n", summary.total_users));
    report.push_str(&format!("Edges:        {}\n", summary.total_edges));
    match summary.deepest_level {
        Some(depth) => report.push_str(&format!("Deepest:      {}\n", depth)),
        None => report.push_str("Deepest:      -\n"),
    }
    report.push_str(&format!("Fetched with followers: {}\n", summary.users_with_followers));
    report.push('\n');

    if graph.is_empty() {
        report.push_str("No followers found.\n\n");
    } else {
        for (depth, count) in &summary.users_per_depth {
            report.push_str(RULE);
            report.push('\n');
            report.push_str(&format!("DEPTH {} ({} users)\n", depth, count));
            report.push_str(RULE);
            report.push_str("\n\n");

            for login in graph.sorted_logins() {
                let Some(node) = graph.get(login) else {
                    continue;
                };
                if node.depth != *depth {
                    continue;
                }
                if node.followers.is_empty() {
                    report.push_str(&format!("  {}\n", login));
                } else {
                    report.push_str(&format!(
                        "  {} <- {}\n",
                        login,
                        node.followers.join(", ")
                    ));
                }
            }
            report.push('\n');
        }
    }

    // Footer
    report.push_str(RULE);
    report.push('\n');
    report.push_str("                                End of Report\n");
    report.push_str(RULE);
    report.push('\n');

    report
}

pub fn generate_json_report(
    root: &str,
    graph: &FollowerGraph,
) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "followgraph",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "root": root,
            "summary": GraphSummary::from_graph(graph),
            "graph": graph
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub mod commands;
pub mod handlers;
pub mod server;

// Re-export commonly used handler functions for convenience
pub use handlers::{expand_output_path, normalize_username};

pub use server::{AppState, ErrorResponse, build_router, serve};

// Re-export crawl functionality from followgraph-core
pub use followgraph_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
pub use followgraph_core::report::{ReportFormat, generate_report};

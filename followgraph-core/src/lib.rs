pub mod config;
pub mod crawl;
pub mod report;

pub use config::{CrawlLimits, ServerConfig};
pub use crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
pub use report::{GraphSummary, ReportFormat};

const BANNER: &str = r#"
  __       _ _                                       _
 / _| ___ | | | _____      ____ _ _ __ __ _ _ __ | |__
| |_ / _ \| | |/ _ \ \ /\ / / _` | '__/ _` | '_ \| '_ \
|  _| (_) | | | (_) \ V  V / (_| | | | (_| | |_) | | | |
|_|  \___/|_|_|\___/ \_/\_/ \__, |_|  \__,_| .__/|_| |_|
                            |___/          |_|
"#;

pub fn print_banner() {
    println!("{}", BANNER);
    println!("  followgraph v{}\n", env!("CARGO_PKG_VERSION"));
}

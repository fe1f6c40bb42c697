use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use followgraph_core::config::{CrawlLimits, GitHubConfig, ServerConfig};
use followgraph_core::crawl::{CrawlOptions, execute_crawl};
use followgraph_core::report::{ReportFormat, generate_report, save_report};
use followgraph_scanner::CrawlError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// Helper functions for the command handlers

/// Accepts `login`, `@login` or a profile URL and returns the bare login.
pub fn normalize_username(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.");

    let login = match without_scheme.strip_prefix("github.com/") {
        Some(path) => path.split('/').next().unwrap_or(""),
        None => without_scheme.trim_start_matches('@'),
    };

    if login.is_empty() {
        None
    } else {
        Some(login.to_string())
    }
}

/// Expands a leading `~` in a user-supplied output path.
pub fn expand_output_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Installs the global subscriber; `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn limits_from_args(args: &ArgMatches) -> CrawlLimits {
    let defaults = CrawlLimits::default();
    CrawlLimits {
        max_followers: args
            .get_one::<usize>("max-followers")
            .copied()
            .unwrap_or(defaults.max_followers),
        max_depth: args
            .get_one::<usize>("max-depth")
            .copied()
            .unwrap_or(defaults.max_depth),
    }
}

pub fn github_config_from_args(args: &ArgMatches) -> GitHubConfig {
    let defaults = GitHubConfig::default();
    GitHubConfig {
        base_url: args
            .get_one::<String>("github-url")
            .cloned()
            .unwrap_or(defaults.base_url),
        token: args.get_one::<String>("token").cloned(),
        timeout_secs: args
            .get_one::<u64>("timeout")
            .copied()
            .unwrap_or(defaults.timeout_secs),
        max_pages: args
            .get_one::<usize>("max-pages")
            .copied()
            .unwrap_or(defaults.max_pages),
    }
}

pub fn server_config_from_args(args: &ArgMatches) -> ServerConfig {
    let defaults = ServerConfig::default();
    ServerConfig {
        host: args.get_one::<String>("host").cloned().unwrap_or(defaults.host),
        port: args.get_one::<u16>("port").copied().unwrap_or(defaults.port),
        limits: limits_from_args(args),
        workers: args
            .get_one::<usize>("workers")
            .copied()
            .unwrap_or(defaults.workers),
        deadline_secs: args.get_one::<u64>("deadline").copied(),
        github: github_config_from_args(args),
    }
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

pub async fn handle_serve(args: &ArgMatches) -> anyhow::Result<()> {
    init_tracing("info,tower_http=debug");

    let config = server_config_from_args(args);
    let fetcher = config
        .github
        .build_fetcher()
        .context("Failed to configure GitHub client")?;

    tracing::info!("GitHub API: {}", config.github.base_url);
    tracing::info!(
        "Limits: {} followers, depth {}, {} worker(s)",
        config.limits.max_followers,
        config.limits.max_depth,
        config.workers
    );
    if config.github.token.is_none() {
        tracing::warn!("No GitHub token configured; unauthenticated rate limits apply");
    }

    crate::server::serve(&config, Arc::new(fetcher)).await
}

pub async fn handle_crawl(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    init_tracing("warn");

    let raw = args
        .get_one::<String>("username")
        .map(String::as_str)
        .unwrap_or_default();
    let Some(username) = normalize_username(raw) else {
        bail!(CrawlError::InvalidInput("expected username".to_string()));
    };

    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let output = args.get_one::<String>("output").map(|p| expand_output_path(p));

    let limits = limits_from_args(args);
    let workers = args.get_one::<usize>("workers").copied().unwrap_or(1);
    let deadline = args.get_one::<u64>("deadline").copied().map(Duration::from_secs);
    let github = github_config_from_args(args);
    let fetcher = github
        .build_fetcher()
        .context("Failed to configure GitHub client")?;

    if !quiet {
        print_divider();
        println!(
            "{} Crawling followers of {}",
            "→".blue(),
            username.bright_white().bold()
        );
        println!("  Max followers: {}", limits.max_followers.to_string().cyan());
        println!("  Max depth:     {}", limits.max_depth.to_string().cyan());
        println!("  Workers:       {}", workers.to_string().cyan());
        println!("  GitHub API:    {}", github.base_url.bright_white());
        print_divider();
        println!();
    }

    let options = CrawlOptions {
        username: username.clone(),
        limits,
        workers,
        deadline,
        show_progress_bars: !quiet,
    };
    let graph = execute_crawl(Arc::new(fetcher), options, None).await?;

    let report = generate_report(&username, &graph, format)?;

    match output {
        Some(path) => {
            save_report(&report, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                println!(
                    "{} Report saved: {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", report),
    }

    Ok(())
}

/// One-line advice for errors the user can act on.
pub fn error_hint(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<CrawlError>()? {
        CrawlError::RateLimited(_) => {
            Some("GitHub rate limit hit; set GITHUB_TOKEN or pass --token to raise it")
        }
        CrawlError::InvalidInput(_) => Some("pass a GitHub login with -u/--username"),
        CrawlError::FetchFailed(_) => None,
    }
}

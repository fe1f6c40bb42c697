use followgraph::commands::command_argument_builder;
use followgraph::handlers::*;
use followgraph_scanner::CrawlError;
use tempfile::NamedTempFile;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn crawl_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["followgraph", "crawl"];
    argv.extend_from_slice(args);
    let matches = command_argument_builder()
        .try_get_matches_from(argv)
        .expect("arguments should parse");
    matches
        .subcommand_matches("crawl")
        .expect("crawl subcommand")
        .clone()
}

#[test]
fn test_normalize_username_plain() {
    assert_eq!(normalize_username("octocat"), Some("octocat".to_string()));
}

#[test]
fn test_normalize_username_at_prefix_and_whitespace() {
    assert_eq!(normalize_username("  @octocat "), Some("octocat".to_string()));
}

#[test]
fn test_normalize_username_profile_url() {
    assert_eq!(
        normalize_username("https://github.com/octocat/"),
        Some("octocat".to_string())
    );
    assert_eq!(
        normalize_username("www.github.com/octocat"),
        Some("octocat".to_string())
    );
}

#[test]
fn test_normalize_username_empty() {
    assert_eq!(normalize_username(""), None);
    assert_eq!(normalize_username("   "), None);
    assert_eq!(normalize_username("@"), None);
}

#[test]
fn test_expand_output_path_without_tilde() {
    assert_eq!(
        expand_output_path("/tmp/report.json"),
        std::path::PathBuf::from("/tmp/report.json")
    );
}

#[test]
fn test_limits_from_args() {
    let args = crawl_matches(&["-u", "octocat", "--max-followers", "7", "--max-depth", "0"]);
    let limits = limits_from_args(&args);

    assert_eq!(limits.max_followers, 7);
    assert_eq!(limits.max_depth, 0);
}

#[test]
fn test_github_config_from_args() {
    let args = crawl_matches(&[
        "-u",
        "octocat",
        "--github-url",
        "http://127.0.0.1:9",
        "--timeout",
        "3",
        "--max-pages",
        "2",
    ]);
    let config = github_config_from_args(&args);

    assert_eq!(config.base_url, "http://127.0.0.1:9");
    assert_eq!(config.timeout_secs, 3);
    assert_eq!(config.max_pages, 2);
}

#[test]
fn test_server_config_from_args() {
    let matches = command_argument_builder()
        .try_get_matches_from(["followgraph", "serve", "--port", "9090", "--deadline", "30"])
        .unwrap();
    let args = matches.subcommand_matches("serve").unwrap();
    let config = server_config_from_args(args);

    assert_eq!(config.port, 9090);
    assert_eq!(config.bind_addr(), format!("{}:9090", config.host));
    assert_eq!(config.deadline_secs, Some(30));
}

#[tokio::test]
async fn test_handle_crawl_writes_json_report() -> Result<(), Box<dyn std::error::Error>> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/u1/followers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"[{"login": "a"}, {"login": "b"}]"#, "application/json"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/a/followers"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/b/followers"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .mount(&mock_server)
        .await;

    let temp_file = NamedTempFile::new()?;
    let output = temp_file.path().to_string_lossy().to_string();
    let uri = mock_server.uri();
    let args = crawl_matches(&[
        "-u",
        "@u1",
        "-f",
        "json",
        "-o",
        &output,
        "--github-url",
        &uri,
    ]);

    handle_crawl(&args, true).await?;

    let written = std::fs::read_to_string(temp_file.path())?;
    let value: serde_json::Value = serde_json::from_str(&written)?;
    assert_eq!(value["report"]["root"], "u1");
    assert_eq!(value["report"]["summary"]["total_users"], 2);
    assert_eq!(value["report"]["graph"]["a"]["depth"], 0);
    Ok(())
}

#[tokio::test]
async fn test_handle_crawl_rate_limit_has_hint() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let args = crawl_matches(&["-u", "u1", "--github-url", &uri]);

    let err = handle_crawl(&args, true).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CrawlError>(),
        Some(CrawlError::RateLimited(_))
    ));
    assert!(error_hint(&err).unwrap().contains("GITHUB_TOKEN"));
}

#[tokio::test]
async fn test_handle_crawl_blank_username_is_invalid() {
    let args = crawl_matches(&["-u", "  "]);

    let err = handle_crawl(&args, true).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CrawlError>(),
        Some(CrawlError::InvalidInput(_))
    ));
}

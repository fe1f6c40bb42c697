use clap::{Arg, arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("followgraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("followgraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("serve")
                .about("Serve follower graphs over HTTP at GET /followers/{username}")
                .arg(
                    arg!(--"host" <HOST>)
                        .required(false)
                        .help("Address to bind to")
                        .env("FOLLOWGRAPH_HOST")
                        .default_value("0.0.0.0"),
                )
                .arg(
                    arg!(-p --"port" <PORT>)
                        .required(false)
                        .help("Port to listen on")
                        .env("FOLLOWGRAPH_PORT")
                        .value_parser(clap::value_parser!(u16))
                        .default_value("8080"),
                )
                .args(limit_args())
                .args(github_args()),
        )
        .subcommand(
            command!("crawl")
                .about("Crawl the follower graph of a single user and print a report")
                .arg(
                    arg!(-u --"username" <USERNAME>)
                        .required(true)
                        .help("The GitHub user to start from (login, @login or profile URL)"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .args(limit_args())
                .args(github_args()),
        )
}

fn limit_args() -> Vec<Arg> {
    vec![
        arg!(--"max-followers" <COUNT>)
            .required(false)
            .help("Maximum number of users admitted into the graph")
            .env("FOLLOWGRAPH_MAX_FOLLOWERS")
            .value_parser(clap::value_parser!(usize))
            .default_value("100"),
        arg!(--"max-depth" <DEPTH>)
            .required(false)
            .help("Maximum follower depth; 0 returns only direct followers")
            .env("FOLLOWGRAPH_MAX_DEPTH")
            .value_parser(clap::value_parser!(usize))
            .default_value("4"),
        arg!(-t --"workers" <NUM_WORKERS>)
            .required(false)
            .help("Concurrent fetches per level (1 = sequential)")
            .env("FOLLOWGRAPH_WORKERS")
            .value_parser(clap::value_parser!(usize))
            .default_value("1"),
        arg!(--"deadline" <SECONDS>)
            .required(false)
            .help("Abort a crawl that runs longer than this")
            .env("FOLLOWGRAPH_DEADLINE")
            .value_parser(clap::value_parser!(u64)),
    ]
}

fn github_args() -> Vec<Arg> {
    vec![
        arg!(--"github-url" <URL>)
            .required(false)
            .help("Base URL of the GitHub REST API")
            .env("FOLLOWGRAPH_GITHUB_URL")
            .default_value("https://api.github.com"),
        arg!(--"token" <TOKEN>)
            .required(false)
            .help("GitHub token for higher rate limits")
            .env("GITHUB_TOKEN")
            .hide_env_values(true),
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Per-request timeout in seconds")
            .value_parser(clap::value_parser!(u64).range(1..))
            .default_value("10"),
        arg!(--"max-pages" <PAGES>)
            .required(false)
            .help("Follower pages fetched per user")
            .value_parser(clap::value_parser!(usize))
            .default_value("1"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        command_argument_builder().debug_assert();
    }

    #[test]
    fn test_crawl_defaults() {
        let matches = command_argument_builder()
            .try_get_matches_from(["followgraph", "crawl", "-u", "octocat"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();

        assert_eq!(name, "crawl");
        assert_eq!(sub.get_one::<String>("username").unwrap(), "octocat");
        assert_eq!(*sub.get_one::<usize>("max-followers").unwrap(), 100);
        assert_eq!(*sub.get_one::<usize>("max-depth").unwrap(), 4);
        assert_eq!(sub.get_one::<String>("format").unwrap(), "text");
    }

    #[test]
    fn test_crawl_requires_username() {
        let result = command_argument_builder().try_get_matches_from(["followgraph", "crawl"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_crawl_rejects_zero_timeout() {
        let result = command_argument_builder().try_get_matches_from([
            "followgraph",
            "crawl",
            "-u",
            "octocat",
            "--timeout",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serve_rejects_bad_port() {
        let result = command_argument_builder()
            .try_get_matches_from(["followgraph", "serve", "--port", "99999"]);
        assert!(result.is_err());
    }
}

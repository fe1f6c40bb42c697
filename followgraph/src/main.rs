use colored::Colorize;
use followgraph::commands::command_argument_builder;
use followgraph::handlers::{error_hint, handle_crawl, handle_serve};
use followgraph_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let outcome = match chosen_command.subcommand() {
        Some(("serve", primary_command)) => handle_serve(primary_command).await,
        Some(("crawl", primary_command)) => handle_crawl(primary_command, quiet).await,
        // No subcommand provided, just show the banner
        None => return,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        if let Some(hint) = error_hint(&e) {
            eprintln!("{} {}", "ℹ".blue(), hint);
        }
        std::process::exit(1);
    }
}

//! Casegen server binary
//!
//! Starts the HTTP server for Jira story hydration.

use casegen_server::{config::ServerConfig, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        ServerConfig::default()
    };

    start_server(config.with_env_overrides()).await
}

fn print_help() {
    println!("Casegen Server - Jira story hydration for test case generation");
    println!();
    println!("USAGE:");
    println!("    casegen-server [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    JIRA_BASE_URL      Jira site URL (e.g. https://your-site.atlassian.net)");
    println!("    JIRA_EMAIL         Account email for basic auth");
    println!("    JIRA_API_TOKEN     API token for basic auth");
    println!("    RUST_LOG           Log filter (default: info)");
    println!();
}

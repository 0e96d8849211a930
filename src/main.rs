use std::error::Error;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use toggl_client::dates::{ReportRange, parse_date};
use toggl_client::{Config, Context, DetailedReportRequest, TogglClient, TogglError};

#[derive(Debug, Parser)]
#[command(name = "toggl", version, about = "Query the Toggl Track API")]
struct Cli {
    /// API host, overrides TOGGL_HOST
    #[arg(long, global = true)]
    host: Option<String>,

    /// API token, overrides TOGGL_API_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log requests and responses to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List workspaces
    Workspaces,
    /// Show one workspace
    Workspace { id: u64 },
    /// Show the dashboard of a workspace
    Dashboard { id: u64 },
    /// Fetch a detailed time report
    Report {
        #[arg(long)]
        workspace: u64,
        #[arg(long, value_parser = parse_date)]
        since: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date)]
        until: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        user_agent: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_tracing(config.debug);

    let client = TogglClient::new(&config)?;
    let ctx = Context::background();

    match cli.command {
        Command::Workspaces => print_json(&client.fetch_workspaces(&ctx)?),
        Command::Workspace { id } => print_json(&client.fetch_workspace(&ctx, id)?),
        Command::Dashboard { id } => print_json(&client.fetch_dashboard(&ctx, id)?),
        Command::Report {
            workspace,
            since,
            until,
            user_agent,
        } => {
            let range = ReportRange::from_options(since, until, Local::now().date_naive())?;
            let request = DetailedReportRequest {
                workspace_id: workspace,
                since: range.since,
                until: range.until,
                user_agent,
            };
            print_json(&client.fetch_detailed_report(&ctx, &request)?)
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<Config, TogglError> {
    let config = Config::from_env_with_token(cli.token.clone())?;
    Ok(apply_overrides(cli, config))
}

fn apply_overrides(cli: &Cli, mut config: Config) -> Config {
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(seconds) = cli.timeout {
        config.timeout = Some(Duration::from_secs(seconds));
    }
    config.debug |= cli.debug;
    config
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("toggl_client=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn env_config() -> Config {
        Config {
            timeout: Some(Duration::from_secs(4)),
            ..Config::new("http://127.0.0.1:1", "flag-token")
        }
    }

    #[test]
    fn token_flag_keeps_env_host() {
        let cli = parse(&["toggl", "--token", "flag-token", "workspaces"]);
        let config = apply_overrides(&cli, env_config());
        assert_eq!(config.host, "http://127.0.0.1:1");
        assert_eq!(config.timeout, Some(Duration::from_secs(4)));
        assert!(!config.debug);
    }

    #[test]
    fn flags_override_env_values() {
        let cli = parse(&[
            "toggl",
            "--host",
            "http://localhost:8080",
            "--timeout",
            "2",
            "--debug",
            "dashboard",
            "7",
        ]);
        let config = apply_overrides(&cli, env_config());
        assert_eq!(config.host, "http://localhost:8080");
        assert_eq!(config.timeout, Some(Duration::from_secs(2)));
        assert!(config.debug);
        assert!(matches!(cli.command, Command::Dashboard { id: 7 }));
    }

    #[test]
    fn env_debug_survives_without_flag() {
        let cli = parse(&["toggl", "workspaces"]);
        let config = apply_overrides(
            &cli,
            Config {
                debug: true,
                ..env_config()
            },
        );
        assert!(config.debug);
    }

    #[test]
    fn report_dates_are_parsed() {
        let cli = parse(&[
            "toggl",
            "report",
            "--workspace",
            "42",
            "--since",
            "2024-01-01",
            "--until",
            "2024-01-04",
        ]);
        match cli.command {
            Command::Report {
                workspace,
                since,
                until,
                user_agent,
            } => {
                assert_eq!(workspace, 42);
                assert_eq!(since, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(until, NaiveDate::from_ymd_opt(2024, 1, 4));
                assert!(user_agent.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

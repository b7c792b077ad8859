//! Courier CLI.
//!
//! Loads one route through a [`RouteSession`], optionally applies a single
//! operation, then prints the resulting snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use courier::error::SessionError;
use courier::exit_codes;
use courier::io::config::{CourierConfig, load_config, write_config};
use courier::io::credential::Credential;
use courier::io::gateway::HttpGateway;
use courier::logging;
use courier::route::{RouteId, StopId, StopStatus};
use courier::session::RouteSession;

#[derive(Parser)]
#[command(
    name = "courier",
    version,
    about = "Work a delivery route: stops, statuses, and map framing"
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = "courier.toml")]
    config: PathBuf,

    /// Bearer token for the routes API.
    #[arg(long, global = true, env = "COURIER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file at `--config`.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the route header and stop list.
    Show { route: RouteId },
    /// Print renderer inputs (markers, path, camera) as JSON.
    Map { route: RouteId },
    /// Add a stop by address.
    AddStop { route: RouteId, address: String },
    /// Remove a stop from a pending route.
    DeleteStop { route: RouteId, stop: StopId },
    /// Cycle a stop to its next status (pending -> delivered -> failed).
    Advance { route: RouteId, stop: StopId },
    /// Set a stop's status explicitly.
    SetStatus {
        route: RouteId,
        stop: StopId,
        status: StopStatus,
    },
    /// Mark the route completed.
    Complete { route: RouteId },
}

impl Command {
    /// Route the command operates on; `None` for commands that need no session.
    fn route_id(&self) -> Option<RouteId> {
        match self {
            Command::Init { .. } => None,
            Command::Show { route }
            | Command::Map { route }
            | Command::AddStop { route, .. }
            | Command::DeleteStop { route, .. }
            | Command::Advance { route, .. }
            | Command::SetStatus { route, .. }
            | Command::Complete { route } => Some(*route),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();
    let code = match run(Cli::parse()).await {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_code(&err)
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    if let Command::Init { force } = cli.command {
        return init_config(&cli.config, force);
    }
    let route_id = cli
        .command
        .route_id()
        .context("command does not name a route")?;

    let config = load_config(&cli.config)?;
    let credential = Credential::from_optional(cli.token)?;
    let gateway = HttpGateway::new(&config, credential)?;
    let session = RouteSession::new(Arc::new(gateway));

    session.load(route_id).await?;

    match cli.command {
        Command::Init { .. } | Command::Show { .. } => {}
        Command::Map { .. } => {
            let view = session
                .map_view(&config.map)
                .context("route snapshot missing after load")?;
            println!(
                "{}",
                serde_json::to_string_pretty(&view).context("serialize map view")?
            );
            return Ok(());
        }
        Command::AddStop { address, .. } => session.add_stop(&address).await?,
        Command::DeleteStop { stop, .. } => session.delete_stop(stop).await?,
        Command::Advance { stop, .. } => session.advance_stop(stop).await?,
        Command::SetStatus { stop, status, .. } => session.set_stop_status(stop, status).await?,
        Command::Complete { .. } => session.request_completion().await?,
    }

    let summary = session
        .summary()
        .context("route snapshot missing after load")?;
    print!("{summary}");
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    write_config(path, &CourierConfig::default())?;
    println!("wrote {}", path.display());
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<SessionError>()
        .map_or(exit_codes::INVALID, SessionError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn parse_show() {
        let cli = Cli::parse_from(["courier", "show", "12"]);
        assert!(matches!(cli.command, Command::Show { route: 12 }));
        assert_eq!(cli.config, PathBuf::from("courier.toml"));
    }

    #[test]
    fn parse_set_status() {
        let cli = Cli::parse_from([
            "courier",
            "--token",
            "abc",
            "set-status",
            "3",
            "8",
            "delivered",
        ]);
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert!(matches!(
            cli.command,
            Command::SetStatus {
                route: 3,
                stop: 8,
                status: StopStatus::Delivered
            }
        ));
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert!(Cli::try_parse_from(["courier", "set-status", "3", "8", "lost"]).is_err());
    }

    #[test]
    fn route_id_is_shared_by_every_command() {
        let cli = Cli::parse_from(["courier", "add-stop", "5", "1 Hang Bong"]);
        assert_eq!(cli.command.route_id(), Some(5));
    }

    #[test]
    fn parse_init_needs_no_route() {
        let cli = Cli::parse_from(["courier", "--config", "alt.toml", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
        assert_eq!(cli.command.route_id(), None);
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
    }

    #[test]
    fn session_errors_map_to_exit_codes() {
        let err = anyhow::Error::from(SessionError::MissingCredential);
        assert_eq!(exit_code(&err), exit_codes::MISSING_CREDENTIAL);
        assert_eq!(exit_code(&anyhow!("bad config")), exit_codes::INVALID);
    }
}

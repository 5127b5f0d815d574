//! Command-line client for a nodelet manager.
//!
//! `nodeletctl load <NAME> <TYPE> <MANAGER>` asks the manager to
//! instantiate a nodelet; `nodeletctl unload <NAME> <MANAGER>` tears one
//! down. Remappings and parameters are passed with standard `--ros-args`
//! sections and forwarded to the nodelet on load. The exit code reports
//! the manager's verdict.

use clap::Parser;
use nodelet_args::RosArgs;
use nodelet_zenoh::{Context, NodeletManagerClient, logger::init_ros_logging};
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;

mod cli;

use cli::{Cli, Command};

/// Pick a node name that will not collide with other invocations.
fn anonymous_node_name() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("nodeletctl_{}", &id[..8])
}

#[tokio::main]
async fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().collect();

    // Split off --ros-args sections before clap parses the rest
    let (ros_args, user_args) = match nodelet_args::parse_args(&argv) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let default_level = ros_args
        .log_levels
        .iter()
        .find(|assignment| assignment.logger_name.is_none())
        .map(|assignment| assignment.level);
    init_ros_logging(default_level);

    let cli = Cli::parse_from(&user_args);

    match run(cli, ros_args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, ros_args: RosArgs) -> nodelet_zenoh::Result<bool> {
    let ctx = Context::with_args(ros_args)?;
    let node = ctx.create_node(&anonymous_node_name(), None)?;
    let timeout = Duration::from_secs_f64(cli.timeout);

    match cli.command {
        Command::Load {
            name,
            type_name,
            manager,
        } => {
            let client = NodeletManagerClient::new(node, &manager, timeout)?;
            client.load_nodelet(&name, &type_name).await
        }
        Command::Unload { name, manager } => {
            let client = NodeletManagerClient::new(node, &manager, timeout)?;
            client.unload_nodelet(&name).await
        }
    }
}

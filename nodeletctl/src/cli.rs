//! Command-line interface definition.
//!
//! `--ros-args ... [--]` sections are stripped from `argv` before clap
//! sees it, so the grammar here only covers the tool's own arguments.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "nodeletctl")]
#[command(about = "Load and unload nodelets on a running nodelet manager")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Seconds to wait for the manager's services and for each reply.
    #[arg(long, global = true, default_value_t = 10.0, value_name = "SECS")]
    pub timeout: f64,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a nodelet into a running manager.
    Load {
        /// Fully qualified name the nodelet will run under.
        name: String,

        /// Plugin type to instantiate, e.g. "pkg/Class".
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Manager node offering the load_nodelet service.
        manager: String,
    },

    /// Unload a nodelet from a running manager.
    Unload {
        /// Fully qualified name of the nodelet to tear down.
        name: String,

        /// Manager node offering the unload_nodelet service.
        manager: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load() {
        let cli = Cli::try_parse_from([
            "nodeletctl",
            "load",
            "/my_nodelet",
            "image_proc/rectify",
            "/nodelet_manager",
        ])
        .unwrap();

        match cli.command {
            Command::Load {
                name,
                type_name,
                manager,
            } => {
                assert_eq!(name, "/my_nodelet");
                assert_eq!(type_name, "image_proc/rectify");
                assert_eq!(manager, "/nodelet_manager");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.timeout, 10.0);
    }

    #[test]
    fn test_parse_unload_with_timeout() {
        let cli = Cli::try_parse_from([
            "nodeletctl",
            "unload",
            "/my_nodelet",
            "/nodelet_manager",
            "--timeout",
            "2.5",
        ])
        .unwrap();

        match cli.command {
            Command::Unload { name, manager } => {
                assert_eq!(name, "/my_nodelet");
                assert_eq!(manager, "/nodelet_manager");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.timeout, 2.5);
    }

    #[test]
    fn test_load_requires_all_positionals() {
        assert!(Cli::try_parse_from(["nodeletctl", "load", "/my_nodelet"]).is_err());
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["nodeletctl", "reload", "/x", "/m"]).is_err());
    }
}

//! Parser for ROS-style command-line arguments.
//!
//! A nodelet client is launched with a mix of tool-specific arguments and
//! middleware arguments. The middleware arguments live in `--ros-args`
//! sections and carry the rules the client forwards to the manager:
//!
//! - **Name remapping**: `-r` / `--remap` rules of the form `from:=to` or
//!   `node:from:=to`
//! - **Parameter assignment**: `-p` / `--param` assignments of the form
//!   `name:=value` (values parsed as YAML to preserve types)
//! - **Parameter files**: `--params-file <path>` YAML files
//! - **Log levels**: `--log-level LEVEL` or `--log-level logger:=LEVEL`
//!
//! # Example
//!
//! ```
//! use nodelet_args::parse_args;
//!
//! let args = vec![
//!     "nodeletctl".to_string(),
//!     "--ros-args".to_string(),
//!     "-r".to_string(),
//!     "points_in:=/camera/points".to_string(),
//!     "-p".to_string(),
//!     "queue_size:=10".to_string(),
//! ];
//!
//! let (ros_args, user_args) = parse_args(&args)?;
//! assert_eq!(ros_args.remap_rules.len(), 1);
//! assert_eq!(ros_args.param_assignments.len(), 1);
//! assert_eq!(user_args, vec!["nodeletctl"]);
//! # Ok::<(), nodelet_args::ArgsError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod errors;
pub mod names;
mod param_file;
mod parser;
mod types;

pub use errors::{ArgsError, ArgsResult};
pub use names::{
    NameKind, build_node_fqn, expand_topic_name, is_absolute_name, is_private_name,
    is_relative_name, validate_namespace, validate_node_name, validate_topic_name,
};
pub use param_file::parse_param_file;
pub use parser::parse_args;
pub use types::{LogLevel, LogLevelAssignment, ParamAssignment, RemapRule, RosArgs};

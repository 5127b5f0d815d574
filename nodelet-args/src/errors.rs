//! Error types for argument parsing.

use std::path::PathBuf;
use thiserror::Error;

use crate::names::NameKind;

/// Errors that can occur while parsing command-line arguments.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// Invalid remapping rule format
    #[error("Invalid remapping rule '{0}': expected format 'from:=to' or 'node:from:=to'")]
    InvalidRemapRule(String),

    /// Invalid name (node, topic or namespace)
    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        /// The kind of name that failed validation
        kind: NameKind,
        /// The invalid name
        name: String,
        /// The reason the name is invalid
        reason: String,
    },

    /// Invalid parameter assignment format
    #[error(
        "Invalid parameter assignment '{0}': expected format 'name:=value' or 'node:name:=value'"
    )]
    InvalidParamAssignment(String),

    /// Invalid YAML value in a parameter assignment
    #[error("Invalid YAML value in parameter '{0}': {1}")]
    InvalidYamlValue(String, String),

    /// Invalid log level
    #[error("Invalid log level '{0}': expected DEBUG, INFO, WARN, ERROR, or FATAL")]
    InvalidLogLevel(String),

    /// Parameter file not found
    #[error("Parameter file not found: {}", .0.display())]
    ParamFileNotFound(PathBuf),

    /// Parameter file parsing error
    #[error("Failed to parse parameter file '{path}': {1}", path = .0.display())]
    ParamFileParseError(PathBuf, String),

    /// Invalid parameter file structure
    #[error("Invalid parameter file structure: {0}")]
    InvalidParamFileStructure(String),

    /// Missing required argument value
    #[error("Missing value for argument '{0}'")]
    MissingArgumentValue(String),

    /// Unexpected argument inside a `--ros-args` section
    #[error("Unexpected argument '{0}' in ROS args section")]
    UnexpectedArgument(String),

    /// IO error
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Result type for argument parsing operations.
pub type ArgsResult<T> = Result<T, ArgsError>;

//! Types produced by the argument parser.

use std::path::PathBuf;
use yaml_rust2::Yaml;

/// A name remapping rule.
///
/// Rules are either global (apply to every node) or node-specific.
///
/// - Global: `points_in:=/camera/points`
/// - Node-specific: `my_node:points_in:=/camera/points`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemapRule {
    /// Optional node name to target (`None` means applies to all nodes)
    pub node_name: Option<String>,
    /// The original name to remap from
    pub from: String,
    /// The new name to remap to
    pub to: String,
}

impl RemapRule {
    /// Create a new global remapping rule.
    #[must_use]
    pub fn new_global(from: String, to: String) -> Self {
        Self {
            node_name: None,
            from,
            to,
        }
    }

    /// Create a new node-specific remapping rule.
    #[must_use]
    pub fn new_node_specific(node_name: String, from: String, to: String) -> Self {
        Self {
            node_name: Some(node_name),
            from,
            to,
        }
    }

    /// Check if this rule applies to a specific node.
    #[must_use]
    pub fn applies_to_node(&self, node_name: &str) -> bool {
        self.node_name.as_ref().is_none_or(|n| n == node_name)
    }
}

/// A parameter assignment.
///
/// Values are stored as YAML to preserve type information.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamAssignment {
    /// Optional node name to target (`None` means applies to all nodes)
    pub node_name: Option<String>,
    /// Parameter name
    pub name: String,
    /// Parameter value
    pub value: Yaml,
}

impl ParamAssignment {
    /// Create a new global parameter assignment.
    #[must_use]
    pub fn new_global(name: String, value: Yaml) -> Self {
        Self {
            node_name: None,
            name,
            value,
        }
    }

    /// Create a new node-specific parameter assignment.
    #[must_use]
    pub fn new_node_specific(node_name: String, name: String, value: Yaml) -> Self {
        Self {
            node_name: Some(node_name),
            name,
            value,
        }
    }

    /// Check if this parameter applies to a specific node.
    #[must_use]
    pub fn applies_to_node(&self, node_name: &str) -> bool {
        self.node_name.as_ref().is_none_or(|n| n == node_name)
    }

    /// Get the value as a boolean, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }

    /// Get the value as an integer, if it is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_i64()
    }

    /// Get the value as a float, if it is one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    /// Get the value as a string, if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// Log levels understood by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Debug level logging
    Debug,
    /// Info level logging
    Info,
    /// Warning level logging
    Warn,
    /// Error level logging
    Error,
    /// Fatal level logging
    Fatal,
}

impl LogLevel {
    /// String form as used on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "FATAL" => Ok(Self::Fatal),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

/// A log level assignment, global or logger-specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLevelAssignment {
    /// Optional logger name (`None` means global)
    pub logger_name: Option<String>,
    /// Log level
    pub level: LogLevel,
}

impl LogLevelAssignment {
    /// Create a new global log level assignment.
    #[must_use]
    pub fn new_global(level: LogLevel) -> Self {
        Self {
            logger_name: None,
            level,
        }
    }

    /// Create a new logger-specific log level assignment.
    #[must_use]
    pub fn new_logger_specific(logger_name: String, level: LogLevel) -> Self {
        Self {
            logger_name: Some(logger_name),
            level,
        }
    }
}

/// Complete set of parsed middleware arguments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RosArgs {
    /// Name remapping rules
    pub remap_rules: Vec<RemapRule>,
    /// Parameter assignments
    pub param_assignments: Vec<ParamAssignment>,
    /// Parameter files to load
    pub param_files: Vec<PathBuf>,
    /// Log level assignments
    pub log_levels: Vec<LogLevelAssignment>,
}

impl RosArgs {
    /// Create a new empty `RosArgs`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse middleware arguments from an argument iterator.
    ///
    /// Returns the parsed arguments plus the remaining user-defined
    /// arguments (everything outside `--ros-args` sections).
    ///
    /// # Errors
    ///
    /// Returns an error if any middleware argument is malformed.
    pub fn from_args<I, S>(args: I) -> crate::ArgsResult<(Self, Vec<String>)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        crate::parse_args(&args_vec)
    }

    /// Get all remapping rules that apply to a specific node.
    #[must_use]
    pub fn get_remap_rules_for_node(&self, node_name: &str) -> Vec<&RemapRule> {
        self.remap_rules
            .iter()
            .filter(|r| r.applies_to_node(node_name))
            .collect()
    }

    /// Get all parameter assignments that apply to a specific node,
    /// including parameters loaded from YAML files.
    ///
    /// File parameters come first, direct `-p` assignments after, so
    /// callers that apply assignments in order give `-p` precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter file cannot be read or parsed.
    pub fn get_params_for_node(&self, node_name: &str) -> crate::ArgsResult<Vec<ParamAssignment>> {
        let mut params = Vec::new();

        for param_file in &self.param_files {
            let file_params = crate::param_file::parse_param_file(param_file)?;
            params.extend(
                file_params
                    .into_iter()
                    .filter(|p| p.applies_to_node(node_name)),
            );
        }

        params.extend(
            self.param_assignments
                .iter()
                .filter(|p| p.applies_to_node(node_name))
                .cloned(),
        );

        Ok(params)
    }

    /// Merge another `RosArgs` into this one.
    pub fn merge(&mut self, other: RosArgs) {
        self.remap_rules.extend(other.remap_rules);
        self.param_assignments.extend(other.param_assignments);
        self.param_files.extend(other.param_files);
        self.log_levels.extend(other.log_levels);
    }
}

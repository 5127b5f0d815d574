//! Extraction and parsing of `--ros-args` sections.

use std::path::PathBuf;
use yaml_rust2::YamlLoader;

use crate::{
    errors::{ArgsError, ArgsResult},
    types::{LogLevel, LogLevelAssignment, ParamAssignment, RemapRule, RosArgs},
};

/// Parse middleware arguments out of a full command line.
///
/// All `--ros-args` sections are extracted and merged; everything else is
/// returned as user arguments in order. A section ends at `--` or at the
/// next `--ros-args`.
///
/// # Errors
///
/// Returns an error if any argument inside a `--ros-args` section is
/// malformed or missing its value.
pub fn parse_args(args: &[String]) -> ArgsResult<(RosArgs, Vec<String>)> {
    let mut ros_args = RosArgs::new();
    let mut user_args = Vec::new();
    let mut i = 0;

    while i < args.len() {
        if args[i] == "--ros-args" {
            let (section_args, next_idx) = extract_section(args, i + 1);
            let section_parsed = parse_section(&section_args)?;
            ros_args.merge(section_parsed);
            i = next_idx;
        } else {
            user_args.push(args[i].clone());
            i += 1;
        }
    }

    Ok((ros_args, user_args))
}

/// Extract one `--ros-args` section; returns the section arguments and the
/// index of the next argument to process.
fn extract_section(args: &[String], start_idx: usize) -> (Vec<String>, usize) {
    let mut section_args = Vec::new();
    let mut i = start_idx;

    while i < args.len() {
        if args[i] == "--" {
            return (section_args, i + 1);
        }
        if args[i] == "--ros-args" {
            return (section_args, i);
        }
        section_args.push(args[i].clone());
        i += 1;
    }

    (section_args, i)
}

fn parse_section(args: &[String]) -> ArgsResult<RosArgs> {
    let mut ros_args = RosArgs::new();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--remap" | "-r" => {
                i += 1;
                if i >= args.len() {
                    return Err(ArgsError::MissingArgumentValue("--remap".to_string()));
                }
                ros_args.remap_rules.push(parse_remap_rule(&args[i])?);
            }
            "--param" | "-p" => {
                i += 1;
                if i >= args.len() {
                    return Err(ArgsError::MissingArgumentValue("--param".to_string()));
                }
                ros_args
                    .param_assignments
                    .push(parse_param_assignment(&args[i])?);
            }
            "--params-file" => {
                i += 1;
                if i >= args.len() {
                    return Err(ArgsError::MissingArgumentValue("--params-file".to_string()));
                }
                ros_args.param_files.push(PathBuf::from(&args[i]));
            }
            "--log-level" => {
                i += 1;
                if i >= args.len() {
                    return Err(ArgsError::MissingArgumentValue("--log-level".to_string()));
                }
                ros_args.log_levels.push(parse_log_level(&args[i])?);
            }
            arg => {
                return Err(ArgsError::UnexpectedArgument(arg.to_string()));
            }
        }
        i += 1;
    }

    Ok(ros_args)
}

/// Parse a remapping rule: `from:=to` or `node:from:=to`.
fn parse_remap_rule(s: &str) -> ArgsResult<RemapRule> {
    let Some((lhs, to)) = s.split_once(":=") else {
        return Err(ArgsError::InvalidRemapRule(s.to_string()));
    };
    if to.contains(":=") {
        return Err(ArgsError::InvalidRemapRule(s.to_string()));
    }

    let lhs_parts: Vec<&str> = lhs.split(':').collect();
    match lhs_parts.as_slice() {
        [from] => Ok(RemapRule::new_global(from.to_string(), to.to_string())),
        [node, from] => Ok(RemapRule::new_node_specific(
            node.to_string(),
            from.to_string(),
            to.to_string(),
        )),
        _ => Err(ArgsError::InvalidRemapRule(s.to_string())),
    }
}

/// Parse a parameter assignment: `name:=value` or `node:name:=value`.
/// The value is parsed as YAML to preserve type information.
fn parse_param_assignment(s: &str) -> ArgsResult<ParamAssignment> {
    let Some((lhs, value)) = s.split_once(":=") else {
        return Err(ArgsError::InvalidParamAssignment(s.to_string()));
    };

    let yaml_value = YamlLoader::load_from_str(value)
        .map_err(|e| ArgsError::InvalidYamlValue(value.to_string(), format!("YAML parse error: {e}")))?
        .into_iter()
        .next()
        .ok_or_else(|| {
            ArgsError::InvalidYamlValue(value.to_string(), "Empty YAML value".to_string())
        })?;

    let lhs_parts: Vec<&str> = lhs.split(':').collect();
    match lhs_parts.as_slice() {
        [name] => Ok(ParamAssignment::new_global(name.to_string(), yaml_value)),
        [node, name] => Ok(ParamAssignment::new_node_specific(
            node.to_string(),
            name.to_string(),
            yaml_value,
        )),
        _ => Err(ArgsError::InvalidParamAssignment(s.to_string())),
    }
}

/// Parse a log level assignment: `LEVEL` or `logger:=LEVEL`.
fn parse_log_level(s: &str) -> ArgsResult<LogLevelAssignment> {
    if let Some((logger, level_str)) = s.split_once(":=") {
        let level = level_str
            .parse::<LogLevel>()
            .map_err(|_| ArgsError::InvalidLogLevel(level_str.to_string()))?;
        Ok(LogLevelAssignment::new_logger_specific(
            logger.to_string(),
            level,
        ))
    } else {
        let level = s
            .parse::<LogLevel>()
            .map_err(|_| ArgsError::InvalidLogLevel(s.to_string()))?;
        Ok(LogLevelAssignment::new_global(level))
    }
}

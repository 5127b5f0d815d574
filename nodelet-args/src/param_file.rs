//! Parser for parameter YAML files.

use std::fs;
use std::path::Path;

use yaml_rust2::{Yaml, YamlLoader};

use crate::{
    errors::{ArgsError, ArgsResult},
    types::ParamAssignment,
};

/// Parse a parameter YAML file.
///
/// The expected structure maps node names to a `ros__parameters` mapping:
///
/// ```yaml
/// loader:
///   ros__parameters:
///     queue_size: 10
///     frame_id: "base_link"
/// ```
///
/// # Errors
///
/// Returns an error if the file doesn't exist, cannot be parsed as YAML,
/// or the structure is invalid.
pub fn parse_param_file<P: AsRef<Path>>(path: P) -> ArgsResult<Vec<ParamAssignment>> {
    let path_ref = path.as_ref();

    let content = fs::read_to_string(path_ref)
        .map_err(|_| ArgsError::ParamFileNotFound(path_ref.to_path_buf()))?;

    let docs = YamlLoader::load_from_str(&content)
        .map_err(|e| ArgsError::ParamFileParseError(path_ref.to_path_buf(), e.to_string()))?;

    if docs.is_empty() {
        return Ok(Vec::new());
    }

    parse_yaml_params(&docs[0])
}

fn parse_yaml_params(doc: &Yaml) -> ArgsResult<Vec<ParamAssignment>> {
    let mut params = Vec::new();

    let root_hash = doc.as_hash().ok_or_else(|| {
        ArgsError::InvalidParamFileStructure("Root element must be a mapping".to_string())
    })?;

    for (node_key, node_value) in root_hash {
        let node_name = node_key.as_str().ok_or_else(|| {
            ArgsError::InvalidParamFileStructure("Node name must be a string".to_string())
        })?;

        let node_hash = node_value.as_hash().ok_or_else(|| {
            ArgsError::InvalidParamFileStructure(format!("Node '{node_name}' must be a mapping"))
        })?;

        let ros_params_key = Yaml::String("ros__parameters".to_string());
        let params_value = node_hash.get(&ros_params_key).ok_or_else(|| {
            ArgsError::InvalidParamFileStructure(format!(
                "Node '{node_name}' must have a 'ros__parameters' section"
            ))
        })?;

        let params_hash = params_value.as_hash().ok_or_else(|| {
            ArgsError::InvalidParamFileStructure(format!(
                "ros__parameters in node '{node_name}' must be a mapping"
            ))
        })?;

        for (param_key, param_value) in params_hash {
            let param_name = param_key.as_str().ok_or_else(|| {
                ArgsError::InvalidParamFileStructure("Parameter name must be a string".to_string())
            })?;

            params.push(ParamAssignment {
                node_name: Some(node_name.to_string()),
                name: param_name.to_string(),
                value: param_value.clone(),
            });
        }
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_simple_param_file() {
        let yaml_content = r#"
loader:
  ros__parameters:
    use_sim_time: true
    max_rate: 10.5
    frame_id: "base_link"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let params = parse_param_file(temp_file.path()).unwrap();

        assert_eq!(params.len(), 3);
        assert_eq!(params[0].node_name, Some("loader".to_string()));
        assert_eq!(params[0].name, "use_sim_time");
        assert_eq!(params[0].as_bool(), Some(true));

        let max_rate = params.iter().find(|p| p.name == "max_rate").unwrap();
        assert_eq!(max_rate.as_f64(), Some(10.5));

        let frame_id = params.iter().find(|p| p.name == "frame_id").unwrap();
        assert_eq!(frame_id.as_str(), Some("base_link"));
    }

    #[test]
    fn test_parse_multiple_nodes() {
        let yaml_content = r"
node1:
  ros__parameters:
    param1: value1
node2:
  ros__parameters:
    param2: value2
";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let params = parse_param_file(temp_file.path()).unwrap();
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_missing_ros_parameters_section() {
        let yaml_content = r"
some_node:
  wrong_key:
    param1: value1
";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        assert!(parse_param_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            parse_param_file("/nonexistent/params.yaml"),
            Err(ArgsError::ParamFileNotFound(_))
        ));
    }
}

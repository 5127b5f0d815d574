//! Node parameter storage.
//!
//! Parameters collected from command-line arguments and parameter files
//! live in a per-context store, keyed by node name. When a nodelet is
//! loaded, the caller's parameter subtree is copied under the nodelet's
//! name so the manager side sees the same configuration.

use nodelet_args::{ParamAssignment, RosArgs};
use std::collections::BTreeMap;
use std::fmt;
use yaml_rust2::Yaml;

/// A parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// 64-bit integer value
    I64(i64),
    /// 64-bit float value
    F64(f64),
    /// String value
    String(String),
    /// Array of booleans
    BoolArray(Vec<bool>),
    /// Array of integers
    I64Array(Vec<i64>),
    /// Array of floats
    F64Array(Vec<f64>),
    /// Array of strings
    StringArray(Vec<String>),
}

impl Value {
    /// Convert a YAML scalar or array into a parameter value.
    ///
    /// Returns `None` for YAML shapes that have no parameter equivalent
    /// (hashes, null, mixed arrays).
    pub fn from_yaml(yaml: &Yaml) -> Option<Self> {
        match yaml {
            Yaml::Boolean(b) => Some(Value::Bool(*b)),
            Yaml::Integer(i) => Some(Value::I64(*i)),
            Yaml::Real(r) => r.parse().ok().map(Value::F64),
            Yaml::String(s) => Some(Value::String(s.clone())),
            Yaml::Array(items) => Self::from_yaml_array(items),
            _ => None,
        }
    }

    fn from_yaml_array(items: &[Yaml]) -> Option<Self> {
        if items.is_empty() {
            return Some(Value::StringArray(Vec::new()));
        }
        match &items[0] {
            Yaml::Boolean(_) => items
                .iter()
                .map(|y| y.as_bool())
                .collect::<Option<Vec<_>>>()
                .map(Value::BoolArray),
            Yaml::Integer(_) => items
                .iter()
                .map(|y| y.as_i64())
                .collect::<Option<Vec<_>>>()
                .map(Value::I64Array),
            Yaml::Real(_) => items
                .iter()
                .map(|y| y.as_f64())
                .collect::<Option<Vec<_>>>()
                .map(Value::F64Array),
            Yaml::String(_) => items
                .iter()
                .map(|y| y.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Value::StringArray),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::I64(i) => write!(f, "{}", i),
            Value::F64(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::BoolArray(v) => write!(f, "{:?}", v),
            Value::I64Array(v) => write!(f, "{:?}", v),
            Value::F64Array(v) => write!(f, "{:?}", v),
            Value::StringArray(v) => write!(f, "{:?}", v),
        }
    }
}

/// Per-context parameter store, keyed by node name.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    nodes: BTreeMap<String, BTreeMap<String, Value>>,
}

impl ParameterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter for a node.
    pub fn set(&mut self, node: &str, name: &str, value: Value) {
        self.nodes
            .entry(node.to_string())
            .or_default()
            .insert(name.to_string(), value);
    }

    /// Get a parameter for a node.
    pub fn get(&self, node: &str, name: &str) -> Option<&Value> {
        self.nodes.get(node).and_then(|params| params.get(name))
    }

    /// Get all parameters for a node.
    pub fn node_params(&self, node: &str) -> Option<&BTreeMap<String, Value>> {
        self.nodes.get(node)
    }

    /// Populate a node's parameters from parsed command-line arguments.
    ///
    /// Parameter files are merged first, then direct `-p` assignments on
    /// top, so explicit assignments win.
    ///
    /// Returns the number of parameters stored.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced parameter file cannot be read.
    pub fn load_from_args(
        &mut self,
        args: &RosArgs,
        node: &str,
    ) -> nodelet_args::ArgsResult<usize> {
        let assignments: Vec<ParamAssignment> = args.get_params_for_node(node)?;
        let mut count = 0;
        for assignment in &assignments {
            if let Some(value) = Value::from_yaml(&assignment.value) {
                self.set(node, &assignment.name, value);
                count += 1;
            }
        }
        Ok(count)
    }

    /// Copy every parameter of `from_node` into `to_node`'s subtree.
    ///
    /// Existing parameters under `to_node` with the same names are
    /// overwritten. Returns the number of parameters copied.
    pub fn copy_subtree(&mut self, from_node: &str, to_node: &str) -> usize {
        let Some(source) = self.nodes.get(from_node).cloned() else {
            return 0;
        };
        let count = source.len();
        let target = self.nodes.entry(to_node.to_string()).or_default();
        for (name, value) in source {
            target.insert(name, value);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodelet_args::parse_args;

    #[test]
    fn test_value_from_yaml_scalars() {
        assert_eq!(Value::from_yaml(&Yaml::Boolean(true)), Some(Value::Bool(true)));
        assert_eq!(Value::from_yaml(&Yaml::Integer(3)), Some(Value::I64(3)));
        assert_eq!(
            Value::from_yaml(&Yaml::Real("1.5".to_string())),
            Some(Value::F64(1.5))
        );
        assert_eq!(
            Value::from_yaml(&Yaml::String("hi".to_string())),
            Some(Value::String("hi".to_string()))
        );
        assert_eq!(Value::from_yaml(&Yaml::Null), None);
    }

    #[test]
    fn test_value_from_yaml_arrays() {
        let yaml = Yaml::Array(vec![Yaml::Integer(1), Yaml::Integer(2)]);
        assert_eq!(Value::from_yaml(&yaml), Some(Value::I64Array(vec![1, 2])));

        let mixed = Yaml::Array(vec![Yaml::Integer(1), Yaml::String("x".to_string())]);
        assert_eq!(Value::from_yaml(&mixed), None);
    }

    #[test]
    fn test_store_set_get() {
        let mut store = ParameterStore::new();
        store.set("/camera", "rate", Value::I64(30));

        assert_eq!(store.get("/camera", "rate"), Some(&Value::I64(30)));
        assert_eq!(store.get("/camera", "missing"), None);
        assert_eq!(store.get("/other", "rate"), None);
    }

    #[test]
    fn test_copy_subtree() {
        let mut store = ParameterStore::new();
        store.set("/caller", "rate", Value::I64(30));
        store.set("/caller", "frame", Value::String("base".to_string()));
        store.set("/nodelet", "frame", Value::String("old".to_string()));

        let copied = store.copy_subtree("/caller", "/nodelet");
        assert_eq!(copied, 2);
        assert_eq!(store.get("/nodelet", "rate"), Some(&Value::I64(30)));
        // source wins over pre-existing values
        assert_eq!(
            store.get("/nodelet", "frame"),
            Some(&Value::String("base".to_string()))
        );
        // source is untouched
        assert_eq!(store.get("/caller", "rate"), Some(&Value::I64(30)));
    }

    #[test]
    fn test_copy_subtree_missing_source() {
        let mut store = ParameterStore::new();
        assert_eq!(store.copy_subtree("/nope", "/nodelet"), 0);
    }

    #[test]
    fn test_load_from_args() {
        let args: Vec<String> = ["prog", "--ros-args", "-p", "rate:=30", "-p", "enabled:=true"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (ros_args, _) = parse_args(&args).unwrap();

        let mut store = ParameterStore::new();
        let count = store.load_from_args(&ros_args, "mynode").unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.get("mynode", "rate"), Some(&Value::I64(30)));
        assert_eq!(store.get("mynode", "enabled"), Some(&Value::Bool(true)));
    }
}

//! Validation and expansion of ROS-style names.
//!
//! Topic/service names can be absolute (`/foo/bar`), relative (`foo/bar`) or
//! private (`~/foo`). Private names expand against the node's fully
//! qualified name, relative names against the node's namespace.
//!
//! ```
//! use nodelet_args::names::{expand_topic_name, validate_topic_name};
//!
//! assert!(validate_topic_name("/manager/load_nodelet").is_ok());
//! assert!(validate_topic_name("foo//bar").is_err());
//!
//! let fqn = expand_topic_name("/robot1", "loader", "~/status").unwrap();
//! assert_eq!(fqn, "/robot1/loader/status");
//! ```

use crate::errors::{ArgsError, ArgsResult};
use regex::Regex;
use std::sync::LazyLock;

/// Kind of name being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// A topic or service name
    Topic,
    /// A node base name (no namespace)
    Node,
    /// A namespace
    Namespace,
}

impl std::fmt::Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Topic => write!(f, "topic"),
            Self::Node => write!(f, "node"),
            Self::Namespace => write!(f, "namespace"),
        }
    }
}

fn invalid(kind: NameKind, name: &str, reason: &str) -> ArgsError {
    ArgsError::InvalidName {
        kind,
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

// A name token: alphanumerics and underscores, no leading digit, no
// repeated underscores. A lone leading underscore may be followed by a
// digit ("_1"), a bare first character may not.
const TOKEN: &str =
    r"(?:_(?:[A-Za-z0-9]+(?:_[A-Za-z0-9]+)*_?)?|[A-Za-z][A-Za-z0-9]*(?:_[A-Za-z0-9]+)*_?)";

static VALID_TOPIC_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?:~|(?:~?/)?{TOKEN}(?:/{TOKEN})*)$")).unwrap()
});

static VALID_NODE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{TOKEN}$")).unwrap());

static VALID_NAMESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^/(?:{TOKEN}(?:/{TOKEN})*)?$")).unwrap());

/// Validate a topic or service name.
///
/// Rules: not empty, tokens of `[A-Za-z0-9_]` separated by single slashes,
/// no trailing slash, no repeated slashes or underscores, must not start
/// with a digit, may start with `/` (absolute) or `~` (private, tilde alone
/// or followed by `/`).
///
/// # Errors
///
/// Returns [`ArgsError::InvalidName`] when the name violates any rule.
pub fn validate_topic_name(name: &str) -> ArgsResult<()> {
    if VALID_TOPIC_NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(invalid(
            NameKind::Topic,
            name,
            &failure_reason(NameKind::Topic, name),
        ))
    }
}

/// Validate a node base name: same token rules as topics, but no slashes
/// or tildes at all.
///
/// # Errors
///
/// Returns [`ArgsError::InvalidName`] when the name violates any rule.
pub fn validate_node_name(name: &str) -> ArgsResult<()> {
    if VALID_NODE_NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(invalid(
            NameKind::Node,
            name,
            &failure_reason(NameKind::Node, name),
        ))
    }
}

/// Validate a namespace: `/` alone, or an absolute name with no trailing
/// slash.
///
/// # Errors
///
/// Returns [`ArgsError::InvalidName`] when the namespace violates any rule.
pub fn validate_namespace(namespace: &str) -> ArgsResult<()> {
    if VALID_NAMESPACE_PATTERN.is_match(namespace) {
        Ok(())
    } else {
        Err(invalid(
            NameKind::Namespace,
            namespace,
            &failure_reason(NameKind::Namespace, namespace),
        ))
    }
}

/// Pick a human-readable reason for a name the pattern rejected.
fn failure_reason(kind: NameKind, name: &str) -> String {
    if name.is_empty() {
        return "name must not be empty".to_string();
    }
    match kind {
        NameKind::Node => {
            if name.contains('/') || name.contains('~') {
                return "node names must not contain slashes or tildes".to_string();
            }
        }
        NameKind::Namespace => {
            if !name.starts_with('/') {
                return "namespace must start with a forward slash (/)".to_string();
            }
        }
        NameKind::Topic => {
            if name.starts_with('~') && !name[1..].is_empty() && !name[1..].starts_with('/') {
                return "tilde (~) must be alone or followed by a forward slash (/)".to_string();
            }
        }
    }
    if name.contains("//") || (name.len() > 1 && name.ends_with('/')) {
        return "name must not contain repeated or trailing slashes".to_string();
    }
    if name.contains("__") {
        return "name must not contain repeated underscores".to_string();
    }
    if name
        .split('/')
        .any(|token| token.starts_with(|c: char| c.is_ascii_digit()))
    {
        return "name tokens must not start with a digit".to_string();
    }
    if let Some(c) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '_' | '/' | '~'))
    {
        return format!("invalid character '{c}' in name");
    }
    format!("name does not match the {kind} name pattern")
}

/// Check if a name is relative (no leading `/` or `~`).
#[must_use]
pub fn is_relative_name(name: &str) -> bool {
    !is_absolute_name(name) && !is_private_name(name)
}

/// Check if a name is absolute (starts with `/`).
#[must_use]
pub fn is_absolute_name(name: &str) -> bool {
    name.starts_with('/')
}

/// Check if a name is private (starts with `~`).
#[must_use]
pub fn is_private_name(name: &str) -> bool {
    name.starts_with('~')
}

/// Build the fully qualified node name from a namespace and a base name.
///
/// ```
/// use nodelet_args::names::build_node_fqn;
///
/// assert_eq!(build_node_fqn("/robot1", "loader"), "/robot1/loader");
/// assert_eq!(build_node_fqn("/", "loader"), "/loader");
/// ```
#[must_use]
pub fn build_node_fqn(namespace: &str, node_name: &str) -> String {
    if namespace == "/" {
        format!("/{node_name}")
    } else {
        format!("{namespace}/{node_name}")
    }
}

/// Expand a topic or service name to its fully qualified form.
///
/// Absolute names are returned as-is; private names replace `~` with the
/// node's FQN; relative names are prefixed with the node's namespace.
///
/// # Errors
///
/// Returns an error if the namespace, node name or topic name is invalid.
///
/// ```
/// use nodelet_args::names::expand_topic_name;
///
/// assert_eq!(
///     expand_topic_name("/ns", "n", "/absolute").unwrap(),
///     "/absolute"
/// );
/// assert_eq!(expand_topic_name("/ns", "n", "~/data").unwrap(), "/ns/n/data");
/// assert_eq!(expand_topic_name("/", "n", "relative").unwrap(), "/relative");
/// ```
pub fn expand_topic_name(
    node_namespace: &str,
    node_name: &str,
    topic_name: &str,
) -> ArgsResult<String> {
    validate_namespace(node_namespace)?;
    validate_node_name(node_name)?;
    validate_topic_name(topic_name)?;

    let expanded = if is_absolute_name(topic_name) {
        topic_name.to_string()
    } else if is_private_name(topic_name) {
        let node_fqn = build_node_fqn(node_namespace, node_name);
        if topic_name == "~" {
            node_fqn
        } else {
            format!("{}{}", node_fqn, &topic_name[1..])
        }
    } else if node_namespace == "/" {
        format!("/{topic_name}")
    } else {
        format!("{node_namespace}/{topic_name}")
    };

    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_topic_names() {
        for name in [
            "foo",
            "foo/bar",
            "/foo",
            "/foo/bar",
            "~",
            "~/foo",
            "_foo",
            "Foo123",
            "/manager/load_nodelet",
        ] {
            assert!(validate_topic_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_topic_names() {
        for name in [
            "",
            "123abc",
            "foo//bar",
            "foo/",
            "/foo/",
            "foo__bar",
            "~foo",
            "foo bar",
            "foo/1bar",
        ] {
            assert!(
                validate_topic_name(name).is_err(),
                "{name} should be invalid"
            );
        }
    }

    #[test]
    fn test_token_underscore_placement() {
        // single underscores anywhere, never doubled
        for name in ["_", "_foo", "foo_", "a_b_c", "/ns/_private"] {
            assert!(validate_topic_name(name).is_ok(), "{name} should be valid");
        }
        for name in ["a__", "__a", "/ns/a__b"] {
            assert!(
                validate_topic_name(name).is_err(),
                "{name} should be invalid"
            );
        }
    }

    #[test]
    fn test_node_names() {
        assert!(validate_node_name("my_node").is_ok());
        assert!(validate_node_name("Node123").is_ok());
        assert!(validate_node_name("").is_err());
        assert!(validate_node_name("my/node").is_err());
        assert!(validate_node_name("~node").is_err());
        assert!(validate_node_name("123node").is_err());
    }

    #[test]
    fn test_namespaces() {
        assert!(validate_namespace("/").is_ok());
        assert!(validate_namespace("/foo").is_ok());
        assert!(validate_namespace("/foo/bar").is_ok());
        assert!(validate_namespace("").is_err());
        assert!(validate_namespace("foo").is_err());
        assert!(validate_namespace("/foo/").is_err());
        assert!(validate_namespace("/foo//bar").is_err());
    }

    #[test]
    fn test_expand_absolute() {
        let fqn = expand_topic_name("/ns", "node", "/absolute/topic").unwrap();
        assert_eq!(fqn, "/absolute/topic");
    }

    #[test]
    fn test_expand_private() {
        assert_eq!(
            expand_topic_name("/ns", "node", "~/private").unwrap(),
            "/ns/node/private"
        );
        assert_eq!(expand_topic_name("/ns", "node", "~").unwrap(), "/ns/node");
        assert_eq!(
            expand_topic_name("/", "node", "~/private").unwrap(),
            "/node/private"
        );
    }

    #[test]
    fn test_expand_relative() {
        assert_eq!(
            expand_topic_name("/ns", "node", "rel/topic").unwrap(),
            "/ns/rel/topic"
        );
        assert_eq!(expand_topic_name("/", "node", "rel").unwrap(), "/rel");
    }

    #[test]
    fn test_fqn_helpers() {
        assert_eq!(build_node_fqn("/a/b", "c"), "/a/b/c");
        assert!(is_absolute_name("/foo"));
        assert!(is_private_name("~/foo"));
        assert!(is_relative_name("foo"));
    }
}

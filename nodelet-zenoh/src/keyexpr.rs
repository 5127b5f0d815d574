//! Key expression builders for Zenoh.
//!
//! These produce key expressions compatible with rmw_zenoh_cpp so the
//! client can reach managers running under the standard Zenoh RMW.
//!
//! # Reference
//!
//! See [rmw_zenoh design - Topic and Service name mapping](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md#topic-and-service-name-mapping-to-zenoh-key-expressions)

/// Prefix for ROS2 liveliness tokens (hermetic namespace).
pub const LIVELINESS_PREFIX: &str = "@ros2_lv";

/// QoS segment for service entities, encoded against the rmw_zenoh defaults.
///
/// Services use keep-last history with depth 10; everything else matches
/// the RMW defaults and is left empty in the encoding.
pub const SERVICE_QOS_KEYEXPR: &str = "::,10:,:,:,,";

/// Entity kinds for liveliness tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Node entity
    Node,
    /// Service server
    ServiceServer,
    /// Service client
    ServiceClient,
}

impl EntityKind {
    /// Returns the two-character code for this entity kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "NN",
            Self::ServiceServer => "SS",
            Self::ServiceClient => "SC",
        }
    }
}

/// Build a service key expression.
///
/// Format: `<domain_id>/<fully_qualified_name>/<type_name>/<type_hash>`
///
/// The leading slash of the fully qualified name is dropped, Zenoh key
/// expressions must not start with `/`.
pub fn service_keyexpr(domain_id: u32, fq_name: &str, type_name: &str, type_hash: &str) -> String {
    let name = fq_name.strip_prefix('/').unwrap_or(fq_name);
    format!("{}/{}/{}/{}", domain_id, name, type_name, type_hash)
}

/// Build a liveliness token key expression for a node.
///
/// Format: `@ros2_lv/<domain_id>/<session_id>/<node_id>/<node_id>/NN/<mangled_enclave>/<mangled_namespace>/<node_name>`
pub fn liveliness_node_keyexpr(
    domain_id: u32,
    session_id: &str,
    node_id: u32,
    enclave: &str,
    namespace: &str,
    node_name: &str,
) -> String {
    let mangled_enclave = mangle_name(enclave);
    let mangled_namespace = mangle_name(namespace);

    format!(
        "{}/{}/{}/{}/{}/{}/{}/{}/{}",
        LIVELINESS_PREFIX,
        domain_id,
        session_id,
        node_id,
        node_id, // entity_id same as node_id for nodes
        EntityKind::Node.as_str(),
        mangled_enclave,
        mangled_namespace,
        node_name
    )
}

/// Build a liveliness token key expression for a service endpoint.
///
/// Format: `@ros2_lv/<domain_id>/<session_id>/<node_id>/<entity_id>/<entity_kind>/<mangled_enclave>/<mangled_namespace>/<node_name>/<mangled_service_name>/<type_name>/<type_hash>/<qos>`
#[allow(clippy::too_many_arguments)]
pub fn liveliness_entity_keyexpr(
    domain_id: u32,
    session_id: &str,
    node_id: u32,
    entity_id: u32,
    entity_kind: EntityKind,
    enclave: &str,
    namespace: &str,
    node_name: &str,
    fq_name: &str,
    type_name: &str,
    type_hash: &str,
) -> String {
    let mangled_enclave = mangle_name(enclave);
    let mangled_namespace = mangle_name(namespace);
    let mangled_fq_name = mangle_name(fq_name);

    format!(
        "{}/{}/{}/{}/{}/{}/{}/{}/{}/{}/{}/{}/{}",
        LIVELINESS_PREFIX,
        domain_id,
        session_id,
        node_id,
        entity_id,
        entity_kind.as_str(),
        mangled_enclave,
        mangled_namespace,
        node_name,
        mangled_fq_name,
        type_name,
        type_hash,
        SERVICE_QOS_KEYEXPR
    )
}

/// Mangle a name by replacing `/` with `%`.
///
/// Empty names become just `%`.
pub fn mangle_name(name: &str) -> String {
    if name.is_empty() {
        "%".to_string()
    } else {
        name.replace('/', "%")
    }
}

/// Unmangle a name by replacing `%` with `/`.
///
/// A single `%` becomes an empty string.
pub fn unmangle_name(mangled: &str) -> String {
    if mangled == "%" {
        String::new()
    } else {
        mangled.replace('%', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mangle_unmangle() {
        assert_eq!(mangle_name("/camera/nodelet_manager"), "%camera%nodelet_manager");
        assert_eq!(mangle_name(""), "%");
        assert_eq!(mangle_name("simple"), "simple");

        assert_eq!(unmangle_name("%camera%nodelet_manager"), "/camera/nodelet_manager");
        assert_eq!(unmangle_name("%"), "");
    }

    #[test]
    fn test_service_keyexpr() {
        let key = service_keyexpr(
            0,
            "/nodelet_manager/load_nodelet",
            "nodelet_interfaces::srv::dds_::NodeletLoad_",
            "RIHS01_abc123",
        );
        assert_eq!(
            key,
            "0/nodelet_manager/load_nodelet/nodelet_interfaces::srv::dds_::NodeletLoad_/RIHS01_abc123"
        );
    }

    #[test]
    fn test_service_keyexpr_different_domain() {
        let key = service_keyexpr(
            42,
            "/manager/unload_nodelet",
            "nodelet_interfaces::srv::dds_::NodeletUnload_",
            "RIHS01_def456",
        );
        assert!(key.starts_with("42/manager/unload_nodelet/"));
        assert!(!key.contains("//"));
    }

    #[test]
    fn test_entity_kind() {
        assert_eq!(EntityKind::Node.as_str(), "NN");
        assert_eq!(EntityKind::ServiceServer.as_str(), "SS");
        assert_eq!(EntityKind::ServiceClient.as_str(), "SC");
    }

    #[test]
    fn test_liveliness_node_keyexpr() {
        let key = liveliness_node_keyexpr(
            2,
            "aac3178e146ba6f1fc6e6a4085e77f21",
            0,
            "",
            "",
            "nodeletctl_7f2a",
        );
        assert_eq!(
            key,
            "@ros2_lv/2/aac3178e146ba6f1fc6e6a4085e77f21/0/0/NN/%/%/nodeletctl_7f2a"
        );
    }

    #[test]
    fn test_liveliness_node_keyexpr_with_namespace() {
        let key = liveliness_node_keyexpr(0, "abcd1234", 1, "", "/camera", "my_node");
        assert_eq!(key, "@ros2_lv/0/abcd1234/1/1/NN/%/%camera/my_node");
    }

    #[test]
    fn test_liveliness_service_client_keyexpr() {
        let key = liveliness_entity_keyexpr(
            2,
            "e1dc8d1b45ae8717fce78689cc655685",
            0,
            10,
            EntityKind::ServiceClient,
            "",
            "",
            "nodeletctl_1a2b",
            "/nodelet_manager/load_nodelet",
            "nodelet_interfaces::srv::dds_::NodeletLoad_",
            "RIHS01_abc123",
        );
        assert_eq!(
            key,
            "@ros2_lv/2/e1dc8d1b45ae8717fce78689cc655685/0/10/SC/%/%/nodeletctl_1a2b/%nodelet_manager%load_nodelet/nodelet_interfaces::srv::dds_::NodeletLoad_/RIHS01_abc123/::,10:,:,:,,"
        );
    }

    #[test]
    fn test_liveliness_service_server_keyexpr_parts() {
        let key = liveliness_entity_keyexpr(
            0,
            "session123",
            3,
            11,
            EntityKind::ServiceServer,
            "",
            "/robot",
            "manager",
            "/robot/manager/unload_nodelet",
            "nodelet_interfaces::srv::dds_::NodeletUnload_",
            "RIHS01_def",
        );
        let parts: Vec<&str> = key.split('/').collect();
        assert_eq!(parts[0], "@ros2_lv");
        assert_eq!(parts[3], "3"); // node_id
        assert_eq!(parts[4], "11"); // entity_id
        assert_eq!(parts[5], "SS");
        assert_eq!(parts[7], "%robot"); // mangled namespace
        assert_eq!(parts[9], "%robot%manager%unload_nodelet"); // mangled service name
        assert_eq!(parts[12], SERVICE_QOS_KEYEXPR);
    }
}

//! Graph cache for entity discovery.
//!
//! Tracks nodes, service servers, and service clients discovered through
//! Zenoh liveliness tokens. The client polls this cache while waiting for
//! a manager's services to come up.
//!
//! # Reference
//!
//! See [rmw_zenoh design - Graph Cache](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md#graph-cache)

use crate::keyexpr::{EntityKind, LIVELINESS_PREFIX, unmangle_name};
use std::collections::HashMap;
use zenoh::sample::SampleKind;

/// Information about a discovered entity.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    /// Domain ID
    pub domain_id: u32,
    /// Session ID (hex)
    pub session_id: String,
    /// Node ID
    pub node_id: u32,
    /// Entity ID
    pub entity_id: u32,
    /// Entity kind
    pub kind: EntityKind,
    /// SROS enclave
    pub enclave: String,
    /// Node namespace
    pub namespace: String,
    /// Node name
    pub node_name: String,
    /// Service name (None for nodes)
    pub service_name: Option<String>,
    /// Type name (None for nodes)
    pub type_name: Option<String>,
    /// Type hash (None for nodes)
    pub type_hash: Option<String>,
}

/// Graph cache storing discovered entities.
#[derive(Debug, Clone, Default)]
pub struct GraphCache {
    /// All discovered entities, keyed by liveliness token.
    entities: HashMap<String, EntityInfo>,
}

impl GraphCache {
    /// Create a new empty graph cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a liveliness token event.
    pub fn handle_liveliness_token(&mut self, key_expr: &str, kind: SampleKind) {
        match kind {
            SampleKind::Put => {
                if let Some(info) = Self::parse_liveliness_token(key_expr) {
                    self.entities.insert(key_expr.to_string(), info);
                }
            }
            SampleKind::Delete => {
                self.entities.remove(key_expr);
            }
        }
    }

    /// Parse a liveliness token key expression.
    ///
    /// Format for nodes:
    /// `@ros2_lv/<domain_id>/<session_id>/<node_id>/<node_id>/NN/<enclave>/<namespace>/<node_name>`
    ///
    /// Format for service endpoints:
    /// `@ros2_lv/<domain_id>/<session_id>/<node_id>/<entity_id>/<SS|SC>/<enclave>/<namespace>/<node_name>/<service>/<type>/<hash>/<qos>`
    ///
    /// Tokens for entity kinds this client does not track (publishers,
    /// subscribers) are ignored.
    fn parse_liveliness_token(key_expr: &str) -> Option<EntityInfo> {
        let parts: Vec<&str> = key_expr.split('/').collect();

        // Minimum parts for a node token
        if parts.len() < 9 {
            return None;
        }

        if parts[0] != LIVELINESS_PREFIX {
            return None;
        }

        let domain_id: u32 = parts[1].parse().ok()?;
        let session_id = parts[2].to_string();
        let node_id: u32 = parts[3].parse().ok()?;
        let entity_id: u32 = parts[4].parse().ok()?;
        let kind = match parts[5] {
            "NN" => EntityKind::Node,
            "SS" => EntityKind::ServiceServer,
            "SC" => EntityKind::ServiceClient,
            _ => return None,
        };
        let enclave = unmangle_name(parts[6]);
        let namespace = unmangle_name(parts[7]);
        let node_name = parts[8].to_string();

        let (service_name, type_name, type_hash) = if parts.len() >= 12 && kind != EntityKind::Node
        {
            (
                Some(unmangle_name(parts[9])),
                Some(parts[10].to_string()),
                Some(parts[11].to_string()),
            )
        } else {
            (None, None, None)
        };

        Some(EntityInfo {
            domain_id,
            session_id,
            node_id,
            entity_id,
            kind,
            enclave,
            namespace,
            node_name,
            service_name,
            type_name,
            type_hash,
        })
    }

    /// Get all fully qualified node names.
    pub fn get_node_names(&self) -> Vec<String> {
        self.entities
            .values()
            .filter(|e| e.kind == EntityKind::Node)
            .map(|e| {
                if e.namespace.is_empty() {
                    format!("/{}", e.node_name)
                } else {
                    format!("{}/{}", e.namespace, e.node_name)
                }
            })
            .collect()
    }

    /// Check if a node with the given fully qualified name is alive.
    pub fn has_node(&self, fq_node_name: &str) -> bool {
        self.get_node_names().iter().any(|n| n == fq_node_name)
    }

    /// Check if a service is available.
    pub fn is_service_available(&self, service_name: &str) -> bool {
        self.entities.values().any(|e| {
            e.kind == EntityKind::ServiceServer && e.service_name.as_deref() == Some(service_name)
        })
    }

    /// Get server info for a service.
    pub fn get_servers_info(&self, service_name: &str) -> Vec<&EntityInfo> {
        self.entities
            .values()
            .filter(|e| {
                e.kind == EntityKind::ServiceServer
                    && e.service_name.as_deref() == Some(service_name)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_node_token() {
        let mut cache = GraphCache::new();
        cache.handle_liveliness_token("@ros2_lv/0/abc123/0/0/NN/%/%/my_manager", SampleKind::Put);

        let names = cache.get_node_names();
        assert_eq!(names, vec!["/my_manager".to_string()]);
        assert!(cache.has_node("/my_manager"));
        assert!(!cache.has_node("/other"));
    }

    #[test]
    fn test_parse_node_token_with_namespace() {
        let mut cache = GraphCache::new();
        cache.handle_liveliness_token(
            "@ros2_lv/0/abc123/0/0/NN/%/%camera/manager",
            SampleKind::Put,
        );

        assert!(cache.has_node("/camera/manager"));
    }

    #[test]
    fn test_parse_service_server_token() {
        let mut cache = GraphCache::new();
        let token = "@ros2_lv/0/abc123/0/10/SS/%/%/manager/%manager%load_nodelet/nodelet_interfaces::srv::dds_::NodeletLoad_/RIHS01_abc/::,10:,:,:,,";
        cache.handle_liveliness_token(token, SampleKind::Put);

        assert!(cache.is_service_available("/manager/load_nodelet"));
        assert!(!cache.is_service_available("/manager/unload_nodelet"));

        let servers = cache.get_servers_info("/manager/load_nodelet");
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].node_name, "manager");
        assert_eq!(
            servers[0].type_name.as_deref(),
            Some("nodelet_interfaces::srv::dds_::NodeletLoad_")
        );
    }

    #[test]
    fn test_service_client_token_is_not_a_server() {
        let mut cache = GraphCache::new();
        let token = "@ros2_lv/0/abc123/0/10/SC/%/%/nodeletctl_1/%manager%load_nodelet/nodelet_interfaces::srv::dds_::NodeletLoad_/RIHS01_abc/::,10:,:,:,,";
        cache.handle_liveliness_token(token, SampleKind::Put);

        assert!(!cache.is_service_available("/manager/load_nodelet"));
    }

    #[test]
    fn test_delete_removes_entity() {
        let mut cache = GraphCache::new();
        let token = "@ros2_lv/0/abc123/0/10/SS/%/%/manager/%manager%load_nodelet/nodelet_interfaces::srv::dds_::NodeletLoad_/RIHS01_abc/::,10:,:,:,,";
        cache.handle_liveliness_token(token, SampleKind::Put);
        assert!(cache.is_service_available("/manager/load_nodelet"));

        cache.handle_liveliness_token(token, SampleKind::Delete);
        assert!(!cache.is_service_available("/manager/load_nodelet"));
    }

    #[test]
    fn test_publisher_tokens_are_ignored() {
        let mut cache = GraphCache::new();
        let token = "@ros2_lv/0/abc123/0/10/MP/%/%/talker/%chatter/std_msgs::msg::dds_::String_/RIHS01_abc/::,10:,:,:,,";
        cache.handle_liveliness_token(token, SampleKind::Put);

        assert!(cache.get_node_names().is_empty());
    }

    #[test]
    fn test_malformed_tokens_are_ignored() {
        let mut cache = GraphCache::new();
        cache.handle_liveliness_token("@ros2_lv/0/abc", SampleKind::Put);
        cache.handle_liveliness_token("not_a_token/0/abc/0/0/NN/%/%/x", SampleKind::Put);
        cache.handle_liveliness_token("@ros2_lv/bad/abc/0/0/NN/%/%/x", SampleKind::Put);

        assert!(cache.get_node_names().is_empty());
    }
}

//! Node abstraction.
//!
//! A [`Node`] is the unit a liveliness token is announced for. It resolves
//! service names against its namespace and the context's remap rules, and
//! creates service clients and servers.

use crate::{
    attachment::generate_gid,
    context::Context,
    error::Result,
    keyexpr::liveliness_node_keyexpr,
    service::{client::Client, server::Server},
    typesupport::{ServiceMsg, TypeSupport},
};
use nodelet_args::RemapRule;
use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};
use zenoh::Wait;
use zenoh::liveliness::LivelinessToken;

/// Inner node data.
struct NodeInner {
    /// Parent context.
    context: Context,
    /// Node ID within the context.
    node_id: u32,
    /// Effective node name (after `__node` remapping).
    name: String,
    /// Name the node was created with, used for rule matching.
    original_name: String,
    /// Effective node namespace (after `__ns` remapping).
    namespace: String,
    /// Node GID.
    gid: [u8; 16],
    /// Next entity ID counter.
    next_entity_id: AtomicU32,
    /// Liveliness token for this node (kept alive).
    _liveliness_token: LivelinessToken,
}

/// A node within a [`Context`].
///
/// # Example
///
/// ```ignore
/// let ctx = Context::new()?;
/// let node = ctx.create_node("nodeletctl_1", None)?;
/// let client = node.create_client::<NodeletLoad>("/manager/load_nodelet")?;
/// ```
pub struct Node {
    inner: Arc<NodeInner>,
}

impl Node {
    /// Create a new node.
    pub(crate) fn new(
        context: Context,
        node_id: u32,
        name: &str,
        namespace: &str,
    ) -> Result<Arc<Self>> {
        // Apply __node / __ns remap rules
        let effective_name = apply_identity_remap(context.args().remap_rules.as_slice(), name, "__node")
            .unwrap_or_else(|| name.to_string());
        let effective_namespace =
            apply_identity_remap(context.args().remap_rules.as_slice(), name, "__ns")
                .unwrap_or_else(|| namespace.to_string());

        nodelet_args::names::validate_node_name(&effective_name)?;
        if !effective_namespace.is_empty() {
            nodelet_args::names::validate_namespace(&effective_namespace)?;
        }

        let gid = generate_gid();

        let token_key = liveliness_node_keyexpr(
            context.domain_id(),
            context.session_id(),
            node_id,
            "", // enclave is unused without SROS
            &effective_namespace,
            &effective_name,
        );

        let token = context
            .session()
            .liveliness()
            .declare_token(&token_key)
            .wait()?;

        let inner = Arc::new(NodeInner {
            context,
            node_id,
            name: effective_name,
            original_name: name.to_string(),
            namespace: effective_namespace,
            gid,
            next_entity_id: AtomicU32::new(10), // start at 10 to match rmw_zenoh
            _liveliness_token: token,
        });

        Ok(Arc::new(Node { inner }))
    }

    /// Get the effective node name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Get the name the node was created with, before `__node` remapping.
    pub fn original_name(&self) -> &str {
        &self.inner.original_name
    }

    /// Get the node namespace.
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// Get the fully qualified node name.
    pub fn fully_qualified_name(&self) -> String {
        nodelet_args::names::build_node_fqn(
            if self.inner.namespace.is_empty() {
                "/"
            } else {
                &self.inner.namespace
            },
            &self.inner.name,
        )
    }

    /// Get the node GID.
    pub fn gid(&self) -> &[u8; 16] {
        &self.inner.gid
    }

    /// Get the parent context.
    pub fn context(&self) -> &Context {
        &self.inner.context
    }

    /// Get the node ID.
    pub fn node_id(&self) -> u32 {
        self.inner.node_id
    }

    /// Allocate a new entity ID.
    pub(crate) fn allocate_entity_id(&self) -> u32 {
        self.inner.next_entity_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Expand a service name to its fully qualified form and apply
    /// remapping rules.
    ///
    /// This function:
    /// 1. Validates the input name
    /// 2. Expands `~` (private) and relative names to fully qualified names
    /// 3. Applies any remapping rules from command-line arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid.
    pub fn expand_and_remap_name(&self, name: &str) -> Result<String> {
        nodelet_args::names::validate_topic_name(name)?;

        let namespace = if self.inner.namespace.is_empty() {
            "/"
        } else {
            &self.inner.namespace
        };

        let expanded =
            nodelet_args::names::expand_topic_name(namespace, &self.inner.name, name)?;

        Ok(self.apply_remap_rules(&expanded))
    }

    /// Apply remapping rules to a fully qualified name.
    fn apply_remap_rules(&self, fq_name: &str) -> String {
        let node_name = &self.inner.name;
        let namespace = if self.inner.namespace.is_empty() {
            "/"
        } else {
            &self.inner.namespace
        };

        for rule in &self.inner.context.args().remap_rules {
            if !rule.applies_to_node(node_name) {
                continue;
            }
            // Identity rules are handled at node creation
            if rule.from == "__node" || rule.from == "__ns" {
                continue;
            }

            if rule.from == fq_name {
                return rule.to.clone();
            }

            // Relative rule: expand both sides before comparing
            if !rule.from.starts_with('/')
                && let Ok(expanded_from) =
                    nodelet_args::names::expand_topic_name(namespace, node_name, &rule.from)
                && expanded_from == fq_name
            {
                if rule.to.starts_with('/') {
                    return rule.to.clone();
                }
                if let Ok(expanded_to) =
                    nodelet_args::names::expand_topic_name(namespace, node_name, &rule.to)
                {
                    return expanded_to;
                }
                return rule.to.clone();
            }
        }

        fq_name.to_string()
    }

    /// Create a service client.
    ///
    /// # Arguments
    ///
    /// * `service_name` - Service name (can be absolute, relative, or private `~`)
    ///
    /// # Name Resolution
    ///
    /// - Absolute names (starting with `/`) are used as-is
    /// - Relative names are prefixed with the node's namespace
    /// - Private names (starting with `~`) are prefixed with the node's FQN
    /// - Remapping rules from command-line arguments are applied
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the Zenoh entities
    /// cannot be declared.
    pub fn create_client<T: ServiceMsg>(self: &Arc<Self>, service_name: &str) -> Result<Client<T>>
    where
        T::Request: TypeSupport,
        T::Response: TypeSupport,
    {
        let fq_service_name = self.expand_and_remap_name(service_name)?;
        Client::new(self.clone(), service_name, &fq_service_name)
    }

    /// Create a service server.
    ///
    /// The service name is expanded and remapped (see [`Node::create_client`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the Zenoh entities
    /// cannot be declared.
    pub fn create_server<T: ServiceMsg>(self: &Arc<Self>, service_name: &str) -> Result<Server<T>>
    where
        T::Request: TypeSupport,
        T::Response: TypeSupport,
    {
        let fq_service_name = self.expand_and_remap_name(service_name)?;
        Server::new(self.clone(), service_name, &fq_service_name)
    }
}

/// Look up a `__node` or `__ns` identity remap that applies to `node_name`.
fn apply_identity_remap(rules: &[RemapRule], node_name: &str, key: &str) -> Option<String> {
    rules
        .iter()
        .find(|rule| rule.from == key && rule.applies_to_node(node_name))
        .map(|rule| rule.to.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(from: &str, to: &str) -> RemapRule {
        RemapRule::new_global(from.to_string(), to.to_string())
    }

    #[test]
    fn test_identity_remap_lookup() {
        let rules = vec![global("__node", "renamed"), global("__ns", "/deep")];
        assert_eq!(
            apply_identity_remap(&rules, "orig", "__node"),
            Some("renamed".to_string())
        );
        assert_eq!(
            apply_identity_remap(&rules, "orig", "__ns"),
            Some("/deep".to_string())
        );
        assert_eq!(apply_identity_remap(&rules, "orig", "__missing"), None);
    }

    #[test]
    fn test_identity_remap_node_specific() {
        let rules = vec![RemapRule::new_node_specific(
            "other".to_string(),
            "__node".to_string(),
            "renamed".to_string(),
        )];
        assert_eq!(apply_identity_remap(&rules, "mine", "__node"), None);
        assert_eq!(
            apply_identity_remap(&rules, "other", "__node"),
            Some("renamed".to_string())
        );
    }
}

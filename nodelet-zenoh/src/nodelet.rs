//! Client for a remote nodelet manager.
//!
//! [`NodeletManagerClient`] wraps the `load_nodelet` and `unload_nodelet`
//! services a manager offers. Each operation resolves the service name
//! against the caller's node, waits for the manager with a bounded
//! deadline, and issues exactly one call.

use crate::{
    error::Result,
    node::Node,
    srv::{
        NodeletLoad, NodeletLoadRequest, NodeletUnload, NodeletUnloadRequest, Parameter,
        SetParameters, SetParametersRequest,
    },
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default deadline for waiting on a manager's services and replies.
pub const DEFAULT_SERVICE_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for loading and unloading nodelets on a remote manager.
pub struct NodeletManagerClient {
    /// Node the service clients hang off.
    node: Arc<Node>,
    /// Manager name, absolute or relative to the node's namespace.
    manager: String,
    /// Deadline for service discovery and for each call.
    service_timeout: Duration,
}

impl NodeletManagerClient {
    /// Create a client for the given manager.
    ///
    /// # Errors
    ///
    /// Returns an error if `manager` is not a valid name.
    pub fn new(node: Arc<Node>, manager: &str, service_timeout: Duration) -> Result<Self> {
        nodelet_args::names::validate_topic_name(manager)?;
        Ok(Self {
            node,
            manager: manager.to_string(),
            service_timeout,
        })
    }

    /// The manager this client talks to.
    pub fn manager(&self) -> &str {
        &self.manager
    }

    /// Ask the manager to load a nodelet.
    ///
    /// Collects the remap rules active for the calling process and ships
    /// them with the request. After the manager confirms the load, the
    /// caller's parameter subtree is delivered to the new nodelet through
    /// its `set_parameters` service, so the nodelet ends up with the same
    /// configuration the caller was given.
    ///
    /// Returns the manager's verdict: `Ok(true)` if it instantiated the
    /// nodelet, `Ok(false)` if it declined.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ServiceUnavailable`] if the manager's
    /// `load_nodelet` service did not appear within the client's timeout,
    /// or [`crate::Error::Timeout`] if the call itself got no reply.
    pub async fn load_nodelet(&self, name: &str, type_name: &str) -> Result<bool> {
        let (remap_source_args, remap_target_args) = self.collect_remappings();

        // The target nodelet inherits the caller's parameter subtree
        let copied = {
            let ctx = self.node.context();
            let mut params = ctx.params().lock();
            params.load_from_args(ctx.args(), self.node.original_name())?;
            params.copy_subtree(self.node.original_name(), name)
        };
        if copied > 0 {
            debug!("staged {} parameter(s) for {}", copied, name);
        }

        let request = NodeletLoadRequest {
            name: name.to_string(),
            type_name: type_name.to_string(),
            remap_source_args,
            remap_target_args,
        };

        let service = format!("{}/load_nodelet", self.manager);
        let client = self.node.create_client::<NodeletLoad>(&service)?;

        info!(
            "waiting for service {} (timeout {:?})",
            client.fq_service_name(),
            self.service_timeout
        );
        client.wait_for_service(self.service_timeout).await?;

        let reply = client
            .call_with_timeout(&request, self.service_timeout)
            .await?;
        if reply.response.success {
            info!("loaded nodelet {} of type {}", name, type_name);
            // The nodelet is up, hand it the staged parameter subtree
            if let Err(e) = self.forward_parameters(name).await {
                warn!("failed to deliver parameters to {}: {}", name, e);
            }
        } else {
            warn!("manager refused to load nodelet {}", name);
        }
        Ok(reply.response.success)
    }

    /// Ship the parameter subtree staged under `name` to the loaded
    /// nodelet's `set_parameters` service.
    ///
    /// Nodelets run inside the manager process, which hosts the standard
    /// parameter services under each nodelet's name. Nothing staged means
    /// nothing to send.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ServiceUnavailable`] if the nodelet's
    /// parameter service did not appear within the client's timeout, or
    /// [`crate::Error::Timeout`] if the call itself got no reply.
    async fn forward_parameters(&self, name: &str) -> Result<()> {
        let parameters: Vec<Parameter> = {
            let ctx = self.node.context();
            let params = ctx.params().lock();
            let Some(subtree) = params.node_params(name) else {
                return Ok(());
            };
            subtree
                .iter()
                .map(|(param, value)| Parameter {
                    name: param.clone(),
                    value: value.into(),
                })
                .collect()
        };
        if parameters.is_empty() {
            return Ok(());
        }

        let service = format!("{}/set_parameters", name);
        let client = self.node.create_client::<SetParameters>(&service)?;
        client.wait_for_service(self.service_timeout).await?;

        let count = parameters.len();
        let reply = client
            .call_with_timeout(&SetParametersRequest { parameters }, self.service_timeout)
            .await?;
        for result in reply.response.results.iter().filter(|r| !r.successful) {
            warn!("{} rejected a parameter: {}", name, result.reason);
        }
        debug!("delivered {} parameter(s) to {}", count, name);
        Ok(())
    }

    /// Ask the manager to unload a nodelet.
    ///
    /// Returns `Ok(true)` if the manager removed the nodelet, `Ok(false)`
    /// if it declined (e.g. the name is not loaded).
    ///
    /// # Errors
    ///
    /// Same failure modes as [`NodeletManagerClient::load_nodelet`].
    pub async fn unload_nodelet(&self, name: &str) -> Result<bool> {
        let request = NodeletUnloadRequest {
            name: name.to_string(),
        };

        let service = format!("{}/unload_nodelet", self.manager);
        let client = self.node.create_client::<NodeletUnload>(&service)?;

        info!(
            "waiting for service {} (timeout {:?})",
            client.fq_service_name(),
            self.service_timeout
        );
        client.wait_for_service(self.service_timeout).await?;

        let reply = client
            .call_with_timeout(&request, self.service_timeout)
            .await?;
        if reply.response.success {
            info!("unloaded nodelet {}", name);
        } else {
            warn!("manager refused to unload nodelet {}", name);
        }
        Ok(reply.response.success)
    }

    /// Split the remap rules active for the calling node into
    /// index-aligned source/target vectors.
    ///
    /// Node-identity rules (`__node`, `__ns`) stay local, they already
    /// shaped this process's node and shouldn't leak into the nodelet.
    fn collect_remappings(&self) -> (Vec<String>, Vec<String>) {
        let mut sources = Vec::new();
        let mut targets = Vec::new();
        let ctx = self.node.context();
        for rule in ctx.args().get_remap_rules_for_node(self.node.original_name()) {
            if rule.from == "__node" || rule.from == "__ns" {
                continue;
            }
            info!("remapping {} -> {}", rule.from, rule.to);
            sources.push(rule.from.clone());
            targets.push(rule.to.clone());
        }
        (sources, targets)
    }
}

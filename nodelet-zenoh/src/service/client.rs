//! Service client.
//!
//! # Reference
//!
//! See [rmw_zenoh design - Service Clients](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md#service-clients)

use crate::{
    attachment::{Attachment, GID_SIZE, generate_gid},
    error::{Error, Result},
    keyexpr::{EntityKind, liveliness_entity_keyexpr, service_keyexpr},
    node::Node,
    typesupport::{ServiceMsg, TypeSupport},
};
use std::{
    marker::PhantomData,
    sync::{Arc, atomic::AtomicI64},
    time::{Duration, Instant},
};
use zenoh::query::QueryTarget;
use zenoh::{Wait, bytes::ZBytes};

/// How often [`Client::wait_for_service`] re-checks the graph cache.
const SERVICE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Service client response with header.
pub struct ClientResponse<T> {
    /// Response data.
    pub response: T,
    /// Response attachment (required by the rmw_zenoh protocol).
    pub attachment: Attachment,
}

/// Service client.
///
/// Sends requests to a service server and receives responses.
///
/// # Example
///
/// ```ignore
/// let client = node.create_client::<NodeletLoad>("/manager/load_nodelet")?;
/// client.wait_for_service(Duration::from_secs(10)).await?;
/// let response = client.call(&request).await?;
/// ```
pub struct Client<T: ServiceMsg> {
    /// Parent node.
    node: Arc<Node>,
    /// Service name as given by the caller.
    service_name: String,
    /// Fully qualified service name.
    fq_service_name: String,
    /// Key expression for queries.
    key_expr: String,
    /// Client GID.
    gid: [u8; GID_SIZE],
    /// Sequence number counter.
    sequence_number: AtomicI64,
    /// Liveliness token.
    _liveliness_token: zenoh::liveliness::LivelinessToken,
    /// Phantom data for service type.
    _phantom: PhantomData<T>,
}

impl<T: ServiceMsg> Client<T>
where
    T::Request: TypeSupport,
    T::Response: TypeSupport,
{
    /// Create a new service client.
    ///
    /// # Arguments
    ///
    /// * `node` - Parent node
    /// * `service_name` - Original service name (for display)
    /// * `fq_service_name` - Fully qualified service name (already expanded and remapped)
    pub(crate) fn new(node: Arc<Node>, service_name: &str, fq_service_name: &str) -> Result<Self> {
        let type_name = T::type_name();
        let type_hash = T::type_hash();

        let key_expr = service_keyexpr(
            node.context().domain_id(),
            fq_service_name,
            type_name,
            type_hash,
        );

        let gid = generate_gid();
        let entity_id = node.allocate_entity_id();

        let token_key = liveliness_entity_keyexpr(
            node.context().domain_id(),
            node.context().session_id(),
            node.node_id(),
            entity_id,
            EntityKind::ServiceClient,
            "",
            node.namespace(),
            node.name(),
            fq_service_name,
            type_name,
            type_hash,
        );

        let liveliness_token = node
            .context()
            .session()
            .liveliness()
            .declare_token(&token_key)
            .wait()?;

        Ok(Client {
            node,
            service_name: service_name.to_string(),
            fq_service_name: fq_service_name.to_string(),
            key_expr,
            gid,
            sequence_number: AtomicI64::new(0),
            _liveliness_token: liveliness_token,
            _phantom: PhantomData,
        })
    }

    /// Get the service name.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Get the fully qualified service name.
    pub fn fq_service_name(&self) -> &str {
        &self.fq_service_name
    }

    /// Get the client GID.
    pub fn gid(&self) -> &[u8; GID_SIZE] {
        &self.gid
    }

    /// Check if the service is available.
    pub fn is_service_available(&self) -> bool {
        self.node
            .context()
            .graph_cache()
            .is_service_available(&self.fq_service_name)
    }

    /// Wait until a server advertises this service, up to `timeout`.
    ///
    /// The graph cache is polled every 100ms.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceUnavailable`] if no server showed up
    /// within the deadline.
    pub async fn wait_for_service(&self, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        loop {
            if self.is_service_available() {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(Error::ServiceUnavailable {
                    service: self.fq_service_name.clone(),
                    waited: start.elapsed(),
                });
            }
            tokio::time::sleep(SERVICE_POLL_INTERVAL).await;
        }
    }

    /// Send a request and wait for a response.
    ///
    /// Replies are matched against the request's sequence number, the
    /// server echoes it back in the attachment. Replies with a different
    /// sequence number are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Serialization fails
    /// - The query fails
    /// - No response is received
    /// - The response is missing its attachment (protocol violation)
    /// - Deserialization fails
    pub async fn call(&self, request: &T::Request) -> Result<ClientResponse<T::Response>> {
        let payload = request.to_bytes()?;
        let seq = self
            .sequence_number
            .fetch_add(1, std::sync::atomic::Ordering::AcqRel);
        let attachment = Attachment::new(seq, self.gid);
        let attachment_bytes = attachment.to_bytes();

        let replies = self
            .node
            .context()
            .session()
            .get(&self.key_expr)
            .payload(payload)
            .attachment(ZBytes::from(attachment_bytes.to_vec()))
            .target(QueryTarget::All)
            .await?;

        loop {
            let reply = replies
                .recv_async()
                .await
                .map_err(|_| Error::ChannelClosed)?;
            let sample = reply
                .result()
                .map_err(|e| Error::ServiceError(format!("{e:?}")))?;
            let attachment_bytes = sample.attachment().ok_or(Error::MissingAttachment)?;
            let response_attachment = Attachment::from_bytes(&attachment_bytes.to_bytes())?;
            // Another in-flight request's reply, keep waiting
            if response_attachment.sequence_number != seq {
                continue;
            }
            let response_bytes: Vec<u8> = sample.payload().to_bytes().to_vec();
            let response = T::Response::from_bytes(&response_bytes)?;

            return Ok(ClientResponse {
                response,
                attachment: response_attachment,
            });
        }
    }

    /// Send a request with a response deadline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if no matching reply arrived within
    /// `timeout`, or any error from [`Client::call`].
    pub async fn call_with_timeout(
        &self,
        request: &T::Request,
        timeout: Duration,
    ) -> Result<ClientResponse<T::Response>> {
        match tokio::time::timeout(timeout, self.call(request)).await {
            Ok(v) => v,
            Err(_) => Err(Error::Timeout),
        }
    }

    /// Get the parent node.
    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }
}

//! Service server.
//!
//! # Reference
//!
//! See [rmw_zenoh design - Service Servers](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md#service-servers)

use crate::{
    attachment::{Attachment, GID_SIZE, generate_gid},
    error::{Error, Result},
    keyexpr::{EntityKind, liveliness_entity_keyexpr, service_keyexpr},
    node::Node,
    typesupport::{ServiceMsg, TypeSupport},
};
use std::{marker::PhantomData, sync::Arc};
use zenoh::{Wait, bytes::ZBytes, query::Query};

/// Incoming service request with sender for the response.
pub struct ServiceRequest<T: ServiceMsg> {
    /// Request data.
    pub request: T::Request,
    /// Request attachment.
    pub attachment: Option<Attachment>,
    /// Sender for response.
    sender: RequestSender<T>,
}

impl<T: ServiceMsg> ServiceRequest<T>
where
    T::Response: TypeSupport,
{
    /// Send a response to this request.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the Zenoh reply fails.
    pub fn respond(self, response: T::Response) -> Result<()> {
        self.sender.send(response)
    }
}

/// Sender for a service response.
struct RequestSender<T: ServiceMsg> {
    query: Query,
    client_gid: [u8; GID_SIZE],
    sequence_number: i64,
    _phantom: PhantomData<T>,
}

impl<T: ServiceMsg> RequestSender<T>
where
    T::Response: TypeSupport,
{
    fn send(self, response: T::Response) -> Result<()> {
        let payload = response.to_bytes()?;

        // Echo back the client's seq and gid so it can match the reply
        let attachment = Attachment::new(self.sequence_number, self.client_gid);
        let attachment_bytes = attachment.to_bytes();

        self.query
            .reply(self.query.key_expr().clone(), payload)
            .attachment(ZBytes::from(attachment_bytes.to_vec()))
            .wait()
            .map_err(|e| Error::Zenoh(e.into()))?;

        Ok(())
    }
}

/// Service server.
///
/// Receives requests and sends responses.
///
/// # Example
///
/// ```ignore
/// let mut server = node.create_server::<NodeletLoad>("~/load_nodelet")?;
///
/// loop {
///     let request = server.recv().await?;
///     request.respond(NodeletLoadResponse { success: true })?;
/// }
/// ```
pub struct Server<T: ServiceMsg> {
    /// Parent node.
    node: Arc<Node>,
    /// Service name as given by the caller.
    service_name: String,
    /// Fully qualified service name.
    fq_service_name: String,
    /// Server GID.
    gid: [u8; GID_SIZE],
    /// Request receiver channel.
    receiver: flume::Receiver<(Query, Vec<u8>, Option<Vec<u8>>)>,
    /// Liveliness token.
    _liveliness_token: zenoh::liveliness::LivelinessToken,
    /// Zenoh queryable (kept alive).
    _queryable: zenoh::query::Queryable<()>,
    /// Phantom data for service type.
    _phantom: PhantomData<T>,
}

impl<T: ServiceMsg> Server<T>
where
    T::Request: TypeSupport,
    T::Response: TypeSupport,
{
    /// Create a new service server.
    pub(crate) fn new(node: Arc<Node>, service_name: &str, fq_service_name: &str) -> Result<Self> {
        let type_name = T::type_name();
        let type_hash = T::type_hash();

        let key_expr = service_keyexpr(
            node.context().domain_id(),
            fq_service_name,
            type_name,
            type_hash,
        );

        let (sender, receiver) = flume::bounded(32);

        let queryable = node
            .context()
            .session()
            .declare_queryable(&key_expr)
            .complete(true) // this server can answer all queries on the key
            .callback(move |query| {
                let payload = query
                    .payload()
                    .map(|p| p.to_bytes().to_vec())
                    .unwrap_or_default();
                let attachment = query.attachment().map(|a| a.to_bytes().to_vec());
                let _ = sender.try_send((query, payload, attachment));
            })
            .wait()?;

        let gid = generate_gid();
        let entity_id = node.allocate_entity_id();

        let token_key = liveliness_entity_keyexpr(
            node.context().domain_id(),
            node.context().session_id(),
            node.node_id(),
            entity_id,
            EntityKind::ServiceServer,
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

        Ok(Server {
            node,
            service_name: service_name.to_string(),
            fq_service_name: fq_service_name.to_string(),
            gid,
            receiver,
            _liveliness_token: liveliness_token,
            _queryable: queryable,
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

    /// Get the server GID.
    pub fn gid(&self) -> &[u8; GID_SIZE] {
        &self.gid
    }

    /// Receive a request asynchronously.
    ///
    /// Returns a [`ServiceRequest`] that can be used to send a response.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel was closed or the request payload
    /// does not deserialize.
    pub async fn recv(&mut self) -> Result<ServiceRequest<T>> {
        let (query, payload, attachment_bytes) = self
            .receiver
            .recv_async()
            .await
            .map_err(|_| Error::ChannelClosed)?;

        let request = T::Request::from_bytes(&payload)?;

        let attachment = attachment_bytes
            .as_deref()
            .and_then(|bytes| Attachment::from_bytes(bytes).ok());

        // Clients without an attachment get seq 0 and a zero GID echoed back
        let (sequence_number, client_gid) = attachment
            .as_ref()
            .map(|a| (a.sequence_number, a.gid))
            .unwrap_or((0, [0u8; GID_SIZE]));

        let sender = RequestSender {
            query,
            client_gid,
            sequence_number,
            _phantom: PhantomData,
        };

        Ok(ServiceRequest {
            request,
            attachment,
            sender,
        })
    }

    /// Get the parent node.
    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }
}

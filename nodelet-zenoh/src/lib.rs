//! Nodelet manager client over Zenoh middleware.
//!
//! This crate talks to a nodelet manager through the `load_nodelet` and
//! `unload_nodelet` services, over a Zenoh session compatible with
//! `rmw_zenoh_cpp`. It carries the plumbing that requires: service
//! clients and servers over queryables, graph discovery via liveliness
//! tokens, CDR type support, name expansion/remapping, and a per-context
//! parameter store.
//!
//! # Architecture
//!
//! The middleware layer follows the [rmw_zenoh design](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md):
//!
//! - Each [`Context`] maps to a Zenoh session
//! - [`Node`]s are logical groupings with liveliness tokens
//! - [`Client`]/[`Server`] use Zenoh queryables
//! - Graph discovery via Zenoh liveliness tokens
//!
//! # Example
//!
//! ```ignore
//! use nodelet_zenoh::{Context, NodeletManagerClient, DEFAULT_SERVICE_TIMEOUT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = Context::new()?;
//!     let node = ctx.create_node("nodeletctl_1", None)?;
//!     let manager = NodeletManagerClient::new(node, "/nodelet_manager", DEFAULT_SERVICE_TIMEOUT)?;
//!     let loaded = manager.load_nodelet("/my_nodelet", "pkg/Class").await?;
//!     std::process::exit(if loaded { 0 } else { 1 });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod attachment;
mod context;
mod error;
mod graph_cache;
mod keyexpr;
mod node;
mod nodelet;
mod typesupport;

pub mod logger;
pub mod parameter;
pub mod service;
pub mod srv;

// Re-exports
pub use attachment::{ATTACHMENT_SIZE, Attachment, GID_SIZE, generate_gid};
pub use context::{Context, DEFAULT_ROUTER_ENDPOINT, ROS_DOMAIN_ID, ZENOH_SESSION_CONFIG_URI};
pub use error::{Error, Result};
pub use graph_cache::{EntityInfo, GraphCache};
pub use keyexpr::EntityKind;
pub use node::Node;
pub use nodelet::{DEFAULT_SERVICE_TIMEOUT, NodeletManagerClient};
pub use parameter::{ParameterStore, Value};
pub use service::{Client, ClientResponse, Server, ServiceRequest};
pub use typesupport::{ServiceMsg, TypeSupport, cdr_deserialize, cdr_serialize};

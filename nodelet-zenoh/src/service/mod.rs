//! Service client and server over Zenoh queryables.
//!
//! # Reference
//!
//! See [rmw_zenoh design - Services](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md#service-clients)

pub mod client;
pub mod server;

pub use client::{Client, ClientResponse};
pub use server::{Server, ServiceRequest};

//! Async message bridge for Stencil.
//!
//! Some UI surfaces run isolated from the host and can only exchange opaque
//! messages with it. This crate turns that channel into typed async calls:
//! * [`Bridge`]: correlation ids, pending requests, timeouts
//! * [`HostEndpoint`]: decodes requests host-side and answers them
//! * [`RemoteServices`]: typed wrappers for every [`ServiceRequest`]

pub mod bridge;
pub mod error;
pub mod host;
pub mod id;
pub mod message;
pub mod remote;

pub use bridge::{Bridge, DEFAULT_TIMEOUT, MessageSink};
pub use error::{BridgeError, Result};
pub use host::HostEndpoint;
pub use id::CorrelationIdGen;
pub use message::{Inbound, Outbound, ServiceRequest};
pub use remote::RemoteServices;

//! Backend gateway
//!
//! Authenticated HTTP calls to the interview service:
//! - `POST /interview/start-room` - allocate a media room and token
//! - `POST /interview/start-interviewer` - put the AI interviewer in a room
//!
//! Room responses are validated and their transport endpoint is resolved here,
//! so callers only ever see a complete [`RoomProvisionResult`].

pub mod backend;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod messages;

pub use backend::InterviewBackend;
pub use client::BackendGateway;
pub use endpoint::{derive_transport_endpoint, resolve_transport_endpoint, EndpointSource};
pub use error::GatewayError;
pub use messages::{InterviewerAck, RoomProvisionResult};

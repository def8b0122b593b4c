use super::error::GatewayError;
use super::messages::{InterviewerAck, RoomProvisionResult};

/// Backend operations the session controller depends on
///
/// Implementations:
/// - [`BackendGateway`](super::BackendGateway): the HTTP interview service
/// - test doubles that script responses
#[async_trait::async_trait]
pub trait InterviewBackend: Send + Sync {
    /// Allocate a media room and credentials for it
    async fn provision_room(&self) -> Result<RoomProvisionResult, GatewayError>;

    /// Ask the backend to put the AI interviewer into `room_name`
    async fn start_interviewer(
        &self,
        room_name: &str,
        resume: &str,
        job_description: &str,
    ) -> Result<InterviewerAck, GatewayError>;
}

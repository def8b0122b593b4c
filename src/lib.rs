pub mod config;
pub mod gateway;
pub mod http;
pub mod media;
pub mod session;

pub use config::Config;
pub use gateway::{BackendGateway, GatewayError, InterviewBackend, RoomProvisionResult};
pub use http::{create_router, AppState, SessionSnapshot};
pub use media::{ConnectionState, MediaConnection, MediaEvent, RoomOptions};
pub use session::{
    InterviewSubmission, InterviewerStatus, Session, SessionController, SessionStatus, StatusView,
};

//! Interview session management
//!
//! This module provides the `SessionController` that manages:
//! - The interview state machine (setup → creating-room → active → ended)
//! - Room provisioning through the backend gateway
//! - Fire-and-forget interviewer start
//! - Mapping of backend failures to user-facing messages
//! - Status presentation for the front-end

mod controller;
mod failure;
mod state;
mod submission;
mod view;

pub use controller::{InterviewerStatus, SessionController};
pub use failure::{Failure, FailureCategory};
pub use state::{Session, SessionAction, SessionId, SessionStatus, TransitionError};
pub use submission::{InterviewSubmission, SubmissionError, SubmissionForm};
pub use view::{is_loading, StatusView};

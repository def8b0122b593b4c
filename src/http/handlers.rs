use super::state::AppState;
use crate::media::{ConnectionState, MediaEvent, RoomOptions, MISSING_CREDENTIALS};
use crate::session::{
    InterviewSubmission, InterviewerStatus, Session, SessionController, SessionId, SessionStatus,
    StatusView, SubmissionForm,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Everything the front-end needs to render the current status
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub room_name: Option<String>,
    pub token: Option<String>,
    pub websocket_url: Option<String>,
    pub error: Option<String>,
    pub view: StatusView,
    pub connection_state: ConnectionState,
    pub connection_label: &'static str,
    pub interviewer: InterviewerStatus,

    /// Media SDK settings, present while active
    pub room_options: Option<RoomOptions>,

    /// Set when the room came back without a token or server address
    pub connection_error: Option<&'static str>,
    pub active_since: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    pub fn capture(controller: &SessionController) -> Self {
        let session: Session = controller.snapshot();
        let connection_state = controller.connection_state();

        Self {
            session_id: session.id(),
            status: session.status(),
            room_name: session.room_name().map(str::to_string),
            token: session.credential().map(str::to_string),
            websocket_url: session.transport_endpoint().map(str::to_string),
            error: session.error_message().map(str::to_string),
            view: StatusView::for_session(&session),
            connection_state,
            connection_label: connection_state.label(),
            interviewer: controller.interviewer_status(),
            room_options: session.connection().map(|_| RoomOptions::default()),
            connection_error: session
                .connection()
                .filter(|connection| !connection.has_credentials())
                .map(|_| MISSING_CREDENTIALS),
            active_since: session.active_since(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /interview
/// Current session snapshot
pub async fn get_interview(State(state): State<AppState>) -> impl IntoResponse {
    Json(SessionSnapshot::capture(&state.controller))
}

/// POST /interview/start
/// Submit resume and job description and begin room provisioning
pub async fn start_interview(
    State(state): State<AppState>,
    Json(form): Json<SubmissionForm>,
) -> impl IntoResponse {
    let submission = match InterviewSubmission::try_from(form) {
        Ok(s) => s,
        Err(e) => {
            warn!("Rejected interview submission: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e);
        }
    };

    match state.controller.submit(submission) {
        Ok(_provisioning) => {
            info!("Interview submission accepted");
            (
                StatusCode::ACCEPTED,
                Json(SessionSnapshot::capture(&state.controller)),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Cannot start interview: {}", e);
            error_response(StatusCode::CONFLICT, e)
        }
    }
}

/// POST /interview/leave
/// Leave the active interview
pub async fn leave_interview(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.leave() {
        Ok(_) => Json(SessionSnapshot::capture(&state.controller)).into_response(),
        Err(e) => error_response(StatusCode::CONFLICT, e),
    }
}

/// POST /interview/restart
/// Return to setup after the interview ended or failed
pub async fn restart_interview(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.restart() {
        Ok(_) => Json(SessionSnapshot::capture(&state.controller)).into_response(),
        Err(e) => error_response(StatusCode::CONFLICT, e),
    }
}

/// POST /interview/media-event
/// Connection events reported by the media SDK
pub async fn media_event(
    State(state): State<AppState>,
    Json(event): Json<MediaEvent>,
) -> impl IntoResponse {
    state.controller.handle_media_event(event);
    Json(SessionSnapshot::capture(&state.controller))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

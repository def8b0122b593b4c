//! Local control API for the interview front-end
//!
//! The front-end embeds the media SDK and drives the session through:
//! - GET /interview - Current session snapshot
//! - POST /interview/start - Submit resume and job description
//! - POST /interview/leave - Leave the active interview
//! - POST /interview/restart - Back to setup after ended or error
//! - POST /interview/media-event - Forward media SDK events
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::SessionSnapshot;
pub use routes::create_router;
pub use state::AppState;

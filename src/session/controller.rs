use super::failure::Failure;
use super::state::{Session, SessionId, SessionStatus, TransitionError};
use super::submission::InterviewSubmission;
use crate::gateway::InterviewBackend;
use crate::media::{ConnectionState, MediaEvent};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Progress of the AI interviewer start request.
///
/// Observed only; it never changes the session status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InterviewerStatus {
    NotRequested,
    Pending { session_id: SessionId },
    Started { session_id: SessionId, message: String },
    Failed { session_id: SessionId, message: String },
}

/// Drives the interview lifecycle and owns the one [`Session`].
///
/// Every state change goes through a [`Session`] transition and is published on
/// a watch channel, so a front-end can render straight from [`subscribe`](Self::subscribe).
pub struct SessionController {
    /// Room provisioning and interviewer start
    backend: Arc<dyn InterviewBackend>,

    /// Current session, published to subscribers
    session: watch::Sender<Session>,

    /// Latest interviewer start outcome
    interviewer: watch::Sender<InterviewerStatus>,

    /// Media connection state last reported by the front-end
    connection_state: watch::Sender<ConnectionState>,
}

impl SessionController {
    pub fn new(backend: Arc<dyn InterviewBackend>) -> Arc<Self> {
        Arc::new(Self {
            backend,
            session: watch::channel(Session::new()).0,
            interviewer: watch::channel(InterviewerStatus::NotRequested).0,
            connection_state: watch::channel(ConnectionState::default()).0,
        })
    }

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.session.borrow().status()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    pub fn interviewer_status(&self) -> InterviewerStatus {
        self.interviewer.borrow().clone()
    }

    pub fn subscribe_interviewer(&self) -> watch::Receiver<InterviewerStatus> {
        self.interviewer.subscribe()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.connection_state.borrow()
    }

    /// Begin an interview.
    ///
    /// The session is in `creating-room` when this returns; room provisioning
    /// runs on the returned task, which resolves to the status it left behind.
    pub fn submit(
        self: &Arc<Self>,
        submission: InterviewSubmission,
    ) -> Result<JoinHandle<SessionStatus>, TransitionError> {
        let creating = self.transition(Session::submit)?;
        let session_id = creating.id();

        info!("Starting interview process for session {}", session_id);

        self.interviewer.send_replace(InterviewerStatus::NotRequested);
        self.connection_state.send_replace(ConnectionState::Connecting);

        let controller = Arc::clone(self);
        Ok(tokio::spawn(async move {
            controller.provision(session_id, submission).await
        }))
    }

    /// `active -> ended` on user request
    pub fn leave(&self) -> Result<Session, TransitionError> {
        let ended = self.transition(Session::leave)?;
        info!("Ending interview {}", ended.id());
        Ok(ended)
    }

    /// `ended | error -> setup`
    pub fn restart(&self) -> Result<Session, TransitionError> {
        let reset = self.transition(Session::restart)?;
        info!("Resetting interview");

        self.interviewer.send_replace(InterviewerStatus::NotRequested);
        self.connection_state.send_replace(ConnectionState::Connecting);
        Ok(reset)
    }

    /// Record an event from the media SDK.
    ///
    /// A disconnect while active ends the session just like a user leave.
    pub fn handle_media_event(&self, event: MediaEvent) -> Session {
        if let Some(state) = event.connection_state() {
            debug!("Media connection state: {}", state);
            self.connection_state.send_replace(state);
        }

        match event {
            MediaEvent::Connected => {
                if let Some(room) = self.snapshot().room_name() {
                    info!("Connected to media room {}", room);
                }
            }
            MediaEvent::Reconnecting => warn!("Media connection interrupted, reconnecting"),
            MediaEvent::Disconnected => {
                info!("Disconnected from media room");
                if self.status() == SessionStatus::Active {
                    if let Err(e) = self.leave() {
                        warn!("Ignoring disconnect: {}", e);
                    }
                }
            }
            MediaEvent::Error { message } => error!("Media room error: {}", message),
        }

        self.snapshot()
    }

    async fn provision(
        self: Arc<Self>,
        session_id: SessionId,
        submission: InterviewSubmission,
    ) -> SessionStatus {
        info!("Creating interview room...");

        match self.backend.provision_room().await {
            Ok(room) => {
                let applied = self.apply(|current| current.room_ready(session_id, &room));
                if !applied {
                    info!(
                        "Discarding room {} for superseded session {}",
                        room.room_name, session_id
                    );
                    return self.status();
                }

                info!("Joined room {} successfully, starting interviewer...", room.room_name);
                self.spawn_interviewer(session_id, room.room_name, submission);
            }
            Err(err) => {
                let failure = Failure::from_gateway(&err);

                error!("Interview start error: {}", err);
                if let Some(body) = err.body() {
                    debug!("Error response body: {}", body);
                }
                if let Some(hint) = failure.category.debug_hint() {
                    debug!("Debug info: {}", hint);
                }

                let applied =
                    self.apply(|current| current.room_failed(session_id, failure.message));
                if !applied {
                    info!("Discarding provisioning failure for superseded session {}", session_id);
                }
            }
        }

        self.status()
    }

    /// Start the interviewer without waiting for it. The outcome is logged and
    /// published on the interviewer channel only.
    fn spawn_interviewer(
        self: &Arc<Self>,
        session_id: SessionId,
        room_name: String,
        submission: InterviewSubmission,
    ) {
        self.interviewer
            .send_replace(InterviewerStatus::Pending { session_id });

        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let result = controller
                .backend
                .start_interviewer(&room_name, submission.resume(), submission.job_description())
                .await;

            let status = match result {
                Ok(ack) => {
                    info!("Interviewer started successfully in room {}", room_name);
                    InterviewerStatus::Started {
                        session_id,
                        message: ack.message,
                    }
                }
                Err(e) => {
                    error!("Failed to start interviewer in room {}: {}", room_name, e);
                    InterviewerStatus::Failed {
                        session_id,
                        message: e.to_string(),
                    }
                }
            };

            // The session guard stays held across the publish so a concurrent
            // restart cannot reset the channel in between. Lock order is session
            // then interviewer; restart never holds both.
            let session = controller.session.borrow();
            if session.is_current(session_id) {
                controller.interviewer.send_replace(status);
            } else {
                debug!("Dropping interviewer outcome for superseded session {}", session_id);
            }
        });
    }

    /// Apply a user-driven transition; the session is untouched on error
    fn transition<F>(&self, f: F) -> Result<Session, TransitionError>
    where
        F: FnOnce(&Session) -> Result<Session, TransitionError>,
    {
        // Overwritten by the closure, which always runs
        let mut outcome = Ok(Session::new());
        self.session.send_if_modified(|current| {
            outcome = f(current);
            match &outcome {
                Ok(next) => {
                    *current = next.clone();
                    true
                }
                Err(_) => false,
            }
        });
        outcome
    }

    /// Apply a backend-driven transition; `None` from `f` means the result is stale
    fn apply<F>(&self, f: F) -> bool
    where
        F: FnOnce(&Session) -> Option<Session>,
    {
        self.session.send_if_modified(|current| match f(current) {
            Some(next) => {
                *current = next;
                true
            }
            None => false,
        })
    }
}

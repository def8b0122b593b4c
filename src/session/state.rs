use crate::gateway::RoomProvisionResult;
use crate::media::MediaConnection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Interview lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Setup,
    CreatingRoom,
    /// Declared for finer progress reporting; no transition enters it yet
    Joining,
    /// Declared for finer progress reporting; no transition enters it yet
    StartingAgent,
    Active,
    Ended,
    Error,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Setup => "setup",
            SessionStatus::CreatingRoom => "creating-room",
            SessionStatus::Joining => "joining",
            SessionStatus::StartingAgent => "starting-agent",
            SessionStatus::Active => "active",
            SessionStatus::Ended => "ended",
            SessionStatus::Error => "error",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User or system action that drives the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Submit,
    Leave,
    Restart,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionAction::Submit => f.write_str("submit"),
            SessionAction::Leave => f.write_str("leave"),
            SessionAction::Restart => f.write_str("restart"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {action} while the session is {from}")]
    NotAllowed {
        from: SessionStatus,
        action: SessionAction,
    },
}

/// Identifies one attempt at running an interview.
///
/// Each submission and each restart mints a new id; results issued under an
/// older id are stale and must not touch the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The single interview session.
///
/// Connection details are set together on entering `active` and cleared on
/// every other transition; the error message exists only in `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    status: SessionStatus,
    connection: Option<MediaConnection>,
    error_message: Option<String>,
    active_since: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session in `setup`
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            status: SessionStatus::Setup,
            connection: None,
            error_message: None,
            active_since: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn room_name(&self) -> Option<&str> {
        self.connection.as_ref().map(|c| c.room_name.as_str())
    }

    pub fn credential(&self) -> Option<&str> {
        self.connection.as_ref().map(|c| c.token.as_str())
    }

    pub fn transport_endpoint(&self) -> Option<&str> {
        self.connection.as_ref().map(|c| c.server_url.as_str())
    }

    /// Everything the media component needs, present only while `active`
    pub fn connection(&self) -> Option<&MediaConnection> {
        self.connection.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn active_since(&self) -> Option<DateTime<Utc>> {
        self.active_since
    }

    /// Whether a result issued under `id` may still be applied
    pub fn is_current(&self, id: SessionId) -> bool {
        self.id == id
    }

    fn with_status(id: SessionId, status: SessionStatus) -> Self {
        Self {
            id,
            status,
            connection: None,
            error_message: None,
            active_since: None,
        }
    }

    fn reject(&self, action: SessionAction) -> TransitionError {
        TransitionError::NotAllowed {
            from: self.status,
            action,
        }
    }

    /// `setup -> creating-room`, minting a new session id.
    ///
    /// The submission itself must already be validated.
    pub fn submit(&self) -> Result<Self, TransitionError> {
        match self.status {
            SessionStatus::Setup => Ok(Self::with_status(
                SessionId::new(),
                SessionStatus::CreatingRoom,
            )),
            _ => Err(self.reject(SessionAction::Submit)),
        }
    }

    /// `creating-room -> active` with all connection details.
    ///
    /// Returns `None` when the result is stale: issued under another id, or the
    /// session already left `creating-room`.
    pub fn room_ready(&self, issued_under: SessionId, room: &RoomProvisionResult) -> Option<Self> {
        if !self.accepts_provisioning(issued_under) {
            return None;
        }

        Some(Self {
            id: self.id,
            status: SessionStatus::Active,
            connection: Some(MediaConnection {
                server_url: room.transport_endpoint.clone(),
                token: room.credential.clone(),
                room_name: room.room_name.clone(),
            }),
            error_message: None,
            active_since: Some(Utc::now()),
        })
    }

    /// `creating-room -> error`. Returns `None` when stale.
    pub fn room_failed(&self, issued_under: SessionId, message: impl Into<String>) -> Option<Self> {
        if !self.accepts_provisioning(issued_under) {
            return None;
        }

        let mut next = Self::with_status(self.id, SessionStatus::Error);
        next.error_message = Some(message.into());
        Some(next)
    }

    /// `active -> ended`, by the user or by the media layer disconnecting
    pub fn leave(&self) -> Result<Self, TransitionError> {
        match self.status {
            SessionStatus::Active => Ok(Self::with_status(self.id, SessionStatus::Ended)),
            _ => Err(self.reject(SessionAction::Leave)),
        }
    }

    /// `ended | error -> setup`, clearing every field
    pub fn restart(&self) -> Result<Self, TransitionError> {
        match self.status {
            SessionStatus::Ended | SessionStatus::Error => Ok(Self::new()),
            _ => Err(self.reject(SessionAction::Restart)),
        }
    }

    fn accepts_provisioning(&self, issued_under: SessionId) -> bool {
        self.is_current(issued_under) && self.status == SessionStatus::CreatingRoom
    }
}

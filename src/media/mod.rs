//! Media session boundary
//!
//! The real-time media SDK runs outside this crate. These types describe what
//! is handed to it when the interview becomes active and what it reports back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reported when an active session cannot hand the SDK a usable connection
pub const MISSING_CREDENTIALS: &str = "Missing connection credentials";

/// Credentials and address for joining the interview room
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaConnection {
    /// Transport endpoint of the media server
    pub server_url: String,
    pub token: String,
    pub room_name: String,
}

impl MediaConnection {
    /// The SDK cannot connect without a token and server address
    pub fn has_credentials(&self) -> bool {
        !self.token.is_empty() && !self.server_url.is_empty()
    }

    /// Token prefix safe to put in logs
    pub fn token_preview(&self) -> String {
        if self.token.is_empty() {
            return "No token".to_string();
        }
        let prefix: String = self.token.chars().take(20).collect();
        format!("{}...", prefix)
    }
}

/// Simulcast layer published alongside the full-resolution camera track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoPreset {
    H180,
    H360,
}

/// Room settings the front-end passes to the media SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomOptions {
    pub adaptive_stream: bool,
    pub dynacast: bool,
    pub video_simulcast_layers: Vec<VideoPreset>,
    /// Publish camera on connect
    pub video: bool,
    /// Publish microphone on connect
    pub audio: bool,
}

impl Default for RoomOptions {
    fn default() -> Self {
        Self {
            adaptive_stream: true,
            dynacast: true,
            video_simulcast_layers: vec![VideoPreset::H180, VideoPreset::H360],
            video: true,
            audio: true,
        }
    }
}

/// Connection state as reported by the media SDK
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Connecting,
    Connected,
    Reconnecting,
    Disconnected,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Connected => "Connected",
            ConnectionState::Reconnecting => "Reconnecting...",
            ConnectionState::Disconnected => "Disconnected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Event forwarded from the media SDK
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MediaEvent {
    Connected,
    Reconnecting,
    Disconnected,
    Error {
        #[serde(default)]
        message: String,
    },
}

impl MediaEvent {
    /// Connection state implied by the event, if any
    pub fn connection_state(&self) -> Option<ConnectionState> {
        match self {
            MediaEvent::Connected => Some(ConnectionState::Connected),
            MediaEvent::Reconnecting => Some(ConnectionState::Reconnecting),
            MediaEvent::Disconnected => Some(ConnectionState::Disconnected),
            MediaEvent::Error { .. } => None,
        }
    }
}

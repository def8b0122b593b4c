use super::endpoint::{non_empty_str, resolve_transport_endpoint, EndpointSource};
use super::error::GatewayError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Fields a room response must carry as non-empty strings
pub const REQUIRED_ROOM_FIELDS: &[&str] = &["room_name", "token"];

/// Fields logged when analysing a room response
const EXPECTED_ROOM_FIELDS: &[&str] = &["room_name", "token", "websocket_url", "message"];

/// Outcome of `POST /interview/start-room` after validation and endpoint resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomProvisionResult {
    pub room_name: String,

    /// Access token for the media room
    pub credential: String,

    /// Media server address, resolved even when the backend omitted it
    pub transport_endpoint: String,

    /// Which strategy produced `transport_endpoint`
    pub endpoint_source: EndpointSource,

    /// Informational text from the backend
    pub message: Option<String>,
}

impl RoomProvisionResult {
    /// Validate a decoded room response and resolve its transport endpoint.
    ///
    /// `status` is the HTTP status the body arrived with; it is kept on the
    /// error so validation failures stay distinguishable from HTTP failures.
    pub fn from_response(body: &Value, status: u16, api_base: &Url) -> Result<Self, GatewayError> {
        log_response_details(body);

        let missing: Vec<&'static str> = REQUIRED_ROOM_FIELDS
            .iter()
            .copied()
            .filter(|field| non_empty_str(body, field).is_none())
            .collect();

        if !missing.is_empty() {
            return Err(GatewayError::MissingFields { status, missing });
        }

        let room_name = non_empty_str(body, "room_name").unwrap_or_default().to_string();
        let credential = non_empty_str(body, "token").unwrap_or_default().to_string();
        let (transport_endpoint, endpoint_source) = resolve_transport_endpoint(body, api_base);

        Ok(Self {
            room_name,
            credential,
            transport_endpoint,
            endpoint_source,
            message: non_empty_str(body, "message").map(str::to_string),
        })
    }
}

/// Acknowledgement from `POST /interview/start-interviewer`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewerAck {
    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub room_name: String,
}

fn log_response_details(body: &Value) {
    let keys: Vec<&str> = body
        .as_object()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default();
    debug!("Room response keys: {:?}", keys);

    for field in EXPECTED_ROOM_FIELDS {
        let value = body.get(*field);
        let empty = match value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        debug!("{}: exists={}, empty={}", field, value.is_some(), empty);
    }
}

use thiserror::Error;

/// Status reported when no HTTP response was received at all
pub const NO_RESPONSE: u16 = 0;

/// Failure from a backend call.
///
/// Every variant carries an HTTP status via [`GatewayError::status`]; transport
/// failures with no response report `0`. Payload problems on a 2xx response keep
/// the 2xx status even though the call is logically a failure.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend answered with a non-2xx status
    #[error("API request failed: {status} {reason} - {body}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    /// The room response lacked a usable `room_name` and/or `token`
    #[error("Invalid room response: missing required fields ({})", .missing.join(", "))]
    MissingFields {
        status: u16,
        missing: Vec<&'static str>,
    },

    /// A 2xx response whose content type is not JSON
    #[error("Unexpected content type {content_type:?} in response (status {status})")]
    UnexpectedContentType { status: u16, content_type: String },

    /// A 2xx JSON response whose body failed to decode
    #[error("Failed to decode response body (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// A 2xx response whose body could not be read to the end
    #[error("Failed to read response body (status {status}): {source}")]
    Body {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    /// The request never produced a response
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl GatewayError {
    /// HTTP status of the failed call, or `0` when no response arrived
    pub fn status(&self) -> u16 {
        match self {
            GatewayError::Status { status, .. }
            | GatewayError::MissingFields { status, .. }
            | GatewayError::UnexpectedContentType { status, .. }
            | GatewayError::Decode { status, .. }
            | GatewayError::Body { status, .. } => *status,
            GatewayError::Transport { .. } => NO_RESPONSE,
        }
    }

    /// Response body captured for diagnostics, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            GatewayError::Status { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

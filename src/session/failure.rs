use crate::gateway::error::NO_RESPONSE;
use crate::gateway::GatewayError;
use serde::Serialize;

/// User-facing class of a room provisioning failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    Connectivity,
    Authentication,
    Authorization,
    NotFound,
    RateLimited,
    Server,
    Other,
}

impl FailureCategory {
    pub fn from_status(status: u16) -> Self {
        match status {
            NO_RESPONSE => FailureCategory::Connectivity,
            401 => FailureCategory::Authentication,
            403 => FailureCategory::Authorization,
            404 => FailureCategory::NotFound,
            429 => FailureCategory::RateLimited,
            500..=599 => FailureCategory::Server,
            _ => FailureCategory::Other,
        }
    }

    /// Fixed sentence for the category; `Other` has none and uses the raw message
    fn message(&self) -> Option<&'static str> {
        match self {
            FailureCategory::Connectivity => {
                Some("Cannot connect to server. Please ensure the interview service is running.")
            }
            FailureCategory::Authentication => {
                Some("Authentication failed. Please check your API key.")
            }
            FailureCategory::Authorization => Some("Access denied. Please check your permissions."),
            FailureCategory::NotFound => Some("Interview service endpoint not found."),
            FailureCategory::RateLimited => {
                Some("Too many requests. Please wait before trying again.")
            }
            FailureCategory::Server => Some("Server error. Please try again in a few moments."),
            FailureCategory::Other => None,
        }
    }

    /// Operator hint, logged next to the user-facing message
    pub fn debug_hint(&self) -> Option<&'static str> {
        match self {
            FailureCategory::Connectivity => {
                Some("Check if the API server is accessible at the configured URL.")
            }
            FailureCategory::Authentication => {
                Some("Verify the API key is correct in your environment variables.")
            }
            FailureCategory::NotFound => {
                Some("The API endpoint may be incorrect or the service may not be deployed.")
            }
            FailureCategory::Server => Some("The server may be temporarily unavailable."),
            _ => None,
        }
    }
}

/// A classified failure ready to show to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub category: FailureCategory,
    pub message: String,
}

impl Failure {
    pub fn from_gateway(err: &GatewayError) -> Self {
        let category = FailureCategory::from_status(err.status());
        let message = match category.message() {
            Some(message) => message.to_string(),
            None => {
                let raw = err.to_string();
                if raw.is_empty() {
                    "An unexpected error occurred.".to_string()
                } else {
                    raw
                }
            }
        };

        Self { category, message }
    }
}

//! Transport endpoint resolution
//!
//! The room response is supposed to carry `websocket_url`, but older backends
//! omit it or publish it under a different name. Resolution walks
//! [`ENDPOINT_STRATEGIES`] in order and keeps the first hit; the last strategy
//! derives the endpoint from the configured API base address and always succeeds.

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::net::IpAddr;

/// Port the local media server listens on during development
pub const LOCAL_MEDIA_PORT: u16 = 7880;

/// Path suffixes of the API base that are not part of the media server address
const API_PATH_SUFFIXES: &[&str] = &["/api/resume-flow", "/api"];

/// One way of obtaining the transport endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointStrategy {
    /// The documented `websocket_url` field
    Explicit(&'static str),
    /// A differently named field holding the same address
    Alias(&'static str),
    /// Rewrite the API base address into a media server address
    DeriveFromBase,
}

pub const ENDPOINT_STRATEGIES: &[EndpointStrategy] = &[
    EndpointStrategy::Explicit("websocket_url"),
    EndpointStrategy::Alias("ws_url"),
    EndpointStrategy::Alias("websocket"),
    EndpointStrategy::Alias("livekit_url"),
    EndpointStrategy::Alias("server_url"),
    EndpointStrategy::Alias("ws_endpoint"),
    EndpointStrategy::Alias("livekit_ws_url"),
    EndpointStrategy::DeriveFromBase,
];

/// Where a resolved endpoint came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "field")]
pub enum EndpointSource {
    Explicit,
    Alias(String),
    Derived,
}

impl EndpointStrategy {
    fn apply(&self, body: &Value, api_base: &Url) -> Option<(String, EndpointSource)> {
        match self {
            EndpointStrategy::Explicit(field) => {
                non_empty_str(body, field).map(|url| (url.to_string(), EndpointSource::Explicit))
            }
            EndpointStrategy::Alias(field) => non_empty_str(body, field)
                .map(|url| (url.to_string(), EndpointSource::Alias(field.to_string()))),
            EndpointStrategy::DeriveFromBase => {
                Some((derive_transport_endpoint(api_base), EndpointSource::Derived))
            }
        }
    }
}

/// Resolve the transport endpoint for a room response body.
pub fn resolve_transport_endpoint(body: &Value, api_base: &Url) -> (String, EndpointSource) {
    ENDPOINT_STRATEGIES
        .iter()
        .find_map(|strategy| strategy.apply(body, api_base))
        .unwrap_or_else(|| (derive_transport_endpoint(api_base), EndpointSource::Derived))
}

/// Turn an API base address into the media server address.
///
/// `http` becomes `ws` and `https` becomes `wss`; known API path suffixes are
/// dropped. Loopback hosts point at [`LOCAL_MEDIA_PORT`] instead of the API port.
pub fn derive_transport_endpoint(api_base: &Url) -> String {
    let scheme = match api_base.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => other,
    };

    let host = api_base.host_str().unwrap_or_default();
    let port = if is_loopback(host) {
        Some(LOCAL_MEDIA_PORT)
    } else {
        api_base.port()
    };

    let mut path = api_base.path().trim_end_matches('/');
    for suffix in API_PATH_SUFFIXES {
        if let Some(stripped) = path.strip_suffix(suffix) {
            path = stripped;
            break;
        }
    }
    let path = path.trim_end_matches('/');

    match port {
        Some(port) => format!("{}://{}:{}{}", scheme, host, port, path),
        None => format!("{}://{}{}", scheme, host, path),
    }
}

fn is_loopback(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}

/// A field counts only when it is a non-empty string
pub(crate) fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

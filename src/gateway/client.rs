use super::backend::InterviewBackend;
use super::error::GatewayError;
use super::messages::{InterviewerAck, RoomProvisionResult};
use crate::config::ApiConfig;
use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::{debug, error, info, warn};

pub const START_ROOM_PATH: &str = "/interview/start-room";
pub const START_INTERVIEWER_PATH: &str = "/interview/start-interviewer";

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the interview backend
pub struct BackendGateway {
    http: Client,
    base_url: Url,
    masked_key: String,
}

impl BackendGateway {
    /// Build a gateway for the configured backend
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("API base URL must use http or https: {}", config.base_url);
        }

        if config.uses_default_key() {
            warn!("Using the built-in development API key; set INTERVIEW__API__KEY in production");
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut key =
            HeaderValue::from_str(&config.key).context("API key is not a valid header value")?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("interview-room/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        info!("Interview backend at {}", base_url);

        Ok(Self {
            http,
            base_url,
            masked_key: config.masked_key(),
        })
    }

    /// `POST {base}/interview/start-room`
    pub async fn provision_room(&self) -> Result<RoomProvisionResult, GatewayError> {
        let (status, body) = self.post_json(START_ROOM_PATH, &[]).await?;
        let result = RoomProvisionResult::from_response(&body, status, &self.base_url)?;

        info!(
            "Room {} provisioned (endpoint {} via {:?})",
            result.room_name, result.transport_endpoint, result.endpoint_source
        );

        Ok(result)
    }

    /// `POST {base}/interview/start-interviewer?room_name=&resume=&job_description=`
    pub async fn start_interviewer(
        &self,
        room_name: &str,
        resume: &str,
        job_description: &str,
    ) -> Result<InterviewerAck, GatewayError> {
        let query = [
            ("room_name", room_name),
            ("resume", resume),
            ("job_description", job_description),
        ];
        let (status, body) = self.post_json(START_INTERVIEWER_PATH, &query).await?;

        serde_json::from_value(body).map_err(|source| GatewayError::Decode { status, source })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), endpoint)
    }

    /// Issue an authenticated POST and decode a JSON body from a 2xx response
    async fn post_json(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<(u16, Value), GatewayError> {
        let url = self.endpoint_url(endpoint);

        debug!("Making API request to: {} (key {})", url, self.masked_key);

        let response = self
            .http
            .post(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("").to_string();
            let body = response.text().await.unwrap_or_default();
            error!("API error response from {}: {} {}", url, status.as_u16(), body);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                reason,
                body,
            });
        }

        check_json_content_type(&response)?;

        let bytes = response.bytes().await.map_err(|source| GatewayError::Body {
            status: status.as_u16(),
            source,
        })?;

        let body = serde_json::from_slice(&bytes).map_err(|source| GatewayError::Decode {
            status: status.as_u16(),
            source,
        })?;

        Ok((status.as_u16(), body))
    }
}

fn check_json_content_type(response: &Response) -> Result<(), GatewayError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        Ok(())
    } else {
        Err(GatewayError::UnexpectedContentType {
            status: response.status().as_u16(),
            content_type: content_type.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl InterviewBackend for BackendGateway {
    async fn provision_room(&self) -> Result<RoomProvisionResult, GatewayError> {
        BackendGateway::provision_room(self).await
    }

    async fn start_interviewer(
        &self,
        room_name: &str,
        resume: &str,
        job_description: &str,
    ) -> Result<InterviewerAck, GatewayError> {
        BackendGateway::start_interviewer(self, room_name, resume, job_description).await
    }
}

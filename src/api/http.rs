//! Reqwest-backed adapter for the registration service.
//!
//! Owns transport details only: URL building, timeouts, status mapping and
//! JSON decoding of the `{ "data": ... }` envelopes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url, header::ACCEPT};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    api::{ApiError, ErrorBody, HealthStatus, PortalApi},
    models::{
        area::{Area, AreaCount},
        persona::{CreatedPersona, NewPersona, Persona},
    },
};

const AREAS_PATH: &str = "api/v1/areas";
const AREA_COUNTS_PATH: &str = "api/v1/areas/conteo";
const PERSONAS_PATH: &str = "api/v1/personas";
const HEALTH_PATH: &str = "api/v1/health";

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

pub struct HttpPortalApi {
    client: Client,
    base: Url,
}

impl HttpPortalApi {
    /// Builds an adapter rooted at `base` (e.g. `http://localhost:8080`).
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(mut base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::Unknown(format!("invalid endpoint '{path}': {e}")))
    }

    /// Sends `request` and returns the body of a 2xx answer
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "service responded");

        if !status.is_success() {
            let error = map_status_error(status, body.as_ref());
            warn!(status = status.as_u16(), %error, "service returned an error");
            return Err(error);
        }

        Ok(body.to_vec())
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        decode(&body)
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let envelope: Envelope<T> = self.execute(self.client.get(url)).await?;
        Ok(envelope.data)
    }
}

#[async_trait(?Send)]
impl PortalApi for HttpPortalApi {
    async fn list_areas(&self) -> Result<Vec<Area>, ApiError> {
        self.get_data(AREAS_PATH).await
    }

    async fn area_counts(&self) -> Result<Vec<AreaCount>, ApiError> {
        self.get_data(AREA_COUNTS_PATH).await
    }

    async fn create_persona(&self, persona: &NewPersona) -> Result<CreatedPersona, ApiError> {
        let url = self.endpoint(PERSONAS_PATH)?;
        debug!(%url, area_id = persona.area_id, "POST");
        let body = self.send(self.client.post(url).json(persona)).await?;
        Ok(decode_created(&body))
    }

    async fn list_personas(&self) -> Result<Vec<Persona>, ApiError> {
        self.get_data(PERSONAS_PATH).await
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint(HEALTH_PATH)?;
        self.execute(self.client.get(url)).await
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Unknown(format!("invalid JSON payload: {e}")))
}

/// The person is stored once the service answers 2xx, whatever the body says
fn decode_created(body: &[u8]) -> CreatedPersona {
    decode(body).unwrap_or_else(|error| {
        warn!(%error, "create succeeded with an unreadable body");
        CreatedPersona::default()
    })
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Transport(format!("request timed out: {error}"))
    } else {
        ApiError::Transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.trim().is_empty() => ApiError::Service {
            status: status.as_u16(),
            error: parsed.error,
            details: parsed.details,
        },
        _ => {
            let preview = body_preview(body);
            if preview.is_empty() {
                ApiError::Unknown(format!("status {}", status.as_u16()))
            } else {
                ApiError::Unknown(format!("status {}: {}", status.as_u16(), preview))
            }
        }
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

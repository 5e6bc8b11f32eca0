//! Port to the remote registration service.
//!
//! Views talk to the service only through [`PortalApi`], so the HTTP adapter
//! can be swapped for an in-process fake in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    area::{Area, AreaCount},
    persona::{CreatedPersona, NewPersona, Persona},
};

#[cfg(test)]
pub mod fake;
pub mod http;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never completed: connection refused, DNS failure, timeout
    #[error("could not reach the service: {0}")]
    Transport(String),

    /// The service answered with a structured error body
    #[error(
        "service rejected the request (status {status}): {error}{}",
        .details.as_ref().map(|d| format!(" ({d})")).unwrap_or_default()
    )]
    Service {
        status: u16,
        error: String,
        details: Option<String>,
    },

    #[error("unexpected response from the service: {0}")]
    Unknown(String),
}

/// Error body shape used by every failing endpoint
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

/// Operations the client needs from the service.
///
/// Futures are not `Send`: the client drives them on a single-threaded runtime.
#[async_trait(?Send)]
pub trait PortalApi {
    /// `GET /api/v1/areas`
    async fn list_areas(&self) -> Result<Vec<Area>, ApiError>;

    /// `GET /api/v1/areas/conteo`
    async fn area_counts(&self) -> Result<Vec<AreaCount>, ApiError>;

    /// `POST /api/v1/personas`
    async fn create_persona(&self, persona: &NewPersona) -> Result<CreatedPersona, ApiError>;

    /// `GET /api/v1/personas`
    async fn list_personas(&self) -> Result<Vec<Persona>, ApiError>;

    /// `GET /api/v1/health`
    async fn health(&self) -> Result<HealthStatus, ApiError>;
}

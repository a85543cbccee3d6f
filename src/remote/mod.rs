//! Upstream REST services.
//!
//! The back office owns no data. Every resource lives behind the platform's
//! REST API, which answers with the same `{ success, data, error }`
//! envelope. Registries and screens depend on the [`CrudService`] and
//! [`InstitutionSource`] ports so tests can swap in memory-backed fakes.

mod client;

pub use client::{RestClient, RestResource};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::school::model::Institution;

/// The API writes unset fields as `null`; read those as the type's default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<Option<T>, RemoteError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(RemoteError::Rejected(self.error.unwrap_or_default()))
        }
    }
}

#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service answered `success: false`.
    #[error("service rejected the request: {0}")]
    Rejected(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Message shown to the user: the service's own error text when it sent
    /// one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            RemoteError::Rejected(message) if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            RemoteError::Decode(error.to_string())
        } else {
            RemoteError::Transport(error.to_string())
        }
    }
}

/// List/get/create/update/delete against one remote resource.
#[async_trait]
pub trait CrudService<T, P>: Send + Sync
where
    T: Send + 'static,
    P: Send + Sync + 'static,
{
    async fn get_all(&self) -> Result<Vec<T>, RemoteError>;
    async fn get_by_id(&self, id: &str) -> Result<T, RemoteError>;
    async fn create(&self, payload: &P) -> Result<T, RemoteError>;
    async fn update(&self, id: &str, payload: &P) -> Result<T, RemoteError>;
    async fn delete(&self, id: &str) -> Result<(), RemoteError>;
}

#[async_trait]
pub trait InstitutionSource: Send + Sync {
    /// The institution the signed-in staff member belongs to.
    async fn personal_institution(&self) -> Result<Option<Institution>, RemoteError>;

    /// Raw bytes behind a remote logo URL.
    async fn fetch_logo(&self, url: &str) -> Result<Vec<u8>, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_failure_keeps_service_message() {
        let envelope: ApiEnvelope<u32> = ApiEnvelope::failure("Número duplicado");
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.user_message("Error inesperado"), "Número duplicado");
    }

    #[test]
    fn test_envelope_deserializes_without_data() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap(), None);
    }

    #[test]
    fn test_transport_errors_use_fallback() {
        let err = RemoteError::Transport("connection refused".into());
        assert_eq!(
            err.user_message("Error inesperado al crear la solicitud"),
            "Error inesperado al crear la solicitud"
        );
        assert_eq!(RemoteError::Rejected(" ".into()).user_message("x"), "x");
    }
}

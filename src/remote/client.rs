use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{ApiEnvelope, CrudService, InstitutionSource, RemoteError};
use crate::school::model::Institution;

/// Thin wrapper over `reqwest::Client` that knows the API base URL and the
/// response envelope.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    /// Timeouts are left to reqwest's defaults.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn resource<T>(&self, path: &str) -> RestResource<T> {
        RestResource {
            client: self.clone(),
            path: path.trim_matches('/').to_string(),
            _marker: PhantomData,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, RemoteError> {
        let url = self.url(path);
        log::debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        Self::decode(url, response).await
    }

    pub async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Option<T>, RemoteError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        log::debug!("{} {}", method, url);
        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(
        url: String,
        response: reqwest::Response,
    ) -> Result<Option<T>, RemoteError> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(url));
        }
        let envelope: ApiEnvelope<T> = response.json().await?;
        envelope.into_result()
    }
}

#[async_trait]
impl InstitutionSource for RestClient {
    async fn personal_institution(&self) -> Result<Option<Institution>, RemoteError> {
        self.get("institution-personal/institution").await
    }

    async fn fetch_logo(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// One REST collection, e.g. `fut-requests` or `classrooms`.
pub struct RestResource<T> {
    client: RestClient,
    path: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> RestResource<T> {
    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, id)
    }
}

#[async_trait]
impl<T, P> CrudService<T, P> for RestResource<T>
where
    T: DeserializeOwned + Send + 'static,
    P: Serialize + Send + Sync + 'static,
{
    async fn get_all(&self) -> Result<Vec<T>, RemoteError> {
        let items: Option<Vec<T>> = self.client.get(&self.path).await?;
        Ok(items.unwrap_or_default())
    }

    async fn get_by_id(&self, id: &str) -> Result<T, RemoteError> {
        let path = self.item_path(id);
        self.client
            .get(&path)
            .await?
            .ok_or_else(|| RemoteError::NotFound(self.client.url(&path)))
    }

    async fn create(&self, payload: &P) -> Result<T, RemoteError> {
        self.client
            .send(Method::POST, &self.path, Some(payload))
            .await?
            .ok_or_else(|| RemoteError::Decode("created record missing from response".to_string()))
    }

    async fn update(&self, id: &str, payload: &P) -> Result<T, RemoteError> {
        self.client
            .send(Method::PUT, &self.item_path(id), Some(payload))
            .await?
            .ok_or_else(|| RemoteError::Decode("updated record missing from response".to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let _: Option<serde_json::Value> = self
            .client
            .send::<serde_json::Value, ()>(Method::DELETE, &self.item_path(id), None)
            .await?;
        Ok(())
    }
}

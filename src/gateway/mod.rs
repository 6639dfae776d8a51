//! Outbound request core for the documentation API.
//!
//! A single request path handles auth-header injection, body encoding, and
//! error normalization for every endpoint wrapper:
//!
//! - 401 clears the stored token and fails with [`AppError::Unauthorized`]
//! - other non-success statuses are normalized from the `{"detail": ...}`
//!   error body convention into [`AppError::RemoteRejected`]
//! - request bodies are JSON by default; form-encoded (login) and multipart
//!   (file upload) payloads pass through raw

pub mod credentials;

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::ClientConfig;

pub use credentials::{CredentialStore, Theme};

/// HTTP gateway to the documentation API.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialStore,
}

impl ApiGateway {
    /// Create a gateway from client configuration and a credential store.
    pub fn new(config: &ClientConfig, credentials: CredentialStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&config.api.user_agent)
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// The credential store backing this gateway.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn builder(&self, method: Method, path: &str, auth: bool) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, self.endpoint(path));
        if auth {
            if let Some(token) = self.credentials.token() {
                req = req.bearer_auth(token);
            }
        }
        req
    }

    /// Validate a non-2xx response body and turn it into an error.
    async fn reject(&self, res: reqwest::Response) -> AppError {
        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            self.credentials.clear_token();
            return AppError::Unauthorized;
        }
        let body = res.text().await.unwrap_or_default();
        let message = normalize_detail(&body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                body.trim().to_string()
            }
        });
        AppError::remote(status.as_u16(), message)
    }

    async fn expect_json<T: serde::de::DeserializeOwned>(
        &self,
        res: reqwest::Response,
    ) -> Result<T> {
        if !res.status().is_success() {
            return Err(self.reject(res).await);
        }
        Ok(res.json::<T>().await?)
    }

    async fn expect_text(&self, res: reqwest::Response) -> Result<String> {
        if !res.status().is_success() {
            return Err(self.reject(res).await);
        }
        Ok(res.text().await?)
    }

    /// GET returning JSON.
    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let res = self.builder(Method::GET, path, true).send().await?;
        self.expect_json(res).await
    }

    /// GET with query pairs, returning JSON.
    pub async fn get_json_query<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let res = self
            .builder(Method::GET, path, true)
            .query(query)
            .send()
            .await?;
        self.expect_json(res).await
    }

    /// POST a JSON body, returning JSON.
    pub async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let res = self
            .builder(Method::POST, path, true)
            .json(body)
            .send()
            .await?;
        self.expect_json(res).await
    }

    /// PUT a JSON body, returning JSON.
    pub async fn put_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let res = self
            .builder(Method::PUT, path, true)
            .json(body)
            .send()
            .await?;
        self.expect_json(res).await
    }

    /// PATCH a JSON body; the response body is ignored.
    pub async fn patch_json(&self, path: &str, body: &impl Serialize) -> Result<()> {
        let res = self
            .builder(Method::PATCH, path, true)
            .json(body)
            .send()
            .await?;
        self.expect_text(res).await.map(|_| ())
    }

    /// DELETE; the response body (if any) is ignored.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let res = self.builder(Method::DELETE, path, true).send().await?;
        self.expect_text(res).await.map(|_| ())
    }

    /// POST a form-encoded body without the auth header (login only).
    pub async fn post_form_unauthenticated<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T> {
        let res = self
            .builder(Method::POST, path, false)
            .form(form)
            .send()
            .await?;
        self.expect_json(res).await
    }

    /// POST a multipart body (file uploads), returning JSON.
    pub async fn post_multipart<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let res = self
            .builder(Method::POST, path, true)
            .multipart(form)
            .send()
            .await?;
        self.expect_json(res).await
    }
}

/// Extract a message from the API error body convention
/// `{"detail": string | [{"msg": string}, ...]}`.
pub fn normalize_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join(" • "))
        }
        _ => None,
    }
}

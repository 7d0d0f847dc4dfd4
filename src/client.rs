//! Typed client for a running pmkit server.

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::USER_HEADER;
use crate::export::ExportFormat;
use crate::metrics::MetricAnalysis;
use crate::models::{
    CohortInput, CohortRecord, DocumentKind, StickinessInput, StickinessRecord, User,
};

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    email: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, email: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            email,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let email = self
            .email
            .as_deref()
            .context("No acting user: pass --email or set PMKIT_USER_EMAIL")?;
        Ok(request.header(USER_HEADER, email))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Turns non-success responses into errors carrying the server's message.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        tracing::error!(%status, %message, "Backend call failed");
        bail!("{} ({})", message, status)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.authorized(self.http.get(self.url(path)))?;
        self.send(request)
            .await
            .with_context(|| format!("GET {path}"))
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let request = self.authorized(self.http.post(self.url(path)).json(body))?;
        self.send(request)
            .await
            .with_context(|| format!("POST {path}"))
    }

    pub async fn health(&self) -> Result<Value> {
        let response = self.http.get(self.url("/api/health")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn register(&self, email: &str) -> Result<User> {
        let request = self
            .http
            .post(self.url("/api/users"))
            .json(&serde_json::json!({ "email": email }));
        self.send(request).await.context("POST /api/users")
    }

    pub async fn current_user(&self) -> Result<User> {
        self.get("/api/users/me").await
    }

    pub async fn list_cohorts(&self) -> Result<Vec<CohortRecord>> {
        self.get("/api/cohorts").await
    }

    pub async fn create_cohort(&self, input: &CohortInput) -> Result<CohortRecord> {
        self.post("/api/cohorts", input).await
    }

    pub async fn cohort_analysis(&self) -> Result<MetricAnalysis> {
        self.get("/api/cohorts/analysis").await
    }

    pub async fn list_stickiness(&self) -> Result<Vec<StickinessRecord>> {
        self.get("/api/stickiness").await
    }

    pub async fn create_stickiness(&self, input: &StickinessInput) -> Result<StickinessRecord> {
        self.post("/api/stickiness", input).await
    }

    pub async fn stickiness_analysis(&self) -> Result<MetricAnalysis> {
        self.get("/api/stickiness/analysis").await
    }

    /// Downloads an exported document body.
    pub async fn export_document(
        &self,
        kind: DocumentKind,
        id: Uuid,
        format: ExportFormat,
    ) -> Result<String> {
        let path = format!("/api/{}/{}/export", kind.resource(), id);
        let request = self
            .authorized(self.http.get(self.url(&path)))?
            .query(&[("format", format.as_str())]);
        let response = Self::check(request.send().await?)
            .await
            .with_context(|| format!("GET {path}"))?;
        Ok(response.text().await?)
    }
}

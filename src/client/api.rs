//! Thin `reqwest` wrapper over the task HTTP endpoints.
//!
//! One request per call, no retries; a failure is returned directly to the
//! caller (the board layer decides how to surface it).

use serde_json::{json, Value};
use std::time::Duration;

use crate::storage::TaskRow;

use super::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TaskApi {
    http: reqwest::Client,
    base_url: String,
}

impl TaskApi {
    /// Create a client targeting the service at `base_url`
    /// (e.g. `http://127.0.0.1:4400`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/api/tasks{}", self.base_url, suffix)
    }

    pub async fn fetch_all(&self) -> Result<Vec<TaskRow>, ClientError> {
        let resp = self.http.get(self.url("")).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    pub async fn create(&self, description: &str) -> Result<TaskRow, ClientError> {
        let resp = self
            .http
            .post(self.url(""))
            .json(&json!({ "description": description }))
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    pub async fn set_completed(&self, id: i64, is_completed: bool) -> Result<(), ClientError> {
        self.update(id, json!({ "is_completed": is_completed }))
            .await
    }

    pub async fn set_description(&self, id: i64, description: &str) -> Result<(), ClientError> {
        self.update(id, json!({ "description": description })).await
    }

    async fn update(&self, id: i64, body: Value) -> Result<(), ClientError> {
        let resp = self
            .http
            .put(self.url(&format!("/{id}")))
            .json(&body)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let resp = self.http.delete(self.url(&format!("/{id}"))).send().await?;
        check_status(resp).await?;
        Ok(())
    }
}

/// Turn a non-success response into `ClientError::Api`, pulling the
/// explanatory `{"message": ...}` out of the body when the server sent one.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| format!("server returned {status}"));
    Err(ClientError::Api { status, message })
}

//! HTTP client for the task service.
//!
//! One request per user action; after any mutation the caller re-fetches the
//! full list rather than reconciling incrementally. Bulk operations fire
//! their per-identifier requests concurrently with no ordering guarantee and
//! no rollback: failures are logged and counted, the rest commit.

use futures::future::join_all;
use reqwest::StatusCode;
use serde::Deserialize;
use taskdeck_core::{Task, TaskDraft, TaskId, TaskPatch};
use thiserror::Error;
use tracing::warn;

/// Errors surfaced by [`ApiClient`] calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with an error status and message.
    #[error("server rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status of the response.
        status: StatusCode,
        /// Message from the `{"error": …}` body, or the raw body text.
        message: String,
    },
}

impl ApiError {
    /// True when the failure was a 404 for a stale identifier.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Rejected {
                status: StatusCode::NOT_FOUND,
                ..
            }
        )
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct Greeting {
    response: String,
}

#[derive(Debug, Deserialize)]
struct DeleteOutcome {
    #[allow(dead_code)]
    success: bool,
}

/// Tally of a bulk operation; partial success is accepted silently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Requests that committed.
    pub succeeded: usize,
    /// Requests that failed (already logged).
    pub failed: usize,
}

/// Client for the task service REST surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// Create a client for the service at `base` (e.g. `http://127.0.0.1:5000`).
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("status {status}"),
        };
        Err(ApiError::Rejected { status, message })
    }

    /// Fetch the full task list, newest-created first.
    ///
    /// # Errors
    /// Fails when the service is unreachable or answers with an error status.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let resp = self.http.get(self.url("/api/tasks")).send().await?;
        Self::decode(resp).await
    }

    /// Create a task from a draft.
    ///
    /// # Errors
    /// Fails with a 400 rejection when the draft text is blank.
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        let resp = self
            .http
            .post(self.url("/api/tasks"))
            .json(draft)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// Apply a partial update to a task.
    ///
    /// # Errors
    /// Fails with a 404 rejection when the identifier is stale.
    pub async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        let resp = self
            .http
            .put(self.url(&format!("/api/tasks/{id}")))
            .json(patch)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// Delete a task.
    ///
    /// # Errors
    /// Fails with a 404 rejection when the identifier is stale, including the
    /// second of two deletes.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("/api/tasks/{id}")))
            .send()
            .await?;
        let _: DeleteOutcome = Self::decode(resp).await?;
        Ok(())
    }

    /// Hit the greeting probe and return its text.
    ///
    /// # Errors
    /// Fails when the service is unreachable.
    pub async fn probe(&self) -> Result<String, ApiError> {
        let resp = self.http.get(self.url("/will")).send().await?;
        let greeting: Greeting = Self::decode(resp).await?;
        Ok(greeting.response)
    }

    /// Mark every listed task completed, one concurrent request per id.
    pub async fn bulk_complete(&self, ids: &[TaskId]) -> BulkOutcome {
        let patch = TaskPatch::completion(true);
        let patch = &patch;
        let results = join_all(
            ids.iter()
                .map(|&id| async move { self.update_task(id, patch).await.map(|_| ()) }),
        )
        .await;
        summarize("complete", ids, &results)
    }

    /// Delete every listed task, one concurrent request per id.
    pub async fn bulk_delete(&self, ids: &[TaskId]) -> BulkOutcome {
        let results = join_all(ids.iter().map(|&id| self.delete_task(id))).await;
        summarize("delete", ids, &results)
    }
}

fn summarize(action: &str, ids: &[TaskId], results: &[Result<(), ApiError>]) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(()) => outcome.succeeded += 1,
            Err(err) => {
                warn!(task = %id, %action, "bulk request failed: {err}");
                outcome.failed += 1;
            }
        }
    }
    outcome
}

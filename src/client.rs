//! REST client for the review backend.
//!
//! Four endpoints are consumed, all JSON:
//!
//! | Endpoint | Purpose |
//! |----------|---------|
//! | `GET /review/of?submission_id=` | Review of a submission, or `null` |
//! | `GET /review?id=` | Review by id |
//! | `POST /review?submission_id=` | Queue a review job, returns its id |
//! | `GET /submission?id=` | Submission (canonical essay text) by id |
//!
//! HTTP 404 is a distinguishable condition ([`ApiError::NotFound`]) because
//! the polling controller branches on it: a missing resource is terminal
//! and surfaced as such, while any other failure lands in the generic
//! error state.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::models::{Review, Submission};

/// Failure taxonomy for backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The submission or review does not exist (HTTP 404).
    #[error("submission or review not found")]
    NotFound,
    /// The backend answered with a non-success status other than 404.
    #[error("backend returned HTTP {0}")]
    Status(StatusCode),
    /// Network-level failure: connection refused, timeout, TLS.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Backend operations the polling controller depends on.
///
/// [`HttpReviewClient`] is the production implementation; tests substitute
/// a scripted one.
#[async_trait]
pub trait ReviewBackend: Send + Sync {
    /// Look up the review already associated with a submission, if any.
    async fn review_of_submission(&self, submission_id: &str) -> ApiResult<Option<Review>>;

    /// Fetch a review by id.
    async fn review(&self, review_id: &str) -> ApiResult<Review>;

    /// Queue a new review job; returns the created review's id.
    async fn request_review(&self, submission_id: &str) -> ApiResult<String>;

    /// Fetch a submission by id.
    async fn submission(&self, submission_id: &str) -> ApiResult<Submission>;
}

/// reqwest-backed implementation of [`ReviewBackend`].
pub struct HttpReviewClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpReviewClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        decode(response).await
    }
}

/// Map the response status to the error taxonomy, then decode the body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl ReviewBackend for HttpReviewClient {
    async fn review_of_submission(&self, submission_id: &str) -> ApiResult<Option<Review>> {
        // The backend answers JSON `null` when no review exists yet.
        self.get_json("/review/of", &[("submission_id", submission_id)])
            .await
    }

    async fn review(&self, review_id: &str) -> ApiResult<Review> {
        self.get_json("/review", &[("id", review_id)]).await
    }

    async fn request_review(&self, submission_id: &str) -> ApiResult<String> {
        let response = self
            .client
            .post(format!("{}/review", self.base_url))
            .query(&[("submission_id", submission_id)])
            .send()
            .await?;
        decode(response).await
    }

    async fn submission(&self, submission_id: &str) -> ApiResult<Submission> {
        self.get_json("/submission", &[("id", submission_id)]).await
    }
}

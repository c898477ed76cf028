//! Typed client for the event backend's REST API.
//!
//! Every call takes a [`CancellationToken`]. Cancelling it makes the pending
//! call resolve to [`ApiError::Cancelled`] so a torn-down page never applies
//! a late response.

pub mod account;
pub mod admin;
pub mod events;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::models::ApiMessage;
use crate::session::SessionStore;

const USER_AGENT: &str = concat!("event-portal/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(String),
    #[error("api error ({status}): {message}")]
    Status { status: u16, message: String },
    #[error("unauthorized")]
    Unauthorized,
    #[error("not signed in")]
    MissingToken,
    #[error("parse error: {0}")]
    Parse(String),
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Message suitable for a notice; prefers what the backend said.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<SessionStore>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| ApiError::Http(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Request carrying the stored bearer token; fails without a session.
    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.session.token().ok_or(ApiError::MissingToken)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    /// Request that carries the token when there is one.
    fn maybe_authorized(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.request(method, path);
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let body = self.execute_text(request, cancel).await?;
        serde_json::from_str(&body).map_err(|err| ApiError::Parse(err.to_string()))
    }

    /// Like [`execute`](Self::execute) for endpoints that answer with a
    /// `{ "message": ... }` body, which may also be empty.
    async fn execute_message(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, ApiError> {
        let body = self.execute_text(request, cancel).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str::<ApiMessage>(&body)
            .ok()
            .and_then(|m| m.message))
    }

    async fn execute_text(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<String, ApiError> {
        let call = async {
            let response = request
                .send()
                .await
                .map_err(|err| ApiError::Http(err.to_string()))?;
            let status = response.status();
            let url = response.url().path().to_string();
            let body = response
                .text()
                .await
                .map_err(|err| ApiError::Http(err.to_string()))?;

            if status == StatusCode::UNAUTHORIZED {
                tracing::warn!(%url, "backend rejected credentials");
                return Err(ApiError::Unauthorized);
            }
            if !status.is_success() {
                tracing::warn!(%url, status = status.as_u16(), "backend returned an error");
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    message: error_message(&body),
                });
            }
            tracing::debug!(%url, status = status.as_u16(), "request completed");
            Ok(body)
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            result = call => result,
        }
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiMessage>(body) {
        Ok(ApiMessage {
            message: Some(message),
            ..
        })
        | Ok(ApiMessage {
            error: Some(message),
            ..
        }) => message,
        _ => body.trim().to_string(),
    }
}

//! Page controllers. Each page owns its fetched lists and UI state, scopes
//! its requests to a [`PageScope`], and hands listing work to
//! [`crate::catalog`].

pub mod admin;
pub mod auth;
pub mod detail;
pub mod landing;
pub mod profile;

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::api::ApiError;

/// How long a transient notice stays up.
pub const NOTICE_TTL: Duration = Duration::from_secs(2);

/// Where the user should land after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    AdminDashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Inline alert with a fixed auto-dismiss window.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn success(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            raised_at: now,
        }
    }

    pub fn error(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            raised_at: now,
        }
    }

    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        match (now - self.raised_at).to_std() {
            Ok(elapsed) => elapsed < NOTICE_TTL,
            Err(_) => true,
        }
    }
}

/// Lifetime of one mounted page. The caller creates it and hands it to the
/// page; clones share the token, so teardown from any clone cancels whatever
/// is in flight.
#[derive(Debug, Clone, Default)]
pub struct PageScope {
    cancel: CancellationToken,
}

impl PageScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    pub fn teardown(&self) {
        self.cancel.cancel();
    }
}

/// Log a failed fetch and fall back to `default`, the way every listing
/// page degrades to an empty list.
pub(crate) fn or_logged<T>(result: Result<T, ApiError>, what: &str, default: T) -> T {
    match result {
        Ok(value) => value,
        Err(ApiError::Cancelled) => {
            tracing::debug!(what, "fetch cancelled");
            default
        }
        Err(err) => {
            tracing::error!(what, error = %err, "fetch failed");
            default
        }
    }
}

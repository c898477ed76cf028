use chrono::{DateTime, Utc};

use super::{Notice, PageScope};
use crate::api::{ApiClient, ApiError};
use crate::error::{Error, Result};
use crate::models::{Rating, RatingInput, RegisteredEvent};
use crate::validation::validate_rating;

/// The signed-in user's registered events and their own ratings.
pub struct Profile {
    scope: PageScope,
    pub username: Option<String>,
    pub events: Vec<RegisteredEvent>,
    selected: Option<i64>,
    own_rating: Option<Rating>,
}

impl Profile {
    /// Load the registered-event list. A rejected token clears the stored
    /// session; either way a guest is sent to login.
    pub async fn load(api: &ApiClient, scope: &PageScope) -> Result<Self> {
        match api.registered_events(scope.token()).await {
            Ok(reply) => {
                let username = reply
                    .username
                    .or_else(|| api.session().current().map(|s| s.username));
                Ok(Self {
                    scope: scope.clone(),
                    username,
                    events: reply.registered_events,
                    selected: None,
                    own_rating: None,
                })
            }
            Err(ApiError::Unauthorized) => {
                tracing::warn!("stored token rejected; signing out");
                api.session().clear()?;
                Err(Error::LoginRequired)
            }
            Err(ApiError::MissingToken) => Err(Error::LoginRequired),
            Err(err) => Err(err.into()),
        }
    }

    pub fn selected(&self) -> Option<&RegisteredEvent> {
        let id = self.selected?;
        self.events.iter().find(|e| e.id == id)
    }

    pub fn own_rating(&self) -> Option<Rating> {
        self.own_rating
    }

    /// Open the rating dialog for one event and fetch what the user gave it
    /// before.
    pub async fn select_event(&mut self, api: &ApiClient, event_id: i64) -> Result<Option<Rating>> {
        self.selected = Some(event_id);
        self.own_rating = None;
        let ratings = api
            .event_ratings(event_id, self.scope.token())
            .await
            .map_err(login_on_auth_failure)?;
        if self.selected == Some(event_id) {
            self.own_rating = ratings.own();
        }
        Ok(self.own_rating)
    }

    /// Create the rating, or replace the one already given, then reload it.
    pub async fn submit_rating(
        &mut self,
        api: &ApiClient,
        event_id: i64,
        rating: u8,
        now: DateTime<Utc>,
    ) -> Result<Notice> {
        if !api.session().is_signed_in() {
            return Err(Error::LoginRequired);
        }
        validate_rating(rating)?;
        if self.selected != Some(event_id) {
            self.select_event(api, event_id).await?;
        }

        let input = RatingInput { event_id, rating };
        let cancel = self.scope.token();
        let result = match self.own_rating {
            Some(existing) => api.update_rating(existing.id, &input, cancel).await,
            None => api.create_rating(&input, cancel).await,
        };

        match result {
            Ok(message) => {
                tracing::info!(event_id, rating, "rating saved");
                self.select_event(api, event_id).await?;
                Ok(Notice::success(
                    message.unwrap_or_else(|| "Rating berhasil disimpan.".to_string()),
                    now,
                ))
            }
            Err(err) => rating_failure(err, "Gagal mengirimkan rating.", now),
        }
    }

    pub async fn delete_rating(&mut self, api: &ApiClient, now: DateTime<Utc>) -> Result<Notice> {
        if !api.session().is_signed_in() {
            return Err(Error::LoginRequired);
        }
        let Some(existing) = self.own_rating else {
            return Ok(Notice::error("Gagal menghapus rating.", now));
        };

        match api.delete_rating(existing.id, self.scope.token()).await {
            Ok(message) => {
                tracing::info!(rating_id = existing.id, "rating deleted");
                self.own_rating = None;
                Ok(Notice::success(
                    message.unwrap_or_else(|| "Rating berhasil dihapus.".to_string()),
                    now,
                ))
            }
            Err(err) => rating_failure(err, "Gagal menghapus rating.", now),
        }
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }
}

fn login_on_auth_failure(err: ApiError) -> Error {
    match err {
        ApiError::Unauthorized | ApiError::MissingToken => Error::LoginRequired,
        other => other.into(),
    }
}

fn rating_failure(err: ApiError, fallback: &str, now: DateTime<Utc>) -> Result<Notice> {
    match err {
        ApiError::Unauthorized | ApiError::MissingToken => Err(Error::LoginRequired),
        ApiError::Cancelled => Err(ApiError::Cancelled.into()),
        other => {
            tracing::error!(error = %other, "rating request failed");
            Ok(Notice::error(fallback, now))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::NoticeKind;

    #[test]
    fn auth_failures_route_to_login() {
        assert!(login_on_auth_failure(ApiError::Unauthorized).needs_login());
        assert!(!login_on_auth_failure(ApiError::Http("reset".into())).needs_login());
    }

    #[test]
    fn backend_failures_become_error_notices() {
        let now = Utc::now();
        let notice = rating_failure(
            ApiError::Status {
                status: 500,
                message: String::new(),
            },
            "Gagal mengirimkan rating.",
            now,
        )
        .expect("notice");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Gagal mengirimkan rating.");
        assert!(rating_failure(ApiError::Unauthorized, "x", now).is_err());
    }
}

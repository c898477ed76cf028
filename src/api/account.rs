use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::{ApiClient, ApiError};
use crate::models::{Credentials, EventRatings, LoginResponse, RatingInput, RegisteredEvents};

impl ApiClient {
    pub async fn login(
        &self,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Result<LoginResponse, ApiError> {
        let request = self.request(Method::POST, "login").json(credentials);
        self.execute(request, cancel).await
    }

    pub async fn sign_up(
        &self,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, ApiError> {
        let request = self.request(Method::POST, "register").json(credentials);
        self.execute_message(request, cancel).await
    }

    pub async fn registered_events(
        &self,
        cancel: &CancellationToken,
    ) -> Result<RegisteredEvents, ApiError> {
        let request = self.authorized(Method::GET, "events/registered")?;
        self.execute(request, cancel).await
    }

    pub async fn event_ratings(
        &self,
        event_id: i64,
        cancel: &CancellationToken,
    ) -> Result<EventRatings, ApiError> {
        let request = self.authorized(Method::GET, &format!("events/{event_id}/ratings"))?;
        self.execute(request, cancel).await
    }

    pub async fn create_rating(
        &self,
        input: &RatingInput,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, ApiError> {
        let request = self.authorized(Method::POST, "rating")?.json(input);
        self.execute_message(request, cancel).await
    }

    pub async fn update_rating(
        &self,
        rating_id: i64,
        input: &RatingInput,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, ApiError> {
        let request = self
            .authorized(Method::PUT, &format!("rating/{rating_id}"))?
            .json(input);
        self.execute_message(request, cancel).await
    }

    pub async fn delete_rating(
        &self,
        rating_id: i64,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, ApiError> {
        let request = self.authorized(Method::DELETE, &format!("rating/{rating_id}"))?;
        self.execute_message(request, cancel).await
    }
}

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::{ApiClient, ApiError};
use crate::models::{Category, Location, NewUser, User, UserList};

impl ApiClient {
    pub async fn categories(&self, cancel: &CancellationToken) -> Result<Vec<Category>, ApiError> {
        self.execute(self.request(Method::GET, "categories"), cancel)
            .await
    }

    pub async fn locations(&self, cancel: &CancellationToken) -> Result<Vec<Location>, ApiError> {
        self.execute(self.request(Method::GET, "location"), cancel)
            .await
    }

    pub async fn users(&self, cancel: &CancellationToken) -> Result<Vec<User>, ApiError> {
        let request = self.maybe_authorized(Method::GET, "user");
        let reply: UserList = self.execute(request, cancel).await?;
        Ok(reply.users)
    }

    pub async fn add_user(
        &self,
        user: &NewUser,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, ApiError> {
        let request = self.maybe_authorized(Method::POST, "register").json(user);
        self.execute_message(request, cancel).await
    }

    pub async fn delete_user(&self, id: i64, cancel: &CancellationToken) -> Result<(), ApiError> {
        let request = self.maybe_authorized(Method::DELETE, &format!("user/{id}"));
        self.execute_message(request, cancel).await.map(|_| ())
    }
}

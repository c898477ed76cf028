use chrono::{DateTime, Utc};

use super::{Notice, PageScope, Route};
use crate::api::{ApiClient, ApiError};
use crate::error::Result;
use crate::models::{Credentials, Role};
use crate::session::Session;
use crate::validation::validate_credentials;

/// Outcome of a login attempt: either where to go next or why not.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    SignedIn { route: Route, role: Role },
    Rejected(Notice),
}

pub fn route_for(role: Role) -> Route {
    match role {
        Role::Admin => Route::AdminDashboard,
        Role::User | Role::Unknown => Route::Landing,
    }
}

pub async fn login(
    api: &ApiClient,
    credentials: &Credentials,
    now: DateTime<Utc>,
    scope: &PageScope,
) -> Result<LoginOutcome> {
    validate_credentials(credentials)?;

    match api.login(credentials, scope.token()).await {
        Ok(reply) => {
            api.session().store(Session {
                token: reply.token,
                username: reply.username.clone(),
            })?;
            tracing::info!(username = %reply.username, role = reply.role.as_str(), "signed in");
            Ok(LoginOutcome::SignedIn {
                route: route_for(reply.role),
                role: reply.role,
            })
        }
        Err(ApiError::Cancelled) => Err(ApiError::Cancelled.into()),
        Err(err) => {
            tracing::warn!(username = %credentials.username, error = %err, "login failed");
            Ok(LoginOutcome::Rejected(Notice::error(
                "Login failed. username atau password salah",
                now,
            )))
        }
    }
}

/// Forget the stored token; the user lands on the login page.
pub fn logout(api: &ApiClient) -> Result<Route> {
    api.session().clear()?;
    tracing::info!("signed out");
    Ok(Route::Login)
}

pub async fn sign_up(
    api: &ApiClient,
    credentials: &Credentials,
    now: DateTime<Utc>,
    scope: &PageScope,
) -> Result<Notice> {
    validate_credentials(credentials)?;

    match api.sign_up(credentials, scope.token()).await {
        Ok(_) => {
            tracing::info!(username = %credentials.username, "account created");
            Ok(Notice::success("Pendaftaran akun telah berhasil", now))
        }
        Err(ApiError::Cancelled) => Err(ApiError::Cancelled.into()),
        Err(err) => Ok(Notice::error(
            format!("Registration failed: {}", err.user_message()),
            now,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admins_land_on_dashboard() {
        assert_eq!(route_for(Role::Admin), Route::AdminDashboard);
        assert_eq!(route_for(Role::User), Route::Landing);
        assert_eq!(route_for(Role::Unknown), Route::Landing);
    }
}

use thiserror::Error;

use crate::api::ApiError;
use crate::session::SessionError;
use crate::validation::ValidationError;

/// Everything a page action can fail with. API and validation failures are
/// the two categories the user sees; `LoginRequired` routes to the login
/// page.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("login required")]
    LoginRequired,
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// The backend rejected the token, or there was none to send.
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            Error::LoginRequired
                | Error::Api(ApiError::Unauthorized)
                | Error::Api(ApiError::MissingToken)
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

use chrono::{DateTime, Utc};

use super::{or_logged, Notice, PageScope};
use crate::api::{ApiClient, ApiError};
use crate::catalog::{status_of, EventStatus};
use crate::error::{Error, Result};
use crate::models::{Event, EventRegistrants, RegistrationForm};
use crate::validation::validate_registration;

/// Whether the register button is offered, and if not, why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Open,
    Full,
    Closed,
    AlreadyRegistered,
}

impl Availability {
    pub fn label(&self) -> &'static str {
        match self {
            Availability::Open => "Daftar",
            Availability::Full => "Kuota penuh",
            Availability::Closed => "Pendaftaran ditutup",
            Availability::AlreadyRegistered => "Sudah terdaftar",
        }
    }
}

pub fn availability(event: &Event, is_registered: bool, now: DateTime<Utc>) -> Availability {
    if event.remaining_capacity == Some(0) {
        Availability::Full
    } else if status_of(event, now) == Some(EventStatus::Ended) {
        Availability::Closed
    } else if is_registered {
        Availability::AlreadyRegistered
    } else {
        Availability::Open
    }
}

/// Single event page with the registration form and the "other events"
/// carousel for signed-in users.
pub struct EventDetail {
    scope: PageScope,
    pub event: Event,
    pub is_registered: bool,
    pub other_events: Vec<Event>,
}

impl EventDetail {
    /// Fetch the event and, for signed-in users, its registration state and
    /// the other-events list. Tearing `scope` down mid-load yields
    /// [`ApiError::Cancelled`].
    pub async fn load(api: &ApiClient, id: i64, scope: &PageScope) -> Result<Self> {
        let cancel = scope.token();
        let event = api.get_event(id, cancel).await?;

        let (is_registered, other_events) = if api.session().is_signed_in() {
            let (registered, others) =
                tokio::join!(api.is_registered(id, cancel), api.other_events(cancel));
            (
                or_logged(registered, "registration status", false),
                or_logged(others, "other events", Vec::new()),
            )
        } else {
            (false, Vec::new())
        };
        if !scope.is_active() {
            return Err(ApiError::Cancelled.into());
        }

        Ok(Self {
            scope: scope.clone(),
            event,
            is_registered,
            other_events,
        })
    }

    pub fn availability(&self, now: DateTime<Utc>) -> Availability {
        availability(&self.event, self.is_registered, now)
    }

    /// Submit the registration form. Guests are sent to the login page;
    /// backend refusals come back as an error notice.
    pub async fn register(
        &mut self,
        api: &ApiClient,
        form: &RegistrationForm,
        now: DateTime<Utc>,
    ) -> Result<Notice> {
        if !api.session().is_signed_in() {
            return Err(Error::LoginRequired);
        }
        validate_registration(form)?;

        match api
            .register_for_event(self.event.id, form, self.scope.token())
            .await
        {
            Ok(_) => {
                self.is_registered = true;
                tracing::info!(event_id = self.event.id, "registered for event");
                Ok(Notice::success("Pendaftaran berhasil!", now))
            }
            Err(ApiError::Unauthorized) => Err(Error::LoginRequired),
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled.into()),
            Err(ApiError::Status { message, .. }) => {
                let message = if message.is_empty() {
                    "Pendaftaran gagal.".to_string()
                } else {
                    message
                };
                Ok(Notice::error(message, now))
            }
            Err(err) => {
                tracing::error!(event_id = self.event.id, error = %err, "registration failed");
                Ok(Notice::error("Terjadi kesalahan.", now))
            }
        }
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }
}

/// Admin view of who registered for an event.
pub async fn load_registrants(
    api: &ApiClient,
    event_id: i64,
    scope: &PageScope,
) -> Result<EventRegistrants> {
    Ok(api.registrants(event_id, scope.token()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn availability_precedence() {
        let now = Utc::now();
        let upcoming = Event {
            date_start: (now + Duration::days(1)).to_rfc3339(),
            remaining_capacity: Some(3),
            ..Event::default()
        };
        assert_eq!(availability(&upcoming, false, now), Availability::Open);
        assert_eq!(
            availability(&upcoming, true, now),
            Availability::AlreadyRegistered
        );

        let full = Event {
            remaining_capacity: Some(0),
            ..upcoming.clone()
        };
        assert_eq!(availability(&full, true, now), Availability::Full);

        let ended = Event {
            date_start: (now - Duration::days(1)).to_rfc3339(),
            ..upcoming
        };
        assert_eq!(availability(&ended, true, now), Availability::Closed);
    }
}

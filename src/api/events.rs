use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::{ApiClient, ApiError};
use crate::models::{
    Event, EventRegistrants, RegistrationCheck, RegistrationForm, UnregisteredEvents,
};
use crate::validation::{EventDraft, EventMode};

impl ApiClient {
    pub async fn list_events(&self, cancel: &CancellationToken) -> Result<Vec<Event>, ApiError> {
        self.execute(self.request(Method::GET, "event"), cancel).await
    }

    pub async fn get_event(&self, id: i64, cancel: &CancellationToken) -> Result<Event, ApiError> {
        self.execute(self.request(Method::GET, &format!("event/{id}")), cancel)
            .await
    }

    pub async fn popular_events(&self, cancel: &CancellationToken) -> Result<Vec<Event>, ApiError> {
        self.execute(self.request(Method::GET, "events/populars"), cancel)
            .await
    }

    /// Events the signed-in user has not registered for yet.
    pub async fn other_events(&self, cancel: &CancellationToken) -> Result<Vec<Event>, ApiError> {
        let request = self.authorized(Method::GET, "events/unregister")?;
        let reply: UnregisteredEvents = self.execute(request, cancel).await?;
        Ok(reply.unregistered_events)
    }

    pub async fn is_registered(
        &self,
        event_id: i64,
        cancel: &CancellationToken,
    ) -> Result<bool, ApiError> {
        let request =
            self.authorized(Method::GET, &format!("events/{event_id}/check-registration"))?;
        let reply: RegistrationCheck = self.execute(request, cancel).await?;
        Ok(reply.is_registered)
    }

    pub async fn register_for_event(
        &self,
        event_id: i64,
        form: &RegistrationForm,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, ApiError> {
        let request = self
            .authorized(Method::POST, &format!("events/{event_id}/register"))?
            .json(form);
        self.execute_message(request, cancel).await
    }

    pub async fn registrants(
        &self,
        event_id: i64,
        cancel: &CancellationToken,
    ) -> Result<EventRegistrants, ApiError> {
        let request = self.request(Method::GET, &format!("events/{event_id}/registered"));
        self.execute(request, cancel).await
    }

    pub async fn create_event(
        &self,
        draft: &EventDraft,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, ApiError> {
        let form = event_form(draft, SessionEncoding::Indexed)?;
        let request = self.authorized(Method::POST, "event")?.multipart(form);
        self.execute_message(request, cancel).await
    }

    pub async fn update_event(
        &self,
        id: i64,
        draft: &EventDraft,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, ApiError> {
        let form = event_form(draft, SessionEncoding::Json)?;
        let request = self
            .maybe_authorized(Method::PUT, &format!("event/{id}"))
            .multipart(form);
        self.execute_message(request, cancel).await
    }

    pub async fn delete_event(&self, id: i64, cancel: &CancellationToken) -> Result<(), ApiError> {
        let request = self.maybe_authorized(Method::DELETE, &format!("event/{id}"));
        self.execute_message(request, cancel).await.map(|_| ())
    }
}

/// Create sends one field per session attribute; update sends the whole
/// agenda as a JSON string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEncoding {
    Indexed,
    Json,
}

fn event_form(draft: &EventDraft, sessions: SessionEncoding) -> Result<Form, ApiError> {
    let offline = draft.mode == EventMode::Offline;
    let mut form = Form::new()
        .text("name", draft.name.clone())
        .text("description", draft.description.clone())
        .text("datestart", draft.date_start.clone());
    if let Some(end) = draft.date_end.as_deref().filter(|d| !d.is_empty()) {
        form = form.text("dateend", end.to_string());
    }
    form = form
        .text("time", draft.time_range())
        .text("capacity", draft.capacity.unwrap_or(0).to_string())
        .text(
            "category_id",
            draft.category_id.map(|id| id.to_string()).unwrap_or_default(),
        )
        .text(
            "location_id",
            if offline {
                draft.location_id.map(|id| id.to_string()).unwrap_or_default()
            } else {
                String::new()
            },
        )
        .text(
            "address",
            if offline {
                draft.address.clone()
            } else {
                String::new()
            },
        )
        .text("price", draft.price.clone())
        .text("mode", draft.mode.as_str());
    if !offline {
        form = form.text("link", draft.link.clone());
    }
    form = form.text("benefits", draft.benefits.clone());

    if let Some(photo) = &draft.photo {
        let part = Part::bytes(photo.bytes.clone())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.content_type)
            .map_err(|err| ApiError::Http(err.to_string()))?;
        form = form.part("photo", part);
    }

    match sessions {
        SessionEncoding::Indexed => {
            for (i, session) in draft.sessions.iter().enumerate() {
                form = form
                    .text(format!("sessions[{i}][date]"), session.date.clone())
                    .text(format!("sessions[{i}][time]"), session.time.clone())
                    .text(format!("sessions[{i}][speaker]"), session.speaker.clone())
                    .text(format!("sessions[{i}][location]"), session.location.clone());
            }
        }
        SessionEncoding::Json => {
            let agenda: Vec<serde_json::Value> = draft
                .sessions
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "date": s.date,
                        "time": s.time,
                        "speaker": s.speaker,
                        "location": s.location,
                    })
                })
                .collect();
            let encoded = serde_json::to_string(&agenda)
                .map_err(|err| ApiError::Parse(err.to_string()))?;
            form = form.text("sessions", encoded);
        }
    }

    Ok(form)
}

use chrono::{DateTime, Utc};

use super::{or_logged, Notice, PageScope, Route};
use crate::api::{ApiClient, ApiError};
use crate::catalog::sort_by_id_desc;
use crate::error::{Error, Result};
use crate::models::{Category, Event, Location, NewUser, Role, User};
use crate::validation::{EventDraft, EventMode, SessionDraft};

/// Admin dashboard: every event, newest id first, with a confirm step
/// before deletion.
pub struct Dashboard {
    scope: PageScope,
    pub events: Vec<Event>,
    pending_delete: Option<i64>,
}

impl Dashboard {
    pub async fn load(api: &ApiClient, scope: &PageScope) -> Self {
        let mut events = or_logged(api.list_events(scope.token()).await, "events", Vec::new());
        sort_by_id_desc(&mut events, |e| e.id);
        Self {
            scope: scope.clone(),
            events,
            pending_delete: None,
        }
    }

    pub fn with_events(mut events: Vec<Event>) -> Self {
        sort_by_id_desc(&mut events, |e| e.id);
        Self {
            scope: PageScope::new(),
            events,
            pending_delete: None,
        }
    }

    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn pending_delete(&self) -> Option<&Event> {
        let id = self.pending_delete?;
        self.events.iter().find(|e| e.id == id)
    }

    /// Delete the event awaiting confirmation. The row is only removed once
    /// the backend agrees.
    pub async fn confirm_delete(&mut self, api: &ApiClient, now: DateTime<Utc>) -> Result<Notice> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(Notice::error("Tidak ada event yang dipilih.", now));
        };
        match api.delete_event(id, self.scope.token()).await {
            Ok(()) => {
                self.events.retain(|e| e.id != id);
                tracing::info!(event_id = id, "event deleted");
                Ok(Notice::success("Event berhasil dihapus", now))
            }
            Err(err) => admin_failure(err, "Gagal menghapus event", now),
        }
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }
}

pub async fn categories(api: &ApiClient, scope: &PageScope) -> Vec<Category> {
    let mut categories = or_logged(api.categories(scope.token()).await, "categories", Vec::new());
    sort_by_id_desc(&mut categories, |c| c.id);
    categories
}

pub async fn locations(api: &ApiClient, scope: &PageScope) -> Vec<Location> {
    let mut locations = or_logged(api.locations(scope.token()).await, "locations", Vec::new());
    sort_by_id_desc(&mut locations, |l| l.id);
    locations
}

/// Regular accounts only, newest first.
pub fn regular_users(users: Vec<User>) -> Vec<User> {
    let mut users: Vec<User> = users.into_iter().filter(|u| u.role == Role::User).collect();
    sort_by_id_desc(&mut users, |u| u.id);
    users
}

pub struct UserAdmin {
    scope: PageScope,
    pub users: Vec<User>,
}

impl UserAdmin {
    pub async fn load(api: &ApiClient, scope: &PageScope) -> Self {
        let users = or_logged(api.users(scope.token()).await, "users", Vec::new());
        Self {
            scope: scope.clone(),
            users: regular_users(users),
        }
    }

    async fn refresh(&mut self, api: &ApiClient) {
        let users = or_logged(api.users(self.scope.token()).await, "users", Vec::new());
        self.users = regular_users(users);
    }

    pub async fn add_user(
        &mut self,
        api: &ApiClient,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Notice> {
        let user = NewUser {
            username: username.trim().to_string(),
            password: password.to_string(),
            role: Role::User,
        };
        if user.username.is_empty() || user.password.is_empty() {
            return Ok(Notice::error("Gagal menambahkan user", now));
        }
        match api.add_user(&user, self.scope.token()).await {
            Ok(_) => {
                tracing::info!(username = %user.username, "user added");
                self.refresh(api).await;
                Ok(Notice::success("User berhasil ditambahkan", now))
            }
            Err(err) => admin_failure(err, "Gagal menambahkan user", now),
        }
    }

    pub async fn delete_user(&mut self, api: &ApiClient, id: i64, now: DateTime<Utc>) -> Result<Notice> {
        match api.delete_user(id, self.scope.token()).await {
            Ok(()) => {
                self.users.retain(|u| u.id != id);
                tracing::info!(user_id = id, "user deleted");
                Ok(Notice::success("User berhasil dihapus", now))
            }
            Err(err) => admin_failure(err, "Gagal menghapus user", now),
        }
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }
}

/// Validate and submit a new event. Success goes back to the dashboard.
pub async fn create_event(
    api: &ApiClient,
    draft: &EventDraft,
    now: DateTime<Utc>,
    scope: &PageScope,
) -> Result<(Notice, Option<Route>)> {
    draft.validate()?;
    if !api.session().is_signed_in() {
        return Err(Error::LoginRequired);
    }
    match api.create_event(draft, scope.token()).await {
        Ok(_) => {
            tracing::info!(name = %draft.name, "event created");
            Ok((
                Notice::success("Event created successfully!", now),
                Some(Route::AdminDashboard),
            ))
        }
        Err(err) => admin_failure(err, "Failed to create event.", now).map(|n| (n, None)),
    }
}

pub async fn update_event(
    api: &ApiClient,
    id: i64,
    draft: &EventDraft,
    now: DateTime<Utc>,
    scope: &PageScope,
) -> Result<(Notice, Option<Route>)> {
    draft.validate()?;
    match api.update_event(id, draft, scope.token()).await {
        Ok(_) => {
            tracing::info!(event_id = id, "event updated");
            Ok((
                Notice::success("Event updated successfully!", now),
                Some(Route::AdminDashboard),
            ))
        }
        Err(err) => admin_failure(err, "Failed to update event. Please try again.", now)
            .map(|n| (n, None)),
    }
}

/// Prefill the edit form from a fetched event. Category and location are
/// matched back to their ids by name.
pub fn draft_from_event(event: &Event, categories: &[Category], locations: &[Location]) -> EventDraft {
    let (start_time, end_time) = split_time_range(event.time.as_deref().unwrap_or_default());
    EventDraft {
        name: event.name.clone(),
        description: event.description.clone(),
        date_start: date_part(&event.date_start),
        date_end: event.date_end.as_deref().map(date_part),
        start_time,
        end_time,
        capacity: event.capacity.and_then(|c| u32::try_from(c).ok()),
        category_id: categories
            .iter()
            .find(|c| c.name == event.category)
            .map(|c| c.id),
        location_id: locations
            .iter()
            .find(|l| l.city == event.location)
            .map(|l| l.id),
        address: event.address.clone().unwrap_or_default(),
        price: event.price.clone(),
        mode: if event.is_online() {
            EventMode::Online
        } else {
            EventMode::Offline
        },
        link: event.link.clone().unwrap_or_default(),
        benefits: event.benefits.clone().unwrap_or_default(),
        photo: None,
        sessions: if event.sessions.is_empty() {
            vec![SessionDraft::default()]
        } else {
            event
                .sessions
                .iter()
                .map(|s| SessionDraft {
                    date: date_part(&s.date),
                    time: s.time.clone(),
                    speaker: s.speaker.clone(),
                    location: s.location.clone(),
                })
                .collect()
        },
    }
}

fn split_time_range(time: &str) -> (String, Option<String>) {
    match time.split_once(" - ") {
        Some((start, end)) => {
            let end = end.trim();
            let end = (!end.is_empty() && end != "Selesai").then(|| end.to_string());
            (start.trim().to_string(), end)
        }
        None => (time.trim().to_string(), None),
    }
}

// Date inputs take `YYYY-MM-DD`; stored values may carry a time part.
fn date_part(raw: &str) -> String {
    raw.get(..10)
        .filter(|head| head.as_bytes().get(4) == Some(&b'-'))
        .unwrap_or(raw)
        .to_string()
}

fn admin_failure(err: ApiError, fallback: &str, now: DateTime<Utc>) -> Result<Notice> {
    match err {
        ApiError::Unauthorized | ApiError::MissingToken => Err(Error::LoginRequired),
        ApiError::Cancelled => Err(ApiError::Cancelled.into()),
        other => {
            tracing::error!(error = %other, "{fallback}");
            Ok(Notice::error(fallback, now))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventSession;

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            username: format!("user{id}"),
            role,
        }
    }

    #[test]
    fn user_list_hides_admins_and_sorts_newest_first() {
        let users = regular_users(vec![
            user(1, Role::User),
            user(2, Role::Admin),
            user(5, Role::User),
            user(3, Role::User),
        ]);
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![5, 3, 1]);
    }

    #[test]
    fn delete_needs_a_pending_event() {
        let mut dashboard = Dashboard::with_events(vec![
            Event {
                id: 1,
                ..Event::default()
            },
            Event {
                id: 4,
                name: "Jazz Night".into(),
                ..Event::default()
            },
        ]);
        assert_eq!(dashboard.events[0].id, 4);
        assert!(dashboard.pending_delete().is_none());

        dashboard.request_delete(4);
        assert_eq!(dashboard.pending_delete().map(|e| e.name.as_str()), Some("Jazz Night"));
        dashboard.cancel_delete();
        assert!(dashboard.pending_delete().is_none());
    }

    #[test]
    fn edit_form_prefills_from_event() {
        let event = Event {
            id: 9,
            name: "Workshop".into(),
            description: "Rust".into(),
            date_start: "2025-02-01T00:00:00.000Z".into(),
            time: Some("09:00 - Selesai".into()),
            capacity: Some(40),
            category: "Teknologi".into(),
            location: "Bandung".into(),
            address: Some("Jl. Dago 2".into()),
            price: "Free".into(),
            mode: "offline".into(),
            sessions: vec![EventSession {
                date: "2025-02-01".into(),
                time: "09:00".into(),
                speaker: "Ayu".into(),
                location: "Room 1".into(),
            }],
            ..Event::default()
        };
        let categories = vec![Category {
            id: 3,
            name: "Teknologi".into(),
        }];
        let locations = vec![Location {
            id: 7,
            city: "Bandung".into(),
        }];

        let draft = draft_from_event(&event, &categories, &locations);
        assert_eq!(draft.date_start, "2025-02-01");
        assert_eq!(draft.start_time, "09:00");
        assert_eq!(draft.end_time, None);
        assert_eq!(draft.category_id, Some(3));
        assert_eq!(draft.location_id, Some(7));
        assert_eq!(draft.mode, EventMode::Offline);
        assert_eq!(draft.sessions[0].speaker, "Ayu");
        assert_eq!(draft.validate(), Ok(()));
        assert_eq!(draft.time_range(), "09:00 - Selesai");
    }

    #[test]
    fn time_range_split() {
        assert_eq!(
            split_time_range("10:00 - 12:00"),
            ("10:00".to_string(), Some("12:00".to_string()))
        );
        assert_eq!(split_time_range("10:00"), ("10:00".to_string(), None));
    }
}

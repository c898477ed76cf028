use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Event {
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date_start: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub date_end: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub time: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient_opt_i64")]
    pub capacity: Option<i64>,
    #[serde(deserialize_with = "lenient_opt_i64")]
    pub remaining_capacity: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub photo: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub price: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub benefits: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub mode: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub link: Option<String>,
    /// Status text as reported by the backend. Filtering never reads it;
    /// see [`crate::catalog::status_of`].
    #[serde(deserialize_with = "blank_as_none")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub average_rating: f64,
    #[serde(deserialize_with = "lenient_i64")]
    pub unique_raters: i64,
    #[serde(deserialize_with = "lenient_f64")]
    pub popularity_score: f64,
    #[serde(deserialize_with = "lenient_sessions")]
    pub sessions: Vec<EventSession>,
}

impl Event {
    pub fn is_online(&self) -> bool {
        self.mode == "online"
    }

    /// `"<city>. <address>"`, or just the city when there is no address.
    pub fn place(&self) -> String {
        match self.address.as_deref() {
            Some(address) => format!("{}. {}", self.location, address),
            None => self.location.clone(),
        }
    }
}

/// One agenda entry of a multi-session event.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct EventSession {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub speaker: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Location {
    pub id: i64,
    pub city: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Row of the profile page: an event the signed-in user has registered for.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct RegisteredEvent {
    pub id: i64,
    #[serde(deserialize_with = "blank_as_none")]
    pub photo: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name_reg: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(deserialize_with = "lenient_i64")]
    pub uniqueraters: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisteredEvents {
    pub registered_events: Vec<RegisteredEvent>,
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UnregisteredEvents {
    pub unregistered_events: Vec<Event>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegistrationCheck {
    #[serde(rename = "isRegistered", default)]
    pub is_registered: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Registrant {
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub job: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct EventRegistrants {
    pub event_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub event_name: String,
    pub registrants: Vec<Registrant>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Rating {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub event_id: i64,
    pub rating: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventRatings {
    pub ratings: Vec<Rating>,
    pub user_id: Option<i64>,
}

impl EventRatings {
    /// The rating left by the user the backend identified as the caller.
    pub fn own(&self) -> Option<Rating> {
        let user_id = self.user_id?;
        self.ratings.iter().find(|r| r.user_id == user_id).copied()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Body of `POST /events/{id}/register`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub job: String,
    pub payment_method: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingInput {
    pub event_id: i64,
    pub rating: u8,
}

/// `{ "message": ... }` replies from mutating endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiMessage {
    pub message: Option<String>,
    pub error: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

// Aggregates can arrive as numbers or as decimal strings.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

// Counts share the same treatment; a fractional string truncates.
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_i64(deserializer)?.unwrap_or_default())
}

fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    })
}

// Sessions come back either as an array or as the JSON string the update
// form submits.
fn lenient_sessions<'de, D>(deserializer: D) -> Result<Vec<EventSession>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match value {
        Value::Array(_) => serde_json::from_value(value),
        Value::String(s) if !s.trim().is_empty() => serde_json::from_str(&s),
        _ => Ok(Vec::new()),
    };
    parsed.map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_sparse_event_payload() {
        let event: Event = serde_json::from_value(json!({
            "id": 4,
            "name": "Tech Meetup",
            "date_start": "2024-12-01",
            "date_end": "",
            "location": null,
            "mode": "online",
            "price": "Free",
            "popularity_score": "12.5",
            "sessions": "[{\"date\":\"2024-12-01\",\"time\":\"09:00\",\"speaker\":\"Ayu\",\"location\":\"Hall A\"}]"
        }))
        .expect("decode event");

        assert_eq!(event.id, 4);
        assert_eq!(event.date_end, None);
        assert_eq!(event.location, "");
        assert!(event.is_online());
        assert_eq!(event.popularity_score, 12.5);
        assert_eq!(event.sessions.len(), 1);
        assert_eq!(event.sessions[0].speaker, "Ayu");
    }

    #[test]
    fn counts_may_arrive_as_strings() {
        let events: Vec<Event> = serde_json::from_value(json!([
            {"id": 1, "name": "Tech Meetup", "unique_raters": "3", "remaining_capacity": null},
            {"id": 2, "name": "Jazz Night", "capacity": "40", "remaining_capacity": 12,
             "unique_raters": 7}
        ]))
        .expect("decode events");

        assert_eq!(events[0].unique_raters, 3);
        assert_eq!(events[0].capacity, None);
        assert_eq!(events[0].remaining_capacity, None);
        assert_eq!(events[1].capacity, Some(40));
        assert_eq!(events[1].remaining_capacity, Some(12));
        assert_eq!(events[1].unique_raters, 7);

        let row: RegisteredEvent =
            serde_json::from_value(json!({"id": 4, "uniqueraters": "5", "rating": "4.5"}))
                .expect("decode registered event");
        assert_eq!(row.uniqueraters, 5);
    }

    #[test]
    fn finds_own_rating() {
        let ratings: EventRatings = serde_json::from_value(json!({
            "user_id": 7,
            "ratings": [
                {"id": 1, "user_id": 3, "event_id": 2, "rating": 4},
                {"id": 2, "user_id": 7, "event_id": 2, "rating": 5}
            ]
        }))
        .expect("decode ratings");

        assert_eq!(ratings.own().map(|r| r.id), Some(2));
    }

    #[test]
    fn unknown_roles_do_not_fail_decoding() {
        let user: User =
            serde_json::from_value(json!({"id": 1, "username": "root", "role": "superuser"}))
                .expect("decode user");
        assert_eq!(user.role, Role::Unknown);
    }
}

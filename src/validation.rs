use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::{Credentials, RegistrationForm};

/// Client-side form problems. Any of these blocks the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Beberapa kolom belum diisi!. ({0})")]
    MissingFields(String),
    #[error("Link harus diisi jika mode online.")]
    OnlineNeedsLink,
    #[error("Lokasi dan Alamat Lengkap wajib diisi jika mode offline.")]
    OfflineNeedsPlace,
    #[error("Please upload an image file.")]
    NotAnImage,
    #[error("unknown mode: {0}")]
    UnknownMode(String),
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMode {
    Online,
    Offline,
}

impl EventMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventMode::Online => "online",
            EventMode::Offline => "offline",
        }
    }
}

impl std::str::FromStr for EventMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "online" => Ok(EventMode::Online),
            "offline" => Ok(EventMode::Offline),
            other => Err(ValidationError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionDraft {
    pub date: String,
    pub time: String,
    pub speaker: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Admin create/update form.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub name: String,
    pub description: String,
    pub date_start: String,
    pub date_end: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub capacity: Option<u32>,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub address: String,
    pub price: String,
    pub mode: EventMode,
    pub link: String,
    pub benefits: String,
    pub photo: Option<PhotoUpload>,
    pub sessions: Vec<SessionDraft>,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            date_start: String::new(),
            date_end: None,
            start_time: String::new(),
            end_time: None,
            capacity: None,
            category_id: None,
            location_id: None,
            address: String::new(),
            price: String::new(),
            mode: EventMode::Offline,
            link: String::new(),
            benefits: String::new(),
            photo: None,
            sessions: vec![SessionDraft::default()],
        }
    }
}

impl EventDraft {
    /// `"<start> - <end>"`; an open end reads `Selesai`.
    pub fn time_range(&self) -> String {
        let end = self
            .end_time
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Selesai");
        format!("{} - {}", self.start_time, end)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push("name");
        }
        if blank(&self.description) {
            missing.push("description");
        }
        if blank(&self.date_start) {
            missing.push("date_start");
        }
        if self.capacity.unwrap_or(0) == 0 {
            missing.push("capacity");
        }
        if self.category_id.is_none() {
            missing.push("category");
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing.join(", ")));
        }

        match self.mode {
            EventMode::Online if blank(&self.link) => Err(ValidationError::OnlineNeedsLink),
            EventMode::Offline if self.location_id.is_none() || blank(&self.address) => {
                Err(ValidationError::OfflineNeedsPlace)
            }
            _ => Ok(()),
        }?;

        if let Some(photo) = &self.photo {
            validate_photo(&photo.content_type)?;
        }
        Ok(())
    }
}

pub fn validate_photo(content_type: &str) -> Result<(), ValidationError> {
    if content_type.starts_with("image/") {
        Ok(())
    } else {
        Err(ValidationError::NotAnImage)
    }
}

pub fn validate_credentials(credentials: &Credentials) -> Result<(), ValidationError> {
    require(&[
        ("username", &credentials.username),
        ("password", &credentials.password),
    ])
}

pub fn validate_registration(form: &RegistrationForm) -> Result<(), ValidationError> {
    require(&[
        ("name", &form.name),
        ("email", &form.email),
        ("phone", &form.phone),
        ("job", &form.job),
        ("payment_method", &form.payment_method),
    ])
}

pub fn validate_rating(rating: u8) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::RatingOutOfRange(rating))
    }
}

fn require(fields: &[(&str, &String)]) -> Result<(), ValidationError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| blank(value))
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing.join(", ")))
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("valid digit regex"));

/// Normalise a typed price into `Rp. 1.234.567`. Empty input stays empty.
pub fn format_rupiah(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        return String::new();
    }
    let input = input.strip_prefix("Rp.").unwrap_or(input);
    let digits = NON_DIGIT.replace_all(input, "");
    if digits.is_empty() {
        return String::new();
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("Rp. {grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_draft() -> EventDraft {
        EventDraft {
            name: "Jazz Night".to_string(),
            description: "Live set".to_string(),
            date_start: "2025-01-10".to_string(),
            start_time: "19:00".to_string(),
            capacity: Some(120),
            category_id: Some(2),
            location_id: Some(5),
            address: "Jl. Braga 1".to_string(),
            price: "Rp. 50.000".to_string(),
            ..EventDraft::default()
        }
    }

    #[test]
    fn complete_offline_draft_passes() {
        assert_eq!(offline_draft().validate(), Ok(()));
    }

    #[test]
    fn required_fields_are_reported() {
        let draft = EventDraft {
            name: " ".to_string(),
            capacity: Some(0),
            ..offline_draft()
        };
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingFields("name, capacity".to_string()))
        );
    }

    #[test]
    fn mode_specific_fields() {
        let online = EventDraft {
            mode: EventMode::Online,
            location_id: None,
            address: String::new(),
            ..offline_draft()
        };
        assert_eq!(online.validate(), Err(ValidationError::OnlineNeedsLink));

        let online = EventDraft {
            link: "https://meet.example.com/x".to_string(),
            ..online
        };
        assert_eq!(online.validate(), Ok(()));

        let offline = EventDraft {
            address: String::new(),
            ..offline_draft()
        };
        assert_eq!(offline.validate(), Err(ValidationError::OfflineNeedsPlace));
    }

    #[test]
    fn photo_must_be_an_image() {
        let draft = EventDraft {
            photo: Some(PhotoUpload {
                file_name: "brief.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                bytes: vec![1, 2, 3],
            }),
            ..offline_draft()
        };
        assert_eq!(draft.validate(), Err(ValidationError::NotAnImage));
    }

    #[test]
    fn time_range_defaults_open_end() {
        let mut draft = offline_draft();
        assert_eq!(draft.time_range(), "19:00 - Selesai");
        draft.end_time = Some("21:00".to_string());
        assert_eq!(draft.time_range(), "19:00 - 21:00");
    }

    #[test]
    fn rupiah_grouping() {
        assert_eq!(format_rupiah("10000"), "Rp. 10.000");
        assert_eq!(format_rupiah("Rp. 1234567"), "Rp. 1.234.567");
        assert_eq!(format_rupiah("500"), "Rp. 500");
        assert_eq!(format_rupiah(""), "");
        assert_eq!(format_rupiah("abc"), "");
    }

    #[test]
    fn small_forms() {
        let creds = Credentials {
            username: "dina".to_string(),
            password: String::new(),
        };
        assert_eq!(
            validate_credentials(&creds),
            Err(ValidationError::MissingFields("password".to_string()))
        );
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(5).is_ok());
        assert!(validate_registration(&RegistrationForm::default()).is_err());
    }
}

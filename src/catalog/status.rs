use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Event;

/// Temporal status of an event relative to a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Ended,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Ended => "ended",
        }
    }

    /// Label shown in the listing selector.
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "Mendatang",
            EventStatus::Ongoing => "Berlangsung",
            EventStatus::Ended => "Selesai",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(EventStatus::Upcoming),
            "ongoing" => Ok(EventStatus::Ongoing),
            "ended" => Ok(EventStatus::Ended),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// Free vs. paid, derived from the free-text price field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceClass {
    Free,
    Paid,
}

impl PriceClass {
    pub fn of(price: &str) -> Self {
        if price.eq_ignore_ascii_case("free") {
            PriceClass::Free
        } else {
            PriceClass::Paid
        }
    }

    /// Wire value used by the listing's price selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceClass::Free => "Free",
            PriceClass::Paid => "Tidak Free",
        }
    }
}

impl FromStr for PriceClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" | "gratis" => Ok(PriceClass::Free),
            "tidak free" | "paid" | "berbayar" => Ok(PriceClass::Paid),
            other => Err(format!("unknown price class: {other}")),
        }
    }
}

/// Parse a backend timestamp. Values without an offset, including date-only
/// ones (UTC midnight), are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn start_of(event: &Event) -> Option<DateTime<Utc>> {
    parse_timestamp(&event.date_start)
}

/// End of the event window, falling back to the start when the end is
/// missing or unreadable.
pub fn end_of(event: &Event) -> Option<DateTime<Utc>> {
    event
        .date_end
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| start_of(event))
}

/// Derive the status of `event` at `now`. `None` when the start date cannot
/// be read; such an event matches no status filter.
pub fn status_of(event: &Event, now: DateTime<Utc>) -> Option<EventStatus> {
    let start = start_of(event)?;
    let end = end_of(event).unwrap_or(start);
    Some(if end < now {
        EventStatus::Ended
    } else if start <= now {
        EventStatus::Ongoing
    } else {
        EventStatus::Upcoming
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Event {
        Event {
            date_start: start.to_rfc3339(),
            date_end: end.map(|e| e.to_rfc3339()),
            ..Event::default()
        }
    }

    #[test]
    fn classifies_against_injected_now() {
        let now = Utc::now();
        let hour = Duration::hours(1);

        let ongoing = event(now - hour, Some(now + hour));
        assert_eq!(status_of(&ongoing, now), Some(EventStatus::Ongoing));

        let ended = event(now - hour * 3, Some(now - hour));
        assert_eq!(status_of(&ended, now), Some(EventStatus::Ended));

        let upcoming = event(now + hour, None);
        assert_eq!(status_of(&upcoming, now), Some(EventStatus::Upcoming));
    }

    #[test]
    fn missing_end_falls_back_to_start() {
        let now = Utc::now();
        let past = event(now - Duration::minutes(5), None);
        assert_eq!(status_of(&past, now), Some(EventStatus::Ended));

        let at_now = event(now, None);
        assert_eq!(status_of(&at_now, now), Some(EventStatus::Ongoing));
    }

    #[test]
    fn unreadable_start_has_no_status() {
        let broken = Event {
            date_start: "soon".to_string(),
            ..Event::default()
        };
        assert_eq!(status_of(&broken, Utc::now()), None);
    }

    #[test]
    fn parses_backend_date_shapes() {
        let midnight = parse_timestamp("2024-12-01").expect("date only");
        assert_eq!(midnight.to_rfc3339(), "2024-12-01T00:00:00+00:00");
        assert!(parse_timestamp("2024-12-01T17:00:00.000Z").is_some());
        assert!(parse_timestamp("2024-12-01 17:00:00").is_some());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let naive = parse_timestamp("2024-12-01T10:00:00").expect("naive");
        let zulu = parse_timestamp("2024-12-01T10:00:00Z").expect("zulu");
        assert_eq!(naive, zulu);

        // Status near the start boundary does not shift with a local offset.
        let event = Event {
            date_start: "2024-12-01T10:00:00".to_string(),
            ..Event::default()
        };
        let just_before = zulu - Duration::minutes(1);
        assert_eq!(status_of(&event, just_before), Some(EventStatus::Upcoming));
        assert_eq!(status_of(&event, zulu), Some(EventStatus::Ongoing));
    }

    #[test]
    fn price_class_ignores_case() {
        for free in ["Free", "free", "FREE"] {
            assert_eq!(PriceClass::of(free), PriceClass::Free);
        }
        assert_eq!(PriceClass::of("Rp. 10.000"), PriceClass::Paid);
        assert_eq!("Tidak Free".parse::<PriceClass>(), Ok(PriceClass::Paid));
    }
}

use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::status::{status_of, EventStatus, PriceClass};
use crate::models::Event;

/// Mode selector of the listing page. `All` disables the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeFilter {
    #[default]
    All,
    Online,
    Offline,
}

impl ModeFilter {
    fn wire(&self) -> Option<&'static str> {
        match self {
            ModeFilter::All => None,
            ModeFilter::Online => Some("online"),
            ModeFilter::Offline => Some("offline"),
        }
    }
}

impl FromStr for ModeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(ModeFilter::All),
            "online" => Ok(ModeFilter::Online),
            "offline" => Ok(ModeFilter::Offline),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// Active criteria of a listing page. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub category: Option<String>,
    pub location: Option<String>,
    pub name: Option<String>,
    pub date_start: Option<String>,
    pub mode: ModeFilter,
    pub price: Option<PriceClass>,
    pub status: Option<EventStatus>,
}

impl FilterSpec {
    /// Initial state of the landing page: upcoming events in any mode.
    pub fn landing() -> Self {
        Self {
            status: Some(EventStatus::Upcoming),
            ..Self::default()
        }
    }

    pub fn matches(&self, event: &Event, now: DateTime<Utc>) -> bool {
        if let Some(category) = active(&self.category) {
            if event.category != category {
                return false;
            }
        }
        if let Some(location) = active(&self.location) {
            if event.location != location {
                return false;
            }
        }
        if let Some(name) = active(&self.name) {
            if !event.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(date) = active(&self.date_start) {
            if event.date_start != date {
                return false;
            }
        }
        if let Some(mode) = self.mode.wire() {
            if event.mode != mode {
                return false;
            }
        }
        if let Some(price) = self.price {
            if PriceClass::of(&event.price) != price {
                return false;
            }
        }
        if let Some(status) = self.status {
            if status_of(event, now) != Some(status) {
                return false;
            }
        }
        true
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Keep the events matching every active criterion, in input order.
pub fn filter_events(events: &[Event], filters: &FilterSpec, now: DateTime<Utc>) -> Vec<Event> {
    events
        .iter()
        .filter(|event| filters.matches(event, now))
        .cloned()
        .collect()
}

/// Events whose derived status at `now` equals `status`.
pub fn events_with_status(events: &[Event], status: EventStatus, now: DateTime<Utc>) -> Vec<Event> {
    let filters = FilterSpec {
        status: Some(status),
        ..FilterSpec::default()
    };
    filter_events(events, &filters, now)
}

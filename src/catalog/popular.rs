use chrono::{DateTime, Utc};

use super::sort::sort_by_popularity_desc;
use super::status::{status_of, EventStatus};
use crate::models::Event;

/// How many ranked events the popular carousel considers.
pub const POPULAR_LIMIT: usize = 10;

/// Rank by popularity, keep the top `limit`, then drop ended events.
/// The cut happens before the ended check, so fewer than `limit` events
/// may remain.
pub fn select_popular(events: &[Event], limit: usize, now: DateTime<Utc>) -> Vec<Event> {
    let mut ranked = events.to_vec();
    sort_by_popularity_desc(&mut ranked);
    ranked.truncate(limit);
    ranked.retain(|event| status_of(event, now) != Some(EventStatus::Ended));
    ranked
}

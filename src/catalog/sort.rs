use std::cmp::Ordering;

use chrono::NaiveDate;
use chrono_tz::Tz;

use super::status::start_of;
use crate::models::Event;

// Events with an unreadable start always go last.
fn missing_last<T: Ord>(a: Option<T>, b: Option<T>, order: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => order(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Newest start first. Stable for equal starts.
pub fn sort_by_start_desc(events: &mut [Event]) {
    events.sort_by(|a, b| missing_last(start_of(a), start_of(b), |a, b| b.cmp(&a)));
}

/// Earliest calendar day first, time of day ignored. Days are taken in `tz`.
pub fn sort_by_day_asc(events: &mut [Event], tz: Tz) {
    let day = |event: &Event| -> Option<NaiveDate> {
        start_of(event).map(|dt| dt.with_timezone(&tz).date_naive())
    };
    events.sort_by(|a, b| missing_last(day(a), day(b), |a, b| a.cmp(&b)));
}

/// Highest id first; the admin tables list recently created rows on top.
pub fn sort_by_id_desc<T>(items: &mut [T], id: impl Fn(&T) -> i64) {
    items.sort_by(|a, b| id(b).cmp(&id(a)));
}

/// Highest popularity score first. Stable for equal scores.
pub fn sort_by_popularity_desc(events: &mut [Event]) {
    events.sort_by(|a, b| b.popularity_score.total_cmp(&a.popularity_score));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: i64, date_start: &str) -> Event {
        Event {
            id,
            date_start: date_start.to_string(),
            ..Event::default()
        }
    }

    fn ids(events: &[Event]) -> Vec<i64> {
        events.iter().map(|e| e.id).collect()
    }

    #[test]
    fn start_desc_puts_newest_first() {
        let mut events = vec![
            event(1, "2024-01-01T10:00:00Z"),
            event(2, "not a date"),
            event(3, "2024-03-01T10:00:00Z"),
            event(4, "2024-02-01T10:00:00Z"),
        ];
        sort_by_start_desc(&mut events);
        assert_eq!(ids(&events), vec![3, 4, 1, 2]);
    }

    #[test]
    fn day_asc_keeps_fetch_order_within_a_day() {
        let mut events = vec![
            event(1, "2024-05-02T20:00:00+07:00"),
            event(2, "2024-05-02T08:00:00+07:00"),
            event(3, "2024-05-01T23:00:00+07:00"),
            event(4, "2024-05-02T12:00:00+07:00"),
        ];
        sort_by_day_asc(&mut events, chrono_tz::Asia::Jakarta);
        assert_eq!(ids(&events), vec![3, 1, 2, 4]);
    }

    #[test]
    fn day_boundary_follows_display_timezone() {
        // 2024-05-01T20:00Z is already 2 May in Jakarta.
        let mut events = vec![event(1, "2024-05-01T20:00:00Z"), event(2, "2024-05-01T10:00:00Z")];
        sort_by_day_asc(&mut events, chrono_tz::Asia::Jakarta);
        assert_eq!(ids(&events), vec![2, 1]);

        let mut events = vec![event(1, "2024-05-01T20:00:00Z"), event(2, "2024-05-01T10:00:00Z")];
        sort_by_day_asc(&mut events, chrono_tz::UTC);
        assert_eq!(ids(&events), vec![1, 2]);
    }

    #[test]
    fn popularity_is_stable() {
        let mut events: Vec<Event> = [(1, 5.0), (2, 9.0), (3, 5.0)]
            .into_iter()
            .map(|(id, score)| Event {
                id,
                popularity_score: score,
                ..Event::default()
            })
            .collect();
        sort_by_popularity_desc(&mut events);
        assert_eq!(ids(&events), vec![2, 1, 3]);
    }
}

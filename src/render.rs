//! Plain-text rendering of pages for the terminal.

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

use crate::catalog::{parse_timestamp, status_of, Page, PriceClass};
use crate::models::{Event, EventRegistrants, Rating, RegisteredEvent, User};
use crate::pages::detail::EventDetail;
use crate::pages::{Notice, NoticeKind};

/// Shown when an event has no photo of its own.
pub const FALLBACK_PHOTO: &str =
    "https://i.pinimg.com/736x/01/7c/44/017c44c97a38c1c4999681e28c39271d.jpg";

const DAY_NAMES: [&str; 7] = ["Minggu", "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu"];

/// Stored photo paths are relative to the asset host.
pub fn photo_url(asset_host: &str, photo: Option<&str>) -> String {
    match photo {
        Some(path) if path.starts_with("http://") || path.starts_with("https://") => {
            path.to_string()
        }
        Some(path) => format!("{}{}", asset_host.trim_end_matches('/'), path),
        None => FALLBACK_PHOTO.to_string(),
    }
}

/// Indonesian weekday name of a date in the display timezone.
pub fn day_name(raw: &str, tz: Tz) -> Option<&'static str> {
    let instant = parse_timestamp(raw)?;
    let day = instant.with_timezone(&tz).weekday().num_days_from_sunday();
    DAY_NAMES.get(day as usize).copied()
}

pub struct Renderer {
    asset_host: String,
    timezone: Tz,
}

impl Renderer {
    pub fn new(asset_host: impl Into<String>, timezone: Tz) -> Self {
        Self {
            asset_host: asset_host.into(),
            timezone,
        }
    }

    fn dated(&self, raw: &str) -> String {
        match day_name(raw, self.timezone) {
            Some(day) => format!("{day}, {raw}"),
            None => raw.to_string(),
        }
    }

    pub fn event_card(&self, event: &Event) -> String {
        format!(
            "[{id}] {name} ({price})\n    {date}\n    {place}",
            id = event.id,
            name = event.name,
            price = event.price,
            date = self.dated(&event.date_start),
            place = event.place(),
        )
    }

    pub fn event_grid(&self, page: &Page<Event>) -> String {
        let mut out = String::new();
        if page.is_empty() {
            out.push_str("Tidak ada event.\n");
        }
        for event in &page.items {
            let _ = writeln!(out, "{}", self.event_card(event));
        }
        let _ = write!(
            out,
            "Halaman {} / {} ({} event)",
            page.page, page.total_pages, page.total_items
        );
        if page.has_prev() {
            out.push_str("  [prev]");
        }
        if page.has_next() {
            out.push_str("  [next]");
        }
        out
    }

    pub fn popular(&self, events: &[Event]) -> String {
        let mut out = String::from("Event populer\n");
        for (rank, event) in events.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>2}. {} ({:.1} / {} rater) {}",
                rank + 1,
                event.name,
                event.average_rating,
                event.unique_raters,
                self.dated(&event.date_start),
            );
        }
        out
    }

    pub fn event_detail(&self, detail: &EventDetail, now: DateTime<Utc>) -> String {
        let event = &detail.event;
        let mut out = String::new();
        let _ = writeln!(out, "{}", event.name);
        let _ = writeln!(out, "Foto      : {}", photo_url(&self.asset_host, event.photo.as_deref()));
        let _ = writeln!(out, "Tanggal   : {}", self.dated(&event.date_start));
        if let Some(end) = &event.date_end {
            let _ = writeln!(out, "Selesai   : {}", self.dated(end));
        }
        if let Some(time) = &event.time {
            let _ = writeln!(out, "Waktu     : {time}");
        }
        if event.is_online() {
            let _ = writeln!(out, "Mode      : online {}", event.link.as_deref().unwrap_or_default());
        } else {
            let _ = writeln!(out, "Lokasi    : {}", event.place());
        }
        let _ = writeln!(out, "Kategori  : {}", event.category);
        let _ = writeln!(
            out,
            "Harga     : {} ({})",
            event.price,
            PriceClass::of(&event.price).as_str()
        );
        if let Some(status) = status_of(event, now) {
            let _ = writeln!(out, "Status    : {}", status.label());
        }
        if let (Some(capacity), Some(remaining)) = (event.capacity, event.remaining_capacity) {
            let _ = writeln!(out, "Kuota     : {remaining} / {capacity}");
        }
        let _ = writeln!(out, "\n{}", event.description);
        if let Some(benefits) = &event.benefits {
            let _ = writeln!(out, "\nBenefit: {benefits}");
        }
        if !event.sessions.is_empty() {
            out.push_str("\nSesi\n");
            for session in &event.sessions {
                let _ = writeln!(
                    out,
                    "  {} {} - {} @ {}",
                    session.date, session.time, session.speaker, session.location
                );
            }
        }
        let _ = writeln!(out, "\n[{}]", detail.availability(now).label());

        if !detail.other_events.is_empty() {
            out.push_str("\nEvent lainnya\n");
            for other in &detail.other_events {
                let _ = writeln!(out, "  [{}] {} {}", other.id, other.name, self.dated(&other.date_start));
            }
        }
        out
    }

    pub fn admin_events(&self, events: &[Event]) -> String {
        let mut out = format!("{:>5}  {:<32} {:<12} {:<10} {}\n", "ID", "Nama", "Tanggal", "Mode", "Kuota");
        for event in events {
            let _ = writeln!(
                out,
                "{:>5}  {:<32} {:<12} {:<10} {}/{}",
                event.id,
                truncate(&event.name, 32),
                event.date_start.get(..10).unwrap_or(&event.date_start),
                event.mode,
                event.remaining_capacity.unwrap_or_default(),
                event.capacity.unwrap_or_default(),
            );
        }
        out
    }

    pub fn registrants(&self, list: &EventRegistrants) -> String {
        let mut out = format!("Pendaftar {} (#{})\n", list.event_name, list.event_id);
        if list.registrants.is_empty() {
            out.push_str("Belum ada pendaftar.\n");
        }
        for (i, r) in list.registrants.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}. {} <{}> {} {} ({})",
                i + 1,
                r.name,
                r.email,
                r.phone,
                r.job,
                r.username
            );
        }
        out
    }

    pub fn users(&self, users: &[User]) -> String {
        let mut out = String::new();
        for user in users {
            let _ = writeln!(out, "{:>5}  {:<24} {}", user.id, user.username, user.role.as_str());
        }
        out
    }

    pub fn profile(&self, username: Option<&str>, events: &[RegisteredEvent]) -> String {
        let mut out = format!("Profil {}\n", username.unwrap_or("-"));
        if events.is_empty() {
            out.push_str("Belum mendaftar event apa pun.\n");
        }
        for event in events {
            let _ = writeln!(
                out,
                "[{}] {} | {} {} | {} | {} | rating {:.1} ({} rater)",
                event.id,
                event.name,
                self.dated(&event.date),
                event.time,
                event.location,
                event.status,
                event.rating,
                event.uniqueraters,
            );
        }
        out
    }

    pub fn rating(&self, rating: Option<Rating>) -> String {
        match rating {
            Some(r) => {
                let stars = usize::from(r.rating.min(5));
                format!("Rating kamu: {}{}", "*".repeat(stars), ".".repeat(5 - stars))
            }
            None => "Belum memberi rating.".to_string(),
        }
    }

    pub fn notice(&self, notice: &Notice) -> String {
        match notice.kind {
            NoticeKind::Success => format!("ok: {}", notice.message),
            NoticeKind::Error => format!("error: {}", notice.message),
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_paths_resolve_against_asset_host() {
        assert_eq!(
            photo_url("http://localhost:5000", Some("/uploads/a.png")),
            "http://localhost:5000/uploads/a.png"
        );
        assert_eq!(
            photo_url("http://localhost:5000/", Some("https://cdn.example.com/b.png")),
            "https://cdn.example.com/b.png"
        );
        assert_eq!(photo_url("http://localhost:5000", None), FALLBACK_PHOTO);
    }

    #[test]
    fn weekday_names_follow_display_timezone() {
        // 2024-12-01 is a Sunday.
        assert_eq!(day_name("2024-12-01", chrono_tz::UTC), Some("Minggu"));
        // 20:00 UTC Sunday is already Monday in Jakarta.
        assert_eq!(
            day_name("2024-12-01T20:00:00Z", chrono_tz::Asia::Jakarta),
            Some("Senin")
        );
        assert_eq!(day_name("soon", chrono_tz::UTC), None);
    }

    #[test]
    fn grid_reports_paging() {
        let renderer = Renderer::new("http://localhost:5000", chrono_tz::UTC);
        let page = crate::catalog::paginate(
            &[Event {
                id: 1,
                name: "Tech Meetup".into(),
                price: "Free".into(),
                date_start: "2024-12-01".into(),
                location: "Bandung".into(),
                ..Event::default()
            }],
            8,
            1,
        );
        let text = renderer.event_grid(&page);
        assert!(text.contains("[1] Tech Meetup (Free)"));
        assert!(text.contains("Minggu, 2024-12-01"));
        assert!(text.contains("Halaman 1 / 1"));
        assert!(!text.contains("[next]"));
    }
}

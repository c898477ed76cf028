//! Listing logic shared by every page: status classification, filtering,
//! ordering, pagination and the popular selection. Nothing in here performs
//! I/O or reads the clock; callers pass `now` in.

pub mod filter;
pub mod pagination;
pub mod popular;
pub mod sort;
pub mod status;

pub use filter::{events_with_status, filter_events, FilterSpec, ModeFilter};
pub use pagination::{paginate, total_pages, Page, Pager};
pub use popular::{select_popular, POPULAR_LIMIT};
pub use sort::{sort_by_day_asc, sort_by_id_desc, sort_by_popularity_desc, sort_by_start_desc};
pub use status::{parse_timestamp, status_of, EventStatus, PriceClass};

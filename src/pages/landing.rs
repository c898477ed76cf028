use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::{or_logged, PageScope};
use crate::api::ApiClient;
use crate::catalog::{
    filter_events, select_popular, sort_by_day_asc, sort_by_start_desc, FilterSpec, Page, Pager,
    POPULAR_LIMIT,
};
use crate::models::{Event, Location};

/// What the landing page shows for the current filter state.
#[derive(Debug, Clone)]
pub struct LandingView {
    pub page: Page<Event>,
    pub popular: Vec<Event>,
}

/// Public listing: filter bar, paginated upcoming grid, popular carousel.
pub struct Landing {
    scope: PageScope,
    events: Vec<Event>,
    popular: Vec<Event>,
    categories: Vec<String>,
    locations: Vec<Location>,
    filters: FilterSpec,
    pager: Pager,
    timezone: Tz,
}

impl Landing {
    /// Requests issued by [`load`](Self::load) run under `scope`; tearing it
    /// down from elsewhere cancels them and leaves the page untouched.
    pub fn new(page_size: usize, timezone: Tz, scope: &PageScope) -> Self {
        Self {
            scope: scope.clone(),
            events: Vec::new(),
            popular: Vec::new(),
            categories: Vec::new(),
            locations: Vec::new(),
            filters: FilterSpec::landing(),
            pager: Pager::new(page_size),
            timezone,
        }
    }

    /// Fetch everything the page needs. Each list fails on its own and
    /// stays empty; nothing is applied once the page is torn down.
    pub async fn load(&mut self, api: &ApiClient) {
        let cancel = self.scope.token().clone();
        let (categories, locations, events, popular) = tokio::join!(
            api.categories(&cancel),
            api.locations(&cancel),
            api.list_events(&cancel),
            api.popular_events(&cancel),
        );
        if !self.scope.is_active() {
            return;
        }

        self.categories = or_logged(categories, "categories", Vec::new())
            .into_iter()
            .map(|category| category.name)
            .collect();
        self.locations = or_logged(locations, "locations", Vec::new());

        let mut events = or_logged(events, "events", Vec::new());
        sort_by_start_desc(&mut events);
        self.events = events;

        self.popular = or_logged(popular, "popular events", Vec::new());
        tracing::info!(
            events = self.events.len(),
            popular = self.popular.len(),
            "landing page loaded"
        );
    }

    /// Seed the page with already-fetched lists.
    pub fn with_data(mut self, mut events: Vec<Event>, popular: Vec<Event>) -> Self {
        sort_by_start_desc(&mut events);
        self.events = events;
        self.popular = popular;
        self
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    /// Replace the filter state; the grid goes back to page one.
    pub fn set_filters(&mut self, filters: FilterSpec) {
        self.filters = filters;
        self.pager.reset();
    }

    pub fn update_filters(&mut self, change: impl FnOnce(&mut FilterSpec)) {
        change(&mut self.filters);
        self.pager.reset();
    }

    pub fn filtered(&self, now: DateTime<Utc>) -> Vec<Event> {
        filter_events(&self.events, &self.filters, now)
    }

    pub fn next_page(&mut self, now: DateTime<Utc>) -> bool {
        let total = self.filtered(now).len();
        self.pager.next(total)
    }

    pub fn prev_page(&mut self) -> bool {
        self.pager.prev()
    }

    pub fn go_to_page(&mut self, page: usize, now: DateTime<Utc>) {
        let total = self.filtered(now).len();
        self.pager.go_to(page, total);
    }

    /// Current grid page, each page ordered by calendar day, plus the
    /// popular carousel.
    pub fn view(&self, now: DateTime<Utc>) -> LandingView {
        let mut page = self.pager.view(&self.filtered(now));
        sort_by_day_asc(&mut page.items, self.timezone);
        LandingView {
            page,
            popular: select_popular(&self.popular, POPULAR_LIMIT, now),
        }
    }

    /// Category dropdown entries matching what was typed so far.
    pub fn category_suggestions(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.categories
            .iter()
            .filter(|name| name.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }

    pub fn location_suggestions(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.locations
            .iter()
            .filter(|loc| loc.city.to_lowercase().contains(&query))
            .map(|loc| loc.city.as_str())
            .collect()
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }
}

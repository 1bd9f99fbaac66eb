//! Pagination state for the feed.
//!
//! [`FeedState`] is a plain value threaded through [`FeedState::update`]:
//! every [`Msg`] produces the next state plus the [`Effect`]s the caller must
//! run. Nothing here performs I/O.
//!
//! Invariants:
//! - at most one fetch is live; its id is kept in `in_flight` and any
//!   completion carrying another id is discarded
//! - items are only appended, in page order, except on a random-query reset
//! - query and cursors are read from the state when a fetch is dispatched

use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::scroll::{LoadingState, ScrollPosition, ScrollTrigger};
use crate::types::{Item, PageResponse};
use crate::viewport::ViewportGeometry;

/// Query shown while a random query is being resolved by the server.
pub const PENDING_QUERY: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: RequestId,
    pub query: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchRequest),
    /// A live page was merged; `count` items were appended.
    PageAppended { count: usize },
}

#[derive(Debug, Clone)]
pub enum Msg {
    /// Load the first page of `query`, keeping what is already listed.
    FetchRequested(String),
    /// Drop everything and load the configured random query.
    RandomQueryRequested,
    ScrollPositionChanged(ScrollPosition),
    FetchSucceeded {
        request: RequestId,
        response: PageResponse,
    },
    FetchFailed {
        request: RequestId,
        error: FeedError,
    },
    Resized {
        geometry: ViewportGeometry,
        client_height: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct FeedState {
    items: Vec<Item>,
    /// Query the next fetch is sent for
    query: String,
    /// A random query is out and the server hasn't named it yet.
    resolving: bool,
    after: String,
    before: String,
    loading: LoadingState,
    error: Option<String>,
    trigger: ScrollTrigger,
    geometry: Option<ViewportGeometry>,
    fixed_proximity: Option<usize>,
    random_query: String,
    in_flight: Option<FetchRequest>,
    next_id: u64,
    exhausted: bool,
}

impl FeedState {
    /// Initial state for `query`. The first page is requested right away, so
    /// the state starts out loading.
    pub fn start(
        query: &str,
        random_query: &str,
        fixed_proximity: Option<usize>,
    ) -> (Self, Vec<Effect>) {
        let mut state = Self {
            items: Vec::new(),
            query: query.trim().to_string(),
            resolving: false,
            after: String::new(),
            before: String::new(),
            loading: LoadingState::Idle,
            error: None,
            trigger: ScrollTrigger::new(fixed_proximity.unwrap_or(0)),
            geometry: None,
            fixed_proximity,
            random_query: random_query.trim().to_string(),
            in_flight: None,
            next_id: 0,
            exhausted: false,
        };
        let effects = state.dispatch(state.query.clone(), String::new());
        (state, effects)
    }

    pub fn update(mut self, msg: Msg) -> (Self, Vec<Effect>) {
        let effects = match msg {
            Msg::FetchRequested(query) => self.fetch_requested(&query),
            Msg::RandomQueryRequested => self.random_query_requested(),
            Msg::ScrollPositionChanged(position) => self.scroll_position_changed(position),
            Msg::FetchSucceeded { request, response } => self.fetch_succeeded(request, response),
            Msg::FetchFailed { request, error } => self.fetch_failed(request, error),
            Msg::Resized {
                geometry,
                client_height,
            } => {
                self.resized(geometry, client_height);
                Vec::new()
            }
        };
        (self, effects)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Query to show. A placeholder while a random query is unresolved.
    pub fn query(&self) -> &str {
        if self.resolving {
            PENDING_QUERY
        } else {
            &self.query
        }
    }

    /// Query a refresh or the next scroll fetch is sent for.
    pub fn request_query(&self) -> &str {
        &self.query
    }

    pub fn after(&self) -> &str {
        &self.after
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn geometry(&self) -> Option<ViewportGeometry> {
        self.geometry
    }

    pub fn proximity(&self) -> usize {
        self.trigger.proximity()
    }

    /// The last page came back without a next cursor.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn in_flight(&self) -> Option<&FetchRequest> {
        self.in_flight.as_ref()
    }

    fn dispatch(&mut self, query: String, after: String) -> Vec<Effect> {
        let request = FetchRequest {
            id: RequestId(self.next_id),
            query,
            after,
        };
        self.next_id += 1;
        self.loading.start_loading();

        if let Some(superseded) = self.in_flight.replace(request.clone()) {
            debug!(id = superseded.id.0, "superseding in-flight fetch");
        }
        debug!(
            id = request.id.0,
            query = %request.query,
            after = %request.after,
            "dispatching fetch"
        );
        vec![Effect::Fetch(request)]
    }

    fn fetch_requested(&mut self, query: &str) -> Vec<Effect> {
        let query = query.trim();
        if query.is_empty() {
            warn!("ignoring fetch request for an empty query");
            return Vec::new();
        }
        if self.loading.is_loading() {
            debug!(query, "fetch already in flight, dropping request");
            return Vec::new();
        }
        self.exhausted = false;
        self.dispatch(query.to_string(), String::new())
    }

    fn random_query_requested(&mut self) -> Vec<Effect> {
        self.items.clear();
        self.query = self.random_query.clone();
        self.resolving = true;
        self.after.clear();
        self.before.clear();
        self.error = None;
        self.exhausted = false;
        self.dispatch(self.query.clone(), String::new())
    }

    fn scroll_position_changed(&mut self, position: ScrollPosition) -> Vec<Effect> {
        if self.exhausted {
            return Vec::new();
        }
        if self
            .trigger
            .notify_scroll_position(position, &mut self.loading)
        {
            self.scroll_triggered()
        } else {
            Vec::new()
        }
    }

    fn scroll_triggered(&mut self) -> Vec<Effect> {
        self.dispatch(self.query.clone(), self.after.clone())
    }

    /// Take the in-flight request if `request` is it; anything else is stale.
    fn complete(&mut self, request: RequestId) -> Option<FetchRequest> {
        if self.in_flight.as_ref().is_some_and(|p| p.id == request) {
            self.in_flight.take()
        } else {
            debug!(id = request.0, "discarding stale fetch result");
            None
        }
    }

    fn fetch_succeeded(&mut self, request: RequestId, response: PageResponse) -> Vec<Effect> {
        let Some(pending) = self.complete(request) else {
            return Vec::new();
        };

        info!(
            count = response.items.len(),
            query = %pending.query,
            "page loaded"
        );

        let count = response.items.len();
        self.items.extend(response.items);
        self.query = if response.query.trim().is_empty() {
            pending.query
        } else {
            response.query
        };
        self.exhausted = response.after.is_empty();
        self.after = response.after;
        self.before = response.before;
        self.resolving = false;
        self.error = None;
        self.loading.stop_loading();
        vec![Effect::PageAppended { count }]
    }

    fn fetch_failed(&mut self, request: RequestId, error: FeedError) -> Vec<Effect> {
        if self.complete(request).is_none() {
            return Vec::new();
        }
        warn!(?error, "page fetch failed");
        self.loading.stop_loading();
        self.error = Some(error.to_string());
        Vec::new()
    }

    fn resized(&mut self, geometry: ViewportGeometry, client_height: usize) {
        let proximity = self
            .fixed_proximity
            .unwrap_or_else(|| geometry.class().proximity(client_height));
        self.trigger.set_proximity(proximity);
        self.geometry = Some(geometry);
    }
}

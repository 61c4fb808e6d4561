//! Race-safe paginated fetching.
//!
//! [`Paginator`] owns the lifecycle of one logical list query: it issues page
//! requests, accumulates results across pages, exposes load-more / load-all /
//! reload operations, and silently discards responses that belong to a
//! superseded query.
//!
//! Nothing is ever cancelled. Every fetch is issued under a ticket capturing
//! the query key ("bucket") and a generation token, and that ticket is
//! re-validated against the live state at every mutating checkpoint. A fetch
//! whose ticket no longer matches is allowed to finish, and its result is
//! dropped on the floor. The generation token is regenerated on every forced
//! reset, so even a refresh of the *same* query orphans the requests of the
//! previous epoch.
//!
//! Fetch failures never escape this module's public surface: the controller
//! stops loading, abandons any load-all chain, keeps the items it already
//! has, records the error in the snapshot and logs it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use freightline_core::Page;

use crate::error::{SdkError, SdkResult};
use crate::query::{QueryKey, QueryParams};

/// Source of list pages: the seam between the controller and the transport.
///
/// [`crate::client::HttpClient`] implements this for any deserializable item
/// type; tests substitute scripted in-memory sources.
#[async_trait]
pub trait PageSource<T: Send>: Send + Sync {
    /// Fetch one page of the query identified by `path` and `params`.
    async fn fetch_page(&self, path: &str, params: &QueryParams, page: u32)
        -> SdkResult<Page<T>>;
}

/// Observable state of a [`Paginator`], copied out under the lock.
#[derive(Debug, Clone)]
pub struct FetchSnapshot<T> {
    /// Items accumulated across pages, in page order.
    pub items: Vec<T>,
    /// The next page cursor (1-based; 1 before anything loaded).
    pub page: u32,
    /// Whether the server reported another page after the last applied one.
    pub has_next: bool,
    /// Whether a request is outstanding.
    pub is_loading: bool,
    /// Server-reported total count, once the first page has been applied.
    pub total_count: Option<u64>,
    /// Terminal error of the most recent failed attempt, if any.
    pub last_error: Option<Arc<SdkError>>,
}

#[derive(Debug)]
struct FetchState<T> {
    bucket: Option<QueryKey>,
    params: QueryParams,
    items: Vec<T>,
    page: u32,
    has_next: bool,
    is_loading: bool,
    total_count: Option<u64>,
    generation: Uuid,
    load_all_requested: bool,
    last_error: Option<Arc<SdkError>>,
}

impl<T> FetchState<T> {
    fn new() -> Self {
        Self {
            bucket: None,
            params: QueryParams::default(),
            items: Vec::new(),
            page: 1,
            has_next: false,
            is_loading: false,
            total_count: None,
            generation: Uuid::new_v4(),
            load_all_requested: false,
            last_error: None,
        }
    }

    /// Full reset: fresh generation, empty accumulation, cursor back to 1,
    /// loading flagged for the page-1 fetch the caller is about to issue.
    fn reset(&mut self, bucket: QueryKey, params: QueryParams) {
        self.bucket = Some(bucket);
        self.params = params;
        self.items.clear();
        self.page = 1;
        self.has_next = false;
        self.is_loading = true;
        self.total_count = None;
        self.generation = Uuid::new_v4();
        self.load_all_requested = false;
        self.last_error = None;
    }

    fn matches(&self, ticket: &Ticket) -> bool {
        self.bucket.as_ref() == Some(&ticket.bucket) && self.generation == ticket.generation
    }

    fn same_bucket(&self, ticket: &Ticket) -> bool {
        self.bucket.as_ref() == Some(&ticket.bucket)
    }

    fn ticket(&self, page: u32) -> Option<Ticket> {
        self.bucket.as_ref().map(|bucket| Ticket {
            bucket: bucket.clone(),
            generation: self.generation,
            params: self.params.clone(),
            page,
        })
    }
}

/// Identity captured when a fetch is issued, validated when it resolves.
#[derive(Debug, Clone)]
struct Ticket {
    bucket: QueryKey,
    generation: Uuid,
    params: QueryParams,
    page: u32,
}

/// Incrementally-loadable, race-safe view over one paginated list endpoint.
///
/// All operations take `&self`; share the controller between tasks with an
/// `Arc`. The internal lock is never held across a network call.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use freightline_core::Trip;
/// use freightline_sdk::{HttpClient, Paginator, QueryParams, SdkConfig};
///
/// # async fn example() -> Result<(), freightline_sdk::SdkError> {
/// let http = Arc::new(HttpClient::new(SdkConfig::new("https://api.example.com"))?);
/// let trips: Paginator<Trip, _> = Paginator::new(http, "/trips");
///
/// trips.configure(QueryParams::new().with("text", "abc")).await;
/// while trips.has_next().await {
///     trips.load_next().await;
/// }
/// let all = trips.snapshot().await;
/// println!("{} of {:?} trips", all.items.len(), all.total_count);
/// # Ok(())
/// # }
/// ```
pub struct Paginator<T: Send, S: PageSource<T>> {
    path: String,
    source: Arc<S>,
    state: Mutex<FetchState<T>>,
}

impl<T: Send, S: PageSource<T>> Paginator<T, S> {
    /// Create a controller for one endpoint. No request is issued until
    /// [`configure`](Self::configure) is called.
    pub fn new(source: Arc<S>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source,
            state: Mutex::new(FetchState::new()),
        }
    }

    /// The endpoint path this controller fetches from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Derive the query identity for `params` and re-seat the controller on
    /// it.
    ///
    /// A changed bucket performs a full reset (fresh generation, items
    /// emptied, cursor back to 1) and fetches page 1, so results from two
    /// parameter sets are never mixed. An unchanged bucket is a no-op.
    pub async fn configure(&self, params: QueryParams) {
        let ticket = {
            let mut state = self.state.lock().await;
            let bucket = QueryKey::derive(&self.path, &params);
            if state.bucket.as_ref() == Some(&bucket) {
                return;
            }
            state.reset(bucket, params);
            state.ticket(1)
        };
        if let Some(ticket) = ticket {
            self.run_fetch(ticket).await;
        }
    }

    /// Fetch the next page, if the server reported one.
    ///
    /// `has_next` is cleared synchronously before the request goes out, so
    /// rapid repeated calls cannot stack page advances: every call after the
    /// first is a no-op until a response re-establishes `has_next`.
    pub async fn load_next(&self) {
        let ticket = {
            let mut state = self.state.lock().await;
            if !state.has_next {
                return;
            }
            state.page += 1;
            state.has_next = false;
            state.ticket(state.page)
        };
        if let Some(ticket) = ticket {
            self.run_fetch(ticket).await;
        }
    }

    /// Fetch every remaining page.
    ///
    /// Each applied response that still reports more pages advances the
    /// cursor and chains another fetch, until one reports the end. A forced
    /// reset during the chain regenerates the generation token, and the
    /// chain stops at its next checkpoint without touching the new state.
    pub async fn load_all(&self) {
        let ticket = {
            let mut state = self.state.lock().await;
            if !state.has_next {
                return;
            }
            state.load_all_requested = true;
            state.page += 1;
            state.has_next = false;
            state.ticket(state.page)
        };
        if let Some(ticket) = ticket {
            self.run_fetch(ticket).await;
        }
    }

    /// Re-fetch the query from the server.
    ///
    /// With `reset_items` the controller discards everything immediately and
    /// starts over from page 1 under a fresh generation, exactly like a
    /// parameter change.
    ///
    /// Without it, pages 1 through the current cursor are re-fetched
    /// concurrently and the accumulated list is swapped in one step once all
    /// of them have answered, reassembled in page order. The visible item
    /// count never dips below its pre-reload value. `has_next` is held down
    /// while the pages are in flight, so load-more is inert until the swap;
    /// it is then recomputed from the deepest page, along with the total
    /// count.
    pub async fn reload(&self, reset_items: bool) {
        if reset_items {
            let ticket = {
                let mut state = self.state.lock().await;
                let Some(bucket) = state.bucket.clone() else {
                    return;
                };
                let params = state.params.clone();
                state.reset(bucket, params);
                state.ticket(1)
            };
            if let Some(ticket) = ticket {
                self.run_fetch(ticket).await;
            }
            return;
        }

        let (ticket, depth, had_next) = {
            let mut state = self.state.lock().await;
            let Some(ticket) = state.ticket(1) else {
                return;
            };
            let had_next = state.has_next;
            state.has_next = false;
            state.is_loading = true;
            (ticket, state.page, had_next)
        };

        let fetches = (1..=depth).map(|page| {
            let source = Arc::clone(&self.source);
            let path = self.path.clone();
            let params = ticket.params.clone();
            async move { source.fetch_page(&path, &params, page).await }
        });
        // join_all yields results in input order, which is page order, no
        // matter how the requests actually interleave.
        let outcomes = futures::future::join_all(fetches).await;

        let mut pages = Vec::with_capacity(outcomes.len());
        let mut failure = None;
        for outcome in outcomes {
            match outcome {
                Ok(page) => pages.push(page),
                Err(err) if failure.is_none() => failure = Some(err),
                Err(_) => {}
            }
        }

        let mut state = self.state.lock().await;
        if state.matches(&ticket) {
            match failure {
                Some(err) => {
                    warn!(
                        path = %self.path,
                        error = %err,
                        "reload failed; keeping previously accumulated items"
                    );
                    state.has_next = had_next;
                    state.is_loading = false;
                    state.load_all_requested = false;
                    state.last_error = Some(Arc::new(err));
                }
                None => {
                    state.has_next = pages.last().map(Page::has_next).unwrap_or(false);
                    state.total_count = pages.last().map(|p| p.count);
                    state.items = pages.into_iter().flat_map(|p| p.results).collect();
                    state.is_loading = false;
                    state.last_error = None;
                }
            }
        } else {
            debug!(path = %self.path, "discarding reload of a superseded query");
        }
        if let Some(restart) = Self::guard_drift(&mut state, &ticket) {
            drop(state);
            self.run_fetch(restart).await;
        }
    }

    /// Replace the accumulated items wholesale.
    ///
    /// Bucket, cursor and `has_next` are untouched; this exists for local
    /// optimistic mutation after an in-place edit, without a round-trip.
    pub async fn update_items(&self, items: Vec<T>) {
        let mut state = self.state.lock().await;
        state.items = items;
    }

    /// Whether the server reported a further page.
    pub async fn has_next(&self) -> bool {
        self.state.lock().await.has_next
    }

    /// Whether a request is outstanding.
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.is_loading
    }

    /// Server-reported total element count, once known.
    pub async fn total_count(&self) -> Option<u64> {
        self.state.lock().await.total_count
    }

    /// Number of items accumulated so far.
    pub async fn len(&self) -> usize {
        self.state.lock().await.items.len()
    }

    /// Whether nothing has been accumulated.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Run a page fetch and any fetches it chains into (load-all advances,
    /// drift restarts).
    async fn run_fetch(&self, ticket: Ticket) {
        let mut next = Some(ticket);
        while let Some(ticket) = next {
            next = self.fetch_once(ticket).await;
        }
    }

    /// The single-page fetch: issue, validate, apply or discard.
    async fn fetch_once(&self, ticket: Ticket) -> Option<Ticket> {
        {
            // The query may have moved on between scheduling and execution.
            let mut state = self.state.lock().await;
            if state.same_bucket(&ticket) {
                state.is_loading = true;
            }
        }

        debug!(path = %self.path, page = ticket.page, "fetching page");
        let outcome = self
            .source
            .fetch_page(&self.path, &ticket.params, ticket.page)
            .await;

        let mut state = self.state.lock().await;
        let mut chained = None;
        match outcome {
            Ok(page) if state.matches(&ticket) => {
                state.has_next = page.has_next();
                state.total_count = Some(page.count);
                state.items.extend(page.results);
                state.is_loading = false;
                state.last_error = None;
                if state.load_all_requested {
                    if state.has_next {
                        state.page += 1;
                        state.has_next = false;
                        chained = state.ticket(state.page);
                    } else {
                        state.load_all_requested = false;
                    }
                }
            }
            Ok(_) => {
                debug!(
                    path = %self.path,
                    page = ticket.page,
                    "discarding response of a superseded query"
                );
            }
            Err(err) => {
                if state.same_bucket(&ticket) {
                    warn!(
                        path = %self.path,
                        page = ticket.page,
                        error = %err,
                        "page fetch failed; keeping previously accumulated items"
                    );
                    state.is_loading = false;
                    state.load_all_requested = false;
                    state.last_error = Some(Arc::new(err));
                } else {
                    debug!(
                        path = %self.path,
                        page = ticket.page,
                        "discarding failure of a superseded query"
                    );
                }
            }
        }

        chained.or_else(|| Self::guard_drift(&mut state, &ticket))
    }

    /// Mid-flight-change guard: a bucket that changed while the generation
    /// was never regenerated means no reset has run for the change. Reset
    /// now and restart the live query from page 1.
    ///
    /// When the change went through [`configure`](Self::configure) or
    /// [`reload`](Self::reload) the generation differs and the guard stays
    /// quiet; resetting again would throw away items the successor query has
    /// legitimately accumulated.
    fn guard_drift(state: &mut FetchState<T>, ticket: &Ticket) -> Option<Ticket> {
        if state.generation != ticket.generation || state.same_bucket(ticket) {
            return None;
        }
        let bucket = state.bucket.clone()?;
        warn!(bucket = %bucket, "query changed mid-flight without a reset; restarting it");
        let params = state.params.clone();
        state.reset(bucket, params);
        state.ticket(1)
    }
}

impl<T: Send + Clone, S: PageSource<T>> Paginator<T, S> {
    /// Copy the observable state out.
    pub async fn snapshot(&self) -> FetchSnapshot<T> {
        let state = self.state.lock().await;
        FetchSnapshot {
            items: state.items.clone(),
            page: state.page,
            has_next: state.has_next,
            is_loading: state.is_loading,
            total_count: state.total_count,
            last_error: state.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket_for(state: &FetchState<u32>, page: u32) -> Ticket {
        state.ticket(page).unwrap()
    }

    #[test]
    fn test_reset_starts_a_fresh_epoch() {
        let mut state: FetchState<u32> = FetchState::new();
        let bucket = QueryKey::derive("trips/", &QueryParams::new().with("text", "abc"));
        state.reset(bucket.clone(), QueryParams::new().with("text", "abc"));
        state.items.extend([1, 2, 3]);
        state.page = 3;
        state.has_next = true;
        let old_generation = state.generation;

        state.reset(bucket, QueryParams::new().with("text", "abc"));

        assert!(state.items.is_empty());
        assert_eq!(state.page, 1);
        assert!(!state.has_next);
        assert!(state.is_loading);
        assert_ne!(state.generation, old_generation);
    }

    #[test]
    fn test_ticket_validation_rejects_other_epochs() {
        let mut state: FetchState<u32> = FetchState::new();
        let params = QueryParams::new().with("text", "abc");
        let bucket = QueryKey::derive("trips/", &params);
        state.reset(bucket.clone(), params.clone());

        let stale = ticket_for(&state, 1);
        state.reset(bucket, params);

        assert!(!state.matches(&stale));
        assert!(state.same_bucket(&stale));
        assert!(state.matches(&ticket_for(&state, 1)));
    }

    #[test]
    fn test_drift_guard_only_fires_without_a_reset() {
        let mut state: FetchState<u32> = FetchState::new();
        let params_a = QueryParams::new().with("text", "a");
        let bucket_a = QueryKey::derive("trips/", &params_a);
        state.reset(bucket_a, params_a);
        let ticket = ticket_for(&state, 1);

        // A proper reset to another bucket regenerates the generation: quiet.
        let params_b = QueryParams::new().with("text", "b");
        state.reset(QueryKey::derive("trips/", &params_b), params_b.clone());
        assert!(Paginator::<u32, NoSource>::guard_drift(&mut state, &ticket).is_none());

        // A bucket swap that kept the generation is exactly the race the
        // guard exists for: it must reset and hand back a page-1 ticket.
        let drifted = ticket_for(&state, 2);
        state.bucket = Some(QueryKey::derive("trips/", &QueryParams::new().with("text", "c")));
        let restart = Paginator::<u32, NoSource>::guard_drift(&mut state, &drifted);
        let restart = restart.unwrap();
        assert_eq!(restart.page, 1);
        assert!(state.items.is_empty());
        assert_ne!(restart.generation, drifted.generation);
    }

    struct NoSource;

    #[async_trait]
    impl PageSource<u32> for NoSource {
        async fn fetch_page(
            &self,
            _path: &str,
            _params: &QueryParams,
            _page: u32,
        ) -> SdkResult<Page<u32>> {
            Err(SdkError::Unknown("no source".to_string()))
        }
    }
}

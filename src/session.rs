use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::booking::{self, BookingPayload};
use crate::error::WayfareError;
use crate::filter::{self, FilterCriteria};
use crate::itinerary::{self, Itinerary};
use crate::model::LegRecord;
use crate::query::SearchRequest;
use crate::selection::{SelectionTracker, TripType};
use crate::sort::{self, SortCriteria};

/// Which side applies the maximum-layover limit. Only one of them does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoverPolicy {
    /// Sent to the service as `maxLayover`; listings are not re-checked.
    #[default]
    Server,
    /// Kept out of the request and enforced by the listing filter.
    Client,
}

/// Everything one search screen knows: the query, filter and sort choices,
/// the latest results and the trip being assembled.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchSession {
    request: Option<SearchRequest>,
    filters: FilterCriteria,
    sort: SortCriteria,
    layover_policy: LayoverPolicy,
    outbound_results: Vec<Itinerary>,
    return_results: Vec<Itinerary>,
    selection: SelectionTracker,
    generation: u64,
    last_error: Option<String>,
}

impl SearchSession {
    pub fn new(trip_type: TripType, layover_policy: LayoverPolicy) -> Self {
        Self {
            selection: SelectionTracker::new(trip_type),
            layover_policy,
            ..Default::default()
        }
    }

    /// Starts a new search and returns its generation. Filters go back to
    /// their defaults, previous results and selections are dropped.
    pub fn begin_search(&mut self, request: SearchRequest) -> u64 {
        self.generation += 1;
        self.filters = FilterCriteria::default();
        if self.layover_policy == LayoverPolicy::Client {
            self.filters.max_layover_minutes = request.max_layover;
        }
        self.selection.clear();
        self.outbound_results.clear();
        self.return_results.clear();
        self.last_error = None;
        self.request = Some(request);
        debug!(generation = self.generation, "search started");
        self.generation
    }

    /// The request to send upstream, with `maxLayover` only when the service
    /// is the side applying it.
    pub fn upstream_request(&self) -> Option<SearchRequest> {
        let mut request = self.request.clone()?;
        if self.layover_policy == LayoverPolicy::Client {
            request.max_layover = None;
        }
        Some(request)
    }

    /// Replaces the result set wholesale. Whichever response arrives last
    /// wins, even one from an older search.
    pub fn apply_results(
        &mut self,
        generation: u64,
        outbound: Vec<Vec<LegRecord>>,
        returns: Vec<Vec<LegRecord>>,
    ) {
        if generation != self.generation {
            warn!(
                generation,
                current = self.generation,
                "applying results from an earlier search"
            );
        }
        self.outbound_results = itinerary::build(outbound);
        self.return_results = itinerary::build(returns);
        self.last_error = None;
    }

    /// Keeps the previous results and remembers the message to show.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> Option<&SearchRequest> {
        self.request.as_ref()
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterCriteria) {
        self.filters = filters;
    }

    pub fn sort_criteria(&self) -> SortCriteria {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortCriteria) {
        self.sort = sort;
    }

    pub fn trip_type(&self) -> TripType {
        self.selection.trip_type()
    }

    pub fn set_trip_type(&mut self, trip_type: TripType) {
        self.selection.set_trip_type(trip_type);
    }

    pub fn outbound_results(&self) -> &[Itinerary] {
        &self.outbound_results
    }

    pub fn return_results(&self) -> &[Itinerary] {
        &self.return_results
    }

    fn visible(&self, itineraries: &[Itinerary]) -> Vec<Itinerary> {
        let mut criteria = self.filters.clone();
        if self.layover_policy == LayoverPolicy::Server {
            criteria.max_layover_minutes = None;
        }
        sort::sort(&filter::filter(itineraries, &criteria), self.sort)
    }

    pub fn visible_outbound(&self) -> Vec<Itinerary> {
        self.visible(&self.outbound_results)
    }

    pub fn visible_return(&self) -> Vec<Itinerary> {
        self.visible(&self.return_results)
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionTracker {
        &mut self.selection
    }

    /// Round trips can be booked once both directions are chosen, one-way
    /// trips once the outbound is.
    pub fn ready_to_book(&self) -> bool {
        self.selection.is_complete()
    }

    pub fn booking_payload(&self) -> Result<BookingPayload, WayfareError> {
        booking::assemble(self.selection.current())
    }
}

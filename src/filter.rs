use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::carrier::Carrier;
use crate::itinerary::Itinerary;

/// User-selected listing filters. `None` disables the stop or layover
/// predicate; an empty airline set disables the airline predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub selected_airlines: BTreeSet<Carrier>,
    pub max_stops: Option<u32>,
    pub max_layover_minutes: Option<u32>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            selected_airlines: Carrier::all_selectable(),
            max_stops: None,
            max_layover_minutes: None,
        }
    }
}

impl FilterCriteria {
    pub fn matches(&self, itinerary: &Itinerary) -> bool {
        self.airlines_match(itinerary)
            && self.stops_match(itinerary)
            && self.layovers_match(itinerary)
    }

    // Every leg must be flown by a selected carrier; mixed itineraries need
    // all of their carriers selected.
    fn airlines_match(&self, itinerary: &Itinerary) -> bool {
        if self.selected_airlines.is_empty() {
            return true;
        }
        itinerary
            .carriers()
            .iter()
            .all(|c| *c != Carrier::Unknown && self.selected_airlines.contains(c))
    }

    fn stops_match(&self, itinerary: &Itinerary) -> bool {
        self.max_stops.is_none_or(|max| itinerary.stop_count() <= max)
    }

    fn layovers_match(&self, itinerary: &Itinerary) -> bool {
        match self.max_layover_minutes {
            Some(max) => itinerary.layovers().iter().all(|l| l.minutes <= max),
            None => true,
        }
    }
}

pub fn filter(itineraries: &[Itinerary], criteria: &FilterCriteria) -> Vec<Itinerary> {
    itineraries
        .iter()
        .filter(|it| criteria.matches(it))
        .cloned()
        .collect()
}

use serde::{Deserialize, Serialize};

use crate::error::WayfareError;
use crate::itinerary::Itinerary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortCriteria {
    #[default]
    TotalDuration,
    DepartureTime,
    /// Orders by the arrival of the first leg, not the final one.
    ArrivalTime,
}

impl SortCriteria {
    pub fn from_str_loose(s: &str) -> Result<Self, WayfareError> {
        match s {
            "duration" | "total-duration" => Ok(Self::TotalDuration),
            "departure" | "departure-time" => Ok(Self::DepartureTime),
            "arrival" | "arrival-time" => Ok(Self::ArrivalTime),
            _ => Err(WayfareError::Validation(format!(
                "invalid sort: {s} (expected duration, departure or arrival)"
            ))),
        }
    }
}

/// Returns a sorted copy. The sort is stable, so ties keep their listing
/// order. Itineraries without legs go last on the time-based orders.
pub fn sort(itineraries: &[Itinerary], criteria: SortCriteria) -> Vec<Itinerary> {
    let mut sorted = itineraries.to_vec();
    match criteria {
        SortCriteria::TotalDuration => sorted.sort_by_key(|it| it.total_duration_minutes()),
        SortCriteria::DepartureTime => {
            sorted.sort_by_key(|it| (it.first_departure().is_none(), it.first_departure()))
        }
        SortCriteria::ArrivalTime => {
            sorted.sort_by_key(|it| (it.first_leg_arrival().is_none(), it.first_leg_arrival()))
        }
    }
    sorted
}

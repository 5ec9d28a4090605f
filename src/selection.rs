use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::WayfareError;
use crate::itinerary::Itinerary;
use crate::model::wall_clock;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripType {
    #[default]
    OneWay,
    RoundTrip,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripSelection {
    pub outbound: Option<Itinerary>,
    #[serde(rename = "return")]
    pub return_trip: Option<Itinerary>,
}

/// Holds the chosen outbound and return itineraries. It does not check that
/// the return flies back to the outbound's origin.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectionTracker {
    trip_type: TripType,
    selection: TripSelection,
}

impl SelectionTracker {
    pub fn new(trip_type: TripType) -> Self {
        Self {
            trip_type,
            selection: TripSelection::default(),
        }
    }

    pub fn trip_type(&self) -> TripType {
        self.trip_type
    }

    pub fn select_outbound(&mut self, itinerary: Itinerary) {
        self.selection.outbound = Some(itinerary);
    }

    pub fn select_return(&mut self, itinerary: Itinerary) -> Result<(), WayfareError> {
        if self.trip_type == TripType::OneWay {
            return Err(WayfareError::Validation(
                "a return flight can only be selected for a round trip".into(),
            ));
        }
        self.selection.return_trip = Some(itinerary);
        Ok(())
    }

    /// Switching to one-way drops the return selection for good.
    pub fn set_trip_type(&mut self, trip_type: TripType) {
        if self.trip_type == TripType::RoundTrip && trip_type == TripType::OneWay {
            self.clear_return();
        }
        self.trip_type = trip_type;
    }

    pub fn clear_return(&mut self) {
        self.selection.return_trip = None;
    }

    pub fn clear(&mut self) {
        self.selection = TripSelection::default();
    }

    pub fn current(&self) -> &TripSelection {
        &self.selection
    }

    pub fn is_complete(&self) -> bool {
        match self.trip_type {
            TripType::OneWay => self.selection.outbound.is_some(),
            TripType::RoundTrip => {
                self.selection.outbound.is_some() && self.selection.return_trip.is_some()
            }
        }
    }

    pub fn outbound_summary(&self) -> Option<TripSummary> {
        self.selection.outbound.as_ref().and_then(TripSummary::of)
    }

    pub fn return_summary(&self) -> Option<TripSummary> {
        self.selection.return_trip.as_ref().and_then(TripSummary::of)
    }
}

/// Endpoints of a selected itinerary, as shown in the round-trip cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub from: String,
    pub to: String,
    #[serde(with = "wall_clock")]
    pub depart_date_time: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub arrive_date_time: NaiveDateTime,
    pub flight_number: String,
}

impl TripSummary {
    pub fn of(itinerary: &Itinerary) -> Option<Self> {
        let first = itinerary.legs().first()?;
        let last = itinerary.legs().last()?;
        Some(Self {
            from: first.depart_airport.clone(),
            to: last.arrive_airport.clone(),
            depart_date_time: first.depart_date_time,
            arrive_date_time: last.arrive_date_time,
            flight_number: first.flight_number.clone(),
        })
    }
}

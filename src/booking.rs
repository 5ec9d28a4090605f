use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::WayfareError;
use crate::model::{BookingRecord, LegRecord};
use crate::selection::TripSelection;

/// Request body of the booking-creation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub departures: Vec<LegRecord>,
    #[serde(default)]
    pub returns: Vec<LegRecord>,
}

/// Copies the selected legs into a payload, in flown order and with every
/// field the service sent. Sending it is up to the caller.
///
/// An itinerary without legs is listed but never bookable.
pub fn assemble(selection: &TripSelection) -> Result<BookingPayload, WayfareError> {
    let outbound = selection
        .outbound
        .as_ref()
        .filter(|it| !it.is_degenerate())
        .ok_or(WayfareError::IncompleteSelection)?;

    let returns = match selection.return_trip {
        Some(ref it) if it.is_degenerate() => return Err(WayfareError::IncompleteSelection),
        Some(ref it) => it.legs().to_vec(),
        None => Vec::new(),
    };

    Ok(BookingPayload {
        departures: outbound.legs().to_vec(),
        returns,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingHistory {
    pub upcoming: Vec<BookingRecord>,
    pub past: Vec<BookingRecord>,
}

/// Splits bookings around `now`: upcoming soonest first, past most recent
/// first. A booking departing exactly at `now` counts as past.
pub fn partition_bookings(records: Vec<BookingRecord>, now: NaiveDateTime) -> BookingHistory {
    let (mut upcoming, mut past): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|b| b.departure_date_time > now);

    upcoming.sort_by_key(|b| b.departure_date_time);
    past.sort_by(|a, b| b.departure_date_time.cmp(&a.departure_date_time));

    BookingHistory { upcoming, past }
}

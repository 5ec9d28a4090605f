use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::warn;

use crate::carrier::{classify_carrier, Carrier, CarrierMix};
use crate::model::{LayoverInterval, LegRecord};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Minutes between two wall-clock times. An arrival earlier than the
/// departure is read as crossing midnight.
pub fn span_minutes(depart: NaiveDateTime, arrive: NaiveDateTime) -> u32 {
    let depart_ms = depart.and_utc().timestamp_millis();
    let mut arrive_ms = arrive.and_utc().timestamp_millis();
    if arrive_ms < depart_ms {
        arrive_ms += DAY_MS;
    }
    ((arrive_ms - depart_ms).max(0) / 60_000) as u32
}

pub fn leg_duration_minutes(leg: &LegRecord) -> u32 {
    span_minutes(leg.depart_date_time, leg.arrive_date_time)
}

/// One directional trip: a single leg or a chain of connecting legs, with
/// the fields derived from them at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    legs: Vec<LegRecord>,
    total_duration_minutes: u32,
    stop_count: u32,
    route_summary: Vec<String>,
}

impl Itinerary {
    pub fn from_legs(legs: Vec<LegRecord>) -> Self {
        let (first, last) = match (legs.first(), legs.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                warn!("empty leg group in search response, listing it without derived fields");
                return Self {
                    legs,
                    total_duration_minutes: 0,
                    stop_count: 0,
                    route_summary: Vec::new(),
                };
            }
        };

        let total_duration_minutes = span_minutes(first.depart_date_time, last.arrive_date_time);
        let route_summary = legs
            .iter()
            .map(|leg| leg.depart_code().to_string())
            .chain(std::iter::once(last.arrive_code().to_string()))
            .collect();

        Self {
            stop_count: (legs.len() - 1) as u32,
            total_duration_minutes,
            route_summary,
            legs,
        }
    }

    pub fn legs(&self) -> &[LegRecord] {
        &self.legs
    }

    pub fn total_duration_minutes(&self) -> u32 {
        self.total_duration_minutes
    }

    pub fn stop_count(&self) -> u32 {
        self.stop_count
    }

    pub fn route_summary(&self) -> &[String] {
        &self.route_summary
    }

    pub fn route_string(&self) -> String {
        self.route_summary.join(" → ")
    }

    pub fn is_degenerate(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn first_departure(&self) -> Option<NaiveDateTime> {
        self.legs.first().map(|l| l.depart_date_time)
    }

    pub fn first_leg_arrival(&self) -> Option<NaiveDateTime> {
        self.legs.first().map(|l| l.arrive_date_time)
    }

    pub fn last_arrival(&self) -> Option<NaiveDateTime> {
        self.legs.last().map(|l| l.arrive_date_time)
    }

    pub fn layovers(&self) -> Vec<LayoverInterval> {
        self.legs
            .windows(2)
            .map(|pair| LayoverInterval {
                airport: pair[0].arrive_code().to_string(),
                minutes: span_minutes(pair[0].arrive_date_time, pair[1].depart_date_time),
            })
            .collect()
    }

    pub fn carriers(&self) -> Vec<Carrier> {
        self.legs
            .iter()
            .map(|l| classify_carrier(&l.flight_number))
            .collect()
    }

    pub fn carrier_mix(&self) -> CarrierMix {
        CarrierMix::of(self.flight_numbers())
    }

    pub fn flight_numbers(&self) -> Vec<&str> {
        self.legs.iter().map(|l| l.flight_number.as_str()).collect()
    }
}

pub fn build(groups: Vec<Vec<LegRecord>>) -> Vec<Itinerary> {
    groups.into_iter().map(Itinerary::from_legs).collect()
}

pub fn format_duration(minutes: u32) -> String {
    format!("{} hr {} min", minutes / 60, minutes % 60)
}

pub fn stops_label(stop_count: u32) -> String {
    match stop_count {
        0 => "Nonstop".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{n} stops"),
    }
}

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::itinerary::{format_duration, leg_duration_minutes, stops_label, Itinerary};
use crate::model::BookingRecord;
use crate::selection::TripSummary;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

// One line per leg with its own flight time.
fn flights(itinerary: &Itinerary) -> String {
    itinerary
        .legs()
        .iter()
        .map(|leg| format!("{} {}", leg.flight_number, format_duration(leg_duration_minutes(leg))))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render(itineraries: &[Itinerary]) -> String {
    let mut table = new_table(vec![
        "#", "Airlines", "Route", "Depart", "Arrive", "Duration", "Stops", "Flights",
    ]);

    for (i, itinerary) in itineraries.iter().enumerate() {
        let (route, depart, arrive, duration, stops) = if itinerary.is_degenerate() {
            let dash = "—".to_string();
            (dash.clone(), dash.clone(), dash.clone(), dash.clone(), dash)
        } else {
            let layovers: Vec<String> = itinerary
                .layovers()
                .iter()
                .map(|l| format!("{} {}", l.airport, format_duration(l.minutes)))
                .collect();
            let stops = if layovers.is_empty() {
                stops_label(itinerary.stop_count())
            } else {
                format!("{}\n{}", stops_label(itinerary.stop_count()), layovers.join("\n"))
            };
            (
                itinerary.route_string(),
                itinerary
                    .first_departure()
                    .map(|t| t.format(TIME_FORMAT).to_string())
                    .unwrap_or_default(),
                itinerary
                    .last_arrival()
                    .map(|t| t.format(TIME_FORMAT).to_string())
                    .unwrap_or_default(),
                format_duration(itinerary.total_duration_minutes()),
                stops,
            )
        };

        table.add_row(vec![
            (i + 1).to_string(),
            itinerary.carrier_mix().label().to_string(),
            route,
            depart,
            arrive,
            duration,
            stops,
            flights(itinerary),
        ]);
    }

    table.to_string()
}

pub fn render_summary(outbound: Option<&TripSummary>, ret: Option<&TripSummary>) -> String {
    let mut table = new_table(vec!["", "From", "To", "Departure", "Arrival", "Flight Number"]);

    for (label, summary) in [("Origin Flight", outbound), ("Return Flight", ret)] {
        if let Some(s) = summary {
            table.add_row(vec![
                label.to_string(),
                s.from.clone(),
                s.to.clone(),
                s.depart_date_time.format(TIME_FORMAT).to_string(),
                s.arrive_date_time.format(TIME_FORMAT).to_string(),
                s.flight_number.clone(),
            ]);
        }
    }

    table.to_string()
}

pub fn render_bookings(bookings: &[BookingRecord]) -> String {
    let mut table = new_table(vec!["Flight", "Status", "Departure", "Arrival"]);

    for b in bookings {
        table.add_row(vec![
            b.flight_number.clone(),
            b.status.clone(),
            format!(
                "{}\n{}",
                b.departure_airport,
                b.departure_date_time.format(TIME_FORMAT)
            ),
            format!(
                "{}\n{}",
                b.arrival_airport,
                b.arrival_date_time.format(TIME_FORMAT)
            ),
        ]);
    }

    table.to_string()
}

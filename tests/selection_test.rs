use chrono::NaiveDateTime;
use wayfare::itinerary::Itinerary;
use wayfare::model::{parse_wall_clock, LegRecord};
use wayfare::selection::{SelectionTracker, TripSummary, TripType};

fn at(s: &str) -> NaiveDateTime {
    parse_wall_clock(s).unwrap()
}

fn leg(number: &str, from: &str, to: &str, depart: &str, arrive: &str) -> LegRecord {
    LegRecord::new(number, from, to, at(depart), at(arrive))
}

fn trip(number: &str, from: &str, to: &str) -> Itinerary {
    Itinerary::from_legs(vec![LegRecord::new(
        number,
        from,
        to,
        at("2026-03-01T08:00"),
        at("2026-03-01T10:00"),
    )])
}

#[test]
fn toggling_to_one_way_clears_return_for_good() {
    let mut tracker = SelectionTracker::new(TripType::RoundTrip);
    tracker.select_outbound(trip("DL1", "Boston (BOS)", "Chicago (ORD)"));
    tracker
        .select_return(trip("DL2", "Chicago (ORD)", "Boston (BOS)"))
        .unwrap();

    tracker.set_trip_type(TripType::OneWay);
    assert!(tracker.current().return_trip.is_none());
    assert!(tracker.current().outbound.is_some());

    tracker.set_trip_type(TripType::RoundTrip);
    assert!(tracker.current().return_trip.is_none());
}

#[test]
fn new_outbound_replaces_old_and_keeps_return() {
    let mut tracker = SelectionTracker::new(TripType::RoundTrip);
    tracker.select_outbound(trip("DL1", "Boston (BOS)", "Chicago (ORD)"));
    tracker
        .select_return(trip("WN9", "Chicago (ORD)", "Boston (BOS)"))
        .unwrap();
    tracker.select_outbound(trip("WN4", "Boston (BOS)", "Chicago (MDW)"));

    let current = tracker.current();
    assert_eq!(
        current.outbound.as_ref().unwrap().legs()[0].flight_number,
        "WN4"
    );
    assert_eq!(
        current.return_trip.as_ref().unwrap().legs()[0].flight_number,
        "WN9"
    );
}

#[test]
fn one_way_rejects_return_selection() {
    let mut tracker = SelectionTracker::new(TripType::OneWay);
    let result = tracker.select_return(trip("DL2", "Chicago (ORD)", "Boston (BOS)"));
    assert!(result.is_err());
    assert!(tracker.current().return_trip.is_none());
}

#[test]
fn return_need_not_mirror_outbound() {
    let mut tracker = SelectionTracker::new(TripType::RoundTrip);
    tracker.select_outbound(trip("DL1", "Boston (BOS)", "Chicago (ORD)"));
    assert!(tracker
        .select_return(trip("DL2", "Denver (DEN)", "Miami (MIA)"))
        .is_ok());
    assert!(tracker.is_complete());
}

#[test]
fn clear_empties_both_slots() {
    let mut tracker = SelectionTracker::new(TripType::RoundTrip);
    tracker.select_outbound(trip("DL1", "Boston (BOS)", "Chicago (ORD)"));
    tracker
        .select_return(trip("DL2", "Chicago (ORD)", "Boston (BOS)"))
        .unwrap();
    tracker.clear();
    assert!(tracker.current().outbound.is_none());
    assert!(tracker.current().return_trip.is_none());
    assert_eq!(tracker.trip_type(), TripType::RoundTrip);
}

#[test]
fn completeness_depends_on_trip_type() {
    let mut one_way = SelectionTracker::new(TripType::OneWay);
    assert!(!one_way.is_complete());
    one_way.select_outbound(trip("DL1", "Boston (BOS)", "Chicago (ORD)"));
    assert!(one_way.is_complete());

    let mut round = SelectionTracker::new(TripType::RoundTrip);
    round.select_outbound(trip("DL1", "Boston (BOS)", "Chicago (ORD)"));
    assert!(!round.is_complete());
}

#[test]
fn summary_uses_first_and_last_legs() {
    let it = Itinerary::from_legs(vec![
        leg("DL1", "Boston (BOS)", "Atlanta (ATL)", "2026-03-01T06:00", "2026-03-01T08:00"),
        leg("DL2", "Atlanta (ATL)", "Chicago (ORD)", "2026-03-01T09:00", "2026-03-01T10:30"),
    ]);
    let summary = TripSummary::of(&it).unwrap();
    assert_eq!(summary.from, "Boston (BOS)");
    assert_eq!(summary.to, "Chicago (ORD)");
    assert_eq!(summary.depart_date_time, at("2026-03-01T06:00"));
    assert_eq!(summary.arrive_date_time, at("2026-03-01T10:30"));
    assert_eq!(summary.flight_number, "DL1");

    assert!(TripSummary::of(&Itinerary::from_legs(Vec::new())).is_none());
}

#[test]
fn selection_serializes_return_slot_as_return() {
    let tracker = SelectionTracker::new(TripType::RoundTrip);
    let json = serde_json::to_value(tracker.current()).unwrap();
    assert!(json.get("return").is_some());
    assert!(json["outbound"].is_null());
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const WALL_CLOCK_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a timezone-naive timestamp as sent by the booking service.
/// Seconds are optional.
pub fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    WALL_CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

pub(crate) mod wall_clock {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_wall_clock(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp \"{raw}\"")))
    }
}

/// Returns the IATA code embedded in a location string such as
/// `"Boston (BOS)"`. Text without parentheses is returned trimmed.
pub fn airport_code(location: &str) -> &str {
    match location.split_once('(') {
        Some((_, rest)) => rest.split(')').next().unwrap_or(rest).trim(),
        None => location.trim(),
    }
}

/// One nonstop flight segment. Fields the core does not interpret are kept
/// in `extra` so they travel back to the booking service untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegRecord {
    pub flight_number: String,
    pub depart_airport: String,
    pub arrive_airport: String,
    #[serde(with = "wall_clock")]
    pub depart_date_time: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub arrive_date_time: NaiveDateTime,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LegRecord {
    pub fn new(
        flight_number: &str,
        depart_airport: &str,
        arrive_airport: &str,
        depart_date_time: NaiveDateTime,
        arrive_date_time: NaiveDateTime,
    ) -> Self {
        Self {
            flight_number: flight_number.to_string(),
            depart_airport: depart_airport.to_string(),
            arrive_airport: arrive_airport.to_string(),
            depart_date_time,
            arrive_date_time,
            extra: Map::new(),
        }
    }

    pub fn depart_code(&self) -> &str {
        airport_code(&self.depart_airport)
    }

    pub fn arrive_code(&self) -> &str {
        airport_code(&self.arrive_airport)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub city_name: String,
    pub iata_code: String,
}

impl Location {
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.city_name, self.iata_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoverInterval {
    pub airport: String,
    pub minutes: u32,
}

/// A booking as listed by the booking service for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub departure_airport: String,
    #[serde(default)]
    pub arrival_airport: String,
    #[serde(with = "wall_clock")]
    pub departure_date_time: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub arrival_date_time: NaiveDateTime,
    #[serde(default)]
    pub status: String,
}

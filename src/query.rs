use chrono::NaiveDate;
use serde::Serialize;

use crate::error::WayfareError;
use crate::model::airport_code;

/// Parameters of one flight search. Airports may be given as a bare IATA
/// code or as a location string such as `"Boston (BOS)"`; they are sent to
/// the service as typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub depart_airport: String,
    pub arrive_airport: String,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub max_layover: Option<u32>,
}

fn validate_airport(input: &str) -> Result<(), WayfareError> {
    let code = airport_code(input);
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(WayfareError::InvalidAirport(input.to_string()));
    }
    Ok(())
}

fn parse_date(date: &str) -> Result<NaiveDate, WayfareError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| WayfareError::InvalidDate(date.to_string()))
}

impl SearchRequest {
    pub fn new(depart_airport: &str, arrive_airport: &str) -> Self {
        Self {
            depart_airport: depart_airport.trim().to_string(),
            arrive_airport: arrive_airport.trim().to_string(),
            departure_date: None,
            return_date: None,
            max_layover: None,
        }
    }

    pub fn validate(&self) -> Result<(), WayfareError> {
        validate_airport(&self.depart_airport)?;
        validate_airport(&self.arrive_airport)?;

        if airport_code(&self.depart_airport) == airport_code(&self.arrive_airport) {
            return Err(WayfareError::Validation(
                "origin and destination must differ".into(),
            ));
        }

        let departure = self.departure_date.as_deref().map(parse_date).transpose()?;
        let ret = self.return_date.as_deref().map(parse_date).transpose()?;

        if let (Some(departure), Some(ret)) = (departure, ret) {
            if ret < departure {
                return Err(WayfareError::Validation(format!(
                    "return date {ret} is before departure date {departure}"
                )));
            }
        }

        Ok(())
    }

    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }

    pub fn to_url_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("departAirport".to_string(), self.depart_airport.clone()),
            ("arriveAirport".to_string(), self.arrive_airport.clone()),
        ];

        if let Some(ref date) = self.departure_date {
            params.push(("departureDate".to_string(), date.clone()));
        }
        if let Some(minutes) = self.max_layover {
            params.push(("maxLayover".to_string(), minutes.to_string()));
        }

        params
    }

    /// The return-direction search of a round trip: airports swapped and the
    /// return date used as the departure date.
    pub fn reversed(&self) -> Self {
        Self {
            depart_airport: self.arrive_airport.clone(),
            arrive_airport: self.depart_airport.clone(),
            departure_date: self.return_date.clone(),
            return_date: None,
            max_layover: self.max_layover,
        }
    }
}

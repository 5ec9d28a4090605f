use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WayfareError;

/// Airlines the booking service sells, identified by flight-number prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Carrier {
    Delta,
    Southwest,
    Unknown,
}

impl Carrier {
    /// Carriers a user can filter on. `Unknown` is never selectable.
    pub const SELECTABLE: [Carrier; 2] = [Carrier::Delta, Carrier::Southwest];

    pub fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Delta => Some("DL"),
            Self::Southwest => Some("WN"),
            Self::Unknown => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Delta => "Delta",
            Self::Southwest => "Southwest",
            Self::Unknown => "Unknown",
        }
    }

    pub fn from_str_loose(s: &str) -> Result<Self, WayfareError> {
        let needle = s.trim();
        Self::SELECTABLE
            .into_iter()
            .find(|c| {
                c.name().eq_ignore_ascii_case(needle)
                    || c.prefix().is_some_and(|p| p.eq_ignore_ascii_case(needle))
            })
            .ok_or_else(|| {
                WayfareError::Validation(format!(
                    "unknown airline: {needle} (expected delta or southwest)"
                ))
            })
    }

    pub fn all_selectable() -> BTreeSet<Carrier> {
        Self::SELECTABLE.into_iter().collect()
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn classify_carrier(flight_number: &str) -> Carrier {
    let number = flight_number.trim();
    Carrier::SELECTABLE
        .into_iter()
        .find(|c| {
            c.prefix().is_some_and(|p| {
                number
                    .get(..p.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(p))
            })
        })
        .unwrap_or(Carrier::Unknown)
}

/// Which known carriers operate an itinerary's legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CarrierMix {
    Delta,
    Southwest,
    Both,
    None,
}

impl CarrierMix {
    pub fn of<'a>(flight_numbers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut delta = false;
        let mut southwest = false;
        for number in flight_numbers {
            match classify_carrier(number) {
                Carrier::Delta => delta = true,
                Carrier::Southwest => southwest = true,
                Carrier::Unknown => {}
            }
        }
        match (delta, southwest) {
            (true, true) => Self::Both,
            (true, false) => Self::Delta,
            (false, true) => Self::Southwest,
            (false, false) => Self::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Delta => "Delta",
            Self::Southwest => "Southwest",
            Self::Both => "Delta and Southwest",
            Self::None => "—",
        }
    }
}

/// Parses a comma-separated airline list such as `"delta,WN"`.
pub fn parse_airlines(list: &str) -> Result<BTreeSet<Carrier>, WayfareError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Carrier::from_str_loose)
        .collect()
}

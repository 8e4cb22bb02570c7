use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::PathStyle;
use crate::error::{validation_error, Error};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Car,
    Bike,
    #[default]
    Foot,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [TravelMode::Car, TravelMode::Bike, TravelMode::Foot];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Bike => "bike",
            Self::Foot => "foot",
        }
    }

    /// Routing profile understood by OSRM.
    pub fn profile(&self) -> &'static str {
        match self {
            Self::Car => "driving",
            Self::Bike => "cycling",
            Self::Foot => "foot",
        }
    }

    pub fn path_style(&self) -> PathStyle {
        match self {
            Self::Car => PathStyle::solid("#2563eb", 5.0),
            Self::Bike => PathStyle::solid("#16a34a", 4.0),
            Self::Foot => PathStyle::dashed("#ea580c", 4.0),
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TravelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" | "driving" => Ok(Self::Car),
            "bike" | "cycling" => Ok(Self::Bike),
            "foot" | "walking" => Ok(Self::Foot),
            other => Err(validation_error(format!("unknown travel mode {:?}", other))),
        }
    }
}

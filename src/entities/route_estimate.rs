use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{Coordinate, TravelMode};

/// One routed path for a single travel mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub duration_seconds: f64,
    pub path: Vec<Coordinate>,
}

/// Per-mode results of one planning run. Modes whose fetch failed are simply absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub destination: Option<Coordinate>,
    pub legs: BTreeMap<TravelMode, RouteLeg>,
}

impl RouteEstimate {
    pub fn new(destination: Coordinate) -> Self {
        Self {
            destination: Some(destination),
            legs: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, mode: TravelMode, leg: RouteLeg) {
        self.legs.insert(mode, leg);
    }

    pub fn leg(&self, mode: TravelMode) -> Option<&RouteLeg> {
        self.legs.get(&mode)
    }

    pub fn duration(&self, mode: TravelMode) -> Option<f64> {
        self.legs.get(&mode).map(|leg| leg.duration_seconds)
    }

    pub fn durations(&self) -> BTreeMap<TravelMode, f64> {
        self.legs
            .iter()
            .map(|(mode, leg)| (*mode, leg.duration_seconds))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

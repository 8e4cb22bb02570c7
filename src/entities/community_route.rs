use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Coordinate, MIN_DRAFT_POINTS};
use crate::error::{validation_error, Error};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommunityRoute {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub coordinates: Vec<Coordinate>,
    #[serde(default)]
    pub ratings: Vec<u8>,
}

impl CommunityRoute {
    pub fn new(name: String, description: String, coordinates: Vec<Coordinate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            coordinates,
            ratings: Vec::new(),
        }
    }

    pub fn add_rating(&mut self, rating: u8) -> Result<(), Error> {
        validate_rating(rating)?;
        self.ratings.push(rating);
        Ok(())
    }

    /// Checks the rules every stored route obeys: a name, at least two points and
    /// ratings within 1..=5.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(validation_error("route has no name"));
        }

        if self.coordinates.len() < MIN_DRAFT_POINTS {
            return Err(validation_error(format!(
                "route has {} points, needs at least {}",
                self.coordinates.len(),
                MIN_DRAFT_POINTS
            )));
        }

        self.ratings.iter().try_for_each(|rating| validate_rating(*rating))
    }

    /// Mean rating rounded to one decimal place.
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }

        let sum: u32 = self.ratings.iter().map(|r| u32::from(*r)).sum();
        let mean = f64::from(sum) / self.ratings.len() as f64;

        Some((mean * 10.0).round() / 10.0)
    }
}

pub fn validate_rating(rating: u8) -> Result<(), Error> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(validation_error(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }

    Ok(())
}

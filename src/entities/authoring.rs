use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::community_route::validate_rating;
use crate::entities::{CommunityRoute, Coordinate};
use crate::error::{invalid_state_error, validation_error, Error};

pub const MIN_DRAFT_POINTS: usize = 2;

/// Unsaved route the user is sketching on the map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthoringSession {
    pub coordinates: Vec<Coordinate>,
    pub name: String,
    pub description: String,
}

impl AuthoringSession {
    pub fn validate(&self) -> Result<(), Error> {
        if self.coordinates.len() < MIN_DRAFT_POINTS {
            return Err(validation_error(format!(
                "Add at least {} points to the route",
                MIN_DRAFT_POINTS
            )));
        }

        if self.name.trim().is_empty() {
            return Err(validation_error("Please enter a route name"));
        }

        Ok(())
    }

    fn to_route(&self) -> CommunityRoute {
        CommunityRoute::new(
            self.name.trim().to_string(),
            self.description.clone(),
            self.coordinates.clone(),
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Authoring {
    #[default]
    Idle,
    Drafting(AuthoringSession),
}

impl Authoring {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Drafting(_))
    }

    pub fn session(&self) -> Option<&AuthoringSession> {
        match self {
            Self::Drafting(session) => Some(session),
            Self::Idle => None,
        }
    }

    /// Enters drafting with an empty draft, discarding any earlier one.
    pub fn start(&mut self) {
        *self = Self::Drafting(AuthoringSession::default());
    }

    pub fn add_point(&mut self, coordinate: Coordinate) -> Result<&AuthoringSession, Error> {
        match self {
            Self::Drafting(session) => {
                session.coordinates.push(coordinate);
                Ok(session)
            }
            Self::Idle => Err(invalid_state_error()),
        }
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), Error> {
        match self {
            Self::Drafting(session) => {
                session.name = name.to_string();
                Ok(())
            }
            Self::Idle => Err(invalid_state_error()),
        }
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), Error> {
        match self {
            Self::Drafting(session) => {
                session.description = description.to_string();
                Ok(())
            }
            Self::Idle => Err(invalid_state_error()),
        }
    }

    /// Builds the route a successful save would produce. The state is left untouched;
    /// call [`Authoring::finish`] once the route has been persisted.
    pub fn prepare_save(&self) -> Result<CommunityRoute, Error> {
        match self {
            Self::Drafting(session) => {
                session.validate()?;
                Ok(session.to_route())
            }
            Self::Idle => Err(invalid_state_error()),
        }
    }

    pub fn finish(&mut self) {
        *self = Self::Idle;
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}

/// Transient star selection for one community route. `selection == 0` means nothing picked yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDraft {
    pub route_id: Uuid,
    pub selection: u8,
}

impl RatingDraft {
    pub fn new(route_id: Uuid) -> Self {
        Self {
            route_id,
            selection: 0,
        }
    }

    pub fn select(&mut self, value: u8) -> Result<(), Error> {
        if value != 0 {
            validate_rating(value)?;
        }
        self.selection = value;
        Ok(())
    }

    pub fn value(&self) -> Result<u8, Error> {
        if self.selection == 0 {
            return Err(validation_error("Select a rating before submitting"));
        }
        Ok(self.selection)
    }
}

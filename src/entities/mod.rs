mod authoring;
mod community_route;
mod coordinate;
mod map;
mod place;
mod position;
mod route_estimate;
mod travel_mode;

pub use authoring::{Authoring, AuthoringSession, RatingDraft, MIN_DRAFT_POINTS};
pub use community_route::{CommunityRoute, MAX_RATING, MIN_RATING};
pub use coordinate::Coordinate;
pub use map::{Layer, PathHandle, PathStyle};
pub use place::Place;
pub use position::UserPosition;
pub use route_estimate::{RouteEstimate, RouteLeg};
pub use travel_mode::TravelMode;

use geo_types::{coord, Rect};

use crate::entities::{CommunityRoute, Coordinate};

pub const DURATION_PLACEHOLDER: &str = "--";
pub const NO_RATINGS_LABEL: &str = "no ratings yet";

/// `"1h 2m"` from an hour of rounded minutes upwards, `"2 min"` below, `"--"` when absent.
pub fn format_duration(seconds: Option<f64>) -> String {
    let seconds = match seconds {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => return DURATION_PLACEHOLDER.into(),
    };

    let minutes = (seconds / 60.0).round() as u64;

    if minutes >= 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{} min", minutes)
    }
}

pub fn rating_label(route: &CommunityRoute) -> String {
    match route.average_rating() {
        Some(average) => format!("{:.1}", average),
        None => NO_RATINGS_LABEL.into(),
    }
}

/// Bounding box of a path, `None` for an empty one.
pub fn bounding_rect(coordinates: &[Coordinate]) -> Option<Rect<f64>> {
    let first = coordinates.first()?;

    let (mut min_x, mut min_y) = (first.longitude, first.latitude);
    let (mut max_x, mut max_y) = (min_x, min_y);

    for c in &coordinates[1..] {
        min_x = min_x.min(c.longitude);
        min_y = min_y.min(c.latitude);
        max_x = max_x.max(c.longitude);
        max_y = max_y.max(c.latitude);
    }

    Some(Rect::new(
        coord! { x: min_x, y: min_y },
        coord! { x: max_x, y: max_y },
    ))
}

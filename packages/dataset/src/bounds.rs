//! Geographic extent of the Lisbon district.

use geo::{Contains as _, Coord, Point, Rect};

/// Fallback map centre (latitude, longitude) for Lisbon.
pub const LISBON_CENTER: (f64, f64) = (38.7223, -9.1393);

/// Bounding rectangle of the Lisbon district in WGS84 (x = lon, y = lat).
#[must_use]
pub fn lisbon_bounds() -> Rect<f64> {
    Rect::new(Coord { x: -9.50, y: 38.40 }, Coord { x: -8.78, y: 39.10 })
}

/// Whether the coordinate lies inside [`lisbon_bounds`].
#[must_use]
pub fn within_lisbon(latitude: f64, longitude: f64) -> bool {
    lisbon_bounds().contains(&Point::new(longitude, latitude))
}

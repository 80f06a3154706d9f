use pq_directions::LngLat;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
	pub lat: f64,
	pub lng: f64,
}

impl Coordinates {
	pub fn new(lat: f64, lng: f64) -> Self {
		Self { lat, lng }
	}

	/// Coordinates the map can actually place: finite, in range, and not the
	/// `(0, 0)` placeholder the dataset uses for "unknown"
	pub fn is_valid(&self) -> bool {
		self.lat.is_finite()
			&& self.lng.is_finite()
			&& (-90.0..=90.0).contains(&self.lat)
			&& (-180.0..=180.0).contains(&self.lng)
			&& !(self.lat == 0.0 && self.lng == 0.0)
	}

	/// Key used for caching, stable to ~1 m
	pub fn cache_key(&self) -> (i64, i64) {
		(
			(self.lat * 1e5).round() as i64,
			(self.lng * 1e5).round() as i64,
		)
	}
}

impl From<Coordinates> for LngLat {
	fn from(c: Coordinates) -> Self {
		LngLat::new(c.lng, c.lat)
	}
}

impl From<LngLat> for Coordinates {
	fn from(p: LngLat) -> Self {
		Coordinates::new(p.lat, p.lng)
	}
}

/// Great-circle distance in kilometres
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
	let d_lat = (b.lat - a.lat).to_radians();
	let d_lng = (b.lng - a.lng).to_radians();

	let h = (d_lat / 2.0).sin().powi(2)
		+ a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

	2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

//! Saved walking routes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{geo::Coordinates, plaque::PlaqueId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
	pub plaque_id: PlaqueId,
	pub lat: f64,
	pub lng: f64,
	pub order: u32,
}

impl RoutePoint {
	pub fn coordinates(&self) -> Coordinates {
		Coordinates::new(self.lat, self.lng)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
	pub id: Uuid,
	pub user_id: String,
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	pub points: Vec<RoutePoint>,
	/// Kilometres
	pub total_distance: f64,
	/// Minutes
	#[serde(default)]
	pub total_duration: f64,
	/// Routes are never shared
	#[serde(default)]
	pub is_public: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Route {
	pub fn plaque_ids(&self) -> Vec<PlaqueId> {
		self.points.iter().map(|p| p.plaque_id).collect()
	}

	pub fn coordinates(&self) -> Vec<Coordinates> {
		self.points.iter().map(RoutePoint::coordinates).collect()
	}
}

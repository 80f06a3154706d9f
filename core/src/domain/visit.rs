use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::plaque::PlaqueId;

/// One logged sighting of a plaque. A user may log the same plaque many times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
	pub id: Uuid,
	pub plaque_id: PlaqueId,
	pub user_id: String,
	pub visited_at: DateTime<Utc>,
	#[serde(default)]
	pub notes: Option<String>,
	/// 1..=5
	#[serde(default)]
	pub rating: Option<u8>,
	#[serde(default)]
	pub photos: Vec<String>,
}

impl Visit {
	pub const MIN_RATING: u8 = 1;
	pub const MAX_RATING: u8 = 5;

	pub fn new(user_id: impl Into<String>, plaque_id: PlaqueId, visited_at: DateTime<Utc>) -> Self {
		Self {
			id: Uuid::new_v4(),
			plaque_id,
			user_id: user_id.into(),
			visited_at,
			notes: None,
			rating: None,
			photos: Vec::new(),
		}
	}

	pub fn is_valid_rating(rating: u8) -> bool {
		(Self::MIN_RATING..=Self::MAX_RATING).contains(&rating)
	}
}

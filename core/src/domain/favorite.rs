use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::plaque::PlaqueId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
	pub id: String,
	pub user_id: String,
	pub plaque_id: PlaqueId,
	pub created_at: DateTime<Utc>,
}

impl Favorite {
	pub fn new(user_id: impl Into<String>, plaque_id: PlaqueId) -> Self {
		let user_id = user_id.into();
		Self {
			id: Self::document_id(&user_id, plaque_id),
			user_id,
			plaque_id,
			created_at: Utc::now(),
		}
	}

	/// One document per (user, plaque) pair
	pub fn document_id(user_id: &str, plaque_id: PlaqueId) -> String {
		format!("{user_id}_{plaque_id}")
	}
}

//! Collections - user-curated, ordered groups of plaques

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::plaque::PlaqueId;

pub const MAX_NAME_LEN: usize = 100;
pub const DEFAULT_ICON: &str = "📚";
pub const DEFAULT_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
	pub id: Uuid,
	pub user_id: String,
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	pub icon: String,
	/// Hex format: #RRGGBB
	pub color: String,
	/// Ordered, never contains the same plaque twice
	#[serde(default)]
	pub plaques: Vec<PlaqueId>,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub is_public: bool,
	#[serde(default)]
	pub is_favorite: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionValidationError {
	#[error("collection name is required")]
	EmptyName,
	#[error("collection name must be at most {MAX_NAME_LEN} characters")]
	NameTooLong,
	#[error("invalid color '{0}', expected #RRGGBB")]
	InvalidColor(String),
}

impl Collection {
	pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			user_id: user_id.into(),
			name: name.into(),
			description: None,
			icon: DEFAULT_ICON.to_string(),
			color: DEFAULT_COLOR.to_string(),
			plaques: Vec::new(),
			tags: Vec::new(),
			is_public: false,
			is_favorite: false,
			created_at: now,
			updated_at: now,
		}
	}

	pub fn validate_name(name: &str) -> Result<(), CollectionValidationError> {
		let name = name.trim();
		if name.is_empty() {
			return Err(CollectionValidationError::EmptyName);
		}
		if name.chars().count() > MAX_NAME_LEN {
			return Err(CollectionValidationError::NameTooLong);
		}
		Ok(())
	}

	pub fn validate_color(color: &str) -> Result<(), CollectionValidationError> {
		let valid = color.len() == 7
			&& color.starts_with('#')
			&& color[1..].chars().all(|c| c.is_ascii_hexdigit());

		if valid {
			Ok(())
		} else {
			Err(CollectionValidationError::InvalidColor(color.to_string()))
		}
	}

	pub fn contains(&self, plaque_id: PlaqueId) -> bool {
		self.plaques.contains(&plaque_id)
	}

	/// Appends plaques not already present, returning how many were added
	pub fn add_plaques(&mut self, ids: impl IntoIterator<Item = PlaqueId>) -> usize {
		let before = self.plaques.len();
		for id in ids {
			if !self.plaques.contains(&id) {
				self.plaques.push(id);
			}
		}
		self.plaques.len() - before
	}

	/// Removes plaques, returning how many were removed
	pub fn remove_plaques(&mut self, ids: &[PlaqueId]) -> usize {
		let before = self.plaques.len();
		self.plaques.retain(|id| !ids.contains(id));
		before - self.plaques.len()
	}

	pub fn touch(&mut self) {
		self.updated_at = Utc::now();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_plaques_skips_duplicates() {
		let mut collection = Collection::new("u1", "Writers");
		assert_eq!(collection.add_plaques([3, 1, 3, 2]), 3);
		assert_eq!(collection.add_plaques([1, 4]), 1);
		assert_eq!(collection.plaques, vec![3, 1, 2, 4]);
		assert_eq!(collection.remove_plaques(&[1, 9]), 1);
		assert_eq!(collection.plaques, vec![3, 2, 4]);
	}

	#[test]
	fn validates_name_and_color() {
		assert_eq!(
			Collection::validate_name("   "),
			Err(CollectionValidationError::EmptyName)
		);
		assert_eq!(
			Collection::validate_name(&"x".repeat(MAX_NAME_LEN + 1)),
			Err(CollectionValidationError::NameTooLong)
		);
		assert!(Collection::validate_name("Blue plaques of Soho").is_ok());

		assert!(Collection::validate_color("#3B82F6").is_ok());
		assert!(Collection::validate_color("#3B82FG").is_err());
		assert!(Collection::validate_color("3B82F6").is_err());
	}
}

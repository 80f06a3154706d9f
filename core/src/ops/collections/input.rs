//! Input types for collection operations

use serde::{Deserialize, Serialize};

use crate::domain::{Collection, CollectionValidationError, PlaqueId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCollectionInput {
	pub name: String,
	pub description: Option<String>,
	pub icon: Option<String>,
	pub color: Option<String>,
	#[serde(default)]
	pub plaque_ids: Vec<PlaqueId>,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub is_favorite: bool,
}

impl CreateCollectionInput {
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	pub fn validate(&self) -> Result<(), CollectionValidationError> {
		Collection::validate_name(&self.name)?;
		if let Some(color) = &self.color {
			Collection::validate_color(color)?;
		}
		Ok(())
	}
}

/// Only the fields that are `Some` are written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCollectionInput {
	pub name: Option<String>,
	pub description: Option<String>,
	pub icon: Option<String>,
	pub color: Option<String>,
	pub tags: Option<Vec<String>>,
	pub is_public: Option<bool>,
}

impl UpdateCollectionInput {
	pub fn validate(&self) -> Result<(), CollectionValidationError> {
		if let Some(name) = &self.name {
			Collection::validate_name(name)?;
		}
		if let Some(color) = &self.color {
			Collection::validate_color(color)?;
		}
		Ok(())
	}

	pub fn is_empty(&self) -> bool {
		self.name.is_none()
			&& self.description.is_none()
			&& self.icon.is_none()
			&& self.color.is_none()
			&& self.tags.is_none()
			&& self.is_public.is_none()
	}
}

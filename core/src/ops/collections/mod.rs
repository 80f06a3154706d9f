//! Collection operations

pub mod input;
pub mod service;

use thiserror::Error;
use uuid::Uuid;

use crate::{
	domain::{CollectionValidationError, PlaqueId},
	store::StoreError,
};

pub use input::{CreateCollectionInput, UpdateCollectionInput};
pub use service::CollectionService;

#[derive(Debug, Error)]
pub enum CollectionError {
	#[error("collection not found: {0}")]
	NotFound(Uuid),
	#[error("collection {0} belongs to another user")]
	NotOwner(Uuid),
	#[error(transparent)]
	Invalid(#[from] CollectionValidationError),
	#[error("unknown plaque {0}")]
	UnknownPlaque(PlaqueId),
	#[error("new order must contain exactly the plaques already in the collection")]
	InvalidOrder,
	#[error(transparent)]
	Store(#[from] StoreError),
}

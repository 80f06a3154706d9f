//! Visit log

use std::{collections::BTreeSet, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
	domain::{PlaqueId, PlaqueIndex, Visit},
	store::{self, DocumentStore, StoreError, VISITS},
};

#[derive(Debug, Error)]
pub enum VisitError {
	#[error("visit not found: {0}")]
	NotFound(Uuid),
	#[error("visit {0} belongs to another user")]
	NotOwner(Uuid),
	#[error("unknown plaque {0}")]
	UnknownPlaque(PlaqueId),
	#[error("rating must be between 1 and 5, got {0}")]
	InvalidRating(u8),
	#[error(transparent)]
	Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogVisitInput {
	pub plaque_id: PlaqueId,
	/// Defaults to now
	pub visited_at: Option<DateTime<Utc>>,
	pub notes: Option<String>,
	pub rating: Option<u8>,
	#[serde(default)]
	pub photos: Vec<String>,
}

impl LogVisitInput {
	pub fn plaque(plaque_id: PlaqueId) -> Self {
		Self {
			plaque_id,
			..Default::default()
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVisitInput {
	pub visited_at: Option<DateTime<Utc>>,
	pub notes: Option<String>,
	pub rating: Option<u8>,
	pub photos: Option<Vec<String>>,
}

fn check_rating(rating: Option<u8>) -> Result<(), VisitError> {
	match rating {
		Some(r) if !Visit::is_valid_rating(r) => Err(VisitError::InvalidRating(r)),
		_ => Ok(()),
	}
}

pub struct VisitService {
	store: Arc<dyn DocumentStore>,
	index: Arc<PlaqueIndex>,
}

impl VisitService {
	pub fn new(store: Arc<dyn DocumentStore>, index: Arc<PlaqueIndex>) -> Self {
		Self { store, index }
	}

	pub async fn log(&self, user_id: &str, input: LogVisitInput) -> Result<Visit, VisitError> {
		if !self.index.contains(input.plaque_id) {
			return Err(VisitError::UnknownPlaque(input.plaque_id));
		}
		check_rating(input.rating)?;

		let mut visit = Visit::new(
			user_id,
			input.plaque_id,
			input.visited_at.unwrap_or_else(Utc::now),
		);
		visit.notes = pq_utils::non_blank(input.notes.as_deref()).map(str::to_string);
		visit.rating = input.rating;
		visit.photos = input.photos;

		store::put_doc(&*self.store, VISITS, &visit.id.to_string(), &visit).await?;
		info!(plaque_id = visit.plaque_id, visit_id = %visit.id, "Logged visit");
		Ok(visit)
	}

	/// Most recent first
	pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Visit>, VisitError> {
		let mut visits: Vec<Visit> = store::list_docs(&*self.store, VISITS)
			.await?
			.into_iter()
			.filter(|v: &Visit| v.user_id == user_id)
			.collect();

		visits.sort_by(|a, b| b.visited_at.cmp(&a.visited_at));
		Ok(visits)
	}

	pub async fn list_for_plaque(
		&self,
		user_id: &str,
		plaque_id: PlaqueId,
	) -> Result<Vec<Visit>, VisitError> {
		Ok(self
			.list_for_user(user_id)
			.await?
			.into_iter()
			.filter(|v| v.plaque_id == plaque_id)
			.collect())
	}

	pub async fn get(&self, user_id: &str, id: Uuid) -> Result<Visit, VisitError> {
		let visit: Visit = store::get_doc(&*self.store, VISITS, &id.to_string())
			.await?
			.ok_or(VisitError::NotFound(id))?;

		if visit.user_id != user_id {
			return Err(VisitError::NotOwner(id));
		}
		Ok(visit)
	}

	pub async fn update(
		&self,
		user_id: &str,
		id: Uuid,
		input: UpdateVisitInput,
	) -> Result<Visit, VisitError> {
		check_rating(input.rating)?;
		let mut visit = self.get(user_id, id).await?;

		if let Some(visited_at) = input.visited_at {
			visit.visited_at = visited_at;
		}
		if let Some(notes) = input.notes {
			visit.notes = pq_utils::non_blank(Some(&notes)).map(str::to_string);
		}
		if input.rating.is_some() {
			visit.rating = input.rating;
		}
		if let Some(photos) = input.photos {
			visit.photos = photos;
		}

		store::put_doc(&*self.store, VISITS, &id.to_string(), &visit).await?;
		Ok(visit)
	}

	pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), VisitError> {
		self.get(user_id, id).await?;
		self.store.delete(VISITS, &id.to_string()).await?;
		info!(visit_id = %id, "Deleted visit");
		Ok(())
	}

	pub async fn visited_plaque_ids(&self, user_id: &str) -> Result<BTreeSet<PlaqueId>, VisitError> {
		Ok(self
			.list_for_user(user_id)
			.await?
			.into_iter()
			.map(|v| v.plaque_id)
			.collect())
	}

	pub async fn is_visited(&self, user_id: &str, plaque_id: PlaqueId) -> Result<bool, VisitError> {
		Ok(self.visited_plaque_ids(user_id).await?.contains(&plaque_id))
	}
}

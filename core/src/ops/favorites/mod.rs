//! Favourite plaques

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::{
	domain::{Favorite, PlaqueId, PlaqueIndex},
	store::{self, DocumentStore, StoreError, FAVORITES},
};

#[derive(Debug, Error)]
pub enum FavoriteError {
	#[error("unknown plaque {0}")]
	UnknownPlaque(PlaqueId),
	#[error(transparent)]
	Store(#[from] StoreError),
}

pub struct FavoriteService {
	store: Arc<dyn DocumentStore>,
	index: Arc<PlaqueIndex>,
}

impl FavoriteService {
	pub fn new(store: Arc<dyn DocumentStore>, index: Arc<PlaqueIndex>) -> Self {
		Self { store, index }
	}

	/// Returns whether the plaque is a favourite afterwards
	pub async fn toggle(&self, user_id: &str, plaque_id: PlaqueId) -> Result<bool, FavoriteError> {
		if self.is_favorite(user_id, plaque_id).await? {
			self.remove(user_id, plaque_id).await?;
			Ok(false)
		} else {
			self.add(user_id, plaque_id).await?;
			Ok(true)
		}
	}

	/// Adding an existing favourite keeps the original
	pub async fn add(&self, user_id: &str, plaque_id: PlaqueId) -> Result<Favorite, FavoriteError> {
		if !self.index.contains(plaque_id) {
			return Err(FavoriteError::UnknownPlaque(plaque_id));
		}

		let id = Favorite::document_id(user_id, plaque_id);
		if let Some(existing) = store::get_doc::<Favorite>(&*self.store, FAVORITES, &id).await? {
			return Ok(existing);
		}

		let favorite = Favorite::new(user_id, plaque_id);
		store::put_doc(&*self.store, FAVORITES, &id, &favorite).await?;
		debug!(plaque_id, "Added favourite");
		Ok(favorite)
	}

	/// Removing something that isn't a favourite is not an error
	pub async fn remove(&self, user_id: &str, plaque_id: PlaqueId) -> Result<(), FavoriteError> {
		match self
			.store
			.delete(FAVORITES, &Favorite::document_id(user_id, plaque_id))
			.await
		{
			Ok(()) | Err(StoreError::NotFound { .. }) => {
				debug!(plaque_id, "Removed favourite");
				Ok(())
			}
			Err(e) => Err(e.into()),
		}
	}

	/// Newest first
	pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Favorite>, FavoriteError> {
		let mut favorites: Vec<Favorite> = store::list_docs(&*self.store, FAVORITES)
			.await?
			.into_iter()
			.filter(|f: &Favorite| f.user_id == user_id)
			.collect();

		favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
		Ok(favorites)
	}

	pub async fn is_favorite(&self, user_id: &str, plaque_id: PlaqueId) -> Result<bool, FavoriteError> {
		Ok(self
			.store
			.get(FAVORITES, &Favorite::document_id(user_id, plaque_id))
			.await?
			.is_some())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{domain::Plaque, store::MemoryStore};

	fn service() -> FavoriteService {
		let index = PlaqueIndex::new(vec![Plaque::new(1, "One"), Plaque::new(2, "Two")]);
		FavoriteService::new(Arc::new(MemoryStore::default()), Arc::new(index))
	}

	#[tokio::test]
	async fn toggle_flips_state() {
		let service = service();

		assert!(service.toggle("u1", 1).await.expect("toggled on"));
		assert!(service.is_favorite("u1", 1).await.expect("checked"));
		assert!(!service.is_favorite("u2", 1).await.expect("checked"));

		assert!(!service.toggle("u1", 1).await.expect("toggled off"));
		assert!(service.list_for_user("u1").await.expect("listed").is_empty());
	}

	#[tokio::test]
	async fn at_most_one_favourite_per_plaque() {
		let service = service();
		let first = service.add("u1", 2).await.expect("added");
		let second = service.add("u1", 2).await.expect("added again");

		assert_eq!(first, second);
		assert_eq!(service.list_for_user("u1").await.expect("listed").len(), 1);
		assert!(matches!(
			service.add("u1", 7).await,
			Err(FavoriteError::UnknownPlaque(7))
		));
		service.remove("u1", 7).await.expect("removing nothing is fine");
	}
}

//! Collection service

use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use super::{
	input::{CreateCollectionInput, UpdateCollectionInput},
	CollectionError,
};
use crate::{
	domain::{collection::MAX_NAME_LEN, Collection, PlaqueId, PlaqueIndex},
	store::{self, DocumentStore, COLLECTIONS},
};

const COPY_SUFFIX: &str = " (Copy)";

pub struct CollectionService {
	store: Arc<dyn DocumentStore>,
	index: Arc<PlaqueIndex>,
}

impl CollectionService {
	pub fn new(store: Arc<dyn DocumentStore>, index: Arc<PlaqueIndex>) -> Self {
		Self { store, index }
	}

	pub async fn create(
		&self,
		user_id: &str,
		input: CreateCollectionInput,
	) -> Result<Collection, CollectionError> {
		input.validate()?;
		self.check_known(&input.plaque_ids)?;

		let mut collection = Collection::new(user_id, input.name.trim());
		collection.description = pq_utils::non_blank(input.description.as_deref()).map(str::to_string);
		if let Some(icon) = pq_utils::non_blank(input.icon.as_deref()) {
			collection.icon = icon.to_string();
		}
		if let Some(color) = input.color {
			collection.color = color;
		}
		collection.tags = input.tags;
		collection.is_favorite = input.is_favorite;
		collection.add_plaques(input.plaque_ids);

		self.save(&collection).await?;
		info!(collection_id = %collection.id, plaques = collection.plaques.len(), "Created collection");
		Ok(collection)
	}

	pub async fn get(&self, user_id: &str, id: Uuid) -> Result<Collection, CollectionError> {
		let collection: Collection = store::get_doc(&*self.store, COLLECTIONS, &id.to_string())
			.await?
			.ok_or(CollectionError::NotFound(id))?;

		if collection.user_id != user_id {
			return Err(CollectionError::NotOwner(id));
		}
		Ok(collection)
	}

	/// Favourites first, then most recently updated
	pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Collection>, CollectionError> {
		let mut collections: Vec<Collection> = store::list_docs(&*self.store, COLLECTIONS)
			.await?
			.into_iter()
			.filter(|c: &Collection| c.user_id == user_id)
			.collect();

		collections.sort_by(|a, b| {
			b.is_favorite
				.cmp(&a.is_favorite)
				.then_with(|| b.updated_at.cmp(&a.updated_at))
		});
		Ok(collections)
	}

	/// Collections of `user_id` that contain the plaque
	pub async fn containing(
		&self,
		user_id: &str,
		plaque_id: PlaqueId,
	) -> Result<Vec<Collection>, CollectionError> {
		Ok(self
			.list_for_user(user_id)
			.await?
			.into_iter()
			.filter(|c| c.contains(plaque_id))
			.collect())
	}

	pub async fn update(
		&self,
		user_id: &str,
		id: Uuid,
		input: UpdateCollectionInput,
	) -> Result<Collection, CollectionError> {
		input.validate()?;
		let current = self.get(user_id, id).await?;
		if input.is_empty() {
			return Ok(current);
		}

		let mut fields = Map::new();
		if let Some(name) = input.name {
			fields.insert("name".into(), json!(name.trim()));
		}
		if let Some(description) = input.description {
			let description = pq_utils::non_blank(Some(&description)).map(str::to_string);
			fields.insert("description".into(), json!(description));
		}
		if let Some(icon) = input.icon {
			fields.insert("icon".into(), json!(icon));
		}
		if let Some(color) = input.color {
			fields.insert("color".into(), json!(color));
		}
		if let Some(tags) = input.tags {
			fields.insert("tags".into(), json!(tags));
		}
		if let Some(is_public) = input.is_public {
			fields.insert("is_public".into(), json!(is_public));
		}

		self.patch(id, fields).await
	}

	pub async fn add_plaques(
		&self,
		user_id: &str,
		id: Uuid,
		plaque_ids: &[PlaqueId],
	) -> Result<Collection, CollectionError> {
		self.check_known(plaque_ids)?;

		let mut collection = self.get(user_id, id).await?;
		let added = collection.add_plaques(plaque_ids.iter().copied());
		debug!(collection_id = %id, added, "Adding plaques to collection");
		if added == 0 {
			return Ok(collection);
		}

		self.patch(id, plaques_field(&collection)).await
	}

	pub async fn remove_plaques(
		&self,
		user_id: &str,
		id: Uuid,
		plaque_ids: &[PlaqueId],
	) -> Result<Collection, CollectionError> {
		let mut collection = self.get(user_id, id).await?;
		let removed = collection.remove_plaques(plaque_ids);
		debug!(collection_id = %id, removed, "Removing plaques from collection");
		if removed == 0 {
			return Ok(collection);
		}

		self.patch(id, plaques_field(&collection)).await
	}

	/// `plaque_ids` must be a permutation of the current contents
	pub async fn reorder(
		&self,
		user_id: &str,
		id: Uuid,
		plaque_ids: Vec<PlaqueId>,
	) -> Result<Collection, CollectionError> {
		let mut collection = self.get(user_id, id).await?;

		let current: HashSet<_> = collection.plaques.iter().collect();
		let proposed: HashSet<_> = plaque_ids.iter().collect();
		if plaque_ids.len() != collection.plaques.len() || current != proposed {
			return Err(CollectionError::InvalidOrder);
		}

		collection.plaques = plaque_ids;
		self.patch(id, plaques_field(&collection)).await
	}

	pub async fn toggle_favorite(&self, user_id: &str, id: Uuid) -> Result<Collection, CollectionError> {
		let collection = self.get(user_id, id).await?;

		let mut fields = Map::new();
		fields.insert("is_favorite".into(), json!(!collection.is_favorite));
		self.patch(id, fields).await
	}

	/// Private copy with a fresh id, named `"<name> (Copy)"`
	pub async fn duplicate(&self, user_id: &str, id: Uuid) -> Result<Collection, CollectionError> {
		let source = self.get(user_id, id).await?;

		let base: String = source
			.name
			.chars()
			.take(MAX_NAME_LEN - COPY_SUFFIX.chars().count())
			.collect();

		let mut copy = Collection::new(user_id, format!("{}{COPY_SUFFIX}", base.trim_end()));
		copy.description = source.description;
		copy.icon = source.icon;
		copy.color = source.color;
		copy.plaques = source.plaques;
		copy.tags = source.tags;

		self.save(&copy).await?;
		info!(source_id = %id, collection_id = %copy.id, "Duplicated collection");
		Ok(copy)
	}

	pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), CollectionError> {
		self.get(user_id, id).await?;
		self.store.delete(COLLECTIONS, &id.to_string()).await?;
		info!(collection_id = %id, "Deleted collection");
		Ok(())
	}

	fn check_known(&self, plaque_ids: &[PlaqueId]) -> Result<(), CollectionError> {
		match plaque_ids.iter().find(|id| !self.index.contains(**id)) {
			Some(&unknown) => Err(CollectionError::UnknownPlaque(unknown)),
			None => Ok(()),
		}
	}

	async fn save(&self, collection: &Collection) -> Result<(), CollectionError> {
		store::put_doc(&*self.store, COLLECTIONS, &collection.id.to_string(), collection).await?;
		Ok(())
	}

	/// Writes the given fields plus a fresh `updated_at`
	async fn patch(&self, id: Uuid, mut fields: Map<String, Value>) -> Result<Collection, CollectionError> {
		fields.insert("updated_at".into(), json!(Utc::now()));
		let doc = self.store.patch(COLLECTIONS, &id.to_string(), fields).await?;
		Ok(serde_json::from_value(doc).map_err(store::StoreError::from)?)
	}
}

fn plaques_field(collection: &Collection) -> Map<String, Value> {
	let mut fields = Map::new();
	fields.insert("plaques".into(), json!(collection.plaques));
	fields
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::{
		domain::{CollectionValidationError, Plaque},
		store::MemoryStore,
	};

	fn service() -> CollectionService {
		let index = PlaqueIndex::new((1..=5).map(|i| Plaque::new(i, format!("Plaque {i}"))).collect());
		CollectionService::new(Arc::new(MemoryStore::default()), Arc::new(index))
	}

	#[tokio::test]
	async fn create_validates_and_dedupes() {
		let service = service();

		let collection = service
			.create(
				"u1",
				CreateCollectionInput {
					plaque_ids: vec![3, 1, 3],
					color: Some("#10B981".to_string()),
					..CreateCollectionInput::named("  Writers  ")
				},
			)
			.await
			.expect("created");
		assert_eq!(collection.name, "Writers");
		assert_eq!(collection.plaques, vec![3, 1]);

		assert!(matches!(
			service.create("u1", CreateCollectionInput::named(" ")).await,
			Err(CollectionError::Invalid(CollectionValidationError::EmptyName))
		));
		assert!(matches!(
			service
				.create(
					"u1",
					CreateCollectionInput {
						plaque_ids: vec![42],
						..CreateCollectionInput::named("Ghosts")
					}
				)
				.await,
			Err(CollectionError::UnknownPlaque(42))
		));
	}

	#[tokio::test]
	async fn update_only_touches_given_fields() {
		let service = service();
		let created = service
			.create(
				"u1",
				CreateCollectionInput {
					description: Some("Novelists".to_string()),
					..CreateCollectionInput::named("Writers")
				},
			)
			.await
			.expect("created");

		let updated = service
			.update(
				"u1",
				created.id,
				UpdateCollectionInput {
					name: Some("Authors".to_string()),
					..Default::default()
				},
			)
			.await
			.expect("updated");

		assert_eq!(updated.name, "Authors");
		assert_eq!(updated.description.as_deref(), Some("Novelists"));
		assert!(updated.updated_at >= created.updated_at);
		assert_eq!(updated.created_at, created.created_at);
	}

	#[tokio::test]
	async fn reorder_requires_permutation() {
		let service = service();
		let created = service
			.create(
				"u1",
				CreateCollectionInput {
					plaque_ids: vec![1, 2, 3],
					..CreateCollectionInput::named("Walk")
				},
			)
			.await
			.expect("created");

		let reordered = service
			.reorder("u1", created.id, vec![3, 1, 2])
			.await
			.expect("reordered");
		assert_eq!(reordered.plaques, vec![3, 1, 2]);

		for bad in [vec![1, 2], vec![1, 2, 4], vec![1, 1, 2]] {
			assert!(matches!(
				service.reorder("u1", created.id, bad).await,
				Err(CollectionError::InvalidOrder)
			));
		}
	}

	#[tokio::test]
	async fn favourites_sort_first_and_duplicates_are_private() {
		let service = service();
		let older = service
			.create("u1", CreateCollectionInput::named("Older"))
			.await
			.expect("created");
		service
			.create("u1", CreateCollectionInput::named("Newer"))
			.await
			.expect("created");
		service
			.create("u2", CreateCollectionInput::named("Someone else's"))
			.await
			.expect("created");

		service
			.toggle_favorite("u1", older.id)
			.await
			.expect("favourited");

		let names: Vec<String> = service
			.list_for_user("u1")
			.await
			.expect("listed")
			.into_iter()
			.map(|c| c.name)
			.collect();
		assert_eq!(names, vec!["Older", "Newer"]);

		let copy = service.duplicate("u1", older.id).await.expect("duplicated");
		assert_eq!(copy.name, "Older (Copy)");
		assert_ne!(copy.id, older.id);
		assert!(!copy.is_favorite);

		assert!(matches!(
			service.delete("u2", older.id).await,
			Err(CollectionError::NotOwner(_))
		));
	}
}

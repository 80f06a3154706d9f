//! Document storage
//!
//! User data lives in named collections of JSON documents keyed by string id,
//! the same shape the hosted backend uses. Writes replace or shallow-merge
//! whole documents and the last writer wins.

mod file;
mod memory;

use async_trait::async_trait;
use pq_utils::error::FileIOError;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

pub const COLLECTIONS: &str = "collections";
pub const VISITS: &str = "visits";
pub const FAVORITES: &str = "favorites";
pub const ROUTES: &str = "routes";

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("document not found <collection='{collection}', id='{id}'>")]
	NotFound { collection: String, id: String },
	#[error("patch for <collection='{collection}', id='{id}'> must be applied to a JSON object")]
	NotAnObject { collection: String, id: String },
	#[error("failed to (de)serialize document: {0}")]
	Serialization(#[from] serde_json::Error),
	#[error(transparent)]
	FileIO(#[from] FileIOError),
}

impl StoreError {
	pub fn not_found(collection: &str, id: &str) -> Self {
		Self::NotFound {
			collection: collection.to_string(),
			id: id.to_string(),
		}
	}
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
	async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

	/// All documents in a collection, ordered by id
	async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError>;

	/// Creates or replaces a document
	async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError>;

	/// Shallow-merges `fields` into an existing document and returns the result
	async fn patch(
		&self,
		collection: &str,
		id: &str,
		fields: Map<String, Value>,
	) -> Result<Value, StoreError>;

	async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

pub(crate) fn merge_fields(
	collection: &str,
	id: &str,
	doc: &mut Value,
	fields: Map<String, Value>,
) -> Result<(), StoreError> {
	let Value::Object(target) = doc else {
		return Err(StoreError::NotAnObject {
			collection: collection.to_string(),
			id: id.to_string(),
		});
	};

	target.extend(fields);
	Ok(())
}

pub async fn get_doc<T: DeserializeOwned>(
	store: &dyn DocumentStore,
	collection: &str,
	id: &str,
) -> Result<Option<T>, StoreError> {
	store
		.get(collection, id)
		.await?
		.map(serde_json::from_value)
		.transpose()
		.map_err(Into::into)
}

pub async fn list_docs<T: DeserializeOwned>(
	store: &dyn DocumentStore,
	collection: &str,
) -> Result<Vec<T>, StoreError> {
	store
		.list(collection)
		.await?
		.into_iter()
		.map(|(_, doc)| serde_json::from_value(doc).map_err(Into::into))
		.collect()
}

pub async fn put_doc<T: Serialize + Sync>(
	store: &dyn DocumentStore,
	collection: &str,
	id: &str,
	doc: &T,
) -> Result<(), StoreError> {
	store.put(collection, id, serde_json::to_value(doc)?).await
}

#[cfg(test)]
mod tests {
	use serde::Deserialize;
	use serde_json::json;

	use super::*;

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct Note {
		title: String,
		pinned: bool,
	}

	async fn exercise(store: &dyn DocumentStore) {
		put_doc(
			store,
			"notes",
			"b",
			&Note {
				title: "second".into(),
				pinned: false,
			},
		)
		.await
		.expect("put b");
		put_doc(
			store,
			"notes",
			"a",
			&Note {
				title: "first".into(),
				pinned: false,
			},
		)
		.await
		.expect("put a");

		let patched = store
			.patch(
				"notes",
				"a",
				json!({"pinned": true}).as_object().cloned().unwrap_or_default(),
			)
			.await
			.expect("patch a");
		assert_eq!(patched, json!({"title": "first", "pinned": true}));

		let notes: Vec<Note> = list_docs(store, "notes").await.expect("list");
		assert_eq!(notes.len(), 2);
		assert_eq!(notes[0].title, "first");
		assert!(notes[0].pinned);

		store.delete("notes", "b").await.expect("delete b");
		assert!(get_doc::<Note>(store, "notes", "b")
			.await
			.expect("get b")
			.is_none());

		assert!(matches!(
			store.delete("notes", "b").await,
			Err(StoreError::NotFound { .. })
		));
		assert!(matches!(
			store.patch("notes", "zzz", Map::new()).await,
			Err(StoreError::NotFound { .. })
		));
		assert!(store.list("empty").await.expect("list empty").is_empty());
	}

	#[tokio::test]
	async fn memory_store_semantics() {
		exercise(&MemoryStore::default()).await;
	}

	#[tokio::test]
	async fn file_store_semantics() {
		let dir = tempfile::tempdir().expect("tempdir");
		let store = JsonFileStore::open(dir.path()).await.expect("open store");
		exercise(&store).await;

		// A fresh handle sees what the first one wrote
		let reopened = JsonFileStore::open(dir.path()).await.expect("reopen store");
		let note: Option<Note> = get_doc(&reopened, "notes", "a").await.expect("get a");
		assert_eq!(
			note,
			Some(Note {
				title: "first".into(),
				pinned: true
			})
		);
	}
}

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{merge_fields, DocumentStore, StoreError};

type Collection = BTreeMap<String, Value>;

/// Process-local store, used by tests and when no data directory is available
#[derive(Debug, Default)]
pub struct MemoryStore {
	collections: RwLock<HashMap<String, Collection>>,
}

#[async_trait]
impl DocumentStore for MemoryStore {
	async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
		Ok(self
			.collections
			.read()
			.await
			.get(collection)
			.and_then(|docs| docs.get(id))
			.cloned())
	}

	async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
		Ok(self
			.collections
			.read()
			.await
			.get(collection)
			.map(|docs| {
				docs.iter()
					.map(|(id, doc)| (id.clone(), doc.clone()))
					.collect()
			})
			.unwrap_or_default())
	}

	async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
		self.collections
			.write()
			.await
			.entry(collection.to_string())
			.or_default()
			.insert(id.to_string(), doc);
		Ok(())
	}

	async fn patch(
		&self,
		collection: &str,
		id: &str,
		fields: Map<String, Value>,
	) -> Result<Value, StoreError> {
		let mut collections = self.collections.write().await;
		let doc = collections
			.get_mut(collection)
			.and_then(|docs| docs.get_mut(id))
			.ok_or_else(|| StoreError::not_found(collection, id))?;

		merge_fields(collection, id, doc, fields)?;
		Ok(doc.clone())
	}

	async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
		self.collections
			.write()
			.await
			.get_mut(collection)
			.and_then(|docs| docs.remove(id))
			.map(|_| ())
			.ok_or_else(|| StoreError::not_found(collection, id))
	}
}

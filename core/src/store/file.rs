use std::{
	collections::{hash_map::Entry, BTreeMap, HashMap},
	path::{Path, PathBuf},
};

use async_trait::async_trait;
use pq_utils::error::FileIOError;
use serde_json::{Map, Value};
use tokio::{fs, sync::Mutex};
use tracing::{debug, trace};

use super::{merge_fields, DocumentStore, StoreError};

type Collection = BTreeMap<String, Value>;

/// One pretty-printed JSON file per collection under `root`.
///
/// Collections are loaded lazily and cached; every write rewrites the
/// collection file through a temporary file and a rename, so a crash never
/// leaves a half-written file behind. Writes from one process are serialised
/// by the cache mutex.
#[derive(Debug)]
pub struct JsonFileStore {
	root: PathBuf,
	cache: Mutex<HashMap<String, Collection>>,
}

impl JsonFileStore {
	pub async fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
		let root = root.as_ref().to_path_buf();
		fs::create_dir_all(&root).await.map_err(|e| {
			FileIOError::from_std_io_err_with_msg(&root, e, "creating document store directory")
		})?;

		debug!(root = %root.display(), "Opened document store");
		Ok(Self {
			root,
			cache: Mutex::new(HashMap::new()),
		})
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn collection_path(&self, collection: &str) -> PathBuf {
		self.root.join(format!("{collection}.json"))
	}

	async fn read_collection(&self, collection: &str) -> Result<Collection, StoreError> {
		let path = self.collection_path(collection);
		match fs::read_to_string(&path).await {
			Ok(json) => Ok(serde_json::from_str(&json)?),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Collection::new()),
			Err(e) => Err(FileIOError::from_std_io_err(&path, e).into()),
		}
	}

	async fn write_collection(&self, collection: &str, docs: &Collection) -> Result<(), StoreError> {
		let path = self.collection_path(collection);
		let tmp = path.with_extension("json.tmp");

		let json = serde_json::to_vec_pretty(docs)?;
		fs::write(&tmp, json)
			.await
			.map_err(|e| FileIOError::from_std_io_err(&tmp, e))?;
		fs::rename(&tmp, &path)
			.await
			.map_err(|e| FileIOError::from_std_io_err_with_msg(&path, e, "replacing collection file"))?;

		trace!(%collection, documents = docs.len(), "Wrote collection");
		Ok(())
	}

	/// Runs `f` against the cached collection, loading it from disk on first use
	async fn with_collection<R>(
		&self,
		collection: &str,
		f: impl FnOnce(&Collection) -> R,
	) -> Result<R, StoreError> {
		let mut cache = self.cache.lock().await;
		let docs = self.cached(&mut cache, collection).await?;
		Ok(f(docs))
	}

	/// Applies `f` to a copy of the collection and only swaps it into the
	/// cache once the file write succeeded, so a failed write changes nothing
	async fn update_collection<R>(
		&self,
		collection: &str,
		f: impl FnOnce(&mut Collection) -> Result<R, StoreError>,
	) -> Result<R, StoreError> {
		let mut cache = self.cache.lock().await;
		let docs = self.cached(&mut cache, collection).await?;

		let mut updated = docs.clone();
		let result = f(&mut updated)?;
		self.write_collection(collection, &updated).await?;
		*docs = updated;

		Ok(result)
	}

	async fn cached<'c>(
		&self,
		cache: &'c mut HashMap<String, Collection>,
		collection: &str,
	) -> Result<&'c mut Collection, StoreError> {
		Ok(match cache.entry(collection.to_string()) {
			Entry::Occupied(entry) => entry.into_mut(),
			Entry::Vacant(entry) => entry.insert(self.read_collection(collection).await?),
		})
	}
}

#[async_trait]
impl DocumentStore for JsonFileStore {
	async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
		self.with_collection(collection, |docs| docs.get(id).cloned())
			.await
	}

	async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
		self.with_collection(collection, |docs| {
			docs.iter()
				.map(|(id, doc)| (id.clone(), doc.clone()))
				.collect()
		})
		.await
	}

	async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
		self.update_collection(collection, |docs| {
			docs.insert(id.to_string(), doc);
			Ok(())
		})
		.await
	}

	async fn patch(
		&self,
		collection: &str,
		id: &str,
		fields: Map<String, Value>,
	) -> Result<Value, StoreError> {
		self.update_collection(collection, |docs| {
			let doc = docs
				.get_mut(id)
				.ok_or_else(|| StoreError::not_found(collection, id))?;
			merge_fields(collection, id, doc, fields)?;
			Ok(doc.clone())
		})
		.await
	}

	async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
		self.update_collection(collection, |docs| {
			docs.remove(id)
				.map(|_| ())
				.ok_or_else(|| StoreError::not_found(collection, id))
		})
		.await
	}
}

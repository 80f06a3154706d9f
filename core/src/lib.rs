//! Historic plaques core
//!
//! Loads the plaque dataset once, opens the user-data store and wires up the
//! services that operate on both.

use std::{
	path::{Path, PathBuf},
	sync::Arc,
};

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub mod config;
pub mod domain;
pub mod ops;
pub mod store;

use config::{AppConfig, ConfigError};
use domain::{DatasetError, Plaque, PlaqueId, PlaqueIndex};
use ops::{
	collections::{CollectionError, CollectionService},
	export::{self as exporter, ExportError, ExportFormat, ExportSource},
	favorites::{FavoriteError, FavoriteService},
	routes::{RouteError, RouteService, WalkingDistanceService},
	search::{PlaqueSearchInput, PlaqueSearchOutput, PlaqueSearchQuery, SearchDebouncer, SearchError},
	stats::UserStats,
	visits::{VisitError, VisitService},
};
use store::{DocumentStore, JsonFileStore, MemoryStore, StoreError};

#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Dataset(#[from] DatasetError),
	#[error(transparent)]
	Store(#[from] StoreError),
	#[error(transparent)]
	Search(#[from] SearchError),
	#[error(transparent)]
	Collection(#[from] CollectionError),
	#[error(transparent)]
	Route(#[from] RouteError),
	#[error(transparent)]
	Visit(#[from] VisitError),
	#[error(transparent)]
	Favorite(#[from] FavoriteError),
	#[error(transparent)]
	Export(#[from] ExportError),
	#[error("plaque not found: {0}")]
	PlaqueNotFound(PlaqueId),
}

pub struct Core {
	pub config: AppConfig,
	pub index: Arc<PlaqueIndex>,
	pub store: Arc<dyn DocumentStore>,
	pub walking: Arc<WalkingDistanceService>,
	pub collections: CollectionService,
	pub visits: VisitService,
	pub favorites: FavoriteService,
	pub routes: RouteService,
}

impl Core {
	/// Loads the dataset and opens the on-disk store under the data directory
	pub async fn new(config: AppConfig) -> Result<Self, Error> {
		config.ensure_directories()?;

		let index = PlaqueIndex::load(config.dataset_path())?;
		let store = JsonFileStore::open(config.store_dir()).await?;

		info!(
			data_dir = %config.data_dir.display(),
			plaques = index.len(),
			"Core initialized"
		);
		Ok(Self::with_parts(config, Arc::new(index), Arc::new(store)))
	}

	/// Nothing touches the disk; used by tests and one-off tools
	pub fn in_memory(config: AppConfig, index: PlaqueIndex) -> Self {
		Self::with_parts(config, Arc::new(index), Arc::new(MemoryStore::default()))
	}

	pub fn with_parts(
		config: AppConfig,
		index: Arc<PlaqueIndex>,
		store: Arc<dyn DocumentStore>,
	) -> Self {
		let walking = Arc::new(WalkingDistanceService::from_config(&config.routing));
		Self::with_walking(config, index, store, walking)
	}

	pub fn with_walking(
		config: AppConfig,
		index: Arc<PlaqueIndex>,
		store: Arc<dyn DocumentStore>,
		walking: Arc<WalkingDistanceService>,
	) -> Self {
		Self {
			collections: CollectionService::new(Arc::clone(&store), Arc::clone(&index)),
			visits: VisitService::new(Arc::clone(&store), Arc::clone(&index)),
			favorites: FavoriteService::new(Arc::clone(&store), Arc::clone(&index)),
			routes: RouteService::new(Arc::clone(&store), Arc::clone(&index), Arc::clone(&walking)),
			config,
			index,
			store,
			walking,
		}
	}

	pub fn plaque(&self, id: PlaqueId) -> Result<&Plaque, Error> {
		self.index.get(id).ok_or(Error::PlaqueNotFound(id))
	}

	pub fn search(&self, input: PlaqueSearchInput) -> Result<PlaqueSearchOutput, Error> {
		Ok(PlaqueSearchQuery::new(input).execute(&self.index)?)
	}

	pub fn debouncer(&self) -> SearchDebouncer {
		SearchDebouncer::from_config(Arc::clone(&self.index), &self.config.search)
	}

	pub async fn stats(&self, user_id: &str) -> Result<UserStats, Error> {
		let visits = self.visits.list_for_user(user_id).await?;
		let favorites = self.favorites.list_for_user(user_id).await?;
		let collections = self.collections.list_for_user(user_id).await?;

		Ok(UserStats::compute(&self.index, &visits, &favorites, &collections))
	}

	pub async fn export_collection(
		&self,
		user_id: &str,
		id: Uuid,
		format: ExportFormat,
	) -> Result<String, Error> {
		let source = self.collection_source(user_id, id).await?;
		Ok(exporter::export(format, &source)?)
	}

	pub async fn export_route(
		&self,
		user_id: &str,
		id: Uuid,
		format: ExportFormat,
	) -> Result<String, Error> {
		let source = self.route_source(user_id, id).await?;
		Ok(exporter::export(format, &source)?)
	}

	/// Writes the export into `dest`, which may be a file or a directory.
	/// Directories (and `None`, the working directory) get a name derived
	/// from the collection's name.
	pub async fn export_collection_to_file(
		&self,
		user_id: &str,
		id: Uuid,
		format: ExportFormat,
		dest: Option<&Path>,
	) -> Result<PathBuf, Error> {
		let source = self.collection_source(user_id, id).await?;
		let path = export_path(dest, &source.title, format);
		exporter::export_to_file(format, &source, &path).await?;
		Ok(path)
	}

	pub async fn export_route_to_file(
		&self,
		user_id: &str,
		id: Uuid,
		format: ExportFormat,
		dest: Option<&Path>,
	) -> Result<PathBuf, Error> {
		let source = self.route_source(user_id, id).await?;
		let path = export_path(dest, &source.title, format);
		exporter::export_to_file(format, &source, &path).await?;
		Ok(path)
	}

	async fn collection_source(&self, user_id: &str, id: Uuid) -> Result<ExportSource<'_>, Error> {
		let collection = self.collections.get(user_id, id).await?;
		let visited = self.visits.visited_plaque_ids(user_id).await?;

		let plaques = self.index.resolve(&collection.plaques);

		Ok(ExportSource::new(collection.name, plaques)
			.with_description(collection.description)
			.with_visited(visited))
	}

	async fn route_source(&self, user_id: &str, id: Uuid) -> Result<ExportSource<'_>, Error> {
		let route = self.routes.get(user_id, id).await?;
		let visited = self.visits.visited_plaque_ids(user_id).await?;
		let plaques = self.index.resolve(&route.plaque_ids());

		Ok(ExportSource::new(route.name.clone(), plaques)
			.with_description(route.description.clone())
			.with_visited(visited)
			.with_path(route.coordinates()))
	}
}

fn export_path(dest: Option<&Path>, title: &str, format: ExportFormat) -> PathBuf {
	match dest {
		Some(dest) if !dest.is_dir() => dest.to_path_buf(),
		Some(dir) => dir.join(exporter::file_name(title, format)),
		None => PathBuf::from(exporter::file_name(title, format)),
	}
}

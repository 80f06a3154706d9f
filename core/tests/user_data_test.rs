//! Integration tests for user data kept in the on-disk store
//!
//! Collections, visits and favourites written through one `Core` must be
//! visible to the next one opened on the same data directory.

mod helpers;

use helpers::*;
use pq_core::{
	ops::{
		collections::{CreateCollectionInput, UpdateCollectionInput},
		export::ExportFormat,
		visits::LogVisitInput,
	},
	Core, Error,
};

async fn disk_core(data_dir: &std::path::Path) -> anyhow::Result<Core> {
	let config = test_config(data_dir);
	std::fs::write(
		config.dataset_path(),
		serde_json::to_string(&london_plaques())?,
	)?;
	Ok(Core::new(config).await?)
}

#[tokio::test]
async fn user_data_survives_reopen() -> anyhow::Result<()> {
	let dir = tempfile::tempdir()?;

	let collection_id = {
		let core = disk_core(dir.path()).await?;
		let collection = core
			.collections
			.create(
				"u1",
				CreateCollectionInput {
					plaque_ids: vec![1, 2],
					..CreateCollectionInput::named("Bloomsbury writers")
				},
			)
			.await?;
		core.visits.log("u1", LogVisitInput::plaque(1)).await?;
		core.favorites.toggle("u1", 3).await?;
		collection.id
	};

	let core = disk_core(dir.path()).await?;
	let collection = core.collections.get("u1", collection_id).await?;
	assert_eq!(collection.plaques, vec![1, 2]);
	assert!(core.visits.is_visited("u1", 1).await?);
	assert!(core.favorites.is_favorite("u1", 3).await?);

	let stats = core.stats("u1").await?;
	assert_eq!(stats.total_plaques, 6);
	assert_eq!(stats.visited, 1);
	assert_eq!(stats.favorites, 1);
	assert_eq!(stats.collections, 1);
	assert_eq!(stats.top_professions, vec![("Novelist".to_string(), 1)]);

	Ok(())
}

#[tokio::test]
async fn missing_dataset_is_reported() -> anyhow::Result<()> {
	let dir = tempfile::tempdir()?;
	let result = Core::new(test_config(dir.path())).await;

	assert!(matches!(result, Err(Error::Dataset(_))));
	Ok(())
}

#[tokio::test]
async fn collection_exports_in_every_format() -> anyhow::Result<()> {
	let core = memory_core();
	let collection = core
		.collections
		.create(
			"u1",
			CreateCollectionInput {
				plaque_ids: vec![2, 1, 6],
				description: Some("Where they wrote".to_string()),
				..CreateCollectionInput::named("Writers")
			},
		)
		.await?;
	core.visits.log("u1", LogVisitInput::plaque(2)).await?;

	let csv = core
		.export_collection("u1", collection.id, ExportFormat::Csv)
		.await?;
	let rows: Vec<&str> = csv.lines().collect();
	assert_eq!(rows.len(), 4);
	assert!(rows[1].starts_with("2,Virginia Woolf lived here,"));
	assert!(rows[1].ends_with(",true"));
	assert!(rows[2].ends_with(",false"));

	let geojson: serde_json::Value = serde_json::from_str(
		&core
			.export_collection("u1", collection.id, ExportFormat::GeoJson)
			.await?,
	)?;
	// Plaque 6 has no coordinates
	assert_eq!(geojson["features"].as_array().map(Vec::len), Some(2));

	let gpx = core
		.export_collection("u1", collection.id, ExportFormat::Gpx)
		.await?;
	assert!(gpx.contains("<desc>Where they wrote</desc>"));

	let html = core
		.export_collection("u1", collection.id, ExportFormat::Html)
		.await?;
	assert!(html.contains("<h1>Writers</h1>"));

	assert!(matches!(
		core.export_collection("u2", collection.id, ExportFormat::Json)
			.await,
		Err(Error::Collection(_))
	));

	Ok(())
}

#[tokio::test]
async fn exports_are_named_after_the_collection() -> anyhow::Result<()> {
	let dir = tempfile::tempdir()?;
	let core = memory_core();
	let collection = core
		.collections
		.create(
			"u1",
			CreateCollectionInput {
				plaque_ids: vec![1, 2],
				..CreateCollectionInput::named("Bloomsbury Writers")
			},
		)
		.await?;

	let into_dir = core
		.export_collection_to_file("u1", collection.id, ExportFormat::Gpx, Some(dir.path()))
		.await?;
	assert_eq!(into_dir, dir.path().join("bloomsbury-writers.gpx"));
	assert!(std::fs::read_to_string(&into_dir)?.contains("<name>Bloomsbury Writers</name>"));

	let explicit = dir.path().join("mine.csv");
	let written = core
		.export_collection_to_file("u1", collection.id, ExportFormat::Csv, Some(&explicit))
		.await?;
	assert_eq!(written, explicit);
	assert_eq!(std::fs::read_to_string(&explicit)?.lines().count(), 3);

	Ok(())
}

#[tokio::test]
async fn collection_lifecycle() -> anyhow::Result<()> {
	let core = memory_core();
	let collection = core
		.collections
		.create("u1", CreateCollectionInput::named("Walk"))
		.await?;

	let collection = core
		.collections
		.add_plaques("u1", collection.id, &[3, 4, 3])
		.await?;
	assert_eq!(collection.plaques, vec![3, 4]);

	let collection = core
		.collections
		.update(
			"u1",
			collection.id,
			UpdateCollectionInput {
				color: Some("#EF4444".to_string()),
				is_public: Some(true),
				..Default::default()
			},
		)
		.await?;
	assert_eq!(collection.color, "#EF4444");
	assert!(collection.is_public);

	let containing = core.collections.containing("u1", 4).await?;
	assert_eq!(containing.len(), 1);

	let collection = core
		.collections
		.remove_plaques("u1", collection.id, &[3])
		.await?;
	assert_eq!(collection.plaques, vec![4]);

	core.collections.delete("u1", collection.id).await?;
	assert!(core.collections.list_for_user("u1").await?.is_empty());

	Ok(())
}

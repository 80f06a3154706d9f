//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::Path;

use pq_core::{
	config::AppConfig,
	domain::{Plaque, PlaqueIndex},
	Core,
};

/// A handful of real London plaques, plus two that can't be placed on a map
pub fn london_plaques() -> Vec<Plaque> {
	vec![
		Plaque {
			address: Some("48 Doughty Street, Holborn, London".to_string()),
			location: Some("Camden".to_string()),
			profession: Some("Novelist".to_string()),
			inscription: Some("Charles Dickens 1812-1870 novelist lived here".to_string()),
			erected: Some(1903),
			..Plaque::new(1, "Charles Dickens lived here").with_coordinates(51.5238, -0.1165)
		},
		Plaque {
			address: Some("29 Fitzroy Square, Fitzrovia".to_string()),
			profession: Some("Novelist and critic".to_string()),
			..Plaque::new(2, "Virginia Woolf lived here").with_coordinates(51.5235, -0.1405)
		},
		Plaque {
			location: Some("Westminster".to_string()),
			profession: Some("Engineer".to_string()),
			organisations: vec!["English Heritage".to_string()],
			..Plaque::new(3, "Isambard Kingdom Brunel").with_coordinates(51.4870, -0.1700)
		},
		Plaque {
			location: Some("Kensington".to_string()),
			profession: Some("Suffragette".to_string()),
			..Plaque::new(4, "Emmeline Pankhurst lived here").with_coordinates(51.4990, -0.1950)
		},
		Plaque {
			profession: Some("Novelist".to_string()),
			..Plaque::new(5, "Dickens").with_coordinates(0.0, 0.0)
		},
		Plaque::new(6, "Dickens"),
	]
}

pub fn london_index() -> PlaqueIndex {
	PlaqueIndex::new(london_plaques())
}

pub fn test_config(data_dir: &Path) -> AppConfig {
	AppConfig::default_with_dir(data_dir.to_path_buf())
}

/// Core over the fixture dataset with an in-memory store and no directions
/// provider
pub fn memory_core() -> Core {
	Core::in_memory(test_config(Path::new("/nonexistent")), london_index())
}

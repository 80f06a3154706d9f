//! Plaque reference dataset
//!
//! The dataset ships as a static `plaque_data.json` and is loaded once per
//! process. Records come from several exports over the years, so numeric
//! fields may appear as numbers or strings and a few fields have older
//! names (`area`, `colour`, `lead_subject_primary_role`).

use std::{collections::HashMap, fs, path::Path};

use pq_utils::error::FileIOError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::geo::Coordinates;

pub type PlaqueId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plaque {
	#[serde(deserialize_with = "flexible::id")]
	pub id: PlaqueId,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub address: Option<String>,
	#[serde(default, alias = "area")]
	pub location: Option<String>,
	#[serde(default)]
	pub postcode: Option<String>,
	#[serde(default)]
	pub inscription: Option<String>,
	#[serde(default, alias = "lead_subject_primary_role")]
	pub profession: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default, alias = "colour")]
	pub color: Option<String>,
	#[serde(default)]
	pub material: Option<String>,
	#[serde(default, deserialize_with = "flexible::string_list")]
	pub organisations: Vec<String>,
	#[serde(default, alias = "erected_at", deserialize_with = "flexible::year")]
	pub erected: Option<i32>,
	#[serde(default, deserialize_with = "flexible::number")]
	pub latitude: Option<f64>,
	#[serde(default, deserialize_with = "flexible::number")]
	pub longitude: Option<f64>,
	#[serde(default)]
	pub visited: bool,
	#[serde(default)]
	pub image: Option<String>,
}

impl Plaque {
	pub fn new(id: PlaqueId, title: impl Into<String>) -> Self {
		Self {
			id,
			title: title.into(),
			address: None,
			location: None,
			postcode: None,
			inscription: None,
			profession: None,
			description: None,
			color: None,
			material: None,
			organisations: Vec::new(),
			erected: None,
			latitude: None,
			longitude: None,
			visited: false,
			image: None,
		}
	}

	pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
		self.latitude = Some(lat);
		self.longitude = Some(lng);
		self
	}

	/// `None` when the plaque can't be placed on a map
	pub fn coordinates(&self) -> Option<Coordinates> {
		let coords = Coordinates::new(self.latitude?, self.longitude?);
		coords.is_valid().then_some(coords)
	}

	/// First comma-separated segment of the address, usually the street
	pub fn short_address(&self) -> Option<&str> {
		self.address
			.as_deref()
			.and_then(|a| a.split(',').next())
			.map(str::trim)
			.filter(|s| !s.is_empty())
	}
}

#[derive(Debug, Error)]
pub enum DatasetError {
	#[error(transparent)]
	FileIO(#[from] FileIOError),
	#[error("failed to parse plaque dataset: {0}")]
	Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
	List(Vec<Plaque>),
	Wrapped { plaques: Vec<Plaque> },
}

/// The loaded dataset, indexed by plaque id
#[derive(Debug, Clone, Default)]
pub struct PlaqueIndex {
	plaques: Vec<Plaque>,
	by_id: HashMap<PlaqueId, usize>,
}

impl PlaqueIndex {
	/// Builds the index. Later records with an id already seen are dropped.
	pub fn new(plaques: Vec<Plaque>) -> Self {
		let mut kept = Vec::with_capacity(plaques.len());
		let mut by_id = HashMap::with_capacity(plaques.len());

		for plaque in plaques {
			if by_id.contains_key(&plaque.id) {
				warn!(plaque_id = plaque.id, "Duplicate plaque id in dataset, skipping");
				continue;
			}
			by_id.insert(plaque.id, kept.len());
			kept.push(plaque);
		}

		Self {
			plaques: kept,
			by_id,
		}
	}

	pub fn from_json(json: &str) -> Result<Self, DatasetError> {
		let plaques = match serde_json::from_str::<DatasetFile>(json)? {
			DatasetFile::List(plaques) | DatasetFile::Wrapped { plaques } => plaques,
		};
		Ok(Self::new(plaques))
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
		let path = path.as_ref();
		let json = fs::read_to_string(path).map_err(|e| {
			FileIOError::from_std_io_err_with_msg(path, e, "reading plaque dataset")
		})?;

		let index = Self::from_json(&json)?;
		info!(
			path = %path.display(),
			plaques = index.len(),
			located = index.located_count(),
			"Loaded plaque dataset"
		);
		Ok(index)
	}

	pub fn get(&self, id: PlaqueId) -> Option<&Plaque> {
		self.by_id.get(&id).map(|&i| &self.plaques[i])
	}

	pub fn contains(&self, id: PlaqueId) -> bool {
		self.by_id.contains_key(&id)
	}

	pub fn all(&self) -> &[Plaque] {
		&self.plaques
	}

	pub fn len(&self) -> usize {
		self.plaques.len()
	}

	pub fn is_empty(&self) -> bool {
		self.plaques.is_empty()
	}

	pub fn located_count(&self) -> usize {
		self.plaques
			.iter()
			.filter(|p| p.coordinates().is_some())
			.count()
	}

	/// Resolves ids in order, skipping any the dataset doesn't know. The
	/// plaques borrow from the index only, not from `ids`.
	pub fn resolve<'a, 'i>(
		&'a self,
		ids: impl IntoIterator<Item = &'i PlaqueId>,
	) -> Vec<&'a Plaque> {
		ids.into_iter().filter_map(|id| self.get(*id)).collect()
	}
}

mod flexible {
	use serde::{de::Error, Deserialize, Deserializer};
	use serde_json::Value;

	fn as_f64(value: &Value) -> Option<f64> {
		match value {
			Value::Number(n) => n.as_f64(),
			Value::String(s) => s.trim().parse().ok(),
			_ => None,
		}
	}

	pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
		Ok(as_f64(&Value::deserialize(d)?).filter(|n| n.is_finite()))
	}

	/// Accepts `1954`, `"1954"` or a date string such as `"1954-06-01"`
	pub fn year<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
		Ok(match Value::deserialize(d)? {
			Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
			Value::String(s) => {
				let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
				digits.parse().ok()
			}
			_ => None,
		})
	}

	pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
		let value = Value::deserialize(d)?;
		match &value {
			Value::Number(n) => n.as_u64().and_then(|id| u32::try_from(id).ok()),
			Value::String(s) => s.trim().parse().ok(),
			_ => None,
		}
		.ok_or_else(|| D::Error::custom(format!("invalid plaque id: {value}")))
	}

	/// Accepts a JSON array, a JSON-encoded array inside a string, or a
	/// comma-separated string
	pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
		let items = match Value::deserialize(d)? {
			Value::Array(values) => values
				.into_iter()
				.filter_map(|v| match v {
					Value::String(s) => Some(s),
					Value::Object(mut map) => match map.remove("name") {
						Some(Value::String(s)) => Some(s),
						_ => None,
					},
					_ => None,
				})
				.collect(),
			Value::String(s) if s.trim_start().starts_with('[') => {
				serde_json::from_str::<Vec<String>>(&s).unwrap_or_default()
			}
			Value::String(s) => s.split(',').map(str::to_string).collect(),
			_ => Vec::new(),
		};

		Ok(items
			.into_iter()
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty())
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use tracing_test::traced_test;

	use super::*;

	#[test]
	fn parses_mixed_field_shapes() {
		let index = PlaqueIndex::from_json(
			r#"[
				{
					"id": "42",
					"title": "Charles Dickens lived here",
					"area": "Camden",
					"latitude": "51.5238",
					"longitude": -0.1165,
					"erected_at": "1903-01-01",
					"organisations": "[\"English Heritage\", \"LCC\"]",
					"colour": "blue"
				},
				{"id": 7, "title": "Unknown", "latitude": null}
			]"#,
		)
		.expect("valid dataset");

		let dickens = index.get(42).expect("plaque 42");
		assert_eq!(dickens.location.as_deref(), Some("Camden"));
		assert_eq!(dickens.erected, Some(1903));
		assert_eq!(dickens.organisations, vec!["English Heritage", "LCC"]);
		assert_eq!(dickens.color.as_deref(), Some("blue"));
		assert_eq!(
			dickens.coordinates(),
			Some(Coordinates::new(51.5238, -0.1165))
		);

		assert_eq!(index.get(7).and_then(Plaque::coordinates), None);
		assert_eq!(index.located_count(), 1);
	}

	#[test]
	#[traced_test]
	fn accepts_wrapped_dataset_and_drops_duplicates() {
		let index = PlaqueIndex::from_json(
			r#"{"plaques": [{"id": 1, "title": "A"}, {"id": 1, "title": "B"}]}"#,
		)
		.expect("valid dataset");

		assert_eq!(index.len(), 1);
		assert_eq!(index.get(1).map(|p| p.title.as_str()), Some("A"));
		assert!(logs_contain("Duplicate plaque id in dataset"));
	}

	#[test]
	fn rejects_missing_id() {
		assert!(matches!(
			PlaqueIndex::from_json(r#"[{"title": "No id"}]"#),
			Err(DatasetError::Parse(_))
		));
	}

	#[test]
	fn resolved_plaques_outlive_the_id_list() {
		let index = PlaqueIndex::new(vec![Plaque::new(1, "A"), Plaque::new(2, "B")]);

		let resolved = {
			let ids = vec![2, 99, 1];
			index.resolve(&ids)
		};

		let titles: Vec<&str> = resolved.iter().map(|p| p.title.as_str()).collect();
		assert_eq!(titles, vec!["B", "A"]);
	}

	#[test]
	fn short_address_takes_first_segment() {
		let plaque = Plaque {
			address: Some("48 Doughty Street, Holborn, London".to_string()),
			..Plaque::new(1, "Charles Dickens")
		};
		assert_eq!(plaque.short_address(), Some("48 Doughty Street"));
	}
}

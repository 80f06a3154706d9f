//! Exporting plaque lists
//!
//! A collection, a saved route or a set of search results all export the same
//! way: a titled list of plaques, optionally with the walking path between
//! them. HTML output is a printable page and doubles as the PDF path.

mod geo;
mod html;
mod table;

use std::{collections::BTreeSet, path::Path};

use chrono::{DateTime, Utc};
use pq_utils::error::FileIOError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;
use tracing::info;

use crate::domain::{Coordinates, Plaque, PlaqueId};

#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	Serialize,
	Deserialize,
	Display,
	EnumString,
	EnumIter,
	IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
	Csv,
	Json,
	GeoJson,
	Gpx,
	Html,
}

impl ExportFormat {
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Csv => "csv",
			Self::Json => "json",
			Self::GeoJson => "geojson",
			Self::Gpx => "gpx",
			Self::Html => "html",
		}
	}

	pub fn mime_type(&self) -> &'static str {
		match self {
			Self::Csv => "text/csv",
			Self::Json => "application/json",
			Self::GeoJson => "application/geo+json",
			Self::Gpx => "application/gpx+xml",
			Self::Html => "text/html",
		}
	}
}

#[derive(Debug, Error)]
pub enum ExportError {
	#[error("failed to write CSV: {0}")]
	Csv(#[from] csv::Error),
	#[error("failed to serialize export: {0}")]
	Json(#[from] serde_json::Error),
	#[error(transparent)]
	FileIO(#[from] FileIOError),
}

/// What gets exported
#[derive(Debug, Clone)]
pub struct ExportSource<'a> {
	pub title: String,
	pub description: Option<String>,
	pub plaques: Vec<&'a Plaque>,
	/// Plaques the user has visited, on top of the dataset's own flag
	pub visited: BTreeSet<PlaqueId>,
	/// Walking path for routes
	pub path: Option<Vec<Coordinates>>,
	pub generated_at: DateTime<Utc>,
}

impl<'a> ExportSource<'a> {
	pub fn new(title: impl Into<String>, plaques: Vec<&'a Plaque>) -> Self {
		Self {
			title: title.into(),
			description: None,
			plaques,
			visited: BTreeSet::new(),
			path: None,
			generated_at: Utc::now(),
		}
	}

	pub fn with_description(mut self, description: Option<String>) -> Self {
		self.description = description;
		self
	}

	pub fn with_visited(mut self, visited: BTreeSet<PlaqueId>) -> Self {
		self.visited = visited;
		self
	}

	pub fn with_path(mut self, path: Vec<Coordinates>) -> Self {
		self.path = (path.len() >= 2).then_some(path);
		self
	}

	pub fn is_visited(&self, plaque: &Plaque) -> bool {
		plaque.visited || self.visited.contains(&plaque.id)
	}

	/// Plaques that can be placed on a map, with their coordinates
	pub fn located(&self) -> impl Iterator<Item = (&'a Plaque, Coordinates)> + '_ {
		self.plaques
			.iter()
			.filter_map(|&plaque| plaque.coordinates().map(|c| (plaque, c)))
	}
}

pub fn export(format: ExportFormat, source: &ExportSource<'_>) -> Result<String, ExportError> {
	match format {
		ExportFormat::Csv => table::to_csv(source),
		ExportFormat::Json => table::to_json(source),
		ExportFormat::GeoJson => geo::to_geojson(source),
		ExportFormat::Gpx => Ok(geo::to_gpx(source)),
		ExportFormat::Html => Ok(html::to_html(source)),
	}
}

pub async fn export_to_file(
	format: ExportFormat,
	source: &ExportSource<'_>,
	path: impl AsRef<Path>,
) -> Result<(), ExportError> {
	let path = path.as_ref();
	let contents = export(format, source)?;

	tokio::fs::write(path, contents)
		.await
		.map_err(|e| FileIOError::from_std_io_err_with_msg(path, e, "writing export"))?;

	info!(%format, path = %path.display(), plaques = source.plaques.len(), "Exported plaques");
	Ok(())
}

/// Escapes text for XML and HTML bodies and attributes
pub(crate) fn escape_markup(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&apos;"),
			c => escaped.push(c),
		}
	}
	escaped
}

/// File name for an export, derived from its title
pub fn file_name(title: &str, format: ExportFormat) -> String {
	let stem = title
		.split(|c: char| !c.is_alphanumeric())
		.filter(|part| !part.is_empty())
		.map(str::to_lowercase)
		.collect::<Vec<_>>()
		.join("-");

	let stem = if stem.is_empty() { "plaques".to_string() } else { stem };
	format!("{stem}.{}", format.extension())
}

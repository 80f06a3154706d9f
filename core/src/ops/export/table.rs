use serde::Serialize;

use super::{ExportError, ExportSource};

#[derive(Serialize)]
struct CsvRow<'a> {
	id: u32,
	title: &'a str,
	address: Option<&'a str>,
	location: Option<&'a str>,
	postcode: Option<&'a str>,
	profession: Option<&'a str>,
	erected: Option<i32>,
	latitude: Option<f64>,
	longitude: Option<f64>,
	inscription: Option<&'a str>,
	visited: bool,
}

pub(super) fn to_csv(source: &ExportSource<'_>) -> Result<String, ExportError> {
	let mut writer = csv::Writer::from_writer(Vec::new());

	for &plaque in &source.plaques {
		writer.serialize(CsvRow {
			id: plaque.id,
			title: &plaque.title,
			address: plaque.address.as_deref(),
			location: plaque.location.as_deref(),
			postcode: plaque.postcode.as_deref(),
			profession: plaque.profession.as_deref(),
			erected: plaque.erected,
			latitude: plaque.latitude,
			longitude: plaque.longitude,
			inscription: plaque.inscription.as_deref(),
			visited: source.is_visited(plaque),
		})?;
	}

	// Headers are only emitted with the first record
	if source.plaques.is_empty() {
		writer.write_record([
			"id",
			"title",
			"address",
			"location",
			"postcode",
			"profession",
			"erected",
			"latitude",
			"longitude",
			"inscription",
			"visited",
		])?;
	}

	let bytes = writer
		.into_inner()
		.map_err(|e| csv::Error::from(e.into_error()))?;
	Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub(super) fn to_json(source: &ExportSource<'_>) -> Result<String, ExportError> {
	Ok(serde_json::to_string_pretty(&source.plaques)?)
}

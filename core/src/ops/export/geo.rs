use serde_json::{json, Value};

use super::{escape_markup, ExportError, ExportSource};

pub(super) fn to_geojson(source: &ExportSource<'_>) -> Result<String, ExportError> {
	let mut features: Vec<Value> = source
		.located()
		.map(|(plaque, coords)| {
			json!({
				"type": "Feature",
				"geometry": {
					"type": "Point",
					"coordinates": [coords.lng, coords.lat],
				},
				"properties": {
					"id": plaque.id,
					"title": plaque.title,
					"address": plaque.address,
					"profession": plaque.profession,
					"erected": plaque.erected,
					"visited": source.is_visited(plaque),
				},
			})
		})
		.collect();

	if let Some(path) = &source.path {
		features.push(json!({
			"type": "Feature",
			"geometry": {
				"type": "LineString",
				"coordinates": path.iter().map(|c| [c.lng, c.lat]).collect::<Vec<_>>(),
			},
			"properties": { "name": source.title },
		}));
	}

	Ok(serde_json::to_string_pretty(&json!({
		"type": "FeatureCollection",
		"features": features,
	}))?)
}

pub(super) fn to_gpx(source: &ExportSource<'_>) -> String {
	let mut gpx = String::from(
		"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<gpx version=\"1.1\" creator=\"plaques\" xmlns=\"http://www.topografix.com/GPX/1/1\">\n",
	);

	gpx.push_str("  <metadata>\n");
	gpx.push_str(&format!("    <name>{}</name>\n", escape_markup(&source.title)));
	if let Some(description) = &source.description {
		gpx.push_str(&format!("    <desc>{}</desc>\n", escape_markup(description)));
	}
	gpx.push_str(&format!(
		"    <time>{}</time>\n",
		source.generated_at.format("%Y-%m-%dT%H:%M:%SZ")
	));
	gpx.push_str("  </metadata>\n");

	for (plaque, coords) in source.located() {
		gpx.push_str(&format!(
			"  <wpt lat=\"{}\" lon=\"{}\">\n",
			coords.lat, coords.lng
		));
		gpx.push_str(&format!("    <name>{}</name>\n", escape_markup(&plaque.title)));
		if let Some(desc) = waypoint_description(plaque) {
			gpx.push_str(&format!("    <desc>{}</desc>\n", escape_markup(&desc)));
		}
		gpx.push_str("  </wpt>\n");
	}

	if source.path.is_some() {
		gpx.push_str("  <rte>\n");
		gpx.push_str(&format!("    <name>{}</name>\n", escape_markup(&source.title)));
		for (plaque, coords) in source.located() {
			gpx.push_str(&format!(
				"    <rtept lat=\"{}\" lon=\"{}\"><name>{}</name></rtept>\n",
				coords.lat,
				coords.lng,
				escape_markup(&plaque.title)
			));
		}
		gpx.push_str("  </rte>\n");
	}

	gpx.push_str("</gpx>\n");
	gpx
}

fn waypoint_description(plaque: &crate::domain::Plaque) -> Option<String> {
	let parts: Vec<&str> = [
		plaque.profession.as_deref(),
		plaque.address.as_deref(),
		plaque.inscription.as_deref(),
	]
	.into_iter()
	.filter_map(pq_utils::non_blank)
	.collect();

	(!parts.is_empty()).then(|| parts.join(" - "))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::{Coordinates, Plaque};

	fn plaques() -> Vec<Plaque> {
		vec![
			Plaque {
				profession: Some("Librettist & lyricist".to_string()),
				..Plaque::new(1, "W. S. Gilbert <lived here>").with_coordinates(51.4943, -0.1870)
			},
			Plaque::new(2, "Nowhere in particular"),
			Plaque::new(3, "Arthur Sullivan").with_coordinates(51.5100, -0.1200),
		]
	}

	#[test]
	fn geojson_skips_unlocated_and_adds_path() {
		let plaques = plaques();
		let source = ExportSource::new("Savoy", plaques.iter().collect()).with_path(vec![
			Coordinates::new(51.4943, -0.1870),
			Coordinates::new(51.5100, -0.1200),
		]);

		let value: Value =
			serde_json::from_str(&to_geojson(&source).expect("geojson")).expect("valid json");
		let features = value["features"].as_array().expect("features");

		assert_eq!(features.len(), 3);
		assert_eq!(features[0]["geometry"]["coordinates"], json!([-0.1870, 51.4943]));
		assert_eq!(features[1]["properties"]["id"], json!(3));
		assert_eq!(features[2]["geometry"]["type"], json!("LineString"));
	}

	#[test]
	fn gpx_escapes_text_and_lists_waypoints() {
		let plaques = plaques();
		let gpx = to_gpx(&ExportSource::new("Gilbert & Sullivan", plaques.iter().collect()));

		assert!(gpx.contains("<name>Gilbert &amp; Sullivan</name>"));
		assert!(gpx.contains("<name>W. S. Gilbert &lt;lived here&gt;</name>"));
		assert!(gpx.contains("<desc>Librettist &amp; lyricist</desc>"));
		assert_eq!(gpx.matches("<wpt ").count(), 2);
		assert!(!gpx.contains("<rte>"));
	}
}

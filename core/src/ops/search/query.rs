//! Plaque search query implementation

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
	fields::{searchable_fields, SearchField},
	input::{is_searchable, PlaqueSearchInput, DEFAULT_LIMIT},
	output::{MatchedField, PlaqueSearchOutput, PlaqueSearchResult},
	scoring::{RelevanceCalculator, MIN_BEST_FIELD_SCORE},
	SearchError,
};
use crate::domain::{Plaque, PlaqueIndex};

pub const FALLBACK_SUBTITLE: &str = "Historic plaque";
pub const SUBTITLE_SEPARATOR: &str = " · ";

/// Top [`DEFAULT_LIMIT`] plaques for `query`, best first
pub fn search_plaques(query: &str, plaques: &[Plaque]) -> Vec<PlaqueSearchResult> {
	let mut results = rank_plaques(query, plaques);
	results.truncate(DEFAULT_LIMIT);
	results
}

/// Every plaque that matches `query`, best first
pub fn rank_plaques(query: &str, plaques: &[Plaque]) -> Vec<PlaqueSearchResult> {
	if !is_searchable(query) {
		return Vec::new();
	}

	let calculator = RelevanceCalculator::new(query);
	let mut results: Vec<PlaqueSearchResult> = plaques
		.iter()
		.filter_map(|plaque| score_plaque(&calculator, plaque))
		.collect();

	results.sort_by(|a, b| {
		b.score
			.total_cmp(&a.score)
			.then_with(|| a.title.cmp(&b.title))
	});

	debug!(query = calculator.query(), matches = results.len(), "Ranked plaques");
	results
}

fn score_plaque(calculator: &RelevanceCalculator, plaque: &Plaque) -> Option<PlaqueSearchResult> {
	let coordinates = plaque.coordinates()?;

	let mut score = 0.0;
	let mut best_field_score: f64 = 0.0;
	let mut matched_fields = Vec::new();

	for field in searchable_fields(plaque) {
		let field_score = calculator.field_score(&field.value);
		if field_score <= 0.0 {
			continue;
		}

		score += field_score * field.weight;
		best_field_score = best_field_score.max(field_score);
		matched_fields.push(MatchedField {
			field: field.field,
			value: field.value.into_owned(),
			score: field_score,
		});
	}

	if best_field_score <= MIN_BEST_FIELD_SCORE {
		return None;
	}

	Some(PlaqueSearchResult {
		plaque_id: plaque.id,
		title: plaque.title.clone(),
		subtitle: build_subtitle(plaque, &matched_fields),
		score,
		best_field_score,
		matched_fields,
		coordinates,
	})
}

/// Location (or the street part of the address), then the profession when it
/// matched or nothing better is known. Postcode or a generic label otherwise.
pub fn build_subtitle(plaque: &Plaque, matched_fields: &[MatchedField]) -> String {
	let location = pq_utils::non_blank(plaque.location.as_deref());
	let profession = pq_utils::non_blank(plaque.profession.as_deref());
	let profession_matched = matched_fields
		.iter()
		.any(|m| m.field == SearchField::Profession);

	let mut parts = Vec::with_capacity(2);
	if let Some(place) = location.or_else(|| plaque.short_address()) {
		parts.push(place);
	}
	if let Some(profession) = profession {
		if profession_matched || location.is_none() {
			parts.push(profession);
		}
	}

	if !parts.is_empty() {
		return parts.join(SUBTITLE_SEPARATOR);
	}

	pq_utils::non_blank(plaque.postcode.as_deref())
		.unwrap_or(FALLBACK_SUBTITLE)
		.to_string()
}

/// Plaque search query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaqueSearchQuery {
	pub input: PlaqueSearchInput,
}

impl PlaqueSearchQuery {
	pub fn new(input: PlaqueSearchInput) -> Self {
		Self { input }
	}

	pub fn execute(self, index: &PlaqueIndex) -> Result<PlaqueSearchOutput, SearchError> {
		let start_time = Instant::now();

		self.input.validate().map_err(SearchError::InvalidInput)?;

		let PlaqueSearchInput { query, limit } = self.input;
		if !is_searchable(&query) {
			return Ok(PlaqueSearchOutput::empty(query));
		}

		let mut results = rank_plaques(&query, index.all());
		let total_found = results.len() as u64;
		results.truncate(limit);

		Ok(PlaqueSearchOutput::success(
			query,
			results,
			total_found,
			start_time.elapsed().as_millis() as u64,
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn located(id: u32, title: &str) -> Plaque {
		Plaque::new(id, title).with_coordinates(51.5, -0.12)
	}

	#[test]
	fn subtitle_prefers_location_then_address() {
		let with_location = Plaque {
			location: Some("Camden".to_string()),
			address: Some("48 Doughty Street, Holborn".to_string()),
			profession: Some("Novelist".to_string()),
			..located(1, "Charles Dickens")
		};
		assert_eq!(build_subtitle(&with_location, &[]), "Camden");

		let matched = [MatchedField {
			field: SearchField::Profession,
			value: "Novelist".to_string(),
			score: 1.0,
		}];
		assert_eq!(build_subtitle(&with_location, &matched), "Camden · Novelist");

		let without_location = Plaque {
			location: None,
			..with_location.clone()
		};
		assert_eq!(
			build_subtitle(&without_location, &[]),
			"48 Doughty Street · Novelist"
		);
	}

	#[test]
	fn subtitle_falls_back_to_postcode_then_generic() {
		let with_postcode = Plaque {
			postcode: Some("WC1N 2LX".to_string()),
			..located(1, "Someone")
		};
		assert_eq!(build_subtitle(&with_postcode, &[]), "WC1N 2LX");
		assert_eq!(build_subtitle(&located(2, "Someone"), &[]), FALLBACK_SUBTITLE);
	}

	#[test]
	fn query_respects_limit_and_reports_total() {
		let index = PlaqueIndex::new(
			(1..=15)
				.map(|i| located(i, &format!("Blue plaque number {i}")))
				.collect(),
		);

		let output = PlaqueSearchQuery::new(PlaqueSearchInput::simple("blue plaque").with_limit(5))
			.execute(&index)
			.expect("valid query");

		assert_eq!(output.results.len(), 5);
		assert_eq!(output.total_found, 15);
	}

	#[test]
	fn invalid_input_is_an_error() {
		let index = PlaqueIndex::default();
		let result = PlaqueSearchQuery::new(PlaqueSearchInput::simple("dickens").with_limit(0))
			.execute(&index);
		assert!(matches!(result, Err(SearchError::InvalidInput(_))));
	}
}

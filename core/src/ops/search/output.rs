//! Output for plaque search operations

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fields::SearchField;
use crate::domain::{Coordinates, PlaqueId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaqueSearchOutput {
	pub query: String,
	pub results: Vec<PlaqueSearchResult>,
	/// Matches before truncation to the limit
	pub total_found: u64,
	pub search_id: Uuid,
	pub execution_time_ms: u64,
}

impl PlaqueSearchOutput {
	pub fn success(
		query: String,
		results: Vec<PlaqueSearchResult>,
		total_found: u64,
		execution_time_ms: u64,
	) -> Self {
		Self {
			query,
			results,
			total_found,
			search_id: Uuid::new_v4(),
			execution_time_ms,
		}
	}

	pub fn empty(query: String) -> Self {
		Self::success(query, Vec::new(), 0, 0)
	}
}

/// Individual search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaqueSearchResult {
	pub plaque_id: PlaqueId,
	pub title: String,
	pub subtitle: String,
	/// Sum of `field score * field weight` over matched fields
	pub score: f64,
	/// Highest unweighted field score
	pub best_field_score: f64,
	pub matched_fields: Vec<MatchedField>,
	pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedField {
	pub field: SearchField,
	pub value: String,
	pub score: f64,
}

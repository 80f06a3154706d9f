//! Plaque search operations

pub mod debounce;
pub mod fields;
pub mod input;
pub mod output;
pub mod query;
pub mod scoring;

use thiserror::Error;

pub use debounce::SearchDebouncer;
pub use fields::{extract_person_names, SearchField};
pub use input::PlaqueSearchInput;
pub use output::{MatchedField, PlaqueSearchOutput, PlaqueSearchResult};
pub use query::{rank_plaques, search_plaques, PlaqueSearchQuery};
pub use scoring::{levenshtein, similarity, RelevanceCalculator};

#[derive(Debug, Error)]
pub enum SearchError {
	#[error("invalid search input: {0}")]
	InvalidInput(String),
}

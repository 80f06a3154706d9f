//! Input types for plaque search

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;
pub const MIN_QUERY_LEN: usize = 2;
pub const MAX_QUERY_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaqueSearchInput {
	pub query: String,
	#[serde(default = "default_limit")]
	pub limit: usize,
}

fn default_limit() -> usize {
	DEFAULT_LIMIT
}

impl PlaqueSearchInput {
	pub fn simple(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			limit: DEFAULT_LIMIT,
		}
	}

	pub fn with_limit(mut self, limit: usize) -> Self {
		self.limit = limit;
		self
	}

	/// Short or empty queries are not errors, they just match nothing
	pub fn validate(&self) -> Result<(), String> {
		if self.query.chars().count() > MAX_QUERY_LEN {
			return Err(format!(
				"Search query cannot exceed {MAX_QUERY_LEN} characters"
			));
		}

		if self.limit == 0 || self.limit > MAX_LIMIT {
			return Err(format!("Limit must be between 1 and {MAX_LIMIT}"));
		}

		Ok(())
	}

	pub fn is_searchable(&self) -> bool {
		is_searchable(&self.query)
	}
}

pub fn is_searchable(query: &str) -> bool {
	query.trim().chars().count() >= MIN_QUERY_LEN
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_queries_are_valid_but_not_searchable() {
		let input = PlaqueSearchInput::simple(" d ");
		assert!(input.validate().is_ok());
		assert!(!input.is_searchable());
		assert!(PlaqueSearchInput::simple("di").is_searchable());
	}

	#[test]
	fn rejects_bad_limits_and_long_queries() {
		assert!(PlaqueSearchInput::simple("dickens")
			.with_limit(0)
			.validate()
			.is_err());
		assert!(PlaqueSearchInput::simple("x".repeat(MAX_QUERY_LEN + 1))
			.validate()
			.is_err());
	}
}

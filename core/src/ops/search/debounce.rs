//! Debounced search for interactive callers
//!
//! Each keystroke submits the current query. A submission only runs once the
//! input has been quiet for the debounce window; anything submitted in the
//! meantime supersedes it.

use std::{
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
	time::Duration,
};

use tracing::trace;

use super::{
	input::is_searchable,
	output::PlaqueSearchResult,
	query::rank_plaques,
};
use crate::{config::SearchConfig, domain::PlaqueIndex};

pub struct SearchDebouncer {
	index: Arc<PlaqueIndex>,
	delay: Duration,
	limit: usize,
	generation: AtomicU64,
}

impl SearchDebouncer {
	pub fn new(index: Arc<PlaqueIndex>, delay: Duration, limit: usize) -> Self {
		Self {
			index,
			delay,
			limit,
			generation: AtomicU64::new(0),
		}
	}

	pub fn from_config(index: Arc<PlaqueIndex>, config: &SearchConfig) -> Self {
		Self::new(
			index,
			Duration::from_millis(config.debounce_ms),
			config.max_results,
		)
	}

	/// Resolves to `None` when a later submission superseded this one.
	///
	/// Queries too short to search resolve at once to an empty list, and still
	/// cancel whatever was pending.
	pub async fn submit(&self, query: &str) -> Option<Vec<PlaqueSearchResult>> {
		let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

		if !is_searchable(query) {
			return Some(Vec::new());
		}

		tokio::time::sleep(self.delay).await;

		if self.generation.load(Ordering::SeqCst) != generation {
			trace!(%query, "Search superseded");
			return None;
		}

		let mut results = rank_plaques(query, self.index.all());
		results.truncate(self.limit);
		Some(results)
	}
}

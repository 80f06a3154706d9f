//! Per-user statistics

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::{Collection, Favorite, PlaqueIndex, Visit};

pub const TOP_PROFESSIONS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
	pub total_plaques: usize,
	/// Distinct plaques visited
	pub visited: usize,
	pub visited_percent: f64,
	pub favorites: usize,
	pub collections: usize,
	pub total_visits: usize,
	pub first_visit: Option<DateTime<Utc>>,
	pub last_visit: Option<DateTime<Utc>>,
	/// Keyed by `YYYY-MM`
	pub visits_by_month: BTreeMap<String, usize>,
	/// Professions of visited plaques, most common first
	pub top_professions: Vec<(String, usize)>,
}

impl UserStats {
	pub fn compute(
		index: &PlaqueIndex,
		visits: &[Visit],
		favorites: &[Favorite],
		collections: &[Collection],
	) -> Self {
		let visited: BTreeSet<_> = visits.iter().map(|v| v.plaque_id).collect();

		let visited_percent = if index.is_empty() {
			0.0
		} else {
			visited.len() as f64 / index.len() as f64 * 100.0
		};

		let mut visits_by_month = BTreeMap::new();
		for visit in visits {
			*visits_by_month
				.entry(visit.visited_at.format("%Y-%m").to_string())
				.or_insert(0) += 1;
		}

		let mut professions: HashMap<&str, usize> = HashMap::new();
		for plaque in index.resolve(&visited) {
			if let Some(profession) = pq_utils::non_blank(plaque.profession.as_deref()) {
				*professions.entry(profession).or_insert(0) += 1;
			}
		}

		let top_professions = professions
			.into_iter()
			.sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
			.take(TOP_PROFESSIONS)
			.map(|(profession, count)| (profession.to_string(), count))
			.collect();

		Self {
			total_plaques: index.len(),
			visited: visited.len(),
			visited_percent,
			favorites: favorites.len(),
			collections: collections.len(),
			total_visits: visits.len(),
			first_visit: visits.iter().map(|v| v.visited_at).min(),
			last_visit: visits.iter().map(|v| v.visited_at).max(),
			visits_by_month,
			top_professions,
		}
	}
}

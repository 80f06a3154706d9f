//! Visiting order for a set of stops
//!
//! Greedy nearest neighbour from the first stop, then 2-opt passes to undo
//! the crossings the greedy walk leaves behind. Distances are great-circle,
//! so this plans the order only; walking distances come later.

use crate::domain::{haversine_km, Coordinates};

pub const MAX_TWO_OPT_PASSES: usize = 5;

/// Returns a permutation of `0..points.len()` that starts with `0`
pub fn optimize_order(points: &[Coordinates]) -> Vec<usize> {
	let mut order = nearest_neighbor(points);
	two_opt(points, &mut order);
	order
}

fn nearest_neighbor(points: &[Coordinates]) -> Vec<usize> {
	let mut order: Vec<usize> = (0..points.len()).collect();

	for i in 0..order.len().saturating_sub(1) {
		let current = points[order[i]];
		let mut best_dist = f64::MAX;
		let mut best_idx = i + 1;

		for (j, &candidate) in order.iter().enumerate().skip(i + 1) {
			let d = haversine_km(current, points[candidate]);
			if d < best_dist {
				best_dist = d;
				best_idx = j;
			}
		}

		order.swap(i + 1, best_idx);
	}

	order
}

fn two_opt(points: &[Coordinates], order: &mut [usize]) {
	let len = order.len();
	if len < 4 {
		return;
	}

	let dist = |a: usize, b: usize| haversine_km(points[a], points[b]);

	let mut improved = true;
	let mut passes = 0;

	while improved && passes < MAX_TWO_OPT_PASSES {
		improved = false;
		passes += 1;

		for i in 0..(len - 2) {
			for j in (i + 2)..(len - 1) {
				let current = dist(order[i], order[i + 1]) + dist(order[j], order[j + 1]);
				let swapped = dist(order[i], order[j]) + dist(order[i + 1], order[j + 1]);

				// Small epsilon so float noise can't flip segments back and forth
				if swapped + 1e-9 < current {
					order[i + 1..=j].reverse();
					improved = true;
				}
			}
		}
	}
}

/// Total great-circle length of the path visiting `points` in `order`
pub fn path_length_km(points: &[Coordinates], order: &[usize]) -> f64 {
	order
		.windows(2)
		.map(|pair| haversine_km(points[pair[0]], points[pair[1]]))
		.sum()
}

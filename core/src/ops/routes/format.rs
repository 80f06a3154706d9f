//! Human-readable distances and durations

/// `"850 m"` below one kilometre, `"1.2 km"` above
pub fn format_distance(km: f64) -> String {
	let metres = (km * 1000.0).round();
	if metres < 1000.0 {
		format!("{metres:.0} m")
	} else {
		format!("{km:.1} km")
	}
}

/// `"25 min"`, or `"1 h 5 min"` from an hour up
pub fn format_duration(minutes: f64) -> String {
	let total = minutes.round().max(0.0) as u64;
	let (hours, mins) = (total / 60, total % 60);

	match (hours, mins) {
		(0, m) => format!("{m} min"),
		(h, 0) => format!("{h} h"),
		(h, m) => format!("{h} h {m} min"),
	}
}

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

pub fn table(header: &[&str]) -> Table {
	let mut table = Table::new();
	table.load_preset(UTF8_FULL).set_header(header.to_vec());
	table
}

/// Clips long values for table cells
pub fn truncate(value: &str, max_chars: usize) -> String {
	if value.chars().count() <= max_chars {
		return value.to_string();
	}
	let clipped: String = value.chars().take(max_chars.saturating_sub(1)).collect();
	format!("{clipped}…")
}

pub fn stars(rating: Option<u8>) -> String {
	rating.map_or_else(String::new, |r| "★".repeat(usize::from(r)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn truncates_on_char_boundaries() {
		assert_eq!(truncate("Brontë", 10), "Brontë");
		assert_eq!(truncate("Charles Dickens", 8), "Charles…");
	}

	#[test]
	fn renders_rating_as_stars() {
		assert_eq!(stars(Some(3)), "★★★");
		assert_eq!(stars(None), "");
	}
}

pub mod error;

/// Returns `None` for strings that are empty once trimmed
pub fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|s| !s.is_empty())
}

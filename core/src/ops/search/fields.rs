//! Searchable fields of a plaque and their weights

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::domain::Plaque;

pub const TITLE_WEIGHT: f64 = 1.0;
pub const PRIMARY_NAME_WEIGHT: f64 = 0.95;
pub const SECONDARY_NAME_WEIGHT: f64 = 0.8;
pub const PROFESSION_WEIGHT: f64 = 0.7;
pub const DESCRIPTION_WEIGHT: f64 = 0.6;
pub const LOCATION_WEIGHT: f64 = 0.6;
pub const POSTCODE_WEIGHT: f64 = 0.4;
pub const ADDRESS_WEIGHT: f64 = 0.4;
pub const INSCRIPTION_WEIGHT: f64 = 0.3;
pub const ORGANISATION_WEIGHT: f64 = 0.4;

/// Two or more consecutive capitalised words, e.g. "Charles Dickens"
static PERSON_NAME_RE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").expect("valid name regex"));

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SearchField {
	Title,
	PersonName,
	Profession,
	Description,
	Location,
	Postcode,
	Address,
	Inscription,
	Organisation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedField<'a> {
	pub field: SearchField,
	pub value: Cow<'a, str>,
	pub weight: f64,
}

impl<'a> WeightedField<'a> {
	fn borrowed(field: SearchField, value: &'a str, weight: f64) -> Self {
		Self {
			field,
			value: Cow::Borrowed(value),
			weight,
		}
	}
}

/// Person names found in a title, in order of appearance, without repeats
pub fn extract_person_names(title: &str) -> Vec<String> {
	let mut names: Vec<String> = Vec::new();
	for m in PERSON_NAME_RE.find_iter(title) {
		let name = m.as_str().to_string();
		if !names.contains(&name) {
			names.push(name);
		}
	}
	names
}

pub fn searchable_fields(plaque: &Plaque) -> Vec<WeightedField<'_>> {
	let mut fields = vec![WeightedField::borrowed(
		SearchField::Title,
		&plaque.title,
		TITLE_WEIGHT,
	)];

	fields.extend(
		extract_person_names(&plaque.title)
			.into_iter()
			.enumerate()
			.map(|(i, name)| WeightedField {
				field: SearchField::PersonName,
				value: Cow::Owned(name),
				weight: if i == 0 {
					PRIMARY_NAME_WEIGHT
				} else {
					SECONDARY_NAME_WEIGHT
				},
			}),
	);

	let optional = [
		(SearchField::Profession, &plaque.profession, PROFESSION_WEIGHT),
		(SearchField::Description, &plaque.description, DESCRIPTION_WEIGHT),
		(SearchField::Location, &plaque.location, LOCATION_WEIGHT),
		(SearchField::Postcode, &plaque.postcode, POSTCODE_WEIGHT),
		(SearchField::Address, &plaque.address, ADDRESS_WEIGHT),
		(SearchField::Inscription, &plaque.inscription, INSCRIPTION_WEIGHT),
	];

	fields.extend(optional.into_iter().filter_map(|(field, value, weight)| {
		pq_utils::non_blank(value.as_deref()).map(|value| WeightedField::borrowed(field, value, weight))
	}));

	fields.extend(
		plaque
			.organisations
			.iter()
			.filter(|org| !org.trim().is_empty())
			.map(|org| WeightedField::borrowed(SearchField::Organisation, org, ORGANISATION_WEIGHT)),
	);

	fields
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_capitalised_word_pairs() {
		assert_eq!(
			extract_person_names("Charles Dickens lived here"),
			vec!["Charles Dickens"]
		);
		assert_eq!(
			extract_person_names("Sylvia Pankhurst and Emmeline Pankhurst, Sylvia Pankhurst"),
			vec!["Sylvia Pankhurst", "Emmeline Pankhurst"]
		);
		assert!(extract_person_names("lived here 1839-1851").is_empty());
	}

	#[test]
	fn weights_names_and_skips_blank_fields() {
		let plaque = Plaque {
			profession: Some("Novelist".to_string()),
			location: Some("  ".to_string()),
			organisations: vec!["English Heritage".to_string()],
			..Plaque::new(1, "Charles Dickens and Wilkie Collins met here")
		};

		let fields = searchable_fields(&plaque);
		let summary: Vec<(SearchField, &str, f64)> = fields
			.iter()
			.map(|f| (f.field, f.value.as_ref(), f.weight))
			.collect();

		assert_eq!(
			summary,
			vec![
				(SearchField::Title, "Charles Dickens and Wilkie Collins met here", TITLE_WEIGHT),
				(SearchField::PersonName, "Charles Dickens", PRIMARY_NAME_WEIGHT),
				(SearchField::PersonName, "Wilkie Collins", SECONDARY_NAME_WEIGHT),
				(SearchField::Profession, "Novelist", PROFESSION_WEIGHT),
				(SearchField::Organisation, "English Heritage", ORGANISATION_WEIGHT),
			]
		);
	}
}

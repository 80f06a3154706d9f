//! Relevance scoring for plaque search

/// Exact (case-insensitive) match of the whole field
pub const EXACT_SCORE: f64 = 1.0;
/// Field starts with the query
pub const PREFIX_SCORE: f64 = 0.9;
/// Field contains the query
pub const SUBSTRING_SCORE: f64 = 0.8;
/// A word of the field contains, is contained by, or nearly equals the query
pub const PARTIAL_WORD_SCORE: f64 = 0.6;

/// Word-level similarity needed for a partial-word match
pub const PARTIAL_WORD_SIMILARITY: f64 = 0.7;
/// Whole-field similarity needed before a fuzzy score is given
pub const FUZZY_SIMILARITY: f64 = 0.6;
pub const FUZZY_FACTOR: f64 = 0.5;
/// Per-word similarity needed before a word-level fuzzy score is given
pub const WORD_FUZZY_SIMILARITY: f64 = 0.7;
pub const WORD_FUZZY_FACTOR: f64 = 0.4;

/// Plaques whose best field scores at or below this are dropped
pub const MIN_BEST_FIELD_SCORE: f64 = 0.3;

/// Edit distance over `char`s, using two rows of the classic table
pub fn levenshtein(a: &str, b: &str) -> usize {
	let a: Vec<char> = a.chars().collect();
	let b: Vec<char> = b.chars().collect();

	if a.is_empty() {
		return b.len();
	}
	if b.is_empty() {
		return a.len();
	}

	let mut prev: Vec<usize> = (0..=b.len()).collect();
	let mut curr = vec![0; b.len() + 1];

	for (i, ca) in a.iter().enumerate() {
		curr[0] = i + 1;
		for (j, cb) in b.iter().enumerate() {
			let substitution = prev[j] + usize::from(ca != cb);
			curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
		}
		std::mem::swap(&mut prev, &mut curr);
	}

	prev[b.len()]
}

/// `(max_len - distance) / max_len`, in `[0, 1]`
pub fn similarity(a: &str, b: &str) -> f64 {
	let max_len = a.chars().count().max(b.chars().count());
	if max_len == 0 {
		return 1.0;
	}

	(max_len - levenshtein(a, b)) as f64 / max_len as f64
}

/// Scores fields against one query
pub struct RelevanceCalculator {
	query: String,
	query_words: Vec<String>,
}

impl RelevanceCalculator {
	pub fn new(query: &str) -> Self {
		let query = query.trim().to_lowercase();
		let query_words = query.split_whitespace().map(str::to_string).collect();
		Self { query, query_words }
	}

	pub fn query(&self) -> &str {
		&self.query
	}

	/// Unweighted score of a single field, `0.0` when nothing matches
	pub fn field_score(&self, field: &str) -> f64 {
		let field = field.trim().to_lowercase();
		if field.is_empty() || self.query.is_empty() {
			return 0.0;
		}

		if field == self.query {
			return EXACT_SCORE;
		}

		if field.starts_with(&self.query) {
			return PREFIX_SCORE;
		}

		if field.contains(&self.query) {
			return SUBSTRING_SCORE;
		}

		if self.matches_partial_word(&field) {
			return PARTIAL_WORD_SCORE;
		}

		self.fuzzy_score(&field)
	}

	fn matches_partial_word(&self, field: &str) -> bool {
		field.split_whitespace().any(|word| {
			word.contains(&self.query)
				|| self.query.contains(word)
				|| similarity(word, &self.query) > PARTIAL_WORD_SIMILARITY
		})
	}

	fn fuzzy_score(&self, field: &str) -> f64 {
		let mut score = 0.0;

		let whole = similarity(field, &self.query);
		if whole > FUZZY_SIMILARITY {
			score = whole * FUZZY_FACTOR;
		}

		let per_word = self.word_similarity(field);
		if per_word > WORD_FUZZY_SIMILARITY {
			score = f64::max(score, per_word * WORD_FUZZY_FACTOR);
		}

		score
	}

	/// Mean, over query words, of each word's best similarity to any field word
	fn word_similarity(&self, field: &str) -> f64 {
		let field_words: Vec<&str> = field.split_whitespace().collect();
		if field_words.is_empty() || self.query_words.is_empty() {
			return 0.0;
		}

		let total: f64 = self
			.query_words
			.iter()
			.map(|query_word| {
				field_words
					.iter()
					.map(|field_word| similarity(query_word, field_word))
					.fold(0.0, f64::max)
			})
			.sum();

		total / self.query_words.len() as f64
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn levenshtein_basics() {
		assert_eq!(levenshtein("", ""), 0);
		assert_eq!(levenshtein("abc", ""), 3);
		assert_eq!(levenshtein("kitten", "sitting"), 3);
		assert_eq!(levenshtein("dickens", "dikens"), 1);
		assert_eq!(levenshtein("brontë", "bronte"), 1);
	}

	#[test]
	fn similarity_is_reflexive_and_symmetric() {
		for (a, b) in [
			("dickens", "dikens"),
			("woolf", "wolfe"),
			("", "x"),
			("Pankhurst", "pankhurst"),
		] {
			assert_eq!(similarity(a, a), 1.0);
			assert_eq!(similarity(a, b), similarity(b, a));
		}
	}

	#[test]
	fn match_kinds_are_strictly_ordered() {
		let calc = RelevanceCalculator::new("Dickens");

		let exact = calc.field_score("dickens");
		let prefix = calc.field_score("Dickens House");
		let substring = calc.field_score("Charles Dickens");
		let fuzzy = RelevanceCalculator::new("dikens").field_score("Charles Dickens");

		assert_eq!(exact, EXACT_SCORE);
		assert_eq!(prefix, PREFIX_SCORE);
		assert_eq!(substring, SUBSTRING_SCORE);
		assert!(exact > prefix && prefix > substring && substring > fuzzy && fuzzy > 0.0);
	}

	#[test]
	fn typo_matches_as_partial_word() {
		let calc = RelevanceCalculator::new("dikens");
		assert_eq!(
			calc.field_score("Charles Dickens lived here"),
			PARTIAL_WORD_SCORE
		);
	}

	#[test]
	fn multi_word_typo_uses_word_similarity() {
		let calc = RelevanceCalculator::new("charls dikens");
		let score = calc.field_score("Charles Dickens lived here");
		assert!(score > MIN_BEST_FIELD_SCORE, "got {score}");
		assert!(score < PARTIAL_WORD_SCORE);
	}

	#[test]
	fn unrelated_field_scores_zero() {
		let calc = RelevanceCalculator::new("pankhurst");
		assert_eq!(calc.field_score("Isambard Kingdom Brunel"), 0.0);
		assert_eq!(calc.field_score("   "), 0.0);
	}
}

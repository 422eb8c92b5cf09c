//! Question bank - the immutable quiz catalog and its sampler
//!
//! The bank is loaded once, validated, and then only read. Sampling is a pure
//! function of the catalog, the set of indices already used in the current
//! round, and the caller's RNG.
//!
//! # Rounds and wrapping
//!
//! Indices drawn for earlier challenges are excluded from later draws. When
//! fewer than `k` unused indices remain, the draw starts a new round: the
//! pool becomes the whole catalog again and the returned used-set holds only
//! the indices of this draw.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rng::SimpleRng;
use crate::types::{QuestionItem, MIN_QUESTION_COUNT};

const BUILTIN_QUESTIONS: &str = include_str!("../data/questions.json");

/// Indices of the catalog already presented in the current round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsedQuestions(BTreeSet<usize>);

impl UsedQuestions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, index: usize) {
        self.0.insert(index);
    }

    /// Ascending iteration
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for UsedQuestions {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of one [`QuestionBank::sample_unused`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    /// Drawn catalog indices, in draw order
    pub indices: Vec<usize>,
    /// Used-set to carry into the next draw
    pub used: UsedQuestions,
    /// The unused pool was too small and this draw started a new round
    pub wrapped: bool,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    questions: Vec<QuestionItem>,
}

/// Validated, immutable question catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    items: Vec<QuestionItem>,
}

impl QuestionBank {
    /// Build a bank, rejecting catalogs the session cannot play with.
    pub fn new(items: Vec<QuestionItem>) -> Result<Self, ConfigError> {
        if items.len() < MIN_QUESTION_COUNT {
            return Err(ConfigError::TooFewQuestions {
                found: items.len(),
                required: MIN_QUESTION_COUNT,
            });
        }

        for (index, item) in items.iter().enumerate() {
            validate_item(index, item)?;
        }

        Ok(Self { items })
    }

    /// Parse a `{ "questions": [...] }` document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.questions)
    }

    /// The catalog bundled with the game.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json_str(BUILTIN_QUESTIONS)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuestionItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    /// Draw `k` distinct indices that are not in `used`.
    ///
    /// Wraps to the full catalog when fewer than `k` unused indices remain.
    ///
    /// # Panics
    ///
    /// Panics if `k` is zero or larger than the catalog.
    pub fn sample_unused(&self, k: usize, used: &UsedQuestions, rng: &mut SimpleRng) -> Draw {
        assert!(
            k > 0 && k <= self.items.len(),
            "cannot draw {} questions from a catalog of {}",
            k,
            self.items.len()
        );

        let mut pool: Vec<usize> = (0..self.items.len()).filter(|i| !used.contains(*i)).collect();
        let wrapped = pool.len() < k;
        if wrapped {
            pool = (0..self.items.len()).collect();
        }

        let mut indices = Vec::with_capacity(k);
        while indices.len() < k {
            let pick = rng.next_below(pool.len());
            indices.push(pool.remove(pick));
        }

        let used = if wrapped {
            indices.iter().copied().collect()
        } else {
            used.iter().chain(indices.iter().copied()).collect()
        };

        Draw {
            indices,
            used,
            wrapped,
        }
    }
}

fn validate_item(index: usize, item: &QuestionItem) -> Result<(), ConfigError> {
    if item.prompt.trim().is_empty() {
        return Err(ConfigError::EmptyPrompt { index });
    }
    if item.options.is_empty() {
        return Err(ConfigError::EmptyOptions { index });
    }

    let mut seen = BTreeSet::new();
    for option in &item.options {
        if !seen.insert(option.as_str()) {
            return Err(ConfigError::DuplicateOption {
                index,
                option: option.clone(),
            });
        }
    }

    if !seen.contains(item.correct_option.as_str()) {
        return Err(ConfigError::MissingCorrectOption { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_of(n: usize) -> QuestionBank {
        let items = (0..n)
            .map(|i| {
                let prompt = format!("q{}", i);
                QuestionItem::new(&prompt, &["yes", "no"], "yes")
            })
            .collect();
        QuestionBank::new(items).unwrap()
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let bank = QuestionBank::builtin().unwrap();
        assert!(bank.len() >= 9, "builtin catalog should cover several buildings");
    }

    #[test]
    fn rejects_small_catalog() {
        let items = vec![
            QuestionItem::new("a", &["x"], "x"),
            QuestionItem::new("b", &["x"], "x"),
        ];
        assert!(matches!(
            QuestionBank::new(items),
            Err(ConfigError::TooFewQuestions { found: 2, required: 3 })
        ));
    }

    #[test]
    fn rejects_missing_correct_option() {
        let mut items: Vec<_> = bank_of(3).items().to_vec();
        items[1].correct_option = "maybe".to_string();
        assert!(matches!(
            QuestionBank::new(items),
            Err(ConfigError::MissingCorrectOption { index: 1 })
        ));
    }

    #[test]
    fn rejects_duplicate_options() {
        let mut items: Vec<_> = bank_of(3).items().to_vec();
        items[2].options = vec!["yes".into(), "yes".into()];
        assert!(matches!(
            QuestionBank::new(items),
            Err(ConfigError::DuplicateOption { index: 2, .. })
        ));
    }

    #[test]
    fn rejects_empty_prompt_and_options() {
        let mut items: Vec<_> = bank_of(3).items().to_vec();
        items[0].prompt = "  ".into();
        assert!(matches!(
            QuestionBank::new(items),
            Err(ConfigError::EmptyPrompt { index: 0 })
        ));

        let mut items: Vec<_> = bank_of(3).items().to_vec();
        items[0].options.clear();
        assert!(matches!(
            QuestionBank::new(items),
            Err(ConfigError::EmptyOptions { index: 0 })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            QuestionBank::from_json_str("{\"questions\": 3}"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn draw_is_distinct_and_unused() {
        let bank = bank_of(10);
        let mut rng = SimpleRng::new(42);
        let used: UsedQuestions = [0, 1, 2].into_iter().collect();

        let draw = bank.sample_unused(3, &used, &mut rng);
        assert!(!draw.wrapped);
        assert_eq!(draw.indices.len(), 3);
        for i in &draw.indices {
            assert!(!used.contains(*i));
        }
        let mut sorted = draw.indices.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        assert_eq!(draw.used.len(), 6);
    }

    #[test]
    fn draw_wraps_when_pool_is_short() {
        // Catalog of 5 with {0,2,4} used leaves {1,3}: too few for 3.
        let bank = bank_of(5);
        let mut rng = SimpleRng::new(3);
        let used: UsedQuestions = [0, 2, 4].into_iter().collect();

        let draw = bank.sample_unused(3, &used, &mut rng);
        assert!(draw.wrapped);
        assert_eq!(draw.used.len(), 3);
        for i in &draw.indices {
            assert!(draw.used.contains(*i));
        }
    }

    #[test]
    fn exact_fit_does_not_wrap() {
        let bank = bank_of(6);
        let mut rng = SimpleRng::new(11);
        let used: UsedQuestions = [0, 1, 2].into_iter().collect();

        let draw = bank.sample_unused(3, &used, &mut rng);
        assert!(!draw.wrapped);
        let mut sorted = draw.indices.clone();
        sorted.sort();
        assert_eq!(sorted, vec![3, 4, 5]);
        assert_eq!(draw.used.len(), 6);
    }

    #[test]
    fn whole_catalog_draw_is_a_permutation() {
        let bank = bank_of(3);
        let mut rng = SimpleRng::new(8);
        let draw = bank.sample_unused(3, &UsedQuestions::new(), &mut rng);
        let mut sorted = draw.indices.clone();
        sorted.sort();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    #[test]
    #[should_panic]
    fn oversized_draw_is_a_programming_error() {
        let bank = bank_of(3);
        let mut rng = SimpleRng::new(1);
        bank.sample_unused(4, &UsedQuestions::new(), &mut rng);
    }
}

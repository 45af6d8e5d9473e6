//! Observations collected for one column, and what they imply

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::config::NULL_MARKER;
use super::error::InferenceError;
use super::types::{ColumnType, RuleHit, eliminate};

/// Tolerance for the per-column equal-frequency check
pub const UNIFORM_TOLERANCE: f64 = 1e-5;

/// Tolerance when comparing a key candidate against maximum entropy
pub const KEY_TOLERANCE: f64 = 1e-3;

/// Why a value cannot be bulk loaded
const EMPTY_QUOTED_REASON: &str =
    "PostgreSQL COPY can't process the empty quoted string; clean the file first";

/// Per-column numbers shown in the verbose report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    pub total: usize,
    pub distinct: usize,
    pub column_type: Option<ColumnType>,
    pub nullable: bool,
    pub entropy: f64,
    pub entropy_if_uniform: f64,
    pub max_entropy: f64,
}

/// Raw observations for one column position
#[derive(Debug, Clone, Default)]
pub struct ColumnValueSet {
    values: Vec<String>,
    counts: HashMap<String, usize>,
    inferred_type: Option<ColumnType>,
    nullable: bool,
    hits: Vec<RuleHit>,
}

impl ColumnValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation. Clears any previously inferred type.
    pub fn add(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        *self.counts.entry(raw.clone()).or_insert(0) += 1;
        self.values.push(raw);
        self.inferred_type = None;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn distinct_count(&self) -> usize {
        self.counts.len()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Run type elimination over every observation and pick the strictest survivor
    pub fn infer_type(&mut self) -> Result<ColumnType, InferenceError> {
        let result = eliminate(self.values.iter().map(String::as_str));
        let column_type = result.candidates.strictest().ok_or_else(|| {
            InferenceError::InvalidState(
                "type elimination left no candidate type".to_string(),
            )
        })?;
        self.inferred_type = Some(column_type);
        self.nullable = result.nullable;
        self.hits = result.hits;
        Ok(column_type)
    }

    /// Type from the last inference; `None` if never inferred or observations were added since
    pub fn inferred_type(&self) -> Option<ColumnType> {
        self.inferred_type
    }

    pub fn sql_type(&self) -> Option<&'static str> {
        self.inferred_type.map(|t| t.sql_type())
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Rules that shaped the last inference
    pub fn rule_hits(&self) -> &[RuleHit] {
        &self.hits
    }

    /// Override the inferred type
    pub fn force_type(&mut self, column_type: ColumnType) {
        self.inferred_type = Some(column_type);
    }

    pub fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }

    /// Number of null-marker observations
    pub fn null_count(&self) -> usize {
        self.counts.get(NULL_MARKER).copied().unwrap_or(0)
    }

    /// Fail if any observation is an empty quoted string, which COPY reads as ambiguous
    pub fn validate_for_bulk_load(
        &self,
        source: &Path,
        empty_quoted: &str,
    ) -> Result<(), InferenceError> {
        let found: BTreeSet<&str> = self
            .values
            .iter()
            .map(String::as_str)
            .filter(|v| *v == empty_quoted)
            .collect();
        if found.is_empty() {
            return Ok(());
        }
        for value in &found {
            tracing::error!(value = %value, file = %source.display(), "{}", EMPTY_QUOTED_REASON);
        }
        Err(InferenceError::DataQuality {
            path: source.to_path_buf(),
            values: found.into_iter().map(str::to_string).collect(),
        })
    }

    /// Shannon entropy of the observed distribution, in nats
    pub fn entropy(&self) -> f64 {
        let n = self.values.len() as f64;
        if n == 0.0 {
            return 0.0;
        }
        self.counts
            .values()
            .map(|&count| {
                let p = count as f64 / n;
                -p * p.ln()
            })
            .sum()
    }

    /// Entropy if the distinct values occurred equally often
    pub fn entropy_if_uniform(&self) -> f64 {
        ln_or_zero(self.counts.len())
    }

    /// Entropy if every observation were distinct
    pub fn max_entropy(&self) -> f64 {
        ln_or_zero(self.values.len())
    }

    /// Every observation is distinct
    pub fn is_unique(&self) -> bool {
        (self.entropy() - self.max_entropy()).abs() < KEY_TOLERANCE
    }

    /// Cheap filter: distinct values occur with equal frequency.
    ///
    /// Necessary but not sufficient for a key; a column where each value
    /// appears exactly twice passes too.
    pub fn is_possible_key_column(&self) -> bool {
        if self.inferred_type == Some(ColumnType::Decimal) {
            return false;
        }
        (self.entropy() - self.entropy_if_uniform()).abs() < UNIFORM_TOLERANCE
    }

    pub fn summary(&self) -> ColumnSummary {
        ColumnSummary {
            total: self.values.len(),
            distinct: self.counts.len(),
            column_type: self.inferred_type,
            nullable: self.nullable,
            entropy: self.entropy(),
            entropy_if_uniform: self.entropy_if_uniform(),
            max_entropy: self.max_entropy(),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ColumnValueSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ColumnValueSet::new();
        for value in iter {
            set.add(value);
        }
        set
    }
}

fn ln_or_zero(n: usize) -> f64 {
    if n == 0 { 0.0 } else { (n as f64).ln() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_small_integers() {
        let mut set: ColumnValueSet = ["1", "2", "3", "2", "1"].into_iter().collect();
        assert_eq!(set.infer_type().unwrap(), ColumnType::Integer);
        assert!(!set.is_nullable());
        assert_eq!(set.sql_type(), Some("INTEGER"));
    }

    #[test]
    fn test_multi_dot_wins() {
        let mut set: ColumnValueSet = ["1", "2.5", "10.0.1", "4"].into_iter().collect();
        assert_eq!(set.infer_type().unwrap(), ColumnType::Text);
    }

    #[test]
    fn test_single_null_marker() {
        let mut set: ColumnValueSet = ["1", "\\N", "3"].into_iter().collect();
        assert_eq!(set.infer_type().unwrap(), ColumnType::Integer);
        assert!(set.is_nullable());
        assert_eq!(set.null_count(), 1);
    }

    #[test]
    fn test_leading_zero_is_decimal() {
        let mut set: ColumnValueSet = ["007", "12"].into_iter().collect();
        assert_eq!(set.infer_type().unwrap(), ColumnType::Decimal);
    }

    #[test]
    fn test_add_invalidates_inference() {
        let mut set: ColumnValueSet = ["1"].into_iter().collect();
        set.infer_type().unwrap();
        assert_eq!(set.inferred_type(), Some(ColumnType::Integer));
        set.add("x");
        assert_eq!(set.inferred_type(), None);
        assert_eq!(set.infer_type().unwrap(), ColumnType::Text);
    }

    #[test]
    fn test_entropy_all_distinct() {
        let set: ColumnValueSet = ["a", "b", "c", "d"].into_iter().collect();
        let expected = 4f64.ln();
        assert!(approx(set.entropy(), expected));
        assert!(approx(set.entropy_if_uniform(), expected));
        assert!(approx(set.max_entropy(), expected));
        assert!(set.is_unique());
    }

    #[test]
    fn test_entropy_single_value() {
        let set: ColumnValueSet = std::iter::repeat_n("x", 7).collect();
        assert!(approx(set.entropy(), 0.0));
        assert!(approx(set.entropy_if_uniform(), 0.0));
        assert!(approx(set.max_entropy(), 7f64.ln()));
        assert!(!set.is_unique());
    }

    #[test]
    fn test_entropy_skewed() {
        // p = 3/4, 1/4
        let set: ColumnValueSet = ["a", "a", "a", "b"].into_iter().collect();
        let expected = -(0.75f64 * 0.75f64.ln() + 0.25f64 * 0.25f64.ln());
        assert!(approx(set.entropy(), expected));
        assert!(approx(set.entropy_if_uniform(), 2f64.ln()));
    }

    #[test]
    fn test_empty_set_statistics() {
        let set = ColumnValueSet::new();
        assert_eq!(set.entropy(), 0.0);
        assert_eq!(set.entropy_if_uniform(), 0.0);
        assert_eq!(set.max_entropy(), 0.0);
    }

    #[test]
    fn test_possible_key_is_loose() {
        // Every value twice: uniform, so it passes even though it is not unique
        let mut set: ColumnValueSet = ["a", "a", "b", "b"].into_iter().collect();
        set.infer_type().unwrap();
        assert!(set.is_possible_key_column());
        assert!(!set.is_unique());

        let mut skewed: ColumnValueSet = ["a", "a", "a", "b"].into_iter().collect();
        skewed.infer_type().unwrap();
        assert!(!skewed.is_possible_key_column());
    }

    #[test]
    fn test_decimal_never_possible_key() {
        let mut set: ColumnValueSet = ["1.5", "2.5", "3.5"].into_iter().collect();
        assert_eq!(set.infer_type().unwrap(), ColumnType::Decimal);
        assert!(!set.is_possible_key_column());
    }

    #[test]
    fn test_validate_for_bulk_load() {
        let path = Path::new("/data/file.csv");
        let ok: ColumnValueSet = ["a", "", "b"].into_iter().collect();
        assert!(ok.validate_for_bulk_load(path, "\"\"").is_ok());

        let bad: ColumnValueSet = ["a", "\"\"", "b", "\"\""].into_iter().collect();
        match bad.validate_for_bulk_load(path, "\"\"") {
            Err(InferenceError::DataQuality { path: p, values }) => {
                assert_eq!(p, Path::new("/data/file.csv"));
                assert_eq!(values, vec!["\"\"".to_string()]);
            }
            other => panic!("Expected data quality error, got {:?}", other),
        }
    }

    #[test]
    fn test_summary() {
        let mut set: ColumnValueSet = ["1", "1", "2"].into_iter().collect();
        set.infer_type().unwrap();
        let summary = set.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.distinct, 2);
        assert_eq!(summary.column_type, Some(ColumnType::Integer));
        assert!(approx(summary.max_entropy, 3f64.ln()));
    }
}

//! Column types and the per-observation elimination rules

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::config::NULL_MARKER;

static ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]").unwrap());

/// SQL-facing type inferred for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Whole numbers
    Integer,
    /// Numbers with a fractional part
    Decimal,
    /// Anything else
    Text,
}

impl ColumnType {
    /// All types, strictest first. Picking the final type walks this table.
    pub const STRICTNESS: [ColumnType; 3] =
        [ColumnType::Integer, ColumnType::Decimal, ColumnType::Text];

    /// PostgreSQL type used in CREATE TABLE
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Decimal => "NUMERIC",
            ColumnType::Text => "TEXT",
        }
    }

    /// Lowercase name used in reports
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Decimal => "decimal",
            ColumnType::Text => "text",
        }
    }

    fn bit(&self) -> u8 {
        match self {
            ColumnType::Integer => 0b001,
            ColumnType::Decimal => 0b010,
            ColumnType::Text => 0b100,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Set of types a column may still have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSet(u8);

impl CandidateSet {
    /// Every type still possible
    pub fn all() -> Self {
        CandidateSet(0b111)
    }

    /// No type possible
    pub fn empty() -> Self {
        CandidateSet(0)
    }

    pub fn only(ty: ColumnType) -> Self {
        CandidateSet(ty.bit())
    }

    pub fn contains(&self, ty: ColumnType) -> bool {
        self.0 & ty.bit() != 0
    }

    pub fn without(self, ty: ColumnType) -> Self {
        CandidateSet(self.0 & !ty.bit())
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The strictest remaining type
    pub fn strictest(&self) -> Option<ColumnType> {
        ColumnType::STRICTNESS
            .into_iter()
            .find(|ty| self.contains(*ty))
    }
}

/// Named elimination rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rule {
    /// Contains an ASCII letter
    ContainsAlpha,
    /// More than one `.`
    MultiDecimal,
    /// Exactly one `.`
    SingleDecimal,
    /// Zero-padded whole number such as `007`
    LeadingZero,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::ContainsAlpha => "CONTAINS_ALPHA",
            Rule::MultiDecimal => "MULTI_DECIMAL",
            Rule::SingleDecimal => "SINGLE_DECIMAL",
            Rule::LeadingZero => "LEADING_ZERO",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a single observation says about the column's type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The null marker; tells nothing about the type
    Null,
    /// Pins the column to one type
    Force(ColumnType, Rule),
    /// Rules out one type
    Eliminate(ColumnType, Rule),
    /// Consistent with every remaining type
    Neutral,
}

/// Judge one raw observation
pub fn classify(raw: &str) -> Verdict {
    if raw == NULL_MARKER {
        return Verdict::Null;
    }
    if ALPHA.is_match(raw) {
        return Verdict::Force(ColumnType::Text, Rule::ContainsAlpha);
    }
    match raw.matches('.').count() {
        0 if raw.starts_with('0') && raw.len() > 1 => {
            Verdict::Eliminate(ColumnType::Integer, Rule::LeadingZero)
        }
        0 => Verdict::Neutral,
        1 => Verdict::Eliminate(ColumnType::Integer, Rule::SingleDecimal),
        _ => Verdict::Force(ColumnType::Text, Rule::MultiDecimal),
    }
}

/// A rule that changed the candidate set, with the value that triggered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleHit {
    pub rule: Rule,
    /// Type forced or eliminated
    pub column_type: ColumnType,
    /// True when the rule pinned the type rather than removing one
    pub forced: bool,
    pub value: String,
}

/// Result of folding every observation of a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elimination {
    pub candidates: CandidateSet,
    pub nullable: bool,
    pub hits: Vec<RuleHit>,
}

impl Elimination {
    fn start() -> Self {
        Self {
            candidates: CandidateSet::all(),
            nullable: false,
            hits: Vec::new(),
        }
    }

    fn settled(&self) -> bool {
        self.candidates.len() <= 1
    }

    /// Fold one observation into the state
    fn step(mut self, raw: &str) -> Self {
        match classify(raw) {
            Verdict::Null => self.nullable = true,
            _ if self.settled() => {}
            Verdict::Force(ty, rule) => {
                self.candidates = CandidateSet::only(ty);
                self.hits.push(RuleHit {
                    rule,
                    column_type: ty,
                    forced: true,
                    value: raw.to_string(),
                });
            }
            Verdict::Eliminate(ty, rule) => {
                if self.candidates.contains(ty) {
                    self.candidates = self.candidates.without(ty);
                    self.hits.push(RuleHit {
                        rule,
                        column_type: ty,
                        forced: false,
                        value: raw.to_string(),
                    });
                }
            }
            Verdict::Neutral => {}
        }
        self
    }
}

/// Run elimination over a column's observations
pub fn eliminate<'a, I>(observations: I) -> Elimination
where
    I: IntoIterator<Item = &'a str>,
{
    observations
        .into_iter()
        .fold(Elimination::start(), Elimination::step)
}

//! Estimate whether a block of prose was produced by a language model.
//!
//! Two independent signals feed a fixed decision rule: perplexity of the
//! text under a unigram reference model, and burstiness of its word
//! frequencies. Frequency data is also exposed as chart series for display.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

pub mod chart;
pub mod config;
pub mod error;
pub mod freq;
pub mod model;
pub mod text;

pub use error::{Error, Result};
pub use freq::{ChartKind, ChartSpec, FrequencyTable};
pub use model::{CorpusSource, EmbeddedCorpus, FileCorpus, UnigramModel, WordListCorpus};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A score that may be degenerate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Value(f64),
    /// Some token had zero probability under the reference model.
    Infinite,
    /// Nothing to compute from (no tokens, or a zero mean).
    Undefined,
}

impl Score {
    /// `+inf` for `Infinite`, NaN for `Undefined`.
    pub fn as_f64(self) -> f64 {
        match self {
            Score::Value(v) => v,
            Score::Infinite => f64::INFINITY,
            Score::Undefined => f64::NAN,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Score::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Value(v) => write!(f, "{v:.4}"),
            Score::Infinite => write!(f, "inf"),
            Score::Undefined => write!(f, "undefined"),
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Score::Value(v) => serializer.serialize_f64(*v),
            Score::Infinite => serializer.serialize_str("infinite"),
            Score::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Label {
    Generated,
    NotGenerated,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Generated => write!(f, "Likely generated by a language model"),
            Label::NotGenerated => write!(f, "Not likely generated by a language model"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub token_count: usize,
    pub distinct_tokens: usize,
    pub perplexity: Score,
    pub burstiness: Score,
    pub label: Label,
    pub thresholds: Thresholds,
    pub most_common: ChartSpec,
    pub repeated: ChartSpec,
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

pub const DEFAULT_MAX_PERPLEXITY: f64 = 100.0;
pub const DEFAULT_MAX_BURSTINESS: f64 = 1.0;

/// Cutoffs below which both scores must fall for text to count as generated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub max_perplexity: f64,
    pub max_burstiness: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_perplexity: DEFAULT_MAX_PERPLEXITY,
            max_burstiness: DEFAULT_MAX_BURSTINESS,
        }
    }
}

impl Thresholds {
    pub fn new(max_perplexity: f64, max_burstiness: f64) -> Result<Self> {
        validate_threshold("perplexity", max_perplexity)?;
        validate_threshold("burstiness", max_burstiness)?;
        Ok(Self {
            max_perplexity,
            max_burstiness,
        })
    }

    /// Comparisons against NaN are false, so undefined or infinite scores
    /// always classify as not generated.
    pub fn classify(&self, perplexity: f64, burstiness: f64) -> Label {
        if perplexity < self.max_perplexity && burstiness < self.max_burstiness {
            Label::Generated
        } else {
            Label::NotGenerated
        }
    }

    pub fn classify_scores(&self, perplexity: Score, burstiness: Score) -> Label {
        self.classify(perplexity.as_f64(), burstiness.as_f64())
    }
}

fn validate_threshold(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidThreshold { name, value })
    }
}

/// Classify with the default cutoffs (perplexity 100, burstiness 1).
pub fn classify(perplexity: f64, burstiness: f64) -> Label {
    Thresholds::default().classify(perplexity, burstiness)
}

// ---------------------------------------------------------------------------
// Burstiness
// ---------------------------------------------------------------------------

/// Population variance of the counts divided by the squared mean count.
/// A single distinct token has zero variance and intentionally scores 0.
pub fn burstiness(table: &FrequencyTable) -> Score {
    let distinct = table.len() as f64;
    if table.is_empty() {
        return Score::Undefined;
    }
    let avg = table.total() as f64 / distinct;
    if avg == 0.0 {
        return Score::Undefined;
    }
    let variance = table
        .counts()
        .map(|count| (count as f64 - avg).powi(2))
        .sum::<f64>()
        / distinct;
    Score::Value(variance / (avg * avg))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reject empty or whitespace-only submissions before any scoring runs.
pub fn check_input(text: &str) -> Result<&str> {
    if text.trim().is_empty() {
        Err(Error::EmptyInput)
    } else {
        Ok(text)
    }
}

/// Runs the full pipeline against a trained reference model.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'m> {
    model: &'m UnigramModel,
    thresholds: Thresholds,
}

impl Default for Analyzer<'static> {
    fn default() -> Self {
        Self::new(UnigramModel::shared(), Thresholds::default())
    }
}

impl<'m> Analyzer<'m> {
    pub fn new(model: &'m UnigramModel, thresholds: Thresholds) -> Self {
        Self { model, thresholds }
    }

    pub fn analyze(&self, text: &str) -> Analysis {
        let tokens = text::normalize(text);
        let table = FrequencyTable::from_tokens(&tokens);

        let perplexity = self.model.perplexity(&tokens);
        let burstiness = burstiness(&table);
        let label = self.thresholds.classify_scores(perplexity, burstiness);
        debug!(
            tokens = tokens.len(),
            distinct = table.len(),
            %perplexity,
            %burstiness,
            "analyzed text"
        );

        Analysis {
            token_count: tokens.len(),
            distinct_tokens: table.len(),
            perplexity,
            burstiness,
            label,
            thresholds: self.thresholds,
            most_common: ChartSpec::most_common(&table),
            repeated: ChartSpec::repeated(&table),
        }
    }
}

/// Analyze with the shared embedded-corpus model and default thresholds.
pub fn analyze(text: &str) -> Analysis {
    Analyzer::default().analyze(text)
}

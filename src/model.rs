//! Unigram reference language model and perplexity scoring.
//!
//! The model is a maximum-likelihood unigram table with no smoothing: a
//! word never seen in the reference corpus has probability zero, which
//! makes the perplexity of any text containing it infinite.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::text::word_segments;
use crate::Score;

pub const START_SYMBOL: &str = "<s>";
pub const END_SYMBOL: &str = "</s>";

static REFERENCE_TEXT: &str = include_str!("../data/reference_corpus.txt");

// ---------------------------------------------------------------------------
// Corpus sources
// ---------------------------------------------------------------------------

/// Anything that can supply the raw word sequence of a reference corpus.
///
/// Words are taken as the corpus provides them: not lowercased, not
/// stopword-filtered, punctuation included.
pub trait CorpusSource {
    fn words(&self) -> Result<Vec<String>>;
}

/// English prose sample compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCorpus;

impl EmbeddedCorpus {
    fn tokens(&self) -> Vec<String> {
        word_segments(REFERENCE_TEXT).map(str::to_string).collect()
    }
}

impl CorpusSource for EmbeddedCorpus {
    fn words(&self) -> Result<Vec<String>> {
        Ok(self.tokens())
    }
}

/// A UTF-8 text file segmented the same way as the embedded corpus.
#[derive(Debug, Clone)]
pub struct FileCorpus {
    path: PathBuf,
}

impl FileCorpus {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorpusSource for FileCorpus {
    fn words(&self) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(word_segments(&content).map(str::to_string).collect())
    }
}

/// An in-memory word list.
#[derive(Debug, Clone, Default)]
pub struct WordListCorpus(Vec<String>);

impl WordListCorpus {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(words.into_iter().map(Into::into).collect())
    }
}

impl CorpusSource for WordListCorpus {
    fn words(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Sequence helpers
// ---------------------------------------------------------------------------

/// Surround a sequence with one start and one end symbol.
pub fn pad_sequence<S: AsRef<str>>(tokens: &[S]) -> Vec<&str> {
    let mut padded = Vec::with_capacity(tokens.len() + 2);
    padded.push(START_SYMBOL);
    padded.extend(tokens.iter().map(AsRef::as_ref));
    padded.push(END_SYMBOL);
    padded
}

/// Overlapping n-grams of order `n` (n >= 1).
pub fn ngrams<T>(sequence: &[T], n: usize) -> impl Iterator<Item = &[T]> {
    sequence.windows(n.max(1))
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

static SHARED: Lazy<UnigramModel> = Lazy::new(|| {
    let model = UnigramModel::from_padded(&pad_sequence(&EmbeddedCorpus.tokens()));
    info!(
        tokens = model.total,
        vocab = model.vocab_size(),
        "trained shared reference model"
    );
    model
});

#[derive(Debug, Clone)]
pub struct UnigramModel {
    counts: HashMap<String, usize>,
    total: usize,
}

impl UnigramModel {
    pub const ORDER: usize = 1;

    /// Model trained on the embedded corpus, built on first use and shared
    /// read-only for the rest of the process.
    pub fn shared() -> &'static UnigramModel {
        &SHARED
    }

    pub fn train(corpus: &dyn CorpusSource) -> Result<Self> {
        let words = corpus.words()?;
        if words.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let model = Self::from_padded(&pad_sequence(&words));
        debug!(
            tokens = model.total,
            vocab = model.vocab_size(),
            "trained reference model"
        );
        Ok(model)
    }

    fn from_padded(padded: &[&str]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut total = 0;
        for gram in ngrams(padded, Self::ORDER) {
            *counts.entry(gram[Self::ORDER - 1].to_string()).or_insert(0) += 1;
            total += 1;
        }
        Self { counts, total }
    }

    pub fn order(&self) -> usize {
        Self::ORDER
    }

    pub fn count(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Distinct words seen in training, padding symbols included.
    pub fn vocab_size(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Probability of the last word of `ngram`. With order 1 there is no
    /// context to condition on.
    pub fn score(&self, ngram: &[&str]) -> f64 {
        match ngram.last() {
            Some(word) if self.total > 0 => self.count(word) as f64 / self.total as f64,
            _ => 0.0,
        }
    }

    /// Natural log of [`score`](Self::score); negative infinity for unseen words.
    pub fn logscore(&self, ngram: &[&str]) -> f64 {
        self.score(ngram).ln()
    }

    /// exp of the negative mean log-probability over the padded sequence.
    ///
    /// An empty token sequence is `Undefined`. Any zero-probability n-gram
    /// makes the result `Infinite`.
    pub fn perplexity<S: AsRef<str>>(&self, tokens: &[S]) -> Score {
        if tokens.is_empty() {
            return Score::Undefined;
        }
        let padded = pad_sequence(tokens);
        let mut log_sum = 0.0;
        let mut scored = 0usize;
        for gram in ngrams(&padded, self.order()) {
            let logprob = self.logscore(gram);
            if !logprob.is_finite() {
                return Score::Infinite;
            }
            log_sum += logprob;
            scored += 1;
        }
        Score::Value((-log_sum / scored as f64).exp())
    }
}

use std::collections::HashMap;

use serde::Serialize;

/// Upper bound on bars in either chart.
pub const MAX_CHART_BARS: usize = 10;

pub const X_LABEL: &str = "Words";
pub const Y_LABEL: &str = "Frequency";

// ---------------------------------------------------------------------------
// Frequency table
// ---------------------------------------------------------------------------

/// Token counts in first-encounter order.
///
/// Every entry has a count of at least one and the counts sum to the length
/// of the token sequence the table was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut table = Self::default();
        for token in tokens {
            table.add(token.as_ref());
        }
        table
    }

    fn add(&mut self, token: &str) {
        match self.index.get(token) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), 1));
            }
        }
    }

    pub fn get(&self, token: &str) -> usize {
        self.index
            .get(token)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(word, count)| (word.as_str(), *count))
    }

    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|(_, count)| *count)
    }

    /// Top `n` tokens by descending count; equal counts keep encounter order.
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self.iter().collect();
        // sort_by is stable, which is what keeps ties in encounter order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// First `n` tokens (in encounter order) seen more than once.
    pub fn repeated(&self, n: usize) -> Vec<(&str, usize)> {
        self.iter().filter(|(_, count)| *count > 1).take(n).collect()
    }
}

// ---------------------------------------------------------------------------
// Chart specifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    MostCommon,
    Repeated,
}

impl ChartKind {
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::MostCommon => "Most Common Words",
            ChartKind::Repeated => "Repeated Words",
        }
    }

    /// Shown in place of the chart when there is nothing to plot.
    pub fn empty_message(self) -> &'static str {
        match self {
            ChartKind::MostCommon => "No words to chart.",
            ChartKind::Repeated => "No repeated words found.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub bars: Vec<Bar>,
}

impl ChartSpec {
    fn new(kind: ChartKind, ranked: Vec<(&str, usize)>) -> Self {
        Self {
            kind,
            bars: ranked
                .into_iter()
                .map(|(label, count)| Bar {
                    label: label.to_string(),
                    count,
                })
                .collect(),
        }
    }

    pub fn most_common(table: &FrequencyTable) -> Self {
        Self::new(ChartKind::MostCommon, table.most_common(MAX_CHART_BARS))
    }

    pub fn repeated(table: &FrequencyTable) -> Self {
        Self::new(ChartKind::Repeated, table.repeated(MAX_CHART_BARS))
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

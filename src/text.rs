use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

// ---------------------------------------------------------------------------
// Stopwords
// ---------------------------------------------------------------------------

/// Classic English stopword list, including the contraction fragments a
/// word tokenizer may leave behind ("don", "t", "ll", ...).
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
        "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
        "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
        "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
        "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
        "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
        "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
        "with", "about", "against", "between", "into", "through", "during", "before", "after",
        "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
        "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
        "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
        "will", "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o", "re",
        "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn",
        "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma",
        "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
        "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
        "wouldn't",
    ]
    .into_iter()
    .collect()
});

/// A token with no letters or digits at all: ".", "--", "!?", "'", "__".
static PUNCT_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\p{L}\p{N}]+$").unwrap());

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

pub fn is_punctuation(token: &str) -> bool {
    PUNCT_ONLY_RE.is_match(token)
}

// ---------------------------------------------------------------------------
// Tokenization
// ---------------------------------------------------------------------------

/// Split text on Unicode word boundaries, dropping whitespace runs.
///
/// Case and punctuation are preserved, so "Don't stop." yields
/// `["Don't", "stop", "."]`. This is the raw word view used both for the
/// reference corpus and, after normalization, for analyzed text.
pub fn word_segments(text: &str) -> impl Iterator<Item = &str> {
    text.split_word_bounds()
        .filter(|segment| !segment.trim().is_empty())
}

/// Lowercase, tokenize, then drop punctuation tokens and stopwords.
///
/// Typographic apostrophes are folded to `'` so "don’t" is treated the same
/// as "don't". An input with no qualifying tokens gives an empty vector.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase().replace('\u{2019}', "'");
    word_segments(&lowered)
        .filter(|token| !is_punctuation(token) && !is_stopword(token))
        .map(str::to_string)
        .collect()
}

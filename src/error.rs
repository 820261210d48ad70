use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Submitted text was empty or whitespace only.
    #[error("Please enter some text to analyze.")]
    EmptyInput,

    /// The reference corpus produced no words to train on.
    #[error("reference corpus contains no words")]
    EmptyCorpus,

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{name} threshold must be a finite positive number, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

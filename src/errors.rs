//! # Error Types

use std::path::PathBuf;

/// Errors from alignment training and decoding.
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    /// A corpus, output, or table file could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        /// The file the operation was applied to.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// I/O error on a stream with no associated path.
    #[error(transparent)]
    Stream(#[from] std::io::Error),

    /// The expectation normalizer for a sentence was zero or non-finite.
    ///
    /// This happens when a sentence has source tokens but no target tokens.
    #[error("degenerate normalizer ({normalizer}) in sentence {sentence}")]
    DegenerateNormalizer {
        /// Zero-based index of the offending sentence pair.
        sentence: usize,
        /// The normalizer value that was computed.
        normalizer: f64,
    },

    /// The EM iteration count must be positive.
    #[error("iteration count must be positive, got {0}")]
    InvalidIterations(usize),

    /// The decoding threshold must lie in `[0, 1]`.
    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    /// The null placeholder must be positive and finite.
    #[error("null placeholder must be positive and finite, got {0}")]
    InvalidNulls(f64),

    /// Smoothing constants must be positive and finite.
    #[error("invalid smoothing constants: n = {n}, v = {v}")]
    InvalidSmoothing {
        /// Additive pseudo-count.
        n: f64,
        /// Assumed vocabulary size.
        v: f64,
    },
}

impl AlignError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for alignment operations.
pub type AlignResult<T> = core::result::Result<T, AlignError>;

//! # Training and Decoding Options

use std::path::{Path, PathBuf};

use crate::errors::{AlignError, AlignResult};

/// Default number of EM iterations.
pub const DEFAULT_ITERATIONS: usize = 5;

/// Default decoding threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Default mass of the artificial null placeholder used for the uniform prior.
pub const DEFAULT_NULLS: f64 = 10.0;

/// Default additive pseudo-count for [`Smoothing::Additive`].
pub const DEFAULT_SMOOTHING_N: f64 = 100.0;

/// Default assumed vocabulary size for [`Smoothing::Additive`].
pub const DEFAULT_SMOOTHING_V: f64 = 100_000.0;

/// Responsibility smoothing applied during the expectation pass.
///
/// Disabled unless explicitly requested. With `Additive { n, v }` the
/// responsibility of target `e` for source `f` is `(t(f, e) + n) / (Z + n * v)`
/// instead of `t(f, e) / Z`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Smoothing {
    #[default]
    Disabled,
    Additive { n: f64, v: f64 },
}

impl Smoothing {
    /// Additive smoothing with the default constants.
    pub fn additive() -> Self {
        Smoothing::Additive {
            n: DEFAULT_SMOOTHING_N,
            v: DEFAULT_SMOOTHING_V,
        }
    }

    /// Responsibility of one target token given its probability and the
    /// sentence normalizer.
    #[inline]
    pub fn responsibility(&self, prob: f64, normalizer: f64) -> f64 {
        match *self {
            Smoothing::Disabled => prob / normalizer,
            Smoothing::Additive { n, v } => (prob + n) / (normalizer + n * v),
        }
    }
}

/// Options for [`crate::Estimator`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOptions {
    /// Number of EM iterations; training always runs exactly this many.
    pub iterations: usize,

    /// Null placeholder mass; the uniform prior is `nulls / |source vocabulary|`.
    pub nulls: f64,

    pub smoothing: Smoothing,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            nulls: DEFAULT_NULLS,
            smoothing: Smoothing::Disabled,
        }
    }
}

impl TrainOptions {
    pub fn validate(&self) -> AlignResult<()> {
        if self.iterations == 0 {
            return Err(AlignError::InvalidIterations(self.iterations));
        }
        if !(self.nulls.is_finite() && self.nulls > 0.0) {
            return Err(AlignError::InvalidNulls(self.nulls));
        }
        if let Smoothing::Additive { n, v } = self.smoothing {
            if !(n.is_finite() && n > 0.0 && v.is_finite() && v > 0.0) {
                return Err(AlignError::InvalidSmoothing { n, v });
            }
        }
        Ok(())
    }
}

/// Options for [`crate::decode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeOptions {
    /// A link is emitted only when its probability strictly exceeds this.
    pub threshold: f64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl DecodeOptions {
    pub fn validate(&self) -> AlignResult<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(AlignError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Location of a parallel corpus on disk.
///
/// Files are named `{datadir}/{prefix}.{suffix}`, one file per language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusLayout {
    pub datadir: PathBuf,
    pub prefix: String,
    pub source_suffix: String,
    pub target_suffix: String,
}

impl Default for CorpusLayout {
    fn default() -> Self {
        Self {
            datadir: PathBuf::from("data"),
            prefix: "hansards".to_string(),
            source_suffix: "fr".to_string(),
            target_suffix: "en".to_string(),
        }
    }
}

impl CorpusLayout {
    fn path_for(&self, suffix: &str) -> PathBuf {
        self.datadir.join(format!("{}.{}", self.prefix, suffix))
    }

    pub fn source_path(&self) -> PathBuf {
        self.path_for(&self.source_suffix)
    }

    pub fn target_path(&self) -> PathBuf {
        self.path_for(&self.target_suffix)
    }

    /// Uses `datadir` for both files of the layout.
    pub fn with_datadir(mut self, datadir: impl AsRef<Path>) -> Self {
        self.datadir = datadir.as_ref().to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        TrainOptions::default().validate().unwrap();
        DecodeOptions::default().validate().unwrap();
        assert_eq!(TrainOptions::default().iterations, 5);
        assert_eq!(DecodeOptions::default().threshold, 0.5);
        assert_eq!(TrainOptions::default().smoothing, Smoothing::Disabled);
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let options = TrainOptions {
            iterations: 0,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(AlignError::InvalidIterations(0))
        ));
    }

    #[test]
    fn test_rejects_bad_nulls_and_smoothing() {
        let options = TrainOptions {
            nulls: 0.0,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(AlignError::InvalidNulls(_))));

        let options = TrainOptions {
            smoothing: Smoothing::Additive { n: -1.0, v: 10.0 },
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(AlignError::InvalidSmoothing { .. })
        ));

        let options = TrainOptions {
            smoothing: Smoothing::additive(),
            ..Default::default()
        };
        options.validate().unwrap();
    }

    #[test]
    fn test_threshold_range() {
        for threshold in [0.0, 0.5, 1.0] {
            DecodeOptions { threshold }.validate().unwrap();
        }
        for threshold in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                DecodeOptions { threshold }.validate(),
                Err(AlignError::InvalidThreshold(_))
            ));
        }
    }

    #[test]
    fn test_smoothing_responsibility() {
        assert_eq!(Smoothing::Disabled.responsibility(0.25, 0.5), 0.5);
        let smoothing = Smoothing::Additive { n: 1.0, v: 2.0 };
        assert_eq!(smoothing.responsibility(1.0, 2.0), 0.5);
    }

    #[test]
    fn test_layout_paths() {
        let layout = CorpusLayout::default();
        assert_eq!(layout.source_path(), Path::new("data").join("hansards.fr"));
        assert_eq!(layout.target_path(), Path::new("data").join("hansards.en"));

        let layout = CorpusLayout::default().with_datadir("/tmp/corpus");
        assert_eq!(
            layout.source_path(),
            Path::new("/tmp/corpus").join("hansards.fr")
        );
    }
}

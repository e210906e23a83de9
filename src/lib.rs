//! Word alignment with IBM Model 1.
//!
//! Translation probabilities `t(f, e)` between source tokens `f` and target
//! tokens `e` are estimated from a sentence-aligned parallel corpus by
//! Expectation-Maximization, starting from a uniform prior. Each source
//! position is then linked to its most probable target position when that
//! probability exceeds a threshold.
//!
//! Reference:
//! Peter F. Brown, Stephen A. Della Pietra, Vincent J. Della Pietra and
//! Robert L. Mercer. The Mathematics of Statistical Machine Translation:
//! Parameter Estimation. Computational Linguistics 19(2), 1993.
//!
//! ```
//! use ibm1align::{Bitext, DecodeOptions, SentencePair, TrainOptions};
//!
//! let mut pairs = vec![SentencePair::from_lines("a b", "x y"); 3];
//! pairs.push(SentencePair::from_lines("a c", "x z"));
//! let bitext = Bitext::new(pairs);
//!
//! let model = ibm1align::train(&bitext, TrainOptions::default()).unwrap();
//! let alignments = model.align(&bitext, &DecodeOptions::default()).unwrap();
//! assert_eq!(alignments[0].to_string(), "0-0 1-1");
//! ```

pub mod config;
pub mod corpus;
pub mod decode;
pub mod em;
pub mod errors;
mod map;
pub mod table;
pub mod vocab;

pub use config::{CorpusLayout, DecodeOptions, Smoothing, TrainOptions};
pub use corpus::{load_bitext, open_bitext, Bitext, BitextLines, SentencePair};
pub use decode::{write_alignments, Alignment, Link, Model};
pub use em::{train, EpochStats, Estimator, ExpectedCounts};
pub use errors::{AlignError, AlignResult};
pub use map::HashMap2;
pub use table::TranslationTable;
pub use vocab::VocabCounts;

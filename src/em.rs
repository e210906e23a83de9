//! # IBM Model 1 Estimation
//!
//! Each iteration runs one expectation pass over every sentence pair, then
//! one maximization pass over every pair that received expected counts.
//!
//! The expectation pass works on token *types*: a token that repeats within
//! one sentence contributes once on either side. The decoder, in contrast,
//! looks at every position. Changing either side changes how the learned
//! probabilities are normalized.

use hashbrown::HashMap;

use crate::{
    config::{Smoothing, TrainOptions},
    corpus::{Bitext, SentencePair},
    decode::Model,
    errors::{AlignError, AlignResult},
    map::HashMap2,
    table::TranslationTable,
    vocab::{unique_tokens, VocabCounts},
};

fn add(counts: &mut HashMap<String, f64>, token: &str, value: f64) {
    *counts
        .raw_entry_mut()
        .from_key(token)
        .or_insert_with(|| (token.to_string(), 0.0))
        .1 += value;
}

/// Expected counts collected during one expectation pass.
///
/// Counts are additive: accumulating two halves of a corpus separately and
/// merging them gives the same result as accumulating the whole corpus.
#[derive(Clone, Debug, Default)]
pub struct ExpectedCounts {
    f_count: HashMap<String, f64>,
    e_count: HashMap<String, f64>,
    fe_count: HashMap2<String, String, f64>,
}

impl ExpectedCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the responsibilities of one sentence pair under `table`.
    ///
    /// `sentence` is only used to identify the pair in errors.
    pub fn accumulate(
        &mut self,
        table: &TranslationTable,
        pair: &SentencePair,
        sentence: usize,
        smoothing: Smoothing,
    ) -> AlignResult<()> {
        let source = unique_tokens(&pair.source);
        let target = unique_tokens(&pair.target);
        for &f in &source {
            let normalizer: f64 = target.iter().map(|&e| table.get(f, e)).sum();
            if !(normalizer.is_finite() && normalizer > 0.0) {
                return Err(AlignError::DegenerateNormalizer {
                    sentence,
                    normalizer,
                });
            }
            for &e in &target {
                let c = smoothing.responsibility(table.get(f, e), normalizer);
                *self.fe_count.get_or_insert_with(f, e, || 0.0) += c;
                add(&mut self.e_count, e, c);
                add(&mut self.f_count, f, c);
            }
        }
        Ok(())
    }

    pub fn merge(&mut self, other: Self) {
        for (f, c) in other.f_count {
            add(&mut self.f_count, &f, c);
        }
        for (e, c) in other.e_count {
            add(&mut self.e_count, &e, c);
        }
        self.fe_count.merge_with(other.fe_count, |acc, c| *acc += c);
    }

    pub fn pair_count(&self, f: &str, e: &str) -> f64 {
        self.fe_count.get(f, e).copied().unwrap_or(0.0)
    }

    pub fn target_count(&self, e: &str) -> f64 {
        self.e_count.get(e).copied().unwrap_or(0.0)
    }

    pub fn source_count(&self, f: &str) -> f64 {
        self.f_count.get(f).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.fe_count.is_empty()
    }

    /// Writes `t(f, e) = fe_count / e_count` for every counted pair and returns
    /// the number of entries written. Uncounted pairs keep their old values.
    pub fn maximize(&self, table: &mut TranslationTable) -> usize {
        let mut updated = 0;
        self.fe_count.for_each(|(f, e, &c)| {
            let total = self.target_count(e);
            if total > 0.0 {
                table.set(f, e, c / total);
                updated += 1;
            }
        });
        updated
    }

    /// Largest deviation from 1 of `sum_f t(f, e)` over the counted pairs.
    pub fn normalization_error(&self, table: &TranslationTable) -> f64 {
        let mut sums: HashMap<&str, f64> = HashMap::new();
        self.fe_count.for_each(|(f, e, _)| {
            *sums.entry(e.as_str()).or_insert(0.0) += table.get(f, e);
        });
        sums.values()
            .map(|sum| (sum - 1.0).abs())
            .fold(0.0, f64::max)
    }
}

/// Summary of one EM iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpochStats {
    /// One-based iteration number.
    pub iteration: usize,
    /// Corpus log-likelihood under the updated table.
    pub log_likelihood: f64,
    /// Number of table entries written by the maximization pass.
    pub updated_pairs: usize,
    /// Largest deviation from 1 of a per-target probability sum.
    pub normalization_error: f64,
}

/// EM trainer for the translation table.
pub struct Estimator<'a> {
    bitext: &'a Bitext,
    vocab: VocabCounts,
    table: TranslationTable,
    options: TrainOptions,
    iteration: usize,
}

impl<'a> Estimator<'a> {
    pub fn new(bitext: &'a Bitext, options: TrainOptions) -> AlignResult<Self> {
        options.validate()?;

        let vocab = VocabCounts::from_pairs(bitext);
        let table = TranslationTable::uniform(options.nulls, vocab.source_size());
        log::debug!("uniform prior: {}", table.default_prob());

        Ok(Self {
            bitext,
            vocab,
            table,
            options,
            iteration: 0,
        })
    }

    /// Runs one expectation and one maximization pass.
    ///
    /// If any sentence pair fails during expectation, the table is left as it
    /// was before the call.
    pub fn update(&mut self) -> AlignResult<EpochStats> {
        // E-step
        let mut counts = ExpectedCounts::new();
        for (sentence, pair) in self.bitext.iter().enumerate() {
            counts.accumulate(&self.table, pair, sentence, self.options.smoothing)?;
        }

        // M-step
        let updated_pairs = counts.maximize(&mut self.table);
        let normalization_error = counts.normalization_error(&self.table);

        self.iteration += 1;
        let stats = EpochStats {
            iteration: self.iteration,
            log_likelihood: self.log_likelihood(),
            updated_pairs,
            normalization_error,
        };
        log::info!(
            "iter {}: log_likelihood = {}",
            stats.iteration,
            stats.log_likelihood
        );
        log::debug!(
            "iter {}: {} entries updated, normalization error = {:e}",
            stats.iteration,
            stats.updated_pairs,
            stats.normalization_error
        );
        Ok(stats)
    }

    /// Runs the configured number of iterations.
    pub fn train(&mut self) -> AlignResult<Vec<EpochStats>> {
        log::info!(
            "training IBM Model 1 on {} sentence pairs for {} iterations",
            self.bitext.len(),
            self.options.iterations
        );
        (0..self.options.iterations)
            .map(|_| self.update())
            .collect()
    }

    /// `sum over sentences, over unique f, of ln(sum over unique e of t(f, e) / |e|)`.
    ///
    /// Sums run over token types, the same sets the expectation pass uses, so
    /// the value never decreases from one iteration to the next. Summing over
    /// positions instead can decrease on sentences with repeated tokens.
    /// Sentences with an empty target side contribute nothing.
    pub fn log_likelihood(&self) -> f64 {
        let mut total = 0.0;
        for pair in self.bitext {
            let target = unique_tokens(&pair.target);
            if target.is_empty() {
                continue;
            }
            let norm = target.len() as f64;
            for f in unique_tokens(&pair.source) {
                let sum: f64 = target.iter().map(|&e| self.table.get(f, e)).sum();
                total += (sum / norm).ln();
            }
        }
        total
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    pub fn vocab(&self) -> &VocabCounts {
        &self.vocab
    }

    pub fn finalize(self) -> Model {
        Model::new(self.table)
    }
}

/// Trains a model on `bitext` with `options`.
pub fn train(bitext: &Bitext, options: TrainOptions) -> AlignResult<Model> {
    let mut estimator = Estimator::new(bitext, options)?;
    estimator.train()?;
    Ok(estimator.finalize())
}

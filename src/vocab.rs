//! # Vocabulary Counts
//!
//! Sentence-level document frequencies for both sides of a bitext. A token
//! that repeats within one sentence is counted once for that sentence.

use hashbrown::{HashMap, HashSet};

use crate::{corpus::SentencePair, map::HashMap2};

/// Unique tokens of one sentence side, in first-occurrence order.
pub(crate) fn unique_tokens(tokens: &[String]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(tokens.len());
    tokens
        .iter()
        .map(String::as_str)
        .filter(|token| seen.insert(*token))
        .collect()
}

fn increment(counts: &mut HashMap<String, usize>, token: &str) {
    *counts
        .raw_entry_mut()
        .from_key(token)
        .or_insert_with(|| (token.to_string(), 0))
        .1 += 1;
}

/// Source, target, and co-occurrence sentence frequencies.
#[derive(Clone, Debug, Default)]
pub struct VocabCounts {
    source: HashMap<String, usize>,
    target: HashMap<String, usize>,
    cooccurrence: HashMap2<String, String, usize>,
}

impl VocabCounts {
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = &'a SentencePair>,
    {
        let mut counts = Self::default();
        for pair in pairs {
            let source = unique_tokens(&pair.source);
            let target = unique_tokens(&pair.target);
            for &f in &source {
                increment(&mut counts.source, f);
                for &e in &target {
                    *counts.cooccurrence.get_or_insert_with(f, e, || 0) += 1;
                }
            }
            for &e in &target {
                increment(&mut counts.target, e);
            }
        }
        log::debug!(
            "vocabulary: {} source types, {} target types, {} co-occurring pairs",
            counts.source_size(),
            counts.target_size(),
            counts.cooccurrence.len()
        );
        counts
    }

    /// Number of distinct source tokens.
    pub fn source_size(&self) -> usize {
        self.source.len()
    }

    /// Number of distinct target tokens.
    pub fn target_size(&self) -> usize {
        self.target.len()
    }

    /// Number of sentences containing source token `f`.
    pub fn source_count(&self, f: &str) -> usize {
        self.source.get(f).copied().unwrap_or(0)
    }

    /// Number of sentences containing target token `e`.
    pub fn target_count(&self, e: &str) -> usize {
        self.target.get(e).copied().unwrap_or(0)
    }

    /// Number of sentence pairs in which `f` and `e` both appear.
    pub fn cooccurrence_count(&self, f: &str, e: &str) -> usize {
        self.cooccurrence.get(f, e).copied().unwrap_or(0)
    }

    pub fn cooccurrences(&self) -> &HashMap2<String, String, usize> {
        &self.cooccurrence
    }
}

//! # Translation Table
//!
//! Sparse `t(f, e)` probabilities keyed by source token then target token.
//!
//! Pairs that were never written read as a constant uniform prior instead of
//! being materialized. Writes only ever overwrite individual pairs: an entry
//! set in one EM iteration stays in the table, unchanged, until a later
//! iteration observes the pair again. Nothing resets the table between
//! iterations.

use std::io::Write;

use crate::map::HashMap2;

#[derive(Clone, Debug)]
pub struct TranslationTable {
    probs: HashMap2<String, String, f64>,
    default: f64,
}

impl TranslationTable {
    /// An empty table whose unobserved pairs read as `default`.
    pub fn with_default(default: f64) -> Self {
        Self {
            probs: HashMap2::new(),
            default,
        }
    }

    /// The prior `nulls / source_vocab_size`.
    ///
    /// An empty source vocabulary never queries the table, so its prior is 0.
    pub fn uniform(nulls: f64, source_vocab_size: usize) -> Self {
        let default = if source_vocab_size == 0 {
            0.0
        } else {
            nulls / source_vocab_size as f64
        };
        Self::with_default(default)
    }

    /// `t(f, e)`, or the uniform prior if the pair has never been set.
    #[inline]
    pub fn get(&self, f: &str, e: &str) -> f64 {
        self.probs.get(f, e).copied().unwrap_or(self.default)
    }

    pub fn set(&mut self, f: &str, e: &str, prob: f64) {
        *self.probs.get_or_insert_with(f, e, || prob) = prob;
    }

    /// Whether `(f, e)` holds a learned value rather than the prior.
    pub fn is_observed(&self, f: &str, e: &str) -> bool {
        self.probs.contains_key(f, e)
    }

    pub fn default_prob(&self) -> f64 {
        self.default
    }

    /// Number of materialized entries.
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    pub fn for_each<'a, F>(&'a self, f: F)
    where
        F: FnMut((&'a String, &'a String, &'a f64)),
    {
        self.probs.for_each(f)
    }

    /// Materialized entries sorted by source token, then target token.
    pub fn sorted_entries(&self) -> Vec<(&str, &str, f64)> {
        let mut entries = Vec::with_capacity(self.len());
        self.probs
            .for_each(|(f, e, &p)| entries.push((f.as_str(), e.as_str(), p)));
        entries.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        entries
    }

    /// Writes `source<TAB>target<TAB>probability` lines in sorted order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (f, e, p) in self.sorted_entries() {
            writeln!(writer, "{f}\t{e}\t{p}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unobserved_pairs_read_as_prior() {
        let mut table = TranslationTable::uniform(10.0, 4);
        assert_eq!(table.default_prob(), 2.5);
        assert_eq!(table.get("a", "x"), 2.5);
        assert!(!table.is_observed("a", "x"));

        table.set("a", "x", 0.75);
        assert_eq!(table.get("a", "x"), 0.75);
        assert_eq!(table.get("a", "y"), 2.5);
        assert!(table.is_observed("a", "x"));

        table.set("a", "x", 0.5);
        assert_eq!(table.get("a", "x"), 0.5);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_vocabulary_prior() {
        let table = TranslationTable::uniform(10.0, 0);
        assert_eq!(table.default_prob(), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_write_to_is_sorted() {
        let mut table = TranslationTable::with_default(0.1);
        table.set("b", "y", 0.25);
        table.set("a", "z", 0.5);
        table.set("a", "x", 1.0);

        let mut buf = Vec::new();
        table.write_to(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "a\tx\t1\na\tz\t0.5\nb\ty\t0.25\n"
        );
    }
}

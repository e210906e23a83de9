//! # Alignment Decoding

use core::fmt;
use std::io::Write;

use crate::{
    config::DecodeOptions,
    corpus::{Bitext, SentencePair},
    errors::AlignResult,
    table::TranslationTable,
};

/// A `(source position, target position)` link.
pub type Link = (usize, usize);

/// Links for one sentence pair, in ascending source position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alignment {
    links: Vec<Link>,
}

impl Alignment {
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl fmt::Display for Alignment {
    /// Pharaoh format: `i-j` links separated by single spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, (i, j)) in self.links.iter().enumerate() {
            if n != 0 {
                f.write_str(" ")?;
            }
            write!(f, "{i}-{j}")?;
        }
        Ok(())
    }
}

/// A trained translation table, read-only.
#[derive(Clone, Debug)]
pub struct Model {
    table: TranslationTable,
}

impl Model {
    pub fn new(table: TranslationTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Links every source position to its most probable target position.
    ///
    /// Every position is considered, including repeats of the same token.
    /// Ties go to the earliest target position. A link is kept only when
    /// its probability is strictly greater than `threshold`.
    pub fn make_alignment(&self, pair: &SentencePair, threshold: f64) -> Alignment {
        let mut links = vec![];
        for (i, f) in pair.source.iter().enumerate() {
            let mut best_prob = 0.0;
            let mut best_j = 0;
            for (j, e) in pair.target.iter().enumerate() {
                let prob = self.table.get(f, e);
                if prob > best_prob {
                    best_prob = prob;
                    best_j = j;
                }
            }
            if best_prob > threshold {
                links.push((i, best_j));
            }
        }
        Alignment { links }
    }

    /// Aligns every pair of `bitext`.
    pub fn align(&self, bitext: &Bitext, options: &DecodeOptions) -> AlignResult<Vec<Alignment>> {
        options.validate()?;
        log::info!(
            "aligning {} sentence pairs at threshold {}",
            bitext.len(),
            options.threshold
        );
        Ok(bitext
            .iter()
            .map(|pair| self.make_alignment(pair, options.threshold))
            .collect())
    }
}

/// Writes one line per alignment; empty alignments produce empty lines.
pub fn write_alignments<'a, W, I>(writer: &mut W, alignments: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Alignment>,
{
    for alignment in alignments {
        writeln!(writer, "{alignment}")?;
    }
    writer.flush()
}

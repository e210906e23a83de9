//! # Parallel Corpus Loading
//!
//! Line `i` of the source file and line `i` of the target file form one
//! [`SentencePair`]. Reading stops at the end of the shorter file or after the
//! configured maximum, whichever comes first. Files of unequal length are not
//! an error: the longer file is silently truncated (a warning is logged).

use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    ops::Index,
    path::{Path, PathBuf},
};

use crate::errors::{AlignError, AlignResult};

/// One line-aligned source/target sentence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentencePair {
    pub source: Vec<String>,
    pub target: Vec<String>,
}

impl SentencePair {
    pub fn new<S: AsRef<str>, T: AsRef<str>>(source: &[S], target: &[T]) -> Self {
        Self {
            source: source.iter().map(|s| s.as_ref().to_string()).collect(),
            target: target.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }

    /// Builds a pair by whitespace-splitting both lines.
    pub fn from_lines(source: &str, target: &str) -> Self {
        Self {
            source: tokenize(source),
            target: tokenize(target),
        }
    }
}

pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Lazily reads sentence pairs from two line streams.
pub struct BitextLines<S, T> {
    source: Lines<S>,
    target: Lines<T>,
    source_path: Option<PathBuf>,
    target_path: Option<PathBuf>,
    remaining: usize,
    index: usize,
}

impl<S: BufRead, T: BufRead> BitextLines<S, T> {
    pub fn new(source: S, target: T, max_sentences: Option<usize>) -> Self {
        Self {
            source: source.lines(),
            target: target.lines(),
            source_path: None,
            target_path: None,
            remaining: max_sentences.unwrap_or(usize::MAX),
            index: 0,
        }
    }

    fn with_paths(mut self, source: &Path, target: &Path) -> Self {
        self.source_path = Some(source.to_path_buf());
        self.target_path = Some(target.to_path_buf());
        self
    }

    fn read_error(path: &Option<PathBuf>, err: std::io::Error) -> AlignError {
        match path {
            Some(path) => AlignError::io(path.clone(), err),
            None => AlignError::Stream(err),
        }
    }
}

impl<S: BufRead, T: BufRead> Iterator for BitextLines<S, T> {
    type Item = AlignResult<SentencePair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let source = match self.source.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => return Some(Err(Self::read_error(&self.source_path, err))),
            None => {
                if self.target.next().is_some() {
                    log::warn!(
                        "source side ended after {} sentences; truncating target side",
                        self.index
                    );
                }
                self.remaining = 0;
                return None;
            }
        };
        let target = match self.target.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => return Some(Err(Self::read_error(&self.target_path, err))),
            None => {
                log::warn!(
                    "target side ended after {} sentences; truncating source side",
                    self.index
                );
                self.remaining = 0;
                return None;
            }
        };
        self.remaining -= 1;
        self.index += 1;
        Some(Ok(SentencePair::from_lines(&source, &target)))
    }
}

/// An in-memory parallel corpus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bitext {
    pairs: Vec<SentencePair>,
}

impl Bitext {
    pub fn new(pairs: Vec<SentencePair>) -> Self {
        Self { pairs }
    }

    /// Reads up to `max_sentences` pairs from two open streams.
    pub fn from_readers<S: BufRead, T: BufRead>(
        source: S,
        target: T,
        max_sentences: Option<usize>,
    ) -> AlignResult<Self> {
        BitextLines::new(source, target, max_sentences).collect()
    }

    pub fn pairs(&self) -> &[SentencePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, SentencePair> {
        self.pairs.iter()
    }
}

impl FromIterator<SentencePair> for Bitext {
    fn from_iter<I: IntoIterator<Item = SentencePair>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Index<usize> for Bitext {
    type Output = SentencePair;

    fn index(&self, index: usize) -> &SentencePair {
        &self.pairs[index]
    }
}

impl<'a> IntoIterator for &'a Bitext {
    type Item = &'a SentencePair;
    type IntoIter = core::slice::Iter<'a, SentencePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

fn open(path: &Path) -> AlignResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| AlignError::io(path, err))
}

/// Opens both corpus files and returns the lazy pair stream.
pub fn open_bitext(
    source: &Path,
    target: &Path,
    max_sentences: Option<usize>,
) -> AlignResult<BitextLines<BufReader<File>, BufReader<File>>> {
    let source_reader = open(source)?;
    let target_reader = open(target)?;
    Ok(BitextLines::new(source_reader, target_reader, max_sentences).with_paths(source, target))
}

/// Loads up to `max_sentences` pairs from two files.
pub fn load_bitext(
    source: &Path,
    target: &Path,
    max_sentences: Option<usize>,
) -> AlignResult<Bitext> {
    let bitext = open_bitext(source, target, max_sentences)?.collect::<AlignResult<Bitext>>()?;
    log::info!(
        "loaded {} sentence pairs from {} and {}",
        bitext.len(),
        source.display(),
        target.display()
    );
    Ok(bitext)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_tokenize_strips_and_splits() {
        assert_eq!(tokenize("  le  chat\tnoir \n"), vec!["le", "chat", "noir"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_from_readers() {
        let source = Cursor::new("a b\na c\n");
        let target = Cursor::new("x y\nx z\n");
        let bitext = Bitext::from_readers(source, target, None).unwrap();

        assert_eq!(bitext.len(), 2);
        assert_eq!(bitext[0], SentencePair::new(&["a", "b"], &["x", "y"]));
        assert_eq!(bitext[1], SentencePair::new(&["a", "c"], &["x", "z"]));
    }

    #[test]
    fn test_truncates_to_shorter_side() {
        let bitext =
            Bitext::from_readers(Cursor::new("a\nb\nc\n"), Cursor::new("x\ny\n"), None).unwrap();
        assert_eq!(bitext.len(), 2);

        let bitext =
            Bitext::from_readers(Cursor::new("a\n"), Cursor::new("x\ny\nz\n"), None).unwrap();
        assert_eq!(bitext.len(), 1);
    }

    #[test]
    fn test_truncates_to_max_sentences() {
        let bitext =
            Bitext::from_readers(Cursor::new("a\nb\nc\n"), Cursor::new("x\ny\nz\n"), Some(2))
                .unwrap();
        assert_eq!(bitext.len(), 2);
        assert_eq!(bitext[1], SentencePair::new(&["b"], &["y"]));

        let bitext =
            Bitext::from_readers(Cursor::new("a\n"), Cursor::new("x\n"), Some(0)).unwrap();
        assert!(bitext.is_empty());
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let bitext =
            Bitext::from_readers(Cursor::new("a\n\n"), Cursor::new("x\ny\n"), None).unwrap();
        assert_eq!(bitext.len(), 2);
        assert!(bitext[1].source.is_empty());
        assert_eq!(bitext[1].target, vec!["y"]);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = load_bitext(
            Path::new("/nonexistent/corpus.fr"),
            Path::new("/nonexistent/corpus.en"),
            None,
        )
        .unwrap_err();
        match err {
            AlignError::Io { path, .. } => assert_eq!(path, Path::new("/nonexistent/corpus.fr")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_bitext_from_files() {
        tempdir::TempDir::new("corpus_test")
            .and_then(|dir| {
                let source = dir.path().join("toy.fr");
                let target = dir.path().join("toy.en");
                std::fs::write(&source, "la maison\nla fleur\n")?;
                std::fs::write(&target, "the house\nthe flower\n")?;

                let bitext = load_bitext(&source, &target, None).expect("load failed");
                assert_eq!(bitext.len(), 2);
                assert_eq!(
                    bitext[0],
                    SentencePair::new(&["la", "maison"], &["the", "house"])
                );
                Ok(())
            })
            .unwrap();
    }
}

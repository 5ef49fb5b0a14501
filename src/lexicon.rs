//! Phoneme inventory and pronunciation dictionary.
//!
//! Both are plain text formats:
//! - inventory: one phoneme symbol per line, order defines the phoneme index;
//! - dictionary: `word<TAB>ph1 ph2 ...` per line.
//!
//! Blank lines are skipped in both. Line numbers in errors are 1-based.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{DecodeError, Result};

/// Ordered set of phoneme symbols.
#[derive(Debug, Clone, Default)]
pub struct PhonemeInventory {
    symbols: Vec<String>,
    index: HashMap<String, usize>,
}

impl PhonemeInventory {
    /// Build an inventory from symbols in index order.
    pub fn new<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inventory = Self::default();
        for symbol in symbols {
            inventory.push(symbol.into())?;
        }
        if inventory.is_empty() {
            return Err(DecodeError::EmptyInventory);
        }
        Ok(inventory)
    }

    fn push(&mut self, symbol: String) -> Result<()> {
        if self.index.contains_key(&symbol) {
            return Err(DecodeError::DuplicatePhoneme { phoneme: symbol });
        }
        self.index.insert(symbol.clone(), self.symbols.len());
        self.symbols.push(symbol);
        Ok(())
    }

    /// Parse the one-symbol-per-line format.
    pub fn parse(text: &str, source_name: &str) -> Result<Self> {
        let mut inventory = Self::default();
        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line.split_whitespace().count() != 1 {
                return Err(DecodeError::MalformedLine {
                    source_name: source_name.to_string(),
                    line: n + 1,
                    reason: format!("expected a single phoneme symbol, got '{line}'"),
                });
            }
            inventory.push(line.to_string())?;
        }
        if inventory.is_empty() {
            return Err(DecodeError::EmptyInventory);
        }
        Ok(inventory)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Phoneme index of `symbol`, if present.
    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.index.get(symbol).copied()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Length every frame score vector must have (3 sub-states per phoneme).
    pub fn frame_width(&self) -> usize {
        self.symbols.len() * crate::utils::SUBSTATES_PER_PHONE
    }
}

/// A word label paired with its ordered phoneme sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pronunciation {
    pub word: String,
    pub phonemes: Vec<String>,
}

impl Pronunciation {
    pub fn new<I, S>(word: impl Into<String>, phonemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            word: word.into(),
            phonemes: phonemes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Dictionary entries in file order. Repeated words are kept as separate entries.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<Pronunciation>,
}

impl Dictionary {
    pub fn new(entries: Vec<Pronunciation>) -> Self {
        Self { entries }
    }

    /// Parse `word<TAB>ph ph ph` lines.
    pub fn parse(text: &str, source_name: &str) -> Result<Self> {
        let malformed = |line: usize, reason: String| DecodeError::MalformedLine {
            source_name: source_name.to_string(),
            line,
            reason,
        };

        let mut entries = Vec::new();
        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let Some((word, phones)) = line.split_once('\t') else {
                return Err(malformed(n + 1, "missing tab between word and phonemes".into()));
            };
            let word = word.trim();
            if word.is_empty() {
                return Err(malformed(n + 1, "empty word label".into()));
            }
            let phonemes: Vec<String> = phones.split_whitespace().map(str::to_string).collect();
            if phonemes.is_empty() {
                return Err(malformed(n + 1, format!("word '{word}' has no phonemes")));
            }
            entries.push(Pronunciation {
                word: word.to_string(),
                phonemes,
            });
        }
        Ok(Self { entries })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, &path.display().to_string())
    }

    pub fn entries(&self) -> &[Pronunciation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Pronunciation> for Dictionary {
    fn from_iter<T: IntoIterator<Item = Pronunciation>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_order_defines_index() {
        let inv = PhonemeInventory::parse("pau\nw\n\nah\nn\n", "phonemes").unwrap();
        assert_eq!(inv.len(), 4);
        assert_eq!(inv.index_of("pau"), Some(0));
        assert_eq!(inv.index_of("n"), Some(3));
        assert_eq!(inv.index_of("x"), None);
        assert_eq!(inv.frame_width(), 12);
    }

    #[test]
    fn inventory_rejects_duplicates_and_empty() {
        assert!(matches!(
            PhonemeInventory::parse("a\nb\na\n", "p"),
            Err(DecodeError::DuplicatePhoneme { .. })
        ));
        assert!(matches!(
            PhonemeInventory::parse("\n\n", "p"),
            Err(DecodeError::EmptyInventory)
        ));
        assert!(matches!(
            PhonemeInventory::parse("a b\n", "p"),
            Err(DecodeError::MalformedLine { line: 1, .. })
        ));
    }

    #[test]
    fn dictionary_parses_tab_separated_entries() {
        let dict = Dictionary::parse("one\tw ah n\ntwo\tt uw\n", "dict").unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.entries()[0], Pronunciation::new("one", ["w", "ah", "n"]));
        assert_eq!(dict.entries()[1].phonemes, vec!["t", "uw"]);
    }

    #[test]
    fn dictionary_keeps_repeated_words() {
        let dict = Dictionary::parse("zero\tz iy r ow\nzero\tz ih r ow\n", "dict").unwrap();
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn dictionary_reports_malformed_lines() {
        let err = Dictionary::parse("one\tw ah n\ntwo t uw\n", "dict").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedLine { line: 2, .. }));

        let err = Dictionary::parse("one\t  \n", "dict").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedLine { line: 1, .. }));
    }
}

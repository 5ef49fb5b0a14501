//! Tokens and their word histories.
//!
//! A [`History`] is a persistent singly-linked list shared between sibling
//! tokens. Nodes are never mutated: extending pushes a new head, closing the
//! last word replaces the head with a fresh node pointing at the same tail.
//! Two tokens that share a prefix can therefore never observe each other's
//! later edits.

use std::fmt;
use std::sync::Arc;

/// A hypothesised word with its frame span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognisedWord {
    pub word: Arc<str>,
    /// Frame at which the word's first sub-state was left.
    pub start: usize,
    /// Frame at which the word's last sub-state was left; equals `start` until closed.
    pub end: usize,
}

impl RecognisedWord {
    pub fn new(word: Arc<str>, start: usize) -> Self {
        Self {
            word,
            start,
            end: start,
        }
    }

    /// A copy of this entry ending at `end`.
    pub fn closed_at(&self, end: usize) -> Self {
        Self {
            word: Arc::clone(&self.word),
            start: self.start,
            end,
        }
    }
}

impl fmt::Display for RecognisedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.word, self.start, self.end)
    }
}

#[derive(Debug)]
struct Node {
    entry: RecognisedWord,
    prev: Option<Arc<Node>>,
    len: usize,
}

/// Append-only word history. Cloning is O(1).
#[derive(Debug, Clone, Default)]
pub struct History {
    head: Option<Arc<Node>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |n| n.len)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn last(&self) -> Option<&RecognisedWord> {
        self.head.as_deref().map(|n| &n.entry)
    }

    /// History extended with `entry`.
    pub fn pushed(&self, entry: RecognisedWord) -> Self {
        let len = self.len() + 1;
        Self {
            head: Some(Arc::new(Node {
                entry,
                prev: self.head.clone(),
                len,
            })),
        }
    }

    /// History whose last entry ends at `end`. Empty histories are returned unchanged.
    pub fn closed_at(&self, end: usize) -> Self {
        match self.head.as_deref() {
            None => self.clone(),
            Some(node) => Self {
                head: Some(Arc::new(Node {
                    entry: node.entry.closed_at(end),
                    prev: node.prev.clone(),
                    len: node.len,
                })),
            },
        }
    }

    /// Entries oldest first.
    pub fn to_vec(&self) -> Vec<RecognisedWord> {
        let mut out = Vec::with_capacity(self.len());
        let mut cursor = self.head.as_deref();
        while let Some(node) = cursor {
            out.push(node.entry.clone());
            cursor = node.prev.as_deref();
        }
        out.reverse();
        out
    }
}

impl PartialEq for History {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let (mut a, mut b) = (self.head.as_ref(), other.head.as_ref());
        while let (Some(x), Some(y)) = (a, b) {
            if Arc::ptr_eq(x, y) {
                return true;
            }
            if x.entry != y.entry {
                return false;
            }
            a = x.prev.as_ref();
            b = y.prev.as_ref();
        }
        true
    }
}

impl Drop for History {
    // Long histories would otherwise drop recursively.
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(node) = cursor {
            match Arc::try_unwrap(node) {
                Ok(mut owned) => cursor = owned.prev.take(),
                Err(_) => break,
            }
        }
    }
}

/// A scored hypothesis: cumulative log-likelihood plus word history.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub log_likelihood: f64,
    pub history: History,
}

impl Token {
    pub fn new(log_likelihood: f64) -> Self {
        Self {
            log_likelihood,
            history: History::new(),
        }
    }

    /// The "impossible" sentinel every state holds before receiving evidence.
    pub fn impossible() -> Self {
        Self::new(f64::NEG_INFINITY)
    }

    /// Log-probability of certainty, seeded on the initial filler.
    pub fn certain() -> Self {
        Self::new(0.0)
    }

    pub fn is_alive(&self) -> bool {
        self.log_likelihood > f64::NEG_INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(label: &str, start: usize) -> RecognisedWord {
        RecognisedWord::new(Arc::from(label), start)
    }

    #[test]
    fn push_and_close_preserve_order() {
        let h = History::new()
            .pushed(word("pause", 0))
            .closed_at(2)
            .pushed(word("one", 3))
            .closed_at(11);
        let entries = h.to_vec();
        assert_eq!(entries.len(), 2);
        assert_eq!((entries[0].start, entries[0].end), (0, 2));
        assert_eq!(&*entries[1].word, "one");
        assert_eq!((entries[1].start, entries[1].end), (3, 11));
    }

    #[test]
    fn closing_empty_history_is_noop() {
        let h = History::new().closed_at(5);
        assert!(h.is_empty());
        assert_eq!(h.len(), 0);
    }

    #[test]
    fn closing_does_not_touch_siblings() {
        let shared = History::new().pushed(word("one", 1));
        let a = shared.closed_at(4);
        let b = shared.closed_at(9);
        assert_eq!(shared.last().unwrap().end, 1);
        assert_eq!(a.last().unwrap().end, 4);
        assert_eq!(b.last().unwrap().end, 9);
    }

    #[test]
    fn equality_is_structural() {
        let a = History::new().pushed(word("one", 1)).closed_at(3);
        let b = History::new().pushed(word("one", 1)).closed_at(3);
        let c = History::new().pushed(word("one", 1)).closed_at(4);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn long_history_drops_without_overflow() {
        let mut h = History::new();
        for i in 0..200_000 {
            h = h.pushed(word("x", i));
        }
        assert_eq!(h.len(), 200_000);
        drop(h);
    }

    #[test]
    fn token_sentinels() {
        assert!(!Token::impossible().is_alive());
        assert!(Token::certain().is_alive());
        assert_eq!(Token::certain().log_likelihood, 0.0);
    }
}

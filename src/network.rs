//! The HMM state graph.
//!
//! States live in a flat arena and refer to each other by [`StateId`], so
//! self-loops and the filler feedback edge need no shared ownership. The
//! graph is immutable once built; all per-frame mutation happens in the
//! [`Decoder`](crate::decoder::Decoder).

use std::fmt;
use std::sync::Arc;

/// Handle of a state inside a [`Network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub usize);

impl StateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Weighted edge to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub to: StateId,
    pub log_prob: f64,
}

/// One sub-state of a 3-state phone model.
#[derive(Debug, Clone)]
pub struct State {
    pub phoneme: Arc<str>,
    /// Position 0, 1 or 2 within the phone model.
    pub position: usize,
    /// Index into the per-frame score vector.
    pub score_index: usize,
    pub is_word_start: bool,
    pub is_word_end: bool,
    /// Label of the owning word (the filler label for filler states).
    pub word: Arc<str>,
    pub transitions: Vec<Transition>,
}

/// The three sub-states of a filler (silence) model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillerNetwork {
    pub entry: StateId,
    pub middle: StateId,
    pub exit: StateId,
}

impl FillerNetwork {
    pub fn states(&self) -> [StateId; 3] {
        [self.entry, self.middle, self.exit]
    }
}

/// Complete state/transition graph with its two filler sub-networks.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) states: Vec<State>,
    pub(crate) initial: FillerNetwork,
    pub(crate) terminal: FillerNetwork,
    pub(crate) filler_word: Arc<str>,
    pub(crate) frame_width: usize,
    pub(crate) word_count: usize,
}

impl Network {
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Leading-silence filler; its entry is the network's start state.
    pub fn initial_filler(&self) -> FillerNetwork {
        self.initial
    }

    /// Trailing-silence filler; word chains end in its entry.
    pub fn terminal_filler(&self) -> FillerNetwork {
        self.terminal
    }

    /// Label carried by filler history entries.
    pub fn filler_word(&self) -> &str {
        &self.filler_word
    }

    /// Minimum length of a frame score vector.
    pub fn frame_width(&self) -> usize {
        self.frame_width
    }

    /// Number of dictionary entries compiled into the graph.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    /// State ids in enumeration (propagation) order.
    pub fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.states.len()).map(StateId)
    }

    /// Flat, cycle-safe listing of every state and its outgoing edges.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, state) in self.states.iter().enumerate() {
            let mut flags = String::new();
            if state.is_word_start {
                flags.push('S');
            }
            if state.is_word_end {
                flags.push('E');
            }
            write!(
                f,
                "s{i}\t{}[{}]\t#{}\t{}\t{}\t->",
                state.phoneme, state.position, state.score_index, state.word, flags
            )?;
            for t in &state.transitions {
                write!(f, " {}", t.to)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

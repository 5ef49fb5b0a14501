//! Network construction from an inventory and a dictionary.
//!
//! Layout of the arena, in propagation order:
//! 1. initial filler (3 states),
//! 2. one left-to-right chain of 3-state phone models per dictionary entry,
//! 3. terminal filler (3 states).
//!
//! Every state self-loops; every edge carries the same configured weight.

use std::sync::Arc;

use crate::config::DecoderConfig;
use crate::error::{DecodeError, Result};
use crate::lexicon::{Dictionary, PhonemeInventory};
use crate::network::{FillerNetwork, Network, State, StateId, Transition};
use crate::utils::{substate_index, SUBSTATES_PER_PHONE};

pub struct NetworkBuilder {
    config: DecoderConfig,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            config: DecoderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_filler(mut self, phoneme: impl Into<String>, word: impl Into<String>) -> Self {
        self.config.filler_phoneme = phoneme.into();
        self.config.filler_word = word.into();
        self
    }

    pub fn with_transition_log_prob(mut self, log_prob: f64) -> Self {
        self.config.transition_log_prob = log_prob;
        self
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Compile `dictionary` into a state graph over `inventory`.
    ///
    /// Fails fast on an empty pronunciation, on a word labelled like the
    /// filler, or on any phoneme (the filler included) missing from the
    /// inventory; nothing is built in that case.
    pub fn build(&self, inventory: &PhonemeInventory, dictionary: &Dictionary) -> Result<Network> {
        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!("build_network", words = dictionary.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        self.config.validate()?;
        if inventory.is_empty() {
            return Err(DecodeError::EmptyInventory);
        }

        let filler_index =
            inventory
                .index_of(&self.config.filler_phoneme)
                .ok_or_else(|| DecodeError::UnknownPhoneme {
                    word: self.config.filler_word.clone(),
                    phoneme: self.config.filler_phoneme.clone(),
                })?;

        // Resolve every pronunciation before allocating a single state.
        let mut chains: Vec<(Arc<str>, Vec<(Arc<str>, usize)>)> =
            Vec::with_capacity(dictionary.len());
        for entry in dictionary.entries() {
            if entry.phonemes.is_empty() {
                return Err(DecodeError::EmptyPronunciation {
                    word: entry.word.clone(),
                });
            }
            if entry.word == self.config.filler_word {
                return Err(DecodeError::Config(format!(
                    "dictionary word '{}' collides with the filler label",
                    entry.word
                )));
            }
            let mut phones = Vec::with_capacity(entry.phonemes.len());
            for phoneme in &entry.phonemes {
                let index =
                    inventory
                        .index_of(phoneme)
                        .ok_or_else(|| DecodeError::UnknownPhoneme {
                            word: entry.word.clone(),
                            phoneme: phoneme.clone(),
                        })?;
                phones.push((Arc::from(phoneme.as_str()), index));
            }
            chains.push((Arc::from(entry.word.as_str()), phones));
        }

        let word_states: usize = chains
            .iter()
            .map(|(_, phones)| phones.len() * SUBSTATES_PER_PHONE)
            .sum();
        let total = 2 * SUBSTATES_PER_PHONE + word_states;
        let weight = self.config.transition_log_prob;
        let filler_phoneme: Arc<str> = Arc::from(self.config.filler_phoneme.as_str());
        let filler_word: Arc<str> = Arc::from(self.config.filler_word.as_str());

        let mut states: Vec<State> = Vec::with_capacity(total);
        let initial = push_filler(&mut states, &filler_phoneme, filler_index, &filler_word, weight);
        let terminal_entry = StateId(total - SUBSTATES_PER_PHONE);

        for (word, phones) in &chains {
            let last_phone = phones.len() - 1;
            let mut previous_exit = initial.exit;
            for (p, (phoneme, index)) in phones.iter().enumerate() {
                let first = StateId(states.len());
                link(&mut states, previous_exit, first, weight);
                for position in 0..SUBSTATES_PER_PHONE {
                    let id = StateId(states.len());
                    states.push(State {
                        phoneme: Arc::clone(phoneme),
                        position,
                        score_index: substate_index(*index, position),
                        is_word_start: p == 0 && position == 0,
                        is_word_end: p == last_phone && position == SUBSTATES_PER_PHONE - 1,
                        word: Arc::clone(word),
                        transitions: vec![Transition {
                            to: id,
                            log_prob: weight,
                        }],
                    });
                    if position > 0 {
                        link(&mut states, StateId(id.0 - 1), id, weight);
                    }
                }
                previous_exit = StateId(states.len() - 1);
            }
            link(&mut states, previous_exit, terminal_entry, weight);
        }

        let terminal = push_filler(&mut states, &filler_phoneme, filler_index, &filler_word, weight);
        debug_assert_eq!(terminal.entry, terminal_entry);
        debug_assert_eq!(states.len(), total);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            states = states.len(),
            words = chains.len(),
            "network built"
        );

        Ok(Network {
            states,
            initial,
            terminal,
            filler_word,
            frame_width: inventory.frame_width(),
            word_count: chains.len(),
        })
    }
}

/// Append a forward edge `from -> to`. Targets may not exist yet.
fn link(states: &mut [State], from: StateId, to: StateId, log_prob: f64) {
    states[from.0].transitions.push(Transition { to, log_prob });
}

/// Append a self-looping 0 -> 1 -> 2 filler chain.
fn push_filler(
    states: &mut Vec<State>,
    phoneme: &Arc<str>,
    phoneme_index: usize,
    word: &Arc<str>,
    weight: f64,
) -> FillerNetwork {
    let base = states.len();
    for position in 0..SUBSTATES_PER_PHONE {
        let id = StateId(base + position);
        states.push(State {
            phoneme: Arc::clone(phoneme),
            position,
            score_index: substate_index(phoneme_index, position),
            is_word_start: position == 0,
            is_word_end: position == SUBSTATES_PER_PHONE - 1,
            word: Arc::clone(word),
            transitions: vec![Transition {
                to: id,
                log_prob: weight,
            }],
        });
        if position > 0 {
            link(states, StateId(id.0 - 1), id, weight);
        }
    }
    FillerNetwork {
        entry: StateId(base),
        middle: StateId(base + 1),
        exit: StateId(base + 2),
    }
}

//! Frame-synchronous token-passing decoder.
//!
//! One call to [`Decoder::step`] advances the search by exactly one frame:
//! 1. every live best token absorbs its state's acoustic score,
//! 2. is copied along each outgoing transition into the destination buffer
//!    (opening a word on leaving a word start, closing it on leaving a word end),
//! 3. every state keeps only the best buffered token (per-state Viterbi),
//! 4. the terminal filler's entry token competes for the initial filler's
//!    entry, closing the word loop,
//! 5. the frame counter advances.
//!
//! Tokens scored negative infinity are dead and never propagated; a state
//! that receives nothing holds [`Token::impossible`].

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{DecoderConfig, TieBreak};
use crate::error::{DecodeError, Result};
use crate::network::{Network, StateId};
use crate::token::{RecognisedWord, Token};
use crate::traits::LikelihoodSource;
use crate::utils::is_admissible_score;

/// Mutable search state over an immutable [`Network`].
pub struct Decoder {
    network: Network,
    best: Vec<Token>,
    buffers: Vec<Vec<Token>>,
    frame: usize,
    tie_break: TieBreak,
}

impl Decoder {
    /// Decoder with the default (last-seen) tie-break.
    pub fn new(network: Network) -> Self {
        Self::with_tie_break(network, TieBreak::default())
    }

    pub fn with_config(network: Network, config: &DecoderConfig) -> Self {
        Self::with_tie_break(network, config.tie_break)
    }

    pub fn with_tie_break(network: Network, tie_break: TieBreak) -> Self {
        let n = network.len();
        let mut decoder = Self {
            network,
            best: vec![Token::impossible(); n],
            buffers: vec![Vec::new(); n],
            frame: 0,
            tie_break,
        };
        decoder.seed();
        decoder
    }

    fn seed(&mut self) {
        self.best.iter_mut().for_each(|t| *t = Token::impossible());
        self.buffers.iter_mut().for_each(Vec::clear);
        self.best[self.network.initial.entry.index()] = Token::certain();
        self.frame = 0;
    }

    /// Forget all hypotheses and start a new utterance on the same network.
    pub fn reset(&mut self) {
        self.seed();
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Number of frames consumed so far.
    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Surviving hypothesis of `id` after the last frame.
    pub fn best_token(&self, id: StateId) -> &Token {
        &self.best[id.index()]
    }

    /// Hypothesis resting in the terminal filler's exit sub-state.
    pub fn terminal_token(&self) -> &Token {
        self.best_token(self.network.terminal.exit)
    }

    /// Best live hypothesis resting in any filler sub-state.
    ///
    /// Initial filler states are scanned first and terminal filler states
    /// last with `>=`, so ties resolve toward the terminal exit.
    pub fn best_filler_token(&self) -> Option<&Token> {
        let initial = self.network.initial.states();
        let terminal = self.network.terminal.states();
        let mut best: Option<&Token> = None;
        for id in initial.iter().chain(terminal.iter()) {
            let token = self.best_token(*id);
            if !token.is_alive() {
                continue;
            }
            if best.map_or(true, |b| token.log_likelihood >= b.log_likelihood) {
                best = Some(token);
            }
        }
        best
    }

    /// Check a frame without touching any state.
    pub fn validate_frame(&self, scores: &[f64]) -> Result<()> {
        let expected = self.network.frame_width();
        if scores.len() < expected {
            return Err(DecodeError::FrameTooShort {
                frame: self.frame,
                expected,
                actual: scores.len(),
            });
        }
        if let Some((index, &value)) = scores
            .iter()
            .enumerate()
            .find(|(_, v)| !is_admissible_score(**v))
        {
            return Err(DecodeError::NonFiniteScore {
                frame: self.frame,
                index,
                value,
            });
        }
        Ok(())
    }

    /// Advance decoding by one frame of per-sub-state log-likelihoods.
    ///
    /// A malformed frame is rejected before any state is modified.
    pub fn step(&mut self, scores: &[f64]) -> Result<()> {
        self.validate_frame(scores)?;

        #[cfg(feature = "tracing")]
        let span = tracing::trace_span!("step", frame = self.frame);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        self.propagate(scores);

        for (best, buffer) in self.best.iter_mut().zip(self.buffers.iter_mut()) {
            *best = select(buffer.drain(..), self.tie_break);
        }

        let entry = self.network.initial.entry.index();
        let looped = self.best[self.network.terminal.entry.index()].clone();
        let current = std::mem::replace(&mut self.best[entry], Token::impossible());
        self.best[entry] = select([current, looped].into_iter(), self.tie_break);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            frame = self.frame,
            terminal = self.terminal_token().log_likelihood,
            "frame decoded"
        );

        self.frame += 1;
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn propagate(&mut self, scores: &[f64]) {
        let network = &self.network;
        let best = &self.best;
        let buffers = &mut self.buffers;
        for id in network.ids() {
            emit(network, &best[id.index()], id, scores, self.frame, |to, token| {
                buffers[to.index()].push(token)
            });
        }
    }

    /// Sources are expanded in parallel; candidates land in destination
    /// buffers in source order, so selection sees the sequential order.
    #[cfg(feature = "parallel")]
    fn propagate(&mut self, scores: &[f64]) {
        let network = &self.network;
        let best = &self.best;
        let frame = self.frame;
        let outgoing: Vec<Vec<(StateId, Token)>> = (0..network.len())
            .into_par_iter()
            .map(|i| {
                let mut out = Vec::new();
                emit(network, &best[i], StateId(i), scores, frame, |to, token| {
                    out.push((to, token))
                });
                out
            })
            .collect();
        for (to, token) in outgoing.into_iter().flatten() {
            self.buffers[to.index()].push(token);
        }
    }

    /// Consume `source` to exhaustion. Returns the number of frames decoded.
    ///
    /// Stops at the first source or frame error; frames already decoded stay
    /// applied and the decoder remains queryable.
    pub fn run<S: LikelihoodSource + ?Sized>(&mut self, source: &mut S) -> Result<usize> {
        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!("decode", states = self.network.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let mut decoded = 0;
        while let Some(frame) = source.next_frame() {
            self.step(&frame?)?;
            decoded += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(frames = decoded, "utterance decoded");
        Ok(decoded)
    }

    /// Decode an in-memory slice of frames.
    pub fn run_frames<F: AsRef<[f64]>>(&mut self, frames: &[F]) -> Result<usize> {
        for frame in frames {
            self.step(frame.as_ref())?;
        }
        Ok(frames.len())
    }
}

/// Copy `token` (the best of `id`) along every transition of `id`.
fn emit<F>(network: &Network, token: &Token, id: StateId, scores: &[f64], frame: usize, mut sink: F)
where
    F: FnMut(StateId, Token),
{
    if !token.is_alive() {
        return;
    }
    let state = network.state(id);
    let scored = token.log_likelihood + scores[state.score_index];
    if scored == f64::NEG_INFINITY {
        return;
    }
    for transition in &state.transitions {
        let mut next = Token {
            log_likelihood: scored + transition.log_prob,
            history: token.history.clone(),
        };
        if transition.to != id {
            if state.is_word_start {
                next.history = next
                    .history
                    .pushed(RecognisedWord::new(state.word.clone(), frame));
            }
            if state.is_word_end {
                next.history = next.history.closed_at(frame);
            }
        }
        sink(transition.to, next);
    }
}

/// Per-state Viterbi reduction over `candidates`.
fn select<I: Iterator<Item = Token>>(candidates: I, tie_break: TieBreak) -> Token {
    let mut best: Option<Token> = None;
    for candidate in candidates {
        if !candidate.is_alive() {
            continue;
        }
        let wins = match &best {
            None => true,
            Some(b) => match tie_break {
                TieBreak::LastSeen => candidate.log_likelihood >= b.log_likelihood,
                TieBreak::FirstSeen => candidate.log_likelihood > b.log_likelihood,
            },
        };
        if wins {
            best = Some(candidate);
        }
    }
    best.unwrap_or_else(Token::impossible)
}

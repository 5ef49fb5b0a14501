//! Seams between the decoder and its acoustic front-end.
//!
//! The decoder never parses feature files itself. Anything that can hand out
//! per-frame score vectors, in order, implements [`LikelihoodSource`]:
//! the HTK reader in [`crate::htk`], the in-memory [`FrameMatrix`], or a
//! caller's own streaming adapter.

use crate::error::Result;

/// Ordered producer of per-frame log-likelihood vectors.
///
/// Each vector is indexed by `phoneme_index * 3 + position`. Returning
/// `None` ends the utterance; returning `Some(Err(_))` aborts decoding.
pub trait LikelihoodSource {
    /// Next frame's scores, or `None` once the utterance is exhausted.
    fn next_frame(&mut self) -> Option<Result<Vec<f64>>>;

    /// Frames remaining, when the source knows it up front.
    fn remaining(&self) -> Option<usize> {
        None
    }
}

/// Frames held in memory, consumed front to back.
#[derive(Debug, Clone, Default)]
pub struct FrameMatrix {
    frames: Vec<Vec<f64>>,
    cursor: usize,
}

impl FrameMatrix {
    pub fn new(frames: Vec<Vec<f64>>) -> Self {
        Self { frames, cursor: 0 }
    }

    pub fn frames(&self) -> &[Vec<f64>] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Start over from the first frame.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl From<Vec<Vec<f64>>> for FrameMatrix {
    fn from(frames: Vec<Vec<f64>>) -> Self {
        Self::new(frames)
    }
}

impl LikelihoodSource for FrameMatrix {
    fn next_frame(&mut self) -> Option<Result<Vec<f64>>> {
        let frame = self.frames.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(Ok(frame))
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.frames.len() - self.cursor)
    }
}

//! Token-passing digit recogniser.
//!
//! This crate decodes a digit-sequence utterance against a fixed pronunciation
//! dictionary. A hand-built HMM network (3-state phone models chained per
//! word, bracketed by two silence fillers) is searched frame by frame with
//! token passing: each state keeps only its single best hypothesis.
//!
//! ## Core idea
//! 1. Describe the phone set with a [`PhonemeInventory`] and the words with a
//!    [`Dictionary`].
//! 2. Compile them into a [`Network`] with [`NetworkBuilder`].
//! 3. Feed per-frame acoustic log-likelihoods to a [`Decoder`], one
//!    [`Decoder::step`] per frame.
//! 4. Read the recognised words with [`result::extract`].
//!
//! The terminal silence filler loops back into the initial one, so any
//! number of words can be recognised in one pass.
//!
//! ## Quick start
//! ```
//! use digit_hmm::{Decoder, Dictionary, NetworkBuilder, PhonemeInventory, Pronunciation};
//!
//! let inventory = PhonemeInventory::new(["pau", "w", "ah", "n"]).unwrap();
//! let dictionary = Dictionary::new(vec![Pronunciation::new("one", ["w", "ah", "n"])]);
//! let network = NetworkBuilder::new().build(&inventory, &dictionary).unwrap();
//!
//! // 15 frames, each making exactly one sub-state dominant in turn:
//! // pau0 pau1 pau2 w0 w1 w2 ah0 ah1 ah2 n0 n1 n2 pau0 pau1 pau2
//! let order = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 1, 2];
//! let frames: Vec<Vec<f64>> = order
//!     .iter()
//!     .map(|&hot| (0..12).map(|i| if i == hot { 0.0 } else { -5.0 }).collect())
//!     .collect();
//!
//! let mut decoder = Decoder::new(network);
//! decoder.run_frames(&frames).unwrap();
//! let words = digit_hmm::result::extract(&decoder);
//! assert_eq!(words.len(), 1);
//! assert_eq!(&*words[0].word, "one");
//! assert_eq!((words[0].start, words[0].end), (3, 11));
//! ```
//!
//! ## Features
//! - `tracing`: spans around network construction and every frame.
//! - `parallel`: per-state propagation on `rayon`, bit-identical results.
//! - `cli`: the `digit_decode` binary.

pub mod builder;
pub mod config;
pub mod decoder;
pub mod error;
pub mod htk;
pub mod lexicon;
pub mod network;
pub mod result;
pub mod token;
pub mod traits;
pub mod utils;

pub use crate::builder::NetworkBuilder;
pub use crate::config::{DecoderConfig, TieBreak};
pub use crate::decoder::Decoder;
pub use crate::error::{DecodeError, Result};
pub use crate::lexicon::{Dictionary, PhonemeInventory, Pronunciation};
pub use crate::network::{Network, StateId};
pub use crate::result::{extract, Transcript};
pub use crate::token::{History, RecognisedWord, Token};
pub use crate::traits::{FrameMatrix, LikelihoodSource};

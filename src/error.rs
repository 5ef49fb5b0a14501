//! Error types for network construction and decoding.

use thiserror::Error;

/// Every failure the decoder can report.
///
/// Configuration problems are raised before any decoding begins; malformed
/// input is raised at the frame (or line) that carries it, before any state
/// is mutated. Search-internal invariant slips are absorbed, never reported.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A dictionary entry lists no phonemes.
    #[error("word '{word}' has an empty pronunciation")]
    EmptyPronunciation { word: String },

    /// A pronunciation (or the filler) references a symbol missing from the inventory.
    #[error("phoneme '{phoneme}' used by '{word}' is not in the inventory")]
    UnknownPhoneme { word: String, phoneme: String },

    /// The inventory lists the same symbol twice.
    #[error("phoneme '{phoneme}' appears more than once in the inventory")]
    DuplicatePhoneme { phoneme: String },

    /// The inventory has no symbols at all.
    #[error("phoneme inventory is empty")]
    EmptyInventory,

    /// A frame vector cannot cover every sub-state index.
    #[error("frame {frame}: expected at least {expected} scores, got {actual}")]
    FrameTooShort {
        frame: usize,
        expected: usize,
        actual: usize,
    },

    /// A frame contains NaN or positive infinity.
    #[error("frame {frame}: score at index {index} is not admissible ({value})")]
    NonFiniteScore {
        frame: usize,
        index: usize,
        value: f64,
    },

    /// A line of an inventory or dictionary file could not be parsed.
    #[error("{source_name}:{line}: {reason}")]
    MalformedLine {
        source_name: String,
        line: usize,
        reason: String,
    },

    /// An HTK parameter file is truncated or uses an unsupported layout.
    #[error("HTK error: {0}")]
    MalformedHtk(String),

    /// Invalid decoder configuration values.
    #[error("Config error: {0}")]
    Config(String),

    /// I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for decoder operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

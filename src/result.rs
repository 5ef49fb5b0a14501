//! Reading the recognised words out of a decoder.

use std::fmt;

use crate::decoder::Decoder;
use crate::token::RecognisedWord;

/// Recognised words, filler removed, oldest first.
///
/// Reads the best hypothesis resting in a filler sub-state (see
/// [`Decoder::best_filler_token`]). An undecoded or dead network yields an
/// empty list.
pub fn extract(decoder: &Decoder) -> Vec<RecognisedWord> {
    let filler = decoder.network().filler_word();
    decoder
        .best_filler_token()
        .map(|token| {
            token
                .history
                .to_vec()
                .into_iter()
                .filter(|w| &*w.word != filler)
                .collect()
        })
        .unwrap_or_default()
}

/// Printable decoding result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    pub words: Vec<RecognisedWord>,
    /// Append `\tstart\tend` to every line.
    pub with_timing: bool,
}

impl Transcript {
    pub fn from_decoder(decoder: &Decoder, with_timing: bool) -> Self {
        Self {
            words: extract(decoder),
            with_timing,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.words.iter().map(|w| &*w.word).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in &self.words {
            if self.with_timing {
                writeln!(f, "{word}")?;
            } else {
                writeln!(f, "{}", word.word)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn words() -> Vec<RecognisedWord> {
        vec![
            RecognisedWord::new(Arc::from("one"), 3).closed_at(11),
            RecognisedWord::new(Arc::from("two"), 15).closed_at(20),
        ]
    }

    #[test]
    fn plain_rendering() {
        let t = Transcript {
            words: words(),
            with_timing: false,
        };
        assert_eq!(t.to_string(), "one\ntwo\n");
        assert_eq!(t.labels(), vec!["one", "two"]);
    }

    #[test]
    fn timed_rendering() {
        let t = Transcript {
            words: words(),
            with_timing: true,
        };
        assert_eq!(t.to_string(), "one\t3\t11\ntwo\t15\t20\n");
    }

    #[test]
    fn empty_renders_nothing() {
        assert_eq!(Transcript::default().to_string(), "");
    }
}

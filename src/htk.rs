//! HTK parameter-file reader.
//!
//! Layout (all big-endian):
//! ```text
//! nSamples   i32
//! sampPeriod i32   (100 ns units)
//! sampSize   i16   (bytes per vector)
//! parmKind   i16
//! nSamples * (sampSize / 4) f32
//! ```
//! Compressed files (`_C`) are not supported. A trailing checksum (`_K`)
//! is ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{DecodeError, Result};
use crate::traits::LikelihoodSource;

const HEADER_LEN: usize = 12;
const QUALIFIER_COMPRESSED: u16 = 0o2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtkHeader {
    pub num_samples: usize,
    /// Frame period in 100 ns units.
    pub sample_period: u32,
    /// Bytes per frame vector.
    pub sample_size: usize,
    pub parm_kind: u16,
}

impl HtkHeader {
    fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(DecodeError::MalformedHtk(format!(
                "header needs {HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let num_samples = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let sample_period = i32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let sample_size = i16::from_be_bytes([bytes[8], bytes[9]]);
        let parm_kind = u16::from_be_bytes([bytes[10], bytes[11]]);

        if num_samples < 0 {
            return Err(DecodeError::MalformedHtk(format!(
                "negative sample count {num_samples}"
            )));
        }
        if sample_period < 0 {
            return Err(DecodeError::MalformedHtk(format!(
                "negative sample period {sample_period}"
            )));
        }
        if sample_size <= 0 || sample_size % 4 != 0 {
            return Err(DecodeError::MalformedHtk(format!(
                "sample size {sample_size} is not a positive multiple of 4"
            )));
        }
        if parm_kind & QUALIFIER_COMPRESSED != 0 {
            return Err(DecodeError::MalformedHtk(
                "compressed parameter files are not supported".into(),
            ));
        }
        Ok(Self {
            num_samples: num_samples as usize,
            sample_period: sample_period as u32,
            sample_size: sample_size as usize,
            parm_kind,
        })
    }

    /// Scores per frame.
    pub fn dimension(&self) -> usize {
        self.sample_size / 4
    }
}

/// A decoded HTK file, consumable as a [`LikelihoodSource`].
#[derive(Debug, Clone)]
pub struct HtkFeatures {
    pub header: HtkHeader,
    frames: Vec<Vec<f64>>,
    cursor: usize,
}

impl HtkFeatures {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = HtkHeader::parse(bytes)?;
        let body = &bytes[HEADER_LEN..];
        let needed = header.num_samples * header.sample_size;
        if body.len() < needed {
            return Err(DecodeError::MalformedHtk(format!(
                "expected {needed} bytes of frame data, got {}",
                body.len()
            )));
        }

        let frames = body[..needed]
            .chunks_exact(header.sample_size)
            .map(|frame| {
                frame
                    .chunks_exact(4)
                    .map(|b| f32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f64)
                    .collect()
            })
            .collect();

        Ok(Self {
            header,
            frames,
            cursor: 0,
        })
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
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
}

impl LikelihoodSource for HtkFeatures {
    fn next_frame(&mut self) -> Option<Result<Vec<f64>>> {
        let frame = self.frames.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(Ok(frame))
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.frames.len() - self.cursor)
    }
}

/// Serialize frames in HTK layout (`USER` kind).
///
/// Every frame must have the width of the first one, and the counts must
/// fit the header's signed fields.
pub fn encode(frames: &[Vec<f32>], sample_period: u32) -> Result<Vec<u8>> {
    let dim = frames.first().map_or(0, Vec::len);
    if let Some((index, frame)) = frames.iter().enumerate().find(|(_, f)| f.len() != dim) {
        return Err(DecodeError::MalformedHtk(format!(
            "frame {index} has {} values, expected {dim}",
            frame.len()
        )));
    }
    let num_samples = i32::try_from(frames.len()).map_err(|_| {
        DecodeError::MalformedHtk(format!("{} frames exceed the header limit", frames.len()))
    })?;
    let period = i32::try_from(sample_period).map_err(|_| {
        DecodeError::MalformedHtk(format!("sample period {sample_period} is out of range"))
    })?;
    let sample_size = dim
        .checked_mul(4)
        .and_then(|bytes| i16::try_from(bytes).ok())
        .ok_or_else(|| DecodeError::MalformedHtk(format!("{dim} values per frame is too wide")))?;

    let mut out = Vec::with_capacity(HEADER_LEN + frames.len() * dim * 4);
    out.extend_from_slice(&num_samples.to_be_bytes());
    out.extend_from_slice(&period.to_be_bytes());
    out.extend_from_slice(&sample_size.to_be_bytes());
    out.extend_from_slice(&9u16.to_be_bytes());
    for frame in frames {
        for v in frame {
            out.extend_from_slice(&v.to_be_bytes());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_frames_big_endian() {
        let bytes = encode(&[vec![0.0, -1.5, 2.25], vec![-0.5, 0.0, 1.0]], 100_000).unwrap();
        let mut feats = HtkFeatures::from_bytes(&bytes).unwrap();
        assert_eq!(feats.header.num_samples, 2);
        assert_eq!(feats.header.sample_period, 100_000);
        assert_eq!(feats.header.dimension(), 3);
        assert_eq!(feats.len(), 2);
        assert_eq!(feats.next_frame().unwrap().unwrap(), vec![0.0, -1.5, 2.25]);
        assert_eq!(feats.remaining(), Some(1));
    }

    #[test]
    fn negative_infinity_survives() {
        let bytes = encode(&[vec![f32::NEG_INFINITY, 0.0]], 1).unwrap();
        let feats = HtkFeatures::from_bytes(&bytes).unwrap();
        assert_eq!(feats.frames()[0][0], f64::NEG_INFINITY);
    }

    #[test]
    fn truncated_data_is_rejected() {
        let mut bytes = encode(&[vec![0.0, 0.0], vec![0.0, 0.0]], 1).unwrap();
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            HtkFeatures::from_bytes(&bytes),
            Err(DecodeError::MalformedHtk(_))
        ));
        assert!(matches!(
            HtkFeatures::from_bytes(&bytes[..5]),
            Err(DecodeError::MalformedHtk(_))
        ));
    }

    #[test]
    fn compressed_kind_is_rejected() {
        let mut bytes = encode(&[vec![0.0]], 1).unwrap();
        let kind = 9u16 | QUALIFIER_COMPRESSED;
        bytes[10..12].copy_from_slice(&kind.to_be_bytes());
        assert!(HtkFeatures::from_bytes(&bytes).is_err());
    }

    #[test]
    fn zero_width_frames_are_rejected() {
        let bytes = encode(&[], 1).unwrap();
        assert!(HtkFeatures::from_bytes(&bytes).is_err());
    }

    #[test]
    fn ragged_frames_are_not_encoded() {
        let err = encode(&[vec![0.0, 0.0], vec![0.0]], 1).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedHtk(m) if m.contains("frame 1")));
    }

    #[test]
    fn oversized_header_fields_are_not_encoded() {
        assert!(encode(&[vec![0.0; 8192]], 1).is_err());
        assert!(encode(&[vec![0.0; 8191]], 1).is_ok());
        assert!(encode(&[vec![0.0]], u32::MAX).is_err());
    }

    #[test]
    fn reader_and_bytes_agree() {
        let bytes = encode(&[vec![1.0, 2.0]], 1).unwrap();
        let feats = HtkFeatures::from_reader(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(feats.frames(), &[vec![1.0, 2.0]]);
    }
}

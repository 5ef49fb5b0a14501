use digit_hmm::{
    result::extract, DecodeError, Decoder, Dictionary, FrameMatrix, LikelihoodSource,
    NetworkBuilder, PhonemeInventory, Pronunciation,
};

fn decoder() -> Decoder {
    let inventory = PhonemeInventory::new(["pau", "w", "ah", "n"]).unwrap();
    let dictionary = Dictionary::new(vec![Pronunciation::new("one", ["w", "ah", "n"])]);
    Decoder::new(NetworkBuilder::new().build(&inventory, &dictionary).unwrap())
}

#[test]
fn zero_frames_yield_nothing() {
    let mut d = decoder();
    assert_eq!(d.run(&mut FrameMatrix::default()).unwrap(), 0);
    assert_eq!(d.frame_index(), 0);
    assert!(extract(&d).is_empty());
}

#[test]
fn single_frame_is_fine() {
    let mut d = decoder();
    d.step(&[-1.0; 12]).unwrap();
    assert_eq!(d.frame_index(), 1);
    assert!(extract(&d).is_empty());
}

#[test]
fn all_impossible_frames_keep_decoder_queryable() {
    let mut d = decoder();
    d.run_frames(&[[f64::NEG_INFINITY; 12]; 4]).unwrap();
    assert_eq!(d.frame_index(), 4);
    assert!(d.best_filler_token().is_none());
    assert!(extract(&d).is_empty());
}

struct FailingSource {
    good: usize,
}

impl LikelihoodSource for FailingSource {
    fn next_frame(&mut self) -> Option<digit_hmm::Result<Vec<f64>>> {
        if self.good == 0 {
            return Some(Err(DecodeError::MalformedHtk("truncated".into())));
        }
        self.good -= 1;
        Some(Ok(vec![0.0; 12]))
    }
}

#[test]
fn source_error_stops_after_applied_prefix() {
    let mut d = decoder();
    let err = d.run(&mut FailingSource { good: 3 }).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedHtk(_)));
    assert_eq!(d.frame_index(), 3);
    // still usable afterwards
    d.step(&[0.0; 12]).unwrap();
    assert_eq!(d.frame_index(), 4);
}

#[test]
fn bad_frame_mid_run_leaves_prefix_applied() {
    let mut d = decoder();
    let frames = vec![vec![0.0; 12], vec![0.0; 12], vec![0.0; 5], vec![0.0; 12]];
    let err = d.run_frames(&frames).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::FrameTooShort {
            frame: 2,
            expected: 12,
            actual: 5
        }
    ));
    assert_eq!(d.frame_index(), 2);
}

#[test]
fn fillers_only_network_decodes_silence() {
    let inventory = PhonemeInventory::new(["pau"]).unwrap();
    let network = NetworkBuilder::new()
        .build(&inventory, &Dictionary::default())
        .unwrap();
    let mut d = Decoder::new(network);
    d.run_frames(&[[0.0; 3]; 10]).unwrap();
    assert!(extract(&d).is_empty());
    assert!(d.best_filler_token().is_some());
    // the terminal filler is unreachable without words
    assert!(!d.terminal_token().is_alive());
}

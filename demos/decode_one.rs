//! Example: recognise "one two" from synthetic likelihoods.
//!
//! Run with:
//! `cargo run --example decode_one`

use digit_hmm::{
    Decoder, Dictionary, NetworkBuilder, PhonemeInventory, Pronunciation, Transcript,
};

fn main() {
    let inventory = PhonemeInventory::new(["pau", "w", "ah", "n", "t", "uw"]).unwrap();
    let dictionary = Dictionary::new(vec![
        Pronunciation::new("one", ["w", "ah", "n"]),
        Pronunciation::new("two", ["t", "uw"]),
    ]);
    let network = NetworkBuilder::new().build(&inventory, &dictionary).unwrap();
    let width = network.frame_width();

    // Each sub-state in turn scores best for two frames:
    // silence, w ah n, silence, t uw, silence.
    let order: Vec<usize> = (0..3)
        .chain(3..12)
        .chain(0..3)
        .chain(12..18)
        .chain(0..3)
        .collect();
    let frames: Vec<Vec<f64>> = order
        .iter()
        .flat_map(|&hot| {
            let frame: Vec<f64> = (0..width)
                .map(|i| if i == hot { (0.9f64).ln() } else { (0.01f64).ln() })
                .collect();
            [frame.clone(), frame]
        })
        .collect();

    let mut decoder = Decoder::new(network);
    decoder.run_frames(&frames).unwrap();

    println!("Decoded {} frames", decoder.frame_index());
    print!("{}", Transcript::from_decoder(&decoder, true));
}

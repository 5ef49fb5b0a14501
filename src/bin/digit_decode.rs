//! Digit-sequence recogniser CLI.
//!
//! Reads a phoneme inventory, a pronunciation dictionary and an HTK file of
//! per-frame log-likelihoods, then prints the recognised words one per line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use digit_hmm::htk::HtkFeatures;
use digit_hmm::{Decoder, DecoderConfig, Dictionary, NetworkBuilder, PhonemeInventory, Transcript};

#[derive(Parser, Debug)]
#[command(name = "digit_decode")]
#[command(author, version, about = "Token-passing digit sequence recogniser", long_about = None)]
struct Cli {
    /// Phoneme inventory, one symbol per line
    #[arg(long)]
    phonemes: PathBuf,

    /// Dictionary, `word<TAB>ph ph ph` per line
    #[arg(long)]
    dict: PathBuf,

    /// HTK parameter file with per-frame log-likelihoods
    #[arg(long)]
    input: PathBuf,

    /// Print start and end frame after every word
    #[arg(long, default_value_t = false)]
    frames: bool,

    /// JSON decoder configuration (filler symbol, transition weight, tie-break)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dump the compiled network to stderr before decoding
    #[arg(long, default_value_t = false)]
    dump_network: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DecoderConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DecoderConfig::default(),
    };

    let inventory = PhonemeInventory::from_file(&cli.phonemes)
        .with_context(|| format!("reading phonemes {}", cli.phonemes.display()))?;
    let dictionary = Dictionary::from_file(&cli.dict)
        .with_context(|| format!("reading dictionary {}", cli.dict.display()))?;
    tracing::info!(
        phonemes = inventory.len(),
        words = dictionary.len(),
        "lexicon loaded"
    );

    let network = NetworkBuilder::new()
        .with_config(config.clone())
        .build(&inventory, &dictionary)
        .context("building network")?;
    if cli.dump_network {
        eprint!("{}", network.describe());
    }

    let mut features = HtkFeatures::from_file(&cli.input)
        .with_context(|| format!("reading likelihoods {}", cli.input.display()))?;
    tracing::info!(
        frames = features.len(),
        dimension = features.header.dimension(),
        "likelihoods loaded"
    );

    let mut decoder = Decoder::with_config(network, &config);
    decoder.run(&mut features).context("decoding")?;

    print!("{}", Transcript::from_decoder(&decoder, cli.frames));
    Ok(())
}

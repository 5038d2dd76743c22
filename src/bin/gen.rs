//! `gen <outfile_prefix> <infile1> [infile2 ...]`
//!
//! Loads one or more mono WAV files, simulates a point source moving
//! along the reference trajectory presets while playing them back, and
//! writes one synthesized output file per microphone in the default
//! array layout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use soundfield::mic::MicArray;
use soundfield::{generator, trajectory};

#[derive(Parser, Debug)]
#[command(about = "Simulate a moving point source recorded by a microphone array")]
struct Args {
    /// Prefix for output files; writes `<prefix>.<k>.wav` for each microphone.
    outfile_prefix: PathBuf,
    /// One or more mono WAV files to play back as the moving source's input.
    #[arg(required = true)]
    infiles: Vec<PathBuf>,
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let inputs = generator::load_inputs(&args.infiles)?;
    log::info!(
        "loaded {} input file(s) at {} Hz, {} samples after extension",
        inputs.len(),
        inputs[0].sample_rate(),
        inputs.iter().map(|s| s.len()).max().unwrap_or(0),
    );

    let mics = MicArray::default_triangle();
    let presets = trajectory::presets();
    log::info!("synthesizing {} microphone streams", mics.len());

    generator::run(&mics, &inputs, presets, &args.outfile_prefix)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

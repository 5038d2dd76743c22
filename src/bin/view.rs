//! `view <infile_prefix> <n_sources>`
//!
//! Headless counterpart to the reference GPU viewer: reads
//! `<prefix>.<k>.wav` for `k` in `[0, n_sources)`, runs the locator loop
//! to completion, and logs the likelihood image's argmax pixel per tick
//! in place of rendering it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use soundfield::field::{DelayTable, FieldSink};
use soundfield::mic::MicArray;
use soundfield::wav;
use soundfield::{locator, Real};

/// Output image resolution, matching the reference viewer's window size.
const XRES: usize = 1200;
const YRES: usize = 1200;
/// Field width in meters; height is the same, giving a square view.
const WIDTH_METERS: Real = 12.0;
/// Correlation window length in samples.
const L: usize = 4096;
/// Super-resolution factor.
const U: usize = 4;

#[derive(Parser, Debug)]
#[command(about = "Locate a moving point source from simulated microphone recordings")]
struct Args {
    /// Prefix shared by input files; reads `<prefix>.<k>.wav`.
    infile_prefix: PathBuf,
    /// Number of microphone input files to read.
    n_sources: usize,
}

/// Logs the argmax pixel of each likelihood image instead of rendering
/// it; a real windowing/GPU sink is a downstream integration.
struct LoggingSink {
    tick: usize,
}

impl FieldSink for LoggingSink {
    fn present(&mut self, image: &[Real], xres: usize, _yres: usize) {
        let (argmax, _) = image
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap_or((0, &0.0));
        let (x, y) = (argmax % xres, argmax / xres);
        log::debug!("tick {}: peak at pixel ({x}, {y})", self.tick);
        self.tick += 1;
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.n_sources != 3 {
        anyhow::bail!(
            "only the default 3-microphone triangle layout is supported; got n_sources={}",
            args.n_sources
        );
    }

    let mut streams = Vec::with_capacity(args.n_sources);
    let mut rate = None;
    for k in 0..args.n_sources {
        let path = PathBuf::from(format!("{}.{k}.wav", args.infile_prefix.display()));
        log::info!("input {k}: {}", path.display());
        let (stream, sample_rate) = wav::read_mono_16(&path)?;
        match rate {
            None => rate = Some(sample_rate),
            Some(r) if r != sample_rate => {
                anyhow::bail!("{}: sample rate {sample_rate} does not match {r}", path.display())
            }
            _ => {}
        }
        streams.push(stream);
    }
    let rate = rate.unwrap();

    let mics = MicArray::default_triangle();
    let table = DelayTable::build(&mics, XRES, YRES, WIDTH_METERS / XRES as Real, rate, L, U);

    let mut loc = locator::Locator::new(&streams, table, L, U)?;
    let mut sink = LoggingSink { tick: 0 };
    locator::run(&mut loc, &mut sink)?;

    log::info!("reached end of input");
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

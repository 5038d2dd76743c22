//! Generator engine: synthesizes one simulated output stream per
//! microphone from a set of input WAV files.
//!
//! A small thread pool (`min(mic count, available parallelism)`) claims
//! microphone indices from a shared atomic counter and synthesizes each
//! microphone's stream to completion before writing its output file,
//! mirroring the reference generator's `gen_thread`/fetch-and-add
//! scheduling rather than a work-stealing pool.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::Error;
use crate::mic::MicArray;
use crate::prop;
use crate::trajectory::Preset;
use crate::wav;
use crate::wave::Stream;

/// Load all input WAV files, validate they share a sample rate, and
/// cyclically extend the shorter ones to the longest input's length.
pub fn load_inputs(paths: &[PathBuf]) -> Result<Vec<Stream>, Error> {
    if paths.is_empty() {
        return Err(Error::BadInput("no input files given".into()));
    }

    let mut streams = Vec::with_capacity(paths.len());
    let mut rate = None;
    let mut max_len = 0;

    for path in paths {
        let (stream, sample_rate) = wav::read_mono_16(path)?;
        match rate {
            None => rate = Some(sample_rate),
            Some(r) if r != sample_rate => {
                return Err(Error::BadInput(format!(
                    "{}: sample rate {sample_rate} does not match previous input's {r}",
                    path.display(),
                )))
            }
            _ => {}
        }
        max_len = max_len.max(stream.len());
        streams.push(stream);
    }

    for stream in &mut streams {
        stream.extend_cyclic(max_len);
    }

    Ok(streams)
}

/// Synthesize and write `<out_prefix>.<k>.wav` for every microphone `k`
/// in `mics`, using `n = min(mics.len(), available_parallelism)` worker
/// threads claiming indices from a shared counter.
pub fn run(
    mics: &MicArray,
    inputs: &[Stream],
    presets: &[Preset],
    out_prefix: &Path,
) -> Result<(), Error> {
    let n_mics = mics.len();
    let n_threads = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
        .min(n_mics)
        .max(1);

    let counter = AtomicUsize::new(0);
    let fatal: Mutex<Option<Error>> = Mutex::new(None);
    let input_refs: Vec<&Stream> = inputs.iter().collect();

    std::thread::scope(|scope| {
        for _ in 0..n_threads {
            scope.spawn(|| loop {
                let index = counter.fetch_add(1, Ordering::SeqCst);
                if index >= n_mics {
                    return;
                }

                log::info!("starting mic {index}");
                let mic = mics.position(index);
                let samples = prop::propagate_one_mic(&input_refs, mic, presets);

                let rate = inputs[0].sample_rate() as u32;
                let path = PathBuf::from(format!("{}.{index}.wav", out_prefix.display()));

                match wav::write_mono_16(&path, rate, &samples) {
                    Ok(()) => log::info!("{}: written", path.display()),
                    Err(Error::ShortWrite(msg)) => log::warn!("{msg}"),
                    Err(e) => {
                        log::error!("{e}");
                        *fatal.lock().unwrap() = Some(e);
                    }
                }
            });
        }
    });

    match fatal.into_inner().unwrap() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

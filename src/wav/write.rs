//! WAV file writing.
//!
//! Writes the canonical 44-byte header (no padding, no extra chunks) so
//! the reader's chunk-walking is exercised only by files that did not
//! come from this crate.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::Error;

fn write_header<W: Write>(w: &mut W, sample_rate: u32, n_samples: usize) -> io::Result<()> {
    let data_size = (n_samples * 2) as u32;
    w.write_all(b"RIFF")?;
    w.write_all(&(data_size + 36).to_le_bytes())?;
    w.write_all(b"WAVE")?;

    w.write_all(b"fmt ")?;
    w.write_all(&16u32.to_le_bytes())?;
    w.write_all(&1u16.to_le_bytes())?; // PCM
    w.write_all(&1u16.to_le_bytes())?; // mono
    w.write_all(&sample_rate.to_le_bytes())?;
    w.write_all(&(sample_rate * 2).to_le_bytes())?; // byte rate
    w.write_all(&2u16.to_le_bytes())?; // block align
    w.write_all(&16u16.to_le_bytes())?; // bits per sample

    w.write_all(b"data")?;
    w.write_all(&data_size.to_le_bytes())?;
    Ok(())
}

/// Write `samples` as a 16-bit mono PCM WAV file at `sample_rate` hertz.
///
/// A partial write is not treated as fatal: it is reported back as
/// [`Error::ShortWrite`] so the caller can warn and continue, per the
/// error handling design.
pub fn write_mono_16(path: &Path, sample_rate: u32, samples: &[i16]) -> Result<(), Error> {
    let file = File::create(path)
        .map_err(|e| Error::BadInput(format!("{}: could not create file: {e}", path.display())))?;
    let mut w = BufWriter::new(file);

    write_header(&mut w, sample_rate, samples.len())
        .map_err(|e| Error::ShortWrite(format!("{}: header: {e}", path.display())))?;

    for &sample in samples {
        if let Err(e) = w.write_all(&sample.to_le_bytes()) {
            return Err(Error::ShortWrite(format!("{}: data: {e}", path.display())));
        }
    }

    w.flush()
        .map_err(|e| Error::ShortWrite(format!("{}: flush: {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn writes_canonical_44_byte_header() {
        let mut path = temp_dir();
        path.push("soundfield_test_header.wav");
        write_mono_16(&path, 44100, &[0, 1, -1, 100]).unwrap();

        let buf = std::fs::read(&path).unwrap();
        assert_eq!(&buf[0..4], b"RIFF");
        assert_eq!(&buf[8..12], b"WAVE");
        assert_eq!(&buf[12..16], b"fmt ");
        assert_eq!(u32::from_le_bytes(buf[16..20].try_into().unwrap()), 16);
        assert_eq!(&buf[36..40], b"data");
        assert_eq!(u32::from_le_bytes(buf[40..44].try_into().unwrap()), 8);
        assert_eq!(buf.len(), 44 + 8);

        let _ = std::fs::remove_file(&path);
    }
}

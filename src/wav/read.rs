//! WAV file reading.

use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::wave::Stream;
use crate::Real;

/// Locate a chunk by its 4-byte magic starting at `offset`, returning
/// `(chunk_data_start, declared_len, next_offset)`.
///
/// Some writers pad the `fmt ` chunk to 18 bytes instead of 16; rather than
/// assume a fixed header size, this walks chunks by magic so such files
/// still load.
fn next_chunk(buf: &[u8], offset: usize, magic: &[u8; 4]) -> Result<(usize, usize, usize), Error> {
    if offset + 8 > buf.len() {
        return Err(Error::BadInput(format!(
            "truncated file: expected '{}' chunk at offset {offset}",
            std::str::from_utf8(magic).unwrap_or("?"),
        )));
    }
    if &buf[offset..offset + 4] != magic {
        return Err(Error::BadInput(format!(
            "expected '{}' chunk at offset {offset}, found {:?}",
            std::str::from_utf8(magic).unwrap_or("?"),
            &buf[offset..offset + 4],
        )));
    }
    let len = u32::from_le_bytes(buf[offset + 4..offset + 8].try_into().unwrap()) as usize;
    Ok((offset + 8, len, offset + 8 + len))
}

/// Read a 16-bit mono PCM WAV file, returning its samples scaled to
/// `[-1.0, 1.0]` and its sample rate in hertz.
///
/// If the `data` chunk's declared length exceeds the actual file length,
/// `min(declared, actual)` samples are read instead of failing.
pub fn read_mono_16(path: &Path) -> Result<(Stream, f64), Error> {
    let buf = fs::read(path)
        .map_err(|e| Error::BadInput(format!("{}: {e}", path.display())))?;

    if buf.len() < 12 {
        return Err(Error::BadInput(format!("{}: file too small", path.display())));
    }
    if &buf[0..4] != b"RIFF" || &buf[8..12] != b"WAVE" {
        return Err(Error::BadInput(format!("{}: not a RIFF/WAVE file", path.display())));
    }
    let offset = 12;

    let (fmt_start, fmt_len, mut offset) = next_chunk(&buf, offset, b"fmt ")?;
    if fmt_len < 16 {
        return Err(Error::BadInput(format!(
            "{}: 'fmt ' chunk too short ({fmt_len} bytes)",
            path.display()
        )));
    }
    if buf.len() < fmt_start + 16 {
        return Err(Error::BadInput(format!(
            "{}: truncated 'fmt ' chunk: declares {fmt_len} bytes but only {} remain",
            path.display(),
            buf.len().saturating_sub(fmt_start),
        )));
    }
    let format_tag = u16::from_le_bytes(buf[fmt_start..fmt_start + 2].try_into().unwrap());
    let channels = u16::from_le_bytes(buf[fmt_start + 2..fmt_start + 4].try_into().unwrap());
    let sample_rate = u32::from_le_bytes(buf[fmt_start + 4..fmt_start + 8].try_into().unwrap());
    let bits_per_sample =
        u16::from_le_bytes(buf[fmt_start + 14..fmt_start + 16].try_into().unwrap());
    // Tolerate a padded (18-byte) 'fmt ' chunk: `offset` already accounts
    // for the declared chunk length via `next_chunk`.
    if format_tag != 1 || channels != 1 || bits_per_sample != 16 {
        return Err(Error::BadInput(format!(
            "{}: unsupported format (tag {format_tag}, {channels} channels, {bits_per_sample}-bit) - only 16-bit mono PCM is supported",
            path.display()
        )));
    }

    // Walk any chunks between 'fmt ' and 'data' (e.g. 'fact' or 'LIST').
    loop {
        if offset + 8 > buf.len() {
            return Err(Error::BadInput(format!(
                "{}: no 'data' chunk found",
                path.display()
            )));
        }
        if &buf[offset..offset + 4] == b"data" {
            break;
        }
        let chunk_len = u32::from_le_bytes(buf[offset + 4..offset + 8].try_into().unwrap()) as usize;
        offset += 8 + chunk_len;
    }

    let (data_start, declared_len, _) = next_chunk(&buf, offset, b"data")?;
    let available_len = buf.len().saturating_sub(data_start);
    let byte_len = declared_len.min(available_len);
    let n_samples = byte_len / 2;

    let scale: Real = 1.0 / 32768.0;
    let mut samples = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let lo = data_start + i * 2;
        let raw = i16::from_le_bytes([buf[lo], buf[lo + 1]]);
        samples.push(raw as Real * scale);
    }

    Ok((Stream::new(samples, sample_rate as f64), sample_rate as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::write_mono_16;
    use std::env::temp_dir;

    #[test]
    fn read_write_round_trip_is_identity() {
        let mut path = temp_dir();
        path.push("soundfield_test_round_trip.wav");

        let original: Vec<i16> = (0..2000i32).map(|i| ((i * 37) % 30000 - 15000) as i16).collect();
        write_mono_16(&path, 48000, &original).unwrap();

        let (stream, rate) = read_mono_16(&path).unwrap();
        assert_eq!(rate, 48000.0);
        assert_eq!(stream.len(), original.len());
        for (a, b) in stream.as_slice().iter().zip(original.iter()) {
            let back = (a * 32768.0).round() as i16;
            assert_eq!(back, *b);
        }

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn tolerates_padded_fmt_chunk() {
        let mut path = temp_dir();
        path.push("soundfield_test_padded_fmt.wav");

        let samples: [i16; 4] = [0, 100, -100, 32000];
        let data_bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();

        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        let riff_size = 4 + (8 + 18) + (8 + data_bytes.len());
        buf.extend_from_slice(&(riff_size as u32).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&18u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&44100u32.to_le_bytes());
        buf.extend_from_slice(&(44100 * 2u32).to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&16u16.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes()); // padding word

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&(data_bytes.len() as u32).to_le_bytes());
        buf.extend_from_slice(&data_bytes);

        std::fs::write(&path, &buf).unwrap();

        let (stream, rate) = read_mono_16(&path).unwrap();
        assert_eq!(rate, 44100.0);
        assert_eq!(stream.len(), 4);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn truncated_fmt_chunk_is_bad_input_not_a_panic() {
        let mut path = temp_dir();
        path.push("soundfield_test_truncated_fmt.wav");

        // Declares a 16-byte 'fmt ' chunk but the file ends 4 bytes short of
        // that, mimicking a file cut off mid-write.
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&44100u32.to_le_bytes());
        buf.extend_from_slice(&(44100 * 2u32).to_le_bytes());
        // missing block align, bits per sample, and any 'data' chunk

        std::fs::write(&path, &buf).unwrap();

        match read_mono_16(&path) {
            Err(Error::BadInput(_)) => {}
            other => panic!("expected BadInput, got {other:?}"),
        }

        let _ = std::fs::remove_file(&path);
    }
}

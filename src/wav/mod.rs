//! 16-bit mono PCM WAV file I/O.
//!
//! Out of scope as a general audio codec per the design — this reads and
//! writes exactly one format: 16-bit signed little-endian mono PCM. Any
//! other channel count or bit depth is a fatal [`crate::Error::BadInput`].

mod read;
mod write;

pub use read::read_mono_16;
pub use write::write_mono_16;

//! In-memory mono audio stream.

use crate::Real;

/// An ordered sequence of samples of known length, tagged with a sample
/// rate. Conceptually immutable once loaded; [`Stream::extend_cyclic`] is
/// the one in-place mutation the generator needs to bring all input
/// streams to a common length before synthesis.
#[derive(Clone, Debug)]
pub struct Stream {
    samples: Vec<Real>,
    sample_rate: f64,
}

impl Stream {
    pub fn new(samples: Vec<Real>, sample_rate: f64) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn zero(len: usize, sample_rate: f64) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[inline]
    pub fn as_slice(&self) -> &[Real] {
        &self.samples
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Real] {
        &mut self.samples
    }

    /// Cyclically repeat this stream's content in place until it reaches
    /// `target_len` samples. Streams shorter than the target thus become
    /// seamlessly looping; a stream already at or beyond `target_len` is
    /// left unchanged.
    pub fn extend_cyclic(&mut self, target_len: usize) {
        let len = self.samples.len();
        if len == 0 || len >= target_len {
            return;
        }
        self.samples.reserve(target_len - len);
        let mut pos = len;
        while pos < target_len {
            let to_copy = len.min(target_len - pos);
            let chunk: Vec<Real> = self.samples[..to_copy].to_vec();
            self.samples.extend_from_slice(&chunk);
            pos += to_copy;
        }
        self.samples.truncate(target_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_cyclic_loops_short_stream() {
        let mut s = Stream::new(vec![1.0, 2.0, 3.0], 44100.0);
        s.extend_cyclic(7);
        assert_eq!(s.as_slice(), &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn extend_cyclic_leaves_long_stream_alone() {
        let mut s = Stream::new(vec![1.0, 2.0, 3.0, 4.0], 44100.0);
        s.extend_cyclic(2);
        assert_eq!(s.len(), 4);
    }
}

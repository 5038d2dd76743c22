//! Fixed microphone array: positions and the pair ring they form.

use crate::math::Vec3;
use crate::RSQRT_3;

/// An ordered, fixed set of microphone positions.
///
/// Pairs are defined as the ring `k -> (k, (k + 1) % n)`, exactly `n` of
/// them. This ordering is load-bearing: [`field`](crate::field) computes
/// its likelihood product over the same ring, so changing the pair set
/// changes the physical meaning of the result.
#[derive(Clone, Debug)]
pub struct MicArray {
    positions: Vec<Vec3>,
}

impl MicArray {
    pub fn new(positions: Vec<Vec3>) -> Self {
        assert!(positions.len() >= 2, "need at least two microphones");
        Self { positions }
    }

    /// The default three-microphone equilateral triangle inscribed in the
    /// unit circle.
    pub fn default_triangle() -> Self {
        Self::new(vec![
            Vec3::new(-0.5, -RSQRT_3 / 2.0, 0.0),
            Vec3::new(0.5, -RSQRT_3 / 2.0, 0.0),
            Vec3::new(0.0, RSQRT_3, 0.0),
        ])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn position(&self, index: usize) -> Vec3 {
        self.positions[index]
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Iterate the `n` ring pairs `(k, (k+1) % n)` in order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.len();
        (0..n).map(move |k| (k, (k + 1) % n))
    }
}

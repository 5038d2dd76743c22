//! Field mapper (FIELD).
//!
//! Converts a correlation frame into a scalar likelihood image by looking
//! up, at each pixel, the correlation-row index implied by that pixel's
//! world position under each microphone pair, and multiplying across
//! pairs.

use crate::math::{clamp, Vec3};
use crate::mic::MicArray;
use crate::xcor::Frame;
use crate::{Real, SOUND_SPEED};

/// Precomputed per-pixel, per-pair delay-row index.
///
/// Pixel `(x, y)` maps to world position `w = ((x - xres/2) * scale,
/// (yres/2 - y) * scale, 0)`; row `k`'s entry is the expected correlation
/// lag between microphones `k` and `(k+1) % n` for a source at `w`,
/// clamped into `[0, L*U)`.
pub struct DelayTable {
    n: usize,
    xres: usize,
    yres: usize,
    data: Vec<u32>,
}

impl DelayTable {
    /// Build the table for a microphone array, image resolution, and
    /// pixel-to-meter scale, given the correlation window `l` and
    /// super-resolution factor `u` used for the run.
    pub fn build(
        mics: &MicArray,
        xres: usize,
        yres: usize,
        meters_per_pixel: Real,
        rate: f64,
        l: usize,
        u: usize,
    ) -> Self {
        let n = mics.len();
        let lu = l * u;
        let half_lu = (lu / 2) as Real;
        let mut data = vec![0u32; n * xres * yres];

        for (k, (a, b)) in mics.pairs().enumerate() {
            let ma = mics.position(a);
            let mb = mics.position(b);
            for y in 0..yres {
                for x in 0..xres {
                    let w = Vec3::new(
                        (x as Real - xres as Real * 0.5) * meters_per_pixel,
                        (yres as Real * 0.5 - y as Real) * meters_per_pixel,
                        0.0,
                    );
                    let d0 = w.dist(ma);
                    let d1 = w.dist(mb);
                    let raw = ((d0 - d1) * rate as Real * u as Real / SOUND_SPEED + half_lu)
                        .round();
                    let clamped = clamp(0.0, (lu - 1) as Real, raw);
                    data[k * xres * yres + y * xres + x] = clamped as u32;
                }
            }
        }

        Self { n, xres, yres, data }
    }

    pub fn xres(&self) -> usize {
        self.xres
    }

    pub fn yres(&self) -> usize {
        self.yres
    }

    fn delay(&self, k: usize, pixel: usize) -> usize {
        self.data[k * self.xres * self.yres + pixel] as usize
    }
}

/// Receives the likelihood image once per locator tick.
///
/// A real windowing/GPU presentation is a downstream integration; this
/// crate only defines the seam.
pub trait FieldSink {
    fn present(&mut self, image: &[Real], xres: usize, yres: usize);
}

/// Convert one correlation frame into a likelihood image, per-pixel
/// product across pairs with a negative running product clamped to zero.
pub fn accumulate(frame: &Frame, table: &DelayTable, out: &mut [Real]) {
    let n_pixels = table.xres * table.yres;
    assert_eq!(out.len(), n_pixels);
    assert_eq!(frame.pairs(), table.n);

    for (p, slot) in out.iter_mut().enumerate() {
        let mut acc: Real = 1.0;
        for k in 0..table.n {
            let delay = table.delay(k, p);
            acc *= frame.row(k)[delay];
            if acc < 0.0 {
                acc = 0.0;
            }
        }
        *slot = acc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mic::MicArray;
    use crate::xcor::Engine;

    #[test]
    fn delay_table_entries_stay_in_range() {
        let mics = MicArray::default_triangle();
        let table = DelayTable::build(&mics, 32, 32, 0.02, 44100.0, 512, 1);
        for &d in &table.data {
            assert!((d as usize) < 512);
        }
    }

    #[test]
    fn delay_is_zero_lag_at_equidistant_pixel() {
        let mics = MicArray::default_triangle();
        let l = 512;
        let u = 1;
        let table = DelayTable::build(&mics, 65, 65, 0.02, 44100.0, l, u);
        // Center pixel (32, 32) maps to world origin, equidistant from the
        // default triangle's first two microphones by construction.
        let center_pixel = 32 * 65 + 32;
        let delay = table.delay(0, center_pixel);
        assert_eq!(delay, l * u / 2);
    }

    #[test]
    fn accumulate_clamps_negative_running_product_to_zero() {
        let mics = MicArray::default_triangle();
        let n = mics.len();
        let l = 4;
        let u = 1;
        let engine = Engine::new(l, n, u).unwrap();
        let mut frame = engine.new_frame();
        // Force row 0 negative, others positive, at the delay the table
        // will look up for pixel 0.
        let table = DelayTable::build(&mics, 1, 1, 0.02, 44100.0, l, u);
        for k in 0..n {
            frame.row_mut(k).fill(1.0);
        }
        let d0 = table.delay(0, 0);
        frame.row_mut(0)[d0] = -0.5;

        let mut out = vec![0.0; 1];
        accumulate(&frame, &table, &mut out);
        assert_eq!(out[0], 0.0);
    }
}

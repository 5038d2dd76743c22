//! Cross-correlation engine (XCOR).
//!
//! Batched FFT phase-transform (GCC-PHAT) cross-correlator over `N`
//! streams, with optional band-limited zero-padding for super-resolution.
//! "Batched" here means one shared `rustfft` plan applied in a loop across
//! all `N` rows of a frame, the same treatment this corpus's own GCC-PHAT
//! code gives a single-pair FFT, just repeated per row instead of called
//! once.

use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::Error;
use crate::math::clamp;
use crate::Real;

/// An owned `N x (L*U)` correlation frame, row `k` holding the PHAT
/// cross-correlation of microphone pair `k`.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<Real>,
    n: usize,
    row_len: usize,
}

impl Frame {
    pub(crate) fn new(n: usize, row_len: usize) -> Self {
        Self {
            data: vec![0.0; n * row_len],
            n,
            row_len,
        }
    }

    pub fn row(&self, k: usize) -> &[Real] {
        &self.data[k * self.row_len..(k + 1) * self.row_len]
    }

    pub(crate) fn row_mut(&mut self, k: usize) -> &mut [Real] {
        let row_len = self.row_len;
        &mut self.data[k * row_len..(k + 1) * row_len]
    }

    pub fn pairs(&self) -> usize {
        self.n
    }

    fn as_mut_slice(&mut self) -> &mut [Real] {
        &mut self.data
    }
}

/// Stateful correlation engine: owns its FFT plans and scratch buffers so
/// instances can be created, reset, and torn down independently — unlike
/// the original's process-level global FFT state, this removes the
/// coupling and permits multiple instances or a testable reset path.
pub struct Engine {
    n: usize,
    l: usize,
    u: usize,
    fwd_len: usize,
    inv_len: usize,
    forward: Arc<dyn Fft<Real>>,
    inverse: Arc<dyn Fft<Real>>,
    fwd_buf: Vec<Complex<Real>>,
    inv_buf: Vec<Complex<Real>>,
}

impl Engine {
    /// Allocate the forward (`2L`-row) and inverse (`2LU`-row) complex
    /// buffers and plan the batched forward/inverse FFTs.
    pub fn new(l: usize, n: usize, u: usize) -> Result<Self, Error> {
        if l == 0 || n == 0 || u == 0 {
            return Err(Error::ResourceExhausted(
                "correlation window, microphone count, and upsample factor must all be nonzero"
                    .into(),
            ));
        }
        let fwd_len = 2 * l;
        let inv_len = 2 * l * u;

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(fwd_len);
        let inverse = planner.plan_fft_inverse(inv_len);

        let fwd_buf = vec![Complex::new(0.0, 0.0); fwd_len * n];
        let inv_buf = vec![Complex::new(0.0, 0.0); inv_len * n];

        Ok(Self {
            n,
            l,
            u,
            fwd_len,
            inv_len,
            forward,
            inverse,
            fwd_buf,
            inv_buf,
        })
    }

    pub fn new_frame(&self) -> Frame {
        Frame::new(self.n, self.l * self.u)
    }

    /// Compute one correlation frame starting at read offset `s`.
    ///
    /// `streams[k]` must have at least `s + L` samples. Writes pair `k`'s
    /// row as the PHAT cross-correlation of microphones `k` and
    /// `(k+1) % N`, centered so that `L*U/2` is zero delay. Not
    /// concurrency-safe with itself on the same instance: the scratch
    /// buffers are reused across calls.
    pub fn correlate(&mut self, streams: &[&[Real]], s: usize, out: &mut Frame) {
        assert_eq!(streams.len(), self.n, "expected one stream per microphone");
        let l = self.l;
        let fwd_len = self.fwd_len;
        let inv_len = self.inv_len;

        // 1. Forward batch: copy data[k][s..s+L] into a 2L complex row,
        // second half zero-padded for linear correlation.
        for k in 0..self.n {
            let row = &mut self.fwd_buf[k * fwd_len..(k + 1) * fwd_len];
            let src = &streams[k][s..s + l];
            for (j, slot) in row.iter_mut().enumerate() {
                *slot = if j < l {
                    Complex::new(src[j], 0.0)
                } else {
                    Complex::new(0.0, 0.0)
                };
            }
            self.forward.process(row);
        }

        // 2-3. Pairwise phase-conjugate product with per-bin PHAT
        // normalization, placed into the wider inverse buffer as a
        // band-limited spectrum (lower half at the start, upper half at
        // the end, new bins in between left zero).
        for k in 0..self.n {
            let next = (k + 1) % self.n;
            let (src, src_next) = if k < next {
                let (a, b) = self.fwd_buf.split_at(next * fwd_len);
                (&a[k * fwd_len..(k + 1) * fwd_len], &b[..fwd_len])
            } else {
                // next == 0 < k: fetch both via indexing since a single
                // split_at can't express this non-adjacent pair.
                let src: Vec<Complex<Real>> =
                    self.fwd_buf[k * fwd_len..(k + 1) * fwd_len].to_vec();
                let src_next: Vec<Complex<Real>> = self.fwd_buf[0..fwd_len].to_vec();
                let dst = &mut self.inv_buf[k * inv_len..(k + 1) * inv_len];
                for v in dst.iter_mut() {
                    *v = Complex::new(0.0, 0.0);
                }
                place_phat_product(&src, &src_next, dst, fwd_len, inv_len);
                continue;
            };
            let dst = &mut self.inv_buf[k * inv_len..(k + 1) * inv_len];
            for v in dst.iter_mut() {
                *v = Complex::new(0.0, 0.0);
            }
            place_phat_product(src, src_next, dst, fwd_len, inv_len);
        }

        // 4. Inverse batch.
        for k in 0..self.n {
            let row = &mut self.inv_buf[k * inv_len..(k + 1) * inv_len];
            self.inverse.process(row);
        }

        // 5. Shift and overlap-bias scaling.
        let lu = l * self.u;
        let half_lu = lu / 2;
        let scale = self.u as Real * 0.5;
        let dst = out.as_mut_slice();
        for k in 0..self.n {
            let row = &self.inv_buf[k * inv_len..(k + 1) * inv_len];
            let out_row = &mut dst[k * lu..(k + 1) * lu];
            for j in 0..lu {
                let d = (j as i64 - half_lu as i64).unsigned_abs() as Real;
                let j_src = (j + inv_len - half_lu) % inv_len;
                out_row[j] = row[j_src].re * scale / (lu as Real - d);
            }
        }
    }
}

/// Multiply `src` by the conjugate of `src_next` bin-by-bin, normalize
/// each product to unit magnitude (PHAT), and place the result into `dst`
/// as a band-limited spectrum: the lower half at the start of the row,
/// the upper half at the end.
fn place_phat_product(
    src: &[Complex<Real>],
    src_next: &[Complex<Real>],
    dst: &mut [Complex<Real>],
    fwd_len: usize,
    inv_len: usize,
) {
    let half = fwd_len / 2;
    for j in 0..half {
        dst[j] = phat_normalize(src[j] * src_next[j].conj());
    }
    for j in half..fwd_len {
        dst[inv_len - fwd_len + j] = phat_normalize(src[j] * src_next[j].conj());
    }
}

#[inline]
fn phat_normalize(x: Complex<Real>) -> Complex<Real> {
    let mag = x.norm();
    if mag > 0.0 {
        x / mag
    } else {
        Complex::new(0.0, 0.0)
    }
}

/// Clamp a lag index into `[0, row_len)`, as the delay table and field
/// mapper both need when a source geometry implies an out-of-window lag.
pub fn clamp_index(index: i64, row_len: usize) -> usize {
    clamp(0.0, (row_len - 1) as Real, index as Real) as usize
}

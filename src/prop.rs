//! Resampler & propagation engine (PROP).
//!
//! Windowed-sinc fractional-delay interpolation plus the point-source
//! propagation physics used to synthesize one simulated microphone stream
//! from one or more input streams and a moving source trajectory.

use std::f64::consts::PI;

use crate::math::Vec3;
use crate::trajectory::{self, Preset};
use crate::wave::Stream;
use crate::{Real, BASELINE_DIST, RESAMPLE_HALF_WIDTH, SOUND_SPEED};

#[inline]
fn tap_or_zero(data: &[Real], idx: i64) -> Real {
    if idx >= 0 && (idx as usize) < data.len() {
        data[idx as usize]
    } else {
        0.0
    }
}

/// Interpolate `data` at fractional position `i + delay` using a
/// rectangular-windowed sinc kernel of half-width
/// [`RESAMPLE_HALF_WIDTH`](crate::RESAMPLE_HALF_WIDTH) samples.
///
/// Exploits `sinc(j + fr) = (-1)^j * sin(pi*fr) / (pi*(j + fr))` so only
/// one transcendental evaluation is needed per call; when `fr == 0`
/// (an exactly integer delay) the sum degenerates to a single tap,
/// `data[off]` if in range, `0` otherwise. Both the identity and this
/// short-circuit are required behavior: they set the edge-case result at
/// `fr` near zero.
pub fn resample(data: &[Real], i: usize, delay: Real) -> Real {
    let ds = i as Real + delay;
    let fl = ds.floor();
    let fr = ds - fl;
    let off = fl as i64;

    let sin_pi_fr = ((fr as f64) * PI).sin() as Real;
    if sin_pi_fr == 0.0 {
        return tap_or_zero(data, off);
    }

    let mut acc = 0.0;
    let mut j = -RESAMPLE_HALF_WIDTH;
    while j < RESAMPLE_HALF_WIDTH {
        let sign: Real = if j % 2 == 0 { 1.0 } else { -1.0 };
        let term = sign * sin_pi_fr / (PI as Real * (j as Real + fr));
        acc += tap_or_zero(data, off + j) * term;
        j += 1;
    }
    acc
}

/// Accumulate the propagated contribution of one input stream, recorded
/// by a single microphone, into `out`.
///
/// At output sample `i` (time `t = i / rate`), the instantaneous distance
/// difference `dl = |p(t)| - |p(t) - mic|` determines both a fractional
/// delay in samples (`dl * rate / c`) and an inverse-linear amplitude
/// factor `BASELINE_DIST / (dl + BASELINE_DIST)`. This is a deliberate
/// simplification of inverse-square attenuation, kept for bit-for-bit
/// agreement with the reference output; see DESIGN.md.
pub fn gen_delay(data: &[Real], rate: f64, preset_index: usize, presets: &[Preset], mic: Vec3, out: &mut [Real]) {
    let len = data.len();
    debug_assert_eq!(out.len(), len);
    let irate = 1.0 / rate;

    for i in 0..len {
        let t = i as f64 * irate;
        let source = trajectory::position(t, preset_index, presets);
        let d0 = source.dist(Vec3::ZERO);
        let d1 = source.dist(mic);
        let dl = d0 - d1;

        let amp = BASELINE_DIST / (dl + BASELINE_DIST);
        let delay_samples = dl / SOUND_SPEED * rate as Real;
        out[i] += amp * resample(data, i, delay_samples);
    }
}

/// Synthesize one microphone's output stream from all of `inputs`,
/// mixing down, quantizing to 16-bit, and clamping.
///
/// Each input stream is assigned trajectory preset `index % presets.len()`
/// (spec: "different input streams may be assigned different presets by
/// index modulo preset count"). All input streams must already share a
/// common length and sample rate; the generator engine enforces this by
/// calling [`crate::wave::Stream::extend_cyclic`] before synthesis.
pub fn propagate_one_mic(inputs: &[&Stream], mic: Vec3, presets: &[Preset]) -> Vec<i16> {
    assert!(!inputs.is_empty());
    let len = inputs[0].len();
    let rate = inputs[0].sample_rate();

    let mut acc = vec![0.0 as Real; len];
    for (stream_index, input) in inputs.iter().enumerate() {
        gen_delay(
            input.as_slice(),
            rate,
            stream_index,
            presets,
            mic,
            &mut acc,
        );
    }

    let inv_n = 1.0 / inputs.len() as Real;
    acc.iter()
        .map(|&value| {
            let scaled = (value * inv_n * 32768.0).round();
            let clamped = crate::math::clamp(i16::MIN as Real, i16::MAX as Real, scaled);
            clamped as i16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_at_zero_delay_is_identity_in_range() {
        let data: Vec<Real> = (0..100).map(|i| (i as Real) * 0.01).collect();
        for i in 40..60 {
            let value = resample(&data, i, 0.0);
            assert!((value - data[i]).abs() < 1e-4, "index {i}: {value} != {}", data[i]);
        }
    }

    #[test]
    fn resample_at_integer_delay_returns_exact_tap() {
        let data: Vec<Real> = (0..100).map(|i| (i as Real) * 0.01).collect();
        let value = resample(&data, 50, 3.0);
        assert!((value - data[53]).abs() < 1e-4);
    }

    #[test]
    fn resample_out_of_range_is_zero() {
        let data: Vec<Real> = vec![1.0; 10];
        let value = resample(&data, 5, 1000.0);
        assert_eq!(value, 0.0);
    }

    #[test]
    fn quantized_samples_stay_in_i16_range() {
        let len = 2000;
        let data = Stream::new(
            (0..len)
                .map(|i| ((i as Real) * 0.3).sin() * 2.0) // deliberately clips
                .collect(),
            44100.0,
        );
        let presets = trajectory::presets();
        let mic = Vec3::new(0.5, 0.0, 0.0);
        let samples = propagate_one_mic(&[&data], mic, presets);
        for s in samples {
            assert!((i16::MIN..=i16::MAX).contains(&s));
        }
    }

    #[test]
    fn silence_in_produces_silence_out() {
        let len = 4410;
        let data = Stream::zero(len, 44100.0);
        let presets = trajectory::presets();
        let mic = Vec3::new(0.5, -0.2, 0.0);
        let samples = propagate_one_mic(&[&data], mic, presets);
        assert!(samples.iter().all(|&s| s == 0));
    }
}

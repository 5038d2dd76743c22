//! Simulated source trajectories.
//!
//! The reference engine hard-codes a table of Lissajous parameter sets;
//! per the "Trajectory plug-in" design note this is kept as a small
//! enumerated preset table behind a `position(t, preset) -> Vec3` entry
//! point so [`prop`](crate::prop) never needs to know which preset is in
//! use.

use crate::math::Vec3;
use crate::Real;

use std::f64::consts::PI;

/// A named Lissajous parameter set: period, phase, scale, and translation
/// per axis, plus an overall duration in seconds.
#[derive(Clone, Copy, Debug)]
pub struct Preset {
    pub duration: f64,
    pub period: Vec3,
    pub phase: Vec3,
    pub scale: Vec3,
    pub translate: Vec3,
}

const HALF_PI: Real = (PI / 2.0) as Real;

/// The two reference presets, reproduced from the original trajectory
/// table.
pub fn presets() -> &'static [Preset] {
    const PRESETS: [Preset; 2] = [
        Preset {
            duration: 30.0,
            period: Vec3::new(1.0, 1.0, 0.0),
            phase: Vec3::new(0.0, HALF_PI, 0.0),
            scale: Vec3::new(5.0, 3.0, 0.0),
            translate: Vec3::ZERO,
        },
        Preset {
            duration: 10.0,
            period: Vec3::new(1.0, 1.0, 0.0),
            phase: Vec3::new(HALF_PI, 0.0, 0.0),
            scale: Vec3::new(0.3, 0.3, 0.0),
            translate: Vec3::ZERO,
        },
    ];
    &PRESETS
}

/// Evaluate preset `index` (modulo the preset count) at time `t` seconds.
///
/// `v = sin(period * 2*pi*t/duration + phase) * scale + translate`,
/// applied per axis.
pub fn position(t: f64, index: usize, presets: &[Preset]) -> Vec3 {
    let p = &presets[index % presets.len()];
    let nt = (t * 2.0 * PI / p.duration) as Real;
    let axis = |period: Real, phase: Real, scale: Real, translate: Real| -> Real {
        (period * nt + phase).sin() * scale + translate
    };
    Vec3::new(
        axis(p.period.x, p.phase.x, p.scale.x, p.translate.x),
        axis(p.period.y, p.phase.y, p.scale.y, p.translate.y),
        axis(p.period.z, p.phase.z, p.scale.z, p.translate.z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_at_zero_matches_phase() {
        let p = presets();
        let pos = position(0.0, 0, p);
        // x axis: sin(phase.x) * scale.x + translate.x = sin(0)*5 = 0
        assert!(pos.x.abs() < 1e-5);
        // y axis: sin(phase.y) * scale.y = sin(pi/2)*3 = 3
        assert!((pos.y - 3.0).abs() < 1e-4);
    }

    #[test]
    fn preset_index_wraps_modulo_count() {
        let p = presets();
        let a = position(1.23, 0, p);
        let b = position(1.23, p.len(), p);
        assert_eq!(a, b);
    }
}

//! Acoustic point-source simulation and GCC-PHAT localization over a small
//! planar microphone array.
//!
//! The crate is organized around the three signal-processing components
//! described by the design: [`prop`] (propagation physics and fractional
//! delay resampling), [`xcor`] (batched phase-transform cross-correlation),
//! and [`field`] (delay-table lookup and likelihood accumulation). [`mic`]
//! and [`trajectory`] hold the fixed data these components consume;
//! [`generator`] and [`locator`] wire them into the two runnable pipelines;
//! [`wav`] and [`error`] are the ambient I/O and error plumbing.

pub mod error;
pub mod field;
pub mod generator;
pub mod locator;
pub mod math;
pub mod mic;
pub mod prop;
pub mod trajectory;
pub mod wav;
pub mod wave;
pub mod xcor;

pub use error::Error;

/// Working sample precision. `f32` by default; `f64` with the `double`
/// feature. Mirrors the original engine's `USE_DOUBLE` build switch.
#[cfg(not(feature = "double"))]
pub type Real = f32;
#[cfg(feature = "double")]
pub type Real = f64;

/// Speed of sound, in meters per second.
pub const SOUND_SPEED: Real = 343.0;

/// Baseline distance for the inverse-linear amplitude law, in meters.
pub const BASELINE_DIST: Real = 5.0;

/// Half-width of the windowed-sinc resampling kernel, in samples.
pub const RESAMPLE_HALF_WIDTH: i64 = 31;

/// `sqrt(1/3)`, used to build the default microphone triangle.
pub const RSQRT_3: Real = 0.57735026918962576451;

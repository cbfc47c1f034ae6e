//! Minimal rendering primitives so parameters can be heard offline.

mod biquad;
mod convolve;
mod delay;
mod source;

pub use biquad::{split_bands, Biquad, BiquadCoeffs};
pub use convolve::{apply_reverb, convolve};
pub use delay::DelayLine;
pub use source::{apply_air, apply_ms_width, render_source};

//! Procedural reverb impulses.

mod cache;
mod preset;
mod synth;

pub use cache::ImpulseCache;
pub use preset::{ReflectionTap, ReverbParams, ReverbPreset, DEFAULT_TAPS};
pub use synth::{synthesize_impulse, synthesize_with};

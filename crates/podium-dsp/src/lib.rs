//! Parameter DSP for the virtual stage: propagation solver (gains, delays,
//! directivity, air and floor), an offline coherent noise gate with a worker
//! pool, procedural reverb impulses, and the few rendering primitives needed
//! to hear the result without a host.

pub use podium_core::{Error, Result};

#[cfg(feature = "spatial")]
pub mod spatial;
#[cfg(feature = "spatial")]
pub use spatial::{
    compute_render_params, microphone_response, stereo_response, MicrophoneResponse,
    PropagationContext, PropagationOptions, SourceRenderParams, StereoResponse,
};

#[cfg(feature = "dynamics")]
pub mod dynamics;
#[cfg(feature = "dynamics")]
pub use dynamics::{
    GateOutcome, GateParams, GateResult, GateScheduler, GateStatus, NoiseGate, NoiseGateBuilder,
    SkipReason,
};

#[cfg(feature = "reverb")]
pub mod reverb;
#[cfg(feature = "reverb")]
pub use reverb::{synthesize_impulse, ImpulseCache, ReverbPreset};

#[cfg(feature = "render")]
pub mod render;
#[cfg(feature = "render")]
pub use render::{apply_reverb, render_source};

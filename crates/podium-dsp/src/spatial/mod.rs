//! Propagation solver: microphone responses, bus routing, ITD, directivity,
//! floor reflection and air absorption.
//!
//! All functions are pure. They read a [`MicrophoneConfiguration`] snapshot
//! and return fresh values, so they can run on any thread.
//!
//! [`MicrophoneConfiguration`]: podium_mic::MicrophoneConfiguration

mod air;
mod directivity;
mod ground;
mod itd;
mod options;
mod params;
mod solver;
mod stereo;

pub use air::{AirAbsorption, AirBand, AIR_BAND_COUNT};
pub use directivity::{directivity_blend, DirectivityWeights, INSTRUMENT_FORWARD};
pub use ground::{ground_reflection, GroundReflection, GroundSurface, SurfaceModel};
pub use itd::{normalize_itd, ItdDelays};
pub use options::{PropagationOptions, PropagationOptionsBuilder};
pub use params::{compute_render_params, PropagationContext, RenderPath, SourceRenderParams};
pub use solver::{incidence_angle, mic_position, microphone_response, polar_gain, MicrophoneResponse};
pub use stereo::{
    mic_base_position, ms_decode, stereo_response, BusResponse, ChannelResponse, StereoResponse,
};

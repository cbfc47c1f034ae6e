//! # Podium - Virtual Orchestra Stage
//!
//! Place isolated (anechoic) instrument recordings on a virtual stage and hear
//! them through a configurable stereo microphone array.
//!
//! ## Architecture
//!
//! Podium is an umbrella crate that coordinates:
//! - **podium-core** - Errors, units, stage geometry, audio buffers
//! - **podium-mic** - Polar patterns, stereo techniques, microphone configuration
//! - **podium-dsp** - Propagation solver, coherent noise gate, reverb impulses,
//!   minimal render primitives
//!
//! ## Quick Start
//!
//! ```ignore
//! use podium::prelude::*;
//!
//! let engine = PodiumEngine::builder()
//!     .sample_rate(48000)
//!     .reverb(ReverbPreset::ConcertHall)
//!     .build()?;
//!
//! let cello = engine.add_source("cello", SourcePosition::new(0.4, 0.3), take, None)?;
//! engine.gate_source(cello)?;
//! engine.wait_gate(Duration::from_secs(1));
//!
//! let params = engine.render_params(cello)?;
//! let mix = engine.render_mix()?;
//! ```

/// Re-export of podium-core for direct access
pub use podium_core as core;
/// Re-export of podium-mic
pub use podium_mic as mic;
/// Re-export of podium-dsp
pub use podium_dsp as dsp;

pub use podium_core::{AudioBuffer, SourcePosition, StageDimensions, Vec2};
pub use podium_dsp::dynamics::{GateParams, GateTicket, NoiseGate};
pub use podium_dsp::reverb::ReverbPreset;
pub use podium_dsp::spatial::{
    GroundSurface, PropagationContext, PropagationOptions, SourceRenderParams, StereoResponse,
};
pub use podium_mic::{
    ChannelId, ConfigOverrides, MicrophoneConfiguration, PolarPattern, SessionMicSettings,
    TechniqueId,
};

mod error;
pub use error::{Error, Result};

mod builder;
pub use builder::PodiumEngineBuilder;

mod engine;
pub use engine::{PodiumEngine, SourceId, StageSource};

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        AudioBuffer, ChannelId, ConfigOverrides, Error, GateParams, GroundSurface,
        MicrophoneConfiguration, PodiumEngine, PodiumEngineBuilder, PolarPattern,
        PropagationContext, PropagationOptions, ReverbPreset, Result, SourceId, SourcePosition,
        SourceRenderParams, StageDimensions, StereoResponse, TechniqueId,
    };
    pub use std::time::Duration;
}

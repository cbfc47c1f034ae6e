//! Builder for configuring and constructing a `PodiumEngine`.

use crate::{PodiumEngine, Result};
use podium_core::{Error as CoreError, StageDimensions};
use podium_dsp::dynamics::GateParams;
use podium_dsp::reverb::ReverbPreset;
use podium_dsp::spatial::{GroundSurface, PropagationContext, PropagationOptions};
use podium_mic::MicrophoneConfiguration;

/// Every setting has a default, so `PodiumEngine::builder().build()` gives a
/// 48 kHz engine with a spaced pair in front of a 20 × 12 m stage.
///
/// # Example
///
/// ```ignore
/// use podium::prelude::*;
///
/// let engine = PodiumEngine::builder()
///     .sample_rate(44100)
///     .microphones(MicrophoneConfiguration::create(TechniqueId::DeccaTree, &ConfigOverrides::default()))
///     .ground(Some(GroundSurface::WoodenStage))
///     .reverb(ReverbPreset::ConcertHall)
///     .build()?;
/// ```
pub struct PodiumEngineBuilder {
    sample_rate: u32,
    stage: StageDimensions,
    options: PropagationOptions,
    ground: Option<GroundSurface>,
    microphones: MicrophoneConfiguration,
    gate: GateParams,
    gate_threads: usize,
    reverb: ReverbPreset,
}

impl Default for PodiumEngineBuilder {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            stage: StageDimensions::default(),
            options: PropagationOptions::default(),
            ground: None,
            microphones: MicrophoneConfiguration::default(),
            gate: GateParams::default(),
            gate_threads: 2,
            reverb: ReverbPreset::None,
        }
    }
}

impl PodiumEngineBuilder {
    /// Default: 48000. Every recording added later must use this rate.
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn stage(mut self, stage: StageDimensions) -> Self {
        self.stage = stage;
        self
    }

    pub fn propagation(mut self, options: PropagationOptions) -> Self {
        self.options = options;
        self
    }

    /// Default: none (no floor bounce)
    pub fn ground(mut self, surface: Option<GroundSurface>) -> Self {
        self.ground = surface;
        self
    }

    pub fn microphones(mut self, config: MicrophoneConfiguration) -> Self {
        self.microphones = config;
        self
    }

    pub fn gate(mut self, params: GateParams) -> Self {
        self.gate = params;
        self
    }

    /// Default: 2
    pub fn gate_threads(mut self, threads: usize) -> Self {
        self.gate_threads = threads;
        self
    }

    /// Default: none
    pub fn reverb(mut self, preset: ReverbPreset) -> Self {
        self.reverb = preset;
        self
    }

    pub fn build(self) -> Result<PodiumEngine> {
        if self.sample_rate == 0 {
            return Err(CoreError::InvalidParameter("sample rate must be non-zero".into()).into());
        }
        let context = PropagationContext::new(self.stage, self.options).with_ground(self.ground);
        PodiumEngine::from_parts(
            self.sample_rate,
            context,
            self.microphones.normalized(),
            self.gate,
            self.gate_threads,
            self.reverb,
        )
    }
}

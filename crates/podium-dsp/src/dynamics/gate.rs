//! Energy-driven noise gate, single and coherent.
//!
//! A coherent gate derives one envelope from several recordings of the same
//! player (front mic and bell mic) and applies it to all of them, so the two
//! channels open and close on exactly the same samples.

use super::envelope::{apply_envelope, centered_average, combined_energy, raw_envelope, smooth_envelope};
use super::params::{GateParams, GateParamsBuilder};
use podium_core::AudioBuffer;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a gate pass left its input untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    #[error("no buffers to gate")]
    NoBuffers,

    #[error("all buffers are empty")]
    EmptyInput,

    #[error("sample rate mismatch: expected {expected} Hz, found {found} Hz")]
    SampleRateMismatch { expected: u32, found: u32 },
}

/// Whether the gate ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Applied,
    Skipped(SkipReason),
}

/// Buffers after gating plus the envelope that produced them.
///
/// When skipped, `buffers` are the caller's input unchanged and `envelope` is empty.
#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub status: GateStatus,
    pub buffers: Vec<AudioBuffer>,
    pub envelope: Vec<f32>,
}

impl GateOutcome {
    pub fn is_applied(&self) -> bool {
        self.status == GateStatus::Applied
    }

    fn skipped(reason: SkipReason, buffers: Vec<AudioBuffer>) -> Self {
        Self {
            status: GateStatus::Skipped(reason),
            buffers,
            envelope: Vec::new(),
        }
    }
}

/// Offline noise gate.
///
/// ## Example
///
/// ```ignore
/// use podium_dsp::NoiseGate;
///
/// let gate = NoiseGate::builder().threshold_db(-45.0).hold_ms(80.0).build();
/// let outcome = gate.process_coherent(vec![front, bell]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NoiseGate {
    params: GateParams,
}

impl NoiseGate {
    pub fn new(params: GateParams) -> Self {
        Self { params }
    }

    pub fn builder() -> NoiseGateBuilder {
        NoiseGateBuilder::default()
    }

    pub fn params(&self) -> &GateParams {
        &self.params
    }

    /// Gate a single recording.
    pub fn process(&self, buffer: AudioBuffer) -> GateOutcome {
        self.process_coherent(vec![buffer])
    }

    /// Gate several recordings of one source with a shared envelope.
    ///
    /// All buffers must share a sample rate. Otherwise nothing is processed
    /// and the input comes back as-is.
    pub fn process_coherent(&self, mut buffers: Vec<AudioBuffer>) -> GateOutcome {
        let Some(first) = buffers.first() else {
            return GateOutcome::skipped(SkipReason::NoBuffers, buffers);
        };

        let expected = first.sample_rate();
        if let Some(found) = buffers
            .iter()
            .map(AudioBuffer::sample_rate)
            .find(|&sr| sr != expected)
        {
            warn!(expected, found, "Sample rate mismatch, gate skipped");
            return GateOutcome::skipped(
                SkipReason::SampleRateMismatch { expected, found },
                buffers,
            );
        }

        let envelope = self.envelope(&buffers, expected);
        if envelope.is_empty() {
            debug!("Gate input empty, nothing to do");
            return GateOutcome::skipped(SkipReason::EmptyInput, buffers);
        }

        for buffer in &mut buffers {
            apply_envelope(buffer, &envelope);
        }

        GateOutcome {
            status: GateStatus::Applied,
            buffers,
            envelope,
        }
    }

    /// Envelope for a set of buffers at `sample_rate`, without applying it.
    pub fn envelope(&self, buffers: &[AudioBuffer], sample_rate: u32) -> Vec<f32> {
        let p = &self.params;
        let energy = combined_energy(buffers);
        if energy.is_empty() {
            return energy;
        }

        let window = GateParams::samples(p.detection_window_ms, sample_rate);
        let level = centered_average(&energy, window);

        let raw = raw_envelope(
            &level,
            p.threshold_power(),
            GateParams::samples(p.attack_ms, sample_rate),
            GateParams::samples(p.hold_ms, sample_rate),
            GateParams::samples(p.release_ms, sample_rate),
        );

        smooth_envelope(&raw, GateParams::samples(p.smoothing_ms, sample_rate))
    }
}

/// Builder for [`NoiseGate`] with fluent API.
#[derive(Clone, Debug, Default)]
pub struct NoiseGateBuilder {
    params: GateParamsBuilder,
}

impl NoiseGateBuilder {
    /// Threshold in dBFS (-90.0 to 0.0)
    pub fn threshold_db(mut self, db: f32) -> Self {
        self.params = self.params.threshold_db(db);
        self
    }

    pub fn attack_ms(mut self, ms: f32) -> Self {
        self.params = self.params.attack_ms(ms);
        self
    }

    pub fn hold_ms(mut self, ms: f32) -> Self {
        self.params = self.params.hold_ms(ms);
        self
    }

    pub fn release_ms(mut self, ms: f32) -> Self {
        self.params = self.params.release_ms(ms);
        self
    }

    pub fn detection_window_ms(mut self, ms: f32) -> Self {
        self.params = self.params.detection_window_ms(ms);
        self
    }

    pub fn smoothing_ms(mut self, ms: f32) -> Self {
        self.params = self.params.smoothing_ms(ms);
        self
    }

    pub fn build(self) -> NoiseGate {
        NoiseGate::new(self.params.build())
    }
}

//! Noise gate settings.

/// Gate timing and threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateParams {
    /// Opening threshold on the windowed RMS level, in dBFS
    pub threshold_db: f32,
    /// Ramp time from closed to fully open
    pub attack_ms: f32,
    /// Time the gate stays open after the level falls below threshold
    pub hold_ms: f32,
    /// Ramp time from fully open to closed
    pub release_ms: f32,
    /// Width of the centered energy window used for detection
    pub detection_window_ms: f32,
    /// Width of the envelope smoothing window
    pub smoothing_ms: f32,
}

impl Default for GateParams {
    fn default() -> Self {
        Self {
            threshold_db: -50.0,
            attack_ms: 5.0,
            hold_ms: 50.0,
            release_ms: 100.0,
            detection_window_ms: 10.0,
            smoothing_ms: 1.0,
        }
    }
}

impl GateParams {
    pub fn builder() -> GateParamsBuilder {
        GateParamsBuilder::default()
    }

    /// Linear power threshold compared against mean-square energy.
    pub fn threshold_power(&self) -> f32 {
        let amplitude = podium_core::db_to_gain(self.threshold_db);
        amplitude * amplitude
    }

    pub(crate) fn samples(ms: f32, sample_rate: u32) -> usize {
        if !ms.is_finite() || ms <= 0.0 {
            return 0;
        }
        (ms as f64 * 0.001 * sample_rate as f64).round() as usize
    }
}

/// Builder for [`GateParams`] with fluent API.
#[derive(Clone, Debug, Default)]
pub struct GateParamsBuilder {
    params: GateParams,
}

impl GateParamsBuilder {
    /// Threshold in dBFS (-90.0 to 0.0)
    pub fn threshold_db(mut self, db: f32) -> Self {
        if db.is_finite() {
            self.params.threshold_db = db.clamp(-90.0, 0.0);
        }
        self
    }

    /// Attack in milliseconds (clamped to >= 0)
    pub fn attack_ms(mut self, ms: f32) -> Self {
        self.params.attack_ms = non_negative(ms, self.params.attack_ms);
        self
    }

    /// Hold in milliseconds (clamped to >= 0)
    pub fn hold_ms(mut self, ms: f32) -> Self {
        self.params.hold_ms = non_negative(ms, self.params.hold_ms);
        self
    }

    /// Release in milliseconds (clamped to >= 0)
    pub fn release_ms(mut self, ms: f32) -> Self {
        self.params.release_ms = non_negative(ms, self.params.release_ms);
        self
    }

    /// Detection window in milliseconds (clamped to >= 0; 0 means per-sample)
    pub fn detection_window_ms(mut self, ms: f32) -> Self {
        self.params.detection_window_ms = non_negative(ms, self.params.detection_window_ms);
        self
    }

    /// Smoothing window in milliseconds (clamped to >= 0; 0 disables)
    pub fn smoothing_ms(mut self, ms: f32) -> Self {
        self.params.smoothing_ms = non_negative(ms, self.params.smoothing_ms);
        self
    }

    pub fn build(self) -> GateParams {
        self.params
    }
}

fn non_negative(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

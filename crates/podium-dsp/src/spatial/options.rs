//! Propagation settings.

use podium_core::SPEED_OF_SOUND;

/// Physical settings shared by every propagation computation.
///
/// Build with [`PropagationOptions::builder()`] to get validated values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationOptions {
    /// Height of the instrument above the stage floor (m)
    pub source_height: f32,
    /// Height of the microphone array (m)
    pub mic_height: f32,
    /// Distance at which distance attenuation is 0 dB (m)
    pub ref_distance: f32,
    /// Floor for every computed distance (m)
    pub min_distance: f32,
    /// m/s
    pub speed_of_sound: f32,
}

impl Default for PropagationOptions {
    fn default() -> Self {
        Self {
            source_height: 1.2,
            mic_height: 3.0,
            ref_distance: 1.0,
            min_distance: 0.1,
            speed_of_sound: SPEED_OF_SOUND,
        }
    }
}

impl PropagationOptions {
    pub fn builder() -> PropagationOptionsBuilder {
        PropagationOptionsBuilder::default()
    }

    /// Seconds it takes sound to travel `meters`.
    #[inline]
    pub fn travel_time(&self, meters: f32) -> f32 {
        (meters / self.speed_of_sound).max(0.0)
    }
}

/// Builder for [`PropagationOptions`] with fluent API.
#[derive(Clone, Debug, Default)]
pub struct PropagationOptionsBuilder {
    options: PropagationOptions,
}

impl PropagationOptionsBuilder {
    /// Height of the instrument in meters (clamped to >= 0)
    pub fn source_height(mut self, meters: f32) -> Self {
        self.options.source_height = non_negative(meters, self.options.source_height);
        self
    }

    /// Height of the microphones in meters (clamped to >= 0)
    pub fn mic_height(mut self, meters: f32) -> Self {
        self.options.mic_height = non_negative(meters, self.options.mic_height);
        self
    }

    /// Reference distance in meters (must be > 0)
    pub fn ref_distance(mut self, meters: f32) -> Self {
        self.options.ref_distance = positive(meters, self.options.ref_distance);
        self
    }

    /// Minimum distance in meters (must be > 0)
    pub fn min_distance(mut self, meters: f32) -> Self {
        self.options.min_distance = positive(meters, self.options.min_distance);
        self
    }

    /// Speed of sound in m/s (must be > 0)
    pub fn speed_of_sound(mut self, meters_per_second: f32) -> Self {
        self.options.speed_of_sound = positive(meters_per_second, self.options.speed_of_sound);
        self
    }

    pub fn build(self) -> PropagationOptions {
        self.options
    }
}

fn non_negative(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

fn positive(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

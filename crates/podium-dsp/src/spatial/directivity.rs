//! Instrument radiation blend between on-axis and off-axis recordings.

use podium_core::Vec2;

/// Every instrument faces the audience (toward -y).
pub const INSTRUMENT_FORWARD: Vec2 = Vec2::new(0.0, -1.0);

/// Mix weights for the two captures of one performance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectivityWeights {
    /// Weight of the on-axis ("front") recording
    pub front: f32,
    /// Weight of the off-axis ("bell") recording
    pub bell: f32,
}

impl Default for DirectivityWeights {
    fn default() -> Self {
        Self {
            front: 1.0,
            bell: 0.0,
        }
    }
}

/// Blend weights as heard by the microphone at `mic`.
///
/// `front = (1 + cos θ) / 2` where θ is the angle between the instrument's
/// forward axis and the direction toward the mic. Each bus calls this with
/// its own capsule position.
pub fn directivity_blend(source: Vec2, mic: Vec2) -> DirectivityWeights {
    let Some(toward_mic) = (mic - source).normalized() else {
        return DirectivityWeights::default();
    };
    let cos = INSTRUMENT_FORWARD.dot(toward_mic).clamp(-1.0, 1.0);
    let front = (1.0 + cos) * 0.5;
    DirectivityWeights {
        front,
        bell: 1.0 - front,
    }
}

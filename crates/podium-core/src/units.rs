//! Level and physical unit helpers.

/// Speed of sound in air at ~20 °C, in m/s.
pub const SPEED_OF_SOUND: f32 = 343.0;

/// Convert decibels to linear gain.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear gain magnitude to decibels, floored at -120 dB.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    let magnitude = gain.abs();
    if magnitude <= 1e-6 {
        -120.0
    } else {
        20.0 * magnitude.log10()
    }
}

/// Returns `value` unless it is NaN or infinite, in which case `fallback`.
#[inline]
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

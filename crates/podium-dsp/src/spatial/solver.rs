//! Per-channel propagation physics.

use super::PropagationOptions;
use core::f32::consts::PI;
use podium_core::{db_to_gain, Vec2};
use podium_mic::{Channel, PolarPattern};

/// Response of one microphone channel to one source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicrophoneResponse {
    /// Signed amplitude; negative means polarity-inverted pickup
    pub gain: f32,
    /// Meters, never below `min_distance`
    pub distance: f32,
    /// Seconds, never negative
    pub delay: f32,
    pub pattern_gain: f32,
    /// Radians in `(-π, π]`
    pub incidence_angle: f32,
}

/// Angle between the mic axis and the direction from mic to source.
///
/// `mic_axis_deg` follows the channel convention (0 = toward the stage,
/// negative = toward stage left). A source sitting on the capsule returns 0.
pub fn incidence_angle(source: Vec2, mic: Vec2, mic_axis_deg: f32) -> f32 {
    let to_source = match (source - mic).normalized() {
        Some(v) => v,
        None => return 0.0,
    };
    let axis = Vec2::from_angle_deg(if mic_axis_deg.is_finite() {
        mic_axis_deg
    } else {
        0.0
    });
    let angle = axis.cross(to_source).atan2(axis.dot(to_source));
    if !angle.is_finite() {
        0.0
    } else if angle <= -PI {
        // atan2(-0.0, -1.0) lands on -π; keep the half-open range (-π, π]
        PI
    } else {
        angle
    }
}

/// Signed pattern gain by string id.
///
/// Unknown ids log a warning and behave as omni (1.0).
pub fn polar_gain(pattern_id: &str, angle: f32) -> f32 {
    match pattern_id.parse::<PolarPattern>() {
        Ok(pattern) => pattern.gain(angle),
        Err(_) => {
            tracing::warn!(pattern = pattern_id, "Unknown polar pattern, using omni gain");
            1.0
        }
    }
}

/// World position of a channel's capsule.
#[inline]
pub fn mic_position(channel: &Channel, mic_base: Vec2) -> Vec2 {
    Vec2::new(mic_base.x + channel.offset_x, mic_base.y + channel.offset_y)
}

/// Distance attenuation, polar pattern and channel trim for one channel.
pub fn microphone_response(
    source: Vec2,
    channel: &Channel,
    mic_base: Vec2,
    opts: &PropagationOptions,
) -> MicrophoneResponse {
    let mic = mic_position(channel, mic_base);

    let dx = source.x - mic.x;
    let dy = source.y - mic.y;
    let dz = opts.mic_height - opts.source_height;
    let raw = (dx * dx + dy * dy + dz * dz).sqrt();
    let distance = if raw.is_finite() {
        raw.max(opts.min_distance)
    } else {
        opts.min_distance
    };

    let angle = incidence_angle(source, mic, channel.angle);
    let pattern_gain = channel.pattern.gain(angle);
    let attenuation = (opts.ref_distance / distance).min(1.0);
    let gain = attenuation * pattern_gain * db_to_gain(channel.level_db);

    MicrophoneResponse {
        gain,
        distance,
        delay: opts.travel_time(distance),
        pattern_gain,
        incidence_angle: angle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core::f32::consts::FRAC_PI_2;
    use podium_mic::ChannelId;
    use proptest::prelude::*;

    fn channel(pattern: PolarPattern, angle: f32) -> Channel {
        Channel {
            id: ChannelId::Left,
            label: "L".into(),
            pattern,
            angle,
            offset_x: 0.0,
            offset_y: 0.0,
            level_db: 0.0,
            enabled: true,
        }
    }

    #[test]
    fn test_incidence_on_axis_is_zero() {
        let a = incidence_angle(Vec2::new(0.0, 5.0), Vec2::ZERO, 0.0);
        assert_abs_diff_eq!(a, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_incidence_side_and_rear() {
        let left = incidence_angle(Vec2::new(-5.0, 0.0), Vec2::ZERO, 0.0);
        let right = incidence_angle(Vec2::new(5.0, 0.0), Vec2::ZERO, 0.0);
        assert_abs_diff_eq!(left.abs(), FRAC_PI_2, epsilon = 1e-5);
        assert_abs_diff_eq!(left, -right, epsilon = 1e-6);

        let rear = incidence_angle(Vec2::new(0.0, -5.0), Vec2::ZERO, 0.0);
        assert_abs_diff_eq!(rear, PI, epsilon = 1e-5);
    }

    #[test]
    fn test_incidence_follows_axis() {
        let a = incidence_angle(Vec2::new(-5.0, 5.0), Vec2::ZERO, -45.0);
        assert_abs_diff_eq!(a, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_incidence_degenerate() {
        assert_eq!(incidence_angle(Vec2::ZERO, Vec2::ZERO, 30.0), 0.0);
        assert_eq!(incidence_angle(Vec2::new(f32::NAN, 1.0), Vec2::ZERO, 0.0), 0.0);
    }

    #[test]
    fn test_polar_gain_unknown_is_omni() {
        assert_eq!(polar_gain("parabolic", 2.0), 1.0);
        assert_abs_diff_eq!(polar_gain("figure8", PI), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_response_attenuation_and_delay() {
        let opts = PropagationOptions::builder()
            .source_height(0.0)
            .mic_height(0.0)
            .build();
        let ch = channel(PolarPattern::Omni, 0.0);
        let r = microphone_response(Vec2::new(0.0, 10.0), &ch, Vec2::ZERO, &opts);
        assert_abs_diff_eq!(r.distance, 10.0, epsilon = 1e-5);
        assert_abs_diff_eq!(r.gain, 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(r.delay, 10.0 / 343.0, epsilon = 1e-7);
    }

    #[test]
    fn test_response_close_source_capped_at_unity() {
        let opts = PropagationOptions::builder()
            .source_height(0.0)
            .mic_height(0.0)
            .ref_distance(2.0)
            .build();
        let ch = channel(PolarPattern::Omni, 0.0);
        let r = microphone_response(Vec2::new(0.0, 0.5), &ch, Vec2::ZERO, &opts);
        assert_eq!(r.gain, 1.0);
    }

    #[test]
    fn test_response_zero_distance_is_floored() {
        let opts = PropagationOptions::builder()
            .source_height(1.0)
            .mic_height(1.0)
            .build();
        let ch = channel(PolarPattern::Cardioid, 0.0);
        let r = microphone_response(Vec2::ZERO, &ch, Vec2::ZERO, &opts);
        assert_eq!(r.distance, opts.min_distance);
        assert_eq!(r.incidence_angle, 0.0);
        assert!(r.gain.is_finite());
    }

    #[test]
    fn test_response_keeps_negative_lobe() {
        let opts = PropagationOptions::default();
        let ch = channel(PolarPattern::Figure8, 0.0);
        let r = microphone_response(Vec2::new(0.0, -5.0), &ch, Vec2::ZERO, &opts);
        assert!(r.gain < 0.0);
        assert!(r.pattern_gain < 0.0);
    }

    #[test]
    fn test_response_level_trim() {
        let opts = PropagationOptions::default();
        let mut ch = channel(PolarPattern::Omni, 0.0);
        let unity = microphone_response(Vec2::new(0.0, 8.0), &ch, Vec2::ZERO, &opts);
        ch.level_db = -6.0;
        let trimmed = microphone_response(Vec2::new(0.0, 8.0), &ch, Vec2::ZERO, &opts);
        assert_abs_diff_eq!(trimmed.gain / unity.gain, db_to_gain(-6.0), epsilon = 1e-6);
    }

    proptest! {
        #[test]
        fn prop_distance_and_delay_floored(
            sx in -50.0f32..50.0, sy in -50.0f32..50.0,
            mx in -50.0f32..50.0, my in -50.0f32..50.0,
            axis in -360.0f32..360.0,
            min_distance in 0.01f32..2.0,
        ) {
            let opts = PropagationOptions::builder().min_distance(min_distance).build();
            let ch = channel(PolarPattern::Hypercardioid, axis);
            let r = microphone_response(Vec2::new(sx, sy), &ch, Vec2::new(mx, my), &opts);
            prop_assert!(r.distance >= opts.min_distance);
            prop_assert!(r.delay >= 0.0);
            prop_assert!(r.gain.is_finite());
            prop_assert!(r.incidence_angle > -PI - 1e-6 && r.incidence_angle <= PI + 1e-6);
        }
    }
}

//! Channel routing into stereo (or stereo + center) busses.

use super::{microphone_response, MicrophoneResponse, PropagationOptions};
use core::f32::consts::FRAC_1_SQRT_2;
use podium_core::{SourcePosition, StageDimensions, Vec2};
use podium_mic::{ChannelId, MicrophoneConfiguration, RoutingMode};

/// Gain and delay feeding one output bus.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BusResponse {
    pub gain: f32,
    /// Seconds
    pub delay: f32,
}

/// One enabled channel's response, tagged with its channel id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelResponse {
    pub channel: ChannelId,
    pub response: MicrophoneResponse,
}

/// Result of routing every enabled channel for one source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StereoResponse {
    pub left: BusResponse,
    pub right: BusResponse,
    /// Raw center response (decca routing only), for 3-channel renderers
    pub center: Option<BusResponse>,
    pub per_channel: Vec<ChannelResponse>,
}

impl StereoResponse {
    pub fn channel(&self, id: ChannelId) -> Option<&MicrophoneResponse> {
        self.per_channel
            .iter()
            .find(|c| c.channel == id)
            .map(|c| &c.response)
    }
}

/// Position of the array's reference point in stage meters.
#[inline]
pub fn mic_base_position(config: &MicrophoneConfiguration) -> Vec2 {
    Vec2::new(0.0, config.mic_y)
}

/// M/S width applied to a left/right gain pair.
///
/// `width = 0` folds to mono, `1` leaves the pair untouched, `> 1` widens.
#[inline]
pub fn ms_decode(left: f32, right: f32, width: f32) -> (f32, f32) {
    let mid = (left + right) * 0.5;
    let side = (left - right) * 0.5;
    (mid + width * side, mid - width * side)
}

/// Gains and delays for one source through the whole array.
///
/// Disabled channels contribute nothing; a missing side leaves its bus at
/// zero gain and zero delay.
pub fn stereo_response(
    position: SourcePosition,
    config: &MicrophoneConfiguration,
    stage: StageDimensions,
    opts: &PropagationOptions,
) -> StereoResponse {
    let source = position.to_meters(stage);
    let base = mic_base_position(config);

    let per_channel: Vec<ChannelResponse> = config
        .enabled_channels()
        .map(|ch| ChannelResponse {
            channel: ch.id,
            response: microphone_response(source, ch, base, opts),
        })
        .collect();

    let bus = |id: ChannelId| {
        per_channel
            .iter()
            .find(|c| c.channel == id)
            .map(|c| BusResponse {
                gain: c.response.gain,
                delay: c.response.delay,
            })
    };

    let mut left = bus(ChannelId::Left).unwrap_or_default();
    let mut right = bus(ChannelId::Right).unwrap_or_default();
    let mut center = None;

    if config.routing() == RoutingMode::Decca {
        if let Some(c) = bus(ChannelId::Center) {
            left.gain += c.gain * FRAC_1_SQRT_2;
            right.gain += c.gain * FRAC_1_SQRT_2;
            center = Some(c);
        }
    }

    if config.ms_decode_enabled {
        let (l, r) = ms_decode(left.gain, right.gain, config.ms_width);
        left.gain = l;
        right.gain = r;
    }

    StereoResponse {
        left,
        right,
        center,
        per_channel,
    }
}

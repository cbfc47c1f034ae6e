//! Everything a renderer needs for one source, in one pass.
//!
//! Live updates and the offline export pass both call
//! [`compute_render_params`], so exported audio matches what was heard.

use super::{
    directivity_blend, ground_reflection, mic_base_position, mic_position, normalize_itd,
    stereo_response, AirAbsorption, DirectivityWeights, GroundReflection, GroundSurface,
    PropagationOptions, StereoResponse,
};
use core::f32::consts::FRAC_1_SQRT_2;
use podium_core::{SourcePosition, StageDimensions};
use podium_mic::{ChannelId, MicrophoneConfiguration, RoutingMode};

/// Fixed scene settings shared by every source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PropagationContext {
    pub stage: StageDimensions,
    pub options: PropagationOptions,
    /// `None` disables the floor reflection path
    pub ground: Option<GroundSurface>,
}

impl PropagationContext {
    pub fn new(stage: StageDimensions, options: PropagationOptions) -> Self {
        Self {
            stage,
            options,
            ground: None,
        }
    }

    pub fn with_ground(mut self, surface: Option<GroundSurface>) -> Self {
        self.ground = surface;
        self
    }
}

/// One capsule's contribution to the output busses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPath {
    pub channel: ChannelId,
    /// Signed amplitude
    pub gain: f32,
    /// ITD-normalized delay in seconds
    pub delay: f32,
    /// Share sent to the left bus
    pub left_weight: f32,
    /// Share sent to the right bus
    pub right_weight: f32,
    pub directivity: DirectivityWeights,
    pub air: AirAbsorption,
    pub ground: Option<GroundReflection>,
}

/// Render parameters for one source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceRenderParams {
    /// Bus-level response (includes center fold-down and M/S)
    pub response: StereoResponse,
    pub paths: Vec<RenderPath>,
    /// Shared depth delay included in every path delay
    pub base_delay: f32,
    /// M/S width to apply to the rendered pair, if decoding is enabled
    pub ms_width: Option<f32>,
}

fn routing_weights(channel: ChannelId, routing: RoutingMode) -> (f32, f32) {
    match (channel, routing) {
        (ChannelId::Left, _) => (1.0, 0.0),
        (ChannelId::Right, _) => (0.0, 1.0),
        (ChannelId::Center, RoutingMode::Decca) => (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        (ChannelId::Center, RoutingMode::Direct) => (0.0, 0.0),
    }
}

/// Compute gains, ITD-normalized delays, directivity, air absorption and
/// floor reflections for every enabled channel.
pub fn compute_render_params(
    position: SourcePosition,
    config: &MicrophoneConfiguration,
    ctx: &PropagationContext,
) -> SourceRenderParams {
    let response = stereo_response(position, config, ctx.stage, &ctx.options);
    let source = position.to_meters(ctx.stage);
    let base = mic_base_position(config);
    let routing = config.routing();

    let raw_delays: Vec<f32> = response
        .per_channel
        .iter()
        .map(|c| c.response.delay)
        .collect();
    let itd = normalize_itd(&raw_delays, &ctx.options);

    let paths = config
        .enabled_channels()
        .zip(response.per_channel.iter())
        .zip(itd.delays.iter())
        .map(|((channel, resp), &delay)| {
            let mic = mic_position(channel, base);
            let (left_weight, right_weight) = routing_weights(channel.id, routing);
            RenderPath {
                channel: channel.id,
                gain: resp.response.gain,
                delay,
                left_weight,
                right_weight,
                directivity: directivity_blend(source, mic),
                air: AirAbsorption::for_distance(resp.response.distance),
                ground: ctx
                    .ground
                    .map(|surface| ground_reflection(source, mic, &ctx.options, surface)),
            }
        })
        .collect();

    SourceRenderParams {
        response,
        paths,
        base_delay: itd.base_delay,
        ms_width: config.ms_decode_enabled.then_some(config.ms_width),
    }
}

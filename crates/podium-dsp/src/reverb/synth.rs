//! Procedural impulse responses: filtered decaying noise plus discrete taps.

use super::preset::{ReflectionTap, ReverbParams, ReverbPreset};
use core::f32::consts::PI;
use podium_core::AudioBuffer;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tracing::debug;

/// `ln(1000)`: amplitude decay constant that reaches -60 dB after one RT60.
const LN_1000: f32 = 6.907_755;

/// Decay time constant of a single early reflection burst, seconds.
const TAP_DECAY: f32 = 0.002;

/// Fraction of tail samples kept at full level in sparse mode.
const SPARSE_KEEP: f32 = 0.3;
const SPARSE_ATTENUATION: f32 = 0.1;

/// Synthesize the stereo impulse for `preset`. `None` for the dry preset.
pub fn synthesize_impulse(preset: ReverbPreset, sample_rate: u32) -> Option<AudioBuffer> {
    let params = preset.params();
    let buffer = synthesize_with(&params, sample_rate, preset.seed())?;
    debug!(preset = %preset, sample_rate, len = buffer.len(), "Synthesized impulse response");
    Some(buffer)
}

/// Synthesize from explicit parameters. Deterministic for a given seed.
pub fn synthesize_with(params: &ReverbParams, sample_rate: u32, seed: u64) -> Option<AudioBuffer> {
    if params.duration <= 0.0 || sample_rate == 0 {
        return None;
    }
    let sr = sample_rate as f32;
    let len = ((params.duration * sr).round() as usize).max(1);

    let mut channels = [vec![0.0f32; len], vec![0.0f32; len]];
    let mut rng = Pcg32::seed_from_u64(seed);

    for channel in channels.iter_mut() {
        render_tail(channel, params, sr, &mut rng);
    }
    for tap in params.taps {
        inject_tap(&mut channels, tap, sr, &mut rng);
    }

    let peak = channels
        .iter()
        .flat_map(|c| c.iter())
        .fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak > 0.0 {
        for s in channels.iter_mut().flat_map(|c| c.iter_mut()) {
            *s /= peak;
        }
    }

    let [left, right] = channels;
    AudioBuffer::new(vec![left, right], sample_rate).ok()
}

fn render_tail(out: &mut [f32], params: &ReverbParams, sr: f32, rng: &mut Pcg32) {
    let k = if params.rt60 > 0.0 {
        LN_1000 / params.rt60
    } else {
        LN_1000 / 0.01
    };
    let k_hf = k * params.hf_decay.max(1.0);
    let alpha = 1.0 - (-2.0 * PI * params.lowpass_hz.max(1.0) / sr).exp();

    let start = ((params.predelay.max(0.0) * sr).round() as usize).min(out.len());
    let mut lp = 0.0f32;

    for (n, sample) in out[start..].iter_mut().enumerate() {
        let t = n as f32 / sr;
        let white: f32 = rng.gen_range(-1.0..1.0);
        lp += alpha * (white - lp);
        let hp = white - lp;
        let mut value = lp * (-k * t).exp() + hp * (-k_hf * t).exp();

        if params.sparse && rng.gen::<f32>() > SPARSE_KEEP {
            value *= SPARSE_ATTENUATION;
        }
        *sample = value;
    }
}

fn inject_tap(channels: &mut [Vec<f32>; 2], tap: &ReflectionTap, sr: f32, rng: &mut Pcg32) {
    let len = channels[0].len();
    let offset = (tap.time.max(0.0) * sr).round() as usize;
    if offset >= len {
        return;
    }
    let pan = tap.pan.clamp(-1.0, 1.0);
    let gains = [tap.gain * (1.0 - pan), tap.gain * (1.0 + pan)];

    let tau = TAP_DECAY * sr;
    let burst = ((tau * 5.0) as usize).max(1).min(len - offset);
    for k in 0..burst {
        let env = (-(k as f32) / tau).exp();
        let noise: f32 = rng.gen_range(-1.0..1.0);
        for (channel, gain) in channels.iter_mut().zip(gains) {
            channel[offset + k] += gain * env * noise;
        }
    }
}

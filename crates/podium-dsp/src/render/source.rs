//! Offline rendering of one source from its computed parameters.

use super::biquad::{split_bands, Biquad, BiquadCoeffs};
use super::delay::DelayLine;
use crate::spatial::{ms_decode, AirAbsorption, DirectivityWeights, RenderPath, SourceRenderParams};
use podium_core::{AudioBuffer, Result};

/// Q of the three peaking air bands; the top band is a shelf.
const AIR_BAND_Q: f32 = 1.0;

/// Render a mono source (front recording plus optional off-axis recording)
/// to a stereo pair.
///
/// Output is long enough for the latest path, including floor bounces.
pub fn render_source(
    front: &[f32],
    bell: Option<&[f32]>,
    sample_rate: u32,
    params: &SourceRenderParams,
) -> Result<AudioBuffer> {
    let sr = sample_rate as f32;
    let input_len = front.len().max(bell.map_or(0, <[f32]>::len));

    let latest = params
        .paths
        .iter()
        .map(|p| p.delay + p.ground.map_or(0.0, |g| g.extra_delay))
        .fold(0.0f32, f32::max);
    let tail = (latest * sr).ceil() as usize + 1;
    let out_len = if input_len == 0 { 0 } else { input_len + tail };

    let mut left = vec![0.0f32; out_len];
    let mut right = vec![0.0f32; out_len];

    for path in &params.paths {
        if path.gain == 0.0 || (path.left_weight == 0.0 && path.right_weight == 0.0) {
            continue;
        }
        let mut signal = blend(front, bell, path.directivity, input_len);
        apply_air(&mut signal, &path.air, sr);

        let direct = delayed(&signal, path.delay * sr, out_len);
        mix_into(&mut left, &mut right, &direct, path.gain, path);

        if let Some(ground) = path.ground {
            let (low, high) = split_bands(&signal, ground.crossover_hz, sr);
            let bounced: Vec<f32> = low
                .iter()
                .zip(&high)
                .map(|(l, h)| l * ground.low_gain + h * ground.high_gain)
                .collect();
            let reflected = delayed(&bounced, (path.delay + ground.extra_delay) * sr, out_len);
            // The floor bounce reaches the capsule close to its axis, so it
            // takes the surface gain rather than the direct pattern gain.
            mix_into(&mut left, &mut right, &reflected, ground.gain, path);
        }
    }

    if let Some(width) = params.ms_width {
        apply_ms_width(&mut left, &mut right, width);
    }

    AudioBuffer::new(vec![left, right], sample_rate)
}

fn blend(front: &[f32], bell: Option<&[f32]>, weights: DirectivityWeights, len: usize) -> Vec<f32> {
    match bell {
        Some(bell) => (0..len)
            .map(|i| {
                front.get(i).copied().unwrap_or(0.0) * weights.front
                    + bell.get(i).copied().unwrap_or(0.0) * weights.bell
            })
            .collect(),
        None => {
            let mut signal = front.to_vec();
            signal.resize(len, 0.0);
            signal
        }
    }
}

/// Cascade of the air bands: peaking filters with a high shelf on top.
pub fn apply_air(signal: &mut [f32], air: &AirAbsorption, sample_rate: f32) {
    if air.is_flat() {
        return;
    }
    let last = air.bands.len() - 1;
    for (i, band) in air.bands.iter().enumerate() {
        let coeffs = if i == last {
            BiquadCoeffs::high_shelf(band.frequency, band.gain_db, sample_rate)
        } else {
            BiquadCoeffs::peaking(band.frequency, band.gain_db, AIR_BAND_Q, sample_rate)
        };
        Biquad::new(coeffs).process_slice(signal);
    }
}

fn delayed(signal: &[f32], delay_samples: f32, out_len: usize) -> Vec<f32> {
    let mut line = DelayLine::new(delay_samples.max(0.0).ceil() as usize + 1);
    line.set_delay(delay_samples);
    (0..out_len)
        .map(|n| line.process(signal.get(n).copied().unwrap_or(0.0)))
        .collect()
}

fn mix_into(left: &mut [f32], right: &mut [f32], signal: &[f32], gain: f32, path: &RenderPath) {
    let (gl, gr) = (gain * path.left_weight, gain * path.right_weight);
    for ((l, r), s) in left.iter_mut().zip(right.iter_mut()).zip(signal) {
        *l += s * gl;
        *r += s * gr;
    }
}

/// Signal-level M/S width on a rendered pair.
pub fn apply_ms_width(left: &mut [f32], right: &mut [f32], width: f32) {
    for (l, r) in left.iter_mut().zip(right.iter_mut()) {
        (*l, *r) = ms_decode(*l, *r, width);
    }
}

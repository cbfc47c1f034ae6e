//! FFT convolution and the reverb send.

use podium_core::{AudioBuffer, Error, Result};
use rustfft::{num_complex::Complex, FftPlanner};

/// Full linear convolution, length `signal.len() + kernel.len() - 1`.
pub fn convolve(signal: &[f32], kernel: &[f32]) -> Vec<f32> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }
    let out_len = signal.len() + kernel.len() - 1;
    let fft_size = out_len.next_power_of_two();

    let mut planner = FftPlanner::<f32>::new();
    let forward = planner.plan_fft_forward(fft_size);
    let inverse = planner.plan_fft_inverse(fft_size);

    let to_complex = |samples: &[f32]| {
        let mut buf: Vec<Complex<f32>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
        buf.resize(fft_size, Complex::new(0.0, 0.0));
        buf
    };
    let mut a = to_complex(signal);
    let mut b = to_complex(kernel);
    forward.process(&mut a);
    forward.process(&mut b);

    for (x, y) in a.iter_mut().zip(&b) {
        *x *= *y;
    }
    inverse.process(&mut a);

    let scale = 1.0 / fft_size as f32;
    a[..out_len].iter().map(|c| c.re * scale).collect()
}

/// Add a convolved reverb return to `dry`.
///
/// A stereo impulse is applied channel by channel; a mono input is first
/// duplicated to match. The result is long enough to hold the full tail.
pub fn apply_reverb(dry: &AudioBuffer, impulse: &AudioBuffer, wet: f32) -> Result<AudioBuffer> {
    if dry.sample_rate() != impulse.sample_rate() {
        return Err(Error::SampleRateMismatch {
            expected: dry.sample_rate(),
            found: impulse.sample_rate(),
        });
    }
    if dry.is_empty() || impulse.is_empty() || wet <= 0.0 {
        return Ok(dry.clone());
    }

    let channel_count = dry.channel_count().max(impulse.channel_count());
    let mut out = Vec::with_capacity(channel_count);
    for ch in 0..channel_count {
        let input = dry.channel(ch.min(dry.channel_count() - 1)).unwrap_or_default();
        let ir = impulse
            .channel(ch.min(impulse.channel_count() - 1))
            .unwrap_or_default();

        let mut mixed = convolve(input, ir);
        for s in &mut mixed {
            *s *= wet;
        }
        for (m, d) in mixed.iter_mut().zip(input) {
            *m += d;
        }
        out.push(mixed);
    }
    AudioBuffer::new(out, dry.sample_rate())
}

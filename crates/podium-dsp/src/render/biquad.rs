//! RBJ cookbook biquads.

use core::f32::consts::{FRAC_1_SQRT_2, PI};

/// Normalized biquad coefficients (`a0 == 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoeffs {
    /// Unity gain, no filtering.
    pub const PASSTHROUGH: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    pub fn peaking(freq: f32, gain_db: f32, q: f32, sample_rate: f32) -> Self {
        let Some(w0) = angular(freq, sample_rate) else {
            return Self::PASSTHROUGH;
        };
        let a = 10.0_f32.powf(gain_db / 40.0);
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q.max(1e-3));

        let a0 = 1.0 + alpha / a;
        Self {
            b0: (1.0 + alpha * a) / a0,
            b1: (-2.0 * cos_w0) / a0,
            b2: (1.0 - alpha * a) / a0,
            a1: (-2.0 * cos_w0) / a0,
            a2: (1.0 - alpha / a) / a0,
        }
    }

    /// Shelf slope 1.
    pub fn high_shelf(freq: f32, gain_db: f32, sample_rate: f32) -> Self {
        let Some(w0) = angular(freq, sample_rate) else {
            return Self::PASSTHROUGH;
        };
        let a = 10.0_f32.powf(gain_db / 40.0);
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 * FRAC_1_SQRT_2;
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        let a0 = (a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha;
        Self {
            b0: (a * ((a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha)) / a0,
            b1: (-2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0)) / a0,
            b2: (a * ((a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha)) / a0,
            a1: (2.0 * ((a - 1.0) - (a + 1.0) * cos_w0)) / a0,
            a2: ((a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha) / a0,
        }
    }

    pub fn low_pass(freq: f32, q: f32, sample_rate: f32) -> Self {
        let Some(w0) = angular(freq, sample_rate) else {
            return Self::PASSTHROUGH;
        };
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q.max(1e-3));

        let a0 = 1.0 + alpha;
        Self {
            b0: ((1.0 - cos_w0) * 0.5) / a0,
            b1: (1.0 - cos_w0) / a0,
            b2: ((1.0 - cos_w0) * 0.5) / a0,
            a1: (-2.0 * cos_w0) / a0,
            a2: (1.0 - alpha) / a0,
        }
    }
}

/// `None` when the frequency is unusable at this rate (at or above ~Nyquist).
fn angular(freq: f32, sample_rate: f32) -> Option<f32> {
    if !(freq.is_finite() && sample_rate > 0.0) || freq <= 0.0 || freq >= sample_rate * 0.49 {
        return None;
    }
    Some(2.0 * PI * freq / sample_rate)
}

/// Direct form I biquad.
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let out = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = out;
        out
    }

    pub fn process_slice(&mut self, samples: &mut [f32]) {
        for s in samples {
            *s = self.process(*s);
        }
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// Split into complementary low and high bands (`low + high == input`).
pub fn split_bands(input: &[f32], crossover_hz: f32, sample_rate: f32) -> (Vec<f32>, Vec<f32>) {
    let mut lp = Biquad::new(BiquadCoeffs::low_pass(crossover_hz, FRAC_1_SQRT_2, sample_rate));
    let low: Vec<f32> = input.iter().map(|&x| lp.process(x)).collect();
    let high = input.iter().zip(&low).map(|(x, l)| x - l).collect();
    (low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SR: f32 = 48000.0;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len).map(|n| (2.0 * PI * freq * n as f32 / SR).sin()).collect()
    }

    fn rms(s: &[f32]) -> f32 {
        (s.iter().map(|x| x * x).sum::<f32>() / s.len() as f32).sqrt()
    }

    #[test]
    fn test_low_pass_dc_gain_is_unity() {
        let c = BiquadCoeffs::low_pass(1000.0, FRAC_1_SQRT_2, SR);
        let dc = (c.b0 + c.b1 + c.b2) / (1.0 + c.a1 + c.a2);
        assert_abs_diff_eq!(dc, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_low_pass_attenuates_highs() {
        let mut f = Biquad::new(BiquadCoeffs::low_pass(500.0, FRAC_1_SQRT_2, SR));
        let mut s = sine(8000.0, 4800);
        f.process_slice(&mut s);
        assert!(rms(&s[2400..]) < 0.05);
    }

    #[test]
    fn test_zero_db_peaking_is_transparent() {
        let c = BiquadCoeffs::peaking(2000.0, 0.0, 1.0, SR);
        assert_abs_diff_eq!(c.b0, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.b1, c.a1, epsilon = 1e-6);
        assert_abs_diff_eq!(c.b2, c.a2, epsilon = 1e-6);
    }

    #[test]
    fn test_high_shelf_cuts_top() {
        let mut f = Biquad::new(BiquadCoeffs::high_shelf(4000.0, -12.0, SR));
        let mut s = sine(15000.0, 4800);
        f.process_slice(&mut s);
        let level = rms(&s[2400..]) * 2.0_f32.sqrt();
        assert!(level < 0.35, "{level}");
    }

    #[test]
    fn test_above_nyquist_is_passthrough() {
        assert_eq!(BiquadCoeffs::peaking(30000.0, -6.0, 1.0, SR), BiquadCoeffs::PASSTHROUGH);
    }

    #[test]
    fn test_split_is_complementary() {
        let input = sine(1000.0, 512);
        let (low, high) = split_bands(&input, 700.0, SR);
        for ((x, l), h) in input.iter().zip(&low).zip(&high) {
            assert_abs_diff_eq!(l + h, *x, epsilon = 1e-6);
        }
    }
}

//! Fractional delay line.

/// Ring buffer with linear-interpolated reads.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write: usize,
    delay: f32,
}

impl DelayLine {
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples + 2],
            write: 0,
            delay: 0.0,
        }
    }

    pub fn max_delay(&self) -> f32 {
        (self.buffer.len() - 2) as f32
    }

    /// Delay in samples, clamped to `[0, max_delay]`.
    pub fn set_delay(&mut self, samples: f32) {
        self.delay = if samples.is_finite() {
            samples.clamp(0.0, self.max_delay())
        } else {
            0.0
        };
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let len = self.buffer.len();
        self.buffer[self.write] = input;

        let whole = self.delay.floor() as usize;
        let frac = self.delay - whole as f32;
        let newer = (self.write + len - whole) % len;
        let older = (newer + len - 1) % len;
        let out = self.buffer[newer] * (1.0 - frac) + self.buffer[older] * frac;

        self.write = (self.write + 1) % len;
        out
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write = 0;
    }
}

//! The four linear passes behind the noise gate.

use podium_core::AudioBuffer;

/// Smoothed values this close to 0 or 1 snap to the rail.
const RAIL_SNAP: f32 = 1e-6;

/// Gate state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Closed,
    Opening,
    Open,
    Holding,
    Closing,
}

/// Pass 1: per-sample mean-square energy across every channel of every buffer.
///
/// Shorter buffers count as silence past their end. The divisor is the total
/// channel count of the whole set, so one silent buffer halves the energy of
/// a loud one rather than being ignored.
pub fn combined_energy(buffers: &[AudioBuffer]) -> Vec<f32> {
    let len = buffers.iter().map(AudioBuffer::len).max().unwrap_or(0);
    let total_channels: usize = buffers.iter().map(AudioBuffer::channel_count).sum();
    if len == 0 || total_channels == 0 {
        return Vec::new();
    }

    let mut energy = vec![0.0f32; len];
    for buffer in buffers {
        for channel in buffer.channels() {
            for (e, s) in energy.iter_mut().zip(channel) {
                *e += s * s;
            }
        }
    }

    let scale = 1.0 / total_channels as f32;
    energy.iter_mut().for_each(|e| *e *= scale);
    energy
}

/// Passes 2 and 4: centered moving average with a running sum.
///
/// Each output averages exactly `window` samples: `window / 2` ahead and the
/// rest behind, so an even window leans one sample forward. Edges average
/// over the samples that exist, so a constant input stays constant all the
/// way to both ends.
pub fn centered_average(values: &[f32], window: usize) -> Vec<f32> {
    let n = values.len();
    if n == 0 || window <= 1 {
        return values.to_vec();
    }

    let ahead = window / 2;
    let behind = window - 1 - ahead;
    let mut out = Vec::with_capacity(n);

    let initial_end = ahead.min(n - 1);
    let mut sum: f64 = values[..=initial_end].iter().map(|&v| v as f64).sum();
    let mut count = initial_end + 1;

    for i in 0..n {
        out.push((sum / count as f64) as f32);

        let entering = i + ahead + 1;
        if entering < n {
            sum += values[entering] as f64;
            count += 1;
        }
        if i >= behind {
            sum -= values[i - behind] as f64;
            count -= 1;
        }
    }

    out
}

/// Per-sample state machine driving the raw envelope (pass 3).
#[derive(Debug, Clone)]
pub struct GateMachine {
    state: GateState,
    gain: f32,
    held: usize,
    attack_step: f32,
    release_step: f32,
    hold_samples: usize,
}

impl GateMachine {
    pub fn new(attack_samples: usize, hold_samples: usize, release_samples: usize) -> Self {
        let step = |samples: usize| {
            if samples == 0 {
                1.0
            } else {
                1.0 / samples as f32
            }
        };
        Self {
            state: GateState::Closed,
            gain: 0.0,
            held: 0,
            attack_step: step(attack_samples),
            release_step: step(release_samples),
            hold_samples,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    fn open_step(&mut self) {
        self.gain += self.attack_step;
        if self.gain >= 1.0 {
            self.gain = 1.0;
            self.state = GateState::Open;
        } else {
            self.state = GateState::Opening;
        }
    }

    /// Advance one sample. Returns the gain for that sample.
    #[inline]
    pub fn step(&mut self, above: bool) -> f32 {
        match self.state {
            GateState::Closed => {
                if above {
                    self.gain = 0.0;
                    self.open_step();
                }
            }
            GateState::Opening => self.open_step(),
            GateState::Open => {
                if !above {
                    self.held = 0;
                    self.state = if self.hold_samples == 0 {
                        GateState::Closing
                    } else {
                        GateState::Holding
                    };
                }
            }
            GateState::Holding => {
                if above {
                    self.state = GateState::Open;
                } else {
                    self.held += 1;
                    if self.held >= self.hold_samples {
                        self.state = GateState::Closing;
                    }
                }
            }
            GateState::Closing => {
                if above {
                    // Resume from the current gain, not from zero
                    self.open_step();
                } else {
                    self.gain -= self.release_step;
                    if self.gain <= 0.0 {
                        self.gain = 0.0;
                        self.state = GateState::Closed;
                    }
                }
            }
        }
        self.gain
    }
}

/// Pass 3: raw envelope from windowed energy.
pub fn raw_envelope(
    level: &[f32],
    threshold_power: f32,
    attack_samples: usize,
    hold_samples: usize,
    release_samples: usize,
) -> Vec<f32> {
    let mut machine = GateMachine::new(attack_samples, hold_samples, release_samples);
    level
        .iter()
        .map(|&l| machine.step(l > threshold_power))
        .collect()
}

/// Pass 4a: smooth the stepped envelope and pin it to `[0, 1]`.
pub fn smooth_envelope(raw: &[f32], window: usize) -> Vec<f32> {
    let mut smoothed = centered_average(raw, window);
    for g in &mut smoothed {
        *g = if *g >= 1.0 - RAIL_SNAP {
            1.0
        } else if *g <= RAIL_SNAP {
            0.0
        } else {
            *g
        };
    }
    smoothed
}

/// Pass 4b: multiply every channel by the envelope (index-clamped).
pub fn apply_envelope(buffer: &mut AudioBuffer, envelope: &[f32]) {
    let Some(&last) = envelope.last() else {
        return;
    };
    for channel in buffer.channels_mut() {
        for (i, s) in channel.iter_mut().enumerate() {
            *s *= envelope.get(i).copied().unwrap_or(last);
        }
    }
}

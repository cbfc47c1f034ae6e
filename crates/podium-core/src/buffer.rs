//! Owned planar sample buffer.

use crate::{Error, Result};

/// Decoded audio: one `Vec<f32>` per channel plus the sample rate.
///
/// Channels may differ in length only transiently; constructors pad to the
/// longest channel so `len()` is well defined.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Build from planar channel data. Shorter channels are zero-padded.
    pub fn new(mut channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidBuffer("sample rate must be non-zero".into()));
        }
        if channels.is_empty() {
            return Err(Error::InvalidBuffer("at least one channel required".into()));
        }
        let len = channels.iter().map(Vec::len).max().unwrap_or(0);
        for ch in &mut channels {
            ch.resize(len, 0.0);
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// All-zero buffer.
    pub fn silent(channel_count: usize, len: usize, sample_rate: u32) -> Result<Self> {
        Self::new(vec![vec![0.0; len]; channel_count.max(1)], sample_rate)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Frames per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 / self.sample_rate.max(1) as f64
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [f32]> {
        self.channels.get_mut(index).map(Vec::as_mut_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut [Vec<f32>] {
        &mut self.channels
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|ch| ch.iter())
            .fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    /// Average of all channels.
    pub fn to_mono(&self) -> Vec<f32> {
        let count = self.channels.len().max(1) as f32;
        let mut mono = vec![0.0; self.len()];
        for ch in &self.channels {
            for (m, s) in mono.iter_mut().zip(ch) {
                *m += s;
            }
        }
        mono.iter_mut().for_each(|m| *m /= count);
        mono
    }
}

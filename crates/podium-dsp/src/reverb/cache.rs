//! Append-only impulse cache.

use super::preset::ReverbPreset;
use super::synth::synthesize_impulse;
use dashmap::DashMap;
use podium_core::AudioBuffer;
use std::sync::Arc;
use tracing::debug;

/// Synthesized impulses keyed by preset and sample rate.
///
/// Entries are never replaced or removed; synthesis is deterministic so a
/// racing double insert stores identical data.
#[derive(Clone, Default)]
pub struct ImpulseCache {
    entries: Arc<DashMap<(ReverbPreset, u32), Arc<AudioBuffer>>>,
}

impl ImpulseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached impulse, synthesizing on first use. `None` for the dry preset.
    pub fn get(&self, preset: ReverbPreset, sample_rate: u32) -> Option<Arc<AudioBuffer>> {
        let key = (preset, sample_rate);
        if let Some(hit) = self.entries.get(&key) {
            return Some(Arc::clone(hit.value()));
        }

        let impulse = Arc::new(synthesize_impulse(preset, sample_rate)?);
        let stored = self.entries.entry(key).or_insert(impulse);
        debug!(preset = %preset, sample_rate, "Cached impulse response");
        Some(Arc::clone(stored.value()))
    }

    pub fn contains(&self, preset: ReverbPreset, sample_rate: u32) -> bool {
        self.entries.contains_key(&(preset, sample_rate))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ImpulseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImpulseCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

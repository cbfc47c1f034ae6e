//! PodiumEngine: sources on a virtual stage heard through one microphone array.

use crate::{Error, PodiumEngineBuilder, Result};
use arc_swap::ArcSwap;
use parking_lot::RwLock;
use podium_core::{AudioBuffer, Error as CoreError, SourcePosition};
use podium_dsp::dynamics::{GateParams, GateResult, GateScheduler, GateStatus, GateTicket};
use podium_dsp::render::{apply_reverb, render_source};
use podium_dsp::reverb::{ImpulseCache, ReverbPreset};
use podium_dsp::spatial::{
    compute_render_params, GroundSurface, PropagationContext, SourceRenderParams,
};
use podium_mic::MicrophoneConfiguration;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Handle to a source placed on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(u64);

impl SourceId {
    pub fn raw(self) -> u64 {
        self.0
    }

    fn gate_key(self) -> String {
        self.0.to_string()
    }

    fn from_gate_key(key: &str) -> Option<Self> {
        key.parse().ok().map(Self)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

/// One instrument (or section) on the stage.
#[derive(Debug, Clone)]
pub struct StageSource {
    pub name: String,
    pub position: SourcePosition,
    /// Where `reset_source` puts it back
    pub home: SourcePosition,
    /// Recording from the listener side
    pub front: AudioBuffer,
    /// Optional off-axis (bell) recording of the same take
    pub bell: Option<AudioBuffer>,
    /// Set once a gate pass has replaced the recordings
    pub gated: bool,
}

/// Coordinates sources, the microphone array, gating and reverb.
///
/// Configuration is read through lock-free snapshots, so parameter queries
/// from an interactive thread never wait on a running gate pass or render.
///
/// # Example
///
/// ```ignore
/// use podium::prelude::*;
///
/// let engine = PodiumEngine::builder().sample_rate(48000).build()?;
/// let violin = engine.add_source("violin", SourcePosition::new(-0.5, 0.3), front, None)?;
/// engine.gate_source(violin)?;
///
/// engine.update_microphones(|mics| mics.with_spacing(2.0));
/// let params = engine.render_params(violin)?;
/// ```
pub struct PodiumEngine {
    sample_rate: u32,
    microphones: ArcSwap<MicrophoneConfiguration>,
    context: ArcSwap<PropagationContext>,
    sources: RwLock<BTreeMap<SourceId, StageSource>>,
    next_id: AtomicU64,
    gate_params: RwLock<GateParams>,
    gate: GateScheduler,
    reverb: RwLock<ReverbPreset>,
    impulses: ImpulseCache,
}

impl PodiumEngine {
    pub fn builder() -> PodiumEngineBuilder {
        PodiumEngineBuilder::default()
    }

    pub(crate) fn from_parts(
        sample_rate: u32,
        context: PropagationContext,
        microphones: MicrophoneConfiguration,
        gate_params: GateParams,
        gate_threads: usize,
        reverb: ReverbPreset,
    ) -> Result<Self> {
        let gate = GateScheduler::new(gate_threads)?;
        info!(
            sample_rate,
            technique = %microphones.technique.id(),
            gate_threads,
            "Podium engine ready"
        );
        Ok(Self {
            sample_rate,
            microphones: ArcSwap::from_pointee(microphones),
            context: ArcSwap::from_pointee(context),
            sources: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            gate_params: RwLock::new(gate_params),
            gate,
            reverb: RwLock::new(reverb),
            impulses: ImpulseCache::new(),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    // ---- Sources ----

    /// Place a recording on the stage.
    ///
    /// Both recordings must match the engine sample rate.
    pub fn add_source(
        &self,
        name: impl Into<String>,
        position: SourcePosition,
        front: AudioBuffer,
        bell: Option<AudioBuffer>,
    ) -> Result<SourceId> {
        for buffer in std::iter::once(&front).chain(bell.as_ref()) {
            if buffer.sample_rate() != self.sample_rate {
                return Err(CoreError::SampleRateMismatch {
                    expected: self.sample_rate,
                    found: buffer.sample_rate(),
                }
                .into());
            }
        }

        let id = SourceId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let name = name.into();
        info!(%id, name = %name, x = position.x, y = position.y, "Source added");
        self.sources.write().insert(
            id,
            StageSource {
                name,
                position,
                home: position,
                front,
                bell,
                gated: false,
            },
        );
        Ok(id)
    }

    /// Remove a source. Any gate pass still running for it is discarded.
    pub fn remove_source(&self, id: SourceId) -> Result<StageSource> {
        let removed = self
            .sources
            .write()
            .remove(&id)
            .ok_or(Error::UnknownSource(id))?;
        self.gate.cancel(&id.gate_key());
        info!(%id, "Source removed");
        Ok(removed)
    }

    pub fn move_source(&self, id: SourceId, position: SourcePosition) -> Result<()> {
        let mut sources = self.sources.write();
        let source = sources.get_mut(&id).ok_or(Error::UnknownSource(id))?;
        source.position = position;
        Ok(())
    }

    /// Put a source back where it was added.
    pub fn reset_source(&self, id: SourceId) -> Result<SourcePosition> {
        let mut sources = self.sources.write();
        let source = sources.get_mut(&id).ok_or(Error::UnknownSource(id))?;
        source.position = source.home;
        Ok(source.home)
    }

    pub fn reset_all_sources(&self) {
        for source in self.sources.write().values_mut() {
            source.position = source.home;
        }
    }

    pub fn position(&self, id: SourceId) -> Option<SourcePosition> {
        self.sources.read().get(&id).map(|s| s.position)
    }

    pub fn is_gated(&self, id: SourceId) -> Option<bool> {
        self.sources.read().get(&id).map(|s| s.gated)
    }

    pub fn source_name(&self, id: SourceId) -> Option<String> {
        self.sources.read().get(&id).map(|s| s.name.clone())
    }

    pub fn source_ids(&self) -> Vec<SourceId> {
        self.sources.read().keys().copied().collect()
    }

    pub fn source_count(&self) -> usize {
        self.sources.read().len()
    }

    // ---- Microphones & propagation ----

    /// Current microphone snapshot.
    pub fn microphones(&self) -> Arc<MicrophoneConfiguration> {
        self.microphones.load_full()
    }

    /// Replace the microphone configuration.
    ///
    /// The value is validated and its channel layout recomputed before it is
    /// published, so hand-edited or deserialized configurations are safe.
    pub fn set_microphones(&self, config: MicrophoneConfiguration) {
        let config = config.normalized();
        debug!(technique = %config.technique.id(), "Microphones replaced");
        self.microphones.store(Arc::new(config));
    }

    /// Derive a new configuration from the current one.
    pub fn update_microphones<F>(&self, f: F)
    where
        F: Fn(MicrophoneConfiguration) -> MicrophoneConfiguration,
    {
        self.microphones
            .rcu(|current| Arc::new(f(MicrophoneConfiguration::clone(current)).normalized()));
    }

    pub fn context(&self) -> Arc<PropagationContext> {
        self.context.load_full()
    }

    pub fn set_context(&self, context: PropagationContext) {
        self.context.store(Arc::new(context));
    }

    pub fn set_ground(&self, surface: Option<GroundSurface>) {
        self.context
            .rcu(|current| Arc::new(current.with_ground(surface)));
    }

    /// Render parameters for one source under the current snapshots.
    ///
    /// Live updates and [`render_mix`](Self::render_mix) share this path.
    pub fn render_params(&self, id: SourceId) -> Result<SourceRenderParams> {
        let position = self.position(id).ok_or(Error::UnknownSource(id))?;
        let mics = self.microphones.load();
        let ctx = self.context.load();
        Ok(compute_render_params(position, &mics, &ctx))
    }

    pub fn all_render_params(&self) -> Vec<(SourceId, SourceRenderParams)> {
        let mics = self.microphones.load();
        let ctx = self.context.load();
        self.sources
            .read()
            .iter()
            .map(|(&id, s)| (id, compute_render_params(s.position, &mics, &ctx)))
            .collect()
    }

    // ---- Noise gate ----

    pub fn gate_params(&self) -> GateParams {
        *self.gate_params.read()
    }

    pub fn set_gate_params(&self, params: GateParams) {
        *self.gate_params.write() = params;
    }

    /// Queue a gate pass for one source.
    ///
    /// A source with a bell recording is gated coherently so both
    /// recordings open and close together. Re-gating supersedes any pass
    /// still in flight.
    pub fn gate_source(&self, id: SourceId) -> Result<GateTicket> {
        let buffers = {
            let sources = self.sources.read();
            let source = sources.get(&id).ok_or(Error::UnknownSource(id))?;
            std::iter::once(source.front.clone())
                .chain(source.bell.clone())
                .collect::<Vec<_>>()
        };
        let coherent = buffers.len() > 1;
        let params = self.gate_params();
        let ticket = self.gate.submit(id.gate_key(), params, buffers)?;
        debug!(%id, task_id = ticket.task_id, coherent, "Gate dispatched");
        Ok(ticket)
    }

    pub fn gate_all(&self) -> Result<Vec<GateTicket>> {
        self.source_ids()
            .into_iter()
            .map(|id| self.gate_source(id))
            .collect()
    }

    /// Apply every finished, current gate result. Returns the sources updated.
    pub fn poll_gate(&self) -> Vec<SourceId> {
        let results = self.gate.poll();
        results
            .into_iter()
            .filter_map(|result| self.apply_gate_result(result))
            .collect()
    }

    /// Block until one current gate result is applied or `timeout` passes.
    pub fn wait_gate(&self, timeout: Duration) -> Option<SourceId> {
        let result = self.gate.wait(timeout)?;
        self.apply_gate_result(result)
    }

    pub fn gates_in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    fn apply_gate_result(&self, result: GateResult) -> Option<SourceId> {
        let id = SourceId::from_gate_key(&result.key)?;
        if let GateStatus::Skipped(reason) = result.outcome.status {
            warn!(%id, %reason, "Gate skipped");
            return None;
        }

        let mut sources = self.sources.write();
        let Some(source) = sources.get_mut(&id) else {
            debug!(%id, "Gate result for removed source");
            return None;
        };
        let mut buffers = result.outcome.buffers.into_iter();
        if let Some(front) = buffers.next() {
            source.front = front;
        }
        if source.bell.is_some() {
            source.bell = buffers.next();
        }
        source.gated = true;
        debug!(%id, task_id = result.task_id, "Gate applied");
        Some(id)
    }

    // ---- Reverb ----

    pub fn reverb(&self) -> ReverbPreset {
        *self.reverb.read()
    }

    pub fn set_reverb(&self, preset: ReverbPreset) {
        *self.reverb.write() = preset;
    }

    /// Impulse for the current preset at the engine rate (cached).
    pub fn impulse(&self) -> Option<Arc<AudioBuffer>> {
        self.impulses.get(self.reverb(), self.sample_rate)
    }

    // ---- Offline render ----

    /// Render every source through the array and add the reverb send.
    pub fn render_mix(&self) -> Result<AudioBuffer> {
        let mics = self.microphones.load();
        let ctx = self.context.load();

        // Snapshot under the lock, render without it
        let snapshot: Vec<(SourcePosition, AudioBuffer, Option<AudioBuffer>)> = self
            .sources
            .read()
            .values()
            .map(|s| (s.position, s.front.clone(), s.bell.clone()))
            .collect();

        let mut left: Vec<f32> = Vec::new();
        let mut right: Vec<f32> = Vec::new();
        for (position, front, bell) in &snapshot {
            let params = compute_render_params(*position, &mics, &ctx);
            // Recordings are rendered as mono sources (first channel)
            let rendered = render_source(
                front.channel(0).unwrap_or_default(),
                bell.as_ref().and_then(|b| b.channel(0)),
                self.sample_rate,
                &params,
            )?;
            accumulate(&mut left, rendered.channel(0).unwrap_or_default());
            accumulate(&mut right, rendered.channel(1).unwrap_or_default());
        }

        let dry = AudioBuffer::new(vec![left, right], self.sample_rate)?;
        let preset = self.reverb();
        match self.impulse() {
            Some(impulse) => Ok(apply_reverb(&dry, &impulse, preset.wet_gain())?),
            None => Ok(dry),
        }
    }
}

fn accumulate(into: &mut Vec<f32>, samples: &[f32]) {
    if into.len() < samples.len() {
        into.resize(samples.len(), 0.0);
    }
    for (a, s) in into.iter_mut().zip(samples) {
        *a += s;
    }
}

impl fmt::Debug for PodiumEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PodiumEngine")
            .field("sample_rate", &self.sample_rate)
            .field("sources", &self.source_count())
            .field("technique", &self.microphones.load().technique)
            .field("reverb", &self.reverb())
            .finish()
    }
}

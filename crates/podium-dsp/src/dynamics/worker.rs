//! Background gate processing.
//!
//! Gating a long take is linear but not free, so callers hand buffers to a
//! small pool of threads and pick results up later. Every request carries a
//! task id and a generation. The scheduler bumps the generation for a key on
//! each submit and drops results that arrive for an older one, so only the
//! latest request per key is ever delivered.

use super::gate::{GateOutcome, NoiseGate};
use super::params::GateParams;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use podium_core::{AudioBuffer, Error, Result};
use std::collections::HashMap;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Work item sent to the pool.
#[derive(Debug, Clone)]
pub struct GateRequest {
    pub task_id: u64,
    pub generation: u64,
    /// Caller-defined identity, usually the source id
    pub key: String,
    pub params: GateParams,
    pub buffers: Vec<AudioBuffer>,
}

/// Finished work item.
#[derive(Debug, Clone)]
pub struct GateResult {
    pub task_id: u64,
    pub generation: u64,
    pub key: String,
    pub outcome: GateOutcome,
}

/// Commands sent to the gate threads
enum GateCommand {
    Process(GateRequest),
    Shutdown,
}

/// Fixed pool of gate threads fed by one MPMC queue.
pub struct GateWorker {
    command_tx: Sender<GateCommand>,
    result_rx: Receiver<GateResult>,
    handles: Vec<JoinHandle<()>>,
}

impl GateWorker {
    /// Spawn `threads` workers (at least one).
    pub fn spawn(threads: usize) -> Result<Self> {
        let threads = threads.max(1);
        let (command_tx, command_rx) = unbounded::<GateCommand>();
        let (result_tx, result_rx) = unbounded::<GateResult>();

        let mut handles = Vec::with_capacity(threads);
        for index in 0..threads {
            let commands = command_rx.clone();
            let results = result_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("podium-gate-{index}"))
                .spawn(move || Self::gate_thread(commands, results))
                .map_err(|e| {
                    warn!(error = %e, "Failed to spawn gate thread");
                    Error::WorkerUnavailable
                })?;
            handles.push(handle);
        }

        debug!(threads, "Gate worker started");
        Ok(Self {
            command_tx,
            result_rx,
            handles,
        })
    }

    fn gate_thread(commands: Receiver<GateCommand>, results: Sender<GateResult>) {
        loop {
            match commands.recv() {
                Ok(GateCommand::Process(request)) => {
                    trace!(task_id = request.task_id, key = %request.key, "Gating");
                    let outcome = NoiseGate::new(request.params).process_coherent(request.buffers);
                    let result = GateResult {
                        task_id: request.task_id,
                        generation: request.generation,
                        key: request.key,
                        outcome,
                    };
                    if results.send(result).is_err() {
                        // Nobody is listening any more
                        break;
                    }
                }
                Ok(GateCommand::Shutdown) | Err(_) => break,
            }
        }
    }

    pub fn thread_count(&self) -> usize {
        self.handles.len()
    }

    pub fn submit(&self, request: GateRequest) -> Result<()> {
        self.command_tx
            .send(GateCommand::Process(request))
            .map_err(|_| Error::WorkerUnavailable)
    }

    pub fn try_recv(&self) -> Option<GateResult> {
        self.result_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<GateResult> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for GateWorker {
    fn drop(&mut self) {
        for _ in &self.handles {
            let _ = self.command_tx.send(GateCommand::Shutdown);
        }
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

/// Handle returned by [`GateScheduler::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTicket {
    pub task_id: u64,
    pub generation: u64,
}

/// Tracks the latest generation per key and filters stale results.
///
/// All methods take `&self`. The bookkeeping lock is only held for map
/// updates, never while waiting on the pool, so a thread blocked in
/// [`wait`](Self::wait) does not stall `submit`, `poll` or `cancel` elsewhere.
pub struct GateScheduler {
    worker: GateWorker,
    state: Mutex<SchedulerState>,
}

#[derive(Default)]
struct SchedulerState {
    next_task_id: u64,
    next_generation: u64,
    latest: HashMap<String, u64>,
    in_flight: usize,
}

impl GateScheduler {
    pub fn new(threads: usize) -> Result<Self> {
        Ok(Self::with_worker(GateWorker::spawn(threads)?))
    }

    pub fn with_worker(worker: GateWorker) -> Self {
        Self {
            worker,
            state: Mutex::new(SchedulerState::default()),
        }
    }

    /// Queue a gate pass for `key`. Any earlier request for the same key
    /// becomes stale.
    pub fn submit(
        &self,
        key: impl Into<String>,
        params: GateParams,
        buffers: Vec<AudioBuffer>,
    ) -> Result<GateTicket> {
        let key = key.into();
        let mut state = self.state.lock();
        state.next_task_id += 1;
        state.next_generation += 1;
        let ticket = GateTicket {
            task_id: state.next_task_id,
            generation: state.next_generation,
        };

        // The queue is unbounded, so sending under the lock never blocks and
        // the generation is recorded before any thread can finish the task.
        self.worker.submit(GateRequest {
            task_id: ticket.task_id,
            generation: ticket.generation,
            key: key.clone(),
            params,
            buffers,
        })?;

        state.latest.insert(key, ticket.generation);
        state.in_flight += 1;
        Ok(ticket)
    }

    /// Forget a key. Results still in flight for it will be dropped.
    pub fn cancel(&self, key: &str) {
        self.state.lock().latest.remove(key);
    }

    pub fn is_current(&self, result: &GateResult) -> bool {
        self.state.lock().latest.get(&result.key) == Some(&result.generation)
    }

    /// Requests submitted but not yet received (stale ones included).
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight
    }

    /// Drain every finished result without blocking, keeping only current ones.
    pub fn poll(&self) -> Vec<GateResult> {
        let mut fresh = Vec::new();
        while let Some(result) = self.worker.try_recv() {
            if let Some(result) = self.accept(result) {
                fresh.push(result);
            }
        }
        fresh
    }

    /// Block until a current result arrives or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> Option<GateResult> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let result = self.worker.recv_timeout(remaining)?;
            if let Some(result) = self.accept(result) {
                return Some(result);
            }
        }
    }

    fn accept(&self, result: GateResult) -> Option<GateResult> {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.latest.get(&result.key) == Some(&result.generation) {
            state.latest.remove(&result.key);
            Some(result)
        } else {
            debug!(
                task_id = result.task_id,
                generation = result.generation,
                key = %result.key,
                "Discarding stale gate result"
            );
            None
        }
    }
}

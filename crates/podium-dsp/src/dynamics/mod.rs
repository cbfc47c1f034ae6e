//! Offline noise gating.

mod envelope;
mod gate;
mod params;
mod worker;

pub use envelope::{
    apply_envelope, centered_average, combined_energy, raw_envelope, smooth_envelope, GateMachine,
    GateState,
};
pub use gate::{GateOutcome, GateStatus, NoiseGate, NoiseGateBuilder, SkipReason};
pub use params::{GateParams, GateParamsBuilder};
pub use worker::{GateRequest, GateResult, GateScheduler, GateTicket, GateWorker};

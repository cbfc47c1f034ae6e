//! Centralized error type for the podium umbrella crate.
//!
//! Wraps the shared subsystem error so `?` propagates across crate boundaries.

use crate::SourceId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] podium_core::Error),

    #[error("Unknown source: {0}")]
    UnknownSource(SourceId),
}

pub type Result<T> = std::result::Result<T, Error>;

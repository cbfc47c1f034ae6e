//! Shared building blocks for the podium virtual stage.
//!
//! # Primary API
//!
//! - [`Error`] / [`Result`]: Error type shared by every podium subsystem
//! - [`Vec2`], [`StageDimensions`], [`SourcePosition`]: Stage geometry in meters
//! - [`AudioBuffer`]: Owned planar multi-channel sample buffer
//! - [`db_to_gain`], [`gain_to_db`]: Level conversions
//!
//! Everything here is plain data. Nothing holds shared mutable state, so values
//! can be cloned into worker threads freely.

pub mod error;
pub use error::{Error, Result};

mod units;
pub use units::{db_to_gain, finite_or, gain_to_db, SPEED_OF_SOUND};

mod geometry;
pub use geometry::{SourcePosition, StageDimensions, Vec2};

mod buffer;
pub use buffer::AudioBuffer;

//! First-order polar patterns.

use core::str::FromStr;
use podium_core::Error;
use serde::{Deserialize, Serialize};

/// First-order microphone polar pattern.
///
/// Every pattern follows `G(θ) = α + (1 - α)·cos θ`, where `α` is the
/// omnidirectional share. Patterns with `α < 0.5` have a phase-inverted rear
/// lobe, so the gain is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolarPattern {
    #[default]
    Omni,
    Subcardioid,
    Cardioid,
    Supercardioid,
    Hypercardioid,
    Figure8,
}

impl PolarPattern {
    pub const ALL: [PolarPattern; 6] = [
        PolarPattern::Omni,
        PolarPattern::Subcardioid,
        PolarPattern::Cardioid,
        PolarPattern::Supercardioid,
        PolarPattern::Hypercardioid,
        PolarPattern::Figure8,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PolarPattern::Omni => "omni",
            PolarPattern::Subcardioid => "subcardioid",
            PolarPattern::Cardioid => "cardioid",
            PolarPattern::Supercardioid => "supercardioid",
            PolarPattern::Hypercardioid => "hypercardioid",
            PolarPattern::Figure8 => "figure8",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PolarPattern::Omni => "Omnidirectional",
            PolarPattern::Subcardioid => "Subcardioid",
            PolarPattern::Cardioid => "Cardioid",
            PolarPattern::Supercardioid => "Supercardioid",
            PolarPattern::Hypercardioid => "Hypercardioid",
            PolarPattern::Figure8 => "Figure-8",
        }
    }

    /// Omnidirectional component `α ∈ [0, 1]`.
    pub fn alpha(self) -> f32 {
        match self {
            PolarPattern::Omni => 1.0,
            PolarPattern::Subcardioid => 0.7,
            PolarPattern::Cardioid => 0.5,
            PolarPattern::Supercardioid => 0.37,
            PolarPattern::Hypercardioid => 0.25,
            PolarPattern::Figure8 => 0.0,
        }
    }

    pub fn is_bidirectional(self) -> bool {
        matches!(self, PolarPattern::Figure8)
    }

    /// Signed gain at `angle` radians off axis. Never take `abs()` of this:
    /// the negative rear lobe is a polarity flip the renderer must keep.
    #[inline]
    pub fn gain(self, angle: f32) -> f32 {
        let alpha = self.alpha();
        alpha + (1.0 - alpha) * angle.cos()
    }
}

impl FromStr for PolarPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "omni" | "omnidirectional" => Ok(PolarPattern::Omni),
            "subcardioid" | "wide-cardioid" => Ok(PolarPattern::Subcardioid),
            "cardioid" => Ok(PolarPattern::Cardioid),
            "supercardioid" => Ok(PolarPattern::Supercardioid),
            "hypercardioid" => Ok(PolarPattern::Hypercardioid),
            "figure8" | "figure-8" | "bidirectional" => Ok(PolarPattern::Figure8),
            _ => Err(Error::UnknownPattern(s.to_string())),
        }
    }
}

impl core::fmt::Display for PolarPattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

//! Stereo technique templates.
//!
//! Templates are immutable and defined once. A [`MicrophoneConfiguration`]
//! refers to its template by [`TechniqueId`] and reads ranges, defaults and the
//! fixed pattern from it whenever it is validated.
//!
//! [`MicrophoneConfiguration`]: crate::MicrophoneConfiguration

use crate::PolarPattern;
use core::str::FromStr;
use podium_core::Error;
use serde::{Deserialize, Serialize};

/// Identifier of a stereo recording technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TechniqueId {
    /// A/B spaced omnis
    #[default]
    SpacedPair,
    /// Coincident crossed cardioids
    XyCoincident,
    /// 17 cm / 110° near-coincident cardioids
    Ortf,
    /// 30 cm / 90° near-coincident cardioids
    Nos,
    /// Crossed figure-8s at 90°
    Blumlein,
    /// L/C/R omni tree with a forward center
    DeccaTree,
}

impl TechniqueId {
    pub const ALL: [TechniqueId; 6] = [
        TechniqueId::SpacedPair,
        TechniqueId::XyCoincident,
        TechniqueId::Ortf,
        TechniqueId::Nos,
        TechniqueId::Blumlein,
        TechniqueId::DeccaTree,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TechniqueId::SpacedPair => "spaced-pair",
            TechniqueId::XyCoincident => "xy-coincident",
            TechniqueId::Ortf => "ortf",
            TechniqueId::Nos => "nos",
            TechniqueId::Blumlein => "blumlein",
            TechniqueId::DeccaTree => "decca-tree",
        }
    }

    /// Lenient lookup used by UI-originated input: unknown ids log a warning
    /// and fall back to [`TechniqueId::default`] (spaced pair).
    pub fn resolve(id: &str) -> TechniqueId {
        match id.parse() {
            Ok(technique) => technique,
            Err(_) => {
                tracing::warn!(
                    technique = id,
                    fallback = TechniqueId::default().id(),
                    "Unknown microphone technique, using fallback"
                );
                TechniqueId::default()
            }
        }
    }

    pub fn template(self) -> &'static TechniqueTemplate {
        TechniqueTemplate::get(self)
    }
}

impl FromStr for TechniqueId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spaced-pair" | "spaced" | "ab" | "a-b" => Ok(TechniqueId::SpacedPair),
            "xy-coincident" | "xy" => Ok(TechniqueId::XyCoincident),
            "ortf" => Ok(TechniqueId::Ortf),
            "nos" => Ok(TechniqueId::Nos),
            "blumlein" => Ok(TechniqueId::Blumlein),
            "decca-tree" | "decca" => Ok(TechniqueId::DeccaTree),
            _ => Err(Error::UnknownTechnique(s.to_string())),
        }
    }
}

impl core::fmt::Display for TechniqueId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

/// Logical microphone channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelId {
    Left,
    Right,
    Center,
}

impl ChannelId {
    /// -1 for left, +1 for right, 0 for center.
    pub fn side(self) -> f32 {
        match self {
            ChannelId::Left => -1.0,
            ChannelId::Right => 1.0,
            ChannelId::Center => 0.0,
        }
    }
}

/// How channels are folded into the output busses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Left → left bus, right → right bus
    Direct,
    /// Direct plus the center channel at equal power into both busses
    Decca,
}

/// Inclusive range for an adjustable technique parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp into range. NaN/∞ become `fallback` (itself clamped).
    pub fn clamp(&self, value: f32, fallback: f32) -> f32 {
        let value = if value.is_finite() { value } else { fallback };
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Technique defaults for the layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutDefaults {
    /// Meters between the left and right capsules
    pub spacing: f32,
    /// Degrees between the left and right axes
    pub angle: f32,
    /// Meters the center capsule sits forward of the pair
    pub center_depth: f32,
    /// Center channel level in dB
    pub center_level: f32,
}

/// Per-channel defaults of a technique.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelTemplate {
    pub id: ChannelId,
    pub label: &'static str,
    pub pattern: PolarPattern,
}

/// Immutable description of a stereo technique.
#[derive(Debug, Clone, PartialEq)]
pub struct TechniqueTemplate {
    pub id: TechniqueId,
    pub label: &'static str,
    pub description: &'static str,
    pub channels: &'static [ChannelTemplate],
    pub defaults: LayoutDefaults,
    pub spacing: Option<ParamRange>,
    pub angle: Option<ParamRange>,
    pub center_depth: Option<ParamRange>,
    pub center_level: Option<ParamRange>,
    /// Forces every channel to this pattern
    pub fixed_pattern: Option<PolarPattern>,
    pub has_center: bool,
    pub routing: RoutingMode,
}

impl TechniqueTemplate {
    pub fn get(id: TechniqueId) -> &'static TechniqueTemplate {
        match id {
            TechniqueId::SpacedPair => &TECHNIQUES[0],
            TechniqueId::XyCoincident => &TECHNIQUES[1],
            TechniqueId::Ortf => &TECHNIQUES[2],
            TechniqueId::Nos => &TECHNIQUES[3],
            TechniqueId::Blumlein => &TECHNIQUES[4],
            TechniqueId::DeccaTree => &TECHNIQUES[5],
        }
    }

    pub fn all() -> &'static [TechniqueTemplate] {
        &TECHNIQUES
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

const OMNI_PAIR: &[ChannelTemplate] = &[
    ChannelTemplate {
        id: ChannelId::Left,
        label: "L",
        pattern: PolarPattern::Omni,
    },
    ChannelTemplate {
        id: ChannelId::Right,
        label: "R",
        pattern: PolarPattern::Omni,
    },
];

const CARDIOID_PAIR: &[ChannelTemplate] = &[
    ChannelTemplate {
        id: ChannelId::Left,
        label: "L",
        pattern: PolarPattern::Cardioid,
    },
    ChannelTemplate {
        id: ChannelId::Right,
        label: "R",
        pattern: PolarPattern::Cardioid,
    },
];

const FIGURE8_PAIR: &[ChannelTemplate] = &[
    ChannelTemplate {
        id: ChannelId::Left,
        label: "L",
        pattern: PolarPattern::Figure8,
    },
    ChannelTemplate {
        id: ChannelId::Right,
        label: "R",
        pattern: PolarPattern::Figure8,
    },
];

const DECCA_TREE: &[ChannelTemplate] = &[
    ChannelTemplate {
        id: ChannelId::Left,
        label: "L",
        pattern: PolarPattern::Omni,
    },
    ChannelTemplate {
        id: ChannelId::Right,
        label: "R",
        pattern: PolarPattern::Omni,
    },
    ChannelTemplate {
        id: ChannelId::Center,
        label: "C",
        pattern: PolarPattern::Omni,
    },
];

static TECHNIQUES: [TechniqueTemplate; 6] = [
    TechniqueTemplate {
        id: TechniqueId::SpacedPair,
        label: "Spaced Pair (A/B)",
        description: "Two spaced omnis; width from time-of-arrival differences",
        channels: OMNI_PAIR,
        defaults: LayoutDefaults {
            spacing: 1.5,
            angle: 0.0,
            center_depth: 0.0,
            center_level: 0.0,
        },
        spacing: Some(ParamRange::new(0.2, 6.0)),
        angle: None,
        center_depth: None,
        center_level: None,
        fixed_pattern: None,
        has_center: false,
        routing: RoutingMode::Direct,
    },
    TechniqueTemplate {
        id: TechniqueId::XyCoincident,
        label: "XY Coincident",
        description: "Crossed cardioids at one point; pure level-difference stereo",
        channels: CARDIOID_PAIR,
        defaults: LayoutDefaults {
            spacing: 0.0,
            angle: 90.0,
            center_depth: 0.0,
            center_level: 0.0,
        },
        spacing: None,
        angle: Some(ParamRange::new(60.0, 135.0)),
        center_depth: None,
        center_level: None,
        fixed_pattern: Some(PolarPattern::Cardioid),
        has_center: false,
        routing: RoutingMode::Direct,
    },
    TechniqueTemplate {
        id: TechniqueId::Ortf,
        label: "ORTF",
        description: "Near-coincident cardioids, 17 cm apart at 110°",
        channels: CARDIOID_PAIR,
        defaults: LayoutDefaults {
            spacing: 0.17,
            angle: 110.0,
            center_depth: 0.0,
            center_level: 0.0,
        },
        spacing: Some(ParamRange::new(0.15, 0.25)),
        angle: Some(ParamRange::new(90.0, 130.0)),
        center_depth: None,
        center_level: None,
        fixed_pattern: Some(PolarPattern::Cardioid),
        has_center: false,
        routing: RoutingMode::Direct,
    },
    TechniqueTemplate {
        id: TechniqueId::Nos,
        label: "NOS",
        description: "Near-coincident cardioids, 30 cm apart at 90°",
        channels: CARDIOID_PAIR,
        defaults: LayoutDefaults {
            spacing: 0.30,
            angle: 90.0,
            center_depth: 0.0,
            center_level: 0.0,
        },
        spacing: Some(ParamRange::new(0.2, 0.4)),
        angle: Some(ParamRange::new(70.0, 110.0)),
        center_depth: None,
        center_level: None,
        fixed_pattern: Some(PolarPattern::Cardioid),
        has_center: false,
        routing: RoutingMode::Direct,
    },
    TechniqueTemplate {
        id: TechniqueId::Blumlein,
        label: "Blumlein",
        description: "Coincident figure-8s at 90°; rear lobes pick up the hall",
        channels: FIGURE8_PAIR,
        defaults: LayoutDefaults {
            spacing: 0.0,
            angle: 90.0,
            center_depth: 0.0,
            center_level: 0.0,
        },
        spacing: None,
        angle: Some(ParamRange::new(80.0, 100.0)),
        center_depth: None,
        center_level: None,
        fixed_pattern: Some(PolarPattern::Figure8),
        has_center: false,
        routing: RoutingMode::Direct,
    },
    TechniqueTemplate {
        id: TechniqueId::DeccaTree,
        label: "Decca Tree",
        description: "Three omnis in a T; center panned equally to both sides",
        channels: DECCA_TREE,
        defaults: LayoutDefaults {
            spacing: 2.0,
            angle: 0.0,
            center_depth: 1.5,
            center_level: 0.0,
        },
        spacing: Some(ParamRange::new(1.0, 3.0)),
        angle: None,
        center_depth: Some(ParamRange::new(0.0, 2.5)),
        center_level: Some(ParamRange::new(-12.0, 6.0)),
        fixed_pattern: None,
        has_center: true,
        routing: RoutingMode::Decca,
    },
];

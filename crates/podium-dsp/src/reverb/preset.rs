//! Named reverb presets and their synthesis parameters.

use core::fmt;
use core::str::FromStr;
use podium_core::Error;
use tracing::warn;

/// One discrete early reflection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionTap {
    /// Offset from the start of the impulse, seconds
    pub time: f32,
    pub gain: f32,
    /// -1.0 = left, 1.0 = right
    pub pan: f32,
}

impl ReflectionTap {
    pub const fn new(time: f32, gain: f32, pan: f32) -> Self {
        Self { time, gain, pan }
    }
}

/// Used by presets that do not define their own taps.
pub const DEFAULT_TAPS: [ReflectionTap; 6] = [
    ReflectionTap::new(0.011, 0.50, -0.30),
    ReflectionTap::new(0.017, 0.42, 0.40),
    ReflectionTap::new(0.023, 0.35, -0.55),
    ReflectionTap::new(0.031, 0.30, 0.50),
    ReflectionTap::new(0.041, 0.24, -0.15),
    ReflectionTap::new(0.053, 0.20, 0.25),
];

const HALL_TAPS: [ReflectionTap; 6] = [
    ReflectionTap::new(0.019, 0.45, -0.60),
    ReflectionTap::new(0.027, 0.40, 0.60),
    ReflectionTap::new(0.038, 0.32, -0.35),
    ReflectionTap::new(0.049, 0.30, 0.35),
    ReflectionTap::new(0.066, 0.22, -0.10),
    ReflectionTap::new(0.081, 0.18, 0.10),
];

// Few strong, late slaps off the stone terraces
const AMPHITHEATER_TAPS: [ReflectionTap; 4] = [
    ReflectionTap::new(0.045, 0.55, -0.70),
    ReflectionTap::new(0.072, 0.45, 0.70),
    ReflectionTap::new(0.118, 0.30, -0.40),
    ReflectionTap::new(0.165, 0.22, 0.40),
];

/// Everything the synthesizer needs for one preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    /// Impulse length, seconds
    pub duration: f32,
    pub rt60: f32,
    pub predelay: f32,
    /// How much faster the high band decays than the low band
    pub hf_decay: f32,
    /// Low/high split frequency of the tail noise
    pub lowpass_hz: f32,
    /// Suggested send level, 0..=100
    pub wet_percent: f32,
    pub taps: &'static [ReflectionTap],
    /// Thin the tail out to a sparse, outdoor-like pattern
    pub sparse: bool,
}

/// Reverb preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReverbPreset {
    None,
    SmallRoom,
    Chamber,
    #[default]
    ConcertHall,
    LargeHall,
    Cathedral,
    Amphitheater,
}

impl ReverbPreset {
    pub const ALL: [ReverbPreset; 7] = [
        ReverbPreset::None,
        ReverbPreset::SmallRoom,
        ReverbPreset::Chamber,
        ReverbPreset::ConcertHall,
        ReverbPreset::LargeHall,
        ReverbPreset::Cathedral,
        ReverbPreset::Amphitheater,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::SmallRoom => "small-room",
            Self::Chamber => "chamber",
            Self::ConcertHall => "concert-hall",
            Self::LargeHall => "large-hall",
            Self::Cathedral => "cathedral",
            Self::Amphitheater => "amphitheater",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "Dry",
            Self::SmallRoom => "Small Room",
            Self::Chamber => "Chamber",
            Self::ConcertHall => "Concert Hall",
            Self::LargeHall => "Large Hall",
            Self::Cathedral => "Cathedral",
            Self::Amphitheater => "Amphitheater (outdoor)",
        }
    }

    pub fn params(self) -> ReverbParams {
        let (duration, rt60, predelay, hf_decay, lowpass_hz, wet_percent) = match self {
            Self::None => (0.0, 0.0, 0.0, 1.0, 20000.0, 0.0),
            Self::SmallRoom => (0.8, 0.5, 0.004, 2.2, 7000.0, 15.0),
            Self::Chamber => (1.6, 1.2, 0.010, 1.9, 5500.0, 20.0),
            Self::ConcertHall => (2.8, 2.1, 0.022, 1.6, 4500.0, 25.0),
            Self::LargeHall => (3.6, 2.8, 0.032, 1.5, 4000.0, 28.0),
            Self::Cathedral => (6.0, 5.0, 0.048, 1.4, 3000.0, 35.0),
            Self::Amphitheater => (2.2, 1.4, 0.040, 2.6, 5000.0, 18.0),
        };
        let taps: &'static [ReflectionTap] = match self {
            Self::None => &[],
            Self::ConcertHall | Self::LargeHall | Self::Cathedral => &HALL_TAPS,
            Self::Amphitheater => &AMPHITHEATER_TAPS,
            Self::SmallRoom | Self::Chamber => &DEFAULT_TAPS,
        };
        ReverbParams {
            duration,
            rt60,
            predelay,
            hf_decay,
            lowpass_hz,
            wet_percent,
            taps,
            sparse: self == Self::Amphitheater,
        }
    }

    /// Suggested wet send as a linear factor.
    pub fn wet_gain(self) -> f32 {
        self.params().wet_percent / 100.0
    }

    /// Lenient lookup: unknown ids fall back to `none` with a warning.
    pub fn resolve(id: &str) -> Self {
        id.parse().unwrap_or_else(|_| {
            warn!(preset = id, "Unknown reverb preset, using none");
            Self::None
        })
    }

    pub(crate) fn seed(self) -> u64 {
        0x5eed_0000_u64 + Self::ALL.iter().position(|&p| p == self).unwrap_or(0) as u64
    }
}

impl FromStr for ReverbPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.id() == normalized)
            .ok_or_else(|| Error::UnknownReverbPreset(s.to_string()))
    }
}

impl fmt::Display for ReverbPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

//! Microphone array model: polar patterns, stereo technique templates and the
//! [`MicrophoneConfiguration`] value that the propagation solver reads.
//!
//! Configurations are plain values. Every change produces a new value through
//! the same validate + layout path, so channel offsets are always a pure
//! function of `(technique, spacing, angle, center_depth)`.
//!
//! ```ignore
//! use podium_mic::{ConfigOverrides, MicrophoneConfiguration, TechniqueId};
//!
//! let config = MicrophoneConfiguration::create(
//!     TechniqueId::SpacedPair,
//!     &ConfigOverrides::default().spacing(2.0).mic_y(-1.0),
//! );
//! assert_eq!(config.channels.len(), 2);
//! ```

mod pattern;
pub use pattern::PolarPattern;

mod technique;
pub use technique::{
    ChannelId, ChannelTemplate, LayoutDefaults, ParamRange, RoutingMode, TechniqueId,
    TechniqueTemplate,
};

mod config;
pub use config::{
    Channel, ConfigOverrides, MicrophoneConfiguration, MIC_Y_RANGE, MS_WIDTH_RANGE,
};

mod session;
pub use session::SessionMicSettings;

//! Persisted-session form of the microphone settings.

use crate::{ConfigOverrides, MicrophoneConfiguration, TechniqueId};
use serde::{Deserialize, Serialize};

/// Microphone settings as stored in a saved session.
///
/// Every field is optional so older or partial sessions still load; anything
/// missing or out of range goes through the normal create/validate path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionMicSettings {
    pub technique: Option<String>,
    pub spacing: Option<f32>,
    pub angle: Option<f32>,
    pub center_depth: Option<f32>,
    pub center_level: Option<f32>,
    pub mic_y: Option<f32>,
    pub ms_decode_enabled: Option<bool>,
    pub ms_width: Option<f32>,
}

impl MicrophoneConfiguration {
    /// Restore from session settings. Unknown techniques fall back leniently.
    pub fn from_session(settings: &SessionMicSettings) -> Self {
        let technique = settings
            .technique
            .as_deref()
            .map(TechniqueId::resolve)
            .unwrap_or_default();

        let overrides = ConfigOverrides {
            spacing: settings.spacing,
            angle: settings.angle,
            center_depth: settings.center_depth,
            center_level: settings.center_level,
            mic_y: settings.mic_y,
            ms_decode_enabled: settings.ms_decode_enabled,
            ms_width: settings.ms_width,
            pattern: None,
        };

        Self::create(technique, &overrides)
    }

    pub fn to_session(&self) -> SessionMicSettings {
        SessionMicSettings {
            technique: Some(self.technique.id().to_string()),
            spacing: Some(self.spacing),
            angle: Some(self.angle),
            center_depth: Some(self.center_depth),
            center_level: Some(self.center_level),
            mic_y: Some(self.mic_y),
            ms_decode_enabled: Some(self.ms_decode_enabled),
            ms_width: Some(self.ms_width),
        }
    }
}

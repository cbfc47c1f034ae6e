//! Microphone configuration value and its layout / validation transforms.

use crate::{ChannelId, ParamRange, PolarPattern, RoutingMode, TechniqueId, TechniqueTemplate};
use podium_core::{finite_or, Result};
use serde::{Deserialize, Serialize};

/// Allowed base distance of the array from the stage front, in meters.
/// Negative values stand in front of the stage (toward the audience).
pub const MIC_Y_RANGE: ParamRange = ParamRange::new(-15.0, -0.5);

/// M/S width: 0 = mono, 1 = unmodified, 2 = double width.
pub const MS_WIDTH_RANGE: ParamRange = ParamRange::new(0.0, 2.0);

/// Per-channel trim range in dB.
const CHANNEL_LEVEL_RANGE: ParamRange = ParamRange::new(-60.0, 12.0);

const DEFAULT_MIC_Y: f32 = -2.0;
const DEFAULT_MS_WIDTH: f32 = 1.0;

/// One capsule of the array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    pub label: String,
    pub pattern: PolarPattern,
    /// Axis in degrees from straight ahead; negative turns toward stage left
    pub angle: f32,
    /// Lateral offset from the array center in meters
    pub offset_x: f32,
    /// Offset toward the stage in meters
    pub offset_y: f32,
    pub level_db: f32,
    pub enabled: bool,
}

/// Requested changes for [`MicrophoneConfiguration::create`].
///
/// Fields the technique does not declare adjustable are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub spacing: Option<f32>,
    pub angle: Option<f32>,
    pub center_depth: Option<f32>,
    pub center_level: Option<f32>,
    pub mic_y: Option<f32>,
    pub ms_decode_enabled: Option<bool>,
    pub ms_width: Option<f32>,
    pub pattern: Option<PolarPattern>,
}

impl ConfigOverrides {
    pub fn spacing(mut self, meters: f32) -> Self {
        self.spacing = Some(meters);
        self
    }

    pub fn angle(mut self, degrees: f32) -> Self {
        self.angle = Some(degrees);
        self
    }

    pub fn center_depth(mut self, meters: f32) -> Self {
        self.center_depth = Some(meters);
        self
    }

    pub fn center_level(mut self, db: f32) -> Self {
        self.center_level = Some(db);
        self
    }

    pub fn mic_y(mut self, meters: f32) -> Self {
        self.mic_y = Some(meters);
        self
    }

    pub fn ms_decode(mut self, enabled: bool, width: f32) -> Self {
        self.ms_decode_enabled = Some(enabled);
        self.ms_width = Some(width);
        self
    }

    /// Ignored when the technique fixes the pattern.
    pub fn pattern(mut self, pattern: PolarPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

/// Complete description of the virtual microphone array.
///
/// A plain value: every `with_*` call returns a new, validated and laid out
/// configuration. The solver only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicrophoneConfiguration {
    pub technique: TechniqueId,
    /// Base distance from the stage front in meters
    pub mic_y: f32,
    pub spacing: f32,
    pub angle: f32,
    pub center_depth: f32,
    pub center_level: f32,
    pub ms_decode_enabled: bool,
    pub ms_width: f32,
    pub channels: Vec<Channel>,
}

impl Default for MicrophoneConfiguration {
    fn default() -> Self {
        Self::create(TechniqueId::default(), &ConfigOverrides::default())
    }
}

impl MicrophoneConfiguration {
    /// Build a configuration from technique defaults plus `overrides`.
    pub fn create(technique: TechniqueId, overrides: &ConfigOverrides) -> Self {
        let template = technique.template();
        let defaults = template.defaults;

        let adjustable = |range: Option<ParamRange>, value: Option<f32>, default: f32| {
            match (range, value) {
                (Some(_), Some(v)) => v,
                _ => default,
            }
        };

        let mut config = Self {
            technique,
            mic_y: overrides.mic_y.unwrap_or(DEFAULT_MIC_Y),
            spacing: adjustable(template.spacing, overrides.spacing, defaults.spacing),
            angle: adjustable(template.angle, overrides.angle, defaults.angle),
            center_depth: adjustable(
                template.center_depth,
                overrides.center_depth,
                defaults.center_depth,
            ),
            center_level: adjustable(
                template.center_level,
                overrides.center_level,
                defaults.center_level,
            ),
            ms_decode_enabled: overrides.ms_decode_enabled.unwrap_or(false),
            ms_width: overrides.ms_width.unwrap_or(DEFAULT_MS_WIDTH),
            channels: template_channels(template),
        };

        if let (Some(pattern), None) = (overrides.pattern, template.fixed_pattern) {
            for ch in &mut config.channels {
                ch.pattern = pattern;
            }
        }

        config.normalized()
    }

    /// Lenient lookup by string id: unknown ids fall back to the default
    /// technique with a warning.
    pub fn from_technique_id(id: &str, overrides: &ConfigOverrides) -> Self {
        Self::create(TechniqueId::resolve(id), overrides)
    }

    /// Strict lookup by string id.
    pub fn try_from_technique_id(id: &str, overrides: &ConfigOverrides) -> Result<Self> {
        Ok(Self::create(id.parse()?, overrides))
    }

    pub fn template(&self) -> &'static TechniqueTemplate {
        self.technique.template()
    }

    pub fn routing(&self) -> RoutingMode {
        self.template().routing
    }

    pub fn has_center(&self) -> bool {
        self.template().has_center
    }

    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.iter().find(|ch| ch.id == id)
    }

    pub fn enabled_channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter().filter(|ch| ch.enabled)
    }

    /// Recompute channel geometry from spacing, angle and center depth.
    ///
    /// Pure and idempotent.
    pub fn apply_layout(mut self) -> Self {
        let half_spacing = self.spacing * 0.5;
        let half_angle = self.angle * 0.5;

        for ch in &mut self.channels {
            match ch.id {
                ChannelId::Left | ChannelId::Right => {
                    let side = ch.id.side();
                    ch.offset_x = side * half_spacing;
                    ch.offset_y = 0.0;
                    ch.angle = side * half_angle;
                }
                ChannelId::Center => {
                    ch.offset_x = 0.0;
                    ch.offset_y = self.center_depth;
                    ch.angle = 0.0;
                    ch.level_db = self.center_level;
                }
            }
        }
        self
    }

    /// Clamp every field into its technique's range and re-apply the fixed
    /// pattern. Corrupt input degrades to technique defaults.
    pub fn validate(mut self) -> Self {
        let template = self.template();
        let defaults = template.defaults;

        let matches_template = self.channels.len() == template.channels.len()
            && self
                .channels
                .iter()
                .zip(template.channels)
                .all(|(ch, t)| ch.id == t.id);
        if !matches_template {
            tracing::warn!(
                technique = %self.technique,
                channels = self.channels.len(),
                "Channel list does not match technique, rebuilding from template"
            );
            self.channels = template_channels(template);
        }

        let clamp_param = |range: Option<ParamRange>, value: f32, default: f32| match range {
            Some(r) => r.clamp(value, default),
            None => default,
        };

        self.spacing = clamp_param(template.spacing, self.spacing, defaults.spacing);
        self.angle = clamp_param(template.angle, self.angle, defaults.angle);
        self.center_depth =
            clamp_param(template.center_depth, self.center_depth, defaults.center_depth);
        self.center_level =
            clamp_param(template.center_level, self.center_level, defaults.center_level);

        if !self.mic_y.is_finite() {
            tracing::warn!(mic_y = self.mic_y, "Non-finite mic distance, using default");
        }
        self.mic_y = MIC_Y_RANGE.clamp(self.mic_y, DEFAULT_MIC_Y);
        self.ms_width = MS_WIDTH_RANGE.clamp(self.ms_width, DEFAULT_MS_WIDTH);

        for ch in &mut self.channels {
            ch.level_db = CHANNEL_LEVEL_RANGE.clamp(ch.level_db, 0.0);
            ch.angle = finite_or(ch.angle, 0.0);
            ch.offset_x = finite_or(ch.offset_x, 0.0);
            ch.offset_y = finite_or(ch.offset_y, 0.0);
            if let Some(pattern) = template.fixed_pattern {
                ch.pattern = pattern;
            }
        }

        self
    }

    /// [`validate`](Self::validate) followed by [`apply_layout`](Self::apply_layout).
    ///
    /// Use this on any configuration that was edited field by field or
    /// deserialized before handing it to a solver.
    pub fn normalized(self) -> Self {
        self.validate().apply_layout()
    }

    /// Switch technique, keeping mic distance and M/S settings.
    pub fn with_technique(self, technique: TechniqueId) -> Self {
        let overrides = ConfigOverrides {
            mic_y: Some(self.mic_y),
            ms_decode_enabled: Some(self.ms_decode_enabled),
            ms_width: Some(self.ms_width),
            ..ConfigOverrides::default()
        };
        Self::create(technique, &overrides)
    }

    pub fn with_spacing(mut self, meters: f32) -> Self {
        self.spacing = meters;
        self.normalized()
    }

    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.angle = degrees;
        self.normalized()
    }

    pub fn with_center_depth(mut self, meters: f32) -> Self {
        self.center_depth = meters;
        self.normalized()
    }

    pub fn with_center_level(mut self, db: f32) -> Self {
        self.center_level = db;
        self.normalized()
    }

    pub fn with_mic_y(mut self, meters: f32) -> Self {
        self.mic_y = meters;
        self.normalized()
    }

    pub fn with_ms_decode(mut self, enabled: bool, width: f32) -> Self {
        self.ms_decode_enabled = enabled;
        self.ms_width = width;
        self.normalized()
    }

    /// Set every channel's pattern. No-op for fixed-pattern techniques.
    pub fn with_pattern(mut self, pattern: PolarPattern) -> Self {
        for ch in &mut self.channels {
            ch.pattern = pattern;
        }
        self.normalized()
    }

    /// Trim one channel. The center level is owned by `center_level`.
    pub fn with_channel_level(mut self, id: ChannelId, db: f32) -> Self {
        if id == ChannelId::Center {
            self.center_level = db;
        } else if let Some(ch) = self.channels.iter_mut().find(|ch| ch.id == id) {
            ch.level_db = db;
        }
        self.normalized()
    }

    pub fn with_channel_enabled(mut self, id: ChannelId, enabled: bool) -> Self {
        if let Some(ch) = self.channels.iter_mut().find(|ch| ch.id == id) {
            ch.enabled = enabled;
        }
        self.normalized()
    }
}

fn template_channels(template: &TechniqueTemplate) -> Vec<Channel> {
    template
        .channels
        .iter()
        .map(|t| Channel {
            id: t.id,
            label: t.label.to_string(),
            pattern: template.fixed_pattern.unwrap_or(t.pattern),
            angle: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            level_db: 0.0,
            enabled: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_spaced_pair_layout() {
        let config = MicrophoneConfiguration::create(
            TechniqueId::SpacedPair,
            &ConfigOverrides::default().spacing(2.0).mic_y(-1.0),
        );
        let left = config.channel(ChannelId::Left).unwrap();
        let right = config.channel(ChannelId::Right).unwrap();
        assert_abs_diff_eq!(left.offset_x, -1.0);
        assert_abs_diff_eq!(right.offset_x, 1.0);
        assert_eq!(left.angle, 0.0);
        assert_eq!(config.mic_y, -1.0);
    }

    #[test]
    fn test_xy_angle_split() {
        let config = MicrophoneConfiguration::create(
            TechniqueId::XyCoincident,
            &ConfigOverrides::default().angle(120.0),
        );
        assert_eq!(config.channel(ChannelId::Left).unwrap().angle, -60.0);
        assert_eq!(config.channel(ChannelId::Right).unwrap().angle, 60.0);
        assert_eq!(config.channel(ChannelId::Left).unwrap().offset_x, 0.0);
    }

    #[test]
    fn test_non_adjustable_override_ignored() {
        let config = MicrophoneConfiguration::create(
            TechniqueId::XyCoincident,
            &ConfigOverrides::default().spacing(3.0),
        );
        assert_eq!(config.spacing, 0.0);

        let config = MicrophoneConfiguration::create(
            TechniqueId::SpacedPair,
            &ConfigOverrides::default().center_depth(2.0).angle(45.0),
        );
        assert_eq!(config.center_depth, 0.0);
        assert_eq!(config.angle, 0.0);
    }

    #[test]
    fn test_out_of_range_clamped() {
        let config = MicrophoneConfiguration::create(
            TechniqueId::Ortf,
            &ConfigOverrides::default()
                .spacing(5.0)
                .angle(10.0)
                .mic_y(-100.0)
                .ms_decode(true, 9.0),
        );
        assert_eq!(config.spacing, 0.25);
        assert_eq!(config.angle, 90.0);
        assert_eq!(config.mic_y, MIC_Y_RANGE.min);
        assert_eq!(config.ms_width, 2.0);
    }

    #[test]
    fn test_fixed_pattern_enforced() {
        let config = MicrophoneConfiguration::create(
            TechniqueId::Blumlein,
            &ConfigOverrides::default().pattern(PolarPattern::Omni),
        );
        assert!(config
            .channels
            .iter()
            .all(|ch| ch.pattern == PolarPattern::Figure8));

        let mut tampered = config.clone();
        tampered.channels[0].pattern = PolarPattern::Cardioid;
        let fixed = tampered.validate();
        assert_eq!(fixed.channels[0].pattern, PolarPattern::Figure8);
    }

    #[test]
    fn test_pattern_override_when_free() {
        let config = MicrophoneConfiguration::create(
            TechniqueId::SpacedPair,
            &ConfigOverrides::default().pattern(PolarPattern::Subcardioid),
        );
        assert!(config
            .channels
            .iter()
            .all(|ch| ch.pattern == PolarPattern::Subcardioid));
    }

    #[test]
    fn test_decca_center_layout() {
        let config = MicrophoneConfiguration::create(
            TechniqueId::DeccaTree,
            &ConfigOverrides::default()
                .center_depth(1.2)
                .center_level(-3.0),
        );
        let center = config.channel(ChannelId::Center).unwrap();
        assert_eq!(center.offset_y, 1.2);
        assert_eq!(center.offset_x, 0.0);
        assert_eq!(center.level_db, -3.0);
        assert!(config.has_center());
        assert_eq!(config.routing(), RoutingMode::Decca);
    }

    #[test]
    fn test_unknown_technique_falls_back() {
        let config =
            MicrophoneConfiguration::from_technique_id("tetrahedral", &ConfigOverrides::default());
        assert_eq!(config.technique, TechniqueId::SpacedPair);
        assert!(MicrophoneConfiguration::try_from_technique_id(
            "tetrahedral",
            &ConfigOverrides::default()
        )
        .is_err());
    }

    #[test]
    fn test_corrupt_channels_rebuilt() {
        let mut config = MicrophoneConfiguration::create(
            TechniqueId::DeccaTree,
            &ConfigOverrides::default(),
        );
        config.channels.truncate(1);
        config.spacing = f32::NAN;
        let config = config.normalized();
        assert_eq!(config.channels.len(), 3);
        assert_eq!(config.spacing, 2.0);
        assert_eq!(config.channel(ChannelId::Left).unwrap().offset_x, -1.0);
        assert_eq!(config.channel(ChannelId::Right).unwrap().offset_x, 1.0);
        assert_eq!(config.channel(ChannelId::Center).unwrap().offset_y, 1.5);
    }

    #[test]
    fn test_normalized_relays_edited_fields() {
        let mut config = MicrophoneConfiguration::default();
        config.spacing = 4.0;
        let config = config.normalized();
        assert_eq!(config.channel(ChannelId::Left).unwrap().offset_x, -2.0);
        assert_eq!(config.channel(ChannelId::Right).unwrap().offset_x, 2.0);
    }

    #[test]
    fn test_with_setters_keep_layout_consistent() {
        let config = MicrophoneConfiguration::default().with_spacing(3.0);
        assert_eq!(config.channel(ChannelId::Right).unwrap().offset_x, 1.5);

        let config = config.with_channel_enabled(ChannelId::Left, false);
        assert_eq!(config.enabled_channels().count(), 1);

        let config = config.with_technique(TechniqueId::DeccaTree);
        assert_eq!(config.channels.len(), 3);
        assert!(config.channels.iter().all(|ch| ch.enabled));
    }

    #[test]
    fn test_center_level_via_channel_level() {
        let config = MicrophoneConfiguration::create(TechniqueId::DeccaTree, &Default::default())
            .with_channel_level(ChannelId::Center, -6.0);
        assert_eq!(config.center_level, -6.0);
        assert_eq!(config.channel(ChannelId::Center).unwrap().level_db, -6.0);
    }

    proptest! {
        #[test]
        fn prop_apply_layout_idempotent(
            idx in 0usize..6,
            spacing in -10.0f32..10.0,
            angle in -200.0f32..200.0,
            depth in -5.0f32..5.0,
        ) {
            let technique = TechniqueId::ALL[idx];
            let config = MicrophoneConfiguration::create(
                technique,
                &ConfigOverrides::default().spacing(spacing).angle(angle).center_depth(depth),
            );
            let once = config.clone().apply_layout();
            let twice = once.clone().apply_layout();
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(&once, &config);
        }

        #[test]
        fn prop_validate_keeps_ranges(
            idx in 0usize..6,
            spacing in -10.0f32..10.0,
            mic_y in -50.0f32..50.0,
            width in -5.0f32..5.0,
        ) {
            let technique = TechniqueId::ALL[idx];
            let config = MicrophoneConfiguration::create(
                technique,
                &ConfigOverrides::default().spacing(spacing).mic_y(mic_y).ms_decode(true, width),
            );
            let template = technique.template();
            if let Some(r) = template.spacing {
                prop_assert!(r.contains(config.spacing));
            } else {
                prop_assert_eq!(config.spacing, template.defaults.spacing);
            }
            prop_assert!(MIC_Y_RANGE.contains(config.mic_y));
            prop_assert!(MS_WIDTH_RANGE.contains(config.ms_width));
        }
    }
}

//! Floor reflection path.

use super::PropagationOptions;
use core::str::FromStr;
use podium_core::{Error, Vec2};

/// Two-band description of how a floor reflects sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceModel {
    /// Broadband reflection coefficient
    pub reflection_coefficient: f32,
    /// Gain below the crossover
    pub low_gain: f32,
    /// Gain above the crossover
    pub high_gain: f32,
    pub crossover_hz: f32,
}

/// Selectable stage floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroundSurface {
    #[default]
    WoodenStage,
    Concrete,
    Carpet,
    Grass,
}

impl GroundSurface {
    pub const ALL: [GroundSurface; 4] = [
        GroundSurface::WoodenStage,
        GroundSurface::Concrete,
        GroundSurface::Carpet,
        GroundSurface::Grass,
    ];

    pub fn id(self) -> &'static str {
        match self {
            GroundSurface::WoodenStage => "wooden-stage",
            GroundSurface::Concrete => "concrete",
            GroundSurface::Carpet => "carpet",
            GroundSurface::Grass => "grass",
        }
    }

    pub fn model(self) -> SurfaceModel {
        match self {
            GroundSurface::WoodenStage => SurfaceModel {
                reflection_coefficient: 0.7,
                low_gain: 0.9,
                high_gain: 0.6,
                crossover_hz: 1000.0,
            },
            GroundSurface::Concrete => SurfaceModel {
                reflection_coefficient: 0.9,
                low_gain: 1.0,
                high_gain: 0.9,
                crossover_hz: 2000.0,
            },
            GroundSurface::Carpet => SurfaceModel {
                reflection_coefficient: 0.35,
                low_gain: 0.8,
                high_gain: 0.25,
                crossover_hz: 500.0,
            },
            GroundSurface::Grass => SurfaceModel {
                reflection_coefficient: 0.5,
                low_gain: 0.85,
                high_gain: 0.3,
                crossover_hz: 700.0,
            },
        }
    }
}

impl FromStr for GroundSurface {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wooden-stage" | "wood" | "stage" => Ok(GroundSurface::WoodenStage),
            "concrete" => Ok(GroundSurface::Concrete),
            "carpet" => Ok(GroundSurface::Carpet),
            "grass" => Ok(GroundSurface::Grass),
            _ => Err(Error::UnknownSurface(s.to_string())),
        }
    }
}

/// Secondary path bouncing off the floor between source and mic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundReflection {
    /// Meters travelled by the reflected path
    pub distance: f32,
    /// Seconds after the direct sound, never negative
    pub extra_delay: f32,
    /// Broadband amplitude of the reflection
    pub gain: f32,
    pub low_gain: f32,
    pub high_gain: f32,
    pub crossover_hz: f32,
}

/// Image-source floor reflection for one source/mic pair.
pub fn ground_reflection(
    source: Vec2,
    mic: Vec2,
    opts: &PropagationOptions,
    surface: GroundSurface,
) -> GroundReflection {
    let model = surface.model();
    let horizontal = {
        let d = source.distance(mic);
        if d.is_finite() {
            d
        } else {
            0.0
        }
    };

    let height_sum = opts.source_height + opts.mic_height;
    let height_diff = opts.mic_height - opts.source_height;

    let reflected = (horizontal * horizontal + height_sum * height_sum)
        .sqrt()
        .max(opts.min_distance);
    let direct = (horizontal * horizontal + height_diff * height_diff)
        .sqrt()
        .max(opts.min_distance);

    let extra_delay = (opts.travel_time(reflected) - opts.travel_time(direct)).max(0.0);
    let gain = (opts.ref_distance / reflected).min(1.0) * model.reflection_coefficient;

    GroundReflection {
        distance: reflected,
        extra_delay,
        gain,
        low_gain: model.low_gain,
        high_gain: model.high_gain,
        crossover_hz: model.crossover_hz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reflection_geometry() {
        let opts = PropagationOptions::builder()
            .source_height(1.0)
            .mic_height(3.0)
            .build();
        let r = ground_reflection(
            Vec2::new(0.0, 3.0),
            Vec2::ZERO,
            &opts,
            GroundSurface::Concrete,
        );
        assert_abs_diff_eq!(r.distance, 5.0, epsilon = 1e-5);
        let direct = (9.0f32 + 4.0).sqrt();
        assert_abs_diff_eq!(r.extra_delay, (5.0 - direct) / 343.0, epsilon = 1e-6);
        assert_abs_diff_eq!(r.gain, 0.2 * 0.9, epsilon = 1e-6);
        assert_eq!(r.crossover_hz, 2000.0);
    }

    #[test]
    fn test_reflection_never_precedes_direct() {
        let opts = PropagationOptions::builder()
            .source_height(0.0)
            .mic_height(0.0)
            .build();
        let r = ground_reflection(Vec2::ZERO, Vec2::ZERO, &opts, GroundSurface::Grass);
        assert_eq!(r.extra_delay, 0.0);
        assert!(r.gain.is_finite());
    }

    #[test]
    fn test_softer_surfaces_reflect_less() {
        let opts = PropagationOptions::default();
        let src = Vec2::new(2.0, 6.0);
        let concrete = ground_reflection(src, Vec2::ZERO, &opts, GroundSurface::Concrete);
        let carpet = ground_reflection(src, Vec2::ZERO, &opts, GroundSurface::Carpet);
        assert!(carpet.gain < concrete.gain);
        assert!(carpet.high_gain < carpet.low_gain);
    }

    #[test]
    fn test_surface_ids_parse() {
        for s in GroundSurface::ALL {
            assert_eq!(s.id().parse::<GroundSurface>(), Ok(s));
        }
        assert!("lava".parse::<GroundSurface>().is_err());
    }
}

//! High-frequency air absorption as a fixed bank of bands.

/// Number of absorption bands.
pub const AIR_BAND_COUNT: usize = 4;

/// Band centers (Hz) and attenuation (dB per meter), ~20 °C / 50 % RH.
const AIR_BANDS: [(f32, f32); AIR_BAND_COUNT] = [
    (1000.0, 0.005),
    (2000.0, 0.01),
    (4000.0, 0.03),
    (8000.0, 0.1),
];

/// Lowest gain any band is allowed to reach.
const MIN_BAND_DB: f32 = -60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirBand {
    pub frequency: f32,
    pub gain_db: f32,
}

/// Per-band attenuation for one propagation distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirAbsorption {
    pub bands: [AirBand; AIR_BAND_COUNT],
}

impl AirAbsorption {
    /// Flat response.
    pub fn none() -> Self {
        Self::for_distance(0.0)
    }

    pub fn for_distance(meters: f32) -> Self {
        let meters = if meters.is_finite() { meters.max(0.0) } else { 0.0 };
        let mut bands = [AirBand {
            frequency: 0.0,
            gain_db: 0.0,
        }; AIR_BAND_COUNT];
        for (band, (frequency, db_per_meter)) in bands.iter_mut().zip(AIR_BANDS) {
            band.frequency = frequency;
            band.gain_db = (-db_per_meter * meters).max(MIN_BAND_DB);
        }
        Self { bands }
    }

    pub fn is_flat(&self) -> bool {
        self.bands.iter().all(|b| b.gain_db == 0.0)
    }
}

impl Default for AirAbsorption {
    fn default() -> Self {
        Self::none()
    }
}

//! Inter-channel time difference normalization.

use super::PropagationOptions;

/// Channel delays after ITD normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItdDelays {
    /// Seconds, same order as the input
    pub delays: Vec<f32>,
    /// Shared depth delay added to every channel (seconds)
    pub base_delay: f32,
}

/// Remove the common arrival time from a set of channel delays.
///
/// The earliest channel gets zero relative delay; every channel then gets the
/// shared base delay `max(0, mean - ref_distance / c)` so sources further
/// upstage still arrive later overall.
pub fn normalize_itd(delays: &[f32], opts: &PropagationOptions) -> ItdDelays {
    let finite: Vec<f32> = delays
        .iter()
        .map(|d| if d.is_finite() { d.max(0.0) } else { 0.0 })
        .collect();
    if finite.is_empty() {
        return ItdDelays::default();
    }

    let earliest = finite.iter().copied().fold(f32::INFINITY, f32::min);
    let mean = finite.iter().sum::<f32>() / finite.len() as f32;
    let base_delay = (mean - opts.travel_time(opts.ref_distance)).max(0.0);

    ItdDelays {
        delays: finite
            .iter()
            .map(|d| ((d - earliest) + base_delay).max(0.0))
            .collect(),
        base_delay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_equal_delays_collapse_to_base() {
        let opts = PropagationOptions::default();
        let d = 10.0 / 343.0;
        let out = normalize_itd(&[d, d], &opts);
        assert_eq!(out.delays[0], out.delays[1]);
        assert_eq!(out.delays[0], out.base_delay);
        assert_abs_diff_eq!(out.base_delay, d - 1.0 / 343.0, epsilon = 1e-7);
    }

    #[test]
    fn test_earliest_channel_gets_base_only() {
        let opts = PropagationOptions::default();
        let out = normalize_itd(&[0.030, 0.032, 0.031], &opts);
        assert_abs_diff_eq!(out.delays[0], out.base_delay, epsilon = 1e-7);
        assert_abs_diff_eq!(out.delays[1] - out.delays[0], 0.002, epsilon = 1e-6);
        assert_abs_diff_eq!(out.delays[2] - out.delays[0], 0.001, epsilon = 1e-6);
    }

    #[test]
    fn test_base_floored_at_zero() {
        let opts = PropagationOptions::default();
        let out = normalize_itd(&[0.0005, 0.0006], &opts);
        assert_eq!(out.base_delay, 0.0);
        assert_eq!(out.delays[0], 0.0);
    }

    #[test]
    fn test_empty_and_non_finite() {
        let opts = PropagationOptions::default();
        assert!(normalize_itd(&[], &opts).delays.is_empty());
        let out = normalize_itd(&[f32::NAN, 0.01], &opts);
        assert!(out.delays.iter().all(|d| d.is_finite() && *d >= 0.0));
    }
}

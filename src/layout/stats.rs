//! Order statistics over spacing samples.

use std::cmp::Ordering;

/// Value at fraction `p` (0.0..=1.0) of the sorted sample, with linear
/// interpolation between neighbouring ranks.
///
/// Non-finite samples are ignored. Returns `None` when nothing is left.
pub fn percentile(samples: &[f32], p: f32) -> Option<f32> {
    let mut sorted: Vec<f32> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f32;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f32;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Median of the finite samples.
pub fn median(samples: &[f32]) -> Option<f32> {
    percentile(samples, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[7.0]), Some(7.0));
    }

    #[test]
    fn test_median_ignores_non_finite() {
        assert_eq!(median(&[f32::NAN, 5.0, f32::INFINITY]), Some(5.0));
        assert_eq!(median(&[f32::NAN]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_percentile_bounds() {
        let samples = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&samples, 0.0), Some(10.0));
        assert_eq!(percentile(&samples, 1.0), Some(50.0));
        assert_eq!(percentile(&samples, 0.25), Some(20.0));
        assert_eq!(percentile(&samples, 2.0), Some(50.0));
    }
}

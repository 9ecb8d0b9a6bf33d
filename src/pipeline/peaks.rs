//! Local-maximum peak detection with relative-height and minimum-distance
//! filtering.

/// Peaks of one curve, index-ascending, `indices[k]` matching `values[k]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Peaks {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl Peaks {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }
}

/// Find peaks in `curve`.
///
/// 1. Candidates are strict local maxima against their two neighbours; the
///    endpoints are never candidates.
/// 2. With `min_rel_height > 0`, candidates strictly below
///    `min + min_rel_height * (max - min)` (taken over the whole curve) are
///    dropped. A flat curve, or one containing `NaN`, skips this step.
/// 3. With `min_distance > 1`, candidates are visited tallest first (stable
///    on ties) and kept only if no already-kept peak lies within
///    `min_distance` samples.
///
/// The result is always sorted by index.
pub fn find_peaks(curve: &[f64], min_distance: usize, min_rel_height: f64) -> Peaks {
    let n = curve.len();
    if n < 3 {
        return Peaks::default();
    }

    let mut candidates: Vec<usize> = (1..n - 1)
        .filter(|&i| curve[i] > curve[i - 1] && curve[i] > curve[i + 1])
        .collect();
    if candidates.is_empty() {
        return Peaks::default();
    }

    if min_rel_height > 0.0 {
        if let Some(threshold) = height_threshold(curve, min_rel_height) {
            candidates.retain(|&i| curve[i] >= threshold);
        }
    }

    if min_distance > 1 && candidates.len() > 1 {
        candidates = suppress_close_peaks(curve, candidates, min_distance);
    }

    let values = candidates.iter().map(|&i| curve[i]).collect();
    Peaks {
        indices: candidates,
        values,
    }
}

/// Absolute height a candidate must reach, or `None` when the curve's
/// range is zero or undefined.
fn height_threshold(curve: &[f64], min_rel_height: f64) -> Option<f64> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in curve {
        if v.is_nan() {
            return None;
        }
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let amplitude = hi - lo;
    if amplitude > 0.0 {
        Some(lo + min_rel_height * amplitude)
    } else {
        None
    }
}

/// Greedy non-maximum suppression over index windows of radius
/// `min_distance`. Returns the kept indices in ascending order.
fn suppress_close_peaks(curve: &[f64], candidates: Vec<usize>, min_distance: usize) -> Vec<usize> {
    let n = curve.len();
    let mut order = candidates;
    // stable: equal heights keep ascending-index order
    order.sort_by(|&a, &b| curve[b].total_cmp(&curve[a]));

    let mut occupied = vec![false; n];
    let mut kept = Vec::with_capacity(order.len());
    for i in order {
        let lo = i.saturating_sub(min_distance);
        let hi = i.saturating_add(min_distance).min(n - 1);
        let window = &mut occupied[lo..=hi];
        if window.iter().any(|&taken| taken) {
            continue;
        }
        window.fill(true);
        kept.push(i);
    }

    kept.sort_unstable();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_hill() {
        let p = find_peaks(&[1.0, 2.0, 3.0, 2.0, 1.0], 1, 0.0);
        assert_eq!(p.indices, vec![2]);
        assert_eq!(p.values, vec![3.0]);
    }

    #[test]
    fn relative_height_filter() {
        let x = [0.0, 1.0, 0.0, 0.5, 0.0, 3.0, 0.0];
        let p = find_peaks(&x, 1, 0.4);
        assert_eq!(p.indices, vec![5]);
        assert_eq!(p.values, vec![3.0]);
    }

    #[test]
    fn threshold_is_inclusive() {
        // range 4, threshold 0 + 0.5 * 4 = 2
        let x = [0.0, 2.0, 0.0, 4.0, 0.0];
        let p = find_peaks(&x, 1, 0.5);
        assert_eq!(p.indices, vec![1, 3]);
    }

    #[test]
    fn endpoints_are_never_peaks() {
        let p = find_peaks(&[5.0, 1.0, 0.0, 1.0, 5.0], 1, 0.0);
        assert!(p.is_empty());
    }

    #[test]
    fn plateaus_are_not_peaks() {
        let p = find_peaks(&[0.0, 2.0, 2.0, 0.0], 1, 0.0);
        assert!(p.is_empty());
    }

    #[test]
    fn short_curves_have_no_peaks() {
        assert!(find_peaks(&[], 1, 0.0).is_empty());
        assert!(find_peaks(&[1.0], 1, 0.0).is_empty());
        assert!(find_peaks(&[1.0, 2.0], 1, 0.0).is_empty());
    }

    #[test]
    fn distance_one_keeps_everything() {
        let x = [0.0, 1.0, 0.0, 2.0, 0.0, 1.5, 0.0];
        assert_eq!(find_peaks(&x, 1, 0.0).indices, vec![1, 3, 5]);
        assert_eq!(find_peaks(&x, 0, 0.0).indices, vec![1, 3, 5]);
    }

    #[test]
    fn distance_suppresses_shorter_neighbours() {
        let x = [0.0, 1.0, 0.0, 2.0, 0.0, 1.5, 0.0, 0.0, 0.0, 1.0, 0.0];
        let p = find_peaks(&x, 2, 0.0);
        // 3 is tallest and blocks 1..=5; 9 is far enough away
        assert_eq!(p.indices, vec![3, 9]);
        assert_eq!(p.values, vec![2.0, 1.0]);
    }

    #[test]
    fn equal_heights_favour_lower_index() {
        let x = [0.0, 1.0, 0.0, 1.0, 0.0];
        let p = find_peaks(&x, 2, 0.0);
        assert_eq!(p.indices, vec![1]);
    }

    #[test]
    fn suppression_window_is_clipped_at_bounds() {
        let x = [0.0, 3.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0];
        let p = find_peaks(&x, 10, 0.0);
        assert_eq!(p.indices, vec![1]);
    }

    #[test]
    fn huge_distance_keeps_only_tallest() {
        let p = find_peaks(&[0.0, 1.0, 0.0, 2.0, 0.0], usize::MAX, 0.0);
        assert_eq!(p.indices, vec![3]);
        assert_eq!(p.values, vec![2.0]);
    }

    #[test]
    fn flat_curve_skips_height_filter() {
        let p = find_peaks(&[1.0; 6], 1, 0.9);
        assert!(p.is_empty());
    }

    #[test]
    fn nan_disables_height_filter() {
        let x = [f64::NAN, 0.0, 1.0, 0.0, 5.0, 0.0];
        let p = find_peaks(&x, 1, 0.9);
        assert_eq!(p.indices, vec![2, 4]);
    }

    #[test]
    fn output_is_index_ascending() {
        let x = [0.0, 1.0, 0.0, 5.0, 0.0, 3.0, 0.0, 4.0, 0.0, 2.0, 0.0];
        let p = find_peaks(&x, 2, 0.0);
        assert!(p.indices.windows(2).all(|w| w[0] < w[1]));
        for (i, v) in p.iter() {
            assert_eq!(x[i], v);
        }
    }
}

//! Moving-average smoothing with reflected boundaries.
//!
//! Centered mode pads `window / 2` samples on each side and averages the
//! `window` samples around each position.
//!
//! Trailing mode pads `window - 1` reflected samples on the left only, so
//! output sample `i` is the mean of `x[i - window + 1 ..= i]` with mirrored
//! values standing in before the start. Both modes return a curve of the
//! input's length.

use crate::data::model::CurveBatch;
use crate::error::{PreprocessError, Result};

/// Smooth one curve.
///
/// `window <= 1` returns a copy of the input. An even window with
/// `center == true` is rejected.
pub fn smooth(curve: &[f64], window: usize, center: bool) -> Result<Vec<f64>> {
    check_window(window, center)?;
    if window <= 1 || curve.is_empty() {
        return Ok(curve.to_vec());
    }

    let (pad_left, pad_right) = if center {
        (window / 2, window / 2)
    } else {
        (window - 1, 0)
    };
    let padded = reflect_pad(curve, pad_left, pad_right);
    Ok(moving_average_valid(&padded, window))
}

/// Smooth every curve of a batch. The window is checked once, before any
/// column is touched.
pub fn smooth_batch(batch: &CurveBatch, window: usize, center: bool) -> Result<CurveBatch> {
    check_window(window, center)?;
    log::debug!(
        "smoothing {} curve(s): window={window} center={center}",
        batch.curve_count()
    );
    batch.map_curves(|values| smooth(values, window, center))
}

fn check_window(window: usize, center: bool) -> Result<()> {
    if window > 1 && center && window % 2 == 0 {
        return Err(PreprocessError::invalid_configuration(format!(
            "centered smoothing requires an odd window, got {window}"
        )));
    }
    Ok(())
}

/// Map a position on the extended axis back onto `0..n` by mirroring at
/// both ends (the end samples are not repeated).
fn reflect_index(pos: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as isize - 1);
    let p = pos.rem_euclid(period);
    if p < n as isize {
        p as usize
    } else {
        (period - p) as usize
    }
}

/// Extend `src` by reflection. `src` must not be empty.
fn reflect_pad(src: &[f64], pad_left: usize, pad_right: usize) -> Vec<f64> {
    let n = src.len();
    let start = -(pad_left as isize);
    let end = (n + pad_right) as isize;
    (start..end).map(|pos| src[reflect_index(pos, n)]).collect()
}

/// Uniform-kernel convolution keeping only fully-overlapping positions.
/// Output length is `padded.len() - window + 1`.
fn moving_average_valid(padded: &[f64], window: usize) -> Vec<f64> {
    let weight = 1.0 / window as f64;
    padded
        .windows(window)
        .map(|w| w.iter().map(|v| v * weight).sum())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len(), "{a:?} vs {b:?}");
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn reflection_skips_edge_sample() {
        let src = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(reflect_pad(&src, 2, 2), vec![3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0]);
    }

    #[test]
    fn reflection_bounces_past_short_curve() {
        let src = [1.0, 2.0];
        assert_eq!(reflect_pad(&src, 3, 3), vec![2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0]);
        assert_eq!(reflect_pad(&[5.0], 2, 2), vec![5.0; 5]);
    }

    #[test]
    fn centered_window_three() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = smooth(&x, 3, true).unwrap();
        assert_eq!(y.len(), x.len());
        assert!((y[2] - 3.0).abs() < 1e-9);
        // edges: (2+1+2)/3 and (4+5+4)/3
        assert!((y[0] - 5.0 / 3.0).abs() < 1e-9);
        assert!((y[4] - 13.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn window_one_is_identity() {
        let x = [1.0, -2.0, 3.5, 0.0];
        assert_eq!(smooth(&x, 1, true).unwrap(), x.to_vec());
        assert_eq!(smooth(&x, 1, false).unwrap(), x.to_vec());
    }

    #[test]
    fn even_centered_window_fails() {
        let err = smooth(&[1.0, 2.0, 3.0], 4, true).unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidConfiguration(_)));
        // the check does not depend on the data
        assert!(smooth(&[], 2, true).is_err());
    }

    #[test]
    fn trailing_average_keeps_length() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = smooth(&x, 3, false).unwrap();
        // left pad: [3, 2 | 1, 2, 3, 4, 5]
        assert_close(&y, &[2.0, 5.0 / 3.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn trailing_even_window_is_allowed() {
        let y = smooth(&[2.0, 4.0, 6.0], 2, false).unwrap();
        // left pad: [4 | 2, 4, 6]
        assert_close(&y, &[3.0, 3.0, 5.0]);
    }

    #[test]
    fn constant_curve_stays_constant() {
        let x = vec![2.5; 9];
        assert_close(&smooth(&x, 5, true).unwrap(), &x);
        assert_close(&smooth(&x, 4, false).unwrap(), &x);
    }

    #[test]
    fn short_curves_do_not_panic() {
        assert!(smooth(&[], 5, true).unwrap().is_empty());
        assert_close(&smooth(&[7.0], 5, true).unwrap(), &[7.0]);
        assert_eq!(smooth(&[1.0, 3.0], 7, true).unwrap().len(), 2);
    }

    #[test]
    fn batch_rejects_even_window_even_if_empty() {
        let batch = CurveBatch::from_columns(Vec::<(String, Vec<f64>)>::new()).unwrap();
        assert!(smooth_batch(&batch, 6, true).is_err());
    }

    #[test]
    fn batch_preserves_columns() {
        let batch = CurveBatch::from_columns(vec![
            ("curve1", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("curve2", vec![5.0, 4.0, 3.0, 2.0, 1.0]),
        ])
        .unwrap();
        let out = smooth_batch(&batch, 3, true).unwrap();
        assert_eq!(out.curve_names(), vec!["curve1", "curve2"]);
        assert_eq!(out.len(), 5);
        assert!((out.curve("curve2").unwrap().values[2] - 3.0).abs() < 1e-9);
    }
}

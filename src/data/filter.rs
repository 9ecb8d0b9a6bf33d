use std::collections::BTreeSet;

use anyhow::{Result, bail};

use super::model::CurveBatch;

// ---------------------------------------------------------------------------
// Column selection: which curves reach the pipeline
// ---------------------------------------------------------------------------

/// Remove the named columns. Names that are not present are ignored.
pub fn drop_columns(batch: &CurveBatch, names: &[&str]) -> CurveBatch {
    if names.is_empty() {
        return batch.clone();
    }
    let dropped: BTreeSet<&str> = names.iter().copied().collect();
    batch.retain_curves(|c| !dropped.contains(c.name.as_str()))
}

/// Keep only the named curves, in the batch's own column order.
///
/// Every requested name must exist in the batch.
pub fn select_curves(batch: &CurveBatch, names: &[&str]) -> Result<CurveBatch> {
    let wanted: BTreeSet<&str> = names.iter().copied().collect();
    let missing: Vec<&str> = wanted
        .iter()
        .copied()
        .filter(|n| batch.curve(n).is_none())
        .collect();
    if !missing.is_empty() {
        bail!("Unknown curve(s): {}", missing.join(", "));
    }
    Ok(batch.retain_curves(|c| wanted.contains(c.name.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> CurveBatch {
        CurveBatch::from_columns(vec![
            ("time", vec![0.0, 1.0]),
            ("a", vec![1.0, 2.0]),
            ("b", vec![3.0, 4.0]),
        ])
        .unwrap()
    }

    #[test]
    fn drop_removes_present_column() {
        let out = drop_columns(&batch(), &["time"]);
        assert_eq!(out.curve_names(), vec!["a", "b"]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn drop_ignores_absent_column() {
        let out = drop_columns(&batch(), &["nope"]);
        assert_eq!(out.curve_names(), vec!["time", "a", "b"]);
    }

    #[test]
    fn select_keeps_batch_order() {
        let out = select_curves(&batch(), &["b", "a"]).unwrap();
        assert_eq!(out.curve_names(), vec!["a", "b"]);
    }

    #[test]
    fn select_rejects_unknown() {
        assert!(select_curves(&batch(), &["a", "zzz"]).is_err());
    }
}

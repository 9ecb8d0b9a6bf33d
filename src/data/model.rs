use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::{PreprocessError, Result};

// ---------------------------------------------------------------------------
// IndexLabel – one row label of the shared time axis
// ---------------------------------------------------------------------------

/// A row label as it appeared in the source table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndexLabel {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

impl IndexLabel {
    /// Guess the label type from a raw cell: integer, then float, then text.
    pub fn guess(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return IndexLabel::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return IndexLabel::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return IndexLabel::Float(f);
        }
        IndexLabel::Text(s.to_string())
    }
}

impl fmt::Display for IndexLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexLabel::Integer(i) => write!(f, "{i}"),
            IndexLabel::Float(v) => write!(f, "{v}"),
            IndexLabel::Text(s) => write!(f, "{s}"),
            IndexLabel::Null => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Curve – one column of the batch
// ---------------------------------------------------------------------------

/// A named univariate series.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub name: String,
    pub values: Vec<f64>,
}

impl Curve {
    pub fn new<S: Into<String>>(name: S, values: Vec<f64>) -> Self {
        Curve {
            name: name.into(),
            values,
        }
    }
}

// ---------------------------------------------------------------------------
// CurveBatch – curves sharing one index
// ---------------------------------------------------------------------------

/// An ordered set of curves over one shared index.
///
/// Every curve has exactly `index.len()` samples and curve names are
/// unique. Column order is insertion order and is kept by every stage.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveBatch {
    index: Vec<IndexLabel>,
    curves: Vec<Curve>,
}

impl CurveBatch {
    /// Build a batch, checking lengths and name uniqueness.
    pub fn new(index: Vec<IndexLabel>, curves: Vec<Curve>) -> Result<Self> {
        let n = index.len();
        let mut seen = HashSet::with_capacity(curves.len());
        for curve in &curves {
            if curve.values.len() != n {
                return Err(PreprocessError::invalid_batch(format!(
                    "curve '{}' has {} samples but the index has {n}",
                    curve.name,
                    curve.values.len()
                )));
            }
            if !seen.insert(curve.name.as_str()) {
                return Err(PreprocessError::invalid_batch(format!(
                    "duplicate curve name '{}'",
                    curve.name
                )));
            }
        }
        Ok(CurveBatch { index, curves })
    }

    /// Build a batch with a `0..N` integer index.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let n = columns.first().map_or(0, |(_, v)| v.len());
        let index = (0..n as i64).map(IndexLabel::Integer).collect();
        let curves = columns
            .into_iter()
            .map(|(name, values)| Curve::new(name, values))
            .collect();
        Self::new(index, curves)
    }

    /// Number of samples per curve (N).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the shared index has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    pub fn index(&self) -> &[IndexLabel] {
        &self.index
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn iter(&self) -> impl Iterator<Item = &Curve> {
        self.curves.iter()
    }

    pub fn curve_names(&self) -> Vec<&str> {
        self.curves.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn curve(&self, name: &str) -> Option<&Curve> {
        self.curves.iter().find(|c| c.name == name)
    }

    /// Apply `f` to every curve and collect a new batch with the same index
    /// and names. The first error aborts the whole map.
    pub fn map_curves<F>(&self, mut f: F) -> Result<CurveBatch>
    where
        F: FnMut(&[f64]) -> Result<Vec<f64>>,
    {
        let curves = self
            .curves
            .iter()
            .map(|c| Ok(Curve::new(c.name.clone(), f(&c.values)?)))
            .collect::<Result<Vec<_>>>()?;
        CurveBatch::new(self.index.clone(), curves)
    }

    /// Keep only the curves for which `keep` returns `true`.
    pub(crate) fn retain_curves<F>(&self, mut keep: F) -> CurveBatch
    where
        F: FnMut(&Curve) -> bool,
    {
        CurveBatch {
            index: self.index.clone(),
            curves: self.curves.iter().filter(|c| keep(c)).cloned().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// PeakAnnotation – one row of the annotation table
// ---------------------------------------------------------------------------

/// One detected peak on one curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakAnnotation {
    pub curve_id: String,
    pub peak_index: usize,
    pub peak_value: f64,
    pub is_salient: bool,
}

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value as JsonValue};

use super::model::{CurveBatch, PeakAnnotation};

/// Name of the row-label column/key in written tables.
pub const INDEX_KEY: &str = "index";

/// A curve named like the label column would be indistinguishable from it.
fn check_label_key(batch: &CurveBatch) -> Result<()> {
    if batch.curve(INDEX_KEY).is_some() {
        bail!("curve name '{INDEX_KEY}' collides with the row-label column");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV writers
// ---------------------------------------------------------------------------

/// Write a batch in the same wide layout the CSV loader reads: an `index`
/// column followed by one column per curve. `NaN` is written as an empty
/// cell. A curve named `index` is rejected.
pub fn write_batch_csv(batch: &CurveBatch, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_batch(batch, file)
}

/// Write the annotation table with header
/// `curve_id,peak_index,peak_value,is_salient`, even when there are no rows.
pub fn write_annotations_csv(annotations: &[PeakAnnotation], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_annotations(annotations, file)
}

pub(crate) fn write_batch<W: Write>(batch: &CurveBatch, out: W) -> Result<()> {
    check_label_key(batch)?;
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec![INDEX_KEY];
    header.extend(batch.curve_names());
    writer.write_record(&header).context("writing CSV header")?;

    for (row, label) in batch.index().iter().enumerate() {
        let mut record = Vec::with_capacity(batch.curve_count() + 1);
        record.push(label.to_string());
        for curve in batch.iter() {
            let v = curve.values[row];
            record.push(if v.is_nan() { String::new() } else { v.to_string() });
        }
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

pub(crate) fn write_annotations<W: Write>(annotations: &[PeakAnnotation], out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer
        .write_record(["curve_id", "peak_index", "peak_value", "is_salient"])
        .context("writing CSV header")?;
    for ann in annotations {
        writer.serialize(ann).context("writing annotation row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON records
// ---------------------------------------------------------------------------

/// First `limit` rows of a batch in records orientation:
/// `[{ "index": .., "<curve>": .. }, ...]`, keys in column order. `NaN`
/// becomes `null`. A curve named `index` is rejected.
pub fn batch_records(batch: &CurveBatch, limit: usize) -> Result<Vec<JsonValue>> {
    check_label_key(batch)?;
    let records = batch
        .index()
        .iter()
        .enumerate()
        .take(limit)
        .map(|(row, label)| {
            let mut obj = Map::new();
            obj.insert(
                INDEX_KEY.to_string(),
                serde_json::to_value(label).unwrap_or(JsonValue::Null),
            );
            for curve in batch.iter() {
                let value = serde_json::Number::from_f64(curve.values[row])
                    .map_or(JsonValue::Null, JsonValue::Number);
                obj.insert(curve.name.clone(), value);
            }
            JsonValue::Object(obj)
        })
        .collect();
    Ok(records)
}

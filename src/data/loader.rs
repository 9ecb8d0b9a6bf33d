use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::filter::drop_columns;
use super::model::{Curve, CurveBatch, IndexLabel};

/// Column pandas writes for a named or default index in Parquet files.
const PANDAS_INDEX_COLUMN: &str = "__index_level_0__";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a curve batch from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – first column is the row index, every other column a curve
/// * `.json`    – pandas "split" orientation (`columns` / `index` / `data`)
/// * `.parquet` – one column per curve, optional `__index_level_0__` index
///
/// Cells that are not numbers become `NaN`. If `time_index_column` names a
/// loaded column it is dropped before the batch is returned.
pub fn load_file(path: &Path, time_index_column: Option<&str>) -> Result<CurveBatch> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let batch = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    let batch = match time_index_column {
        Some(col) => drop_columns(&batch, &[col]),
        None => batch,
    };

    log::info!(
        "loaded {} curve(s) x {} sample(s) from {}",
        batch.curve_count(),
        batch.len(),
        path.display()
    );
    Ok(batch)
}

/// Numeric coercion used by every text-based format: anything that does
/// not parse becomes `NaN`.
fn coerce_f64(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one row per time step.
///
/// ```text
/// ,curveA,curveB
/// 0,0.12,1.5
/// 1,0.14,1.7
/// ```
fn load_csv(path: &Path) -> Result<CurveBatch> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        bail!("CSV has no header row");
    }

    let mut index = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len() - 1];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
        }
        index.push(IndexLabel::guess(record.get(0).unwrap_or("")));
        for (col, column) in columns.iter_mut().enumerate() {
            column.push(coerce_f64(record.get(col + 1).unwrap_or("")));
        }
    }

    let curves = headers
        .into_iter()
        .skip(1)
        .zip(columns)
        .map(|(name, values)| Curve::new(name, values))
        .collect();

    CurveBatch::new(index, curves).context("building curve batch from CSV")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (`df.to_json(orient='split')`):
///
/// ```json
/// {
///   "columns": ["curveA", "curveB"],
///   "index":   [0, 1, 2],
///   "data":    [[0.1, 1.0], [0.2, 1.1], [0.3, 0.9]]
/// }
/// ```
///
/// `index` may be omitted, in which case rows are numbered from zero.
#[derive(Debug, Deserialize)]
struct SplitTable {
    columns: Vec<String>,
    #[serde(default)]
    index: Option<Vec<JsonValue>>,
    data: Vec<Vec<JsonValue>>,
}

fn load_json(path: &Path) -> Result<CurveBatch> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let table: SplitTable = serde_json::from_str(&text).context("parsing JSON")?;

    let n_rows = table.data.len();
    let index = match table.index {
        Some(labels) => {
            if labels.len() != n_rows {
                bail!("JSON index has {} labels but data has {n_rows} rows", labels.len());
            }
            labels.iter().map(json_to_label).collect()
        }
        None => (0..n_rows as i64).map(IndexLabel::Integer).collect(),
    };

    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(n_rows); table.columns.len()];
    for (i, row) in table.data.iter().enumerate() {
        if row.len() != table.columns.len() {
            bail!(
                "Row {i}: expected {} values, found {}",
                table.columns.len(),
                row.len()
            );
        }
        for (column, cell) in columns.iter_mut().zip(row) {
            column.push(json_to_f64(cell));
        }
    }

    let curves = table
        .columns
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Curve::new(name, values))
        .collect();

    CurveBatch::new(index, curves).context("building curve batch from JSON")
}

fn json_to_f64(val: &JsonValue) -> f64 {
    match val {
        JsonValue::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        JsonValue::String(s) => coerce_f64(s),
        _ => f64::NAN,
    }
}

fn json_to_label(val: &JsonValue) -> IndexLabel {
    match val {
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                IndexLabel::Integer(i)
            } else if let Some(f) = n.as_f64() {
                IndexLabel::Float(f)
            } else {
                IndexLabel::Text(n.to_string())
            }
        }
        JsonValue::String(s) => IndexLabel::Text(s.clone()),
        JsonValue::Null => IndexLabel::Null,
        other => IndexLabel::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per curve.
///
/// Numeric columns (Float64, Float32, Int32, Int64) are read directly, Utf8
/// columns are coerced, nulls become `NaN`. Works with files written by
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<CurveBatch> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    let reader = builder.build().context("building parquet reader")?;

    let index_pos = schema.index_of(PANDAS_INDEX_COLUMN).ok();
    let names: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();

    let mut index = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let n_rows = batch.num_rows();

        for (col_idx, column) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            if Some(col_idx) == index_pos {
                for row in 0..n_rows {
                    index.push(extract_label(array, row));
                }
            } else {
                extract_f64_column(array, column)
                    .with_context(|| format!("reading column '{}'", names[col_idx]))?;
            }
        }

        if index_pos.is_none() {
            let start = index.len() as i64;
            index.extend((start..start + n_rows as i64).map(IndexLabel::Integer));
        }
    }

    let curves = names
        .into_iter()
        .zip(columns)
        .enumerate()
        .filter(|(i, _)| Some(*i) != index_pos)
        .map(|(_, (name, values))| Curve::new(name, values))
        .collect();

    CurveBatch::new(index, curves).context("building curve batch from parquet")
}

// -- Parquet / Arrow helpers --

/// Append every row of `col` to `out` as `f64`.
fn extract_f64_column(col: &Arc<dyn Array>, out: &mut Vec<f64>) -> Result<()> {
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            out.extend(arr.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            out.extend(arr.iter().map(|v| v.map_or(f64::NAN, f64::from)));
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            out.extend(arr.iter().map(|v| v.map_or(f64::NAN, f64::from)));
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            out.extend(arr.iter().map(|v| v.map_or(f64::NAN, |i| i as f64)));
        }
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            out.extend(arr.iter().map(|v| v.map_or(f64::NAN, coerce_f64)));
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            out.extend(arr.iter().map(|v| v.map_or(f64::NAN, coerce_f64)));
        }
        other => bail!("Unsupported column type {other:?}"),
    }
    Ok(())
}

/// Extract one index label from an Arrow column at a given row.
fn extract_label(col: &Arc<dyn Array>, row: usize) -> IndexLabel {
    if col.is_null(row) {
        return IndexLabel::Null;
    }
    match col.data_type() {
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map_or(IndexLabel::Null, |a| IndexLabel::Integer(a.value(row))),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map_or(IndexLabel::Null, |a| IndexLabel::Integer(i64::from(a.value(row)))),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map_or(IndexLabel::Null, |a| IndexLabel::Float(a.value(row))),
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map_or(IndexLabel::Null, |a| IndexLabel::Text(a.value(row).to_string())),
        DataType::LargeUtf8 => IndexLabel::Text(col.as_string::<i64>().value(row).to_string()),
        _ => IndexLabel::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_turns_garbage_into_nan() {
        assert_eq!(coerce_f64(" 2.5 "), 2.5);
        assert!(coerce_f64("abc").is_nan());
        assert!(coerce_f64("").is_nan());
    }

    #[test]
    fn json_cells_coerce() {
        assert_eq!(json_to_f64(&serde_json::json!(3)), 3.0);
        assert_eq!(json_to_f64(&serde_json::json!("4.5")), 4.5);
        assert!(json_to_f64(&serde_json::json!(null)).is_nan());
        assert!(json_to_f64(&serde_json::json!(true)).is_nan());
    }

    #[test]
    fn json_labels_keep_type() {
        assert_eq!(json_to_label(&serde_json::json!(7)), IndexLabel::Integer(7));
        assert_eq!(json_to_label(&serde_json::json!(0.5)), IndexLabel::Float(0.5));
        assert_eq!(
            json_to_label(&serde_json::json!("t0")),
            IndexLabel::Text("t0".into())
        );
    }

    #[test]
    fn unsupported_extension_fails() {
        let err = load_file(Path::new("curves.xlsx"), None).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn gaussian(t: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(t - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn generate_curve(
    times: &[f64],
    baseline: f64,
    peaks: &[(f64, f64, f64)],
    noise: &Normal<f64>,
    rng: &mut StdRng,
) -> Vec<f64> {
    times
        .iter()
        .map(|&t| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(t, mu, sigma, amp))
                .sum();
            baseline + signal + noise.sample(rng)
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 0.05).context("building noise distribution")?;

    // 500 time steps, 0.1 s apart
    let n = 500;
    let times: Vec<f64> = (0..n).map(|i| i as f64 * 0.1).collect();

    // (name, baseline, [(centre, width, amplitude)])
    let curve_specs: Vec<(&str, f64, Vec<(f64, f64, f64)>)> = vec![
        ("sensor_a", 0.0, vec![(8.0, 1.5, 3.0), (22.0, 2.0, 1.2), (40.0, 1.0, 2.2)]),
        ("sensor_b", 1.0, vec![(12.0, 3.0, 0.8), (30.0, 1.0, 2.5)]),
        ("sensor_c", -0.5, vec![(5.0, 0.8, 1.0), (15.0, 0.8, 1.1), (25.0, 0.8, 0.9), (35.0, 0.8, 4.0)]),
        ("sensor_flat", 2.0, Vec::new()),
    ];

    let curves: Vec<(&str, Vec<f64>)> = curve_specs
        .iter()
        .map(|(name, baseline, peaks)| (*name, generate_curve(&times, *baseline, peaks, &noise, &mut rng)))
        .collect();

    // ---- Wide CSV: index, time, one column per curve ----
    let csv_path = "sample_timeseries.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV")?;
    let mut header = vec!["", "time"];
    header.extend(curves.iter().map(|(name, _)| *name));
    writer.write_record(&header)?;
    for (row, t) in times.iter().enumerate() {
        let mut record = vec![row.to_string(), format!("{t:.1}")];
        record.extend(curves.iter().map(|(_, values)| format!("{:.6}", values[row])));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    // ---- Parquet: pandas-style index column plus one Float64 column per curve ----
    let mut fields = vec![
        Field::new("__index_level_0__", DataType::Int64, false),
        Field::new("time", DataType::Float64, false),
    ];
    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from((0..n as i64).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(times.clone())),
    ];
    for (name, values) in &curves {
        fields.push(Field::new(*name, DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(values.clone())));
    }
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building RecordBatch")?;

    let parquet_path = "sample_timeseries.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    println!(
        "Wrote {} curves ({n} samples each) to {csv_path} and {parquet_path}",
        curves.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_curve() {
        let times: Vec<f64> = (0..50).map(|i| i as f64 * 0.1).collect();
        let noise = Normal::new(0.0, 0.05).unwrap();
        let peaks = [(2.0, 0.5, 1.0)];
        let a = generate_curve(&times, 0.0, &peaks, &noise, &mut StdRng::seed_from_u64(7));
        let b = generate_curve(&times, 0.0, &peaks, &noise, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.len(), times.len());
    }

    #[test]
    fn noise_stays_near_baseline() {
        let times: Vec<f64> = (0..200).map(f64::from).collect();
        let noise = Normal::new(0.0, 0.05).unwrap();
        let flat = generate_curve(&times, 2.0, &[], &noise, &mut StdRng::seed_from_u64(42));
        let mean = flat.iter().sum::<f64>() / flat.len() as f64;
        assert!((mean - 2.0).abs() < 0.05);
        assert!(flat.iter().all(|v| (v - 2.0).abs() < 0.5));
    }
}

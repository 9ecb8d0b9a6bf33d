use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::config::PreprocessingConfig;
use crate::data::model::{CurveBatch, PeakAnnotation};
use crate::data::writer::batch_records;
use crate::pipeline::{PipelineOutput, run};

// ---------------------------------------------------------------------------
// Job lifecycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failed)
    }
}

/// One pipeline invocation with its status, timing and outcome.
///
/// `Pending → Running → Success | Failed`; a record runs at most once.
#[derive(Debug)]
pub struct JobRecord {
    pub id: Uuid,
    pub status: JobStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub output: Option<PipelineOutput>,
}

impl Default for JobRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRecord {
    /// Create a pending job with a fresh v4 id.
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        log::info!("job {id}: created");
        Self {
            id,
            status: JobStatus::Pending,
            started_at: None,
            finished_at: None,
            error_message: None,
            output: None,
        }
    }

    /// Run the pipeline once and record the outcome.
    ///
    /// Calling this on a record that already left `Pending` does nothing.
    pub fn execute(&mut self, batch: &CurveBatch, config: &PreprocessingConfig) -> JobStatus {
        if self.status != JobStatus::Pending {
            log::warn!("job {}: already {:?}, not re-running", self.id, self.status);
            return self.status;
        }

        self.status = JobStatus::Running;
        self.started_at = Some(Utc::now());
        log::info!(
            "job {}: started ({} curve(s) x {} sample(s))",
            self.id,
            batch.curve_count(),
            batch.len()
        );

        let result = run(batch, config);

        self.finished_at = Some(Utc::now());
        match result {
            Ok(output) => {
                log::info!(
                    "job {}: succeeded in {:.3}s, {} annotation row(s)",
                    self.id,
                    self.duration_seconds().unwrap_or_default(),
                    output.annotations.len()
                );
                self.output = Some(output);
                self.status = JobStatus::Success;
            }
            Err(e) => {
                log::error!("job {}: failed: {e}", self.id);
                self.error_message = Some(e.to_string());
                self.status = JobStatus::Failed;
            }
        }
        self.status
    }

    /// Time between start and finish, once the job is terminal.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    fn duration_seconds(&self) -> Option<f64> {
        self.duration()
            .and_then(|d| d.num_microseconds())
            .map(|us| us as f64 / 1e6)
    }

    /// Status plus the first `head` rows of both result tables.
    pub fn summary(&self, head: usize) -> Result<JobSummary> {
        let (preprocessed_head, annotations_head) = match &self.output {
            Some(out) => (
                batch_records(&out.normalized, head)?,
                out.annotations.iter().take(head).cloned().collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };
        Ok(JobSummary {
            job_id: self.id,
            status: self.status,
            started_at: self.started_at,
            finished_at: self.finished_at,
            duration_seconds: self.duration_seconds(),
            error_message: self.error_message.clone(),
            preprocessed_head,
            annotations_head,
        })
    }
}

/// Serializable view of a job for callers.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<f64>,
    pub error_message: Option<String>,
    pub preprocessed_head: Vec<JsonValue>,
    pub annotations_head: Vec<PeakAnnotation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> CurveBatch {
        CurveBatch::from_columns(vec![("curveA", vec![0.0, 2.0, 0.0, 4.0, 0.0])]).unwrap()
    }

    fn even_centered() -> PreprocessingConfig {
        PreprocessingConfig::builder()
            .smoothing_window(2)
            .smoothing_center(true)
            .build()
            .unwrap()
    }

    #[test]
    fn success_lifecycle() {
        let cfg = PreprocessingConfig::builder()
            .smoothing_window(1)
            .build()
            .unwrap();
        let mut job = JobRecord::new();
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.duration().is_none());

        assert_eq!(job.execute(&batch(), &cfg), JobStatus::Success);
        assert!(job.status.is_terminal());
        let elapsed = job.duration().unwrap();
        assert!(elapsed >= Duration::zero());
        assert!(job.started_at.unwrap() <= job.finished_at.unwrap());
        assert_eq!(job.output.as_ref().unwrap().annotations.len(), 2);
        assert!(job.error_message.is_none());
    }

    #[test]
    fn ids_are_unique_v4() {
        let a = JobRecord::new();
        let b = JobRecord::new();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.get_version_num(), 4);
    }

    #[test]
    fn failure_records_message_and_no_output() {
        let mut job = JobRecord::new();
        assert_eq!(job.execute(&batch(), &even_centered()), JobStatus::Failed);
        assert!(job.output.is_none());
        assert!(job.finished_at.is_some());
        assert!(job.error_message.as_deref().unwrap().contains("odd window"));
    }

    #[test]
    fn terminal_job_is_not_rerun() {
        let mut job = JobRecord::new();
        job.execute(&batch(), &even_centered());
        let good = PreprocessingConfig::default();
        assert_eq!(job.execute(&batch(), &good), JobStatus::Failed);
        assert!(job.output.is_none());
    }

    #[test]
    fn summary_serializes_status_and_iso_timestamps() {
        let mut job = JobRecord::new();
        job.execute(&batch(), &PreprocessingConfig::builder().smoothing_window(1).build().unwrap());
        let value = serde_json::to_value(job.summary(1).unwrap()).unwrap();
        assert_eq!(value["status"], "SUCCESS");
        assert_eq!(value["job_id"], job.id.to_string());

        let started = value["started_at"].as_str().unwrap();
        let parsed: DateTime<Utc> = started.parse().unwrap();
        assert_eq!(Some(parsed), job.started_at);

        assert!(value["duration_seconds"].as_f64().unwrap() >= 0.0);
        assert_eq!(value["preprocessed_head"].as_array().unwrap().len(), 1);
        assert_eq!(value["annotations_head"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn pending_summary_has_no_timing() {
        let job = JobRecord::new();
        let summary = job.summary(5).unwrap();
        assert_eq!(summary.status, JobStatus::Pending);
        assert!(summary.started_at.is_none());
        assert!(summary.duration_seconds.is_none());
        assert!(summary.preprocessed_head.is_empty());
    }
}

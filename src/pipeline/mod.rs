/// Numeric core: one synchronous pass over an in-memory batch.
///
/// ```text
///   CurveBatch (raw)
///        │
///        ▼
///   ┌───────────┐
///   │ smoothing  │  reflected moving average, per curve
///   └───────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ normalization  │  divide by arc length (optional)
///   └───────────────┘
///        │                                  ┌────────────┐
///        ├──────────────────────────────────│  returned   │
///        ▼                                  └────────────┘
///   ┌──────────┐     ┌──────────┐
///   │  peaks    │ ──▶ │ annotate  │  Vec<PeakAnnotation>
///   └──────────┘     └──────────┘
/// ```
///
/// No stage mutates its input; each returns a fresh batch.

pub mod annotate;
pub mod normalization;
pub mod peaks;
pub mod runner;
pub mod smoothing;

pub use runner::{PipelineOutput, run};

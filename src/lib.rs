//! StudyPulse - Behavioral engagement and analytics engine for study sessions
//!
//! StudyPulse turns raw per-second behavioral samples into live session
//! metrics through a deterministic pipeline: ingest → composite scoring →
//! period-gated smoothing → health classification → alert evaluation, then
//! reduces finished sessions into period rollups.
//!
//! ## Modules
//!
//! - **Live Session**: Ingest samples and maintain smoothed scores, health
//!   state, and alerts for one running session
//! - **Rollups**: Pure reductions over stored session records into daily
//!   trends, study patterns, engagement analysis, and productivity scores

pub mod alerts;
pub mod buffer;
pub mod clock;
pub mod engine;
pub mod error;
pub mod health;
pub mod ingest;
pub mod rollup;
pub mod scorer;
pub mod session;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::SessionEngine;
pub use error::EngineError;

// Live-session exports
pub use alerts::{AlertContext, AlertEngine};
pub use buffer::{SmoothingBuffer, SmoothingConfig};
pub use health::{ClassifierInput, HealthClassifier};
pub use ingest::{parse_sample, RawSample};
pub use scorer::CompositeScorer;
pub use session::SessionAggregator;

// Rollup exports
pub use rollup::{
    daily_trends, engagement_analysis, study_patterns, DateRange, ProductivityScorer,
};

/// Engine version embedded in exported reports
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

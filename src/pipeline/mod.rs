//! Training pipeline abstractions
//!
//! This module provides:
//! - The training loop that drives a learner until an episode target or abort
//! - Action sources for automatic and manual training
//! - Observers recording progress, metrics, renders and episode logs

pub mod observers;
pub mod sources;
pub mod training;

// Re-export observer implementations (adapters)
pub use observers::{
    EpisodeRecord, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
    RenderObserver,
};
// Re-export action source implementations (adapters)
pub use sources::{ManualInput, ManualSource, PolicySource};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{ActionSource, Directive, Observer};

//! Selfsame Runtime - investigation pipeline orchestration
//!
//! Runs the fatal resolver gate, fans out the independent probe battery,
//! consults the cross-run history, and reduces the merged evidence to a
//! confidence score and risk grade.

pub mod pipeline;

pub use pipeline::{apply_outcome, finalize, FatalError, Investigator, InvestigatorConfig};

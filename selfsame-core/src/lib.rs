//! Selfsame Core - report model and deterministic analysis
//!
//! This crate provides the foundational primitives:
//! - The investigation report aggregate and per-probe result types
//! - Confidence scoring and risk grading
//! - Search-engine dork generation
//! - Username variant expansion and timeline policy

pub mod dorks;
pub mod report;
pub mod scoring;
pub mod timeline;
pub mod variants;

pub use dorks::*;
pub use report::*;
pub use scoring::*;
pub use timeline::*;
pub use variants::*;

/// Status codes a presence check treats as "profile exists"
pub const SUCCESS_STATUS_CODES: &[u16] = &[200, 301, 302];

/// Risk grade thresholds over the confidence score
pub const HIGH_RISK_THRESHOLD: f64 = 0.75;
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.45;

//! Common probe contract
//!
//! Adding a platform means adding one registry entry implementing this
//! trait, not branching logic in the pipeline.

use async_trait::async_trait;

use selfsame_core::{
    AdvancedMatch, CrossPlatformFindings, ExposureFindings, LeakFindings, PresenceResult,
};

/// Inputs shared by all probes for one investigation run
#[derive(Debug, Clone, Default)]
pub struct ProbeContext {
    pub handle: String,
    /// Set once the resolver has completed; required by some probes
    pub platform_id: Option<String>,
    /// Declared name from the primary profile, for match scoring
    pub full_name: String,
    /// Username variants scanned for independent mentions
    pub variants: Vec<String>,
}

impl ProbeContext {
    pub fn new(handle: &str) -> Self {
        Self {
            handle: handle.to_string(),
            ..Self::default()
        }
    }

    pub fn with_platform_id(mut self, platform_id: &str) -> Self {
        self.platform_id = Some(platform_id.to_string());
        self
    }

    pub fn with_full_name(mut self, full_name: &str) -> Self {
        self.full_name = full_name.to_string();
        self
    }

    pub fn with_variants(mut self, variants: Vec<String>) -> Self {
        self.variants = variants;
        self
    }
}

/// Typed partial result, merged into the report by key
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Presence {
        platform: String,
        result: PresenceResult,
    },
    Advanced {
        platform: String,
        result: AdvancedMatch,
    },
    Exposure(ExposureFindings),
    Leaks(LeakFindings),
    CrossPlatform(CrossPlatformFindings),
}

/// Common interface for all data probes
///
/// `run` is infallible by contract: total failure yields an
/// absence-shaped outcome, never an error.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Unique probe name (the merge key for per-platform results)
    fn name(&self) -> &'static str;

    /// Execute the probe against its remote source
    async fn run(&self, ctx: &ProbeContext) -> ProbeOutcome;
}

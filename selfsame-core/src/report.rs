//! Investigation report aggregate and per-probe result types
//!
//! Every probe produces a fixed-shape, well-typed result even on total
//! failure; the report keeps missing-vs-empty explicit so downstream
//! consumers never guess at absent fields.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one network request, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProbeStatus {
    /// HTTP response received with this status code
    Http(u16),
    /// Transport-level failure (timeout, DNS, TLS, ...)
    Error(String),
}

/// Result of a basic per-platform presence check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceResult {
    pub exists: bool,
    pub status: ProbeStatus,
    pub url: String,
}

impl PresenceResult {
    /// Absence-shaped result for a failed request
    pub fn unreachable(url: &str, message: &str) -> Self {
        Self {
            exists: false,
            status: ProbeStatus::Error(message.to_string()),
            url: url.to_string(),
        }
    }
}

/// Result of a deep content match against one platform profile page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedMatch {
    pub exists: bool,
    pub status: ProbeStatus,
    pub url: String,
    /// Weighted partial-signal sum, clamped to [0, 1], two decimals
    pub confidence: f64,
    pub extracted_name: Option<String>,
    pub extracted_bio: Option<String>,
    /// Which partial signals matched ("title", "name", "bio")
    pub matches: Vec<String>,
}

/// Unauthenticated exposure check results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureFindings {
    pub legacy_json_vulnerable: bool,
    pub graphql_vulnerable: bool,
    /// True when a transport failure prevented a definitive answer
    pub inconclusive: bool,
    pub legacy_status: Option<u16>,
    pub graphql_status: Option<u16>,
}

impl ExposureFindings {
    pub fn is_vulnerable(&self) -> bool {
        self.legacy_json_vulnerable || self.graphql_vulnerable
    }
}

/// A search-engine page that mentioned the handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSignal {
    pub query: String,
    pub engine: String,
}

/// A paste-site page flagged during leak-signal search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasteFinding {
    pub url: String,
    pub site: String,
    pub found_handle: bool,
    pub found_keywords: Vec<String>,
    pub snippet: String,
}

/// Aggregate leak-signal probe output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeakFindings {
    pub signals: Vec<EngineSignal>,
    pub pastes: Vec<PasteFinding>,
    /// Username variants (other than the handle) seen in result pages
    pub matched_variants: Vec<String>,
}

/// Deep cross-platform extraction from the secondary platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossPlatformFindings {
    pub exists: bool,
    pub bio: String,
    pub urls: Vec<String>,
    pub emails: Vec<String>,
    pub email_patterns: Vec<String>,
}

/// One persisted avatar observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarEntry {
    /// Content fingerprint of the image reference, not the raw URL
    pub fingerprint: String,
    pub url: String,
}

/// Profile facts fetched from the primary platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub full_name: String,
    pub biography: String,
    pub external_url: String,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    pub verified: bool,
    pub business: bool,
    pub private: bool,
    pub public_email: String,
    pub public_phone: String,
    pub avatar_url: String,
}

/// Cross-platform timeline assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineConsistency {
    Consistent,
    Partial,
    Insufficient,
    #[default]
    Unknown,
}

/// Ordinal risk grade, derived from confidence only
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskGrade {
    #[default]
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskGrade::Low => write!(f, "LOW"),
            RiskGrade::Medium => write!(f, "MEDIUM"),
            RiskGrade::High => write!(f, "HIGH"),
        }
    }
}

/// Generated search-engine queries for manual follow-up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DorkSet {
    pub google: Vec<String>,
    pub bing: Vec<String>,
}

/// The canonical investigation report, created fresh per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationReport {
    pub handle: String,
    /// Opaque stable id on the primary platform, set once by the resolver
    pub platform_id: String,
    pub generated_at: DateTime<Utc>,

    pub profile: SubjectProfile,

    pub username_history: Vec<String>,
    pub username_changed: bool,
    pub avatar_history: Vec<AvatarEntry>,
    pub avatar_changed: bool,

    pub username_variants: Vec<String>,
    pub platforms: BTreeMap<String, PresenceResult>,
    pub advanced_platforms: BTreeMap<String, AdvancedMatch>,
    pub cross_platform: Option<CrossPlatformFindings>,
    pub emails: Vec<String>,
    pub leak_signals: LeakFindings,
    pub vulnerability_checks: ExposureFindings,

    pub timeline_consistency: TimelineConsistency,
    pub search_dorks: DorkSet,
    pub confidence: f64,
    pub risk: RiskGrade,
    pub risk_explanation: String,
}

impl InvestigationReport {
    /// Empty report for a handle; probes and scoring fill it in
    pub fn new(handle: &str) -> Self {
        Self {
            handle: handle.to_string(),
            platform_id: String::new(),
            generated_at: Utc::now(),
            profile: SubjectProfile::default(),
            // First-ever observation establishes the baseline
            username_history: vec![handle.to_string()],
            username_changed: true,
            avatar_history: Vec::new(),
            avatar_changed: true,
            username_variants: Vec::new(),
            platforms: BTreeMap::new(),
            advanced_platforms: BTreeMap::new(),
            cross_platform: None,
            emails: Vec::new(),
            leak_signals: LeakFindings::default(),
            vulnerability_checks: ExposureFindings::default(),
            timeline_consistency: TimelineConsistency::Unknown,
            search_dorks: DorkSet::default(),
            confidence: 0.0,
            risk: RiskGrade::Low,
            risk_explanation: String::new(),
        }
    }

    /// Whether the secondary platform presence probe confirmed existence
    pub fn secondary_presence(&self) -> bool {
        self.platforms
            .get("twitter")
            .map(|p| p.exists)
            .unwrap_or(false)
    }
}

//! The investigation pipeline
//!
//! Ordering: resolver (fatal gate) first, then the independent probe
//! battery concurrently, then the probes gated on presence results, then
//! history comparison, merge, and the pure finalization pass (timeline,
//! dorks, scoring, grading). Probe results merge by key, so the battery
//! order never affects the report.

use std::collections::BTreeSet;
use std::path::PathBuf;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use selfsame_core::{
    assess_timeline, generate_dorks, generate_variants, grade_risk, score_confidence, AvatarEntry,
    InvestigationReport, TimelinePolicy,
};
use selfsame_probes::{
    fetch_profile, resolve_identity, AdvancedMatchProbe, CrossPlatformProbe, ExposureProbe,
    LeakSignalProbe, PresenceProbe, Probe, ProbeContext, ProbeOutcome, ResolveError,
    ADVANCED_TARGETS, PLATFORM_TARGETS,
};
use selfsame_session::{
    build_client, check_credential_health, Credentials, SessionConfig, SessionError,
};
use selfsame_store::{avatar_fingerprint, HistoryTracker, JsonFileStore, StoreError};

/// Failures that abort the investigation before a report exists
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("credentials are required before any network activity")]
    CredentialMissing,

    #[error("credential health check failed")]
    CredentialRejected,

    #[error("identity resolution failed: {0}")]
    Resolution(#[from] ResolveError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct InvestigatorConfig {
    pub session: SessionConfig,
    pub timeline: TimelinePolicy,
    /// Concurrency cap for the independent probe battery
    pub max_concurrent_probes: usize,
    /// Cap on paste links followed by the leak-signal probe
    pub max_paste_fetches: usize,
    pub username_history_path: PathBuf,
    pub avatar_history_path: PathBuf,
}

impl Default for InvestigatorConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            timeline: TimelinePolicy::default(),
            max_concurrent_probes: 4,
            max_paste_fetches: 5,
            username_history_path: PathBuf::from("username_history.json"),
            avatar_history_path: PathBuf::from("avatar_history.json"),
        }
    }
}

/// Runs one investigation per call; only history state is shared between
/// runs. Concurrent runs for the same identity must share this instance
/// so compare-and-append stays serialized.
pub struct Investigator {
    client: Client,
    credentials: Credentials,
    config: InvestigatorConfig,
    username_history: HistoryTracker<JsonFileStore>,
    avatar_history: HistoryTracker<JsonFileStore>,
}

impl Investigator {
    pub fn new(credentials: Credentials, config: InvestigatorConfig) -> Result<Self, FatalError> {
        if credentials.is_empty() {
            return Err(FatalError::CredentialMissing);
        }

        let client = build_client(&config.session)?;
        let username_history =
            HistoryTracker::new(JsonFileStore::open(&config.username_history_path)?);
        let avatar_history = HistoryTracker::new(JsonFileStore::open(&config.avatar_history_path)?);

        Ok(Self {
            client,
            credentials,
            config,
            username_history,
            avatar_history,
        })
    }

    /// Confirm the primary platform accepts the session before any
    /// investigation traffic
    pub async fn check_credentials(&self) -> Result<(), FatalError> {
        if check_credential_health(&self.client, &self.credentials).await? {
            Ok(())
        } else {
            Err(FatalError::CredentialRejected)
        }
    }

    /// Run the full pipeline for one handle
    pub async fn investigate(&self, handle: &str) -> Result<InvestigationReport, FatalError> {
        let mut report = InvestigationReport::new(handle);
        info!("investigating {}", handle);

        // Fatal gate: downstream probes need the platform id
        let identity = resolve_identity(&self.client, &self.credentials, handle).await?;
        report.platform_id = identity.platform_id.clone();
        info!("resolved {} -> {}", handle, identity.platform_id);

        report.profile = fetch_profile(&self.client, &self.credentials, &identity.platform_id).await;
        report.username_variants = generate_variants(handle);

        self.track_username(&mut report);
        self.track_avatar(&mut report);

        let ctx = ProbeContext::new(handle)
            .with_platform_id(&identity.platform_id)
            .with_full_name(&report.profile.full_name)
            .with_variants(report.username_variants.clone());

        let outcomes = self
            .run_battery(self.independent_probes(), &ctx)
            .await;
        for outcome in outcomes {
            apply_outcome(&mut report, outcome);
        }

        // Presence results decide which deep probes run at all
        let outcomes = self.run_battery(self.gated_probes(&report), &ctx).await;
        for outcome in outcomes {
            apply_outcome(&mut report, outcome);
        }

        finalize(&mut report, &self.config.timeline);
        info!(
            "investigation complete: confidence {} risk {}",
            report.confidence, report.risk
        );

        Ok(report)
    }

    fn independent_probes(&self) -> Vec<Box<dyn Probe>> {
        let mut probes: Vec<Box<dyn Probe>> = PLATFORM_TARGETS
            .iter()
            .map(|target| {
                Box::new(PresenceProbe::new(target, self.client.clone())) as Box<dyn Probe>
            })
            .collect();

        probes.push(Box::new(ExposureProbe::new(self.client.clone())));
        probes.push(Box::new(LeakSignalProbe::new(
            self.client.clone(),
            self.config.max_paste_fetches,
        )));
        probes
    }

    fn gated_probes(&self, report: &InvestigationReport) -> Vec<Box<dyn Probe>> {
        let mut probes: Vec<Box<dyn Probe>> = Vec::new();

        for target in ADVANCED_TARGETS {
            let present = report
                .platforms
                .get(target.platform)
                .map(|p| p.exists)
                .unwrap_or(false);
            if present {
                probes.push(Box::new(AdvancedMatchProbe::new(
                    target,
                    self.client.clone(),
                )));
            }
        }

        if report.secondary_presence() {
            probes.push(Box::new(CrossPlatformProbe::new(self.client.clone())));
        }

        probes
    }

    async fn run_battery(
        &self,
        probes: Vec<Box<dyn Probe>>,
        ctx: &ProbeContext,
    ) -> Vec<ProbeOutcome> {
        stream::iter(probes)
            .map(|probe| async move { probe.run(ctx).await })
            .buffer_unordered(self.config.max_concurrent_probes.max(1))
            .collect()
            .await
    }

    fn track_username(&self, report: &mut InvestigationReport) {
        let result = self.username_history.compare_and_append(
            &report.platform_id,
            &report.handle,
            |a: &String, b: &String| a == b,
        );

        match result {
            Ok((history, changed)) => {
                report.username_history = history;
                report.username_changed = changed;
            }
            Err(e) => {
                // Degrade to a baseline observation, never abort the run
                warn!("username history unavailable: {}", e);
            }
        }
    }

    fn track_avatar(&self, report: &mut InvestigationReport) {
        if report.profile.avatar_url.is_empty() {
            return;
        }

        let entry = AvatarEntry {
            fingerprint: avatar_fingerprint(&report.profile.avatar_url),
            url: report.profile.avatar_url.clone(),
        };

        let result = self.avatar_history.compare_and_append(
            &report.platform_id,
            &entry,
            |a: &AvatarEntry, b: &AvatarEntry| a.fingerprint == b.fingerprint,
        );

        match result {
            Ok((history, changed)) => {
                report.avatar_history = history;
                report.avatar_changed = changed;
            }
            Err(e) => {
                warn!("avatar history unavailable: {}", e);
                report.avatar_history = vec![entry];
            }
        }
    }
}

/// Merge one probe outcome into the report. Keyed and commutative:
/// outcomes from distinct probes can arrive in any order.
pub fn apply_outcome(report: &mut InvestigationReport, outcome: ProbeOutcome) {
    match outcome {
        ProbeOutcome::Presence { platform, result } => {
            report.platforms.insert(platform, result);
        }
        ProbeOutcome::Advanced { platform, result } => {
            report.advanced_platforms.insert(platform, result);
        }
        ProbeOutcome::Exposure(findings) => {
            report.vulnerability_checks = findings;
        }
        ProbeOutcome::Leaks(findings) => {
            report.leak_signals = findings;
        }
        ProbeOutcome::CrossPlatform(findings) => {
            report.cross_platform = Some(findings);
        }
    }
}

/// Pure finalization over the assembled report: timeline assessment,
/// email merge, dork generation, then scoring and grading last.
pub fn finalize(report: &mut InvestigationReport, policy: &TimelinePolicy) {
    report.timeline_consistency = assess_timeline(
        policy,
        report.secondary_presence(),
        report.profile.followers,
    );

    if let Some(cross) = &report.cross_platform {
        let mut emails: BTreeSet<String> = report.emails.iter().cloned().collect();
        emails.extend(cross.emails.iter().cloned());
        report.emails = emails.into_iter().collect();
    }

    report.search_dorks = generate_dorks(report);

    report.confidence = score_confidence(report);
    let (risk, explanation) = grade_risk(report.confidence);
    report.risk = risk;
    report.risk_explanation = explanation.to_string();
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfsame_core::{
        CrossPlatformFindings, PresenceResult, ProbeStatus, RiskGrade, TimelineConsistency,
    };

    fn resolved_report() -> InvestigationReport {
        let mut report = InvestigationReport::new("alice");
        report.platform_id = "1234567890".to_string();
        report
    }

    fn presence_outcome(platform: &str, exists: bool) -> ProbeOutcome {
        ProbeOutcome::Presence {
            platform: platform.to_string(),
            result: PresenceResult {
                exists,
                status: ProbeStatus::Http(if exists { 200 } else { 404 }),
                url: format!("https://{}.example/alice", platform),
            },
        }
    }

    fn failed_outcome(platform: &str) -> ProbeOutcome {
        ProbeOutcome::Presence {
            platform: platform.to_string(),
            result: PresenceResult::unreachable(
                &format!("https://{}.example/alice", platform),
                "connection timed out",
            ),
        }
    }

    fn test_investigator(dir: &std::path::Path) -> Investigator {
        let config = InvestigatorConfig {
            username_history_path: dir.join("username_history.json"),
            avatar_history_path: dir.join("avatar_history.json"),
            ..InvestigatorConfig::default()
        };
        Investigator::new(Credentials::from_raw("sessionid=test"), config).unwrap()
    }

    #[test]
    fn test_empty_credentials_are_fatal() {
        let result = Investigator::new(Credentials::default(), InvestigatorConfig::default());
        assert!(matches!(result, Err(FatalError::CredentialMissing)));
    }

    #[test]
    fn test_merge_is_commutative() {
        let outcomes = vec![
            presence_outcome("github", true),
            presence_outcome("twitter", false),
            ProbeOutcome::Leaks(Default::default()),
        ];

        let mut forward = resolved_report();
        for outcome in outcomes.clone() {
            apply_outcome(&mut forward, outcome);
        }

        let mut reverse = resolved_report();
        for outcome in outcomes.into_iter().rev() {
            apply_outcome(&mut reverse, outcome);
        }

        // Timestamps differ between the two constructions
        reverse.generated_at = forward.generated_at;
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_resolution_only_finalizes_low() {
        let mut report = resolved_report();
        finalize(&mut report, &TimelinePolicy::default());

        assert_eq!(report.confidence, 0.25);
        assert_eq!(report.risk, RiskGrade::Low);
        assert_eq!(
            report.timeline_consistency,
            TimelineConsistency::Insufficient
        );
        assert!(!report.search_dorks.google.is_empty());
    }

    #[test]
    fn test_all_probes_failed_still_completes() {
        let mut report = resolved_report();
        for target in PLATFORM_TARGETS {
            apply_outcome(&mut report, failed_outcome(target.name));
        }
        apply_outcome(&mut report, ProbeOutcome::Exposure(Default::default()));
        apply_outcome(&mut report, ProbeOutcome::Leaks(Default::default()));

        finalize(&mut report, &TimelinePolicy::default());

        assert_eq!(report.platforms.len(), PLATFORM_TARGETS.len());
        assert!(report.platforms.values().all(|p| !p.exists));
        assert_eq!(report.confidence, 0.25);
        assert_eq!(report.risk, RiskGrade::Low);
        assert!(!report.risk_explanation.is_empty());
    }

    #[test]
    fn test_strong_correlation_finalizes_high() {
        let mut report = resolved_report();
        report.profile.followers = 500;
        report.profile.external_url = "https://alice.dev".to_string();
        report.avatar_changed = false;
        apply_outcome(&mut report, presence_outcome("twitter", true));

        finalize(&mut report, &TimelinePolicy::default());

        assert_eq!(
            report.timeline_consistency,
            TimelineConsistency::Consistent
        );
        assert_eq!(report.confidence, 0.75);
        assert_eq!(report.risk, RiskGrade::High);
    }

    #[test]
    fn test_cross_platform_emails_merge_deduplicated() {
        let mut report = resolved_report();
        report.emails = vec!["alice@alice.dev".to_string()];
        apply_outcome(
            &mut report,
            ProbeOutcome::CrossPlatform(CrossPlatformFindings {
                exists: true,
                emails: vec![
                    "alice@alice.dev".to_string(),
                    "contact@alice.dev".to_string(),
                ],
                ..Default::default()
            }),
        );

        finalize(&mut report, &TimelinePolicy::default());

        assert_eq!(
            report.emails,
            vec![
                "alice@alice.dev".to_string(),
                "contact@alice.dev".to_string()
            ]
        );
        // Resolution 0.25 + email 0.10
        assert_eq!(report.confidence, 0.35);
    }

    #[test]
    fn test_gated_probes_follow_presence() {
        let dir = tempfile::tempdir().unwrap();
        let investigator = test_investigator(dir.path());

        let mut report = resolved_report();
        assert!(investigator.gated_probes(&report).is_empty());

        apply_outcome(&mut report, presence_outcome("github", true));
        apply_outcome(&mut report, presence_outcome("twitter", true));
        apply_outcome(&mut report, presence_outcome("reddit", false));

        let gated = investigator.gated_probes(&report);
        let names: Vec<_> = gated.iter().map(|p| p.name()).collect();
        assert!(names.contains(&"github"));
        assert!(names.contains(&"twitter"));
        assert!(names.contains(&"twitter_deep"));
        assert!(!names.contains(&"reddit"));
    }

    #[test]
    fn test_independent_probes_cover_battery() {
        let dir = tempfile::tempdir().unwrap();
        let investigator = test_investigator(dir.path());

        let probes = investigator.independent_probes();
        let names: Vec<_> = probes.iter().map(|p| p.name()).collect();

        assert_eq!(probes.len(), PLATFORM_TARGETS.len() + 2);
        assert!(names.contains(&"private_content_exposure"));
        assert!(names.contains(&"leak_signals"));
    }

    struct StaticProbe {
        name: &'static str,
        outcome: ProbeOutcome,
    }

    #[async_trait::async_trait]
    impl Probe for StaticProbe {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn run(&self, _ctx: &ProbeContext) -> ProbeOutcome {
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn test_battery_collects_all_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let investigator = test_investigator(dir.path());

        let probes: Vec<Box<dyn Probe>> = vec![
            Box::new(StaticProbe {
                name: "github",
                outcome: presence_outcome("github", true),
            }),
            Box::new(StaticProbe {
                name: "twitter",
                outcome: presence_outcome("twitter", false),
            }),
            Box::new(StaticProbe {
                name: "leak_signals",
                outcome: ProbeOutcome::Leaks(Default::default()),
            }),
        ];

        let ctx = ProbeContext::new("alice");
        let outcomes = investigator.run_battery(probes, &ctx).await;
        assert_eq!(outcomes.len(), 3);

        let mut report = resolved_report();
        for outcome in outcomes {
            apply_outcome(&mut report, outcome);
        }
        assert!(report.platforms["github"].exists);
        assert!(!report.platforms["twitter"].exists);
    }

    #[test]
    fn test_history_tracks_across_reports() {
        let dir = tempfile::tempdir().unwrap();
        let investigator = test_investigator(dir.path());

        let mut first = resolved_report();
        investigator.track_username(&mut first);
        assert!(first.username_changed);

        let mut second = resolved_report();
        investigator.track_username(&mut second);
        assert!(!second.username_changed);
        assert_eq!(second.username_history, vec!["alice".to_string()]);
    }

    #[test]
    fn test_avatar_tracking_ignores_url_churn() {
        let dir = tempfile::tempdir().unwrap();
        let investigator = test_investigator(dir.path());

        let mut first = resolved_report();
        first.profile.avatar_url = "https://cdn.example/a.jpg?sig=1".to_string();
        investigator.track_avatar(&mut first);
        assert!(first.avatar_changed);

        let mut second = resolved_report();
        second.profile.avatar_url = "https://cdn.example/a.jpg?sig=2".to_string();
        investigator.track_avatar(&mut second);
        assert!(!second.avatar_changed);
        assert_eq!(second.avatar_history.len(), 1);
    }
}

//! Report rendering
//!
//! JSON is the canonical machine-readable form; Markdown is a readable
//! digest of the same report. Both renderers are pure over the report so
//! the output for a given report is stable.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use selfsame_core::{InvestigationReport, ProbeStatus};

pub fn render_json(report: &InvestigationReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("serializing report to JSON")
}

fn status_label(status: &ProbeStatus) -> String {
    match status {
        ProbeStatus::Http(code) => format!("HTTP {}", code),
        ProbeStatus::Error(message) => format!("error: {}", message),
    }
}

pub fn render_markdown(report: &InvestigationReport) -> String {
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(format!("# Identity Report: {}", report.handle));
    line(String::new());
    line(format!("Generated: {}", report.generated_at.to_rfc3339()));
    line(format!("Platform ID: {}", report.platform_id));
    line(String::new());

    line("## Profile".to_string());
    line(String::new());
    line(format!("- Full name: {}", report.profile.full_name));
    line(format!("- Biography: {}", report.profile.biography));
    line(format!("- External URL: {}", report.profile.external_url));
    line(format!(
        "- Followers / Following / Posts: {} / {} / {}",
        report.profile.followers, report.profile.following, report.profile.posts
    ));
    line(format!(
        "- Verified: {} | Business: {} | Private: {}",
        report.profile.verified, report.profile.business, report.profile.private
    ));
    if !report.profile.public_email.is_empty() {
        line(format!("- Public email: {}", report.profile.public_email));
    }
    if !report.profile.public_phone.is_empty() {
        line(format!("- Public phone: {}", report.profile.public_phone));
    }
    line(String::new());

    line("## History".to_string());
    line(String::new());
    line(format!(
        "- Usernames observed: {} (changed: {})",
        report.username_history.join(", "),
        report.username_changed
    ));
    line(format!(
        "- Avatar observations: {} (changed: {})",
        report.avatar_history.len(),
        report.avatar_changed
    ));
    line(String::new());

    line("## Platform presence".to_string());
    line(String::new());
    line("| Platform | Exists | Status | URL |".to_string());
    line("|---|---|---|---|".to_string());
    for (platform, result) in &report.platforms {
        line(format!(
            "| {} | {} | {} | {} |",
            platform,
            result.exists,
            status_label(&result.status),
            result.url
        ));
    }
    line(String::new());

    if !report.advanced_platforms.is_empty() {
        line("## Content matches".to_string());
        line(String::new());
        for (platform, result) in &report.advanced_platforms {
            line(format!(
                "- **{}**: confidence {} (signals: {})",
                platform,
                result.confidence,
                result.matches.join(", ")
            ));
            if let Some(name) = &result.extracted_name {
                line(format!("  - Declared name: {}", name));
            }
            if let Some(bio) = &result.extracted_bio {
                line(format!("  - Bio: {}", bio));
            }
        }
        line(String::new());
    }

    line("## Exposure checks".to_string());
    line(String::new());
    let exposure = &report.vulnerability_checks;
    line(format!(
        "- Legacy JSON endpoint: {}",
        if exposure.legacy_json_vulnerable {
            "EXPOSED"
        } else {
            "not exposed"
        }
    ));
    line(format!(
        "- Mobile API endpoint: {}",
        if exposure.graphql_vulnerable {
            "EXPOSED"
        } else {
            "not exposed"
        }
    ));
    if exposure.inconclusive {
        line("- Result inconclusive (transport failure)".to_string());
    }
    line(String::new());

    line("## Leak signals".to_string());
    line(String::new());
    if report.leak_signals.signals.is_empty() && report.leak_signals.pastes.is_empty() {
        line("No public leak signals found.".to_string());
    } else {
        for signal in &report.leak_signals.signals {
            line(format!("- {} hit for `{}`", signal.engine, signal.query));
        }
        for paste in &report.leak_signals.pastes {
            line(format!(
                "- Paste on {}: {} (handle: {}, keywords: {})",
                paste.site,
                paste.url,
                paste.found_handle,
                paste.found_keywords.join(", ")
            ));
        }
    }
    if !report.leak_signals.matched_variants.is_empty() {
        line(format!(
            "- Variants seen elsewhere: {}",
            report.leak_signals.matched_variants.join(", ")
        ));
    }
    line(String::new());

    if let Some(cross) = &report.cross_platform {
        line("## Cross-platform extraction".to_string());
        line(String::new());
        if !cross.bio.is_empty() {
            line(format!("- Bio: {}", cross.bio));
        }
        for url in &cross.urls {
            line(format!("- URL: {}", url));
        }
        for email in &cross.emails {
            line(format!("- Email: {}", email));
        }
        if !cross.email_patterns.is_empty() {
            line(format!(
                "- Inferred email patterns: {}",
                cross.email_patterns.join(", ")
            ));
        }
        line(String::new());
    }

    line("## Search dorks".to_string());
    line(String::new());
    for query in &report.search_dorks.google {
        line(format!("- Google: `{}`", query));
    }
    for query in &report.search_dorks.bing {
        line(format!("- Bing: `{}`", query));
    }
    line(String::new());

    line("## Analysis".to_string());
    line(String::new());
    line(format!(
        "- Timeline consistency: {:?}",
        report.timeline_consistency
    ));
    line(format!("- Confidence: {}", report.confidence));
    line(format!("- Risk: {}", report.risk));
    line(format!("- {}", report.risk_explanation));

    out
}

pub fn save_json(report: &InvestigationReport, path: &Path) -> Result<()> {
    fs::write(path, render_json(report)?)
        .with_context(|| format!("writing JSON report to {}", path.display()))
}

pub fn save_markdown(report: &InvestigationReport, path: &Path) -> Result<()> {
    fs::write(path, render_markdown(report))
        .with_context(|| format!("writing Markdown report to {}", path.display()))
}

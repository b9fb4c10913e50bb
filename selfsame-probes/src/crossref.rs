//! Deep cross-platform extraction from the secondary platform
//!
//! Runs only when the Twitter/X presence probe reported existence.
//! Extracts email-looking strings, external URLs, and the declared bio
//! from the public profile page, then infers plausible email naming
//! patterns from the domains of discovered URLs. Passive only: no login,
//! no private data.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use selfsame_core::CrossPlatformFindings;

use crate::probe::{Probe, ProbeContext, ProbeOutcome};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("static regex")
});

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("static regex"));

/// Email naming patterns inferred for one discovered domain
fn email_patterns_for(domain: &str, handle: &str) -> [String; 3] {
    [
        format!("first@{}", domain),
        format!("first.last@{}", domain),
        format!("{}@{}", handle, domain),
    ]
}

/// Host part of an absolute URL
fn url_domain(url: &str) -> Option<String> {
    url.split("//")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .filter(|host| !host.is_empty())
        .map(|host| host.to_string())
}

fn extract_emails(body: &str) -> Vec<String> {
    let emails: BTreeSet<String> = EMAIL_REGEX
        .find_iter(body)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    emails.into_iter().collect()
}

/// Whether the URL's host is the probed platform itself
fn is_own_platform(url: &str) -> bool {
    matches!(url_domain(url).as_deref(), Some("x.com") | Some("www.x.com"))
}

/// External URLs on the page, excluding the platform's own
fn extract_urls(body: &str) -> Vec<String> {
    let urls: BTreeSet<String> = URL_REGEX
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .filter(|url| !is_own_platform(url))
        .collect();
    urls.into_iter().collect()
}

fn extract_bio(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("meta[property=\"og:description\"]").expect("static selector");
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

/// Build the full findings from a fetched profile page
fn analyze_page(html: &str, handle: &str) -> CrossPlatformFindings {
    let urls = extract_urls(html);

    let domains: BTreeSet<String> = urls.iter().filter_map(|url| url_domain(url)).collect();
    let mut email_patterns = Vec::new();
    for domain in &domains {
        email_patterns.extend(email_patterns_for(domain, handle));
    }

    CrossPlatformFindings {
        exists: true,
        bio: extract_bio(html),
        emails: extract_emails(html),
        urls,
        email_patterns,
    }
}

/// Deep Twitter/X probe
pub struct CrossPlatformProbe {
    client: Client,
}

impl CrossPlatformProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for CrossPlatformProbe {
    fn name(&self) -> &'static str {
        "twitter_deep"
    }

    async fn run(&self, ctx: &ProbeContext) -> ProbeOutcome {
        let url = format!("https://x.com/{}", ctx.handle);

        let findings = match self.client.get(&url).send().await {
            Ok(response) if response.status().as_u16() == 200 => match response.text().await {
                Ok(html) => analyze_page(&html, &ctx.handle),
                Err(e) => {
                    debug!("cross-platform body read failed: {}", e);
                    CrossPlatformFindings::default()
                }
            },
            Ok(response) => {
                debug!("cross-platform probe HTTP {}", response.status());
                CrossPlatformFindings::default()
            }
            Err(e) => {
                debug!("cross-platform request failed: {}", e);
                CrossPlatformFindings::default()
            }
        };

        ProbeOutcome::CrossPlatform(findings)
    }
}

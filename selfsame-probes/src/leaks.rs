//! Passive leak-signal search
//!
//! Runs a fixed battery of query templates against a public search
//! engine and flags pages that mention the handle. Result pages are also
//! scanned for username variants and for links to known paste-sharing
//! domains; a capped number of those links is fetched and checked for
//! sensitive keywords. Every step is best-effort: a failed request
//! simply omits that query's contribution.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::Html;
use tracing::debug;

use selfsame_core::{EngineSignal, LeakFindings, PasteFinding};

use crate::probe::{Probe, ProbeContext, ProbeOutcome};

/// Query templates; `{u}` is replaced with the handle
const SEARCH_TEMPLATES: &[&str] = &[
    "site:pastebin.com {u}",
    "site:ghostbin.com {u}",
    "site:github.com {u}",
    "site:reddit.com {u}",
    "\"{u}\" \"password\"",
    "\"{u}\" \"leak\"",
];

/// Keywords that flag a fetched paste as a potential leak
const SENSITIVE_KEYWORDS: &[&str] = &[
    "password",
    "passwd",
    "credentials",
    "leak",
    "dump",
    "combo",
    "breach",
];

const SNIPPET_CHARS: usize = 200;

static PASTE_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://(?:www\.)?(?:pastebin\.com|ghostbin\.com|rentry\.co|justpaste\.it|controlc\.com|dpaste\.org)/[A-Za-z0-9][A-Za-z0-9/_.-]*",
    )
    .expect("static regex")
});

/// Paste-site host for a matched link, without the `www.` prefix
fn paste_site(url: &str) -> String {
    url.split("//")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .map(|host| host.trim_start_matches("www.").to_string())
        .unwrap_or_default()
}

/// Collect paste-sharing links from a raw result page, deduplicated in
/// first-seen order
fn find_paste_links(body: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut links = Vec::new();
    for m in PASTE_LINK_REGEX.find_iter(body) {
        let link = m.as_str().to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }
    links
}

/// Sensitive keywords present in fetched text
fn scan_keywords(text_lower: &str) -> Vec<String> {
    SENSITIVE_KEYWORDS
        .iter()
        .filter(|k| text_lower.contains(*k))
        .map(|k| k.to_string())
        .collect()
}

/// Visible text of a fetched page, whitespace-normalized and truncated
fn snippet_of(html: &str) -> String {
    let document = Html::parse_document(html);
    let text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    normalized.chars().take(SNIPPET_CHARS).collect()
}

/// Leak-signal probe over a public search engine
pub struct LeakSignalProbe {
    client: Client,
    /// Cap on followed paste links per run
    max_paste_fetches: usize,
}

impl LeakSignalProbe {
    pub fn new(client: Client, max_paste_fetches: usize) -> Self {
        Self {
            client,
            max_paste_fetches,
        }
    }

    async fn fetch_page(&self, url: &str) -> Option<String> {
        match self.client.get(url).send().await {
            Ok(response) if response.status().as_u16() == 200 => response.text().await.ok(),
            Ok(response) => {
                debug!("leak query HTTP {} for {}", response.status(), url);
                None
            }
            Err(e) => {
                debug!("leak query failed for {}: {}", url, e);
                None
            }
        }
    }

    async fn inspect_paste(&self, url: &str, handle_lower: &str) -> Option<PasteFinding> {
        let html = self.fetch_page(url).await?;
        let snippet = snippet_of(&html);
        let text_lower = html.to_lowercase();

        let found_handle = text_lower.contains(handle_lower);
        let found_keywords = scan_keywords(&text_lower);

        if !found_handle && found_keywords.is_empty() {
            return None;
        }

        Some(PasteFinding {
            url: url.to_string(),
            site: paste_site(url),
            found_handle,
            found_keywords,
            snippet,
        })
    }
}

#[async_trait]
impl Probe for LeakSignalProbe {
    fn name(&self) -> &'static str {
        "leak_signals"
    }

    async fn run(&self, ctx: &ProbeContext) -> ProbeOutcome {
        let handle_lower = ctx.handle.to_lowercase();
        let mut findings = LeakFindings::default();
        let mut paste_links: Vec<String> = Vec::new();
        let mut matched_variants: BTreeSet<String> = BTreeSet::new();

        for template in SEARCH_TEMPLATES {
            let query = template.replace("{u}", &ctx.handle);
            let url = format!(
                "https://www.bing.com/search?q={}",
                urlencoding::encode(&query)
            );

            let Some(body) = self.fetch_page(&url).await else {
                continue;
            };
            let body_lower = body.to_lowercase();

            if body_lower.contains(&handle_lower) {
                findings.signals.push(EngineSignal {
                    query,
                    engine: "bing".to_string(),
                });
            }

            for variant in &ctx.variants {
                if variant != &ctx.handle && body_lower.contains(&variant.to_lowercase()) {
                    matched_variants.insert(variant.clone());
                }
            }

            for link in find_paste_links(&body) {
                if !paste_links.contains(&link) {
                    paste_links.push(link);
                }
            }
        }

        for link in paste_links.iter().take(self.max_paste_fetches) {
            if let Some(finding) = self.inspect_paste(link, &handle_lower).await {
                findings.pastes.push(finding);
            }
        }

        findings.matched_variants = matched_variants.into_iter().collect();
        debug!(
            "leak probe: {} signals, {} paste findings",
            findings.signals.len(),
            findings.pastes.len()
        );

        ProbeOutcome::Leaks(findings)
    }
}

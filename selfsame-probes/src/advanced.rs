//! Deep content match against platform profile pages
//!
//! Gated per platform on the basic presence result. Fetches the profile
//! HTML and scores a local match confidence from fixed-weight partial
//! signals: title match, declared-name match (per-platform weight), and
//! bio presence. The sum is clamped to [0, 1] and rounded to two
//! decimals.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use selfsame_core::{AdvancedMatch, ProbeStatus};

use crate::presence::profile_url;
use crate::probe::{Probe, ProbeContext, ProbeOutcome};

/// Weight for the handle appearing in the page title
pub const TITLE_WEIGHT: f64 = 0.3;
/// Weight for a non-empty extracted biography
pub const BIO_WEIGHT: f64 = 0.1;

/// One platform eligible for deep content matching
#[derive(Debug)]
pub struct AdvancedTarget {
    pub platform: &'static str,
    /// Declared-name weight, platform-dependent (0.2 - 0.4)
    pub name_weight: f64,
}

pub const ADVANCED_TARGETS: &[AdvancedTarget] = &[
    AdvancedTarget {
        platform: "github",
        name_weight: 0.4,
    },
    AdvancedTarget {
        platform: "twitter",
        name_weight: 0.3,
    },
    AdvancedTarget {
        platform: "reddit",
        name_weight: 0.2,
    },
];

/// Extracted page signals and their weighted score
struct PageMatch {
    confidence: f64,
    matches: Vec<String>,
    extracted_name: Option<String>,
    extracted_bio: Option<String>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score one profile page against the handle and declared name
fn evaluate_page(html: &str, handle: &str, full_name: &str, name_weight: f64) -> PageMatch {
    let document = Html::parse_document(html);

    let title_selector = Selector::parse("title").expect("static selector");
    let title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let og_title = meta_content(&document, "meta[property=\"og:title\"]");
    let bio = meta_content(&document, "meta[property=\"og:description\"]")
        .or_else(|| meta_content(&document, "meta[name=\"description\"]"));

    let mut score = 0.0;
    let mut matches = Vec::new();

    if !title.is_empty() && title.to_lowercase().contains(&handle.to_lowercase()) {
        score += TITLE_WEIGHT;
        matches.push("title".to_string());
    }

    let declared = og_title.clone().unwrap_or_default();
    if !full_name.is_empty() {
        let name_lower = full_name.to_lowercase();
        if declared.to_lowercase().contains(&name_lower)
            || title.to_lowercase().contains(&name_lower)
        {
            score += name_weight;
            matches.push("name".to_string());
        }
    }

    if bio.as_deref().is_some_and(|b| !b.is_empty()) {
        score += BIO_WEIGHT;
        matches.push("bio".to_string());
    }

    PageMatch {
        confidence: round2(score.min(1.0)),
        matches,
        extracted_name: og_title,
        extracted_bio: bio,
    }
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
}

/// Deep content probe for one platform
pub struct AdvancedMatchProbe {
    target: &'static AdvancedTarget,
    client: Client,
}

impl AdvancedMatchProbe {
    pub fn new(target: &'static AdvancedTarget, client: Client) -> Self {
        Self { target, client }
    }

    fn absent(&self, url: &str, message: &str) -> AdvancedMatch {
        AdvancedMatch {
            exists: false,
            status: ProbeStatus::Error(message.to_string()),
            url: url.to_string(),
            confidence: 0.0,
            extracted_name: None,
            extracted_bio: None,
            matches: Vec::new(),
        }
    }
}

#[async_trait]
impl Probe for AdvancedMatchProbe {
    fn name(&self) -> &'static str {
        self.target.platform
    }

    async fn run(&self, ctx: &ProbeContext) -> ProbeOutcome {
        let url = profile_url(self.target.platform, &ctx.handle)
            .unwrap_or_else(|| format!("https://{}/{}", self.target.platform, ctx.handle));

        let result = match self.client.get(&url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(html) if status == 200 => {
                        let page =
                            evaluate_page(&html, &ctx.handle, &ctx.full_name, self.target.name_weight);
                        debug!(
                            "{} advanced match confidence {}",
                            self.target.platform, page.confidence
                        );
                        AdvancedMatch {
                            exists: true,
                            status: ProbeStatus::Http(status),
                            url,
                            confidence: page.confidence,
                            extracted_name: page.extracted_name,
                            extracted_bio: page.extracted_bio,
                            matches: page.matches,
                        }
                    }
                    Ok(_) => AdvancedMatch {
                        exists: false,
                        status: ProbeStatus::Http(status),
                        url,
                        confidence: 0.0,
                        extracted_name: None,
                        extracted_bio: None,
                        matches: Vec::new(),
                    },
                    Err(e) => self.absent(&url, &e.to_string()),
                }
            }
            Err(e) => {
                debug!("{} advanced fetch failed: {}", self.target.platform, e);
                self.absent(&url, &e.to_string())
            }
        };

        ProbeOutcome::Advanced {
            platform: self.target.platform.to_string(),
            result,
        }
    }
}

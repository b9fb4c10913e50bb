//! Cross-platform username presence checks
//!
//! One bounded-timeout request per platform; existence is inferred from a
//! small whitelist of success-like status codes. Any other code, timeout,
//! or transport error yields `exists = false` with the status recorded
//! for diagnostics.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use selfsame_core::{PresenceResult, ProbeStatus, SUCCESS_STATUS_CODES};

use crate::probe::{Probe, ProbeContext, ProbeOutcome};

/// One external platform checked for the handle
#[derive(Debug)]
pub struct PlatformTarget {
    pub name: &'static str,
    url_template: &'static str,
}

impl PlatformTarget {
    pub fn profile_url(&self, handle: &str) -> String {
        self.url_template.replace("{handle}", handle)
    }
}

/// The fixed platform set probed on every run
pub const PLATFORM_TARGETS: &[PlatformTarget] = &[
    PlatformTarget {
        name: "github",
        url_template: "https://github.com/{handle}",
    },
    PlatformTarget {
        name: "twitter",
        url_template: "https://x.com/{handle}",
    },
    PlatformTarget {
        name: "reddit",
        url_template: "https://www.reddit.com/user/{handle}",
    },
    PlatformTarget {
        name: "tiktok",
        url_template: "https://www.tiktok.com/@{handle}",
    },
    PlatformTarget {
        name: "medium",
        url_template: "https://medium.com/@{handle}",
    },
    PlatformTarget {
        name: "devto",
        url_template: "https://dev.to/{handle}",
    },
];

/// Profile URL for a named platform, if it is in the fixed set
pub fn profile_url(platform: &str, handle: &str) -> Option<String> {
    PLATFORM_TARGETS
        .iter()
        .find(|t| t.name == platform)
        .map(|t| t.profile_url(handle))
}

fn status_indicates_presence(status: u16) -> bool {
    SUCCESS_STATUS_CODES.contains(&status)
}

/// Presence probe for one platform
pub struct PresenceProbe {
    target: &'static PlatformTarget,
    client: Client,
}

impl PresenceProbe {
    pub fn new(target: &'static PlatformTarget, client: Client) -> Self {
        Self { target, client }
    }
}

#[async_trait]
impl Probe for PresenceProbe {
    fn name(&self) -> &'static str {
        self.target.name
    }

    async fn run(&self, ctx: &ProbeContext) -> ProbeOutcome {
        let url = self.target.profile_url(&ctx.handle);

        let result = match self.client.get(&url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!("{} presence HTTP {}", self.target.name, status);
                PresenceResult {
                    exists: status_indicates_presence(status),
                    status: ProbeStatus::Http(status),
                    url,
                }
            }
            Err(e) => {
                debug!("{} presence check failed: {}", self.target.name, e);
                PresenceResult::unreachable(&url, &e.to_string())
            }
        };

        ProbeOutcome::Presence {
            platform: self.target.name.to_string(),
            result,
        }
    }
}

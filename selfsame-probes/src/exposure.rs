//! Unauthenticated private-content exposure checks
//!
//! Two independent requests against endpoints that should demand a
//! session. If either returns profile data without authentication, the
//! target's data is exposed. This probe never raises: transport or parse
//! failures downgrade to "not vulnerable, inconclusive".

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use selfsame_core::ExposureFindings;

use crate::probe::{Probe, ProbeContext, ProbeOutcome};

/// Error marker an unauthenticated caller is supposed to receive
const LOGIN_MARKER: &str = "login_required";

fn legacy_json_url(handle: &str) -> String {
    format!("https://www.instagram.com/{}/?__a=1&__d=dis", handle)
}

fn graphql_url(platform_id: &str) -> String {
    format!("https://i.instagram.com/api/v1/users/{}/info/", platform_id)
}

/// The legacy JSON endpoint leaks when profile fields come back without
/// the expected login error.
fn legacy_json_exposed(status: u16, body: &str) -> bool {
    status == 200 && body.contains("\"full_name\"") && !body.contains(LOGIN_MARKER)
}

/// The mobile info endpoint leaks when a user object comes back without
/// the expected login error.
fn graphql_exposed(status: u16, body: &str) -> bool {
    status == 200 && body.contains("\"user\"") && !body.contains(LOGIN_MARKER)
}

/// Exposure probe; deliberately unauthenticated
pub struct ExposureProbe {
    client: Client,
}

impl ExposureProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, url: &str) -> Option<(u16, String)> {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => Some((status, body)),
                    Err(e) => {
                        debug!("exposure body read failed for {}: {}", url, e);
                        None
                    }
                }
            }
            Err(e) => {
                debug!("exposure request failed for {}: {}", url, e);
                None
            }
        }
    }
}

#[async_trait]
impl Probe for ExposureProbe {
    fn name(&self) -> &'static str {
        "private_content_exposure"
    }

    async fn run(&self, ctx: &ProbeContext) -> ProbeOutcome {
        let mut findings = ExposureFindings::default();

        match self.fetch(&legacy_json_url(&ctx.handle)).await {
            Some((status, body)) => {
                findings.legacy_status = Some(status);
                findings.legacy_json_vulnerable = legacy_json_exposed(status, &body);
            }
            None => findings.inconclusive = true,
        }

        if let Some(platform_id) = &ctx.platform_id {
            match self.fetch(&graphql_url(platform_id)).await {
                Some((status, body)) => {
                    findings.graphql_status = Some(status);
                    findings.graphql_vulnerable = graphql_exposed(status, &body);
                }
                None => findings.inconclusive = true,
            }
        } else {
            findings.inconclusive = true;
        }

        ProbeOutcome::Exposure(findings)
    }
}

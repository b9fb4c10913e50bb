//! Primary-platform identity resolution and profile fetch
//!
//! Resolution maps the handle to the stable opaque platform id. It is
//! the one fatal gate in the pipeline: without the id, several probes
//! cannot run. The profile fetch is best-effort and degrades to an empty
//! profile on any failure.

use reqwest::header::COOKIE;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use selfsame_core::SubjectProfile;
use selfsame_session::Credentials;

/// Web app id header expected by the primary platform
const APP_ID: &str = "936619743392459";

/// Mobile client identity for the user-info endpoint
const MOBILE_USER_AGENT: &str = "Instagram 289.0.0.77.109 Android";

/// Errors from identity resolution; fatal to the investigation
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("response did not contain a user id")]
    MissingId,
}

/// The resolved subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub handle: String,
    /// Opaque, stable across handle renames
    pub platform_id: String,
}

#[derive(Debug, Deserialize)]
struct WebProfileResponse {
    data: Option<WebProfileData>,
}

#[derive(Debug, Deserialize)]
struct WebProfileData {
    user: Option<WebProfileUser>,
}

#[derive(Debug, Deserialize)]
struct WebProfileUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    user: Option<RawUserInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUserInfo {
    full_name: Option<String>,
    biography: Option<String>,
    external_url: Option<String>,
    follower_count: Option<u64>,
    following_count: Option<u64>,
    media_count: Option<u64>,
    is_verified: Option<bool>,
    is_business: Option<bool>,
    is_private: Option<bool>,
    public_email: Option<String>,
    public_phone_number: Option<String>,
    profile_pic_url_hd: Option<String>,
    profile_pic_url: Option<String>,
}

fn parse_platform_id(raw: &str) -> Option<String> {
    let response: WebProfileResponse = serde_json::from_str(raw).ok()?;
    Some(response.data?.user?.id)
}

fn parse_profile(raw: &str) -> Option<SubjectProfile> {
    let response: UserInfoResponse = serde_json::from_str(raw).ok()?;
    let user = response.user?;

    let avatar_url = user
        .profile_pic_url_hd
        .or(user.profile_pic_url)
        .unwrap_or_default();

    Some(SubjectProfile {
        full_name: user.full_name.unwrap_or_default(),
        biography: user.biography.unwrap_or_default(),
        external_url: user.external_url.unwrap_or_default(),
        followers: user.follower_count.unwrap_or(0),
        following: user.following_count.unwrap_or(0),
        posts: user.media_count.unwrap_or(0),
        verified: user.is_verified.unwrap_or(false),
        business: user.is_business.unwrap_or(false),
        private: user.is_private.unwrap_or(false),
        public_email: user.public_email.unwrap_or_default(),
        public_phone: user.public_phone_number.unwrap_or_default(),
        avatar_url,
    })
}

/// Resolve a handle to its stable platform id.
///
/// A single bounded-timeout attempt; callers re-invoke the whole
/// pipeline if they want a retry.
pub async fn resolve_identity(
    client: &Client,
    credentials: &Credentials,
    handle: &str,
) -> Result<ResolvedIdentity, ResolveError> {
    let url = format!(
        "https://www.instagram.com/api/v1/users/web_profile_info/?username={}",
        handle
    );

    let response = client
        .get(&url)
        .header(COOKIE, credentials.cookie_header())
        .header("X-IG-App-ID", APP_ID)
        .header("Referer", "https://www.instagram.com/")
        .send()
        .await?;

    let status = response.status().as_u16();
    debug!("identity resolution HTTP {}", status);
    if status != 200 {
        return Err(ResolveError::Status(status));
    }

    let body = response.text().await?;
    let platform_id = parse_platform_id(&body).ok_or(ResolveError::MissingId)?;

    Ok(ResolvedIdentity {
        handle: handle.to_string(),
        platform_id,
    })
}

/// Fetch the subject's profile facts; empty profile on any failure
pub async fn fetch_profile(
    client: &Client,
    credentials: &Credentials,
    platform_id: &str,
) -> SubjectProfile {
    let url = format!("https://i.instagram.com/api/v1/users/{}/info/", platform_id);

    let response = match client
        .get(&url)
        .header(COOKIE, credentials.cookie_header())
        .header("User-Agent", MOBILE_USER_AGENT)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!("profile fetch failed: {}", e);
            return SubjectProfile::default();
        }
    };

    let status = response.status().as_u16();
    debug!("profile fetch HTTP {}", status);
    if status != 200 {
        return SubjectProfile::default();
    }

    match response.text().await {
        Ok(body) => parse_profile(&body).unwrap_or_else(|| {
            warn!("profile response had no user payload");
            SubjectProfile::default()
        }),
        Err(e) => {
            warn!("profile body read failed: {}", e);
            SubjectProfile::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platform_id() {
        let raw = r#"{"data":{"user":{"id":"1234567890","username":"alice"}}}"#;
        assert_eq!(parse_platform_id(raw), Some("1234567890".to_string()));
    }

    #[test]
    fn test_parse_platform_id_missing_user() {
        assert_eq!(parse_platform_id(r#"{"data":{}}"#), None);
        assert_eq!(parse_platform_id(r#"{"status":"fail"}"#), None);
        assert_eq!(parse_platform_id("not json"), None);
    }

    #[test]
    fn test_parse_profile() {
        let raw = r#"{
            "user": {
                "full_name": "Alice Smith",
                "biography": "coffee and code",
                "external_url": "https://alice.dev",
                "follower_count": 1500,
                "following_count": 200,
                "media_count": 42,
                "is_verified": true,
                "is_private": false,
                "profile_pic_url_hd": "https://cdn.example/hd.jpg?sig=1",
                "profile_pic_url": "https://cdn.example/sd.jpg"
            }
        }"#;

        let profile = parse_profile(raw).unwrap();
        assert_eq!(profile.full_name, "Alice Smith");
        assert_eq!(profile.followers, 1500);
        assert!(profile.verified);
        // HD avatar preferred over the standard one
        assert_eq!(profile.avatar_url, "https://cdn.example/hd.jpg?sig=1");
    }

    #[test]
    fn test_parse_profile_defaults_missing_fields() {
        let profile = parse_profile(r#"{"user":{}}"#).unwrap();
        assert_eq!(profile, SubjectProfile::default());
    }

    #[test]
    fn test_parse_profile_no_user() {
        assert!(parse_profile(r#"{"status":"fail"}"#).is_none());
    }
}

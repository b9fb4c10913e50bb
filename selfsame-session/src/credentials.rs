//! Session credential loading and health check
//!
//! Credentials come from a raw cookie string or a JSON file. Both the
//! plain `{"name": "value"}` map and the browser-export list of
//! `{name, value}` objects are accepted.

use std::collections::BTreeMap;
use std::path::Path;

use reqwest::header::COOKIE;
use reqwest::Client;
use tracing::debug;

use crate::client::SessionError;

/// Endpoint that only renders for an authenticated session
const HEALTH_CHECK_URL: &str = "https://www.instagram.com/accounts/edit/";

/// Cookie-based credentials for the primary platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    cookies: BTreeMap<String, String>,
}

impl Credentials {
    /// Parse a raw `name=value; name2=value2` cookie string
    pub fn from_raw(raw: &str) -> Self {
        let mut cookies = BTreeMap::new();
        for part in raw.split(';') {
            if let Some((name, value)) = part.trim().split_once('=') {
                cookies.insert(name.trim().to_string(), value.trim().to_string());
            }
        }
        Self { cookies }
    }

    /// Load cookies from a JSON file (plain map or browser-export list)
    pub fn from_json_file(path: &Path) -> Result<Self, SessionError> {
        let raw = std::fs::read_to_string(path)?;
        let data: serde_json::Value = serde_json::from_str(&raw)?;

        let mut cookies = BTreeMap::new();
        match data {
            serde_json::Value::Object(map) => {
                for (name, value) in map {
                    if let Some(value) = value.as_str() {
                        cookies.insert(name, value.to_string());
                    }
                }
            }
            serde_json::Value::Array(entries) => {
                for entry in entries {
                    let name = entry.get("name").and_then(|v| v.as_str());
                    let value = entry.get("value").and_then(|v| v.as_str());
                    if let (Some(name), Some(value)) = (name, value) {
                        cookies.insert(name.to_string(), value.to_string());
                    }
                }
            }
            _ => {}
        }

        Ok(Self { cookies })
    }

    /// Prefer the raw string over the file; `None` when neither is given
    pub fn load(raw: Option<&str>, file: Option<&Path>) -> Result<Option<Self>, SessionError> {
        if let Some(raw) = raw {
            let credentials = Self::from_raw(raw);
            if !credentials.is_empty() {
                return Ok(Some(credentials));
            }
        }
        if let Some(file) = file {
            let credentials = Self::from_json_file(file)?;
            if !credentials.is_empty() {
                return Ok(Some(credentials));
            }
        }
        Ok(None)
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Serialize for the `Cookie` request header
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Confirm the primary platform accepts the session cookie.
///
/// Authenticated sessions are not redirected to the login page; anything
/// else (including transport failure) reports an unhealthy credential.
pub async fn check_credential_health(
    client: &Client,
    credentials: &Credentials,
) -> Result<bool, SessionError> {
    let result = client
        .get(HEALTH_CHECK_URL)
        .header(COOKIE, credentials.cookie_header())
        .header("Accept", "text/html")
        .send()
        .await;

    match result {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();
            debug!("credential health check HTTP {}", status);
            Ok(status.as_u16() == 200 && !final_url.contains("login"))
        }
        Err(e) => {
            debug!("credential health check failed: {}", e);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_raw() {
        let credentials = Credentials::from_raw("sessionid=abc123; csrftoken=xyz");
        assert_eq!(
            credentials.cookie_header(),
            "csrftoken=xyz; sessionid=abc123"
        );
    }

    #[test]
    fn test_from_raw_ignores_malformed_parts() {
        let credentials = Credentials::from_raw("sessionid=abc; garbage; =");
        assert_eq!(credentials.cookie_header(), "sessionid=abc");
    }

    #[test]
    fn test_from_json_map() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"sessionid": "abc123"}}"#).unwrap();

        let credentials = Credentials::from_json_file(file.path()).unwrap();
        assert_eq!(credentials.cookie_header(), "sessionid=abc123");
    }

    #[test]
    fn test_from_json_browser_export() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "sessionid", "value": "abc"}}, {{"name": "ds_user_id", "value": "42"}}]"#
        )
        .unwrap();

        let credentials = Credentials::from_json_file(file.path()).unwrap();
        assert_eq!(credentials.cookie_header(), "ds_user_id=42; sessionid=abc");
    }

    #[test]
    fn test_load_prefers_raw() {
        let loaded = Credentials::load(Some("sessionid=raw"), None).unwrap();
        assert_eq!(loaded.unwrap().cookie_header(), "sessionid=raw");
    }

    #[test]
    fn test_load_none_without_sources() {
        assert!(Credentials::load(None, None).unwrap().is_none());
        // An empty raw string carries no usable cookie
        assert!(Credentials::load(Some(""), None).unwrap().is_none());
    }
}

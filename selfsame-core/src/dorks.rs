//! Search-engine dork generation
//!
//! Pure and network-free: fixed templates applied to the handle, its
//! variants, the biography, the resolved id, and avatar URL tokens.
//! Output lists are deduplicated and sorted, so identical reports always
//! produce identical dork sets.

use std::collections::BTreeSet;

use crate::report::{DorkSet, InvestigationReport};

/// Build the Google and Bing dork lists for an assembled report
pub fn generate_dorks(report: &InvestigationReport) -> DorkSet {
    let mut google: BTreeSet<String> = BTreeSet::new();
    let mut bing: BTreeSet<String> = BTreeSet::new();

    let mut usernames: BTreeSet<&str> = BTreeSet::new();
    usernames.insert(report.handle.as_str());
    for variant in &report.username_variants {
        usernames.insert(variant.as_str());
    }

    for u in usernames {
        google.insert(format!("\"{}\" instagram", u));
        google.insert(format!("\"{}\" \"instagram profile\"", u));
        google.insert(format!("site:instagram.com \"{}\"", u));
        google.insert(format!("site:dumpor.com \"{}\"", u));
        google.insert(format!("site:imginn.com \"{}\"", u));
        google.insert(format!("site:picuki.com \"{}\"", u));

        bing.insert(format!("{} instagram profile", u));
        bing.insert(format!("site:dumpor.com {}", u));
        bing.insert(format!("site:imginn.com {}", u));
    }

    if !report.profile.biography.is_empty() {
        google.insert(format!("\"{}\" instagram", report.profile.biography));
        bing.insert(format!("\"{}\" instagram", report.profile.biography));
    }

    // Rare but valuable: the opaque id survives handle renames
    if !report.platform_id.is_empty() {
        google.insert(format!("\"profilePage_{}\"", report.platform_id));
        google.insert(format!("\"{}\" \"instagram\"", report.platform_id));
    }

    for entry in &report.avatar_history {
        if let Some(token) = avatar_token(&entry.url) {
            google.insert(format!("\"{}\" instagram", token));
            bing.insert(format!("\"{}\" instagram", token));
        }
    }

    DorkSet {
        google: google.into_iter().collect(),
        bing: bing.into_iter().collect(),
    }
}

/// Last path segment of an avatar URL, without the query string
fn avatar_token(url: &str) -> Option<&str> {
    let without_query = url.split('?').next().unwrap_or(url);
    let token = without_query.rsplit('/').next()?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::AvatarEntry;

    #[test]
    fn test_bare_handle_produces_exactly_six_google_dorks() {
        // No variants, bio, id, or avatars: six per-username templates only
        let report = InvestigationReport::new("alice");

        let dorks = generate_dorks(&report);
        assert_eq!(dorks.google.len(), 6);
        assert!(dorks.google.contains(&"\"alice\" instagram".to_string()));
        assert!(dorks
            .google
            .contains(&"site:picuki.com \"alice\"".to_string()));

        let mut sorted = dorks.google.clone();
        sorted.sort();
        assert_eq!(dorks.google, sorted);

        assert_eq!(dorks.bing.len(), 3);
    }

    #[test]
    fn test_deterministic_and_deduplicated() {
        let mut report = InvestigationReport::new("alice");
        // A variant equal to the handle must not duplicate queries
        report.username_variants = vec!["alice".to_string(), "alice_".to_string()];

        let first = generate_dorks(&report);
        let second = generate_dorks(&report);
        assert_eq!(first, second);

        let unique: BTreeSet<&String> = first.google.iter().collect();
        assert_eq!(unique.len(), first.google.len());
        assert_eq!(first.google.len(), 12);
    }

    #[test]
    fn test_bio_and_id_dorks() {
        let mut report = InvestigationReport::new("alice");
        report.profile.biography = "coffee and code".to_string();
        report.platform_id = "42424242".to_string();

        let dorks = generate_dorks(&report);
        assert!(dorks
            .google
            .contains(&"\"coffee and code\" instagram".to_string()));
        assert!(dorks
            .google
            .contains(&"\"profilePage_42424242\"".to_string()));
        assert!(dorks
            .bing
            .contains(&"\"coffee and code\" instagram".to_string()));
    }

    #[test]
    fn test_avatar_token_strips_query() {
        assert_eq!(
            avatar_token("https://cdn.example/p/img_77.jpg?x=1&sig=abc"),
            Some("img_77.jpg")
        );
        assert_eq!(avatar_token("https://cdn.example/"), None);
    }

    #[test]
    fn test_avatar_dorks_use_path_token() {
        let mut report = InvestigationReport::new("alice");
        report.avatar_history.push(AvatarEntry {
            fingerprint: "deadbeefdeadbeef".to_string(),
            url: "https://cdn.example/avatars/photo123.jpg?cb=99".to_string(),
        });

        let dorks = generate_dorks(&report);
        assert!(dorks
            .google
            .contains(&"\"photo123.jpg\" instagram".to_string()));
        assert!(dorks.bing.contains(&"\"photo123.jpg\" instagram".to_string()));
    }
}

//! Username variant expansion
//!
//! Variants cover the common decoration habits around a handle
//! (underscore wrapping, dot/underscore stripping). The output is sorted
//! and deduplicated so downstream generation stays deterministic.

use std::collections::BTreeSet;

/// Expand a handle into its plausible variants, sorted and deduplicated
pub fn generate_variants(handle: &str) -> Vec<String> {
    let base = handle.trim_matches('_').replace('.', "");

    let variants: BTreeSet<String> = [
        handle.to_string(),
        base.clone(),
        format!("_{}_", base),
        format!("__{}__", base),
        format!("{}_", base),
        format!("_{}", base),
        handle.replace('.', ""),
        handle.replace('_', ""),
    ]
    .into_iter()
    .collect();

    variants.into_iter().collect()
}

//! Slug derivation for companies, categories and jobs

use unicode_normalization::UnicodeNormalization;

use crate::{Error, Result};

/// Maximum slug length, matching the `VARCHAR(255)` slug columns
pub const MAX_SLUG_LEN: usize = 255;

/// Derive a URL-safe slug from a display name.
///
/// Accented letters are folded to ASCII first ("Café" becomes "cafe");
/// characters with no ASCII decomposition are dropped. Then lowercases,
/// maps every run of non-alphanumeric characters to a single hyphen and
/// trims hyphens from both ends. Apostrophes are dropped so "O'Reilly"
/// becomes "oreilly".
pub fn slugify(name: &str) -> Result<String> {
    let mut slug = String::with_capacity(name.len());
    let mut prev_hyphen = true;
    let folded = name.nfkd().filter(char::is_ascii);
    for ch in folded.filter(|c| *c != '\'') {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        return Err(Error::Validation(
            "Cannot generate valid slug from name".to_string(),
        ));
    }

    let mut slug = slug.to_string();
    if slug.len() > MAX_SLUG_LEN - 8 {
        slug.truncate(MAX_SLUG_LEN - 8);
        slug = slug.trim_end_matches('-').to_string();
    }
    Ok(slug)
}

/// Pick the first free variant of `base` given the slugs already taken:
/// `base`, then `base-2`, `base-3`, ...
pub fn with_suffix(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.iter().any(|s| s == candidate))
        .unwrap_or_else(|| base.to_string())
}

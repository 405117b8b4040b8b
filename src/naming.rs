//! Stored-file naming.
//!
//! Every name the services write is `{stamp}_{token}_…` where `stamp` is the
//! local time to the second and `token` is eight hex characters of a v4
//! UUID, so two requests in the same second with the same upload name still
//! land in different files.

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

/// Used when sanitizing leaves nothing behind.
const EMPTY_NAME: &str = "file";

/// `%Y%m%d_%H%M%S` in local time.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// First eight hex characters of a fresh v4 UUID.
pub fn unique_token() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Replace path separators and anything outside `[A-Za-z0-9._-]` with `_`,
/// then strip leading dots.
pub fn sanitize_filename(name: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(name.trim(), "_");
    let stripped = replaced.trim_start_matches('.');
    if stripped.is_empty() {
        EMPTY_NAME.to_string()
    } else {
        stripped.to_string()
    }
}

/// `true` when `name` is already in sanitized form, i.e. safe to join onto a
/// directory without escaping it.
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty() && sanitize_filename(name) == name
}

/// Stored name for an uploaded file.
pub fn upload_name(original: &str, template: bool) -> String {
    let base = format!("{}_{}_{}", timestamp(), unique_token(), sanitize_filename(original));
    if template {
        format!("template_{base}")
    } else {
        base
    }
}

/// `case_study_{stamp}_{token}`; callers add `.docx` / `.json`.
pub fn case_study_stem() -> String {
    format!("case_study_{}_{}", timestamp(), unique_token())
}

/// Lower-cased extension of `name` (text after the last dot), if any.
pub fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

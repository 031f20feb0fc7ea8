use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateUrl;

use crate::error::ApiError;

/// Longest activity window a client may request, one leap year
pub const MAX_ACTIVITY_DAYS: u32 = 366;

static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid slug regex"));

/// Validate a catalog title slug
///
/// # Examples
/// ```
/// use lcr_api::validation::validate_slug;
///
/// assert!(validate_slug("two-sum").is_ok());
/// assert!(validate_slug("Two Sum").is_err());
/// ```
pub fn validate_slug(slug: &str) -> Result<(), ApiError> {
    if slug.len() > 200 || !SLUG.is_match(slug) {
        return Err(ApiError::Validation(format!(
            "Invalid problem slug: '{slug}'. Use lowercase letters, digits and single hyphens (e.g. 'two-sum')"
        )));
    }

    Ok(())
}

/// Validate a user supplied problem link, which must be absolute http(s)
pub fn validate_problem_url(url: &str) -> Result<(), ApiError> {
    let is_http = url.starts_with("http://") || url.starts_with("https://");

    if !is_http || !url.validate_url() {
        return Err(ApiError::Validation(format!(
            "Invalid problem url: '{url}'. Must be an absolute http or https URL"
        )));
    }

    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::Validation("Title cannot be empty".to_string()));
    }

    Ok(())
}

/// Validate the `days` window of the activity history
pub fn validate_activity_window(days: u32) -> Result<(), ApiError> {
    if !(1..=MAX_ACTIVITY_DAYS).contains(&days) {
        return Err(ApiError::Validation(format!(
            "days must be between 1 and {MAX_ACTIVITY_DAYS}, got {days}"
        )));
    }

    Ok(())
}

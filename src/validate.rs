// src/validate.rs

//! Local pre-submit validation.
//!
//! These checks block a submission before any network call; the server
//! remains authoritative and may still reject what passes here.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::AdminUser;

/// Minimum content body length after trimming.
pub const MIN_BODY_CHARS: usize = 10;

/// Minimum password length.
pub const MIN_PASSWORD_CHARS: usize = 8;

fn image_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp|svg)(\?.*)?$").expect("valid pattern")
    })
}

/// A required text field must be non-blank.
pub fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Password complexity: length, one lowercase letter, one digit.
pub fn password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_CHARS {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::validation(
            "password must contain a lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::validation("password must contain a digit"));
    }
    Ok(())
}

/// Minimal email shape check.
pub fn email(email: &str) -> Result<()> {
    let trimmed = email.trim();
    required("email", trimmed)?;
    if !trimmed.contains('@') || trimmed.starts_with('@') || trimmed.ends_with('@') {
        return Err(AppError::validation("email address is not valid"));
    }
    Ok(())
}

/// Duplicate-email short circuit against the currently loaded admin list.
pub fn no_duplicate_email(admins: &[AdminUser], candidate: &str) -> Result<()> {
    if admins.iter().any(|a| a.email_matches(candidate)) {
        return Err(AppError::validation(format!(
            "an admin with email {} already exists",
            candidate.trim()
        )));
    }
    Ok(())
}

/// Markdown body must be present and long enough to be meaningful.
pub fn content_body(body: &str) -> Result<()> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("content body must not be empty"));
    }
    if trimmed.len() < MIN_BODY_CHARS {
        return Err(AppError::validation(format!(
            "content body must be at least {MIN_BODY_CHARS} characters"
        )));
    }
    Ok(())
}

/// A URL-backed image must be http(s) and end in a raster/vector extension
/// (an optional query string is allowed).
pub fn image_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|_| AppError::validation(format!("invalid image URL: {url}")))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::validation(format!(
            "image URL must be http(s): {url}"
        )));
    }
    if !image_url_pattern().is_match(url) {
        return Err(AppError::validation(format!(
            "image URL must point at an image file (.jpg, .png, .gif, .webp, .svg): {url}"
        )));
    }
    Ok(())
}

//! Normalizers for raw filter values.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::RepoError;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("static regex compiles"));

/// Treat blank values as absent and trim the rest.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Parses a numeric bound, handling `*` as unbounded.
///
/// Blank and `*` yield `Ok(None)`. Anything that does not parse to a finite number is
/// rejected so a malformed bound can never silently empty the result set.
pub fn parse_numeric_bound(field: &str, value: Option<&str>) -> Result<Option<f64>, RepoError> {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed == "*" {
                return Ok(None);
            }
            match trimmed.parse::<f64>() {
                Ok(number) if number.is_finite() => Ok(Some(number)),
                _ => Err(RepoError::invalid(format!("Invalid numeric value for {}: {}", field, trimmed))),
            }
        }
        None => Ok(None),
    }
}

/// Split free text into keyword tokens.
///
/// Runs of two or more whitespace characters collapse to one space, the result is split on
/// single spaces and blank tokens are dropped.
pub fn tokenize_keywords(keywords: &str) -> Vec<String> {
    WHITESPACE_RUN
        .replace_all(keywords, " ")
        .split(' ')
        .filter(|token| !token.trim().is_empty())
        .map(str::to_string)
        .collect()
}

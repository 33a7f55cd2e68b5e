//! Input checks applied before a request reaches the store.
//!
//! Login and rename deliberately use different rules: login only bounds the
//! length, rename also restricts the alphabet.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ApiError;

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 16;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]{3,16}$").expect("username pattern compiles"));

pub fn login_name(name: &str) -> Result<(), ApiError> {
    let len = name.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(ApiError::Validation("Invalid username"));
    }
    Ok(())
}

pub fn username(name: &str) -> Result<(), ApiError> {
    if !USERNAME_PATTERN.is_match(name) {
        return Err(ApiError::Validation("Invalid username"));
    }
    Ok(())
}

pub fn group_name(name: &str) -> Result<(), ApiError> {
    if name.trim().chars().count() < NAME_MIN {
        return Err(ApiError::Validation("Invalid name"));
    }
    Ok(())
}

/// Rejects empty or whitespace-only values.
pub fn required(value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation("Invalid body"));
    }
    Ok(())
}

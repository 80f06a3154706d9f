//! Form checks run before any request leaves the machine

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AuthErrorCode;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub fn validate_email(email: &str) -> Result<(), AuthErrorCode> {
	let email = email.trim();
	if email.is_empty() || !EMAIL_RE.is_match(email) {
		return Err(AuthErrorCode::InvalidEmail);
	}
	Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AuthErrorCode> {
	if password.chars().count() < MIN_PASSWORD_LEN {
		return Err(AuthErrorCode::WeakPassword);
	}
	Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), AuthErrorCode> {
	if name.trim().is_empty() {
		return Err(AuthErrorCode::MissingDisplayName);
	}
	Ok(())
}

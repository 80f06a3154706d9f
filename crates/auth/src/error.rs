use serde::Deserialize;
use strum::{EnumString, IntoStaticStr};

/// Client-facing auth error codes, in the `auth/*` form the web SDK reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum AuthErrorCode {
	#[strum(serialize = "auth/email-already-in-use")]
	EmailAlreadyInUse,
	#[strum(serialize = "auth/invalid-email")]
	InvalidEmail,
	#[strum(serialize = "auth/user-not-found")]
	UserNotFound,
	#[strum(serialize = "auth/wrong-password")]
	WrongPassword,
	#[strum(serialize = "auth/invalid-credential")]
	InvalidCredential,
	#[strum(serialize = "auth/weak-password")]
	WeakPassword,
	#[strum(serialize = "auth/user-disabled")]
	UserDisabled,
	#[strum(serialize = "auth/too-many-requests")]
	TooManyRequests,
	#[strum(serialize = "auth/requires-recent-login")]
	RequiresRecentLogin,
	#[strum(serialize = "auth/user-token-expired")]
	TokenExpired,
	#[strum(serialize = "auth/operation-not-allowed")]
	OperationNotAllowed,
	#[strum(serialize = "auth/missing-display-name")]
	MissingDisplayName,
	#[strum(serialize = "auth/network-request-failed")]
	NetworkRequestFailed,
	#[strum(serialize = "auth/internal-error")]
	Internal,
}

impl AuthErrorCode {
	/// Maps an Identity Toolkit REST error message to a client code.
	///
	/// Messages can carry a suffix (`"WEAK_PASSWORD : Password should be at least 6 characters"`),
	/// so only the leading token is matched.
	pub fn from_rest_message(message: &str) -> Self {
		let token = message
			.split(|c: char| c == ':' || c.is_whitespace())
			.next()
			.unwrap_or_default();

		match token {
			"EMAIL_EXISTS" => Self::EmailAlreadyInUse,
			"INVALID_EMAIL" | "MISSING_EMAIL" => Self::InvalidEmail,
			"EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => Self::UserNotFound,
			"INVALID_PASSWORD" | "MISSING_PASSWORD" => Self::WrongPassword,
			"INVALID_LOGIN_CREDENTIALS" | "INVALID_IDP_RESPONSE" => Self::InvalidCredential,
			"WEAK_PASSWORD" => Self::WeakPassword,
			"USER_DISABLED" => Self::UserDisabled,
			"TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyRequests,
			"CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => Self::RequiresRecentLogin,
			"INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" => Self::TokenExpired,
			"OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" => Self::OperationNotAllowed,
			_ => Self::Internal,
		}
	}

	pub fn as_str(self) -> &'static str {
		self.into()
	}

	pub fn friendly_message(self) -> &'static str {
		match self {
			Self::EmailAlreadyInUse => "An account with this email already exists",
			Self::InvalidEmail => "Please enter a valid email address",
			Self::UserNotFound => "No account found with this email",
			Self::WrongPassword => "Incorrect password",
			Self::InvalidCredential => "Invalid email or password",
			Self::WeakPassword => "Password should be at least 6 characters",
			Self::UserDisabled => "This account has been disabled",
			Self::TooManyRequests => "Too many attempts. Please try again later",
			Self::RequiresRecentLogin => "Please sign in again to complete this action",
			Self::TokenExpired => "Your session has expired. Please sign in again",
			Self::OperationNotAllowed => "This sign-in method is not enabled",
			Self::MissingDisplayName => "Please enter a display name",
			Self::NetworkRequestFailed => "Network error. Check your connection and try again",
			Self::Internal => "Something went wrong. Please try again",
		}
	}
}

impl std::fmt::Display for AuthErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("{}", .0.friendly_message())]
	Auth(AuthErrorCode),
	#[error("{}: {message}", .code.friendly_message())]
	Rejected { code: AuthErrorCode, message: String },
	#[error("{}: {0}", AuthErrorCode::NetworkRequestFailed.friendly_message())]
	Request(#[source] reqwest::Error),
	#[error("firebase api key is not configured")]
	MissingApiKey,
}

impl Error {
	pub fn code(&self) -> AuthErrorCode {
		match self {
			Self::Auth(code) | Self::Rejected { code, .. } => *code,
			Self::Request(_) => AuthErrorCode::NetworkRequestFailed,
			Self::MissingApiKey => AuthErrorCode::OperationNotAllowed,
		}
	}

	pub fn friendly_message(&self) -> &'static str {
		self.code().friendly_message()
	}
}

/// Request URLs carry the API key, so they never make it into the error
impl From<reqwest::Error> for Error {
	fn from(e: reqwest::Error) -> Self {
		Self::Request(e.without_url())
	}
}

impl From<AuthErrorCode> for Error {
	fn from(code: AuthErrorCode) -> Self {
		Self::Auth(code)
	}
}

#[derive(Deserialize)]
pub(crate) struct RestErrorBody {
	pub error: RestError,
}

#[derive(Deserialize)]
pub(crate) struct RestError {
	#[serde(default)]
	pub message: String,
}

impl RestErrorBody {
	pub fn into_error(self) -> Error {
		Error::Rejected {
			code: AuthErrorCode::from_rest_message(&self.error.message),
			message: self.error.message,
		}
	}
}

//! Firebase Auth over its REST surface (Identity Toolkit + Secure Token).
//!
//! Every call validates its form input first, so malformed emails or short
//! passwords never reach the network. Failures come back as [`Error`], whose
//! [`AuthErrorCode`] maps to the same `auth/*` codes and friendly strings the
//! web client shows.

pub mod error;
pub mod validation;

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

pub use error::{AuthErrorCode, Error};

use error::RestErrorBody;

pub const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_TOKEN_URL: &str = "https://securetoken.googleapis.com";

pub struct RequestConfig {
	pub client: reqwest::Client,
	pub auth_url: String,
	pub token_url: String,
	pub api_key: String,
}

impl RequestConfig {
	pub fn new(api_key: impl Into<String>) -> Self {
		Self {
			client: reqwest::Client::new(),
			auth_url: DEFAULT_AUTH_URL.to_string(),
			token_url: DEFAULT_TOKEN_URL.to_string(),
			api_key: api_key.into(),
		}
	}

	pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
		self.auth_url = auth_url.into().trim_end_matches('/').to_string();
		self
	}

	fn accounts_url(&self, method: &str) -> String {
		format!("{}/v1/accounts:{method}?key={}", self.auth_url, self.api_key)
	}
}

/// The signed-in user as far as this client cares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
	pub uid: String,
	pub email: Option<String>,
	pub display_name: Option<String>,
	pub providers: Vec<String>,
	pub id_token: String,
	pub refresh_token: String,
	pub expires_at: DateTime<Utc>,
}

impl AuthUser {
	pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
		now >= self.expires_at
	}

	pub fn label(&self) -> &str {
		self.display_name
			.as_deref()
			.or(self.email.as_deref())
			.unwrap_or(&self.uid)
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
	local_id: String,
	#[serde(default)]
	email: Option<String>,
	#[serde(default)]
	display_name: Option<String>,
	#[serde(default)]
	provider_id: Option<String>,
	id_token: String,
	refresh_token: String,
	expires_in: String,
}

impl TokenResponse {
	fn into_user(self, default_provider: &str) -> AuthUser {
		let seconds = self.expires_in.parse::<i64>().unwrap_or(3600);
		AuthUser {
			uid: self.local_id,
			email: self.email,
			display_name: self.display_name.filter(|name| !name.is_empty()),
			providers: vec![self
				.provider_id
				.unwrap_or_else(|| default_provider.to_string())],
			id_token: self.id_token,
			refresh_token: self.refresh_token,
			expires_at: Utc::now() + Duration::seconds(seconds),
		}
	}
}

async fn post<T: DeserializeOwned>(
	config: &RequestConfig,
	url: String,
	body: serde_json::Value,
) -> Result<T, Error> {
	let response = config.client.post(url).json(&body).send().await?;

	if response.status().is_success() {
		return Ok(response.json::<T>().await?);
	}

	let status = response.status();
	match response.json::<RestErrorBody>().await {
		Ok(body) => Err(body.into_error()),
		Err(_) => Err(Error::Rejected {
			code: AuthErrorCode::Internal,
			message: format!("unexpected status {status}"),
		}),
	}
}

pub mod accounts {
	use super::*;
	use crate::validation::{validate_display_name, validate_email, validate_password};

	const PASSWORD_PROVIDER: &str = "password";
	const GOOGLE_PROVIDER: &str = "google.com";

	pub async fn sign_up(
		config: &RequestConfig,
		email: &str,
		password: &str,
		display_name: Option<&str>,
	) -> Result<AuthUser, Error> {
		validate_email(email)?;
		validate_password(password)?;
		if let Some(name) = display_name {
			validate_display_name(name)?;
		}

		let response: TokenResponse = post(
			config,
			config.accounts_url("signUp"),
			json!({
				"email": email.trim(),
				"password": password,
				"returnSecureToken": true,
			}),
		)
		.await?;

		let user = response.into_user(PASSWORD_PROVIDER);
		info!(uid = %user.uid, "Created account");

		let Some(name) = display_name else {
			return Ok(user);
		};

		// The account exists at this point, so a naming failure keeps its session
		match update_profile(config, &user, name).await {
			Ok(named) => Ok(named),
			Err(e) => {
				warn!(uid = %user.uid, %e, "Account created but setting its display name failed");
				Ok(user)
			}
		}
	}

	pub async fn sign_in(config: &RequestConfig, email: &str, password: &str) -> Result<AuthUser, Error> {
		validate_email(email)?;
		if password.is_empty() {
			return Err(AuthErrorCode::WrongPassword.into());
		}

		let response: TokenResponse = post(
			config,
			config.accounts_url("signInWithPassword"),
			json!({
				"email": email.trim(),
				"password": password,
				"returnSecureToken": true,
			}),
		)
		.await?;

		let user = response.into_user(PASSWORD_PROVIDER);
		info!(uid = %user.uid, "Signed in with email");
		Ok(user)
	}

	/// Exchanges a Google OAuth id token for a Firebase session
	pub async fn sign_in_with_google(
		config: &RequestConfig,
		google_id_token: &str,
		request_uri: &str,
	) -> Result<AuthUser, Error> {
		if google_id_token.trim().is_empty() {
			return Err(AuthErrorCode::InvalidCredential.into());
		}

		let response: TokenResponse = post(
			config,
			config.accounts_url("signInWithIdp"),
			json!({
				"postBody": format!("id_token={}&providerId={GOOGLE_PROVIDER}", google_id_token.trim()),
				"requestUri": request_uri,
				"returnIdpCredential": true,
				"returnSecureToken": true,
			}),
		)
		.await?;

		let user = response.into_user(GOOGLE_PROVIDER);
		info!(uid = %user.uid, "Signed in with Google");
		Ok(user)
	}

	pub async fn send_password_reset(config: &RequestConfig, email: &str) -> Result<(), Error> {
		validate_email(email)?;

		let _: serde_json::Value = post(
			config,
			config.accounts_url("sendOobCode"),
			json!({
				"requestType": "PASSWORD_RESET",
				"email": email.trim(),
			}),
		)
		.await?;

		debug!("Password reset email requested");
		Ok(())
	}

	pub async fn update_profile(
		config: &RequestConfig,
		user: &AuthUser,
		display_name: &str,
	) -> Result<AuthUser, Error> {
		validate_display_name(display_name)?;

		#[derive(Deserialize)]
		#[serde(rename_all = "camelCase")]
		struct UpdateResponse {
			#[serde(default)]
			display_name: Option<String>,
			#[serde(default)]
			email: Option<String>,
		}

		let response: UpdateResponse = post(
			config,
			config.accounts_url("update"),
			json!({
				"idToken": user.id_token,
				"displayName": display_name.trim(),
				"returnSecureToken": false,
			}),
		)
		.await?;

		Ok(AuthUser {
			display_name: response.display_name.or_else(|| Some(display_name.trim().to_string())),
			email: response.email.or_else(|| user.email.clone()),
			..user.clone()
		})
	}

	pub async fn delete_account(config: &RequestConfig, user: &AuthUser) -> Result<(), Error> {
		let _: serde_json::Value = post(
			config,
			config.accounts_url("delete"),
			json!({ "idToken": user.id_token }),
		)
		.await?;

		info!(uid = %user.uid, "Deleted account");
		Ok(())
	}

	pub async fn refresh(config: &RequestConfig, user: &AuthUser) -> Result<AuthUser, Error> {
		#[derive(Deserialize)]
		struct RefreshResponse {
			id_token: String,
			refresh_token: String,
			expires_in: String,
		}

		let response: RefreshResponse = post(
			config,
			format!("{}/v1/token?key={}", config.token_url, config.api_key),
			json!({
				"grant_type": "refresh_token",
				"refresh_token": user.refresh_token,
			}),
		)
		.await?;

		let seconds = response.expires_in.parse::<i64>().unwrap_or(3600);
		Ok(AuthUser {
			id_token: response.id_token,
			refresh_token: response.refresh_token,
			expires_at: Utc::now() + Duration::seconds(seconds),
			..user.clone()
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use tokio::{
		io::{AsyncReadExt, AsyncWriteExt},
		net::{TcpListener, TcpStream},
	};

	#[test]
	fn accounts_url_carries_key() {
		let config = RequestConfig::new("abc").with_auth_url("http://localhost:9099/identitytoolkit/");
		assert_eq!(
			config.accounts_url("signInWithPassword"),
			"http://localhost:9099/identitytoolkit/v1/accounts:signInWithPassword?key=abc"
		);
	}

	#[test]
	fn token_response_becomes_user() {
		let response: TokenResponse = serde_json::from_str(
			r#"{
				"localId": "u1",
				"email": "ada@example.org",
				"displayName": "",
				"idToken": "id",
				"refreshToken": "refresh",
				"expiresIn": "3600"
			}"#,
		)
		.expect("valid token response");

		let user = response.into_user("password");
		assert_eq!(user.uid, "u1");
		assert_eq!(user.display_name, None);
		assert_eq!(user.providers, vec!["password".to_string()]);
		assert_eq!(user.label(), "ada@example.org");
		assert!(!user.is_expired(Utc::now()));
	}

	/// Serves canned JSON responses, picking the first whose path fragment
	/// appears in the request line. Returns the base URL.
	async fn fake_identity_toolkit(routes: Vec<(&'static str, u16, &'static str)>) -> String {
		let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
		let addr = listener.local_addr().expect("local addr");

		tokio::spawn(async move {
			while let Ok((mut socket, _)) = listener.accept().await {
				let routes = routes.clone();
				tokio::spawn(async move {
					let request = read_request(&mut socket).await;
					let request_line = request.lines().next().unwrap_or_default();
					let (status, body) = routes
						.iter()
						.find(|(path, ..)| request_line.contains(path))
						.map_or((404, "{}"), |(_, status, body)| (*status, *body));

					let response = format!(
						"HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
						body.len()
					);
					let _ = socket.write_all(response.as_bytes()).await;
					let _ = socket.shutdown().await;
				});
			}
		});

		format!("http://{addr}")
	}

	async fn read_request(socket: &mut TcpStream) -> String {
		let mut buf = Vec::new();
		let mut chunk = [0u8; 1024];

		loop {
			let n = socket.read(&mut chunk).await.unwrap_or(0);
			if n == 0 {
				break;
			}
			buf.extend_from_slice(&chunk[..n]);

			let text = String::from_utf8_lossy(&buf);
			if let Some(end) = text.find("\r\n\r\n") {
				let content_length = text[..end]
					.lines()
					.filter_map(|line| line.split_once(':'))
					.find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
					.and_then(|(_, value)| value.trim().parse::<usize>().ok())
					.unwrap_or(0);
				if buf.len() >= end + 4 + content_length {
					break;
				}
			}
		}

		String::from_utf8_lossy(&buf).into_owned()
	}

	#[tokio::test]
	async fn sign_up_keeps_the_account_when_naming_fails() {
		let url = fake_identity_toolkit(vec![
			(
				"accounts:signUp",
				200,
				r#"{"localId": "u1", "email": "ada@example.org", "idToken": "id", "refreshToken": "refresh", "expiresIn": "3600"}"#,
			),
			("accounts:update", 400, r#"{"error": {"message": "INVALID_ID_TOKEN"}}"#),
		])
		.await;
		let config = RequestConfig::new("key").with_auth_url(url);

		let user = accounts::sign_up(&config, "ada@example.org", "secret1", Some("Ada"))
			.await
			.expect("account was created");

		assert_eq!(user.uid, "u1");
		assert_eq!(user.display_name, None);
		assert_eq!(user.refresh_token, "refresh");
	}

	#[tokio::test]
	async fn sign_up_sets_display_name() {
		let url = fake_identity_toolkit(vec![
			(
				"accounts:signUp",
				200,
				r#"{"localId": "u1", "email": "ada@example.org", "idToken": "id", "refreshToken": "refresh", "expiresIn": "3600"}"#,
			),
			("accounts:update", 200, r#"{"displayName": "Ada"}"#),
		])
		.await;
		let config = RequestConfig::new("key").with_auth_url(url);

		let user = accounts::sign_up(&config, "ada@example.org", "secret1", Some("Ada"))
			.await
			.expect("signed up");

		assert_eq!(user.label(), "Ada");
	}

	#[tokio::test]
	async fn request_errors_hide_the_api_key() {
		let config = RequestConfig::new("SECRET_KEY_123").with_auth_url("http://127.0.0.1:9");

		let err = accounts::sign_in(&config, "ada@example.org", "secret1")
			.await
			.expect_err("connection refused");

		assert_eq!(err.code(), AuthErrorCode::NetworkRequestFailed);
		assert!(!err.to_string().contains("SECRET_KEY_123"), "{err}");
		assert!(!format!("{err:?}").contains("SECRET_KEY_123"), "{err:?}");
	}

	#[tokio::test]
	async fn invalid_form_never_hits_the_network() {
		// Unroutable URL: any request would fail with a network error instead
		let config = RequestConfig::new("key").with_auth_url("http://127.0.0.1:9");

		let err = accounts::sign_up(&config, "not-an-email", "secret1", None)
			.await
			.expect_err("invalid email");
		assert_eq!(err.code(), AuthErrorCode::InvalidEmail);

		let err = accounts::sign_up(&config, "ada@example.org", "123", None)
			.await
			.expect_err("weak password");
		assert_eq!(err.code(), AuthErrorCode::WeakPassword);
	}
}

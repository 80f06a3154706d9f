use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use clap::Subcommand;
use dialoguer::Password;
use pq_auth::{accounts, AuthUser, RequestConfig};
use serde_json::json;
use tracing::debug;

use crate::{context::Context, session::Session, util::prelude::*};

#[derive(Subcommand, Debug)]
pub enum AuthCmd {
	/// Create an account with email and password
	SignUp {
		email: String,
		/// Display name
		#[arg(long)]
		name: Option<String>,
	},
	/// Sign in with email and password
	SignIn { email: String },
	/// Sign in with a Google ID token
	Google {
		id_token: String,
		#[arg(long, default_value = "http://localhost")]
		request_uri: String,
	},
	/// Email a password reset link
	ResetPassword { email: String },
	/// Change your display name
	UpdateProfile { name: String },
	/// Show who is signed in
	Whoami,
	/// Forget the saved session
	SignOut,
	/// Permanently delete your account
	DeleteAccount {
		#[arg(long, short)]
		yes: bool,
	},
}

pub async fn run(ctx: &Context, cmd: AuthCmd) -> Result<()> {
	let session_path = ctx.config.session_path();

	match cmd {
		AuthCmd::SignUp { email, name } => {
			let config = ctx.auth_config()?;
			let password = Password::new()
				.with_prompt("Password")
				.with_confirmation("Confirm password", "Passwords don't match")
				.interact()?;

			let user = accounts::sign_up(&config, &email, &password, name.as_deref())
				.await
				.map_err(auth_failed)?;
			signed_in(ctx, user)?;
		}
		AuthCmd::SignIn { email } => {
			let config = ctx.auth_config()?;
			let password = Password::new().with_prompt("Password").interact()?;

			let user = accounts::sign_in(&config, &email, &password)
				.await
				.map_err(auth_failed)?;
			signed_in(ctx, user)?;
		}
		AuthCmd::Google {
			id_token,
			request_uri,
		} => {
			let config = ctx.auth_config()?;
			let user = accounts::sign_in_with_google(&config, &id_token, &request_uri)
				.await
				.map_err(auth_failed)?;
			signed_in(ctx, user)?;
		}
		AuthCmd::ResetPassword { email } => {
			let config = ctx.auth_config()?;
			accounts::send_password_reset(&config, &email)
				.await
				.map_err(auth_failed)?;
			print_output!(ctx, &json!({ "sent_to": email }), |_| {
				println!("Password reset email sent to {email}");
			});
		}
		AuthCmd::UpdateProfile { name } => {
			let config = ctx.auth_config()?;
			let user = fresh_user(ctx, &config).await?;
			let user = accounts::update_profile(&config, &user, &name)
				.await
				.map_err(auth_failed)?;

			Session::new(user.clone()).save(&session_path)?;
			print_output!(ctx, &user, |u: &AuthUser| {
				println!("Display name is now {}", u.label());
			});
		}
		AuthCmd::Whoami => {
			let user = ctx.session.as_ref().map(|s| &s.user);
			print_output!(ctx, &user, |u: &Option<&AuthUser>| match u {
				Some(u) => {
					println!("Signed in as {} ({})", u.label(), u.uid);
					if !u.providers.is_empty() {
						println!("Providers: {}", u.providers.join(", "));
					}
				}
				None => println!("Not signed in, using the local profile"),
			});
		}
		AuthCmd::SignOut => {
			Session::clear(&session_path)?;
			print_output!(ctx, &json!({ "signed_in": false }), |_| {
				println!("Signed out");
			});
		}
		AuthCmd::DeleteAccount { yes } => {
			let config = ctx.auth_config()?;
			let user = fresh_user(ctx, &config).await?;
			confirm_or_abort(
				&format!("Permanently delete the account for {}?", user.label()),
				yes,
			)?;

			accounts::delete_account(&config, &user)
				.await
				.map_err(auth_failed)?;
			Session::clear(&session_path)?;
			print_output!(ctx, &json!({ "deleted": user.uid }), |_| {
				println!("Account deleted");
			});
		}
	}
	Ok(())
}

fn signed_in(ctx: &Context, user: AuthUser) -> Result<()> {
	Session::new(user.clone()).save(&ctx.config.session_path())?;
	print_output!(ctx, &user, |u: &AuthUser| {
		println!("Signed in as {}", u.label());
	});
	Ok(())
}

/// The saved user, with its ID token refreshed if it has expired
async fn fresh_user(ctx: &Context, config: &RequestConfig) -> Result<AuthUser> {
	let Some(session) = &ctx.session else {
		bail!("Not signed in. Run `plaques auth sign-in <email>` first");
	};

	if !session.user.is_expired(Utc::now()) {
		return Ok(session.user.clone());
	}

	debug!(uid = %session.user.uid, "Refreshing expired ID token");
	let user = accounts::refresh(config, &session.user)
		.await
		.map_err(auth_failed)?;
	// A refreshed token that can't be saved is still good for this command
	pq_utils::error::report_error(
		&Session::new(user.clone()).save(&ctx.config.session_path()),
		"saving refreshed session",
	);
	Ok(user)
}

fn auth_failed(e: pq_auth::Error) -> anyhow::Error {
	debug!(?e, code = e.code().as_str(), "Auth request failed");
	anyhow!(e.friendly_message())
}

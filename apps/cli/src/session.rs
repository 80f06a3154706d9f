//! Signed-in user, persisted between invocations

use std::{fs, io::Write, path::Path};

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use pq_auth::AuthUser;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
	pub user: AuthUser,
	pub saved_at: DateTime<Utc>,
}

impl Session {
	pub fn new(user: AuthUser) -> Self {
		Self {
			user,
			saved_at: Utc::now(),
		}
	}

	/// A corrupt session file is treated as signed out
	pub fn load(path: &Path) -> Result<Option<Self>> {
		let json = match fs::read_to_string(path) {
			Ok(json) => json,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
		};

		match serde_json::from_str(&json) {
			Ok(session) => Ok(Some(session)),
			Err(e) => {
				warn!(?e, path = %path.display(), "Ignoring unreadable session file");
				Ok(None)
			}
		}
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)?;
		}
		write_private(path, serde_json::to_string_pretty(self)?.as_bytes())
			.with_context(|| format!("failed to write {}", path.display()))?;
		debug!(uid = %self.user.uid, "Saved session");
		Ok(())
	}

	pub fn clear(path: &Path) -> Result<()> {
		match fs::remove_file(path) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
		}
	}
}

/// The session holds refresh tokens, so on unix only the owner may read it
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
	let mut options = fs::OpenOptions::new();
	options.write(true).create(true).truncate(true);

	#[cfg(unix)]
	{
		use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

		options.mode(0o600);
		let mut file = options.open(path)?;
		// `mode` only applies to newly created files
		file.set_permissions(fs::Permissions::from_mode(0o600))?;
		file.write_all(contents)
	}

	#[cfg(not(unix))]
	{
		options.open(path)?.write_all(contents)
	}
}

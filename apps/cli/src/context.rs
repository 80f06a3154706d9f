use anyhow::{bail, Context as _, Result};
use pq_core::{config::AppConfig, domain::LOCAL_USER_ID, Core};

use crate::session::Session;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
	Human,
	Json,
}

pub struct Context {
	pub config: AppConfig,
	pub format: OutputFormat,
	pub session: Option<Session>,
}

impl Context {
	pub fn new(config: AppConfig, format: OutputFormat) -> Result<Self> {
		let session = Session::load(&config.session_path())?;
		Ok(Self {
			config,
			format,
			session,
		})
	}

	/// Signed-in user's id, or the local profile
	pub fn user_id(&self) -> &str {
		self.session
			.as_ref()
			.map_or(LOCAL_USER_ID, |s| s.user.uid.as_str())
	}

	pub async fn core(&self) -> Result<Core> {
		Core::new(self.config.clone()).await.with_context(|| {
			format!(
				"failed to open plaque data (dataset expected at {})",
				self.config.dataset_path().display()
			)
		})
	}

	pub fn auth_config(&self) -> Result<pq_auth::RequestConfig> {
		let Some(api_key) = self.config.firebase.api_key.as_deref() else {
			bail!("No Firebase API key configured. Set FIREBASE_API_KEY or firebase.api_key in the config file");
		};

		Ok(pq_auth::RequestConfig::new(api_key).with_auth_url(&self.config.firebase.auth_url))
	}
}

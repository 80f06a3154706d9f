use anyhow::Result;
use clap::Subcommand;
use pq_core::config::{AppConfig, CONFIG_FILE_NAME};

use crate::{context::Context, util::prelude::*};

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
	/// Show the active configuration
	Show,
	/// Print the config file path
	Path,
}

pub fn run(ctx: &Context, cmd: ConfigCmd) -> Result<()> {
	match cmd {
		ConfigCmd::Show => {
			let mut config = ctx.config.clone();
			config.routing.mapbox_token = config.routing.mapbox_token.as_deref().map(mask);
			config.firebase.api_key = config.firebase.api_key.as_deref().map(mask);

			print_output!(ctx, &config, |c: &AppConfig| {
				let mut t = table(&["Setting", "Value"]);
				let rows = [
					("data_dir", c.data_dir.display().to_string()),
					("dataset", c.dataset_path().display().to_string()),
					("log_level", c.log_level.clone()),
					("log_to_file", c.log_to_file.to_string()),
					("search.max_results", c.search.max_results.to_string()),
					("search.debounce_ms", c.search.debounce_ms.to_string()),
					(
						"routing.mapbox_token",
						c.routing.mapbox_token.clone().unwrap_or_else(|| "(unset)".into()),
					),
					("routing.request_delay_ms", c.routing.request_delay_ms.to_string()),
					("routing.cache_capacity", c.routing.cache_capacity.to_string()),
					("routing.walking_speed_kmh", c.routing.walking_speed_kmh.to_string()),
					(
						"firebase.api_key",
						c.firebase.api_key.clone().unwrap_or_else(|| "(unset)".into()),
					),
				];
				for (key, value) in rows {
					t.add_row(vec![key.to_string(), value]);
				}
				println!("{t}");
			});
		}
		ConfigCmd::Path => {
			let path = ctx.config.data_dir.join(CONFIG_FILE_NAME);
			print_output!(ctx, &path, |p: &std::path::PathBuf| {
				println!("{}", p.display());
			});
		}
	}
	Ok(())
}

/// Keeps the first four characters of a secret
fn mask(secret: &str) -> String {
	let visible: String = secret.chars().take(4).collect();
	format!("{visible}…")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn masks_secrets() {
		assert_eq!(mask("pk.eyJ1Ijoi"), "pk.e…");
		assert_eq!(mask("ab"), "ab…");
	}
}

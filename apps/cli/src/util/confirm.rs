use anyhow::{bail, Result};
use dialoguer::Confirm;

/// Asks before a destructive action unless `yes` was passed
pub fn confirm_or_abort(prompt: &str, yes: bool) -> Result<()> {
	if yes {
		return Ok(());
	}

	let confirmed = Confirm::new()
		.with_prompt(prompt)
		.default(false)
		.interact()?;

	if !confirmed {
		bail!("Aborted");
	}
	Ok(())
}

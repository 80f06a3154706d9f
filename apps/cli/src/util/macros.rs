//! Macros shared by the command handlers

/// Print output in the configured format (human or JSON)
#[macro_export]
macro_rules! print_output {
	($ctx:expr, $output:expr, $human:expr) => {{
		match $ctx.format {
			crate::context::OutputFormat::Human => {
				$human($output);
			}
			crate::context::OutputFormat::Json => {
				crate::util::output::print_json(&$output)?;
			}
		}
	}};
}

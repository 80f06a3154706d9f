use clap::Args;
use pq_core::ops::search::PlaqueSearchInput;

#[derive(Args, Debug)]
pub struct SearchArgs {
	/// Words to search for, e.g. "dickens" or "suffragette camden"
	#[arg(required = true, num_args = 1..)]
	pub query: Vec<String>,

	/// Maximum number of results (defaults to search.max_results)
	#[arg(long, short = 'n')]
	pub limit: Option<usize>,
}

impl SearchArgs {
	pub fn into_input(self, default_limit: usize) -> PlaqueSearchInput {
		PlaqueSearchInput::simple(self.query.join(" ")).with_limit(self.limit.unwrap_or(default_limit))
	}
}

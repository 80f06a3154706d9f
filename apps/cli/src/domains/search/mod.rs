mod args;

use anyhow::Result;
use pq_core::ops::search::{
	input::{is_searchable, MIN_QUERY_LEN},
	PlaqueSearchOutput,
};

use crate::{context::Context, util::prelude::*};

pub use self::args::SearchArgs;

pub async fn run(ctx: &Context, args: SearchArgs) -> Result<()> {
	let core = ctx.core().await?;
	let out = core.search(args.into_input(ctx.config.search.max_results))?;

	print_output!(ctx, &out, |o: &PlaqueSearchOutput| {
		if !is_searchable(&o.query) {
			println!("Type at least {MIN_QUERY_LEN} characters to search");
			return;
		}
		if o.results.is_empty() {
			println!("No plaques match '{}'", o.query);
			return;
		}

		let mut t = table(&["#", "Id", "Plaque", "Where", "Score"]);
		for (i, r) in o.results.iter().enumerate() {
			t.add_row(vec![
				(i + 1).to_string(),
				r.plaque_id.to_string(),
				truncate(&r.title, 48),
				r.subtitle.clone(),
				format!("{:.2}", r.score),
			]);
		}
		println!("{t}");
		println!(
			"Showing {} of {} matches ({} ms)",
			o.results.len(),
			o.total_found,
			o.execution_time_ms
		);
	});
	Ok(())
}

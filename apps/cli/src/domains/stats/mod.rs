use anyhow::Result;
use pq_core::ops::stats::UserStats;

use crate::{context::Context, util::prelude::*};

pub async fn run(ctx: &Context) -> Result<()> {
	let core = ctx.core().await?;
	let stats = core.stats(ctx.user_id()).await?;

	print_output!(ctx, &stats, |s: &UserStats| {
		println!(
			"Visited {} of {} plaques ({:.1}%)",
			s.visited, s.total_plaques, s.visited_percent
		);
		println!("{} visit(s) logged", s.total_visits);
		if let (Some(first), Some(last)) = (s.first_visit, s.last_visit) {
			println!(
				"First on {}, most recent on {}",
				first.format("%-d %b %Y"),
				last.format("%-d %b %Y")
			);
		}
		println!("{} favourite(s), {} collection(s)", s.favorites, s.collections);

		if !s.visits_by_month.is_empty() {
			let mut t = table(&["Month", "Visits"]);
			for (month, count) in &s.visits_by_month {
				t.add_row(vec![month.clone(), count.to_string()]);
			}
			println!("{t}");
		}

		if !s.top_professions.is_empty() {
			let mut t = table(&["Profession", "Plaques visited"]);
			for (profession, count) in &s.top_professions {
				t.add_row(vec![profession.clone(), count.to_string()]);
			}
			println!("{t}");
		}
	});
	Ok(())
}

use anyhow::Result;
use clap::Subcommand;
use pq_core::domain::{Plaque, PlaqueId, Visit};
use serde::Serialize;

use crate::{context::Context, util::prelude::*};

#[derive(Subcommand, Debug)]
pub enum PlaqueCmd {
	/// Show everything known about a plaque
	Show { id: PlaqueId },
}

#[derive(Debug, Serialize)]
struct PlaqueDetails {
	plaque: Plaque,
	favorite: bool,
	visits: Vec<Visit>,
	collections: Vec<String>,
}

pub async fn run(ctx: &Context, cmd: PlaqueCmd) -> Result<()> {
	match cmd {
		PlaqueCmd::Show { id } => {
			let core = ctx.core().await?;
			let user = ctx.user_id();

			let out = PlaqueDetails {
				plaque: core.plaque(id)?.clone(),
				favorite: core.favorites.is_favorite(user, id).await?,
				visits: core.visits.list_for_plaque(user, id).await?,
				collections: core
					.collections
					.containing(user, id)
					.await?
					.into_iter()
					.map(|c| c.name)
					.collect(),
			};

			print_output!(ctx, &out, |o: &PlaqueDetails| {
				let p = &o.plaque;
				println!("{} (#{})", p.title, p.id);

				let rows = [
					("Profession", p.profession.clone()),
					("Address", p.address.clone()),
					("Area", p.location.clone()),
					("Postcode", p.postcode.clone()),
					("Erected", p.erected.map(|y| y.to_string())),
					("Colour", p.color.clone()),
					(
						"Location",
						p.coordinates()
							.map(|c| format!("{:.5}, {:.5}", c.lat, c.lng)),
					),
					(
						"Organisations",
						(!p.organisations.is_empty()).then(|| p.organisations.join(", ")),
					),
				];
				for (label, value) in rows {
					if let Some(value) = value {
						println!("  {label:<14}{value}");
					}
				}

				if let Some(inscription) = &p.inscription {
					println!();
					println!("  \"{}\"", inscription.trim());
				}

				println!();
				println!("  Favourite     {}", if o.favorite { "yes" } else { "no" });
				match o.visits.first() {
					Some(last) => println!(
						"  Visited       {} time(s), last on {}",
						o.visits.len(),
						last.visited_at.format("%-d %b %Y")
					),
					None => println!("  Visited       never"),
				}
				if !o.collections.is_empty() {
					println!("  Collections   {}", o.collections.join(", "));
				}
			});
		}
	}
	Ok(())
}

mod args;

use anyhow::Result;
use clap::Subcommand;
use pq_core::domain::{PlaqueId, Visit};
use uuid::Uuid;

use crate::{context::Context, util::prelude::*};

use self::args::*;

#[derive(Subcommand, Debug)]
pub enum VisitCmd {
	/// Record a visit to a plaque
	Log(VisitLogArgs),
	/// List your visits, newest first
	List {
		/// Only visits to this plaque
		#[arg(long)]
		plaque: Option<PlaqueId>,
	},
	/// Change the date, notes or rating of a visit
	Update(VisitUpdateArgs),
	/// Delete a visit
	Delete { id: Uuid },
}

pub async fn run(ctx: &Context, cmd: VisitCmd) -> Result<()> {
	let core = ctx.core().await?;
	let user = ctx.user_id();

	match cmd {
		VisitCmd::Log(args) => {
			let visit = core.visits.log(user, args.into()).await?;
			let title = core.plaque(visit.plaque_id)?.title.clone();
			print_output!(ctx, &visit, |v: &Visit| {
				println!("Logged visit {} to {}", v.id, title);
			});
		}
		VisitCmd::List { plaque } => {
			let visits = match plaque {
				Some(plaque_id) => core.visits.list_for_plaque(user, plaque_id).await?,
				None => core.visits.list_for_user(user).await?,
			};

			print_output!(ctx, &visits, |visits: &Vec<Visit>| {
				if visits.is_empty() {
					println!("No visits yet");
					return;
				}

				let mut t = table(&["Id", "Date", "Plaque", "Rating", "Notes"]);
				for v in visits {
					let title = core
						.index
						.get(v.plaque_id)
						.map_or_else(|| format!("#{}", v.plaque_id), |p| p.title.clone());
					t.add_row(vec![
						v.id.to_string(),
						v.visited_at.format("%Y-%m-%d").to_string(),
						truncate(&title, 40),
						stars(v.rating),
						truncate(v.notes.as_deref().unwrap_or_default(), 30),
					]);
				}
				println!("{t}");
			});
		}
		VisitCmd::Update(args) => {
			let id = args.id;
			let visit = core.visits.update(user, id, args.into()).await?;
			print_output!(ctx, &visit, |v: &Visit| {
				println!("Updated visit {}", v.id);
			});
		}
		VisitCmd::Delete { id } => {
			core.visits.delete(user, id).await?;
			print_output!(ctx, &serde_json::json!({ "deleted": id }), |_| {
				println!("Deleted visit {id}");
			});
		}
	}
	Ok(())
}

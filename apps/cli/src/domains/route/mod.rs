mod args;

use anyhow::Result;
use clap::Subcommand;
use pq_core::{
	domain::{PlaqueId, Route, RoutePoint},
	ops::routes::{format_distance, format_duration, RoutePlan},
	Core,
};
use uuid::Uuid;

use crate::{context::Context, util::prelude::*};

use self::args::*;

#[derive(Subcommand, Debug)]
pub enum RouteCmd {
	/// Work out a walk between plaques without saving it
	Plan {
		#[arg(required = true, num_args = 2..)]
		plaque_ids: Vec<PlaqueId>,
		/// Reorder stops for a shorter walk, keeping the first one
		#[arg(long)]
		optimize: bool,
	},
	/// Plan a walk and save it
	Save(RouteSaveArgs),
	/// List saved routes
	List,
	/// Show a saved route
	Show { id: Uuid },
	/// Rename a route or change its stops
	Update(RouteUpdateArgs),
	/// Delete a saved route
	Delete {
		id: Uuid,
		#[arg(long, short)]
		yes: bool,
	},
}

pub async fn run(ctx: &Context, cmd: RouteCmd) -> Result<()> {
	let core = ctx.core().await?;
	let user = ctx.user_id();

	if !core.walking.has_provider() {
		tracing::debug!("No Mapbox token configured, distances are estimates");
	}

	match cmd {
		RouteCmd::Plan {
			plaque_ids,
			optimize,
		} => {
			let plan = core.routes.plan(&plaque_ids, optimize).await?;
			print_output!(ctx, &plan, |p: &RoutePlan| {
				print_stops(&core, &p.points);
				println!(
					"Walk: {} · {}",
					format_distance(p.walking.total_distance_km),
					format_duration(p.walking.total_duration_min)
				);
				if p.walking.is_estimated() {
					println!("(straight-line estimate for some legs)");
				}
			});
		}
		RouteCmd::Save(args) => {
			let route = core.routes.create(user, args.into()).await?;
			print_output!(ctx, &route, |r: &Route| {
				println!(
					"Saved route {} ({}): {} stops, {} · {}",
					r.name,
					r.id,
					r.points.len(),
					format_distance(r.total_distance),
					format_duration(r.total_duration)
				);
			});
		}
		RouteCmd::List => {
			let routes = core.routes.list_for_user(user).await?;
			print_output!(ctx, &routes, |routes: &Vec<Route>| {
				if routes.is_empty() {
					println!("No saved routes");
					return;
				}

				let mut t = table(&["Id", "Name", "Stops", "Distance", "Time"]);
				for r in routes {
					t.add_row(vec![
						r.id.to_string(),
						truncate(&r.name, 40),
						r.points.len().to_string(),
						format_distance(r.total_distance),
						format_duration(r.total_duration),
					]);
				}
				println!("{t}");
			});
		}
		RouteCmd::Show { id } => {
			let route = core.routes.get(user, id).await?;
			print_output!(ctx, &route, |r: &Route| {
				println!("{}", r.name);
				if let Some(description) = &r.description {
					println!("{description}");
				}
				print_stops(&core, &r.points);
				println!(
					"Walk: {} · {}",
					format_distance(r.total_distance),
					format_duration(r.total_duration)
				);
			});
		}
		RouteCmd::Update(args) => {
			let id = args.id;
			let route = core.routes.update(user, id, args.into()).await?;
			print_output!(ctx, &route, |r: &Route| {
				println!("Updated route {}", r.name);
			});
		}
		RouteCmd::Delete { id, yes } => {
			let route = core.routes.get(user, id).await?;
			confirm_or_abort(&format!("Delete route '{}'?", route.name), yes)?;
			core.routes.delete(user, id).await?;
			print_output!(ctx, &serde_json::json!({ "deleted": id }), |_| {
				println!("Deleted route {}", route.name);
			});
		}
	}
	Ok(())
}

fn print_stops(core: &Core, points: &[RoutePoint]) {
	let mut t = table(&["#", "Id", "Plaque"]);
	for point in points {
		let title = core
			.index
			.get(point.plaque_id)
			.map_or_else(|| format!("#{}", point.plaque_id), |p| p.title.clone());
		t.add_row(vec![
			(point.order + 1).to_string(),
			point.plaque_id.to_string(),
			truncate(&title, 56),
		]);
	}
	println!("{t}");
}

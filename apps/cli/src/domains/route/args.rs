use clap::Args;
use pq_core::{
	domain::PlaqueId,
	ops::routes::{CreateRouteInput, UpdateRouteInput},
};
use uuid::Uuid;

#[derive(Args, Debug)]
pub struct RouteSaveArgs {
	pub name: String,

	/// Stops in walking order
	#[arg(required = true, num_args = 2..)]
	pub plaque_ids: Vec<PlaqueId>,

	#[arg(long)]
	pub description: Option<String>,

	/// Reorder stops for a shorter walk, keeping the first one
	#[arg(long)]
	pub optimize: bool,
}

impl From<RouteSaveArgs> for CreateRouteInput {
	fn from(args: RouteSaveArgs) -> Self {
		Self {
			name: args.name,
			description: args.description,
			plaque_ids: args.plaque_ids,
			optimize: args.optimize,
		}
	}
}

#[derive(Args, Debug)]
pub struct RouteUpdateArgs {
	pub id: Uuid,

	#[arg(long)]
	pub name: Option<String>,

	#[arg(long)]
	pub description: Option<String>,

	/// Replace the stops
	#[arg(long, value_delimiter = ',')]
	pub plaques: Option<Vec<PlaqueId>>,

	#[arg(long)]
	pub optimize: bool,
}

impl From<RouteUpdateArgs> for UpdateRouteInput {
	fn from(args: RouteUpdateArgs) -> Self {
		Self {
			name: args.name,
			description: args.description,
			plaque_ids: args.plaques,
			optimize: args.optimize,
		}
	}
}

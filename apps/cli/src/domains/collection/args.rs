use clap::Args;
use pq_core::{
	domain::PlaqueId,
	ops::collections::{CreateCollectionInput, UpdateCollectionInput},
};
use uuid::Uuid;

#[derive(Args, Debug)]
pub struct CollectionCreateArgs {
	pub name: String,

	#[arg(long)]
	pub description: Option<String>,

	/// Emoji shown next to the name
	#[arg(long)]
	pub icon: Option<String>,

	/// Hex colour such as #3B82F6
	#[arg(long)]
	pub color: Option<String>,

	/// Plaques to start with
	#[arg(long, value_delimiter = ',')]
	pub plaques: Vec<PlaqueId>,

	/// Tag (repeatable)
	#[arg(long = "tag")]
	pub tags: Vec<String>,

	/// Pin to the top of the list
	#[arg(long)]
	pub favorite: bool,
}

impl From<CollectionCreateArgs> for CreateCollectionInput {
	fn from(args: CollectionCreateArgs) -> Self {
		Self {
			name: args.name,
			description: args.description,
			icon: args.icon,
			color: args.color,
			plaque_ids: args.plaques,
			tags: args.tags,
			is_favorite: args.favorite,
		}
	}
}

#[derive(Args, Debug)]
pub struct CollectionUpdateArgs {
	pub id: Uuid,

	#[arg(long)]
	pub name: Option<String>,

	#[arg(long)]
	pub description: Option<String>,

	#[arg(long)]
	pub icon: Option<String>,

	#[arg(long)]
	pub color: Option<String>,

	/// Replaces all tags
	#[arg(long = "tag")]
	pub tags: Option<Vec<String>>,
}

impl From<CollectionUpdateArgs> for UpdateCollectionInput {
	fn from(args: CollectionUpdateArgs) -> Self {
		Self {
			name: args.name,
			description: args.description,
			icon: args.icon,
			color: args.color,
			tags: args.tags,
			is_public: None,
		}
	}
}

#[derive(Args, Debug)]
pub struct CollectionPlaquesArgs {
	pub id: Uuid,

	#[arg(required = true, num_args = 1..)]
	pub plaque_ids: Vec<PlaqueId>,
}

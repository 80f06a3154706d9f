mod args;

use anyhow::Result;
use clap::Subcommand;
use pq_core::{domain::Collection, Core};
use uuid::Uuid;

use crate::{context::Context, util::prelude::*};

use self::args::*;

#[derive(Subcommand, Debug)]
pub enum CollectionCmd {
	/// Create a collection
	Create(CollectionCreateArgs),
	/// List your collections, favourites first
	List,
	/// Show a collection and its plaques
	Show { id: Uuid },
	/// Rename or restyle a collection
	Update(CollectionUpdateArgs),
	/// Add plaques to a collection
	Add(CollectionPlaquesArgs),
	/// Remove plaques from a collection
	Remove(CollectionPlaquesArgs),
	/// Put the plaques in a new order (must list every plaque once)
	Reorder(CollectionPlaquesArgs),
	/// Pin or unpin a collection
	Favorite { id: Uuid },
	/// Copy a collection
	Duplicate { id: Uuid },
	/// Delete a collection
	Delete {
		id: Uuid,
		/// Don't ask for confirmation
		#[arg(long, short)]
		yes: bool,
	},
}

pub async fn run(ctx: &Context, cmd: CollectionCmd) -> Result<()> {
	let core = ctx.core().await?;
	let user = ctx.user_id();

	match cmd {
		CollectionCmd::Create(args) => {
			let c = core.collections.create(user, args.into()).await?;
			print_output!(ctx, &c, |c: &Collection| {
				println!("Created collection {} {} ({})", c.icon, c.name, c.id);
			});
		}
		CollectionCmd::List => {
			let collections = core.collections.list_for_user(user).await?;
			print_output!(ctx, &collections, |collections: &Vec<Collection>| {
				if collections.is_empty() {
					println!("No collections yet");
					return;
				}

				let mut t = table(&["Id", "", "Name", "Plaques", "Updated"]);
				for c in collections {
					let name = if c.is_favorite {
						format!("{} ★", c.name)
					} else {
						c.name.clone()
					};
					t.add_row(vec![
						c.id.to_string(),
						c.icon.clone(),
						truncate(&name, 40),
						c.plaques.len().to_string(),
						c.updated_at.format("%Y-%m-%d").to_string(),
					]);
				}
				println!("{t}");
			});
		}
		CollectionCmd::Show { id } => {
			let c = core.collections.get(user, id).await?;
			print_output!(ctx, &c, |c: &Collection| print_collection(&core, c));
		}
		CollectionCmd::Update(args) => {
			let id = args.id;
			let c = core.collections.update(user, id, args.into()).await?;
			print_output!(ctx, &c, |c: &Collection| {
				println!("Updated collection {}", c.name);
			});
		}
		CollectionCmd::Add(args) => {
			let c = core
				.collections
				.add_plaques(user, args.id, &args.plaque_ids)
				.await?;
			print_output!(ctx, &c, |c: &Collection| {
				println!("{} now has {} plaque(s)", c.name, c.plaques.len());
			});
		}
		CollectionCmd::Remove(args) => {
			let c = core
				.collections
				.remove_plaques(user, args.id, &args.plaque_ids)
				.await?;
			print_output!(ctx, &c, |c: &Collection| {
				println!("{} now has {} plaque(s)", c.name, c.plaques.len());
			});
		}
		CollectionCmd::Reorder(args) => {
			let c = core
				.collections
				.reorder(user, args.id, args.plaque_ids)
				.await?;
			print_output!(ctx, &c, |c: &Collection| print_collection(&core, c));
		}
		CollectionCmd::Favorite { id } => {
			let c = core.collections.toggle_favorite(user, id).await?;
			print_output!(ctx, &c, |c: &Collection| {
				if c.is_favorite {
					println!("Pinned {}", c.name);
				} else {
					println!("Unpinned {}", c.name);
				}
			});
		}
		CollectionCmd::Duplicate { id } => {
			let c = core.collections.duplicate(user, id).await?;
			print_output!(ctx, &c, |c: &Collection| {
				println!("Created {} ({})", c.name, c.id);
			});
		}
		CollectionCmd::Delete { id, yes } => {
			let c = core.collections.get(user, id).await?;
			confirm_or_abort(&format!("Delete collection '{}'?", c.name), yes)?;
			core.collections.delete(user, id).await?;
			print_output!(ctx, &serde_json::json!({ "deleted": id }), |_| {
				println!("Deleted collection {}", c.name);
			});
		}
	}
	Ok(())
}

fn print_collection(core: &Core, c: &Collection) {
	println!("{} {}", c.icon, c.name);
	if let Some(description) = &c.description {
		println!("{description}");
	}
	if !c.tags.is_empty() {
		println!("Tags: {}", c.tags.join(", "));
	}

	if c.plaques.is_empty() {
		println!("No plaques in this collection");
		return;
	}

	let mut t = table(&["#", "Id", "Plaque", "Where"]);
	for (i, id) in c.plaques.iter().enumerate() {
		let (title, place) = match core.index.get(*id) {
			Some(p) => (
				p.title.clone(),
				p.location
					.clone()
					.or_else(|| p.short_address().map(str::to_string))
					.unwrap_or_default(),
			),
			None => ("(no longer in dataset)".to_string(), String::new()),
		};
		t.add_row(vec![(i + 1).to_string(), id.to_string(), truncate(&title, 48), place]);
	}
	println!("{t}");
}

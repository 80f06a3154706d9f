use anyhow::Result;
use clap::Subcommand;
use pq_core::domain::{Favorite, PlaqueId};
use serde_json::json;

use crate::{context::Context, util::prelude::*};

#[derive(Subcommand, Debug)]
pub enum FavoriteCmd {
	/// Favourite a plaque, or unfavourite it if it already is one
	Toggle { plaque_id: PlaqueId },
	/// List favourite plaques
	List,
}

pub async fn run(ctx: &Context, cmd: FavoriteCmd) -> Result<()> {
	let core = ctx.core().await?;
	let user = ctx.user_id();

	match cmd {
		FavoriteCmd::Toggle { plaque_id } => {
			let favorite = core.favorites.toggle(user, plaque_id).await?;
			let title = core.plaque(plaque_id)?.title.clone();
			let out = json!({ "plaque_id": plaque_id, "favorite": favorite });
			print_output!(ctx, &out, |_| {
				if favorite {
					println!("Added {title} to favourites");
				} else {
					println!("Removed {title} from favourites");
				}
			});
		}
		FavoriteCmd::List => {
			let favorites = core.favorites.list_for_user(user).await?;
			print_output!(ctx, &favorites, |favorites: &Vec<Favorite>| {
				if favorites.is_empty() {
					println!("No favourites yet");
					return;
				}

				let mut t = table(&["Id", "Plaque", "Since"]);
				for f in favorites {
					let title = core
						.index
						.get(f.plaque_id)
						.map_or_else(|| "(unknown plaque)".to_string(), |p| p.title.clone());
					t.add_row(vec![
						f.plaque_id.to_string(),
						truncate(&title, 50),
						f.created_at.format("%Y-%m-%d").to_string(),
					]);
				}
				println!("{t}");
			});
		}
	}
	Ok(())
}

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use pq_core::ops::export::ExportFormat;
use serde_json::json;
use uuid::Uuid;

use crate::{context::Context, util::prelude::*};

#[derive(Args, Debug)]
pub struct ExportArgs {
	pub id: Uuid,

	/// csv, json, geojson, gpx or html
	#[arg(long, short, default_value = "csv")]
	pub format: ExportFormat,

	/// File or directory to write to, named after the title by default
	#[arg(long, short)]
	pub out: Option<PathBuf>,

	/// Print to stdout instead of writing a file
	#[arg(long, conflicts_with = "out")]
	pub stdout: bool,
}

#[derive(Subcommand, Debug)]
pub enum ExportCmd {
	/// Export a collection
	Collection(ExportArgs),
	/// Export a saved route, including its path
	Route(ExportArgs),
}

pub async fn run(ctx: &Context, cmd: ExportCmd) -> Result<()> {
	let core = ctx.core().await?;
	let user = ctx.user_id();

	let (args, is_route) = match cmd {
		ExportCmd::Collection(args) => (args, false),
		ExportCmd::Route(args) => (args, true),
	};

	if args.stdout {
		let contents = if is_route {
			core.export_route(user, args.id, args.format).await?
		} else {
			core.export_collection(user, args.id, args.format).await?
		};
		print!("{contents}");
		return Ok(());
	}

	let dest = args.out.as_deref();
	let path = if is_route {
		core.export_route_to_file(user, args.id, args.format, dest)
			.await?
	} else {
		core.export_collection_to_file(user, args.id, args.format, dest)
			.await?
	};

	let out = json!({
		"path": path,
		"format": args.format,
		"mime_type": args.format.mime_type(),
	});
	print_output!(ctx, &out, |_| {
		println!("Exported {} to {}", args.format, path.display());
	});
	Ok(())
}

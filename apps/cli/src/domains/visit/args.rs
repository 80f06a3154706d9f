use chrono::{DateTime, Utc};
use clap::Args;
use pq_core::{domain::PlaqueId, ops::visits::{LogVisitInput, UpdateVisitInput}};
use uuid::Uuid;

#[derive(Args, Debug)]
pub struct VisitLogArgs {
	pub plaque_id: PlaqueId,

	/// When you visited (RFC 3339), defaults to now
	#[arg(long)]
	pub at: Option<DateTime<Utc>>,

	#[arg(long)]
	pub notes: Option<String>,

	/// 1 to 5
	#[arg(long)]
	pub rating: Option<u8>,

	/// Photo URL or path (repeatable)
	#[arg(long = "photo")]
	pub photos: Vec<String>,
}

impl From<VisitLogArgs> for LogVisitInput {
	fn from(args: VisitLogArgs) -> Self {
		Self {
			plaque_id: args.plaque_id,
			visited_at: args.at,
			notes: args.notes,
			rating: args.rating,
			photos: args.photos,
		}
	}
}

#[derive(Args, Debug)]
pub struct VisitUpdateArgs {
	pub id: Uuid,

	#[arg(long)]
	pub at: Option<DateTime<Utc>>,

	#[arg(long)]
	pub notes: Option<String>,

	#[arg(long)]
	pub rating: Option<u8>,
}

impl From<VisitUpdateArgs> for UpdateVisitInput {
	fn from(args: VisitUpdateArgs) -> Self {
		Self {
			visited_at: args.at,
			notes: args.notes,
			rating: args.rating,
			photos: None,
		}
	}
}

mod context;
mod domains;
mod logging;
mod session;
mod util;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pq_core::config::{default_data_dir, AppConfig};

use crate::{
	context::{Context, OutputFormat},
	domains::{
		auth::AuthCmd, collection::CollectionCmd, config::ConfigCmd, export::ExportCmd,
		favorite::FavoriteCmd, plaque::PlaqueCmd, route::RouteCmd, search::SearchArgs,
		visit::VisitCmd,
	},
};

#[derive(Parser, Debug)]
#[command(name = "plaques", version, about = "Find, collect and walk London's historic plaques")]
struct Cli {
	/// Path to the plaques data directory
	#[arg(long, global = true)]
	data_dir: Option<std::path::PathBuf>,

	/// Output format
	#[arg(long, value_enum, default_value = "human", global = true)]
	format: OutputFormat,

	/// Also append logs to <data_dir>/logs/plaques.log
	#[arg(long, global = true, default_value_t = false)]
	log_file: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Search plaques by name, profession, place or inscription
	Search(SearchArgs),
	/// Plaque details
	#[command(subcommand)]
	Plaque(PlaqueCmd),
	/// Log and review visits
	#[command(subcommand)]
	Visit(VisitCmd),
	/// Favourite plaques
	#[command(subcommand)]
	Favorite(FavoriteCmd),
	/// Collections of plaques
	#[command(subcommand)]
	Collection(CollectionCmd),
	/// Walking routes
	#[command(subcommand)]
	Route(RouteCmd),
	/// Export a collection or route
	#[command(subcommand)]
	Export(ExportCmd),
	/// Your visiting statistics
	Stats,
	/// Account management
	#[command(subcommand)]
	Auth(AuthCmd),
	/// Configuration
	#[command(subcommand)]
	Config(ConfigCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let data_dir = match cli.data_dir {
		Some(dir) => dir,
		None => default_data_dir()?,
	};
	let config = AppConfig::load_from(&data_dir)?;
	let _log_guard = logging::init(&config, cli.log_file)?;

	let ctx = Context::new(config, cli.format)?;

	match cli.command {
		Commands::Search(args) => domains::search::run(&ctx, args).await,
		Commands::Plaque(cmd) => domains::plaque::run(&ctx, cmd).await,
		Commands::Visit(cmd) => domains::visit::run(&ctx, cmd).await,
		Commands::Favorite(cmd) => domains::favorite::run(&ctx, cmd).await,
		Commands::Collection(cmd) => domains::collection::run(&ctx, cmd).await,
		Commands::Route(cmd) => domains::route::run(&ctx, cmd).await,
		Commands::Export(cmd) => domains::export::run(&ctx, cmd).await,
		Commands::Stats => domains::stats::run(&ctx).await,
		Commands::Auth(cmd) => domains::auth::run(&ctx, cmd).await,
		Commands::Config(cmd) => domains::config::run(&ctx, cmd),
	}
}

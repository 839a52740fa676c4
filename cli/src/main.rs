use {
	anyhow::{Context, Result},
	chrono::SecondsFormat,
	clap::{Args, Parser, Subcommand},
	std::path::PathBuf,
	tracing_subscriber::EnvFilter,
	wl_check::{
		lookup,
		lookup::looks_like_pubkey,
		projects::{known_projects, resolve_all},
		refresh, resolve, Config, LookupOutcome, ProjectInfo, SnapshotStore,
	},
};

#[derive(Parser, Debug)]
#[command(version, about = "Check wallet addresses against the whitelist snapshot")]
struct Cli {
	#[command(flatten)]
	source: SourceArgs,
	/// Print machine readable JSON
	#[arg(long, global = true)]
	json: bool,
	#[command(subcommand)]
	cmd: Commands,
}

#[derive(Args, Debug)]
struct SourceArgs {
	/// Local snapshot file to use instead of the bundled one
	#[arg(short, long, global = true, env = "WL_SNAPSHOT")]
	snapshot: Option<PathBuf>,
	/// Deployment base URL to refresh the snapshot from before answering
	#[arg(short, long, global = true, env = "WL_BASE_URL")]
	base_url: Option<String>,
	/// Snapshot path relative to the base URL
	#[arg(long, global = true, default_value = wl_check::config::DEFAULT_SNAPSHOT_PATH)]
	path: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Look up the projects a wallet is whitelisted for
	Lookup {
		#[arg(default_value = "")]
		wallet: String,
	},
	/// Show the display name, icon and links of a project
	Project { id: String },
	/// List projects with known metadata
	Projects,
	/// Summarise the snapshot in use
	Stats,
}

impl SourceArgs {
	fn config(&self) -> Config {
		let mut config = Config {
			snapshot_file: self.snapshot.clone(),
			..Default::default()
		};
		config.refresh.base_url = self.base_url.clone();
		config.refresh.path = self.path.clone();
		config
	}

	async fn load(&self) -> Result<SnapshotStore> {
		let config = self.config();
		let store = config.initial_store().context("Unable to load snapshot")?;
		if let Some(client) = config
			.snapshot_client()
			.context("Unable to build snapshot client")?
		{
			// A failed refresh is logged and the loaded snapshot is kept
			refresh(&store, &client).await;
		}
		Ok(store)
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		)
		.init();

	let args = Cli::parse();

	match args.cmd {
		Commands::Lookup { wallet } => {
			let store = args.source.load().await?;
			let outcome = lookup(&store.current(), &wallet);
			if args.json {
				println!("{}", serde_json::to_string_pretty(&outcome.report(None))?);
			} else {
				print_outcome(&outcome);
			}
		}
		Commands::Project { id } => {
			let info = resolve(&id);
			if args.json {
				println!("{}", serde_json::to_string_pretty(&info)?);
			} else {
				print_project(&info);
			}
		}
		Commands::Projects => {
			let infos = resolve_all(&known_projects());
			if args.json {
				println!("{}", serde_json::to_string_pretty(&infos)?);
			} else {
				infos.iter().for_each(print_project);
			}
		}
		Commands::Stats => {
			let store = args.source.load().await?;
			let snapshot = store.current();
			let refreshed_at = store
				.refreshed_at()
				.map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true));
			if args.json {
				let stats = serde_json::json!({
					"entries": snapshot.len(),
					"source": store.source(),
					"refreshedAt": refreshed_at,
					"inconsistent": snapshot.inconsistent_entries(),
				});
				println!("{}", serde_json::to_string_pretty(&stats)?);
			} else {
				println!("Source: {}", store.source());
				println!("Addresses: {}", snapshot.len());
				if let Some(at) = refreshed_at {
					println!("Refreshed: {}", at);
				}
				for address in snapshot.inconsistent_entries() {
					println!("Inconsistent entry: {}", address);
				}
			}
		}
	}
	Ok(())
}

fn print_outcome(outcome: &LookupOutcome) {
	let result = match outcome {
		LookupOutcome::NoQuery => {
			println!("No wallet address given");
			return;
		}
		LookupOutcome::Checked(result) => result,
	};

	if !looks_like_pubkey(&result.address) {
		eprintln!("Note: {} is not a valid Solana address", result.address);
	}

	if result.is_listed() {
		println!(
			"{} is whitelisted for {} project(s):",
			result.address, result.total
		);
		for info in resolve_all(&result.projects) {
			println!("  - {} ({})", info.name, info.id);
		}
	} else {
		println!("{} is not on the whitelist", result.address);
	}
}

fn print_project(info: &ProjectInfo) {
	println!("{} ({})", info.name, info.id);
	println!("  Icon: {}", info.icon_or_fallback());
	if let Some(site) = info.links.site {
		println!("  Site: {}", site);
	}
	if let Some(social) = info.links.social {
		println!("  Social: {}", social);
	}
}

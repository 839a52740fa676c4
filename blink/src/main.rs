mod handlers;
mod monitor;
mod server;

use {
	anyhow::{Context, Result},
	clap::Parser,
	server::Server,
	std::path::PathBuf,
	tracing_subscriber::{fmt, prelude::*, EnvFilter},
	wl_check::Config,
};

/// Serves whitelist lookups over HTTP
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
	/// JSON configuration file, flags override its values
	#[arg(short, long, env = "WL_CONFIG")]
	config: Option<PathBuf>,
	#[arg(long, env = "WL_HOST")]
	host: Option<String>,
	#[arg(short, long, env = "WL_PORT")]
	port: Option<u16>,
	/// Local snapshot to serve instead of the bundled one
	#[arg(short, long, env = "WL_SNAPSHOT")]
	snapshot: Option<PathBuf>,
	/// Deployment base URL the snapshot is refreshed from at startup
	#[arg(short, long, env = "WL_BASE_URL")]
	base_url: Option<String>,
	/// Snapshot path relative to the base URL
	#[arg(long, env = "WL_SNAPSHOT_PATH")]
	path: Option<String>,
	#[arg(long)]
	no_refresh: bool,
	/// Public address of the lookup page, used for share links
	#[arg(long, env = "WL_PUBLIC_URL")]
	public_url: Option<String>,
	/// Disable the live request monitor
	#[arg(short, long)]
	quiet: bool,
}

impl Cli {
	fn into_config(self) -> Result<Config> {
		let mut config = match &self.config {
			Some(path) => Config::from_file(path)
				.with_context(|| format!("Unable to read config {}", path.display()))?,
			None => Config::default(),
		};

		if let Some(host) = self.host {
			config.server.host = host;
		}
		if let Some(port) = self.port {
			config.server.port = port;
		}
		if self.snapshot.is_some() {
			config.snapshot_file = self.snapshot;
		}
		if self.base_url.is_some() {
			config.refresh.base_url = self.base_url;
		}
		if let Some(path) = self.path {
			config.refresh.path = path;
		}
		if self.no_refresh {
			config.refresh.enabled = false;
		}
		if let Some(public_url) = self.public_url {
			config.public_url = public_url;
		}
		Ok(config)
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::registry()
		.with(fmt::layer())
		.with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
		.init();

	let args = Cli::parse();
	let quiet = args.quiet;
	let config = args.into_config()?;

	Server::new(&config, !quiet).await?.run().await
}

use {
	crate::{
		error::{CheckerError, Result},
		refresh::SnapshotClient,
		state::Snapshot,
		store::{SnapshotSource, SnapshotStore},
	},
	reqwest::Url,
	serde::{Deserialize, Serialize},
	std::path::{Path, PathBuf},
};

pub const DEFAULT_SNAPSHOT_PATH: &str = "whitelist.json";

/// Runtime configuration shared by the server and the CLI
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	pub server: ServerConfig,
	pub refresh: RefreshConfig,
	/// Local snapshot used instead of the bundled one
	pub snapshot_file: Option<PathBuf>,
	/// Address the lookup page is reachable at, used for share links
	pub public_url: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshConfig {
	pub enabled: bool,
	pub base_url: Option<String>,
	pub path: String,
}

impl Default for ServerConfig {
	fn default() -> Self {
		ServerConfig {
			host: "127.0.0.1".to_string(),
			port: 8080,
		}
	}
}

impl Default for RefreshConfig {
	fn default() -> Self {
		RefreshConfig {
			enabled: true,
			base_url: None,
			path: DEFAULT_SNAPSHOT_PATH.to_string(),
		}
	}
}

impl Default for Config {
	fn default() -> Self {
		Config {
			server: ServerConfig::default(),
			refresh: RefreshConfig::default(),
			snapshot_file: None,
			public_url: "http://127.0.0.1:8080/".to_string(),
		}
	}
}

impl Config {
	pub fn from_file(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)?;
		Ok(serde_json::from_str(&content)?)
	}

	pub fn server_addr(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	pub fn public_url(&self) -> Result<Url> {
		Url::parse(&self.public_url).map_err(|err| {
			CheckerError::Config(format!("publicUrl `{}`: {}", self.public_url, err))
		})
	}

	/// Client for the startup refresh, `None` when refreshing is off or no
	/// base URL is configured
	pub fn snapshot_client(&self) -> Result<Option<SnapshotClient>> {
		match (&self.refresh.base_url, self.refresh.enabled) {
			(Some(base_url), true) => {
				SnapshotClient::new(base_url, &self.refresh.path).map(Some)
			}
			_ => Ok(None),
		}
	}

	/// Store seeded from `snapshot_file` if set, otherwise the bundled data
	pub fn initial_store(&self) -> Result<SnapshotStore> {
		match &self.snapshot_file {
			Some(path) => {
				let data = std::fs::read(path)?;
				let snapshot = Snapshot::from_json(&data)?;
				tracing::info!(
					"Loaded snapshot with {} addresses from {}",
					snapshot.len(),
					path.display()
				);
				Ok(SnapshotStore::new(
					snapshot,
					SnapshotSource::File(path.clone()),
				))
			}
			None => Ok(SnapshotStore::bundled()),
		}
	}
}

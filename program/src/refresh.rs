use {
	crate::{
		error::{CheckerError, Result},
		state::Snapshot,
		store::{SnapshotSource, SnapshotStore},
	},
	reqwest::{
		header::{CACHE_CONTROL, PRAGMA},
		Client, Url,
	},
	std::sync::Arc,
	tokio::task::JoinHandle,
};

/// Fetches fresh snapshots from the deployment serving the whitelist
#[derive(Clone, Debug)]
pub struct SnapshotClient {
	client: Client,
	url: Url,
}

impl SnapshotClient {
	/// `path` is resolved against `base_url` the way a browser resolves a
	/// relative link, so a base without a trailing slash drops its last
	/// segment.
	pub fn new(base_url: &str, path: &str) -> Result<Self> {
		let base = Url::parse(base_url)
			.map_err(|err| CheckerError::InvalidUrl(format!("{}: {}", base_url, err)))?;
		let url = base
			.join(path)
			.map_err(|err| CheckerError::InvalidUrl(format!("{}: {}", path, err)))?;
		Ok(SnapshotClient {
			client: Client::new(),
			url,
		})
	}

	pub fn url(&self) -> &Url {
		&self.url
	}

	pub async fn fetch(&self) -> Result<Snapshot> {
		let response = self
			.client
			.get(self.url.clone())
			.header(CACHE_CONTROL, "no-cache")
			.header(PRAGMA, "no-cache")
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(CheckerError::Status(status.as_u16()));
		}

		let body = response.bytes().await?;
		Snapshot::from_json(&body)
	}
}

/// Replaces the store's snapshot with a freshly fetched one
///
/// On failure the current snapshot stays in place and the error is only
/// logged. Returns whether the snapshot was replaced.
pub async fn refresh(store: &SnapshotStore, client: &SnapshotClient) -> bool {
	store.set_loading(true);
	let replaced = match client.fetch().await {
		Ok(snapshot) => {
			tracing::info!(
				"Loaded snapshot with {} addresses from {}",
				snapshot.len(),
				client.url()
			);
			store.replace(snapshot, SnapshotSource::Remote(client.url().to_string()));
			true
		}
		Err(err) => {
			tracing::warn!(
				"Snapshot refresh from {} failed, keeping {} data: {}",
				client.url(),
				store.source(),
				err
			);
			false
		}
	};
	store.set_loading(false);
	replaced
}

/// Runs a single `refresh` in the background
///
/// The loading flag is raised before this returns, so callers observe it
/// even if the task has not been polled yet.
pub fn spawn_refresh(store: Arc<SnapshotStore>, client: SnapshotClient) -> JoinHandle<bool> {
	store.set_loading(true);
	tokio::spawn(async move { refresh(&store, &client).await })
}

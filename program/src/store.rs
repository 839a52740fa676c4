use {
	crate::state::Snapshot,
	chrono::{DateTime, Utc},
	serde::Serialize,
	std::{
		fmt,
		path::PathBuf,
		sync::{
			atomic::{AtomicBool, Ordering},
			Arc, RwLock,
		},
	},
};

/// Where the snapshot currently being served came from
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "camelCase")]
pub enum SnapshotSource {
	Bundled,
	File(PathBuf),
	Remote(String),
}

impl fmt::Display for SnapshotSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SnapshotSource::Bundled => write!(f, "bundled"),
			SnapshotSource::File(path) => write!(f, "file {}", path.display()),
			SnapshotSource::Remote(url) => write!(f, "remote {}", url),
		}
	}
}

struct Installed {
	snapshot: Arc<Snapshot>,
	source: SnapshotSource,
	refreshed_at: Option<DateTime<Utc>>,
}

/// Holds the whitelist currently served to lookups
///
/// There is a single writer, the startup refresher, which swaps the whole
/// snapshot. Readers take an `Arc` to the snapshot that was current when they
/// asked and are never affected by a later swap.
pub struct SnapshotStore {
	installed: RwLock<Installed>,
	loading: AtomicBool,
}

impl SnapshotStore {
	pub fn new(snapshot: Snapshot, source: SnapshotSource) -> Self {
		warn_inconsistent(&snapshot, &source);
		SnapshotStore {
			installed: RwLock::new(Installed {
				snapshot: Arc::new(snapshot),
				source,
				refreshed_at: None,
			}),
			loading: AtomicBool::new(false),
		}
	}

	pub fn bundled() -> Self {
		Self::new(Snapshot::bundled(), SnapshotSource::Bundled)
	}

	pub fn current(&self) -> Arc<Snapshot> {
		Arc::clone(&self.read().snapshot)
	}

	pub fn source(&self) -> SnapshotSource {
		self.read().source.clone()
	}

	pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
		self.read().refreshed_at
	}

	pub fn is_loading(&self) -> bool {
		self.loading.load(Ordering::Acquire)
	}

	pub(crate) fn set_loading(&self, loading: bool) {
		self.loading.store(loading, Ordering::Release);
	}

	pub(crate) fn replace(&self, snapshot: Snapshot, source: SnapshotSource) {
		warn_inconsistent(&snapshot, &source);
		let snapshot = Arc::new(snapshot);
		let mut installed = self
			.installed
			.write()
			.unwrap_or_else(|poisoned| poisoned.into_inner());
		*installed = Installed {
			snapshot,
			source,
			refreshed_at: Some(Utc::now()),
		};
	}

	fn read(&self) -> std::sync::RwLockReadGuard<'_, Installed> {
		// Writers never panic while holding the lock, the data is always whole
		self.installed
			.read()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

impl Default for SnapshotStore {
	fn default() -> Self {
		Self::bundled()
	}
}

fn warn_inconsistent(snapshot: &Snapshot, source: &SnapshotSource) {
	let inconsistent = snapshot.inconsistent_entries();
	if !inconsistent.is_empty() {
		tracing::warn!(
			"Snapshot from {} has {} entries where totalProjects differs from the project list",
			source,
			inconsistent.len()
		);
	}
}

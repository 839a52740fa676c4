use {
	crate::{
		handlers::*,
		monitor::{CounterMessage, Monitor},
	},
	anyhow::{anyhow, Context, Result},
	axum::{
		http::{
			header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE},
			Method,
		},
		routing::get,
		Router,
	},
	std::sync::Arc,
	tokio::{net::TcpListener, sync::mpsc},
	tower_http::{
		cors::{Any, CorsLayer},
		trace::TraceLayer,
	},
	wl_check::{spawn_refresh, Config, SnapshotClient, SnapshotStore, Url},
};

pub(crate) struct AppState {
	pub(crate) store: Arc<SnapshotStore>,
	pub(crate) public_url: Url,
	pub(crate) counter_tx: mpsc::Sender<CounterMessage>,
}

impl AppState {
	pub fn new(
		store: Arc<SnapshotStore>,
		public_url: Url,
		counter_tx: mpsc::Sender<CounterMessage>,
	) -> Self {
		AppState {
			store,
			public_url,
			counter_tx,
		}
	}

	/// Monitor updates are best effort, a full channel drops the count
	pub(crate) fn count(&self, message: CounterMessage) {
		let _ = self.counter_tx.try_send(message);
	}
}

pub(crate) fn router(state: Arc<AppState>) -> Router {
	let cors = CorsLayer::new()
		.allow_methods([Method::GET, Method::OPTIONS])
		.allow_headers([CONTENT_TYPE, CONTENT_ENCODING, ACCEPT_ENCODING])
		.allow_origin(Any);

	Router::new()
		.route("/health", get(health_handler))
		.route("/api/lookup", get(lookup_handler))
		.route("/api/projects/:id", get(project_handler))
		.route("/api/snapshot", get(snapshot_handler))
		.route("/api/info", get(info_handler))
		.layer(cors)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

pub struct Server {
	app: Router,
	listener: TcpListener,
	monitor: Option<Monitor>,
	store: Arc<SnapshotStore>,
	refresh_client: Option<SnapshotClient>,
}

impl Server {
	pub async fn new(config: &Config, show_monitor: bool) -> Result<Self> {
		let (counter_tx, counter_rx) = mpsc::channel(1024);

		let store = Arc::new(
			config
				.initial_store()
				.context("Could not load initial snapshot")?,
		);
		let refresh_client = config
			.snapshot_client()
			.context("Invalid refresh configuration")?;
		let public_url = config.public_url()?;

		let state = Arc::new(AppState::new(Arc::clone(&store), public_url, counter_tx));
		let app = router(state);

		let monitor = show_monitor.then(|| Monitor::new(counter_rx));

		let addr = config.server_addr();
		let listener = TcpListener::bind(&addr)
			.await
			.with_context(|| format!("Could not bind to {}", addr))?;

		Ok(Server {
			app,
			listener,
			monitor,
			store,
			refresh_client,
		})
	}

	pub async fn run(self) -> Result<()> {
		if let Some(monitor) = self.monitor {
			tokio::spawn(monitor.run());
		}

		// Lookups are served from the current snapshot while this runs
		match self.refresh_client {
			Some(client) => {
				tracing::info!("Refreshing snapshot from {}", client.url());
				spawn_refresh(Arc::clone(&self.store), client);
			}
			None => tracing::info!("Snapshot refresh disabled, serving {}", self.store.source()),
		}

		if let Ok(addr) = self.listener.local_addr() {
			tracing::info!("Whitelist checker listening on http://{}", addr);
		}

		axum::serve(self.listener, self.app)
			.await
			.map_err(|e| anyhow!("Could not start server: {}", e))
	}
}

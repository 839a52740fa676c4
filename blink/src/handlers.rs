use {
	crate::{monitor::CounterMessage, server::AppState},
	axum::{
		extract::{Json, Path, Query, State},
		response::IntoResponse,
	},
	chrono::{DateTime, Utc},
	serde::{Deserialize, Serialize},
	serde_json::json,
	std::sync::Arc,
	wl_check::{
		lookup,
		projects::{known_projects, resolve_all},
		resolve, LookupReport, ProjectInfo, SnapshotSource,
	},
};

pub(crate) async fn health_handler() -> impl IntoResponse {
	"Whitelist checker is running"
}

#[derive(Deserialize)]
pub(crate) struct LookupParams {
	wallet: Option<String>,
}

pub(crate) async fn lookup_handler(
	State(state): State<Arc<AppState>>,
	Query(params): Query<LookupParams>,
) -> Json<LookupReport> {
	let raw = params.wallet.unwrap_or_default();
	let outcome = lookup(&state.store.current(), &raw);
	state.count(match outcome.result() {
		None => CounterMessage::NoQuery,
		Some(result) if result.is_listed() => CounterMessage::Listed,
		Some(_) => CounterMessage::Unlisted,
	});
	Json(outcome.report(Some(&state.public_url)))
}

pub(crate) async fn project_handler(
	State(state): State<Arc<AppState>>,
	Path(id): Path<String>,
) -> Json<ProjectInfo> {
	state.count(CounterMessage::Project);
	Json(resolve(&id))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SnapshotStatus {
	entries: usize,
	loading: bool,
	source: SnapshotSource,
	refreshed_at: Option<DateTime<Utc>>,
	inconsistent: usize,
}

pub(crate) async fn snapshot_handler(State(state): State<Arc<AppState>>) -> Json<SnapshotStatus> {
	let snapshot = state.store.current();
	Json(SnapshotStatus {
		entries: snapshot.len(),
		loading: state.store.is_loading(),
		source: state.store.source(),
		refreshed_at: state.store.refreshed_at(),
		inconsistent: snapshot.inconsistent_entries().len(),
	})
}

pub(crate) async fn info_handler() -> impl IntoResponse {
	Json(json!({
		"title": "Whitelist Checker",
		"description": "Check whether a wallet address is part of the whitelist snapshot and which projects it qualifies for.",
		"usage": [
			"Paste your wallet address and search.",
			"Share the resulting link, it carries your address in the `wallet` parameter.",
			"An address that is not listed has no allocation in this snapshot.",
		],
		"projects": resolve_all(&known_projects()),
	}))
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::server::router,
		axum::{
			body::Body,
			http::{Request, StatusCode},
			Router,
		},
		http_body_util::BodyExt,
		serde_json::Value,
		tokio::sync::mpsc,
		tower::ServiceExt,
		wl_check::{spawn_refresh, Snapshot, SnapshotClient, SnapshotStore, Url},
	};

	fn store() -> Arc<SnapshotStore> {
		let snapshot = Snapshot::from_json(
			br#"{"Addr1": {"totalProjects": 2, "projects": ["nft_degen", "token_drac"]}}"#,
		)
		.unwrap();
		Arc::new(SnapshotStore::new(snapshot, SnapshotSource::Bundled))
	}

	fn app(store: Arc<SnapshotStore>) -> Router {
		let (counter_tx, _) = mpsc::channel(8);
		let public_url = Url::parse("https://wl.example.com/").unwrap();
		router(Arc::new(AppState::new(store, public_url, counter_tx)))
	}

	async fn get_json(uri: &str) -> (StatusCode, Value) {
		get_json_from(app(store()), uri).await
	}

	async fn get_json_from(app: Router, uri: &str) -> (StatusCode, Value) {
		let response = app
			.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
			.await
			.unwrap();
		let status = response.status();
		let body = response.into_body().collect().await.unwrap().to_bytes();
		(status, serde_json::from_slice(&body).unwrap())
	}

	#[tokio::test]
	async fn lookup_listed_wallet() {
		let (status, body) = get_json("/api/lookup?wallet=%20%20Addr1%20%20").await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["status"], "checked");
		assert_eq!(body["address"], "Addr1");
		assert_eq!(body["total"], 2);
		assert_eq!(body["listed"], true);
		assert_eq!(body["validPubkey"], false);
		assert_eq!(body["shareLink"], "https://wl.example.com/?wallet=Addr1");
		assert_eq!(body["projects"][0]["name"], "DEGEN NFT");
		assert_eq!(body["projects"][1]["name"], "DRAC TOKEN");
	}

	#[tokio::test]
	async fn lookup_unlisted_wallet() {
		let (_, body) = get_json("/api/lookup?wallet=Unknown").await;

		assert_eq!(body["status"], "checked");
		assert_eq!(body["total"], 0);
		assert_eq!(body["listed"], false);
		assert_eq!(body["projects"], json!([]));
	}

	#[tokio::test]
	async fn lookup_without_wallet_is_no_query() {
		for uri in ["/api/lookup", "/api/lookup?wallet=", "/api/lookup?wallet=%20"] {
			let (status, body) = get_json(uri).await;
			assert_eq!(status, StatusCode::OK);
			assert_eq!(body, json!({"status": "noQuery"}));
		}
	}

	#[tokio::test]
	async fn unknown_project_has_no_assets() {
		let (status, body) = get_json("/api/projects/root").await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["name"], "root");

		let (_, body) = get_json("/api/projects/token_unknown").await;
		assert_eq!(body["name"], "UNKNOWN TOKEN");
		assert_eq!(body["icon"], Value::Null);
		assert_eq!(body["links"], json!({}));
	}

	#[tokio::test]
	async fn snapshot_status_reports_store() {
		let (_, body) = get_json("/api/snapshot").await;

		assert_eq!(body["entries"], 1);
		assert_eq!(body["loading"], false);
		assert_eq!(body["source"], json!({"kind": "bundled"}));
		assert_eq!(body["refreshedAt"], Value::Null);
		assert_eq!(body["inconsistent"], 0);
	}

	#[tokio::test]
	async fn snapshot_status_shows_refresh_in_progress() {
		// Accepts the connection but never answers, so the refresh stays pending
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let base = format!("http://{}/", listener.local_addr().unwrap());
		let client = SnapshotClient::new(&base, "whitelist.json").unwrap();

		let store = store();
		let pending = spawn_refresh(Arc::clone(&store), client);

		let (_, body) = get_json_from(app(Arc::clone(&store)), "/api/snapshot").await;
		assert_eq!(body["loading"], true);
		assert_eq!(body["entries"], 1);
		assert_eq!(body["refreshedAt"], Value::Null);

		pending.abort();
	}

	#[tokio::test]
	async fn info_lists_known_projects() {
		let (_, body) = get_json("/api/info").await;

		assert_eq!(body["title"], "Whitelist Checker");
		assert!(body["projects"]
			.as_array()
			.unwrap()
			.iter()
			.any(|p| p["name"] == "DEGEN NFT"));
	}
}

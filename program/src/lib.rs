pub mod config;
pub mod error;
pub mod lookup;
pub mod projects;
pub mod refresh;
pub mod state;
pub mod store;

pub use {
	config::Config,
	error::{CheckerError, Result},
	lookup::{lookup, normalize, CheckedReport, LookupOutcome, LookupReport, LookupResult},
	projects::{display_name, resolve, ProjectInfo},
	refresh::{refresh, spawn_refresh, SnapshotClient},
	state::{Membership, Snapshot},
	store::{SnapshotSource, SnapshotStore},
};

pub use reqwest::Url;

/// Whitelist snapshot embedded at build time, served until a refresh succeeds
pub const BUNDLED_SNAPSHOT: &str = include_str!("../data/whitelist.json");

/// Query parameter carrying the wallet address in shareable links
pub const WALLET_PARAM: &str = "wallet";

use {
	crate::{
		projects::{resolve_all, ProjectInfo},
		state::Snapshot,
		WALLET_PARAM,
	},
	reqwest::Url,
	serde::Serialize,
	solana_program::pubkey::Pubkey,
	std::str::FromStr,
};

/// Outcome of checking user-supplied text against a snapshot
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LookupOutcome {
	/// Nothing was entered, so nothing was looked up
	NoQuery,
	Checked(LookupResult),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LookupResult {
	pub address: String,
	pub total: u64,
	pub projects: Vec<String>,
}

impl LookupResult {
	pub fn is_listed(&self) -> bool {
		self.total > 0
	}
}

/// A `LookupOutcome` enriched with project metadata, the shape clients get
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LookupReport {
	NoQuery,
	Checked(CheckedReport),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckedReport {
	pub address: String,
	pub total: u64,
	pub listed: bool,
	pub valid_pubkey: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub share_link: Option<String>,
	pub projects: Vec<ProjectInfo>,
}

impl LookupOutcome {
	pub fn result(&self) -> Option<&LookupResult> {
		match self {
			LookupOutcome::NoQuery => None,
			LookupOutcome::Checked(result) => Some(result),
		}
	}

	/// Resolves project metadata; `public_url` adds a share link when given
	pub fn report(self, public_url: Option<&Url>) -> LookupReport {
		match self {
			LookupOutcome::NoQuery => LookupReport::NoQuery,
			LookupOutcome::Checked(result) => LookupReport::Checked(CheckedReport {
				listed: result.is_listed(),
				valid_pubkey: looks_like_pubkey(&result.address),
				share_link: public_url.map(|base| share_link(base, &result.address).to_string()),
				projects: resolve_all(&result.projects),
				address: result.address,
				total: result.total,
			}),
		}
	}
}

/// Strips surrounding whitespace; the address itself is taken verbatim
pub fn normalize(raw: &str) -> &str {
	raw.trim()
}

/// Resolves raw wallet text against `snapshot`
///
/// A miss is a regular result with no projects. `total` is the length of
/// the project list rather than the stored `totalProjects`, so the count
/// and the list shown for an address can never disagree.
pub fn lookup(snapshot: &Snapshot, raw: &str) -> LookupOutcome {
	let address = normalize(raw);
	if address.is_empty() {
		return LookupOutcome::NoQuery;
	}

	let projects = snapshot
		.get(address)
		.map(|membership| membership.projects.clone())
		.unwrap_or_default();

	LookupOutcome::Checked(LookupResult {
		address: address.to_string(),
		total: projects.len() as u64,
		projects,
	})
}

/// Whether `address` decodes as a base58 Solana public key.
///
/// Informational only: lookups never depend on it.
pub fn looks_like_pubkey(address: &str) -> bool {
	Pubkey::from_str(normalize(address)).is_ok()
}

/// Bookmarkable link for a search, with `wallet` set to the normalized text
pub fn share_link(base: &Url, raw: &str) -> Url {
	let address = normalize(raw);
	let kept: Vec<(String, String)> = base
		.query_pairs()
		.filter(|(key, _)| key != WALLET_PARAM)
		.map(|(key, value)| (key.into_owned(), value.into_owned()))
		.collect();

	let mut link = base.clone();
	link.set_query(None);
	if kept.is_empty() && address.is_empty() {
		return link;
	}

	{
		let mut pairs = link.query_pairs_mut();
		pairs.extend_pairs(&kept);
		if !address.is_empty() {
			pairs.append_pair(WALLET_PARAM, address);
		}
	}
	link
}

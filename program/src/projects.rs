use {once_cell::sync::Lazy, serde::Serialize, std::collections::HashMap};

/// Shown when a project has no icon or its icon fails to load
pub const FALLBACK_ICON: &str = "/icons/fallback.png";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProjectLinks {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub site: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub social: Option<&'static str>,
}

impl ProjectLinks {
	pub fn is_empty(&self) -> bool {
		self.site.is_none() && self.social.is_none()
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
	pub id: String,
	pub name: String,
	pub icon: Option<&'static str>,
	pub links: ProjectLinks,
}

impl ProjectInfo {
	pub fn icon_or_fallback(&self) -> &'static str {
		self.icon.unwrap_or(FALLBACK_ICON)
	}
}

struct ProjectAssets {
	icon: &'static str,
	links: ProjectLinks,
}

static ASSETS: Lazy<HashMap<&'static str, ProjectAssets>> = Lazy::new(|| {
	HashMap::from([
		(
			"nft_degen",
			ProjectAssets {
				icon: "/icons/degen.png",
				links: ProjectLinks {
					site: Some("https://degenape.academy"),
					social: Some("https://x.com/DegenApeAcademy"),
				},
			},
		),
		(
			"nft_saga",
			ProjectAssets {
				icon: "/icons/saga.png",
				links: ProjectLinks {
					site: Some("https://solanamobile.com"),
					social: Some("https://x.com/solanamobile"),
				},
			},
		),
		(
			"token_drac",
			ProjectAssets {
				icon: "/icons/drac.png",
				links: ProjectLinks {
					site: None,
					social: Some("https://x.com/draccoin"),
				},
			},
		),
		(
			"token_bonk",
			ProjectAssets {
				icon: "/icons/bonk.png",
				links: ProjectLinks {
					site: Some("https://bonkcoin.com"),
					social: Some("https://x.com/bonk_inu"),
				},
			},
		),
		(
			"root",
			ProjectAssets {
				icon: "/icons/root.png",
				links: ProjectLinks::default(),
			},
		),
	])
});

/// Human readable name for a project identifier
///
/// `nft_<name>` renders as `<NAME> NFT` and `token_<name>` as `<NAME> TOKEN`;
/// anything else is shown as is.
pub fn display_name(id: &str) -> String {
	if let Some(name) = id.strip_prefix("nft_") {
		format!("{} NFT", name.to_uppercase())
	} else if let Some(name) = id.strip_prefix("token_") {
		format!("{} TOKEN", name.to_uppercase())
	} else {
		id.to_string()
	}
}

pub fn resolve(id: &str) -> ProjectInfo {
	let assets = ASSETS.get(id);
	ProjectInfo {
		id: id.to_string(),
		name: display_name(id),
		icon: assets.map(|a| a.icon),
		links: assets.map(|a| a.links).unwrap_or_default(),
	}
}

pub fn resolve_all<S: AsRef<str>>(ids: &[S]) -> Vec<ProjectInfo> {
	ids.iter().map(|id| resolve(id.as_ref())).collect()
}

/// Identifiers with known metadata, sorted
pub fn known_projects() -> Vec<&'static str> {
	let mut ids: Vec<&'static str> = ASSETS.keys().copied().collect();
	ids.sort_unstable();
	ids
}

use {
	crate::{error::Result, BUNDLED_SNAPSHOT},
	once_cell::sync::Lazy,
	serde::{Deserialize, Deserializer, Serialize},
	serde_json::Value,
	std::collections::BTreeMap,
};

static BUNDLED: Lazy<Snapshot> = Lazy::new(|| {
	Snapshot::from_json(BUNDLED_SNAPSHOT.as_bytes()).unwrap_or_else(|err| {
		tracing::error!("Bundled snapshot is unreadable, starting empty: {}", err);
		Snapshot::default()
	})
});

/// Whitelist membership of a single wallet address
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
	/// `None` when the exporter wrote something other than a count
	#[serde(default = "zero_projects", deserialize_with = "lenient_count")]
	pub total_projects: Option<u64>,
	#[serde(default)]
	pub projects: Vec<String>,
}

impl Default for Membership {
	fn default() -> Self {
		Membership {
			total_projects: zero_projects(),
			projects: Vec::new(),
		}
	}
}

impl Membership {
	/// `totalProjects` is carried by the data but not trusted, see `lookup`
	pub fn is_consistent(&self) -> bool {
		self.total_projects == Some(self.projects.len() as u64)
	}
}

fn zero_projects() -> Option<u64> {
	Some(0)
}

// A bad count must not make the whole snapshot unreadable
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Value::deserialize(deserializer)?.as_u64())
}

/// Point-in-time whitelist keyed by wallet address
///
/// Keys are stored exactly as produced by the exporter: lookups are
/// case-sensitive and only trimmed on the query side.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Snapshot {
	entries: BTreeMap<String, Membership>,
}

impl Snapshot {
	pub fn from_json(data: &[u8]) -> Result<Self> {
		Ok(serde_json::from_slice(data)?)
	}

	pub fn bundled() -> Self {
		BUNDLED.clone()
	}

	pub fn get(&self, address: &str) -> Option<&Membership> {
		self.entries.get(address)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn addresses(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Addresses whose `totalProjects` disagrees with their project list
	pub fn inconsistent_entries(&self) -> Vec<&str> {
		self.entries
			.iter()
			.filter(|(_, membership)| !membership.is_consistent())
			.map(|(address, _)| address.as_str())
			.collect()
	}
}

impl FromIterator<(String, Membership)> for Snapshot {
	fn from_iter<I: IntoIterator<Item = (String, Membership)>>(iter: I) -> Self {
		Snapshot {
			entries: iter.into_iter().collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use {super::*, crate::error::CheckerError};

	#[test]
	fn parses_snapshot_document() {
		let snapshot = Snapshot::from_json(
			br#"{"Addr1": {"totalProjects": 2, "projects": ["nft_degen", "token_drac"]}}"#,
		)
		.unwrap();

		assert_eq!(snapshot.len(), 1);
		let entry = snapshot.get("Addr1").unwrap();
		assert_eq!(entry.total_projects, Some(2));
		assert_eq!(entry.projects, vec!["nft_degen", "token_drac"]);
		assert!(snapshot.get("addr1").is_none());
	}

	#[test]
	fn missing_fields_default_and_extra_fields_are_ignored() {
		let snapshot =
			Snapshot::from_json(br#"{"A": {}, "B": {"projects": ["root"], "tier": 3}}"#).unwrap();

		assert_eq!(snapshot.get("A"), Some(&Membership::default()));
		assert_eq!(snapshot.get("B").unwrap().total_projects, Some(0));
		assert_eq!(snapshot.inconsistent_entries(), vec!["B"]);
	}

	#[test]
	fn odd_project_counts_keep_the_snapshot_readable() {
		let snapshot = Snapshot::from_json(
			br#"{
				"Null": {"totalProjects": null, "projects": ["root"]},
				"Float": {"totalProjects": 1.0, "projects": ["root"]},
				"Text": {"totalProjects": "1", "projects": ["root"]},
				"Negative": {"totalProjects": -1, "projects": []},
				"Addr1": {"totalProjects": 2, "projects": ["nft_degen", "token_drac"]}
			}"#,
		)
		.unwrap();

		assert_eq!(snapshot.len(), 5);
		assert_eq!(snapshot.get("Null").unwrap().total_projects, None);
		assert_eq!(snapshot.get("Text").unwrap().projects, vec!["root"]);
		assert!(snapshot.get("Addr1").unwrap().is_consistent());
		assert_eq!(
			snapshot.inconsistent_entries(),
			vec!["Float", "Negative", "Null", "Text"]
		);
	}

	#[test]
	fn rejects_non_object_documents() {
		for doc in [&b"[]"[..], b"\"wallets\"", b"{\"A\": 7}", b"not json"] {
			assert!(matches!(
				Snapshot::from_json(doc),
				Err(CheckerError::Malformed(_))
			));
		}
	}

	#[test]
	fn bundled_snapshot_is_valid_and_consistent() {
		let parsed = Snapshot::from_json(BUNDLED_SNAPSHOT.as_bytes()).unwrap();

		assert!(!parsed.is_empty());
		assert!(parsed.inconsistent_entries().is_empty());
		assert_eq!(Snapshot::bundled(), parsed);
	}
}

use {
	assert_cmd::Command,
	predicates::prelude::*,
	std::io::Write,
	tempfile::NamedTempFile,
};

fn snapshot_file() -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	write!(
		file,
		r#"{{"Addr1": {{"totalProjects": 2, "projects": ["nft_degen", "token_drac"]}}}}"#
	)
	.unwrap();
	file
}

fn wl_check() -> Command {
	let mut cmd = Command::cargo_bin("wl-check").unwrap();
	cmd.env_remove("WL_SNAPSHOT").env_remove("WL_BASE_URL");
	cmd
}

#[test]
fn lookup_listed_wallet() {
	let file = snapshot_file();

	wl_check()
		.arg("--snapshot")
		.arg(file.path())
		.args(["lookup", "  Addr1 "])
		.assert()
		.success()
		.stdout(predicate::str::contains("Addr1 is whitelisted for 2 project(s)"))
		.stdout(predicate::str::contains("DEGEN NFT (nft_degen)"))
		.stdout(predicate::str::contains("DRAC TOKEN (token_drac)"));
}

#[test]
fn lookup_unlisted_wallet_is_not_an_error() {
	let file = snapshot_file();

	wl_check()
		.arg("--snapshot")
		.arg(file.path())
		.args(["lookup", "Unknown"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Unknown is not on the whitelist"));
}

#[test]
fn lookup_blank_wallet_is_no_query() {
	wl_check()
		.args(["lookup", "   "])
		.assert()
		.success()
		.stdout(predicate::str::contains("No wallet address given"));
}

#[test]
fn lookup_json_output() {
	let file = snapshot_file();

	let output = wl_check()
		.arg("--snapshot")
		.arg(file.path())
		.args(["--json", "lookup", "Addr1"])
		.output()
		.unwrap();
	assert!(output.status.success());

	let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(body["status"], "checked");
	assert_eq!(body["address"], "Addr1");
	assert_eq!(body["total"], 2);
	assert_eq!(body["listed"], true);
	assert_eq!(body["validPubkey"], false);
	assert_eq!(body["projects"][0]["id"], "nft_degen");
	assert_eq!(body["projects"][0]["name"], "DEGEN NFT");
	assert_eq!(body["projects"][1]["name"], "DRAC TOKEN");
	assert!(body.get("shareLink").is_none());
}

#[test]
fn project_names_follow_prefix_rules() {
	wl_check()
		.args(["project", "token_drac"])
		.assert()
		.success()
		.stdout(predicate::str::contains("DRAC TOKEN (token_drac)"));

	wl_check()
		.args(["project", "mystery"])
		.assert()
		.success()
		.stdout(predicate::str::contains("mystery (mystery)"))
		.stdout(predicate::str::contains("/icons/fallback.png"));
}

#[test]
fn unreachable_refresh_keeps_local_snapshot() {
	let file = snapshot_file();

	wl_check()
		.arg("--snapshot")
		.arg(file.path())
		.args(["--base-url", "http://127.0.0.1:9/", "lookup", "Addr1"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Addr1 is whitelisted for 2 project(s)"));
}

#[test]
fn malformed_snapshot_file_fails() {
	let mut file = NamedTempFile::new().unwrap();
	write!(file, "not json").unwrap();

	wl_check()
		.arg("--snapshot")
		.arg(file.path())
		.args(["lookup", "Addr1"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("Unable to load snapshot"));
}

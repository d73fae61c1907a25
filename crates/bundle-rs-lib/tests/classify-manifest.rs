use bundle_rs::plugin::PluginSource;
use bundle_rs::resolver::*;
use bundle_rs::Manifest;
use bundle_rs_test_utils as utils;

fn mixed_manifest() -> Manifest {
	Manifest::new(vec![
		utils::package_dependency("acme", "local", "1.0.0"),
		utils::marketplace_dependency("acme", "search", "1.0.0"),
		utils::github_dependency("acme/tools", "v0.3.0", "tools.difypkg"),
		utils::marketplace_dependency("acme", "chat", "2.0.0"),
	])
}

#[test]
fn classify_partitions_by_provenance() {
	let classified = classify(&mixed_manifest());

	assert_eq!(classified.prefilled.len(), 4);
	assert_eq!(classified.marketplace_positions(), vec![1, 3]);
	assert_eq!(classified.vcs.iter().map(|e| e.position).collect::<Vec<_>>(), vec![2]);
	assert_eq!(classified.vcs[0].dependency.repo, "acme/tools");
}

#[test]
fn classify_prefills_bundled_only() {
	let classified = classify(&mixed_manifest());

	let bundled = classified.prefilled[0].as_ref().expect("bundled dependency should be prefilled");
	assert_eq!(bundled.identity_key(), "acme/local");
	assert_eq!(bundled.plugin_id, "acme/local:1.0.0@local");
	assert_eq!(bundled.version, "1.0.0");
	assert_eq!(bundled.from, PluginSource::Package);
	assert!(classified.prefilled[1..].iter().all(Option::is_none));
}

#[test]
fn classify_keeps_marketplace_order() {
	let classified = classify(&mixed_manifest());
	let triples: Vec<_> = classified.marketplace.iter().map(|e| e.dependency.triple().plugin).collect();
	assert_eq!(triples, vec!["search", "chat"]);
}

#[test]
fn classify_empty_manifest() {
	let classified = classify(&Manifest::default());
	assert!(classified.prefilled.is_empty());
	assert!(classified.marketplace.is_empty());
	assert!(classified.vcs.is_empty());
}

#[test]
fn manifest_reads_from_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("manifest.json");
	let manifest = mixed_manifest();
	std::fs::write(&path, serde_json::to_string(&manifest).unwrap()).unwrap();

	assert_eq!(Manifest::load_from_file(&path).unwrap(), manifest);
}

use bundle_rs::eligibility::{InstalledInfo, SystemFeatures};
use bundle_rs::resolver::ReadinessMode;
use bundle_rs::{resolve_bundle, Manifest};
use bundle_rs_test_utils as utils;
use utils::{StaticInstalled, StaticMarketplace, StaticVcs};

fn empty_marketplace() -> StaticMarketplace {
	StaticMarketplace::new(Ok(vec![]), Ok(vec![]))
}

#[tokio::test]
async fn mixed_manifest_resolves_and_loads_installed_state() {
	let _ = env_logger::builder().is_test(true).try_init();

	let manifest = Manifest::new(vec![
		utils::package_dependency("acme", "local", "1.0.0"),
		utils::marketplace_dependency("acme", "search", "1.0.0"),
		utils::github_dependency("acme/tools", "v0.3.0", "tools.difypkg"),
	]);
	let marketplace = StaticMarketplace::new(
		Ok(vec![Some(utils::listing(utils::marketplace_plugin("acme", "search", "1.0.0")))]),
		Ok(vec![Some(utils::versioned_listing(utils::marketplace_plugin("acme", "search", "1.0.0"), "p1-meta"))]),
	);
	let vcs = StaticVcs::default().with("acme/tools", utils::github_plugin("acme", "tools", "0.3.0"));
	let installed = StaticInstalled::new([
		utils::installed("acme/search", "0.9.0", "acme/search:0.9.0@old"),
		utils::installed("acme/unrelated", "1.0.0", "acme/unrelated:1.0.0@x"),
	].into_iter().collect());

	let mut loaded = None;
	let session = resolve_bundle(manifest, ReadinessMode::Arithmetic, &marketplace, &vcs, &installed, |info| {
		loaded = Some(info.len());
	}).await.unwrap();

	assert_eq!(loaded, Some(1));
	let plugins = session.plugins();
	assert!(plugins.iter().all(Option::is_some));
	assert_eq!(plugins[1].as_ref().map(|p| p.plugin_id.as_str()), Some("p1-meta"));
	assert!(session.error_indexes().is_empty());

	let requests = installed.requests.borrow();
	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0], vec!["acme/local".to_owned(), "acme/search".to_owned(), "acme/tools".to_owned()]);

	assert_eq!(marketplace.requested_triples.borrow()[0].plugin, "search");

	let features = SystemFeatures::default();
	let eligibility = session.eligibility(&features);
	assert_eq!(eligibility.version_info("acme/search").installed_version.as_deref(), Some("0.9.0"));
	assert!(!eligibility.version_info("acme/tools").has_installed);
}

#[tokio::test]
async fn bundled_only_skips_marketplace() {
	let manifest = Manifest::new(vec![utils::package_dependency("acme", "local", "1.0.0")]);
	let marketplace = empty_marketplace();

	let session = resolve_bundle(manifest, ReadinessMode::Arithmetic, &marketplace, &StaticVcs::default(), &StaticInstalled::default(), |_| {})
		.await
		.unwrap();

	assert_eq!(marketplace.calls.get(), 0);
	assert_eq!(session.plugins().len(), 1);
	assert!(session.is_complete());
}

#[tokio::test]
async fn failed_fetches_become_error_indexes() {
	let manifest = Manifest::new(vec![
		utils::github_dependency("acme/tools", "v0.3.0", "tools.difypkg"),
		utils::github_dependency("acme/missing", "v1.0.0", "missing.difypkg"),
		utils::marketplace_dependency("acme", "gone", "1.0.0"),
	]);
	let marketplace = StaticMarketplace::new(Ok(vec![None]), Ok(vec![None]));
	let vcs = StaticVcs::default().with("acme/tools", utils::github_plugin("acme", "tools", "0.3.0"));

	let session = resolve_bundle(manifest, ReadinessMode::Coverage, &marketplace, &vcs, &StaticInstalled::new(InstalledInfo::default()), |_| {})
		.await
		.unwrap();

	let mut errors = session.error_indexes();
	errors.sort();
	assert_eq!(errors, vec![1, 2]);
	assert!(session.plugins()[0].is_some());
}

#[tokio::test]
async fn failed_bulk_lookup_errors_marketplace_positions() {
	let manifest = Manifest::new(vec![
		utils::marketplace_dependency("acme", "search", "1.0.0"),
		utils::marketplace_dependency("acme", "chat", "2.0.0"),
	]);
	let marketplace = StaticMarketplace::new(
		Err("service unavailable".to_owned()),
		Ok(vec![
			Some(utils::versioned_listing(utils::marketplace_plugin("acme", "search", "1.0.0"), "p0-meta")),
			Some(utils::versioned_listing(utils::marketplace_plugin("acme", "chat", "2.0.0"), "p1-meta")),
		]),
	);

	let session = resolve_bundle(manifest, ReadinessMode::Coverage, &marketplace, &StaticVcs::default(), &StaticInstalled::default(), |_| {})
		.await
		.unwrap();

	assert_eq!(session.error_indexes(), vec![0, 1]);
}

#[tokio::test]
async fn unavailable_installed_state_counts_as_nothing_installed() {
	let manifest = Manifest::new(vec![utils::package_dependency("acme", "local", "1.0.0")]);

	let mut loaded = None;
	let session = resolve_bundle(manifest, ReadinessMode::Arithmetic, &empty_marketplace(), &StaticVcs::default(), &StaticInstalled::failing(), |info| {
		loaded = Some(info.is_empty());
	}).await.unwrap();

	assert_eq!(loaded, Some(true));
	assert!(session.installed_info().is_empty());
}

#[tokio::test]
async fn exhausted_lookups_return_the_incomplete_session() {
	/* The by-id listing resolves the position the failed by-meta call errors, arithmetic readiness overshoots */
	let manifest = Manifest::new(vec![
		utils::marketplace_dependency("acme", "search", "1.0.0"),
	]);
	let marketplace = StaticMarketplace::new(
		Ok(vec![Some(utils::listing(utils::marketplace_plugin("acme", "search", "1.0.0")))]),
		Err("service unavailable".to_owned()),
	).by_meta_last();

	let mut loaded = false;
	let result = resolve_bundle(manifest, ReadinessMode::Arithmetic, &marketplace, &StaticVcs::default(), &StaticInstalled::default(), |_| loaded = true).await;

	let session = match result {
		Ok(_) => panic!("arithmetic readiness should not open with a position both resolved and errored"),
		Err(session) => session,
	};
	assert!(!loaded);
	assert_eq!(marketplace.calls.get(), 2);
	assert_eq!(session.error_indexes(), vec![0]);
	assert!(session.plugins()[0].is_some());
	assert!(!session.is_complete());
}

#[tokio::test]
async fn failure_seen_first_opens_arithmetic_readiness() {
	let manifest = Manifest::new(vec![
		utils::marketplace_dependency("acme", "search", "1.0.0"),
	]);
	/* By-id fails before by-meta answers */
	let marketplace = StaticMarketplace::new(
		Err("service unavailable".to_owned()),
		Ok(vec![Some(utils::versioned_listing(utils::marketplace_plugin("acme", "search", "1.0.0"), "p0-meta"))]),
	).by_meta_last();

	let session = resolve_bundle(manifest, ReadinessMode::Arithmetic, &marketplace, &StaticVcs::default(), &StaticInstalled::default(), |_| {})
		.await
		.unwrap();

	assert_eq!(session.error_indexes(), vec![0]);
	assert!(session.plugins()[0].is_none());
}

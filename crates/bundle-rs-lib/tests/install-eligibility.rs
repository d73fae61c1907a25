use bundle_rs::eligibility::*;
use bundle_rs::plugin::*;
use bundle_rs::selection::{SelectState, Selection};
use bundle_rs_test_utils as utils;

fn verified(mut plugin: Plugin, category: AuthorizedCategory) -> Plugin {
	plugin.verification = Some(Verification { authorized_category: category });
	plugin
}

/// Official, partner, community from a repository, nothing, unverified.
fn plugins() -> Vec<Option<Plugin>> {
	vec![
		Some(utils::marketplace_plugin("acme", "search", "1.0.0")),
		Some(verified(utils::marketplace_plugin("partner", "maps", "2.0.0"), AuthorizedCategory::Partner)),
		Some(verified(utils::github_plugin("someone", "tools", "0.3.0"), AuthorizedCategory::Community)),
		None,
		Some(Plugin { verification: None, ..utils::marketplace_plugin("acme", "chat", "1.1.0") }),
	]
}

fn features(scope: InstallationScope, restrict_to_marketplace_only: bool) -> SystemFeatures {
	SystemFeatures {
		plugin_installation_permission: PluginInstallationPermission { plugin_installation_scope: scope, restrict_to_marketplace_only },
	}
}

fn installable_positions(policy: &impl InstallPolicy) -> Vec<usize> {
	let installed = InstalledInfo::default();
	Eligibility::new(plugins(), &installed, policy).installable_plugins().selected_indexes
}

#[test]
fn select_reports_installable_count_without_disallowed_plugin() {
	let installed = InstalledInfo::default();
	let policy = |p: &Plugin| InstallLimit { can_install: p.name != "search" };
	let eligibility = Eligibility::new(plugins(), &installed, &policy);

	assert!(!eligibility.can_install(0));

	let mut called = None;
	assert!(eligibility.handle_select(0, |plugin, position, count| {
		called = Some((plugin.identity_key(), position, count));
	}));
	assert_eq!(called, Some(("acme/search".to_owned(), 0, 3)));
}

#[test]
fn select_ignores_unresolved_position() {
	let installed = InstalledInfo::default();
	let policy = SystemFeatures::default();
	let eligibility = Eligibility::new(plugins(), &installed, &policy);

	assert!(!eligibility.handle_select(3, |_, _, _| panic!("nothing to select")));
	assert!(!eligibility.handle_select(42, |_, _, _| panic!("nothing to select")));
	assert!(!eligibility.can_install(3));
	assert!(!eligibility.can_install(42));
}

#[test]
fn version_info_of_unknown_key() {
	let installed = InstalledInfo::default();
	let policy = SystemFeatures::default();
	let eligibility = Eligibility::new(plugins(), &installed, &policy);

	assert_eq!(eligibility.version_info("nobody/nothing"), VersionInfo {
		has_installed: false,
		installed_version: None,
		to_install_version: String::new(),
	});
}

#[test]
fn version_info_of_installed_key() {
	let installed: InstalledInfo = [utils::installed("acme/search", "0.9.0", "acme/search:0.9.0@old")].into_iter().collect();
	let policy = SystemFeatures::default();
	let eligibility = Eligibility::new(plugins(), &installed, &policy);

	let info = eligibility.version_info("acme/search");
	assert!(info.has_installed);
	assert_eq!(info.installed_version.as_deref(), Some("0.9.0"));
	assert!(!eligibility.version_info("Acme/search").has_installed);
}

#[test]
fn scope_all_allows_everything() {
	assert_eq!(installable_positions(&SystemFeatures::default()), vec![0, 1, 2, 4]);
}

#[test]
fn scope_none_allows_nothing() {
	assert!(installable_positions(&features(InstallationScope::None, false)).is_empty());
}

#[test]
fn scope_official_only_treats_unverified_as_official() {
	assert_eq!(installable_positions(&features(InstallationScope::OfficialOnly, false)), vec![0, 4]);
}

#[test]
fn scope_official_and_partners() {
	assert_eq!(installable_positions(&features(InstallationScope::OfficialAndSpecificPartners, false)), vec![0, 1, 4]);
}

#[test]
fn marketplace_only_rejects_repositories_and_packages() {
	assert_eq!(installable_positions(&features(InstallationScope::All, true)), vec![0, 1, 4]);

	let bundled = Plugin::from_package("acme/local:1.0.0@local", &PackageManifest {
		version: "1.0.0".into(),
		author: "acme".into(),
		name: "local".into(),
		..Default::default()
	});
	assert!(!features(InstallationScope::All, true).install_limit(&bundled).can_install);
	assert!(features(InstallationScope::OfficialOnly, false).install_limit(&bundled).can_install);
}

#[test]
fn features_parse_from_json() {
	let features: SystemFeatures = serde_json::from_str(r#"{
		"plugin_installation_permission": {
			"plugin_installation_scope": "official_and_specific_partners",
			"restrict_to_marketplace_only": true
		}
	}"#).unwrap();
	assert_eq!(features, self::features(InstallationScope::OfficialAndSpecificPartners, true));

	let empty: SystemFeatures = serde_json::from_str("{}").unwrap();
	assert_eq!(empty, SystemFeatures::default());
}

#[test]
fn installable_plugins_are_parallel_lists() {
	let installed = InstalledInfo::default();
	let policy = features(InstallationScope::OfficialAndSpecificPartners, false);
	let installable = Eligibility::new(plugins(), &installed, &policy).installable_plugins();

	let keys: Vec<_> = installable.installable_plugins.iter().map(Plugin::identity_key).collect();
	assert_eq!(keys, vec!["acme/search", "partner/maps", "acme/chat"]);
	assert_eq!(installable.selected_indexes, vec![0, 1, 4]);
}

#[test]
fn selected_plugins_match_by_identity_key() {
	let installed = InstalledInfo::default();
	let policy = SystemFeatures::default();
	let eligibility = Eligibility::new(plugins(), &installed, &policy);

	let other_package = Plugin { plugin_id: "acme/search:1.0.0@meta".into(), ..utils::marketplace_plugin("acme", "search", "1.0.0") };
	assert!(eligibility.is_plugin_selected(0, &[other_package.clone()]));
	assert!(!eligibility.is_plugin_selected(1, &[other_package.clone()]));
	assert!(!eligibility.is_plugin_selected(3, &[other_package]));
}

#[test]
fn selection_follows_installable_count() {
	let installed = InstalledInfo::default();
	let policy = SystemFeatures::default();
	let eligibility = Eligibility::new(plugins(), &installed, &policy);
	let mut selection = Selection::new();

	let mut state = SelectState::Nothing;
	eligibility.handle_select(0, |plugin, position, count| state = selection.toggle(plugin, position, count));
	assert_eq!(state, SelectState::Partial);
	assert_eq!(selection.indexes(), &[0]);

	selection.select_all(eligibility.installable_plugins());
	assert_eq!(selection.state(4), SelectState::All);
	assert_eq!(selection.indexes(), &[0, 1, 2, 4]);

	eligibility.handle_select(1, |plugin, position, count| state = selection.toggle(plugin, position, count));
	assert_eq!(state, SelectState::Partial);
	assert_eq!(selection.indexes(), &[0, 2, 4]);
	assert!(!selection.contains(&utils::marketplace_plugin("partner", "maps", "9.9.9")));

	selection.deselect_all();
	assert!(selection.is_empty());
	assert_eq!(selection.state(4), SelectState::Nothing);
}

#[test]
fn selection_with_nothing_installable_is_partial() {
	let mut selection = Selection::new();
	assert_eq!(selection.toggle(&utils::marketplace_plugin("acme", "search", "1.0.0"), 0, 0), SelectState::Partial);
	assert_eq!(selection.state(0), SelectState::Partial);
	assert_eq!(selection.state(1), SelectState::All);
}

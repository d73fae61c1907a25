//! Fixtures and collaborator doubles for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use bundle_rs::dependency::*;
use bundle_rs::eligibility::{InstalledInfo, InstalledPlugin};
use bundle_rs::plugin::*;
use bundle_rs::resolver::{ListingVersion, MarketplaceListing};
use bundle_rs::sources::*;

/// A marketplace plugin as the by-id lookup returns it.
pub fn marketplace_plugin(org: &str, name: &str, version: &str) -> Plugin {
	Plugin {
		plugin_id: format!("{}/{}", org, name),
		org: org.to_owned(),
		author: org.to_owned(),
		name: name.to_owned(),
		version: version.to_owned(),
		latest_version: version.to_owned(),
		verification: Some(Verification { authorized_category: AuthorizedCategory::Langgenius }),
		from: PluginSource::Marketplace,
		..Default::default()
	}
}

/// A plugin as fetched from a repository release.
pub fn github_plugin(org: &str, name: &str, version: &str) -> Plugin {
	Plugin {
		plugin_id: format!("{}/{}:{}@github", org, name, version),
		from: PluginSource::Github,
		..marketplace_plugin(org, name, version)
	}
}

/// The identifier a marketplace package of `org/name:version` is published under.
pub fn unique_identifier(org: &str, name: &str, version: &str) -> String {
	format!("{}/{}:{}@{}", org, name, version, "0".repeat(8))
}

/// A listing without a version entry, as the by-id lookup returns.
pub fn listing(plugin: Plugin) -> MarketplaceListing {
	MarketplaceListing { plugin, version: None }
}

/// A listing carrying the installable identifier, as the by-meta lookup returns.
pub fn versioned_listing(plugin: Plugin, unique_identifier: &str) -> MarketplaceListing {
	MarketplaceListing {
		plugin,
		version: Some(ListingVersion { unique_identifier: unique_identifier.to_owned() }),
	}
}

pub fn package_dependency(author: &str, name: &str, version: &str) -> Dependency {
	Dependency::Bundled(PackageDependency {
		unique_identifier: format!("{}/{}:{}@local", author, name, version),
		manifest: PackageManifest {
			version: version.to_owned(),
			author: author.to_owned(),
			name: name.to_owned(),
			..Default::default()
		},
	})
}

pub fn marketplace_dependency(org: &str, name: &str, version: &str) -> Dependency {
	Dependency::Marketplace(MarketplaceDependency {
		marketplace_plugin_unique_identifier: unique_identifier(org, name, version),
		plugin_unique_identifier: None,
		version: None,
	})
}

pub fn github_dependency(repo: &str, version: &str, package: &str) -> Dependency {
	Dependency::Vcs(GithubDependency {
		repo: repo.to_owned(),
		version: version.to_owned(),
		package: package.to_owned(),
		github_plugin_unique_identifier: None,
	})
}

pub fn installed(key: &str, version: &str, unique_identifier: &str) -> (String, InstalledPlugin) {
	(key.to_owned(), InstalledPlugin {
		installed_id: format!("installation-{}", key),
		installed_version: version.to_owned(),
		unique_identifier: unique_identifier.to_owned(),
	})
}

/// A config whose data directory is a fresh temporary directory.
///
/// The directory is removed when the returned guard drops.
pub fn temp_config() -> std::io::Result<(tempfile::TempDir, bundle_rs::Config)> {
	let dir = tempfile::tempdir()?;
	let mut config = bundle_rs::Config::default();
	config.set_data_dir(dir.path().join("data"));
	Ok((dir, config))
}

/// Marketplace answering every lookup with canned data.
///
/// `Err` results fail the whole call.
#[derive(Debug)]
pub struct StaticMarketplace {
	pub by_ids: Result<Vec<Option<MarketplaceListing>>, String>,
	pub by_meta: Result<Vec<Option<MarketplaceListing>>, String>,
	/// Triples received by the last by-id lookup.
	pub requested_triples: RefCell<Vec<PluginTriple>>,
	pub calls: Cell<usize>,
	/// Times the by-meta lookup yields to the runtime before answering.
	pub by_meta_yields: usize,
}

impl StaticMarketplace {
	pub fn new(by_ids: Result<Vec<Option<MarketplaceListing>>, String>, by_meta: Result<Vec<Option<MarketplaceListing>>, String>) -> Self {
		Self { by_ids, by_meta, requested_triples: RefCell::default(), calls: Cell::default(), by_meta_yields: 0 }
	}

	/// Makes the by-meta lookup answer after the by-id lookup.
	pub fn by_meta_last(mut self) -> Self {
		self.by_meta_yields = 1;
		self
	}
}

fn answer(result: &Result<Vec<Option<MarketplaceListing>>, String>) -> bundle_rs::Result<Vec<Option<MarketplaceListing>>> {
	result.clone().map_err(bundle_rs::Error::Marketplace)
}

impl MarketplaceSource for StaticMarketplace {
	async fn fetch_by_ids(&self, triples: &[PluginTriple]) -> bundle_rs::Result<Vec<Option<MarketplaceListing>>> {
		self.calls.set(self.calls.get() + 1);
		*self.requested_triples.borrow_mut() = triples.to_vec();
		answer(&self.by_ids)
	}

	async fn fetch_by_meta(&self, _references: &[MarketplaceDependency]) -> bundle_rs::Result<Vec<Option<MarketplaceListing>>> {
		self.calls.set(self.calls.get() + 1);
		for _ in 0..self.by_meta_yields {
			tokio::task::yield_now().await;
		}
		answer(&self.by_meta)
	}
}

/// Fetcher answering by repository name. Unknown repositories fail.
#[derive(Debug, Default)]
pub struct StaticVcs {
	pub plugins: HashMap<String, Plugin>,
}

impl StaticVcs {
	pub fn with(mut self, repo: &str, plugin: Plugin) -> Self {
		self.plugins.insert(repo.to_owned(), plugin);
		self
	}
}

impl VcsFetcher for StaticVcs {
	async fn fetch(&self, dependency: &GithubDependency) -> bundle_rs::Result<Plugin> {
		/* Let other fetches interleave */
		tokio::task::yield_now().await;
		self.plugins.get(&dependency.repo)
			.cloned()
			.ok_or_else(|| bundle_rs::Error::VcsFetch(format!("no release of {}", dependency.repo)))
	}
}

/// Installed state answering from a fixed map, or failing when `None`.
#[derive(Debug, Default)]
pub struct StaticInstalled {
	pub installed: Option<InstalledInfo>,
	/// Keys received by every lookup, in order.
	pub requests: RefCell<Vec<Vec<String>>>,
}

impl StaticInstalled {
	pub fn new(installed: InstalledInfo) -> Self {
		Self { installed: Some(installed), ..Default::default() }
	}

	pub fn failing() -> Self {
		Self::default()
	}
}

impl InstalledStateSource for StaticInstalled {
	async fn installed(&self, identity_keys: &[String]) -> bundle_rs::Result<InstalledInfo> {
		self.requests.borrow_mut().push(identity_keys.to_vec());
		match &self.installed {
			Some(all) => Ok(all.iter()
				.filter(|(key, _)| identity_keys.contains(key))
				.map(|(key, value)| (key.clone(), value.clone()))
				.collect()),
			None => Err(bundle_rs::Error::Validation("installed state unavailable".to_owned())),
		}
	}
}

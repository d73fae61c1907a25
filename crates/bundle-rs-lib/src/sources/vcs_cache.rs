//! Plugin metadata of repository releases, fetched ahead of time and stored on disk.
//!
//! Layout: `<data_dir>/vcs/<owner>__<repo>/<release>/<package>.json`, each holding one [`Plugin`].

use std::path::PathBuf;

use super::VcsFetcher;
use crate::dependency::GithubDependency;
use crate::plugin::{Plugin, PluginSource};

#[derive(Debug, Clone)]
pub struct VcsCache {
	root: PathBuf,
}

impl VcsCache {
	pub fn new(config: &crate::Config) -> Self {
		Self::at(config.data_dir().join("vcs"))
	}

	pub fn at(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn entry_path(&self, dependency: &GithubDependency) -> PathBuf {
		self.root
			.join(dependency.repo.replace('/', "__"))
			.join(&dependency.version)
			.join(format!("{}.json", dependency.package))
	}

	/// Stores `plugin` as the metadata of `dependency`.
	pub async fn store(&self, dependency: &GithubDependency, plugin: &Plugin) -> crate::Result<()> {
		let path = self.entry_path(dependency);
		if let Some(parent) = path.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}
		tokio::fs::write(&path, serde_json::to_vec_pretty(plugin)?).await?;
		Ok(())
	}
}

impl VcsFetcher for VcsCache {
	async fn fetch(&self, dependency: &GithubDependency) -> crate::Result<Plugin> {
		let path = self.entry_path(dependency);
		let data = tokio::fs::read(&path).await.map_err(|e| {
			crate::Error::VcsFetch(format!("{}@{} {}: {}", dependency.repo, dependency.version, dependency.package, e))
		})?;
		let plugin: Plugin = serde_json::from_slice(&data)?;
		Ok(Plugin { from: PluginSource::Github, ..plugin })
	}
}

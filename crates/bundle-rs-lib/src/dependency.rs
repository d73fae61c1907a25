//! Dependency manifests.
//!
//! A manifest is an ordered list of [`Dependency`] records. A record's position in that list is
//! its only identity while it is being resolved.

use std::path::Path;
use std::sync::OnceLock;

use serde::*;

use crate::plugin::PackageManifest;

/// A single entry in a bundle manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Dependency {
	/// Metadata is embedded in the manifest, no lookup needed.
	#[serde(rename = "package")]
	Bundled(PackageDependency),
	#[serde(rename = "marketplace")]
	Marketplace(MarketplaceDependency),
	/// Hosted as a release asset in a version-control repository.
	#[serde(rename = "github")]
	Vcs(GithubDependency),
}

impl Dependency {
	pub fn kind(&self) -> DependencyKind {
		match self {
			Dependency::Bundled(_) => DependencyKind::Bundled,
			Dependency::Marketplace(_) => DependencyKind::Marketplace,
			Dependency::Vcs(_) => DependencyKind::Vcs,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
	Bundled,
	Marketplace,
	Vcs,
}

impl std::fmt::Display for DependencyKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			DependencyKind::Bundled => write!(f, "package"),
			DependencyKind::Marketplace => write!(f, "marketplace"),
			DependencyKind::Vcs => write!(f, "github"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDependency {
	pub unique_identifier: String,
	pub manifest: PackageManifest,
}

/// A reference to a plugin published on the marketplace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceDependency {
	/// `org/name:version@checksum`
	pub marketplace_plugin_unique_identifier: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub plugin_unique_identifier: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
}

/// Organization, name and version of a marketplace plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginTriple {
	#[serde(rename = "org")]
	pub organization: String,
	#[serde(rename = "name")]
	pub plugin: String,
	pub version: String,
}

impl MarketplaceDependency {
	/// Splits the marketplace identifier into its triple.
	///
	/// An explicit `version` on the dependency wins over the one in the identifier.
	/// Identifiers that do not have the `org/name:version` shape yield empty components.
	pub fn triple(&self) -> PluginTriple {
		static IDENTIFIER: OnceLock<regex::Regex> = OnceLock::new();
		let re = IDENTIFIER.get_or_init(|| {
			regex::Regex::new(r"^(?P<org>[^/]+)/(?P<name>[^:@]+)(?::(?P<version>[^@]*))?(?:@.*)?$").expect("identifier pattern is valid")
		});

		let mut triple = match re.captures(&self.marketplace_plugin_unique_identifier) {
			Some(c) => PluginTriple {
				organization: c["org"].to_owned(),
				plugin: c["name"].to_owned(),
				version: c.name("version").map(|v| v.as_str().to_owned()).unwrap_or_default(),
			},
			None => {
				log::debug!("Marketplace identifier `{}` is not in org/name:version form", self.marketplace_plugin_unique_identifier);
				PluginTriple::default()
			},
		};

		if let Some(version) = self.version.as_ref().filter(|v| !v.is_empty()) {
			triple.version = version.clone();
		}
		triple
	}
}

/// A plugin package attached to a repository release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubDependency {
	/// `owner/repository`
	pub repo: String,
	/// Release tag.
	pub version: String,
	/// Asset file name within the release.
	pub package: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub github_plugin_unique_identifier: Option<String>,
}

/// The ordered dependency list of a bundle.
///
/// Immutable once created, a different manifest means a new resolution session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
	dependencies: Vec<Dependency>,
}

impl Manifest {
	pub fn new(dependencies: Vec<Dependency>) -> Self {
		Self { dependencies }
	}

	/// Parses a JSON array of dependency records.
	///
	/// # Errors
	/// - [`SerdeJSON`](crate::error::Error::SerdeJSON) when the document is not a valid manifest.
	pub fn from_json(s: &str) -> crate::Result<Self> {
		Ok(serde_json::from_str(s)?)
	}

	/// Reads a manifest from a JSON file.
	///
	/// # Errors
	/// - [`IO`](crate::error::Error::IO) when opening or reading the file.
	/// - [`SerdeJSON`](crate::error::Error::SerdeJSON) when parsing it.
	pub fn load_from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	pub fn dependencies(&self) -> &[Dependency] {
		&self.dependencies
	}

	pub fn get(&self, position: usize) -> Option<&Dependency> {
		self.dependencies.get(position)
	}

	pub fn len(&self) -> usize {
		self.dependencies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.dependencies.is_empty()
	}
}

impl FromIterator<Dependency> for Manifest {
	fn from_iter<T: IntoIterator<Item = Dependency>>(iter: T) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

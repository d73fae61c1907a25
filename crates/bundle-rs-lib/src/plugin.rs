//! Resolved plugin metadata.
//!
//! Every resolver produces a [`Plugin`], whatever the provenance of the dependency it came from.

use std::collections::HashMap;
use serde::*;

/// Capability category of a plugin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginCategory {
	#[default] Tool,
	Model,
	Extension,
	AgentStrategy,
	Datasource,
	Trigger,
}

/// Where a plugin was resolved from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginSource {
	#[default] Marketplace,
	Github,
	Package,
}

/// Who vouches for a plugin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizedCategory {
	Langgenius,
	Partner,
	#[default] Community,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
	pub authorized_category: AuthorizedCategory,
}

/// Plugin identity and metadata.
///
/// Marketplace responses often leave fields out so nearly everything defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
	/// Install-ready identifier of this exact package.
	#[serde(default)]
	pub plugin_id: String,
	#[serde(default)]
	pub org: String,
	#[serde(default)]
	pub author: String,
	pub name: String,
	#[serde(default)]
	pub version: String,
	#[serde(default)]
	pub latest_version: String,
	#[serde(default)]
	pub latest_package_identifier: String,
	#[serde(default)]
	pub icon: String,
	#[serde(default)]
	pub verified: bool,
	#[serde(default)]
	pub label: HashMap<String, String>,
	#[serde(default)]
	pub brief: HashMap<String, String>,
	#[serde(default)]
	pub category: PluginCategory,
	#[serde(default)]
	pub install_count: u64,
	#[serde(default)]
	pub verification: Option<Verification>,
	#[serde(default)]
	pub from: PluginSource,
}

impl Plugin {
	/// `organization-or-author/name`, used to correlate a plugin with installed state.
	///
	/// Case-sensitive and not normalized.
	pub fn identity_key(&self) -> String {
		let owner = if self.org.is_empty() { &self.author } else { &self.org };
		format!("{}/{}", owner, self.name)
	}

	/// Replaces an empty `version` with `latest_version`.
	///
	/// Lookups by versioned identifier sometimes omit the version.
	pub fn with_version_fallback(mut self) -> Self {
		if self.version.is_empty() {
			self.version = self.latest_version.clone();
		}
		self
	}

	/// Builds the plugin described by a locally bundled package.
	pub fn from_package(unique_identifier: &str, manifest: &PackageManifest) -> Self {
		Plugin {
			plugin_id: unique_identifier.to_owned(),
			org: manifest.author.clone(),
			author: manifest.author.clone(),
			name: manifest.name.clone(),
			version: manifest.version.clone(),
			latest_version: String::new(),
			latest_package_identifier: String::new(),
			icon: manifest.icon.clone(),
			verified: manifest.verified,
			label: manifest.label.clone(),
			brief: manifest.description.clone(),
			category: manifest.category,
			install_count: 0,
			verification: Some(manifest.verification.clone().unwrap_or(Verification { authorized_category: AuthorizedCategory::Langgenius })),
			from: PluginSource::Package,
		}
	}
}

/// Metadata embedded in a bundled package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
	#[serde(default)]
	pub plugin_unique_identifier: String,
	pub version: String,
	pub author: String,
	pub name: String,
	#[serde(default)]
	pub icon: String,
	#[serde(default)]
	pub category: PluginCategory,
	#[serde(default)]
	pub label: HashMap<String, String>,
	#[serde(default)]
	pub description: HashMap<String, String>,
	#[serde(default)]
	pub created_at: String,
	#[serde(default)]
	pub verified: bool,
	#[serde(default)]
	pub verification: Option<Verification>,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn named(org: &str, author: &str, name: &str) -> Plugin {
		Plugin { org: org.into(), author: author.into(), name: name.into(), ..Default::default() }
	}

	#[test] fn identity_key_prefers_org() { assert_eq!(named("acme", "someone", "search").identity_key(), "acme/search") }
	#[test] fn identity_key_falls_back_to_author() { assert_eq!(named("", "someone", "search").identity_key(), "someone/search") }
	#[test] fn identity_key_is_case_sensitive() { assert_ne!(named("Acme", "", "Search").identity_key(), named("acme", "", "search").identity_key()) }
	#[test] fn version_fallback_uses_latest() { assert_eq!(Plugin { latest_version: "2.0.0".into(), ..Default::default() }.with_version_fallback().version, "2.0.0") }
	#[test] fn version_fallback_keeps_version() { assert_eq!(Plugin { version: "1.0.0".into(), latest_version: "2.0.0".into(), ..Default::default() }.with_version_fallback().version, "1.0.0") }
}

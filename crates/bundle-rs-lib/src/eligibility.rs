//! Installed state, workspace install policy, and what can be installed.

use std::collections::HashMap;

use serde::*;

use crate::plugin::{AuthorizedCategory, Plugin, PluginSource};

/// An installation already present in the workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledPlugin {
	pub installed_id: String,
	pub installed_version: String,
	pub unique_identifier: String,
}

/// Identity key -> installation.
pub type InstalledInfo = HashMap<String, InstalledPlugin>;

/// Installed state of one plugin as shown next to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInfo {
	pub has_installed: bool,
	pub installed_version: Option<String>,
	/// Left empty, callers fill it from the version the manifest asks for.
	pub to_install_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallLimit {
	pub can_install: bool,
}

/// Decides whether the workspace allows installing a plugin.
pub trait InstallPolicy {
	fn install_limit(&self, plugin: &Plugin) -> InstallLimit;
}

impl<F> InstallPolicy for F where F: Fn(&Plugin) -> InstallLimit {
	fn install_limit(&self, plugin: &Plugin) -> InstallLimit {
		self(plugin)
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationScope {
	#[default] All,
	OfficialOnly,
	OfficialAndSpecificPartners,
	None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInstallationPermission {
	#[serde(default)]
	pub plugin_installation_scope: InstallationScope,
	#[serde(default)]
	pub restrict_to_marketplace_only: bool,
}

/// Workspace feature flags relevant to installing plugins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemFeatures {
	#[serde(default)]
	pub plugin_installation_permission: PluginInstallationPermission,
}

impl InstallPolicy for SystemFeatures {
	fn install_limit(&self, plugin: &Plugin) -> InstallLimit {
		let permission = &self.plugin_installation_permission;

		if permission.restrict_to_marketplace_only && matches!(plugin.from, PluginSource::Github | PluginSource::Package) {
			return InstallLimit { can_install: false };
		}

		/* Unverified plugins are treated as official */
		let category = plugin.verification.as_ref()
			.map(|v| v.authorized_category)
			.unwrap_or(AuthorizedCategory::Langgenius);

		let can_install = match permission.plugin_installation_scope {
			InstallationScope::All => true,
			InstallationScope::None => false,
			InstallationScope::OfficialOnly => category == AuthorizedCategory::Langgenius,
			InstallationScope::OfficialAndSpecificPartners => matches!(category, AuthorizedCategory::Langgenius | AuthorizedCategory::Partner),
		};
		InstallLimit { can_install }
	}
}

/// The installable subset of a resolve, as parallel lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallablePlugins {
	pub selected_indexes: Vec<usize>,
	pub installable_plugins: Vec<Plugin>,
}

/// Answers installability questions over a snapshot of resolved plugins.
///
/// Policy is consulted on every call, never cached.
pub struct Eligibility<'a, P> {
	plugins: Vec<Option<Plugin>>,
	installed: &'a InstalledInfo,
	policy: &'a P,
}

impl<'a, P: InstallPolicy> Eligibility<'a, P> {
	pub fn new(plugins: Vec<Option<Plugin>>, installed: &'a InstalledInfo, policy: &'a P) -> Self {
		Self { plugins, installed, policy }
	}

	pub fn plugins(&self) -> &[Option<Plugin>] {
		&self.plugins
	}

	pub fn version_info(&self, identity_key: &str) -> VersionInfo {
		let installed = self.installed.get(identity_key);
		VersionInfo {
			has_installed: installed.is_some(),
			installed_version: installed.map(|i| i.installed_version.clone()),
			to_install_version: String::new(),
		}
	}

	/// `false` for positions that are not resolved.
	pub fn can_install(&self, position: usize) -> bool {
		self.plugins.get(position)
			.and_then(Option::as_ref)
			.map_or(false, |p| self.policy.install_limit(p).can_install)
	}

	fn installable_count(&self) -> usize {
		self.plugins.iter()
			.flatten()
			.filter(|p| self.policy.install_limit(p).can_install)
			.count()
	}

	/// Calls `on_select` with the plugin at `position`, the position, and how many plugins are
	/// installable right now.
	///
	/// The plugin itself does not have to be installable. Returns `false` without calling
	/// `on_select` when nothing is resolved at `position`.
	pub fn handle_select(&self, position: usize, on_select: impl FnOnce(&Plugin, usize, usize)) -> bool {
		match self.plugins.get(position).and_then(Option::as_ref) {
			Some(plugin) => {
				on_select(plugin, position, self.installable_count());
				true
			},
			None => {
				log::debug!("Ignoring selection of unresolved position {}", position);
				false
			},
		}
	}

	/// Whether the plugin at `position` is in `selected`, compared by identity key.
	pub fn is_plugin_selected(&self, position: usize, selected: &[Plugin]) -> bool {
		match self.plugins.get(position).and_then(Option::as_ref) {
			Some(plugin) => {
				let key = plugin.identity_key();
				selected.iter().any(|s| s.identity_key() == key)
			},
			None => false,
		}
	}

	/// Every resolved plugin the policy allows, in manifest order.
	pub fn installable_plugins(&self) -> InstallablePlugins {
		let mut installable = InstallablePlugins::default();
		for (position, plugin) in self.plugins.iter().enumerate() {
			let Some(plugin) = plugin else { continue };
			if self.policy.install_limit(plugin).can_install {
				installable.selected_indexes.push(position);
				installable.installable_plugins.push(plugin.clone());
			}
		}
		installable
	}
}

use super::MarketplaceResolution;
use super::VcsArena;
use crate::plugin::Plugin;

/// The combined view of every resolver, aligned with the manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Merged {
	/// Same length as the manifest. `None` is not yet resolved, or errored.
	pub plugins: Vec<Option<Plugin>>,
	/// Marketplace errors followed by VCS errors. May hold duplicates and stale positions.
	pub error_indexes: Vec<usize>,
}

impl Merged {
	pub fn resolved_count(&self) -> usize {
		self.plugins.iter().filter(|p| p.is_some()).count()
	}
}

/// Overlays the marketplace and VCS results onto the bundled prefill.
///
/// Rebuilt from scratch on every call. Later overlays win, though positions are disjoint by kind.
pub fn merge(prefilled: &[Option<Plugin>], marketplace: &MarketplaceResolution, vcs: &VcsArena) -> Merged {
	let mut plugins = prefilled.to_vec();

	for (&position, plugin) in marketplace.plugins.iter().chain(vcs.plugins.iter()) {
		match plugins.get_mut(position) {
			Some(slot) => *slot = Some(plugin.clone()),
			None => log::warn!("Ignoring plugin for position {} outside of a {} entry manifest", position, prefilled.len()),
		}
	}

	let error_indexes = marketplace.errors.iter()
		.chain(vcs.errors.iter())
		.copied()
		.filter(|&position| position < prefilled.len())
		.collect();

	Merged { plugins, error_indexes }
}

//! Partitions a manifest by provenance.

use crate::dependency::*;
use crate::plugin::Plugin;

/// A marketplace dependency and where it sits in the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceEntry {
	pub position: usize,
	pub dependency: MarketplaceDependency,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VcsEntry {
	pub position: usize,
	pub dependency: GithubDependency,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
	/// Same length as the manifest, `Some` only where the dependency is bundled.
	pub prefilled: Vec<Option<Plugin>>,
	/// Marketplace dependencies in manifest order. Bulk responses are parallel to this list.
	pub marketplace: Vec<MarketplaceEntry>,
	pub vcs: Vec<VcsEntry>,
}

impl Classified {
	pub fn marketplace_positions(&self) -> Vec<usize> {
		self.marketplace.iter().map(|e| e.position).collect()
	}
}

/// Splits `manifest` into bundled metadata, marketplace references and VCS references.
///
/// Pure. Bundled dependencies are resolved on the spot.
pub fn classify(manifest: &Manifest) -> Classified {
	let mut classified = Classified {
		prefilled: Vec::with_capacity(manifest.len()),
		..Default::default()
	};

	for (position, dependency) in manifest.dependencies().iter().enumerate() {
		match dependency {
			Dependency::Bundled(package) => {
				classified.prefilled.push(Some(Plugin::from_package(&package.unique_identifier, &package.manifest)));
			},
			Dependency::Marketplace(reference) => {
				classified.prefilled.push(None);
				classified.marketplace.push(MarketplaceEntry { position, dependency: reference.clone() });
			},
			Dependency::Vcs(reference) => {
				classified.prefilled.push(None);
				classified.vcs.push(VcsEntry { position, dependency: reference.clone() });
			},
		}
	}

	log::debug!(
		"Classified {} dependencies: {} bundled, {} marketplace, {} vcs",
		manifest.len(),
		manifest.len() - classified.marketplace.len() - classified.vcs.len(),
		classified.marketplace.len(),
		classified.vcs.len(),
	);

	classified
}

//! Resolution of marketplace dependencies from the two bulk lookups.
//!
//! The by-id lookup is keyed by `org/name/version` triples and the by-meta lookup by the raw
//! marketplace references. Both answer with a list parallel to the marketplace subset of the
//! manifest, not to the manifest itself.

use std::collections::{BTreeMap, BTreeSet};

use serde::*;

use super::MarketplaceEntry;
use crate::plugin::Plugin;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingVersion {
	pub unique_identifier: String,
}

/// One slot of a bulk lookup response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceListing {
	pub plugin: Plugin,
	#[serde(default)]
	pub version: Option<ListingVersion>,
}

/// A bulk lookup that has come back.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkResponse {
	/// Parallel to the marketplace subset, `None` where the lookup found nothing.
	Listings(Vec<Option<MarketplaceListing>>),
	/// The whole call failed, no slot can be attributed.
	Failed(String),
}

impl BulkResponse {
	fn listings(&self) -> Option<&[Option<MarketplaceListing>]> {
		match self {
			BulkResponse::Listings(l) => Some(l),
			BulkResponse::Failed(_) => None,
		}
	}

	fn is_failed(&self) -> bool {
		matches!(self, BulkResponse::Failed(_))
	}
}

impl<E: std::fmt::Display> From<Result<Vec<Option<MarketplaceListing>>, E>> for BulkResponse {
	fn from(value: Result<Vec<Option<MarketplaceListing>>, E>) -> Self {
		match value {
			Ok(l) => BulkResponse::Listings(l),
			Err(e) => BulkResponse::Failed(e.to_string()),
		}
	}
}

/// Plugins and errors keyed by manifest position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketplaceResolution {
	pub plugins: BTreeMap<usize, Plugin>,
	pub errors: BTreeSet<usize>,
}

/// Holds the bulk responses for one manifest and derives a [`MarketplaceResolution`] from them.
#[derive(Debug, Clone, Default)]
pub struct MarketplaceResolver {
	/// Slot in the responses -> manifest position.
	positions: Vec<usize>,
	by_id: Option<BulkResponse>,
	by_meta: Option<BulkResponse>,
}

impl MarketplaceResolver {
	pub fn new(entries: &[MarketplaceEntry]) -> Self {
		Self {
			positions: entries.iter().map(|e| e.position).collect(),
			by_id: None,
			by_meta: None,
		}
	}

	/// Replaces the stored by-id response.
	pub fn set_by_id(&mut self, response: BulkResponse) {
		if let BulkResponse::Failed(reason) = &response {
			log::warn!("Marketplace lookup by id failed, marking {} positions as errored: {}", self.positions.len(), reason);
		} else {
			log::debug!("Received marketplace response by id");
		}
		self.by_id = Some(response);
	}

	/// Replaces the stored by-meta response.
	pub fn set_by_meta(&mut self, response: BulkResponse) {
		if let BulkResponse::Failed(reason) = &response {
			log::warn!("Marketplace lookup by meta failed, marking {} positions as errored: {}", self.positions.len(), reason);
		} else {
			log::debug!("Received marketplace response by meta");
		}
		self.by_meta = Some(response);
	}

	pub fn has_settled(&self) -> bool {
		self.by_id.is_some() && self.by_meta.is_some()
	}

	/// Derives plugins and errors from the responses received so far.
	///
	/// Positions stay absent from both until both responses are in, except that a failed call
	/// errors every position straight away. By-meta data replaces by-id data for the same
	/// position because only it carries an identifier usable for installing.
	pub fn resolve(&self) -> MarketplaceResolution {
		let mut resolution = MarketplaceResolution::default();

		if let (Some(by_id), Some(by_meta)) = (&self.by_id, &self.by_meta) {
			if let Some(listings) = by_id.listings() {
				for (slot, &position) in self.positions.iter().enumerate() {
					match listings.get(slot).and_then(Option::as_ref) {
						Some(listing) => {
							resolution.plugins.insert(position, listing.plugin.clone().with_version_fallback());
						},
						None => {
							resolution.errors.insert(position);
						},
					}
				}
			}

			if let Some(listings) = by_meta.listings() {
				for (slot, &position) in self.positions.iter().enumerate() {
					let found = listings.get(slot)
						.and_then(Option::as_ref)
						.and_then(|l| l.version.as_ref().map(|v| (l, v)));
					match found {
						Some((listing, version)) => {
							resolution.plugins.insert(position, Plugin {
								plugin_id: version.unique_identifier.clone(),
								..listing.plugin.clone()
							});
							resolution.errors.remove(&position);
						},
						None => {
							if !resolution.plugins.contains_key(&position) {
								resolution.errors.insert(position);
							}
						},
					}
				}
			}
		}

		let failed = self.by_id.as_ref().map_or(false, BulkResponse::is_failed)
			|| self.by_meta.as_ref().map_or(false, BulkResponse::is_failed);
		if failed {
			/* Partial data from the other lookup stays in `plugins`, the error markers are kept regardless */
			resolution.errors.extend(self.positions.iter().copied());
		}

		resolution
	}
}

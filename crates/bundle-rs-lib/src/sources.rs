//! Collaborators the resolver queries, and the adapters shipped for them.

use crate::dependency::{GithubDependency, MarketplaceDependency, PluginTriple};
use crate::eligibility::InstalledInfo;
use crate::plugin::Plugin;
use crate::resolver::MarketplaceListing;

pub mod marketplace_http;
pub use marketplace_http::HttpMarketplace;
pub mod installed_file;
pub use installed_file::InstalledStateFile;
pub mod vcs_cache;
pub use vcs_cache::VcsCache;

/// Bulk plugin lookups against the marketplace.
///
/// Both answer with a list parallel to the request, `None` where nothing matched.
/// An `Err` means the whole call failed.
#[allow(async_fn_in_trait)]
pub trait MarketplaceSource {
	async fn fetch_by_ids(&self, triples: &[PluginTriple]) -> crate::Result<Vec<Option<MarketplaceListing>>>;
	async fn fetch_by_meta(&self, references: &[MarketplaceDependency]) -> crate::Result<Vec<Option<MarketplaceListing>>>;
}

/// Fetches the plugin packaged in a repository release.
#[allow(async_fn_in_trait)]
pub trait VcsFetcher {
	async fn fetch(&self, dependency: &GithubDependency) -> crate::Result<Plugin>;
}

/// Reports which of the given identity keys are installed in the workspace.
#[allow(async_fn_in_trait)]
pub trait InstalledStateSource {
	async fn installed(&self, identity_keys: &[String]) -> crate::Result<InstalledInfo>;
}

//! Runs a [`ResolutionSession`] against async collaborators.

use futures::stream::{FuturesUnordered, StreamExt};

use crate::dependency::Manifest;
use crate::eligibility::InstalledInfo;
use crate::resolver::*;
use crate::sources::*;

/// Resolves every dependency of `manifest` and looks up what is installed.
///
/// Both marketplace lookups and every VCS fetch run concurrently on the current task. The
/// session is re-evaluated after each of them returns. When the readiness gate opens the
/// installed state is looked up, `on_loaded` is called with it and the completed session is
/// returned. Fetches still running at that point are dropped.
///
/// An unavailable installed state is treated as nothing installed.
///
/// # Errors
/// The in-progress session when every lookup has returned and the gate is still closed, which
/// can happen in [`ReadinessMode::Arithmetic`] after a bulk marketplace failure.
pub async fn resolve_bundle<M, V, I>(
	manifest: Manifest,
	mode: ReadinessMode,
	marketplace: &M,
	vcs: &V,
	installed: &I,
	on_loaded: impl FnOnce(&InstalledInfo),
) -> Result<ResolutionSession<Complete>, Box<ResolutionSession<InProgress>>>
where
	M: MarketplaceSource,
	V: VcsFetcher,
	I: InstalledStateSource,
{
	let mut session = ResolutionSession::new(manifest, mode);

	let marketplace_entries = session.classified().marketplace.clone();
	let vcs_entries = session.classified().vcs.clone();

	let triples: Vec<_> = marketplace_entries.iter().map(|e| e.dependency.triple()).collect();
	let references: Vec<_> = marketplace_entries.iter().map(|e| e.dependency.clone()).collect();

	let has_marketplace = !marketplace_entries.is_empty();
	if !has_marketplace {
		/* Nothing to look up, an empty subset resolves to nothing */
		session.set_by_id_response(BulkResponse::Listings(Vec::new()));
		session.set_by_meta_response(BulkResponse::Listings(Vec::new()));
	}

	let by_id = marketplace.fetch_by_ids(&triples);
	let by_meta = marketplace.fetch_by_meta(&references);
	tokio::pin!(by_id, by_meta);
	let mut by_id_pending = has_marketplace;
	let mut by_meta_pending = has_marketplace;

	let mut fetches: FuturesUnordered<_> = vcs_entries.iter().map(|entry| {
		let on_resolved = session.on_resolved(entry.position);
		let on_error = session.on_error(entry.position);
		async move {
			match vcs.fetch(&entry.dependency).await {
				Ok(plugin) => on_resolved.call(plugin),
				Err(e) => {
					log::warn!("Failed to fetch {} for position {}: {}", entry.dependency.repo, entry.position, e);
					on_error.call();
				},
			}
		}
	}).collect();

	let keys = loop {
		if let Some(keys) = session.poll_readiness() {
			break keys;
		}

		tokio::select! {
			response = &mut by_id, if by_id_pending => {
				by_id_pending = false;
				session.set_by_id_response(response.into());
			},
			response = &mut by_meta, if by_meta_pending => {
				by_meta_pending = false;
				session.set_by_meta_response(response.into());
			},
			Some(()) = fetches.next(), if !fetches.is_empty() => {},
			else => {
				let state = session.recompute();
				log::warn!(
					"Every lookup returned but resolution is incomplete: {} resolved, {} errored of {}",
					state.resolved_count, state.error_indexes.len(), state.plugins.len()
				);
				return Err(Box::new(session));
			},
		}
	};

	let installed_info = match installed.installed(&keys).await {
		Ok(info) => info,
		Err(e) => {
			log::warn!("Installed state unavailable, treating every plugin as not installed: {}", e);
			InstalledInfo::default()
		},
	};

	session.complete(installed_info, on_loaded)
}

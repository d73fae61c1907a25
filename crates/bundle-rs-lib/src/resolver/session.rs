use std::collections::HashSet;

use super::*;
use crate::dependency::Manifest;
use crate::eligibility::{Eligibility, InstallPolicy, InstalledInfo};
use crate::plugin::Plugin;

#[derive(Debug, Clone)]
pub struct InProgress;
#[derive(Debug, Clone)]
pub struct Complete;

/// Everything derived from a session's inputs at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedState {
	pub plugins: Vec<Option<Plugin>>,
	pub error_indexes: Vec<usize>,
	pub resolved_count: usize,
	pub is_complete: bool,
}

/// The resolution of one manifest.
///
/// All derived state is recomputed from the inputs on demand, so it does not matter in which
/// order responses and callbacks arrive. A new manifest needs a new session, callbacks handed
/// out by a dropped session do nothing.
#[derive(Debug)]
pub struct ResolutionSession<State> {
	manifest: Manifest,
	classified: Classified,
	marketplace: MarketplaceResolver,
	vcs: VcsResolver,
	gate: ReadinessGate,
	installed: InstalledInfo,
	state: std::marker::PhantomData<State>,
}

impl ResolutionSession<InProgress> {
	pub fn new(manifest: Manifest, mode: ReadinessMode) -> Self {
		let classified = classify(&manifest);
		let marketplace = MarketplaceResolver::new(&classified.marketplace);
		Self {
			manifest,
			classified,
			marketplace,
			vcs: VcsResolver::new(),
			gate: ReadinessGate::new(mode),
			installed: Default::default(),
			state: std::marker::PhantomData,
		}
	}

	pub fn set_by_id_response(&mut self, response: BulkResponse) {
		self.marketplace.set_by_id(response);
	}

	pub fn set_by_meta_response(&mut self, response: BulkResponse) {
		self.marketplace.set_by_meta(response);
	}

	/// Re-evaluates the readiness gate.
	///
	/// Returns the identity keys of every resolved plugin, deduplicated, on the call that finds
	/// the resolve complete and `None` on every other call.
	pub fn poll_readiness(&mut self) -> Option<Vec<String>> {
		let merged = self.merged();
		if !self.gate.observe(&merged) {
			return None;
		}

		let mut seen = HashSet::new();
		Some(
			merged.plugins.iter()
				.flatten()
				.map(Plugin::identity_key)
				.filter(|key| seen.insert(key.clone()))
				.collect()
		)
	}

	/// Finishes the resolve with the installed state looked up for it.
	///
	/// `on_loaded` is called with `installed` before returning. Consuming the session makes that
	/// happen once per session.
	///
	/// `Err` if the resolve is not complete.
	pub fn complete(mut self, installed: InstalledInfo, on_loaded: impl FnOnce(&InstalledInfo)) -> Result<ResolutionSession<Complete>, Box<Self>> {
		let merged = self.merged();
		self.gate.observe(&merged);
		if !self.gate.is_open() {
			return Err(Box::new(self));
		}

		on_loaded(&installed);

		Ok(ResolutionSession {
			manifest: self.manifest,
			classified: self.classified,
			marketplace: self.marketplace,
			vcs: self.vcs,
			gate: self.gate,
			installed,
			state: std::marker::PhantomData,
		})
	}
}

impl ResolutionSession<Complete> {
	pub fn installed_info(&self) -> &InstalledInfo {
		&self.installed
	}
}

impl<State> ResolutionSession<State> {
	pub fn manifest(&self) -> &Manifest {
		&self.manifest
	}

	pub fn classified(&self) -> &Classified {
		&self.classified
	}

	/// Callback storing a fetched plugin at `position`.
	pub fn on_resolved(&self, position: usize) -> OnResolved {
		self.vcs.on_resolved(position)
	}

	/// Callback recording a failed fetch at `position`.
	pub fn on_error(&self, position: usize) -> OnError {
		self.vcs.on_error(position)
	}

	pub fn merged(&self) -> Merged {
		merge(&self.classified.prefilled, &self.marketplace.resolve(), &self.vcs.arena())
	}

	pub fn recompute(&self) -> DerivedState {
		let merged = self.merged();
		DerivedState {
			resolved_count: merged.resolved_count(),
			is_complete: self.gate.check(&merged),
			plugins: merged.plugins,
			error_indexes: merged.error_indexes,
		}
	}

	pub fn plugins(&self) -> Vec<Option<Plugin>> {
		self.merged().plugins
	}

	pub fn error_indexes(&self) -> Vec<usize> {
		self.merged().error_indexes
	}

	pub fn is_complete(&self) -> bool {
		self.gate.check(&self.merged())
	}

	/// Installability over the plugins resolved right now.
	///
	/// Before completion there is no installed state, so nothing reports as installed.
	pub fn eligibility<'s, P: InstallPolicy>(&'s self, policy: &'s P) -> Eligibility<'s, P> {
		Eligibility::new(self.plugins(), &self.installed, policy)
	}
}

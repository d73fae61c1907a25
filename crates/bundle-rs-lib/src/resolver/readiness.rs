use std::collections::BTreeSet;

use serde::*;

use super::Merged;

/// How completeness of a resolve is counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessMode {
	/// `resolved + error_indexes.len() == manifest length`.
	///
	/// A VCS position that errored and later resolved is counted twice, so the check can pass
	/// before every position has settled, or never pass once the errors outnumber the gaps.
	#[default] Arithmetic,
	/// Every position is either resolved or errored, each counted once.
	Coverage,
}

impl ReadinessMode {
	pub fn is_complete(&self, merged: &Merged) -> bool {
		let total = merged.plugins.len();
		match self {
			ReadinessMode::Arithmetic => merged.resolved_count() + merged.error_indexes.len() == total,
			ReadinessMode::Coverage => {
				let errored: BTreeSet<usize> = merged.error_indexes.iter().copied().collect();
				merged.plugins.iter()
					.enumerate()
					.filter(|(position, plugin)| plugin.is_some() || errored.contains(position))
					.count() == total
			},
		}
	}
}

/// Latches once resolution is complete.
///
/// Once open it stays open for the session, even if later events would fail the check.
#[derive(Debug, Clone, Default)]
pub struct ReadinessGate {
	mode: ReadinessMode,
	open: bool,
}

impl ReadinessGate {
	pub fn new(mode: ReadinessMode) -> Self {
		Self { mode, open: false }
	}

	pub fn mode(&self) -> ReadinessMode {
		self.mode
	}

	pub fn is_open(&self) -> bool {
		self.open
	}

	/// Whether `merged` would be complete, taking the latch into account. Does not latch.
	pub fn check(&self, merged: &Merged) -> bool {
		self.open || self.mode.is_complete(merged)
	}

	/// Evaluates `merged` and returns `true` only on the call that opens the gate.
	pub fn observe(&mut self, merged: &Merged) -> bool {
		if self.open || !self.mode.is_complete(merged) {
			return false;
		}
		log::info!(
			"Resolution complete: {} resolved, {} errored of {}",
			merged.resolved_count(), merged.error_indexes.len(), merged.plugins.len()
		);
		self.open = true;
		true
	}
}

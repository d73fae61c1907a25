//! Resolution of version-control dependencies.
//!
//! Fetching is done elsewhere. The fetcher is handed an [`OnResolved`] and an [`OnError`] per
//! position and reports back through them, any number of times.

use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::plugin::Plugin;

/// Results reported by the fetchers of one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VcsArena {
	pub plugins: BTreeMap<usize, Plugin>,
	/// Never pruned. A later success for the same position leaves its earlier error here.
	pub errors: Vec<usize>,
}

/// Owns the arena of one session and hands out callbacks bound to it.
///
/// Only the callbacks write to the arena.
#[derive(Debug, Default)]
pub struct VcsResolver {
	arena: Rc<RefCell<VcsArena>>,
}

impl VcsResolver {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn on_resolved(&self, position: usize) -> OnResolved {
		OnResolved { position, arena: Rc::downgrade(&self.arena) }
	}

	pub fn on_error(&self, position: usize) -> OnError {
		OnError { position, arena: Rc::downgrade(&self.arena) }
	}

	pub fn arena(&self) -> Ref<'_, VcsArena> {
		self.arena.borrow()
	}
}

/// Stores a fetched plugin at a fixed position, replacing what was there.
#[derive(Debug, Clone)]
pub struct OnResolved {
	position: usize,
	arena: Weak<RefCell<VcsArena>>,
}

impl OnResolved {
	pub fn position(&self) -> usize {
		self.position
	}

	pub fn call(&self, plugin: Plugin) {
		match self.arena.upgrade() {
			Some(arena) => {
				log::trace!("VCS dependency at position {} resolved to {}", self.position, plugin.identity_key());
				arena.borrow_mut().plugins.insert(self.position, plugin);
			},
			None => log::debug!("Dropping VCS result for position {}, its session is gone", self.position),
		}
	}
}

/// Records a failed fetch at a fixed position.
#[derive(Debug, Clone)]
pub struct OnError {
	position: usize,
	arena: Weak<RefCell<VcsArena>>,
}

impl OnError {
	pub fn position(&self) -> usize {
		self.position
	}

	pub fn call(&self) {
		match self.arena.upgrade() {
			Some(arena) => {
				log::trace!("VCS dependency at position {} failed", self.position);
				arena.borrow_mut().errors.push(self.position);
			},
			None => log::debug!("Dropping VCS error for position {}, its session is gone", self.position),
		}
	}
}

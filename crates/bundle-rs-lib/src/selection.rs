//! Which resolved plugins the user picked for installation.

use crate::eligibility::InstallablePlugins;
use crate::plugin::Plugin;

/// Summary of a selection against the installable plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectState {
	Nothing,
	Partial,
	All,
}

/// Selected plugins and their manifest positions.
///
/// Plugins are matched by identity key, positions are kept for building the install payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
	plugins: Vec<Plugin>,
	indexes: Vec<usize>,
}

impl Selection {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn plugins(&self) -> &[Plugin] {
		&self.plugins
	}

	/// Manifest positions in the order they were selected.
	pub fn indexes(&self) -> &[usize] {
		&self.indexes
	}

	pub fn len(&self) -> usize {
		self.plugins.len()
	}

	pub fn is_empty(&self) -> bool {
		self.plugins.is_empty()
	}

	pub fn contains(&self, plugin: &Plugin) -> bool {
		let key = plugin.identity_key();
		self.plugins.iter().any(|p| p.identity_key() == key)
	}

	/// Selects `plugin` or deselects it if already selected.
	///
	/// Deselecting drops the plugin with the same identity key along with the position it was
	/// selected at, which need not be `position`.
	///
	/// Has the shape of the callback taken by
	/// [`Eligibility::handle_select()`](crate::eligibility::Eligibility::handle_select()).
	pub fn toggle(&mut self, plugin: &Plugin, position: usize, installable_count: usize) -> SelectState {
		let key = plugin.identity_key();
		if let Some(slot) = self.plugins.iter().position(|p| p.identity_key() == key) {
			/* Plugins and positions are parallel, drop the same slot from both */
			self.plugins.remove(slot);
			self.indexes.remove(slot);
		} else {
			self.plugins.push(plugin.clone());
			self.indexes.push(position);
		}
		self.state(installable_count)
	}

	/// Replaces the selection with every installable plugin.
	pub fn select_all(&mut self, installable: InstallablePlugins) {
		self.plugins = installable.installable_plugins;
		self.indexes = installable.selected_indexes;
	}

	pub fn deselect_all(&mut self) {
		self.plugins.clear();
		self.indexes.clear();
	}

	/// `All` needs at least one installable plugin, a selection with none installable is `Partial`.
	pub fn state(&self, installable_count: usize) -> SelectState {
		let selected = self.plugins.len();
		if selected == 0 {
			SelectState::Nothing
		} else if installable_count == 0 || selected < installable_count {
			SelectState::Partial
		} else {
			SelectState::All
		}
	}
}

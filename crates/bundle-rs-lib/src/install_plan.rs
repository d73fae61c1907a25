//! Turning a selection into install requests, and reading back what the installer reported.
//!
//! Running the installation is someone else's job.

use serde::*;

use crate::dependency::{Dependency, Manifest};
use crate::eligibility::InstalledInfo;
use crate::plugin::Plugin;
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
	Install,
	/// Replace an installation of the same plugin with another package.
	Upgrade { original_unique_identifier: String },
	/// The exact same package is installed already.
	AlreadyInstalled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedInstall {
	pub position: usize,
	pub dependency: Dependency,
	pub plugin: Plugin,
	/// Identifier of the package to install.
	pub unique_identifier: String,
	pub action: PlanAction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallPlan {
	pub entries: Vec<PlannedInstall>,
}

impl InstallPlan {
	/// Entries that need the installer to do something.
	pub fn pending(&self) -> impl Iterator<Item = &PlannedInstall> {
		self.entries.iter().filter(|e| e.action != PlanAction::AlreadyInstalled)
	}
}

fn install_identifier(dependency: &Dependency, plugin: &Plugin) -> String {
	match dependency {
		Dependency::Bundled(package) => package.unique_identifier.clone(),
		Dependency::Marketplace(_) => plugin.plugin_id.clone(),
		Dependency::Vcs(reference) => {
			if plugin.plugin_id.is_empty() {
				reference.github_plugin_unique_identifier.clone().unwrap_or_default()
			} else {
				plugin.plugin_id.clone()
			}
		},
	}
}

/// Builds install requests for the selected positions, in selection order.
///
/// # Errors
/// - [`Validation`](crate::error::Error::Validation) when a selected position is not part of `manifest`.
pub fn plan_install(manifest: &Manifest, selection: &Selection, installed: &InstalledInfo) -> crate::Result<InstallPlan> {
	let mut plan = InstallPlan::default();

	for (&position, plugin) in selection.indexes().iter().zip(selection.plugins()) {
		let dependency = manifest.get(position)
			.ok_or_else(|| crate::Error::Validation(format!("selected position {} is outside of a {} entry manifest", position, manifest.len())))?;

		let unique_identifier = install_identifier(dependency, plugin);
		let action = match installed.get(&plugin.identity_key()) {
			Some(existing) if existing.unique_identifier == unique_identifier => PlanAction::AlreadyInstalled,
			Some(existing) => PlanAction::Upgrade { original_unique_identifier: existing.unique_identifier.clone() },
			None => PlanAction::Install,
		};

		log::debug!("Planned {:?} of {} from {} at position {}", action, plugin.identity_key(), dependency.kind(), position);

		plan.entries.push(PlannedInstall {
			position,
			dependency: dependency.clone(),
			plugin: plugin.clone(),
			unique_identifier,
			action,
		});
	}

	Ok(plan)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
	Success,
	Failed,
	Running,
}

/// What the installer reported for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallStatus {
	pub status: TaskStatus,
	pub task_id: String,
	pub unique_identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSummary {
	pub succeeded: usize,
	pub failed: usize,
	/// Tasks still running, to be polled.
	pub running_tasks: Vec<String>,
}

impl InstallSummary {
	/// The installed plugin list changed and should be fetched again.
	pub fn should_refresh(&self) -> bool {
		self.succeeded > 0
	}

	pub fn is_finished(&self) -> bool {
		self.running_tasks.is_empty()
	}
}

pub fn summarize_install(statuses: &[InstallStatus]) -> InstallSummary {
	let mut summary = InstallSummary::default();
	for status in statuses {
		match status.status {
			TaskStatus::Success => summary.succeeded += 1,
			TaskStatus::Failed => summary.failed += 1,
			TaskStatus::Running => {
				if !summary.running_tasks.contains(&status.task_id) {
					summary.running_tasks.push(status.task_id.clone());
				}
			},
		}
	}
	summary
}

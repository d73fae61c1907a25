//! Installed state kept as a JSON file in the data directory.

use std::path::PathBuf;

use super::InstalledStateSource;
use crate::eligibility::InstalledInfo;

#[derive(Debug, Clone)]
pub struct InstalledStateFile {
	path: PathBuf,
}

impl InstalledStateFile {
	pub fn new(config: &crate::Config) -> Self {
		Self::at(config.data_dir().join("installed.json"))
	}

	pub fn at(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &std::path::Path {
		&self.path
	}

	/// Reads every recorded installation. A missing file means nothing is installed.
	///
	/// # Errors
	/// - [`IO`](crate::error::Error::IO) when reading an existing file fails.
	/// - [`SerdeJSON`](crate::error::Error::SerdeJSON) when deserializing the file.
	pub async fn load(&self) -> crate::Result<InstalledInfo> {
		match tokio::fs::read(&self.path).await {
			Ok(data) => Ok(serde_json::from_slice(&data)?),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				log::debug!("No installed state at {}", self.path.display());
				Ok(InstalledInfo::default())
			},
			Err(e) => Err(e.into()),
		}
	}

	pub async fn save(&self, installed: &InstalledInfo) -> crate::Result<()> {
		if let Some(parent) = self.path.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}
		tokio::fs::write(&self.path, serde_json::to_vec_pretty(installed)?).await?;
		Ok(())
	}
}

impl InstalledStateSource for InstalledStateFile {
	async fn installed(&self, identity_keys: &[String]) -> crate::Result<InstalledInfo> {
		let mut all = self.load().await?;
		all.retain(|key, _| identity_keys.contains(key));
		Ok(all)
	}
}

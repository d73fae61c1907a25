//! Persistent settings.

use serde::*;

use crate::eligibility::SystemFeatures;
use crate::resolver::ReadinessMode;

pub const DEFAULT_MARKETPLACE_URL: &str = "https://marketplace.dify.ai";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
	data_dir: std::path::PathBuf,
	marketplace_url: String,
	https_only: bool,
	#[serde(default)]
	readiness: ReadinessMode,
	#[serde(default)]
	features: SystemFeatures,
}

fn base_dir(xdg_var: &str, home_fallback: &str) -> std::path::PathBuf {
	#[cfg(target_os = "windows")]
	let path = {
		let _ = (xdg_var, home_fallback);
		std::env::var("APPDATA").map(std::path::PathBuf::from).unwrap_or_else(|_| std::path::PathBuf::from("."))
	};

	#[cfg(not(target_os = "windows"))]
	let path = if let Ok(e) = std::env::var(xdg_var) {
		std::path::PathBuf::from(e)
	} else if let Ok(home) = std::env::var("HOME") {
		std::path::PathBuf::from(home).join(home_fallback)
	} else {
		std::path::PathBuf::from(".")
	};

	path.join("bundle-rs")
}

impl Default for Config {
	fn default() -> Self {
		Self {
			data_dir: base_dir("XDG_DATA_HOME", ".local/share").join("data"),
			marketplace_url: DEFAULT_MARKETPLACE_URL.to_owned(),
			https_only: true,
			readiness: ReadinessMode::default(),
			features: SystemFeatures::default(),
		}
	}
}

impl Config {
	/// Location of the config file.
	pub fn path() -> std::path::PathBuf {
		base_dir("XDG_CONFIG_HOME", ".config").join("config.json")
	}

	/// Loads the config file from its default location.
	///
	/// # Errors
	/// - [`IO`](crate::error::Error::IO) when opening or reading from the file.
	/// - [`SerdeJSON`](crate::error::Error::SerdeJSON) when deserializing the file.
	pub fn load_from_disk() -> crate::Result<Self> {
		Self::load_from_file(Self::path())
	}

	pub fn load_from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	/// Saves the config to its default location, creating parent directories.
	pub fn save_to_disk(&self) -> crate::Result<()> {
		let path = Self::path();
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		let file = std::fs::File::create(path)?;
		serde_json::to_writer_pretty(file, self)?;
		Ok(())
	}

	pub fn data_dir(&self) -> &std::path::PathBuf {
		&self.data_dir
	}
	pub fn set_data_dir(&mut self, data_dir: std::path::PathBuf) {
		self.data_dir = data_dir;
	}

	pub fn marketplace_url(&self) -> &str {
		&self.marketplace_url
	}
	/// Sets the marketplace base URL.
	///
	/// # Errors
	/// - [`Validation`](crate::error::Error::Validation) when `https_only` is set and the URL is not https.
	pub fn set_marketplace_url(&mut self, url: impl Into<String>) -> crate::Result<()> {
		let url = url.into();
		if self.https_only && !url.starts_with("https://") {
			return Err(crate::Error::Validation(format!("marketplace url `{}` is not https", url)));
		}
		self.marketplace_url = url;
		Ok(())
	}

	pub fn https_only(&self) -> bool {
		self.https_only
	}
	pub fn set_https_only(&mut self, https_only: bool) {
		self.https_only = https_only;
	}

	pub fn readiness(&self) -> ReadinessMode {
		self.readiness
	}
	pub fn set_readiness(&mut self, readiness: ReadinessMode) {
		self.readiness = readiness;
	}

	pub fn features(&self) -> &SystemFeatures {
		&self.features
	}
	pub fn set_features(&mut self, features: SystemFeatures) {
		self.features = features;
	}
}

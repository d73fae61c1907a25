//! Library error type.
//!
//! Per-position resolution failures are not errors, they are recorded as error indexes
//! on the resolution session. This type covers collaborators, files and configuration.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("validation error: {0}")]
	Validation(String),
	/// A bulk marketplace lookup failed as a whole.
	#[error("marketplace error: {0}")]
	Marketplace(String),
	/// A single version-control dependency could not be fetched.
	#[error("VCS fetch error: {0}")]
	VcsFetch(String),
}

//! Marketplace lookups over HTTP.

use serde::*;

use super::MarketplaceSource;
use crate::dependency::{MarketplaceDependency, PluginTriple};
use crate::resolver::MarketplaceListing;

#[derive(Debug, Deserialize)]
struct ListResponse {
	#[serde(default)]
	code: i64,
	#[serde(default)]
	msg: String,
	#[serde(default)]
	data: Option<ListData>,
}

#[derive(Debug, Deserialize)]
struct ListData {
	#[serde(default)]
	list: Vec<Option<MarketplaceListing>>,
}

#[derive(Debug, Serialize)]
struct ByIdsRequest<'a> {
	plugin_tuples: &'a [PluginTriple],
}

#[derive(Debug, Serialize)]
struct ByMetaRequest<'a> {
	unique_identifiers: Vec<&'a str>,
}

#[derive(Debug, Clone)]
pub struct HttpMarketplace {
	client: reqwest::Client,
	base_url: String,
}

impl HttpMarketplace {
	/// Creates a client for the marketplace configured in `config`.
	///
	/// # Errors
	/// - [`Validation`](crate::error::Error::Validation) when `https_only` is set and the URL is not https.
	pub fn new(config: &crate::Config) -> crate::Result<Self> {
		Self::with_client(reqwest::Client::new(), config.marketplace_url(), config.https_only())
	}

	pub fn with_client(client: reqwest::Client, base_url: &str, https_only: bool) -> crate::Result<Self> {
		if https_only && !base_url.starts_with("https://") {
			return Err(crate::Error::Validation(format!("marketplace url `{}` is not https", base_url)));
		}
		Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned() })
	}

	/// # Errors
	/// - [`Reqwest`](crate::error::Error::Reqwest) on transport failures and error statuses.
	/// - [`Marketplace`](crate::error::Error::Marketplace) when the marketplace reports a failure in the body.
	async fn post_batch(&self, path: &str, body: &impl Serialize) -> crate::Result<Vec<Option<MarketplaceListing>>> {
		let url = format!("{}/api/v1/{}", self.base_url, path);
		log::debug!("Querying marketplace {}", url);
		let response: ListResponse = self.client
			.post(&url)
			.json(body)
			.send()
			.await?
			.error_for_status()?
			.json()
			.await?;

		match response.data {
			Some(data) if response.code == 0 => Ok(data.list),
			_ => Err(crate::Error::Marketplace(format!("{} answered with code {}: {}", url, response.code, response.msg))),
		}
	}
}

impl MarketplaceSource for HttpMarketplace {
	async fn fetch_by_ids(&self, triples: &[PluginTriple]) -> crate::Result<Vec<Option<MarketplaceListing>>> {
		self.post_batch("plugins/versions/batch", &ByIdsRequest { plugin_tuples: triples }).await
	}

	async fn fetch_by_meta(&self, references: &[MarketplaceDependency]) -> crate::Result<Vec<Option<MarketplaceListing>>> {
		let unique_identifiers = references.iter().map(|r| r.marketplace_plugin_unique_identifier.as_str()).collect();
		self.post_batch("plugins/identifier/batch", &ByMetaRequest { unique_identifiers }).await
	}
}

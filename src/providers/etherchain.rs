use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::providers::{GaspriceData, GaspriceProvider, ProviderOutcome};

const ETHERCHAIN_URL: &str = "https://www.etherchain.org/api/gasPriceOracle";

/// A client over HTTP for the [Etherchain](https://www.etherchain.org/api/gasPriceOracle)
/// gas price oracle that implements the `GaspriceProvider` trait.
///
/// Requires no credentials and reports all four tiers.
#[derive(Clone, Debug)]
#[must_use]
pub struct Etherchain {
    client: Client,
    url: Url,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtherchainResponse {
    #[serde(default)]
    pub safe_low: Option<f64>,
    #[serde(default)]
    pub standard: Option<f64>,
    #[serde(default)]
    pub fast: Option<f64>,
    #[serde(default)]
    pub fastest: Option<f64>,
}

impl Default for Etherchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Etherchain {
    /// Creates a new Etherchain gas price provider.
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Same as [`Self::new`] but with a custom [`Client`].
    pub fn with_client(client: Client) -> Self {
        let url = Url::parse(ETHERCHAIN_URL).expect("invalid url");
        Etherchain { client, url }
    }

    /// Perform a request to the gas price API and deserialize the response.
    pub async fn query(&self) -> Result<EtherchainResponse, reqwest::Error> {
        self.client.get(self.url.clone()).send().await?.error_for_status()?.json().await
    }
}

#[async_trait]
impl GaspriceProvider for Etherchain {
    fn title(&self) -> &'static str {
        "etherchain"
    }

    async fn get_gasprice(&self) -> ProviderOutcome {
        let response = match self.query().await {
            Ok(response) => response,
            Err(err) => {
                debug!("etherchain request failed: {err}");
                return ProviderOutcome::failure();
            }
        };

        let gwei = |value: Option<f64>| value.map(|v| v as u128);
        ProviderOutcome::success(GaspriceData {
            slow: gwei(response.safe_low),
            regular: gwei(response.standard),
            fast: gwei(response.fast),
            fastest: gwei(response.fastest),
        })
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::providers::{GaspriceData, GaspriceProvider, ProviderOutcome};

const ETH_GAS_STATION_URL: &str = "https://ethgasstation.info/api/ethgasAPI.json";

/// A client over HTTP for the [EthGasStation](https://ethgasstation.info/) API
/// that implements the `GaspriceProvider` trait.
///
/// An API key is required; without one the provider fails immediately,
/// skipping the network call. The key falls back to the
/// `ETHGASPRICE_ETHGASSTATION` environment variable when constructed through
/// the registry.
#[derive(Clone, Debug)]
#[must_use]
pub struct EthGasStation {
    client: Client,
    url: Url,
    api_key: Option<String>,
}

/// EthGasStation reports prices in x10 gwei (divide by 10 to get gwei).
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthGasStationResponse {
    #[serde(default)]
    pub safe_low: Option<f64>,
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub fast: Option<f64>,
    #[serde(default)]
    pub fastest: Option<f64>,
}

impl EthGasStation {
    /// Creates a new EthGasStation gas price provider.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Same as [`Self::new`] but with a custom [`Client`].
    pub fn with_client(client: Client, api_key: Option<String>) -> Self {
        let url = Url::parse(ETH_GAS_STATION_URL).expect("invalid url");
        EthGasStation { client, url, api_key }
    }

    /// Perform a request to the gas price API and deserialize the response.
    pub async fn query(&self, api_key: &str) -> Result<EthGasStationResponse, reqwest::Error> {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("api-key", api_key);
        self.client.get(url).send().await?.error_for_status()?.json().await
    }
}

#[async_trait]
impl GaspriceProvider for EthGasStation {
    fn title(&self) -> &'static str {
        "ethgasstation"
    }

    async fn get_gasprice(&self) -> ProviderOutcome {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                debug!("ethgasstation api key missing, skipping request");
                return ProviderOutcome::failure();
            }
        };

        let response = match self.query(api_key).await {
            Ok(response) => response,
            Err(err) => {
                debug!("ethgasstation request failed: {err}");
                return ProviderOutcome::failure();
            }
        };

        // upstream unit is gwei * 10
        let scale = |value: Option<f64>| value.map(|v| v as u128 / 10);
        ProviderOutcome::success(GaspriceData {
            slow: scale(response.safe_low),
            regular: scale(response.average),
            fast: scale(response.fast),
            fastest: scale(response.fastest),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn scales_x10_gwei_values_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("api-key", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "safeLow": 250.0,
                "average": 300,
                "fast": 55,
                "fastest": 600,
                "blockNum": 16000000,
            })))
            .mount(&server)
            .await;

        let mut provider = EthGasStation::new(Some("key".into()));
        provider.url = Url::parse(&server.uri()).unwrap();

        let outcome = provider.get_gasprice().await;
        assert!(outcome.success);
        assert_eq!(outcome.data.slow, Some(25));
        assert_eq!(outcome.data.regular, Some(30));
        assert_eq!(outcome.data.fast, Some(5));
        assert_eq!(outcome.data.fastest, Some(60));
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_a_request() {
        let server = MockServer::start().await;
        let mut provider = EthGasStation::new(None);
        provider.url = Url::parse(&server.uri()).unwrap();

        let outcome = provider.get_gasprice().await;
        assert!(!outcome.success);
        assert!(outcome.data.is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn http_error_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let mut provider = EthGasStation::new(Some("key".into()));
        provider.url = Url::parse(&server.uri()).unwrap();

        let outcome = provider.get_gasprice().await;
        assert!(!outcome.success);
        assert!(outcome.data.is_empty());
    }

    #[tokio::test]
    async fn missing_fields_degrade_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "fast": 55 })))
            .mount(&server)
            .await;

        let mut provider = EthGasStation::new(Some("key".into()));
        provider.url = Url::parse(&server.uri()).unwrap();

        let outcome = provider.get_gasprice().await;
        assert!(outcome.success);
        assert_eq!(outcome.data.fast, Some(5));
        assert_eq!(outcome.data.slow, None);
    }
}

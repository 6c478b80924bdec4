use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use tracing::debug;
use url::Url;

use crate::providers::{GaspriceData, GaspriceProvider, ProviderOutcome};

const ETHERSCAN_URL: &str = "https://api.etherscan.io/api";

/// A client over HTTP for the [Etherscan gas tracker](https://etherscan.io/gastracker)
/// that implements the `GaspriceProvider` trait.
///
/// Works without an API key, but Etherscan rate-limits keyless calls
/// aggressively. The key falls back to the `ETHGASPRICE_ETHERSCAN`
/// environment variable when constructed through the registry.
///
/// Does not report a `slow` tier.
#[derive(Clone, Debug)]
#[must_use]
pub struct Etherscan {
    client: Client,
    url: Url,
    api_key: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EtherscanResponse {
    /// `"1"` on success; anything else marks a degraded or rejected call
    pub status: String,
    #[serde(default)]
    pub result: Option<EtherscanResult>,
}

/// Gas oracle numbers, sent by Etherscan as JSON strings.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EtherscanResult {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub safe_gas_price: Option<u128>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub propose_gas_price: Option<u128>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub fast_gas_price: Option<u128>,
}

impl Etherscan {
    /// Creates a new Etherscan gas price provider.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Same as [`Self::new`] but with a custom [`Client`].
    pub fn with_client(client: Client, api_key: Option<String>) -> Self {
        let url = Url::parse(ETHERSCAN_URL).expect("invalid url");
        Etherscan { client, url, api_key }
    }

    /// Perform a request to the gas tracker API and deserialize the response.
    pub async fn query(&self) -> Result<EtherscanResponse, reqwest::Error> {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("module", "gastracker")
            .append_pair("action", "gasoracle");
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("apikey", key);
        }
        self.client.get(url).send().await?.error_for_status()?.json().await
    }
}

#[async_trait]
impl GaspriceProvider for Etherscan {
    fn title(&self) -> &'static str {
        "etherscan"
    }

    async fn get_gasprice(&self) -> ProviderOutcome {
        let response = match self.query().await {
            Ok(response) => response,
            Err(err) => {
                debug!("etherscan request failed: {err}");
                return ProviderOutcome::failure();
            }
        };

        if response.status != "1" {
            return ProviderOutcome::failure();
        }
        let result = match response.result {
            Some(result) => result,
            None => return ProviderOutcome::failure(),
        };

        ProviderOutcome::success(GaspriceData {
            slow: None,
            regular: result.safe_gas_price,
            fast: result.propose_gas_price,
            fastest: result.fast_gas_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn provider_for(server: &MockServer) -> Etherscan {
        let mut provider = Etherscan::new(Some("key".into()));
        provider.url = Url::parse(&server.uri()).unwrap();
        provider
    }

    #[tokio::test]
    async fn normalizes_gas_oracle_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("module", "gastracker"))
            .and(query_param("action", "gasoracle"))
            .and(query_param("apikey", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "message": "OK",
                "result": {
                    "LastBlock": "16000000",
                    "SafeGasPrice": "30",
                    "ProposeGasPrice": "32",
                    "FastGasPrice": "35",
                    "suggestBaseFee": "29.751",
                }
            })))
            .mount(&server)
            .await;

        let outcome = provider_for(&server).await.get_gasprice().await;
        assert!(outcome.success);
        assert_eq!(outcome.data.slow, None);
        assert_eq!(outcome.data.regular, Some(30));
        assert_eq!(outcome.data.fast, Some(32));
        assert_eq!(outcome.data.fastest, Some(35));
    }

    #[tokio::test]
    async fn payload_status_zero_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "0",
                "message": "NOTOK",
            })))
            .mount(&server)
            .await;

        let outcome = provider_for(&server).await.get_gasprice().await;
        assert!(!outcome.success);
        assert!(outcome.data.is_empty());
    }

    #[tokio::test]
    async fn http_error_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let outcome = provider_for(&server).await.get_gasprice().await;
        assert!(!outcome.success);
        assert!(outcome.data.is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let outcome = provider_for(&server).await.get_gasprice().await;
        assert!(!outcome.success);
    }
}

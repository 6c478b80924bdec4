use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::providers::{GaspriceData, GaspriceProvider, ProviderOutcome};

const POA_URL: &str = "https://gasprice.poa.network/";

/// A client over HTTP for the [POA Network gas price oracle](https://gasprice.poa.network/)
/// that implements the `GaspriceProvider` trait.
///
/// The oracle reports its own health in the payload; a reachable but
/// degraded endpoint (`"health": false`) is treated as a failure.
#[derive(Clone, Debug)]
#[must_use]
pub struct Poa {
    client: Client,
    url: Url,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PoaResponse {
    #[serde(default)]
    pub health: bool,
    #[serde(default)]
    pub slow: Option<f64>,
    #[serde(default)]
    pub standard: Option<f64>,
    #[serde(default)]
    pub fast: Option<f64>,
    #[serde(default)]
    pub instant: Option<f64>,
}

impl Default for Poa {
    fn default() -> Self {
        Self::new()
    }
}

impl Poa {
    /// Creates a new POA Network gas price provider.
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Same as [`Self::new`] but with a custom [`Client`].
    pub fn with_client(client: Client) -> Self {
        let url = Url::parse(POA_URL).expect("invalid url");
        Poa { client, url }
    }

    /// Perform a request to the gas price API and deserialize the response.
    pub async fn query(&self) -> Result<PoaResponse, reqwest::Error> {
        self.client.get(self.url.clone()).send().await?.error_for_status()?.json().await
    }
}

#[async_trait]
impl GaspriceProvider for Poa {
    fn title(&self) -> &'static str {
        "poa"
    }

    async fn get_gasprice(&self) -> ProviderOutcome {
        let response = match self.query().await {
            Ok(response) => response,
            Err(err) => {
                debug!("poa request failed: {err}");
                return ProviderOutcome::failure();
            }
        };

        if !response.health {
            debug!("poa oracle reported itself unhealthy");
            return ProviderOutcome::failure();
        }

        let gwei = |value: Option<f64>| value.map(|v| v as u128);
        ProviderOutcome::success(GaspriceData {
            slow: gwei(response.slow),
            regular: gwei(response.standard),
            fast: gwei(response.fast),
            fastest: gwei(response.instant),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn maps_instant_to_fastest() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "health": true,
                "block_number": 16000000,
                "slow": 18.1,
                "standard": 22.0,
                "fast": 26.4,
                "instant": 32.9,
            })))
            .mount(&server)
            .await;

        let mut provider = Poa::new();
        provider.url = Url::parse(&server.uri()).unwrap();

        let outcome = provider.get_gasprice().await;
        assert!(outcome.success);
        assert_eq!(outcome.data.slow, Some(18));
        assert_eq!(outcome.data.regular, Some(22));
        assert_eq!(outcome.data.fast, Some(26));
        assert_eq!(outcome.data.fastest, Some(32));
    }

    #[tokio::test]
    async fn unhealthy_oracle_is_a_failure_even_with_prices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "health": false,
                "slow": 18.1,
                "standard": 22.0,
                "fast": 26.4,
                "instant": 32.9,
            })))
            .mount(&server)
            .await;

        let mut provider = Poa::new();
        provider.url = Url::parse(&server.uri()).unwrap();

        let outcome = provider.get_gasprice().await;
        assert!(!outcome.success);
        assert!(outcome.data.is_empty());
    }

    #[tokio::test]
    async fn missing_health_flag_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "fast": 26.4 })))
            .mount(&server)
            .await;

        let mut provider = Poa::new();
        provider.url = Url::parse(&server.uri()).unwrap();

        let outcome = provider.get_gasprice().await;
        assert!(!outcome.success);
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::providers::{GaspriceData, GaspriceProvider, ProviderOutcome};

const GWEI_TO_WEI: u128 = 1_000_000_000;

/// Gas price provider backed by an Ethereum node's JSON-RPC endpoint.
///
/// Issues a single `eth_gasPrice` call, which reports the node's current
/// price in wei. Only the `regular` tier is populated; the node has no
/// notion of urgency tiers.
///
/// The node URL falls back to the `ETHGASPRICE_WEB3` environment variable
/// when constructed through the registry. Without a URL the provider fails
/// immediately, skipping the network call.
#[derive(Clone, Debug)]
#[must_use]
pub struct Web3 {
    client: Client,
    url: Option<Url>,
}

#[derive(Clone, Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<String>,
}

impl Web3 {
    /// Creates a new node-RPC gas price provider.
    pub fn new(url: Option<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    /// Same as [`Self::new`] but with a custom [`Client`].
    pub fn with_client(client: Client, url: Option<String>) -> Self {
        let url = url.and_then(|u| Url::parse(&u).ok());
        Web3 { client, url }
    }

    /// Perform an `eth_gasPrice` JSON-RPC request against the node.
    async fn query(&self, url: &Url) -> Result<JsonRpcResponse, reqwest::Error> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "eth_gasPrice",
            "params": [],
            "id": 1,
        });
        self.client.post(url.clone()).json(&payload).send().await?.error_for_status()?.json().await
    }
}

/// Parses a JSON-RPC quantity (`"0x..."`) into a wei amount.
fn parse_quantity(quantity: &str) -> Option<u128> {
    let hex = quantity.strip_prefix("0x")?;
    u128::from_str_radix(hex, 16).ok()
}

#[async_trait]
impl GaspriceProvider for Web3 {
    fn title(&self) -> &'static str {
        "web3"
    }

    async fn get_gasprice(&self) -> ProviderOutcome {
        let url = match &self.url {
            Some(url) => url,
            None => {
                debug!("web3 node url missing, skipping request");
                return ProviderOutcome::failure();
            }
        };

        let response = match self.query(url).await {
            Ok(response) => response,
            Err(err) => {
                debug!("web3 request failed: {err}");
                return ProviderOutcome::failure();
            }
        };

        let wei = match response.result.as_deref().and_then(parse_quantity) {
            Some(wei) => wei,
            None => {
                debug!("web3 node returned no usable gas price");
                return ProviderOutcome::failure();
            }
        };

        ProviderOutcome::success(GaspriceData {
            regular: Some(wei / GWEI_TO_WEI),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn converts_node_price_to_regular_gwei() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "eth_gasPrice" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                // 2_000_000_000 wei
                "result": "0x77359400",
            })))
            .mount(&server)
            .await;

        let provider = Web3::new(Some(server.uri()));
        let outcome = provider.get_gasprice().await;
        assert!(outcome.success);
        assert_eq!(outcome.data.regular, Some(2));
        assert_eq!(outcome.data.slow, None);
        assert_eq!(outcome.data.fast, None);
        assert_eq!(outcome.data.fastest, None);
    }

    #[tokio::test]
    async fn missing_url_fails_without_a_request() {
        let provider = Web3::new(None);
        let outcome = provider.get_gasprice().await;
        assert!(!outcome.success);
        assert!(outcome.data.is_empty());
    }

    #[tokio::test]
    async fn rpc_error_response_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32601, "message": "method not found" },
            })))
            .mount(&server)
            .await;

        let provider = Web3::new(Some(server.uri()));
        let outcome = provider.get_gasprice().await;
        assert!(!outcome.success);
        assert!(outcome.data.is_empty());
    }

    #[test]
    fn parses_hex_quantities() {
        assert_eq!(parse_quantity("0x0"), Some(0));
        assert_eq!(parse_quantity("0x77359400"), Some(2_000_000_000));
        assert_eq!(parse_quantity("77359400"), None);
        assert_eq!(parse_quantity("0xzz"), None);
    }
}

use std::collections::HashMap;

use futures_util::future::join_all;
use reqwest::Client;
use tracing::warn;

use crate::error::{GaspriceError, Result};
use crate::providers::{GaspriceData, GaspriceStrategy};
use crate::registry::{ProviderKind, ProviderRegistry, ProviderSettings};
use crate::units::{convert_units, EthereumUnit};

/// Entrypoint for fetching gas prices.
///
/// A controller holds a priority-ordered list of provider identifiers, the
/// secrets they need and a shared HTTP client. Every retrieval walks the
/// priority list, constructing providers fresh through the
/// [`ProviderRegistry`]; readings come back in gwei and are converted into
/// the configured return unit before being handed to the caller.
///
/// # Example
///
/// ```no_run
/// use ethereum_gasprice::{
///     EthereumUnit, GaspriceController, GaspriceStrategy, ProviderKind, ProviderSettings,
/// };
///
/// # async fn foo() -> Result<(), Box<dyn std::error::Error>> {
/// let controller = GaspriceController::new(
///     EthereumUnit::Wei,
///     vec![ProviderKind::Etherscan, ProviderKind::Etherchain, ProviderKind::Poa],
///     ProviderSettings::new().secret("etherscan", "my-api-key"),
/// )?;
///
/// let fast = controller.get_gasprice_by_strategy(GaspriceStrategy::Fast).await?;
/// println!("fast gas price: {fast:?} wei");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use]
pub struct GaspriceController {
    return_unit: EthereumUnit,
    priority: Vec<ProviderKind>,
    settings: ProviderSettings,
    registry: ProviderRegistry,
    client: Client,
}

impl GaspriceController {
    /// Creates a controller with the default registry and a fresh HTTP
    /// client.
    ///
    /// Fails with [`GaspriceError::EmptyProviderList`] when `priority` is
    /// empty.
    pub fn new(
        return_unit: EthereumUnit,
        priority: Vec<ProviderKind>,
        settings: ProviderSettings,
    ) -> Result<Self> {
        if priority.is_empty() {
            return Err(GaspriceError::EmptyProviderList);
        }

        Ok(GaspriceController {
            return_unit,
            priority,
            settings,
            registry: ProviderRegistry::new(),
            client: Client::new(),
        })
    }

    /// Replaces the HTTP client shared by all providers for this
    /// controller's lifetime. Use this to configure timeouts; the controller
    /// imposes none of its own.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Replaces the provider registry, e.g. to swap in custom provider
    /// implementations.
    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn return_unit(&self) -> EthereumUnit {
        self.return_unit
    }

    fn convert(&self, value: Option<u128>) -> Option<u128> {
        convert_units(value, EthereumUnit::Gwei, self.return_unit)
    }

    /// Returns the gas price for one urgency tier from the first provider
    /// in priority order that succeeds and populates that tier.
    ///
    /// Remaining providers are never queried once a value is found.
    /// `Ok(None)` means every source failed or lacks the tier; errors are
    /// reserved for registry misconfiguration.
    pub async fn get_gasprice_by_strategy(
        &self,
        strategy: GaspriceStrategy,
    ) -> Result<Option<u128>> {
        for kind in &self.priority {
            let provider = self.registry.construct(*kind, &self.settings, &self.client)?;
            let outcome = provider.get_gasprice().await;
            if !outcome.success {
                warn!(provider = kind.title(), "gasprice fetch failed, trying next provider");
                continue;
            }
            if let Some(value) = outcome.data.get(strategy) {
                return Ok(self.convert(Some(value)));
            }
        }

        Ok(None)
    }

    /// Returns the full four-tier reading from the first provider that
    /// succeeds, converted into the return unit.
    ///
    /// Readings are not merged across providers; tiers the winning provider
    /// does not support stay `None`. `Ok(None)` means no provider succeeded.
    pub async fn get_gasprices(&self) -> Result<Option<GaspriceData>> {
        for kind in &self.priority {
            let provider = self.registry.construct(*kind, &self.settings, &self.client)?;
            let outcome = provider.get_gasprice().await;
            if !outcome.success {
                warn!(provider = kind.title(), "gasprice fetch failed, trying next provider");
                continue;
            }
            return Ok(Some(outcome.data.map(|v| self.convert(v))));
        }

        Ok(None)
    }

    /// Queries every configured provider concurrently and returns each
    /// full reading keyed by provider title.
    ///
    /// Failed providers stay visible: they contribute an all-`None` reading
    /// under their title instead of being omitted. Useful for
    /// cross-validating sources or averaging on the caller's side.
    pub async fn get_gasprice_from_all_sources(&self) -> Result<HashMap<String, GaspriceData>> {
        let mut providers = Vec::with_capacity(self.priority.len());
        for kind in &self.priority {
            providers.push(self.registry.construct(*kind, &self.settings, &self.client)?);
        }

        let outcomes = join_all(providers.iter().map(|p| p.get_gasprice())).await;

        let mut data = HashMap::with_capacity(providers.len());
        for (provider, outcome) in providers.iter().zip(outcomes) {
            if !outcome.success {
                warn!(provider = provider.title(), "gasprice fetch failed");
            }
            data.insert(provider.title().to_string(), outcome.data.map(|v| self.convert(v)));
        }

        Ok(data)
    }
}

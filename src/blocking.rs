//! Blocking counterpart of [`GaspriceController`](crate::GaspriceController).
//!
//! Drives the async controller on a private current-thread runtime, for
//! callers without an async runtime of their own. Functionally equivalent to
//! the async API, one sequential network call at a time (the all-sources
//! fan-out still runs its requests concurrently on the private runtime).

use std::collections::HashMap;

use reqwest::Client;
use tokio::runtime::{Builder, Runtime};

use crate::controller;
use crate::error::Result;
use crate::providers::{GaspriceData, GaspriceStrategy};
use crate::registry::{ProviderKind, ProviderRegistry, ProviderSettings};
use crate::units::EthereumUnit;

/// Blocking entrypoint for fetching gas prices.
///
/// # Example
///
/// ```no_run
/// use ethereum_gasprice::{
///     blocking::GaspriceController, EthereumUnit, GaspriceStrategy, ProviderKind,
///     ProviderSettings,
/// };
///
/// # fn foo() -> Result<(), Box<dyn std::error::Error>> {
/// let controller = GaspriceController::new(
///     EthereumUnit::Gwei,
///     vec![ProviderKind::Etherchain, ProviderKind::Poa],
///     ProviderSettings::new(),
/// )?;
/// let fast = controller.get_gasprice_by_strategy(GaspriceStrategy::Fast)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use]
pub struct GaspriceController {
    inner: controller::GaspriceController,
    runtime: Runtime,
}

impl GaspriceController {
    /// Creates a blocking controller. See
    /// [`GaspriceController::new`](controller::GaspriceController::new) for
    /// the validation rules.
    pub fn new(
        return_unit: EthereumUnit,
        priority: Vec<ProviderKind>,
        settings: ProviderSettings,
    ) -> Result<Self> {
        let inner = controller::GaspriceController::new(return_unit, priority, settings)?;
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(GaspriceController { inner, runtime })
    }

    /// Replaces the HTTP client shared by all providers.
    pub fn with_client(mut self, client: Client) -> Self {
        self.inner = self.inner.with_client(client);
        self
    }

    /// Replaces the provider registry.
    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.inner = self.inner.with_registry(registry);
        self
    }

    /// Blocking version of
    /// [`get_gasprice_by_strategy`](controller::GaspriceController::get_gasprice_by_strategy).
    pub fn get_gasprice_by_strategy(&self, strategy: GaspriceStrategy) -> Result<Option<u128>> {
        self.runtime.block_on(self.inner.get_gasprice_by_strategy(strategy))
    }

    /// Blocking version of
    /// [`get_gasprices`](controller::GaspriceController::get_gasprices).
    pub fn get_gasprices(&self) -> Result<Option<GaspriceData>> {
        self.runtime.block_on(self.inner.get_gasprices())
    }

    /// Blocking version of
    /// [`get_gasprice_from_all_sources`](controller::GaspriceController::get_gasprice_from_all_sources).
    pub fn get_gasprice_from_all_sources(&self) -> Result<HashMap<String, GaspriceData>> {
        self.runtime.block_on(self.inner.get_gasprice_from_all_sources())
    }
}

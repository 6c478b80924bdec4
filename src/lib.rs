//! # ethereum-gasprice
//!
//! A unified client for fetching current Ethereum gas price estimates from
//! several independent sources, normalized into one schema.
//!
//! Each source is a [`GaspriceProvider`]: it knows its endpoint, how to
//! authenticate and how to map the upstream payload into the four urgency
//! tiers of [`GaspriceStrategy`]. The [`GaspriceController`] walks providers
//! in a configured priority order and exposes three retrieval strategies:
//!
//! - [`get_gasprice_by_strategy`](GaspriceController::get_gasprice_by_strategy):
//!   first provider with a value for one tier
//! - [`get_gasprices`](GaspriceController::get_gasprices): full reading from
//!   the first provider that succeeds
//! - [`get_gasprice_from_all_sources`](GaspriceController::get_gasprice_from_all_sources):
//!   concurrent fan-out over every source, for cross-validation
//!
//! Provider failures degrade to `None` values instead of erroring, so one
//! slow or broken source never aborts a query.
//!
//! ## Example
//!
//! ```no_run
//! use ethereum_gasprice::{
//!     EthereumUnit, GaspriceController, GaspriceStrategy, ProviderKind, ProviderSettings,
//! };
//!
//! # async fn foo() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = GaspriceController::new(
//!     EthereumUnit::Gwei,
//!     vec![ProviderKind::Etherscan, ProviderKind::EthGasStation, ProviderKind::Etherchain],
//!     ProviderSettings::new()
//!         .secret("etherscan", "etherscan-api-key")
//!         .secret("ethgasstation", "ethgasstation-api-key"),
//! )?;
//!
//! if let Some(gwei) = controller.get_gasprice_by_strategy(GaspriceStrategy::Fast).await? {
//!     println!("fast gas price: {gwei} gwei");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! A blocking API with identical semantics lives in the [`blocking`] module
//! (cargo feature `blocking`, on by default).

#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod controller;
pub mod error;
pub mod providers;
pub mod registry;
pub mod units;

#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub mod blocking;

pub use controller::GaspriceController;
pub use error::GaspriceError;
pub use providers::{GaspriceData, GaspriceProvider, GaspriceStrategy, ProviderOutcome};
pub use registry::{ProviderKind, ProviderRegistry, ProviderSettings};
pub use units::{convert_units, EthereumUnit};

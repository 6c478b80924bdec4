mod etherchain;
pub use etherchain::Etherchain;

mod eth_gas_station;
pub use eth_gas_station::EthGasStation;

mod etherscan;
pub use etherscan::Etherscan;

mod poa;
pub use poa::Poa;

mod web3;
pub use web3::Web3;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Various gas price urgency tiers. Not every provider populates all of them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaspriceStrategy {
    Slow,
    Regular,
    Fast,
    Fastest,
}

impl GaspriceStrategy {
    pub const ALL: [GaspriceStrategy; 4] = [
        GaspriceStrategy::Slow,
        GaspriceStrategy::Regular,
        GaspriceStrategy::Fast,
        GaspriceStrategy::Fastest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GaspriceStrategy::Slow => "slow",
            GaspriceStrategy::Regular => "regular",
            GaspriceStrategy::Fast => "fast",
            GaspriceStrategy::Fastest => "fastest",
        }
    }
}

impl fmt::Display for GaspriceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gas price reading normalized into the four urgency tiers.
///
/// Values are in gwei until the controller converts them to its configured
/// return unit. A tier a provider does not support stays `None`; `None` means
/// "unknown", not zero.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GaspriceData {
    pub slow: Option<u128>,
    pub regular: Option<u128>,
    pub fast: Option<u128>,
    pub fastest: Option<u128>,
}

impl GaspriceData {
    pub fn get(&self, strategy: GaspriceStrategy) -> Option<u128> {
        match strategy {
            GaspriceStrategy::Slow => self.slow,
            GaspriceStrategy::Regular => self.regular,
            GaspriceStrategy::Fast => self.fast,
            GaspriceStrategy::Fastest => self.fastest,
        }
    }

    pub fn set(&mut self, strategy: GaspriceStrategy, value: Option<u128>) {
        match strategy {
            GaspriceStrategy::Slow => self.slow = value,
            GaspriceStrategy::Regular => self.regular = value,
            GaspriceStrategy::Fast => self.fast = value,
            GaspriceStrategy::Fastest => self.fastest = value,
        }
    }

    /// Applies `f` to every tier, `None`s included.
    pub fn map<F>(self, f: F) -> Self
    where
        F: Fn(Option<u128>) -> Option<u128>,
    {
        GaspriceData {
            slow: f(self.slow),
            regular: f(self.regular),
            fast: f(self.fast),
            fastest: f(self.fastest),
        }
    }

    pub fn is_empty(&self) -> bool {
        GaspriceStrategy::ALL.iter().all(|s| self.get(*s).is_none())
    }
}

/// The result of a single provider call.
///
/// When `success` is `false` the reading is always the all-`None` template,
/// never partially populated.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ProviderOutcome {
    pub success: bool,
    pub data: GaspriceData,
}

impl ProviderOutcome {
    pub fn success(data: GaspriceData) -> Self {
        ProviderOutcome { success: true, data }
    }

    pub fn failure() -> Self {
        ProviderOutcome { success: false, data: GaspriceData::default() }
    }
}

/// `GaspriceProvider` is the contract a gas price source needs to implement.
///
/// `get_gasprice` is infallible by design: transport errors, non-2xx
/// statuses, malformed payloads and missing credentials are all reported as
/// [`ProviderOutcome::failure`], so a broken source degrades instead of
/// aborting a multi-source query.
///
/// # Example
///
/// ```no_run
/// use ethereum_gasprice::providers::{Etherchain, GaspriceProvider};
///
/// # async fn foo() {
/// let etherchain = Etherchain::new();
/// let outcome = etherchain.get_gasprice().await;
/// if outcome.success {
///     println!("fast gas price: {:?} gwei", outcome.data.fast);
/// }
/// # }
/// ```
#[async_trait]
pub trait GaspriceProvider: Send + Sync + fmt::Debug {
    /// Stable identifier used for priority lists, result keys and secret
    /// lookup.
    fn title(&self) -> &'static str;

    /// Queries the upstream source and normalizes its payload into the
    /// four-tier reading, in gwei.
    async fn get_gasprice(&self) -> ProviderOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_outcome_is_all_none() {
        let outcome = ProviderOutcome::failure();
        assert!(!outcome.success);
        assert!(outcome.data.is_empty());
    }

    #[test]
    fn data_tiers_round_trip_through_accessors() {
        let mut data = GaspriceData::default();
        for (i, strategy) in GaspriceStrategy::ALL.into_iter().enumerate() {
            data.set(strategy, Some(i as u128));
        }
        assert_eq!(data.get(GaspriceStrategy::Slow), Some(0));
        assert_eq!(data.get(GaspriceStrategy::Fastest), Some(3));
        assert!(!data.is_empty());
    }

    #[test]
    fn map_applies_to_every_tier() {
        let data = GaspriceData { fast: Some(5), ..Default::default() };
        let mapped = data.map(|v| v.map(|v| v * 2));
        assert_eq!(mapped.fast, Some(10));
        assert_eq!(mapped.slow, None);
    }
}

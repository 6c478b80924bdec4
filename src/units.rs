use std::{convert::TryFrom, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::GaspriceError;

/// Common Ethereum denominations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EthereumUnit {
    /// Wei is the smallest denomination
    Wei,
    /// Gwei corresponds to 1e9 Wei
    Gwei,
    /// Eth corresponds to 1e18 Wei
    Eth,
}

impl EthereumUnit {
    /// Returns the number of decimals relative to wei.
    pub fn as_num(&self) -> u32 {
        match self {
            EthereumUnit::Wei => 0,
            EthereumUnit::Gwei => 9,
            EthereumUnit::Eth => 18,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EthereumUnit::Wei => "wei",
            EthereumUnit::Gwei => "gwei",
            EthereumUnit::Eth => "eth",
        }
    }
}

impl fmt::Display for EthereumUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EthereumUnit {
    type Err = GaspriceError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src.to_lowercase().as_str() {
            "wei" => Ok(EthereumUnit::Wei),
            "gwei" => Ok(EthereumUnit::Gwei),
            "eth" | "ether" => Ok(EthereumUnit::Eth),
            _ => Err(GaspriceError::InvalidUnit(src.to_string())),
        }
    }
}

impl TryFrom<&str> for EthereumUnit {
    type Error = GaspriceError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// Converts a gas price between denominations, scaling by the fixed
/// power-of-ten ratio between them.
///
/// `None` and same-unit conversions are identities. Scaling down truncates
/// towards zero, so the result is always an integer amount of the target
/// unit.
pub fn convert_units(
    value: Option<u128>,
    unit_from: EthereumUnit,
    unit_to: EthereumUnit,
) -> Option<u128> {
    let value = value?;
    if unit_from == unit_to {
        return Some(value);
    }

    let (from, to) = (unit_from.as_num(), unit_to.as_num());
    if from > to {
        Some(value * 10u128.pow(from - to))
    } else {
        Some(value / 10u128.pow(to - from))
    }
}

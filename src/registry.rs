use std::collections::HashMap;
use std::{env, fmt, str::FromStr};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{GaspriceError, Result};
use crate::providers::{Etherchain, EthGasStation, Etherscan, GaspriceProvider, Poa, Web3};

/// Identifier for the gas price sources the registry knows how to build.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Etherscan,
    EthGasStation,
    Etherchain,
    Poa,
    Web3,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::Etherscan,
        ProviderKind::EthGasStation,
        ProviderKind::Etherchain,
        ProviderKind::Poa,
        ProviderKind::Web3,
    ];

    /// Stable title, matching [`GaspriceProvider::title`] of the built-in
    /// implementation. Used for priority lists, result keys and secret
    /// lookup.
    pub fn title(&self) -> &'static str {
        match self {
            ProviderKind::Etherscan => "etherscan",
            ProviderKind::EthGasStation => "ethgasstation",
            ProviderKind::Etherchain => "etherchain",
            ProviderKind::Poa => "poa",
            ProviderKind::Web3 => "web3",
        }
    }

    /// Environment variable consulted when no secret is registered under
    /// this provider's title.
    pub fn secret_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Etherscan => Some("ETHGASPRICE_ETHERSCAN"),
            ProviderKind::EthGasStation => Some("ETHGASPRICE_ETHGASSTATION"),
            ProviderKind::Web3 => Some("ETHGASPRICE_WEB3"),
            ProviderKind::Etherchain | ProviderKind::Poa => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ProviderKind {
    type Err = GaspriceError;

    fn from_str(src: &str) -> Result<Self> {
        match src.to_lowercase().as_str() {
            "etherscan" => Ok(ProviderKind::Etherscan),
            "ethgasstation" => Ok(ProviderKind::EthGasStation),
            "etherchain" => Ok(ProviderKind::Etherchain),
            "poa" => Ok(ProviderKind::Poa),
            "web3" => Ok(ProviderKind::Web3),
            _ => Err(GaspriceError::UnknownProvider(src.to_string())),
        }
    }
}

/// Per-provider secrets, keyed by provider title.
///
/// A missing or `None` entry falls back to the provider's environment
/// variable (see [`ProviderKind::secret_env`]). The web3 provider's "secret"
/// is its node URL.
#[derive(Clone, Debug, Default)]
pub struct ProviderSettings(HashMap<String, Option<String>>);

impl ProviderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a secret under a provider title. Builder-style, so settings
    /// can be chained inline into the controller constructor.
    pub fn secret(mut self, title: impl Into<String>, secret: impl Into<String>) -> Self {
        self.0.insert(title.into(), Some(secret.into()));
        self
    }

    /// Resolves the secret for a provider, falling back to its environment
    /// variable.
    pub fn secret_for(&self, kind: ProviderKind) -> Option<String> {
        self.0
            .get(kind.title())
            .cloned()
            .flatten()
            .or_else(|| kind.secret_env().and_then(|var| env::var(var).ok()))
    }
}

type Constructor = Box<dyn Fn(&ProviderSettings, &Client) -> Box<dyn GaspriceProvider> + Send + Sync>;

/// Maps provider identifiers to constructor closures.
///
/// The default registry knows the five built-in sources; [`register`](Self::register)
/// replaces a built-in or adds a custom construction for a kind. Providers
/// are constructed fresh for every retrieval cycle and share the
/// controller's HTTP client.
pub struct ProviderRegistry {
    constructors: HashMap<ProviderKind, Constructor>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    /// Creates a registry with all built-in providers registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(ProviderKind::Etherscan, |settings, client| {
            let secret = settings.secret_for(ProviderKind::Etherscan);
            Box::new(Etherscan::with_client(client.clone(), secret))
        });
        registry.register(ProviderKind::EthGasStation, |settings, client| {
            let secret = settings.secret_for(ProviderKind::EthGasStation);
            Box::new(EthGasStation::with_client(client.clone(), secret))
        });
        registry.register(ProviderKind::Etherchain, |_, client| {
            Box::new(Etherchain::with_client(client.clone()))
        });
        registry.register(ProviderKind::Poa, |_, client| {
            Box::new(Poa::with_client(client.clone()))
        });
        registry.register(ProviderKind::Web3, |settings, client| {
            let url = settings.secret_for(ProviderKind::Web3);
            Box::new(Web3::with_client(client.clone(), url))
        });
        registry
    }

    /// Creates a registry with no providers registered.
    pub fn empty() -> Self {
        ProviderRegistry { constructors: HashMap::new() }
    }

    /// Registers (or replaces) the constructor for a provider kind.
    pub fn register<F>(&mut self, kind: ProviderKind, constructor: F)
    where
        F: Fn(&ProviderSettings, &Client) -> Box<dyn GaspriceProvider> + Send + Sync + 'static,
    {
        self.constructors.insert(kind, Box::new(constructor));
    }

    /// Constructs a configured provider instance for one retrieval cycle.
    pub fn construct(
        &self,
        kind: ProviderKind,
        settings: &ProviderSettings,
        client: &Client,
    ) -> Result<Box<dyn GaspriceProvider>> {
        let constructor = self
            .constructors
            .get(&kind)
            .ok_or_else(|| GaspriceError::UnknownProvider(kind.title().to_string()))?;
        Ok(constructor(settings, client))
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("registered", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

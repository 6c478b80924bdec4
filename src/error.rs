use thiserror::Error;

pub type Result<T> = std::result::Result<T, GaspriceError>;

/// Error thrown when configuring a [`GaspriceController`](crate::GaspriceController)
/// or looking up a provider implementation.
///
/// Per-call provider failures (network errors, bad statuses, malformed
/// payloads) are never surfaced here; they are folded into
/// [`ProviderOutcome::failure`](crate::ProviderOutcome::failure) so that one
/// broken source cannot abort a fallback chain.
#[derive(Error, Debug)]
pub enum GaspriceError {
    /// The controller was constructed with an empty provider priority list
    #[error("providers priority list is empty")]
    EmptyProviderList,

    /// A unit string could not be parsed into one of `wei`, `gwei`, `eth`
    #[error("unrecognized ethereum unit: {0}")]
    InvalidUnit(String),

    /// No provider implementation is registered under the given identifier
    #[error("no provider implementation found for {0:?}")]
    UnknownProvider(String),

    /// The blocking runtime backing [`blocking::GaspriceController`](crate::blocking::GaspriceController)
    /// could not be started
    #[cfg(feature = "blocking")]
    #[error("failed to start blocking runtime")]
    Runtime(#[from] std::io::Error),
}

use thiserror::Error;

/// Errors returned by [`resolve`](crate::resolve).
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unknown network {0:?}")]
    UnknownNetwork(String),

    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    #[error("missing port in address {0:?}")]
    MissingPort(String),

    #[error("invalid port {0:?}")]
    InvalidPort(String),

    #[error("invalid CIDR address {0:?}")]
    InvalidCidr(String),

    #[error("unknown zone {0:?}")]
    UnknownZone(String),

    #[error("no suitable address found for {0:?}")]
    NoSuitableAddress(String),

    #[error("lookup failed: {0}")]
    Lookup(#[from] std::io::Error),
}

use thiserror::Error;

/// Boxed error used for anything the delegated transport produces.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a hostname could not be turned into addresses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("no addresses found")]
    NoAddresses,

    #[error("lookup timed out")]
    Timeout,

    #[error("{0}")]
    Failed(String),
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("lookup ip for {host}: {source}")]
    Resolution {
        host: String,
        #[source]
        source: LookupError,
    },

    #[error("request target has no host: {0}")]
    MissingHost(String),

    #[error("invalid TLS server name: {0}")]
    InvalidServerName(String),

    /// Whatever the pooled transport reported, untouched.
    #[error(transparent)]
    Exchange(BoxError),
}

impl TransportError {
    pub fn resolution(host: impl Into<String>, source: LookupError) -> Self {
        Self::Resolution {
            host: host.into(),
            source,
        }
    }

    pub fn exchange(error: impl Into<BoxError>) -> Self {
        Self::Exchange(error.into())
    }

    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution { .. })
    }
}

use thiserror::Error;

/// Convenient result alias for the routeviz library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Start and/or end were not chosen before requesting routes.
    #[error("set both start and end before requesting routes")]
    MissingEndpoints,

    /// Primary and fallback providers were both attempted and both failed.
    #[error("routing failed: primary provider: {primary}; fallback provider: {fallback}")]
    ProviderFailure {
        primary: ProviderError,
        fallback: ProviderError,
    },

    /// Primary failed and no fallback provider is configured.
    #[error("routing failed: primary provider: {primary}; no fallback provider configured")]
    FallbackUnavailable { primary: ProviderError },

    /// A route geometry is too short to search or animate.
    #[error("route geometry has {vertices} vertices; at least 2 are required")]
    EmptyGeometry { vertices: usize },

    /// An operation needed a computed route set but none exists yet.
    #[error("no routes computed yet")]
    NoRoutes,

    /// Route selection index outside the current route set.
    #[error("route index {index} is out of range (expected 0..{len})")]
    InvalidSelection { index: usize, len: usize },

    /// Raised when a coordinate literal could not be parsed or is out of range.
    #[error("invalid coordinate '{input}': {reason}")]
    InvalidCoordinate { input: String, reason: String },

    /// Raised when a place name could not be resolved to a coordinate.
    #[error("place not found: {query}")]
    PlaceNotFound { query: String },

    /// Raised when building an HTTP client fails.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Failure of a single routing provider.
///
/// These never escape the resolver on their own; they are carried inside
/// [`Error::ProviderFailure`] or [`Error::FallbackUnavailable`] once every
/// provider in the chain has been tried.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider needs a credential that was not configured.
    #[error("{provider}: missing API key")]
    MissingCredential { provider: &'static str },

    /// Network or transport failure reported by the HTTP client.
    #[error("{provider}: request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("{provider}: HTTP {status}: {message}")]
    Status {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// The provider payload lacked expected fields or could not be decoded.
    #[error("{provider}: malformed response: {message}")]
    MalformedResponse {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Name of the provider that produced this error.
    pub fn provider(&self) -> &'static str {
        match self {
            ProviderError::MissingCredential { provider }
            | ProviderError::Transport { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::MalformedResponse { provider, .. } => provider,
        }
    }

    pub(crate) fn malformed(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::MalformedResponse {
            provider,
            message: message.into(),
        }
    }
}

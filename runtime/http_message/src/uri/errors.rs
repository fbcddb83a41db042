//! Errors that can occur while parsing a URI.

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// The error returned by [`Uri::parse`] when the input doesn't follow the RFC 3986 grammar.
///
/// [`Uri::parse`]: super::Uri::parse
pub enum MalformedUriError {
    #[error("`{uri}` is not a valid URI: `{scheme}` is not a valid scheme")]
    /// The scheme must start with a letter, followed by letters, digits, `+`, `-` or `.`.
    InvalidScheme {
        /// The URI that failed to parse.
        uri: String,
        /// The offending scheme.
        scheme: String,
    },
    #[error("`{uri}` is not a valid URI: `{host}` is not a valid host")]
    /// The host contains characters that are not allowed in a registered name or in an IP literal.
    InvalidHost {
        /// The URI that failed to parse.
        uri: String,
        /// The offending host.
        host: String,
    },
    #[error("`{uri}` is not a valid URI: `{port}` is not a valid port")]
    /// The port is not a number between 1 and 65535.
    InvalidPort {
        /// The URI that failed to parse.
        uri: String,
        /// The offending port, as it appeared in the input.
        port: String,
    },
    #[error("`{uri}` is not a valid URI: the authority has user info or a port, but no host")]
    /// The authority has user info or a port, but the host is empty.
    MissingHost {
        /// The URI that failed to parse.
        uri: String,
    },
}

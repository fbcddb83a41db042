//! Errors that can occur while building or modifying a request.

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("`{method}` is not an allowed HTTP method. Expected one of: {}", .allowed.join(", "))]
#[non_exhaustive]
/// The HTTP method is not in the set of methods allowed for this kind of request.
///
/// Methods are case-sensitive: `get` is not the same as `GET`.
pub struct InvalidMethodError {
    /// The rejected method.
    pub method: String,
    /// The methods that would have been accepted.
    pub allowed: Vec<String>,
}

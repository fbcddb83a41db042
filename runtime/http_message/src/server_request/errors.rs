//! Errors that can occur while building or querying a [`ServerRequest`](super::ServerRequest).
use crate::errors::InvalidArgumentError;
use crate::request::InvalidMethodError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`ServerRequestBuilder::build`](super::ServerRequestBuilder::build).
pub enum BuildServerRequestError {
    #[error(transparent)]
    /// The method is not allowed for server requests.
    Method(#[from] InvalidMethodError),
    #[error(transparent)]
    /// The tree of uploaded files is malformed.
    UploadedFiles(#[from] InvalidArgumentError),
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to deserialize the query parameters into the expected type.\n{source}")]
#[non_exhaustive]
/// The query string couldn't be deserialized into the type you asked for.
pub struct QueryDeserializationError {
    /// What went wrong, and where.
    #[source]
    pub source: serde_path_to_error::Error<serde_html_form::de::Error>,
}

impl QueryDeserializationError {
    pub(super) fn new(source: serde_path_to_error::Error<serde_html_form::de::Error>) -> Self {
        Self { source }
    }

    /// The path to the field that failed to deserialize, e.g. `page` or `filter.tags[1]`.
    pub fn path(&self) -> String {
        self.source.path().to_string()
    }
}

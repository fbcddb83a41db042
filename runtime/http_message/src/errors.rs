//! Errors shared by several value objects in this crate.

/// A `with*` mutator (or a constructor) received a value with the wrong shape.
///
/// The whole operation is rejected: the receiver is left untouched and no
/// partially-updated copy is produced.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidArgumentError {
    #[error(transparent)]
    /// See [`InvalidPort`] for details.
    Port(#[from] InvalidPort),
    #[error(transparent)]
    /// See [`InvalidScheme`] for details.
    Scheme(#[from] InvalidScheme),
    #[error(transparent)]
    /// See [`UnstructuredParsedBody`] for details.
    ParsedBody(#[from] UnstructuredParsedBody),
    #[error(transparent)]
    /// See [`InvalidUploadedFiles`] for details.
    UploadedFiles(#[from] InvalidUploadedFiles),
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("`{port}` is not a valid TCP port. It must be between 1 and 65535")]
#[non_exhaustive]
/// A port outside of the `1..=65535` range.
pub struct InvalidPort {
    /// The rejected value.
    pub port: u32,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error(
    "`{scheme}` is not a valid URI scheme. A scheme must start with a letter, followed by letters, digits, `+`, `-` or `.`"
)]
#[non_exhaustive]
/// A scheme that doesn't match the RFC 3986 grammar.
pub struct InvalidScheme {
    /// The rejected value.
    pub scheme: String,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("The parsed body must be a map or null. Got {kind} instead")]
#[non_exhaustive]
/// A parsed body override that is neither `null` nor a map.
pub struct UnstructuredParsedBody {
    /// The kind of value that was rejected, e.g. `a string`.
    pub kind: &'static str,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// The uploaded files tree is not a map whose leaves are valid file descriptors.
pub enum InvalidUploadedFiles {
    #[error("An uploaded file field can't have an empty name (at `{path}`)")]
    /// A map key is empty.
    EmptyFieldName {
        /// Where the offending node lives in the tree.
        path: String,
    },
    #[error("`{path}` doesn't contain any uploaded file")]
    /// An intermediate node doesn't lead to any file descriptor.
    EmptyNode {
        /// Where the offending node lives in the tree.
        path: String,
    },
    #[error(
        "The uploaded file at `{path}` was received successfully, but it doesn't point to a temporary file"
    )]
    /// A successful upload without a temporary file location.
    MissingTemporaryPath {
        /// Where the offending descriptor lives in the tree.
        path: String,
    },
}

pub(crate) fn describe_value(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a map",
    }
}

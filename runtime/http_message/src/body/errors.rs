//! Errors that can occur while decoding a message body.
use ubyte::ByteUnit;

#[derive(Debug, thiserror::Error)]
#[error("Failed to decode the body as `{content_type}`.\n{source}")]
#[non_exhaustive]
/// The body declares a supported `Content-Type`, but its content doesn't match it.
///
/// Bodies without a `Content-Type`, or with a type that [`BodyParser`] doesn't
/// know how to decode, never cause this error: they are decoded as `None`.
///
/// [`BodyParser`]: super::BodyParser
pub struct BodyDecodeError {
    /// The value of the `Content-Type` header, parameters included.
    pub content_type: String,
    /// What went wrong.
    #[source]
    pub source: DecodeErrorKind,
}

impl BodyDecodeError {
    pub(crate) fn new(content_type: &str, source: impl Into<DecodeErrorKind>) -> Self {
        Self {
            content_type: content_type.to_owned(),
            source: source.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The specific reason why decoding failed.
pub enum DecodeErrorKind {
    #[error(transparent)]
    /// See [`SizeLimitExceeded`] for details.
    SizeLimitExceeded(#[from] SizeLimitExceeded),
    #[error("The body is not a valid JSON document: {0}")]
    /// The body is not valid JSON.
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    /// See [`ScalarJsonDocument`] for details.
    ScalarJsonDocument(#[from] ScalarJsonDocument),
    #[error(transparent)]
    /// See [`XmlDecodeError`] for details.
    Xml(#[from] XmlDecodeError),
    #[error(transparent)]
    /// See [`MultipartError`] for details.
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    /// See [`DeserializationError`] for details.
    Deserialization(#[from] DeserializationError),
    #[error(transparent)]
    /// See [`UnsupportedContentType`] for details.
    UnsupportedContentType(#[from] UnsupportedContentType),
}

#[derive(Debug, thiserror::Error)]
#[error(
    "The body is larger than the maximum size limit ({max_size}) enforced by the parser: it's {actual} bytes long"
)]
#[non_exhaustive]
/// The body is larger than the configured [`BodySizeLimit`](super::BodySizeLimit).
pub struct SizeLimitExceeded {
    /// The maximum size limit.
    pub max_size: ByteUnit,
    /// The actual size of the body, in bytes.
    pub actual: usize,
}

#[derive(Debug, thiserror::Error)]
#[error(
    "The top-level value of the JSON document is {kind}, while a map, a sequence or null was expected"
)]
#[non_exhaustive]
/// The JSON document is valid, but its top-level value is a scalar.
pub struct ScalarJsonDocument {
    /// The kind of scalar, e.g. `a string`.
    pub kind: &'static str,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// Something went wrong while decoding an XML document.
pub enum XmlDecodeError {
    #[error("The body is not valid UTF-8: {0}")]
    /// Only UTF-8 encoded documents are supported.
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("The body is not a well-formed XML document: {0}")]
    /// The document violates the XML grammar.
    Syntax(#[from] quick_xml::Error),
    #[error("The body is not a well-formed XML document: {0}")]
    /// An attribute is malformed.
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("The body is not a well-formed XML document: {0}")]
    /// A character or entity reference can't be resolved.
    Escape(#[from] quick_xml::escape::EscapeError),
    #[error("The XML document doesn't have a root element")]
    /// The document is empty, or it only contains a prolog.
    MissingRoot,
    #[error("The XML document has more than one root element")]
    /// There is content after the end of the root element.
    MultipleRoots,
    #[error("The `<{name}>` element is never closed")]
    /// The document ended while an element was still open.
    UnclosedElement {
        /// The name of the element that is still open.
        name: String,
    },
    #[error("The XML document has text outside of its root element")]
    /// There is non-whitespace text before or after the root element.
    TextOutsideRoot,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// Something went wrong while decoding a `multipart/form-data` body.
pub enum MultipartError {
    #[error("The `Content-Type` header doesn't specify a multipart boundary")]
    /// The `boundary` parameter is missing.
    MissingBoundary,
    #[error("The body doesn't contain the opening `--{boundary}` delimiter")]
    /// The first delimiter is nowhere to be found.
    MissingOpeningDelimiter {
        /// The expected boundary.
        boundary: String,
    },
    #[error("The body doesn't end with the closing `--{boundary}--` delimiter")]
    /// The body was truncated, or the closing delimiter is malformed.
    MissingClosingDelimiter {
        /// The expected boundary.
        boundary: String,
    },
    #[error("Part #{index} has malformed headers")]
    /// The headers of a part are not separated from its content by an empty line,
    /// or a header line has no `:`.
    MalformedPartHeaders {
        /// The position of the part, starting from 0.
        index: usize,
    },
    #[error("Part #{index} doesn't have a `Content-Disposition: form-data` header with a field name")]
    /// A part can't be associated to a form field.
    MissingFieldName {
        /// The position of the part, starting from 0.
        index: usize,
    },
    #[error("The body has more than {max} parts")]
    /// The body has more parts than [`BodyParserConfig::max_multipart_parts`](super::BodyParserConfig::max_multipart_parts).
    TooManyParts {
        /// The configured maximum.
        max: usize,
    },
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The body was decoded, but it couldn't be deserialized into the type you asked for.
pub enum DeserializationError {
    #[error("Failed to deserialize the body into the expected type.\n{0}")]
    /// Deserialization from a JSON document, an XML tree or a multipart form failed.
    Structured(#[from] serde_path_to_error::Error<serde_json::Error>),
    #[error("Failed to deserialize the body into the expected type.\n{0}")]
    /// Deserialization from a url-encoded form failed.
    UrlEncoded(#[from] serde_path_to_error::Error<serde_html_form::de::Error>),
}

#[derive(Debug, thiserror::Error)]
#[error("There is no decoder for this `Content-Type`, so the body can't be deserialized")]
#[non_exhaustive]
/// Typed deserialization was requested for a body that has no supported `Content-Type`.
pub struct UnsupportedContentType;

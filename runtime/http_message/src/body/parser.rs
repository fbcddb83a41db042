use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::{
    BodyDecodeError, DecodeErrorKind, DeserializationError, MultipartError, SizeLimitExceeded,
    UnsupportedContentType,
};
use super::{BodyParserConfig, BufferedBody, MultipartForm, form, json, multipart, xml};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// The body formats that [`BodyParser`] knows how to decode.
pub enum BodyFormat {
    /// `application/x-www-form-urlencoded`.
    UrlEncoded,
    /// `multipart/form-data`, with the boundary declared in the `Content-Type`.
    Multipart {
        /// `None` if the `boundary` parameter is missing.
        boundary: Option<String>,
    },
    /// `application/json` and `application/*+json`.
    Json,
    /// `text/xml`, `application/xml` and `*/*+xml`.
    Xml,
}

impl BodyFormat {
    /// Pick a format based on the value of a `Content-Type` header.
    ///
    /// Parameters (e.g. `charset`) are ignored, apart from the multipart `boundary`.
    /// It returns `None` if the value is not a valid media type or if there is no
    /// decoder for it.
    pub fn detect(content_type: &str) -> Option<Self> {
        let mime: mime::Mime = content_type.parse().ok()?;
        if mime.type_() == mime::APPLICATION && mime.subtype() == mime::WWW_FORM_URLENCODED {
            Some(BodyFormat::UrlEncoded)
        } else if multipart::is_form_data(&mime) {
            Some(BodyFormat::Multipart {
                boundary: multipart::boundary(&mime),
            })
        } else if json::is_json(&mime) {
            Some(BodyFormat::Json)
        } else if xml::is_xml(&mime) {
            Some(BodyFormat::Xml)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Decode message bodies according to their `Content-Type`.
///
/// # Structured representation
///
/// [`BodyParser::parse`] turns a body into a [`serde_json::Value`]:
///
/// | Content type                                        | Result                                     |
/// |-----------------------------------------------------|--------------------------------------------|
/// | `application/x-www-form-urlencoded`                 | a map, see [`form`](super::form)           |
/// | `multipart/form-data`                               | a map of the text fields                   |
/// | `application/json`, `application/*+json`            | the JSON document                          |
/// | `text/xml`, `application/xml`, `*/*+xml`            | a tree rooted at the document element      |
/// | anything else, or no `Content-Type` at all          | `None`                                     |
///
/// An empty body is always decoded as `None`.
///
/// # Typed deserialization
///
/// [`BodyParser::deserialize`] goes one step further and deserializes the body
/// into a type of your choice, reporting the path of the offending field on failure.
///
/// # Example
///
/// ```rust
/// use http_message::body::{BodyParser, BufferedBody};
///
/// let parser = BodyParser::default();
/// let body = BufferedBody::from("test=test&submit=Test");
///
/// let parsed = parser
///     .parse(Some("application/x-www-form-urlencoded"), &body)
///     .unwrap()
///     .unwrap();
/// assert_eq!(parsed["submit"], "Test");
///
/// // Unknown content types are not an error: there is just nothing to decode.
/// assert!(parser.parse(Some("image/png"), &body).unwrap().is_none());
/// ```
pub struct BodyParser {
    config: BodyParserConfig,
}

impl BodyParser {
    /// Create a parser with the given configuration.
    pub fn new(config: BodyParserConfig) -> Self {
        Self { config }
    }

    /// The configuration of this parser.
    pub fn config(&self) -> &BodyParserConfig {
        &self.config
    }

    /// Decode `body` into its structured representation.
    ///
    /// It returns `Ok(None)` if there is no `Content-Type`, if there is no decoder for it,
    /// or if the body is empty.
    /// It fails if the body is larger than the configured limit or if it can't be
    /// decoded according to its `Content-Type`.
    pub fn parse(
        &self,
        content_type: Option<&str>,
        body: &BufferedBody,
    ) -> Result<Option<Value>, BodyDecodeError> {
        let Some(content_type) = content_type else {
            tracing::debug!("There is no `Content-Type` header, the body won't be decoded");
            return Ok(None);
        };
        let Some(format) = BodyFormat::detect(content_type) else {
            tracing::debug!(
                content_type,
                "There is no decoder for this `Content-Type`, the body won't be decoded"
            );
            return Ok(None);
        };
        if body.is_empty() {
            return Ok(None);
        }
        self.check_size(content_type, body)?;

        tracing::debug!(content_type, ?format, "Decoding the body");
        let bytes = body.as_bytes();
        let decoded: Result<Value, DecodeErrorKind> = match format {
            BodyFormat::UrlEncoded => Ok(Value::Object(form::decode(
                bytes,
                self.config.max_form_depth,
            ))),
            BodyFormat::Multipart { boundary } => self
                .decode_multipart(boundary.as_deref(), body)
                .map(|form| Value::Object(form.fields))
                .map_err(Into::into),
            BodyFormat::Json => json::decode(bytes),
            BodyFormat::Xml => xml::decode(bytes).map_err(Into::into),
        };
        match decoded {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(content_type, error = %e, "Failed to decode the body");
                Err(BodyDecodeError::new(content_type, e))
            }
        }
    }

    /// Decode a `multipart/form-data` body, files included.
    ///
    /// It fails if the `Content-Type` is not `multipart/form-data`.
    /// Unlike [`BodyParser::parse`], an empty body is not accepted: a valid multipart
    /// body always contains at least the closing delimiter.
    pub fn parse_multipart(
        &self,
        content_type: &str,
        body: &BufferedBody,
    ) -> Result<MultipartForm, BodyDecodeError> {
        let Some(BodyFormat::Multipart { boundary }) = BodyFormat::detect(content_type) else {
            return Err(BodyDecodeError::new(content_type, UnsupportedContentType));
        };
        self.check_size(content_type, body)?;
        self.decode_multipart(boundary.as_deref(), body)
            .map_err(|e| {
                tracing::warn!(content_type, error = %e, "Failed to decode the multipart body");
                BodyDecodeError::new(content_type, e)
            })
    }

    /// Deserialize `body` into `T`, according to its `Content-Type`.
    ///
    /// Url-encoded bodies are deserialized directly from their key-value pairs,
    /// JSON bodies directly from the document.
    /// XML and multipart bodies are deserialized from their structured representation.
    ///
    /// It fails with [`UnsupportedContentType`] if there is no decoder for the `Content-Type`,
    /// or if there is no `Content-Type` at all.
    pub fn deserialize<T>(
        &self,
        content_type: Option<&str>,
        body: &BufferedBody,
    ) -> Result<T, BodyDecodeError>
    where
        T: DeserializeOwned,
    {
        let content_type = content_type.unwrap_or_default();
        let Some(format) = BodyFormat::detect(content_type) else {
            return Err(BodyDecodeError::new(content_type, UnsupportedContentType));
        };
        self.check_size(content_type, body)?;

        let bytes = body.as_bytes();
        let deserialized: Result<T, DecodeErrorKind> = match format {
            BodyFormat::UrlEncoded => {
                let deserializer =
                    serde_html_form::Deserializer::new(form_urlencoded::parse(bytes));
                serde_path_to_error::deserialize(deserializer)
                    .map_err(|e| DeserializationError::from(e).into())
            }
            BodyFormat::Json => json::deserialize(bytes).map_err(Into::into),
            BodyFormat::Xml => xml::decode(bytes)
                .map_err(DecodeErrorKind::from)
                .and_then(from_value),
            BodyFormat::Multipart { boundary } => self
                .decode_multipart(boundary.as_deref(), body)
                .map_err(DecodeErrorKind::from)
                .and_then(|form| from_value(Value::Object(form.fields))),
        };
        deserialized.map_err(|e| {
            tracing::warn!(content_type, error = %e, "Failed to deserialize the body");
            BodyDecodeError::new(content_type, e)
        })
    }

    fn decode_multipart(
        &self,
        boundary: Option<&str>,
        body: &BufferedBody,
    ) -> Result<MultipartForm, MultipartError> {
        let boundary = boundary.ok_or(MultipartError::MissingBoundary)?;
        multipart::decode(
            &body.bytes,
            boundary,
            self.config.max_multipart_parts,
            self.config.max_form_depth,
        )
    }

    fn check_size(&self, content_type: &str, body: &BufferedBody) -> Result<(), BodyDecodeError> {
        match self.config.body_size_limit.max_size() {
            Some(max_size) if body.len() as u64 > max_size.as_u64() => {
                tracing::warn!(
                    content_type,
                    size = body.len(),
                    %max_size,
                    "The body exceeds the size limit"
                );
                Err(BodyDecodeError::new(
                    content_type,
                    SizeLimitExceeded {
                        max_size,
                        actual: body.len(),
                    },
                ))
            }
            _ => Ok(()),
        }
    }
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, DecodeErrorKind> {
    serde_path_to_error::deserialize(value).map_err(|e| DeserializationError::from(e).into())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use ubyte::ToByteUnit;

    use super::{BodyFormat, BodyParser};
    use crate::body::errors::DecodeErrorKind;
    use crate::body::{BodyParserConfig, BodySizeLimit, BufferedBody};

    #[test]
    fn format_detection() {
        assert_eq!(
            BodyFormat::detect("application/x-www-form-urlencoded; charset=UTF-8"),
            Some(BodyFormat::UrlEncoded)
        );
        assert_eq!(
            BodyFormat::detect("multipart/form-data; boundary=abc"),
            Some(BodyFormat::Multipart {
                boundary: Some("abc".into())
            })
        );
        assert_eq!(
            BodyFormat::detect("multipart/form-data"),
            Some(BodyFormat::Multipart { boundary: None })
        );
        assert_eq!(BodyFormat::detect("Application/JSON"), Some(BodyFormat::Json));
        assert_eq!(BodyFormat::detect("text/xml"), Some(BodyFormat::Xml));
        assert_eq!(BodyFormat::detect("text/plain"), None);
        assert_eq!(BodyFormat::detect("not a media type"), None);
        assert_eq!(BodyFormat::detect(""), None);
    }

    #[test]
    fn empty_bodies_are_absent() {
        let parser = BodyParser::default();
        let empty = BufferedBody::empty();
        assert_eq!(parser.parse(Some("application/json"), &empty).unwrap(), None);
        assert_eq!(parser.parse(None, &empty).unwrap(), None);
    }

    #[test]
    fn json_null_is_absent() {
        let parser = BodyParser::default();
        let body = BufferedBody::from("null");
        assert_eq!(parser.parse(Some("application/json"), &body).unwrap(), None);
    }

    #[test]
    fn size_limit_only_applies_to_decoded_bodies() {
        let config = BodyParserConfig::default().body_size_limit(BodySizeLimit::Enabled {
            max_size: 4.bytes(),
        });
        let parser = BodyParser::new(config);
        let body = BufferedBody::from(r#"{"a":1}"#);

        let err = parser.parse(Some("application/json"), &body).unwrap_err();
        assert!(matches!(err.source, DecodeErrorKind::SizeLimitExceeded(_)));
        assert_eq!(parser.parse(Some("text/plain"), &body).unwrap(), None);
    }

    #[test]
    fn multipart_without_boundary_is_rejected() {
        let parser = BodyParser::default();
        let body = BufferedBody::from("--x--");
        let err = parser
            .parse(Some("multipart/form-data"), &body)
            .unwrap_err();
        insta::assert_snapshot!(err, @r###"
        Failed to decode the body as `multipart/form-data`.
        The `Content-Type` header doesn't specify a multipart boundary
        "###);
    }

    #[test]
    fn deserialize_requires_a_supported_content_type() {
        let parser = BodyParser::default();
        let body = BufferedBody::from("a=1");
        let err = parser
            .deserialize::<serde_json::Value>(Some("text/plain"), &body)
            .unwrap_err();
        assert!(matches!(err.source, DecodeErrorKind::UnsupportedContentType(_)));

        let err = parser
            .deserialize::<serde_json::Value>(None, &body)
            .unwrap_err();
        assert!(matches!(err.source, DecodeErrorKind::UnsupportedContentType(_)));
    }

    #[test]
    fn deserialize_xml_through_its_tree() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Document {
            test: String,
            example: String,
        }

        let parser = BodyParser::default();
        let body = BufferedBody::from("<document><test>data</test><example>here</example></document>");
        let document: Document = parser.deserialize(Some("text/xml"), &body).unwrap();
        assert_eq!(
            document,
            Document {
                test: "data".into(),
                example: "here".into()
            }
        );

        let value: serde_json::Value = parser.deserialize(Some("application/xml"), &body).unwrap();
        assert_eq!(value, json!({"test": "data", "example": "here"}));
    }
}

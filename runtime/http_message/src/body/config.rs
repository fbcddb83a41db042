use serde::Deserialize;

use super::BodySizeLimit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[non_exhaustive]
/// Knobs to tune the behaviour of [`BodyParser`](super::BodyParser).
///
/// Every field has a sensible default, so you only need to specify the ones you want to change:
///
/// ```rust
/// use http_message::body::BodyParserConfig;
///
/// let config: BodyParserConfig = serde_json::from_str(r#"{ "max_form_depth": 4 }"#).unwrap();
/// assert_eq!(config.max_form_depth, 4);
/// assert_eq!(config.max_multipart_parts, 128);
/// ```
pub struct BodyParserConfig {
    /// See [`BodySizeLimit`].
    pub body_size_limit: BodySizeLimit,
    /// How many levels of `key[a][b]` nesting are honoured when decoding
    /// url-encoded data (bodies, query strings and multipart field names).
    ///
    /// Keys nested more deeply are kept verbatim, brackets included.
    pub max_form_depth: usize,
    /// The maximum number of parts in a `multipart/form-data` body.
    pub max_multipart_parts: usize,
}

impl BodyParserConfig {
    /// The default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the [`BodySizeLimit`].
    pub fn body_size_limit(mut self, limit: BodySizeLimit) -> Self {
        self.body_size_limit = limit;
        self
    }

    /// Change the maximum nesting depth for url-encoded keys.
    pub fn max_form_depth(mut self, depth: usize) -> Self {
        self.max_form_depth = depth;
        self
    }

    /// Change the maximum number of multipart parts.
    pub fn max_multipart_parts(mut self, parts: usize) -> Self {
        self.max_multipart_parts = parts;
        self
    }
}

impl Default for BodyParserConfig {
    fn default() -> Self {
        Self {
            body_size_limit: BodySizeLimit::default(),
            max_form_depth: 32,
            max_multipart_parts: 128,
        }
    }
}

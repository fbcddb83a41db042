//! Requests as seen by a server.
//!
//! A [`ServerRequest`] is an [`HttpRequest`] enriched with everything the server knows
//! about the incoming request: server parameters, cookies, query parameters,
//! uploaded files, the decoded body and request-scoped attributes.
use std::sync::Arc;

use http::Method;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::body::errors::{BodyDecodeError, DeserializationError};
use crate::body::{BodyParser, BodyParserConfig, BufferedBody, ParamMap, form};
use crate::errors::{InvalidArgumentError, UnstructuredParsedBody, describe_value};
use crate::headers::Headers;
use crate::message::sealed::MessageParts;
use crate::message::{HttpMessage, Message};
use crate::request::{HttpRequest, RequestHead, RequestParts};
use crate::uri::Uri;

pub use errors::{BuildServerRequestError, QueryDeserializationError};
pub use uploaded_file::{UploadStatus, UploadedFile, UploadedFileTree};

pub mod errors;
mod uploaded_file;

/// The server-side parameters of a request, e.g. the ones a CGI gateway exposes.
pub type ServerParams = IndexMap<String, String>;

#[derive(Debug, Clone)]
/// An HTTP request received by a server.
///
/// # Immutability
///
/// Like every other message in this crate, a `ServerRequest` is never modified in place:
/// every `with*` method returns a modified copy and leaves the receiver untouched.
///
/// # Derived data
///
/// Query parameters and the parsed body are derived from the URI and from the body,
/// respectively. They are computed the first time you ask for them and then cached.
/// The cache is discarded when the data it was derived from changes: a new URI discards
/// the query parameters, a new body (or a new `Content-Type`) discards the parsed body.
///
/// # Example
///
/// ```rust
/// use http_message::message::HttpMessage;
/// use http_message::request::HttpRequest;
/// use http_message::server_request::ServerRequest;
/// use http_message::uri::Uri;
///
/// let uri = Uri::parse("http://test.com/path/123?q=abc").unwrap();
/// let request = ServerRequest::builder("POST", uri)
///     .header("Content-Type", "application/x-www-form-urlencoded")
///     .body("test=test&submit=Test")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.query_params()["q"], "abc");
/// let body = request.parsed_body().unwrap().unwrap();
/// assert_eq!(body["submit"], "Test");
/// ```
pub struct ServerRequest {
    message: Message,
    head: RequestHead,
    server_params: Arc<ServerParams>,
    cookies: IndexMap<String, String>,
    query_params: OnceCell<ParamMap>,
    uploaded_files: IndexMap<String, UploadedFileTree>,
    parsed_body: ParsedBody,
    attributes: IndexMap<String, Value>,
    body_parser: BodyParser,
}

#[derive(Debug, Clone, Default)]
struct ParsedBody {
    cell: OnceCell<Option<Value>>,
    /// Set by [`ServerRequest::with_parsed_body`]: the value no longer depends
    /// on the `Content-Type`.
    explicit: bool,
}

impl ServerRequest {
    /// Start building a request with the given method and URI.
    pub fn builder(method: impl Into<String>, uri: Uri) -> ServerRequestBuilder {
        ServerRequestBuilder::new(method.into(), uri)
    }

    /// The server parameters captured when the request was received.
    ///
    /// They can't be changed.
    pub fn server_params(&self) -> &ServerParams {
        &self.server_params
    }

    /// The cookies sent by the client.
    pub fn cookie_params(&self) -> &IndexMap<String, String> {
        &self.cookies
    }

    /// Return a copy with different cookies.
    ///
    /// The `Cookie` header is left untouched.
    pub fn with_cookie_params(&self, cookies: IndexMap<String, String>) -> Self {
        Self {
            cookies,
            ..self.clone()
        }
    }

    /// The query parameters.
    ///
    /// Unless they were set with [`with_query_params`](Self::with_query_params), they are
    /// decoded from the query string of the URI, following the conventions of
    /// [`form`](crate::body::form).
    pub fn query_params(&self) -> &ParamMap {
        self.query_params.get_or_init(|| {
            tracing::trace!("Decoding the query string");
            form::decode(
                self.head.uri.query().as_bytes(),
                self.body_parser.config().max_form_depth,
            )
        })
    }

    /// Return a copy with different query parameters.
    ///
    /// The URI is left untouched.
    /// The parameters are discarded if the URI is replaced later on.
    pub fn with_query_params(&self, params: ParamMap) -> Self {
        Self {
            query_params: OnceCell::from(params),
            ..self.clone()
        }
    }

    /// Deserialize the query string of the URI into `T`.
    ///
    /// It always works on the query string, ignoring parameters set with
    /// [`with_query_params`](Self::with_query_params).
    ///
    /// ```rust
    /// use http_message::server_request::ServerRequest;
    /// use http_message::uri::Uri;
    ///
    /// #[derive(serde::Deserialize)]
    /// struct Pagination {
    ///     page: u32,
    ///     tags: Vec<String>,
    /// }
    ///
    /// let uri = Uri::parse("/search?page=2&tags=a&tags=b").unwrap();
    /// let request = ServerRequest::builder("GET", uri).build().unwrap();
    ///
    /// let pagination: Pagination = request.query_params_as().unwrap();
    /// assert_eq!(pagination.page, 2);
    /// assert_eq!(pagination.tags, ["a", "b"]);
    /// ```
    pub fn query_params_as<T>(&self) -> Result<T, QueryDeserializationError>
    where
        T: DeserializeOwned,
    {
        let pairs = form_urlencoded::parse(self.head.uri.query().as_bytes());
        let deserializer = serde_html_form::Deserializer::new(pairs);
        serde_path_to_error::deserialize(deserializer).map_err(QueryDeserializationError::new)
    }

    /// The files uploaded by the client.
    pub fn uploaded_files(&self) -> &IndexMap<String, UploadedFileTree> {
        &self.uploaded_files
    }

    /// Return a copy with different uploaded files.
    ///
    /// It fails if a field name is empty, if a branch of the tree doesn't lead to any file,
    /// or if a successful upload doesn't point to a temporary file.
    pub fn with_uploaded_files(
        &self,
        files: IndexMap<String, UploadedFileTree>,
    ) -> Result<Self, InvalidArgumentError> {
        uploaded_file::validate(&files)?;
        Ok(Self {
            uploaded_files: files,
            ..self.clone()
        })
    }

    /// The decoded body.
    ///
    /// Unless it was set with [`with_parsed_body`](Self::with_parsed_body), the body is
    /// decoded according to the `Content-Type` header, see [`BodyParser`].
    /// It's `None` if the body is empty, or if there is no decoder for its `Content-Type`.
    ///
    /// A successful outcome is cached, a failure is not.
    pub fn parsed_body(&self) -> Result<Option<&Value>, BodyDecodeError> {
        let parsed = self.parsed_body.cell.get_or_try_init(|| {
            tracing::trace!("Decoding the body");
            self.body_parser.parse(self.content_type(), &self.message.body)
        })?;
        Ok(parsed.as_ref())
    }

    /// Return a copy with a decoded body that overrides the actual one.
    ///
    /// `None` (or `null`) marks the body as absent.
    /// It fails if `data` is neither a map nor `null`.
    pub fn with_parsed_body(&self, data: Option<Value>) -> Result<Self, InvalidArgumentError> {
        let data = match data {
            None | Some(Value::Null) => None,
            Some(map @ Value::Object(_)) => Some(map),
            Some(other) => {
                return Err(UnstructuredParsedBody {
                    kind: describe_value(&other),
                }
                .into());
            }
        };
        Ok(Self {
            parsed_body: ParsedBody {
                cell: OnceCell::from(data),
                explicit: true,
            },
            ..self.clone()
        })
    }

    /// Deserialize the body into `T`.
    ///
    /// If the body was set with [`with_parsed_body`](Self::with_parsed_body), `T` is
    /// deserialized from that value. Otherwise, see [`BodyParser::deserialize`].
    pub fn parsed_body_as<T>(&self) -> Result<T, BodyDecodeError>
    where
        T: DeserializeOwned,
    {
        let content_type = self.content_type();
        if !self.parsed_body.explicit {
            return self
                .body_parser
                .deserialize(content_type, &self.message.body);
        }
        let value = self
            .parsed_body
            .cell
            .get()
            .cloned()
            .flatten()
            .unwrap_or(Value::Null);
        serde_path_to_error::deserialize(value).map_err(|e| {
            BodyDecodeError::new(content_type.unwrap_or_default(), DeserializationError::from(e))
        })
    }

    /// The parser used to decode the body.
    pub fn body_parser(&self) -> &BodyParser {
        &self.body_parser
    }

    /// All the attributes attached to the request.
    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    /// The attribute called `name`, if there is one.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The attribute called `name`, or `default` if there is none.
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
        self.attribute(name).unwrap_or(default)
    }

    /// Return a copy where the attribute `name` is set to `value`.
    pub fn with_attribute(&self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut copy = self.clone();
        copy.attributes.insert(name.into(), value.into());
        copy
    }

    /// Return a copy without the attribute `name`.
    ///
    /// Removing an attribute that is not set is a no-op.
    pub fn without_attribute(&self, name: &str) -> Self {
        let mut copy = self.clone();
        copy.attributes.shift_remove(name);
        copy
    }

    fn content_type(&self) -> Option<&str> {
        self.message.headers.first("Content-Type")
    }
}

impl MessageParts for ServerRequest {
    fn message(&self) -> &Message {
        &self.message
    }

    fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    fn on_header_changed(&mut self, name: &str) {
        if name.eq_ignore_ascii_case("content-type") && !self.parsed_body.explicit {
            tracing::trace!("The `Content-Type` changed, discarding the decoded body");
            self.parsed_body = ParsedBody::default();
        }
    }

    fn on_body_changed(&mut self) {
        tracing::trace!("The body changed, discarding the decoded body");
        self.parsed_body = ParsedBody::default();
    }
}

impl RequestParts for ServerRequest {
    fn head(&self) -> &RequestHead {
        &self.head
    }

    fn head_mut(&mut self) -> &mut RequestHead {
        &mut self.head
    }

    fn on_uri_changed(&mut self) {
        tracing::trace!("The URI changed, discarding the decoded query parameters");
        self.query_params = OnceCell::new();
    }
}

impl HttpMessage for ServerRequest {}

impl HttpRequest for ServerRequest {
    const ALLOWED_METHODS: &'static [Method] = &[
        Method::GET,
        Method::POST,
        Method::DELETE,
        Method::PUT,
        Method::PATCH,
    ];
}

#[must_use]
/// A builder for [`ServerRequest`], see [`ServerRequest::builder`].
///
/// Everything but the method and the URI is optional: by default, the request
/// is an HTTP/1.1 request without headers, body, cookies, uploaded files,
/// server parameters or attributes, decoded with the default [`BodyParserConfig`].
pub struct ServerRequestBuilder {
    method: String,
    uri: Uri,
    headers: Headers,
    body: BufferedBody,
    protocol_version: String,
    server_params: ServerParams,
    cookies: IndexMap<String, String>,
    uploaded_files: IndexMap<String, UploadedFileTree>,
    attributes: IndexMap<String, Value>,
    body_parser_config: BodyParserConfig,
}

impl ServerRequestBuilder {
    fn new(method: String, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: Headers::new(),
            body: BufferedBody::empty(),
            protocol_version: "1.1".to_owned(),
            server_params: ServerParams::new(),
            cookies: IndexMap::new(),
            uploaded_files: IndexMap::new(),
            attributes: IndexMap::new(),
            body_parser_config: BodyParserConfig::default(),
        }
    }

    /// Set all the headers at once, replacing the ones added so far.
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Append a value to the `name` header.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<BufferedBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the protocol version.
    pub fn protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    /// Set the server parameters.
    pub fn server_params(mut self, params: ServerParams) -> Self {
        self.server_params = params;
        self
    }

    /// Set the cookies.
    pub fn cookies(mut self, cookies: IndexMap<String, String>) -> Self {
        self.cookies = cookies;
        self
    }

    /// Set the uploaded files.
    ///
    /// They are validated by [`build`](Self::build).
    pub fn uploaded_files(mut self, files: IndexMap<String, UploadedFileTree>) -> Self {
        self.uploaded_files = files;
        self
    }

    /// Set the initial attributes.
    pub fn attributes(mut self, attributes: IndexMap<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the configuration used to decode the body and the query string.
    pub fn body_parser_config(mut self, config: BodyParserConfig) -> Self {
        self.body_parser_config = config;
        self
    }

    /// Build the request.
    ///
    /// It fails if the method is not in
    /// [`ServerRequest::ALLOWED_METHODS`](HttpRequest::ALLOWED_METHODS) or if the tree of
    /// uploaded files is malformed.
    pub fn build(self) -> Result<ServerRequest, BuildServerRequestError> {
        let method = ServerRequest::validate_method(&self.method)?;
        uploaded_file::validate(&self.uploaded_files).map_err(InvalidArgumentError::from)?;
        Ok(ServerRequest {
            message: Message::new(self.headers, self.body, self.protocol_version),
            head: RequestHead::new(method, self.uri),
            server_params: Arc::new(self.server_params),
            cookies: self.cookies,
            query_params: OnceCell::new(),
            uploaded_files: self.uploaded_files,
            parsed_body: ParsedBody::default(),
            attributes: self.attributes,
            body_parser: BodyParser::new(self.body_parser_config),
        })
    }
}

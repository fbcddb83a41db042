use http::Method;

use super::{HttpRequest, InvalidMethodError, RequestHead, RequestParts, host_header};
use crate::message::sealed::MessageParts;
use crate::message::{HttpMessage, Message};
use crate::uri::Uri;

#[derive(Debug, Clone)]
/// A request to be sent to a server.
///
/// Use the [`HttpMessage`] and [`HttpRequest`] traits to inspect it or to derive
/// modified copies.
pub struct Request {
    message: Message,
    head: RequestHead,
}

impl Request {
    /// Create an HTTP/1.1 request without headers (apart from `Host`) and without a body.
    ///
    /// It fails if `method` is not in [`Request::ALLOWED_METHODS`](HttpRequest::ALLOWED_METHODS).
    pub fn new(method: &str, uri: Uri) -> Result<Self, InvalidMethodError> {
        Self::from_message(method, uri, Message::default())
    }

    /// Create a request out of an existing message.
    ///
    /// The `Host` header is derived from the URI if the message doesn't have one.
    /// It fails if `method` is not in [`Request::ALLOWED_METHODS`](HttpRequest::ALLOWED_METHODS).
    pub fn from_message(
        method: &str,
        uri: Uri,
        mut message: Message,
    ) -> Result<Self, InvalidMethodError> {
        let method = Self::validate_method(method)?;
        if !message.has_header("Host") && !uri.host().is_empty() {
            message.headers.set("Host", host_header(&uri));
        }
        Ok(Self {
            message,
            head: RequestHead::new(method, uri),
        })
    }
}

impl MessageParts for Request {
    fn message(&self) -> &Message {
        &self.message
    }

    fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}

impl RequestParts for Request {
    fn head(&self) -> &RequestHead {
        &self.head
    }

    fn head_mut(&mut self) -> &mut RequestHead {
        &mut self.head
    }
}

impl HttpMessage for Request {}

impl HttpRequest for Request {
    const ALLOWED_METHODS: &'static [Method] = &[
        Method::GET,
        Method::POST,
        Method::DELETE,
        Method::PUT,
        Method::PATCH,
        Method::HEAD,
        Method::OPTIONS,
    ];
}

#[cfg(test)]
mod tests {
    use crate::headers::Headers;
    use crate::message::{HttpMessage, Message};
    use crate::request::{HttpRequest, Request};
    use crate::uri::Uri;

    fn uri(s: &str) -> Uri {
        Uri::parse(s).unwrap()
    }

    #[test]
    fn host_is_filled_from_the_uri() {
        let request = Request::new("GET", uri("https://example.com:443/")).unwrap();
        assert_eq!(request.header_line("Host"), "example.com");

        let request = Request::new("GET", uri("/relative")).unwrap();
        assert!(!request.has_header("Host"));
    }

    #[test]
    fn an_existing_host_is_kept() {
        let headers: Headers = [("host", "proxy.internal")].into_iter().collect();
        let message = Message::new(headers, "", "1.1");
        let request = Request::from_message("GET", uri("http://example.com/"), message).unwrap();
        assert_eq!(request.header("Host"), ["proxy.internal"]);
    }

    #[test]
    fn head_and_options_are_allowed() {
        let request = Request::new("HEAD", uri("/")).unwrap();
        assert!(request.with_method("OPTIONS").is_ok());
    }

    #[test]
    fn methods_are_case_sensitive() {
        let err = Request::new("get", uri("/")).unwrap_err();
        insta::assert_snapshot!(err, @"`get` is not an allowed HTTP method. Expected one of: GET, POST, DELETE, PUT, PATCH, HEAD, OPTIONS");
    }

    #[test]
    fn request_target_follows_the_uri() {
        let request = Request::new("GET", uri("http://example.com")).unwrap();
        assert_eq!(request.request_target(), "/");

        let moved = request.with_uri(uri("http://example.com/a/b?c=d"), false);
        assert_eq!(moved.request_target(), "/a/b?c=d");
        assert_eq!(request.request_target(), "/");
    }

    #[test]
    fn explicit_request_target_wins() {
        let request = Request::new("OPTIONS", uri("http://example.com/a"))
            .unwrap()
            .with_request_target("*");
        assert_eq!(request.request_target(), "*");

        let moved = request.with_uri(uri("http://example.com/b"), false);
        assert_eq!(moved.request_target(), "*");
    }
}

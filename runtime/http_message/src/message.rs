//! The parts shared by every HTTP message: protocol version, headers and body.
use crate::body::BufferedBody;
use crate::headers::Headers;

use sealed::MessageParts;

#[derive(Debug, Clone, PartialEq, Eq)]
/// The protocol version, the headers and the body of an HTTP message.
///
/// `Message` is the building block of [`Request`](crate::request::Request) and
/// [`ServerRequest`](crate::server_request::ServerRequest), but it can be used on its own.
/// Use the methods of the [`HttpMessage`] trait to inspect it or to derive modified copies.
pub struct Message {
    pub(crate) protocol_version: String,
    pub(crate) headers: Headers,
    pub(crate) body: BufferedBody,
}

impl Message {
    /// Create a new message.
    pub fn new(
        headers: Headers,
        body: impl Into<BufferedBody>,
        protocol_version: impl Into<String>,
    ) -> Self {
        Self {
            protocol_version: protocol_version.into(),
            headers,
            body: body.into(),
        }
    }
}

impl Default for Message {
    /// An HTTP/1.1 message without headers and without a body.
    fn default() -> Self {
        Self::new(Headers::new(), BufferedBody::empty(), "1.1")
    }
}

pub(crate) mod sealed {
    use super::Message;

    /// Access to the [`Message`] embedded in a type, plus hooks to keep
    /// derived state consistent when the message changes.
    pub trait MessageParts {
        fn message(&self) -> &Message;

        fn message_mut(&mut self) -> &mut Message;

        /// Invoked after the values of the `name` header have been replaced or removed.
        fn on_header_changed(&mut self, _name: &str) {}

        /// Invoked after the body has been replaced.
        fn on_body_changed(&mut self) {}
    }
}

/// Read accessors and copy-on-write mutators shared by all HTTP messages.
///
/// Every `with*` method leaves the receiver untouched and returns a modified copy.
/// Copies are cheap: the body bytes are shared, not duplicated.
///
/// The trait is sealed: it's implemented by [`Message`], [`Request`](crate::request::Request)
/// and [`ServerRequest`](crate::server_request::ServerRequest).
///
/// # Example
///
/// ```rust
/// use http_message::message::{HttpMessage, Message};
///
/// let original = Message::default().with_header("Accept", "text/html");
/// let updated = original.with_added_header("accept", "application/json");
///
/// assert_eq!(updated.header_line("ACCEPT"), "text/html, application/json");
/// // The original is unchanged.
/// assert_eq!(original.header("Accept"), ["text/html"]);
/// ```
pub trait HttpMessage: MessageParts + Clone + Sized {
    /// The HTTP protocol version, e.g. `1.1`.
    fn protocol_version(&self) -> &str {
        &self.message().protocol_version
    }

    /// Return a copy with a different protocol version.
    fn with_protocol_version(&self, version: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.message_mut().protocol_version = version.into();
        copy
    }

    /// All the headers of the message.
    fn headers(&self) -> &Headers {
        &self.message().headers
    }

    /// The values of the `name` header, matched case-insensitively.
    ///
    /// It's empty if the header is not set.
    fn header(&self, name: &str) -> &[String] {
        self.headers().get(name).unwrap_or_default()
    }

    /// The values of the `name` header joined by `, `.
    ///
    /// It's empty if the header is not set.
    fn header_line(&self, name: &str) -> String {
        self.headers().line(name).unwrap_or_default()
    }

    /// Whether the `name` header is set, matched case-insensitively.
    fn has_header(&self, name: &str) -> bool {
        self.headers().has(name)
    }

    /// Return a copy where `name` has `value` as its only value.
    fn with_header(&self, name: &str, value: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.message_mut().headers.set(name, value);
        copy.on_header_changed(name);
        copy
    }

    /// Return a copy where `value` is appended to the values of `name`.
    fn with_added_header(&self, name: &str, value: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.message_mut().headers.add(name, value);
        copy.on_header_changed(name);
        copy
    }

    /// Return a copy without the `name` header.
    ///
    /// Removing a header that is not set is a no-op.
    fn without_header(&self, name: &str) -> Self {
        let mut copy = self.clone();
        copy.message_mut().headers.remove(name);
        copy.on_header_changed(name);
        copy
    }

    /// The body of the message.
    fn body(&self) -> &BufferedBody {
        &self.message().body
    }

    /// Return a copy with a different body.
    fn with_body(&self, body: impl Into<BufferedBody>) -> Self {
        let mut copy = self.clone();
        copy.message_mut().body = body.into();
        copy.on_body_changed();
        copy
    }
}

impl MessageParts for Message {
    fn message(&self) -> &Message {
        self
    }

    fn message_mut(&mut self) -> &mut Message {
        self
    }
}

impl HttpMessage for Message {}

#[cfg(test)]
mod tests {
    use super::{HttpMessage, Message};
    use crate::headers::Headers;

    #[test]
    fn defaults() {
        let message = Message::default();
        assert_eq!(message.protocol_version(), "1.1");
        assert!(message.headers().is_empty());
        assert!(message.body().is_empty());
    }

    #[test]
    fn header_accessors_on_missing_headers() {
        let message = Message::default();
        assert!(message.header("Host").is_empty());
        assert_eq!(message.header_line("Host"), "");
        assert!(!message.has_header("Host"));
    }

    #[test]
    fn mutators_return_independent_copies() {
        let headers: Headers = [("Content-Type", "text/plain")].into_iter().collect();
        let original = Message::new(headers, "hello", "1.0");

        let changed = original
            .with_protocol_version("2")
            .with_header("content-type", "application/json")
            .with_added_header("X-Trace", "a")
            .with_added_header("x-trace", "b")
            .with_body("{}");

        assert_eq!(changed.protocol_version(), "2");
        assert_eq!(changed.header("Content-Type"), ["application/json"]);
        assert_eq!(changed.header_line("X-TRACE"), "a, b");
        assert_eq!(changed.body().as_bytes(), b"{}");

        assert_eq!(original.protocol_version(), "1.0");
        assert_eq!(original.header("Content-Type"), ["text/plain"]);
        assert!(!original.has_header("X-Trace"));
        assert_eq!(original.body().as_bytes(), b"hello");
    }

    #[test]
    fn without_header_is_case_insensitive() {
        let message = Message::default().with_header("X-Remove-Me", "1");
        let stripped = message.without_header("x-remove-me");
        assert!(!stripped.has_header("X-Remove-Me"));
        assert!(message.has_header("X-Remove-Me"));

        // Removing an absent header is a no-op.
        assert_eq!(stripped.without_header("X-Remove-Me"), stripped);
    }
}

//! Immutable HTTP messages.
//!
//! This crate models HTTP requests as value objects: once built, a message never changes.
//! Every `with*` method returns a modified copy, leaving the original untouched, which makes
//! messages safe to share and to reason about.
//!
//! - [`Uri`](uri::Uri) is a URI decomposed into its components;
//! - [`Headers`](headers::Headers) is a case-insensitive, ordered collection of header values;
//! - [`Message`](message::Message) bundles a protocol version, headers and a body;
//! - [`Request`](request::Request) is a request you want to send;
//! - [`ServerRequest`](server_request::ServerRequest) is a request a server received,
//!   with its cookies, query parameters, uploaded files, decoded body and attributes.
//!
//! Bodies are decoded according to their `Content-Type` by a
//! [`BodyParser`](body::BodyParser): url-encoded forms, multipart forms, JSON and XML
//! are supported out of the box.
//!
//! The behaviour shared by all messages lives in the [`HttpMessage`] and [`HttpRequest`] traits:
//! bring them into scope to use it.
pub use message::HttpMessage;
pub use request::HttpRequest;

pub mod body;
pub mod errors;
pub mod headers;
pub mod message;
pub mod request;
pub mod server_request;
pub mod uri;

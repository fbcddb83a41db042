//! Message bodies and how to decode them.
//!
//! A message body is a [`BufferedBody`], an immutable buffer of bytes.
//! [`BodyParser`] turns it into a structured [`serde_json::Value`] (or into a type of your choice)
//! according to the `Content-Type` of the message.
//! Check out [`BodyParser`]'s documentation for the list of supported formats.
pub use buffered_body::BufferedBody;
pub use config::BodyParserConfig;
pub use form::ParamMap;
pub use limit::BodySizeLimit;
pub use multipart::{MultipartFile, MultipartForm};
pub use parser::{BodyFormat, BodyParser};

mod buffered_body;
mod config;
pub mod errors;
pub mod form;
mod json;
mod limit;
mod multipart;
mod parser;
mod xml;

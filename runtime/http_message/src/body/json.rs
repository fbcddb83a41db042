use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::describe_value;

use super::errors::{DecodeErrorKind, DeserializationError, ScalarJsonDocument};

/// Whether the media type is `application/json` or another `application/*+json` type.
pub(super) fn is_json(mime: &mime::Mime) -> bool {
    mime.type_() == mime::APPLICATION
        && (mime.subtype() == mime::JSON || mime.suffix().is_some_and(|name| name == mime::JSON))
}

/// Decode a JSON document into its structured representation.
///
/// The top-level value must be a map, a sequence or `null`.
pub(super) fn decode(bytes: &[u8]) -> Result<Value, DecodeErrorKind> {
    let value: Value = serde_json::from_slice(bytes)?;
    match value {
        Value::Object(_) | Value::Array(_) | Value::Null => Ok(value),
        scalar => Err(ScalarJsonDocument {
            kind: describe_value(&scalar),
        }
        .into()),
    }
}

pub(super) fn deserialize<T>(bytes: &[u8]) -> Result<T, DeserializationError>
where
    T: DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let body = serde_path_to_error::deserialize(&mut deserializer)?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::body::errors::DecodeErrorKind;

    fn mime(s: &str) -> mime::Mime {
        s.parse().unwrap()
    }

    #[test]
    fn json_media_types() {
        assert!(super::is_json(&mime("application/json")));
        assert!(super::is_json(&mime("application/json; charset=utf-8")));
        assert!(super::is_json(&mime("application/hal+json")));
        assert!(!super::is_json(&mime("text/json")));
        assert!(!super::is_json(&mime("application/xml")));
    }

    #[test]
    fn structured_documents_are_accepted() {
        assert_eq!(
            super::decode(br#"{"test":"test","submit":"Test"}"#).unwrap(),
            json!({"test": "test", "submit": "Test"})
        );
        assert_eq!(super::decode(b"[1, 2]").unwrap(), json!([1, 2]));
        assert_eq!(super::decode(b"null").unwrap(), json!(null));
    }

    #[test]
    fn scalar_documents_are_rejected() {
        let err = super::decode(br#""just a string""#).unwrap_err();
        insta::assert_snapshot!(err, @"The top-level value of the JSON document is a string, while a map, a sequence or null was expected");
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = super::decode(br#"{"test":"#).unwrap_err();
        assert!(matches!(err, DecodeErrorKind::Json(_)));
        assert!(
            err.to_string()
                .starts_with("The body is not a valid JSON document: EOF while parsing")
        );
    }

    #[test]
    fn deserialization_errors_point_at_the_failing_field() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Listing {
            address: String,
            rooms: Vec<u8>,
        }

        let err = super::deserialize::<Listing>(br#"{"address": "Main St", "rooms": [1, "two"]}"#)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Failed to deserialize the body into the expected type.\n"));
        assert!(message.contains(r#"rooms[1]: invalid type: string "two", expected u8"#));
    }
}

use http_message::body::errors::{DecodeErrorKind, MultipartError};
use http_message::body::{BodyParser, BodyParserConfig, BodySizeLimit, BufferedBody};
use serde_json::json;
use ubyte::ToByteUnit;

const MULTIPART: &str = "multipart/form-data; boundary=----formdata";

fn multipart_body() -> BufferedBody {
    let body = "------formdata\r\n\
        Content-Disposition: form-data; name=\"user[name]\"\r\n\
        \r\n\
        Jo\r\n\
        ------formdata\r\n\
        Content-Disposition: form-data; name=\"user[roles][]\"\r\n\
        \r\n\
        admin\r\n\
        ------formdata\r\n\
        Content-Disposition: form-data; name=\"resume\"; filename=\"cv.txt\"\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        Ten years of Rust\r\n\
        ------formdata--\r\n";
    BufferedBody::from(body)
}

#[test]
fn nested_form_fields() {
    let parser = BodyParser::default();
    let body = BufferedBody::from("user[name]=Jo&user[roles][]=admin&user[roles][]=dev&q=a%26b");
    let parsed = parser
        .parse(Some("application/x-www-form-urlencoded"), &body)
        .unwrap();
    assert_eq!(
        parsed,
        Some(json!({"user": {"name": "Jo", "roles": ["admin", "dev"]}, "q": "a&b"}))
    );
}

#[test]
fn json_variants() {
    let parser = BodyParser::default();
    let body = BufferedBody::from(r#"{"_links": {"self": {"href": "/orders/1"}}}"#);
    let parsed = parser.parse(Some("application/hal+json"), &body).unwrap();
    assert_eq!(parsed, Some(json!({"_links": {"self": {"href": "/orders/1"}}})));

    let body = BufferedBody::from("[1, 2, 3]");
    let parsed = parser.parse(Some("application/json"), &body).unwrap();
    assert_eq!(parsed, Some(json!([1, 2, 3])));

    let body = BufferedBody::from("42");
    let err = parser.parse(Some("application/json"), &body).unwrap_err();
    assert!(matches!(err.source, DecodeErrorKind::ScalarJsonDocument(_)));
}

#[test]
fn xml_documents() {
    let parser = BodyParser::default();
    let body = BufferedBody::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<order id="7">
  <item sku="a">Apple</item>
  <item sku="b">Banana</item>
  <note/>
</order>"#,
    );
    let parsed = parser.parse(Some("application/xml"), &body).unwrap();
    assert_eq!(
        parsed,
        Some(json!({
            "@attributes": {"id": "7"},
            "item": [
                {"@attributes": {"sku": "a"}, "#text": "Apple"},
                {"@attributes": {"sku": "b"}, "#text": "Banana"}
            ],
            "note": ""
        }))
    );

    let body = BufferedBody::from("<order><item></order>");
    let err = parser.parse(Some("text/xml"), &body).unwrap_err();
    assert!(matches!(err.source, DecodeErrorKind::Xml(_)));
}

#[test]
fn multipart_text_fields_become_the_parsed_body() {
    let parser = BodyParser::default();
    let parsed = parser.parse(Some(MULTIPART), &multipart_body()).unwrap();
    assert_eq!(
        parsed,
        Some(json!({"user": {"name": "Jo", "roles": ["admin"]}}))
    );
}

#[test]
fn multipart_files_are_exposed_separately() {
    let parser = BodyParser::default();
    let form = parser.parse_multipart(MULTIPART, &multipart_body()).unwrap();

    assert_eq!(form.files.len(), 1);
    assert_eq!(form.files[0].field_name, "resume");
    assert_eq!(form.files[0].filename, "cv.txt");
    assert_eq!(form.files[0].content_type.as_deref(), Some("text/plain"));
    assert_eq!(form.files[0].data.as_ref(), b"Ten years of Rust");

    let err = parser
        .parse_multipart("application/json", &multipart_body())
        .unwrap_err();
    assert!(matches!(err.source, DecodeErrorKind::UnsupportedContentType(_)));
}

#[test]
fn multipart_part_limit() {
    let config = BodyParserConfig::default().max_multipart_parts(2);
    let parser = BodyParser::new(config);
    let err = parser.parse(Some(MULTIPART), &multipart_body()).unwrap_err();
    assert!(matches!(
        err.source,
        DecodeErrorKind::Multipart(MultipartError::TooManyParts { max: 2 })
    ));
}

#[test]
fn size_limit() {
    let body = BufferedBody::from(r#"{"payload": "0123456789"}"#);

    let strict = BodyParser::new(BodyParserConfig::default().body_size_limit(
        BodySizeLimit::Enabled {
            max_size: 10.bytes(),
        },
    ));
    let err = strict.parse(Some("application/json"), &body).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with(
        "Failed to decode the body as `application/json`.\nThe body is larger than the maximum size limit"
    ));
    assert!(message.ends_with("it's 25 bytes long"));

    let relaxed = BodyParser::new(BodyParserConfig::default().body_size_limit(BodySizeLimit::Disabled));
    assert!(relaxed.parse(Some("application/json"), &body).unwrap().is_some());
}

#[test]
fn form_depth_limit() {
    let parser = BodyParser::new(BodyParserConfig::default().max_form_depth(1));
    let body = BufferedBody::from("a[b][c]=1&d[e]=2");
    let parsed = parser
        .parse(Some("application/x-www-form-urlencoded"), &body)
        .unwrap();
    assert_eq!(parsed, Some(json!({"a[b][c]": "1", "d": {"e": "2"}})));
}

#[test]
fn typed_deserialization() {
    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct Signup {
        email: String,
        age: u8,
    }

    let parser = BodyParser::default();

    let body = BufferedBody::from("email=jo%40example.com&age=30");
    let signup: Signup = parser
        .deserialize(Some("application/x-www-form-urlencoded"), &body)
        .unwrap();
    assert_eq!(
        signup,
        Signup {
            email: "jo@example.com".into(),
            age: 30
        }
    );

    let body = BufferedBody::from(r#"{"email": "jo@example.com", "age": 300}"#);
    let err = parser
        .deserialize::<Signup>(Some("application/json"), &body)
        .unwrap_err();
    assert!(matches!(err.source, DecodeErrorKind::Deserialization(_)));
    assert!(err.to_string().contains("age"));
}

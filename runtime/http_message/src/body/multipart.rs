//! Decoding of `multipart/form-data` bodies.
use bytes::Bytes;

use super::errors::MultipartError;
use super::form::{self, ParamMap};

#[derive(Debug, Clone, Default, PartialEq)]
/// The content of a `multipart/form-data` body.
pub struct MultipartForm {
    /// The text fields, with bracketed names expanded the same way as in
    /// url-encoded forms.
    pub fields: ParamMap,
    /// The file parts, in the order they appear in the body.
    pub files: Vec<MultipartFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A part of a `multipart/form-data` body that carries a `filename`.
pub struct MultipartFile {
    /// The name of the form field.
    pub field_name: String,
    /// The file name sent by the client. It can be empty.
    pub filename: String,
    /// The `Content-Type` of the part, if it has one.
    pub content_type: Option<String>,
    /// The raw content of the part.
    pub data: Bytes,
}

pub(super) fn is_form_data(mime: &mime::Mime) -> bool {
    mime.type_() == mime::MULTIPART && mime.subtype() == mime::FORM_DATA
}

pub(super) fn boundary(mime: &mime::Mime) -> Option<String> {
    mime.get_param(mime::BOUNDARY)
        .map(|boundary| boundary.as_str().to_owned())
}

pub(super) fn decode(
    body: &Bytes,
    boundary: &str,
    max_parts: usize,
    max_depth: usize,
) -> Result<MultipartForm, MultipartError> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();
    let inner_delimiter = [b"\r\n".as_slice(), delimiter].concat();

    let Some(start) = find(body, delimiter) else {
        return Err(MultipartError::MissingOpeningDelimiter {
            boundary: boundary.to_owned(),
        });
    };
    let missing_closing_delimiter = || MultipartError::MissingClosingDelimiter {
        boundary: boundary.to_owned(),
    };

    let mut form = MultipartForm::default();
    let mut cursor = start + delimiter.len();
    let mut index = 0;
    loop {
        let rest = &body[cursor..];
        if rest.starts_with(b"--") {
            return Ok(form);
        }
        let part_start = cursor + skip_line_end(rest).ok_or_else(missing_closing_delimiter)?;
        let part_len =
            find(&body[part_start..], &inner_delimiter).ok_or_else(missing_closing_delimiter)?;
        if index == max_parts {
            return Err(MultipartError::TooManyParts { max: max_parts });
        }
        tracing::trace!(index, "Decoding multipart part");
        let part = body.slice(part_start..part_start + part_len);
        decode_part(part, index, &mut form, max_depth)?;

        index += 1;
        cursor = part_start + part_len + inner_delimiter.len();
    }
}

fn decode_part(
    part: Bytes,
    index: usize,
    form: &mut MultipartForm,
    max_depth: usize,
) -> Result<(), MultipartError> {
    let (head, content) = if part.starts_with(b"\r\n") {
        (&part[..0], part.slice(2..))
    } else {
        let end =
            find(&part, b"\r\n\r\n").ok_or(MultipartError::MalformedPartHeaders { index })?;
        (&part[..end], part.slice(end + 4..))
    };
    let head =
        std::str::from_utf8(head).map_err(|_| MultipartError::MalformedPartHeaders { index })?;

    let mut disposition = None;
    let mut content_type = None;
    for line in head.split("\r\n").filter(|line| !line.is_empty()) {
        let (name, value) = line
            .split_once(':')
            .ok_or(MultipartError::MalformedPartHeaders { index })?;
        let name = name.trim();
        if name.eq_ignore_ascii_case("content-disposition") {
            disposition = parse_disposition(value);
        } else if name.eq_ignore_ascii_case("content-type") {
            content_type = Some(value.trim().to_owned());
        }
    }

    let Some((field_name, filename)) = disposition else {
        return Err(MultipartError::MissingFieldName { index });
    };
    match filename {
        Some(filename) => form.files.push(MultipartFile {
            field_name,
            filename,
            content_type,
            data: content,
        }),
        None => {
            let value = String::from_utf8_lossy(&content).into_owned();
            form::insert(&mut form.fields, &field_name, value, max_depth);
        }
    }
    Ok(())
}

/// Extract `name` and `filename` from a `form-data; name="..."; filename="..."` value.
fn parse_disposition(value: &str) -> Option<(String, Option<String>)> {
    let mut params = value.split(';');
    if !params.next()?.trim().eq_ignore_ascii_case("form-data") {
        return None;
    }
    let mut name = None;
    let mut filename = None;
    for param in params {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let value = unquote(value.trim());
        match key.trim().to_ascii_lowercase().as_str() {
            "name" => name = Some(value),
            "filename" => filename = Some(value),
            _ => {}
        }
    }
    Some((name?, filename))
}

fn unquote(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
    {
        Some(quoted) => quoted.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => value.to_owned(),
    }
}

/// The number of bytes taken by the transport padding and the line break that
/// follow a delimiter.
fn skip_line_end(rest: &[u8]) -> Option<usize> {
    let padding = rest
        .iter()
        .take_while(|byte| matches!(**byte, b' ' | b'\t'))
        .count();
    rest[padding..]
        .starts_with(b"\r\n")
        .then_some(padding + 2)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

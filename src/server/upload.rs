//! Multipart parsing and validation for the protect endpoint.

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{FortressError, Result};
use crate::form::{PDF_MIME, PROTECTED_PREFIX};

/// Name used when the upload carries no file name.
pub const DEFAULT_FILENAME: &str = "document.pdf";

/// Bytes escaped in an RFC 5987 `filename*` value: everything but attr-char.
const ATTR_CHAR_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// A validated protect request.
pub struct UploadRequest {
    pub bytes: Bytes,
    pub content_type: String,
    /// Final path component of the client name, control characters removed.
    pub filename: String,
    pub password: String,
}

struct UploadedFile {
    bytes: Bytes,
    content_type: String,
    filename: Option<String>,
}

impl UploadRequest {
    /// Read the `file` and `password` fields. Other fields are skipped.
    pub async fn from_multipart(
        multipart: std::result::Result<Multipart, MultipartRejection>,
    ) -> Result<Self> {
        let mut multipart = multipart.map_err(|rejection| {
            tracing::debug!("Not a multipart body: {}", rejection.body_text());
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                FortressError::PayloadTooLarge
            } else {
                FortressError::MissingFields
            }
        })?;

        let mut file = None;
        let mut password = None;

        while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("file") => {
                    let filename = field.file_name().map(str::to_string);
                    let content_type = field.content_type().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(upload_error)?;
                    file = Some(UploadedFile {
                        bytes,
                        content_type,
                        filename,
                    });
                }
                Some("password") => {
                    password = Some(field.text().await.map_err(upload_error)?);
                }
                _ => {}
            }
        }

        let (file, password) = match (file, password) {
            (Some(file), Some(password)) if !password.is_empty() => (file, password),
            _ => return Err(FortressError::MissingFields),
        };

        if !is_pdf_mime(&file.content_type) {
            return Err(FortressError::InvalidFileType);
        }

        Ok(Self {
            bytes: file.bytes,
            content_type: file.content_type,
            filename: file
                .filename
                .as_deref()
                .map(base_name)
                .unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
            password,
        })
    }
}

fn upload_error(err: MultipartError) -> FortressError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        FortressError::PayloadTooLarge
    } else {
        FortressError::MalformedUpload(err.body_text())
    }
}

/// Compare the media type only, ignoring parameters and case.
fn is_pdf_mime(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MIME))
        .unwrap_or(false)
}

/// Last path component of a client-supplied name, with control characters
/// replaced. Unicode is kept.
pub fn base_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();

    if cleaned.trim().is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned
    }
}

/// Reduce a client-supplied name to something safe inside a quoted
/// `Content-Disposition` filename.
pub fn sanitize_filename(raw: &str) -> String {
    base_name(raw)
        .chars()
        .map(|c| if c == '"' || !c.is_ascii() { '_' } else { c })
        .collect()
}

/// Attachment header for the protected copy of `filename`: an ASCII
/// `filename` fallback plus the UTF-8 `filename*` form (RFC 6266).
pub fn content_disposition(filename: &str) -> String {
    let fallback = sanitize_filename(filename);
    let full = format!("{}{}", PROTECTED_PREFIX, base_name(filename));
    format!(
        "attachment; filename=\"{}{}\"; filename*=UTF-8''{}",
        PROTECTED_PREFIX,
        fallback,
        utf8_percent_encode(&full, ATTR_CHAR_ESCAPES)
    )
}

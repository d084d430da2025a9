use crate::form;
use crate::settings::Settings;

const INDEX_TEMPLATE: &str = include_str!("../../assets/index.html");

/// Render the upload form page with the shared form constants.
pub fn render_index(settings: &Settings) -> String {
    let replacements = [
        ("{{PDF_MIME}}", form::PDF_MIME.to_string()),
        ("{{PROTECT_ENDPOINT}}", form::PROTECT_ENDPOINT.to_string()),
        ("{{PROTECTED_PREFIX}}", form::PROTECTED_PREFIX.to_string()),
        ("{{INVALID_SELECTION}}", form::INVALID_SELECTION.to_string()),
        ("{{FILE_TOO_LARGE}}", form::FILE_TOO_LARGE.to_string()),
        ("{{PASSWORD_MISMATCH}}", form::PASSWORD_MISMATCH.to_string()),
        ("{{FAILED_FALLBACK}}", form::FAILED_FALLBACK.to_string()),
        ("{{UNEXPECTED_FAILURE}}", form::UNEXPECTED_FAILURE.to_string()),
        ("{{MAX_UPLOAD_BYTES}}", settings.max_upload_bytes.to_string()),
        ("{{VERSION}}", env!("CARGO_PKG_VERSION").to_string()),
    ];

    replacements
        .iter()
        .fold(INDEX_TEMPLATE.to_string(), |html, (placeholder, value)| {
            html.replace(placeholder, value)
        })
}

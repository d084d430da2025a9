//! Upload form rules.
//!
//! The browser page runs the same rules in script; the server renders the
//! shared constants below into it so both sides agree on MIME type, size
//! limit, endpoint and messages.

use serde::Deserialize;

/// The only accepted upload type.
pub const PDF_MIME: &str = "application/pdf";
/// Path the form posts to.
pub const PROTECT_ENDPOINT: &str = "/api/protect";
/// Prefix added to the downloaded file name.
pub const PROTECTED_PREFIX: &str = "protected_";

pub const INVALID_SELECTION: &str = "Please upload a valid PDF file.";
pub const FILE_TOO_LARGE: &str = "File exceeds the maximum upload size";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const FAILED_FALLBACK: &str = "Failed to protect PDF";
pub const UNEXPECTED_FAILURE: &str = "Something went wrong. Please try again.";

/// A file picked or dropped by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// The single outbound request produced by a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub endpoint: &'static str,
    pub file: SelectedFile,
    pub password: String,
}

/// Response received for a submission.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Success(Vec<u8>),
    Failure { status: u16, body: Vec<u8> },
}

/// A downloadable object built from a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Deserialize)]
struct ErrorPayload {
    error: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct UploadForm {
    /// Largest accepted file. `None` accepts any size.
    max_upload_bytes: Option<usize>,
    file: Option<SelectedFile>,
    password: String,
    confirm_password: String,
    processing: bool,
    error: Option<String>,
    download: Option<DownloadLink>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form that refuses files larger than the server's body limit.
    pub fn with_upload_limit(max_upload_bytes: usize) -> Self {
        Self {
            max_upload_bytes: Some(max_upload_bytes),
            ..Self::default()
        }
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn download(&self) -> Option<&DownloadLink> {
        self.download.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Accept a file only if it declares the PDF MIME type and fits the
    /// upload limit.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.error = None;
        self.download = None;
        if file.mime != PDF_MIME {
            self.error = Some(INVALID_SELECTION.to_string());
            return;
        }
        if self.max_upload_bytes.is_some_and(|max| file.bytes.len() > max) {
            self.error = Some(FILE_TOO_LARGE.to_string());
            return;
        }
        self.file = Some(file);
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn set_confirm_password(&mut self, confirm: impl Into<String>) {
        self.confirm_password = confirm.into();
    }

    /// Whether to show the mismatch hint under the confirm field.
    pub fn password_mismatch(&self) -> bool {
        !self.confirm_password.is_empty() && self.password != self.confirm_password
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some()
            && !self.password.is_empty()
            && !self.confirm_password.is_empty()
            && self.password == self.confirm_password
            && !self.processing
    }

    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if !self.can_submit() {
            return None;
        }
        let file = self.file.clone()?;
        self.processing = true;
        self.error = None;
        Some(SubmitRequest {
            endpoint: PROTECT_ENDPOINT,
            file,
            password: self.password.clone(),
        })
    }

    pub fn finish_submit(&mut self, outcome: SubmitOutcome) {
        self.processing = false;
        match outcome {
            SubmitOutcome::Success(bytes) => {
                let name = self.file.as_ref().map(|f| f.name.as_str()).unwrap_or("");
                self.download = Some(DownloadLink {
                    filename: format!("{}{}", PROTECTED_PREFIX, name),
                    bytes,
                });
            }
            SubmitOutcome::Failure { status, body } => {
                let message = failure_message(&body);
                tracing::debug!("Protect request failed with {}: {}", status, message);
                self.error = Some(message);
            }
        }
    }

    /// Clear every field. Returns the previous download link so the caller
    /// can revoke it.
    pub fn reset(&mut self) -> Option<DownloadLink> {
        let previous = self.download.take();
        *self = Self {
            max_upload_bytes: self.max_upload_bytes,
            ..Self::default()
        };
        previous
    }
}

fn failure_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorPayload>(body) {
        Ok(ErrorPayload { error: Some(message) }) if !message.is_empty() => message,
        Ok(_) => FAILED_FALLBACK.to_string(),
        Err(_) => UNEXPECTED_FAILURE.to_string(),
    }
}

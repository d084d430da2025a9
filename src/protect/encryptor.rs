use std::path::Path;

use lopdf::{Document, EncryptionState, EncryptionVersion, Object, StringFormat};
use uuid::Uuid;

use super::ProtectionOptions;
use crate::error::{FortressError, Result};

/// File-to-file PDF re-encryption.
///
/// Implementations are synchronous and may block; callers run them off the
/// async workers.
pub trait PdfEncryptor: Send + Sync {
    fn recrypt(&self, input: &Path, output: &Path, options: &ProtectionOptions) -> Result<()>;
}

/// Standard security handler encryption via `lopdf` (RC4, revision 3).
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfEncryptor;

impl PdfEncryptor for LopdfEncryptor {
    fn recrypt(&self, input: &Path, output: &Path, options: &ProtectionOptions) -> Result<()> {
        let mut doc = Document::load(input)?;

        // Still encrypted after load means the empty user password failed.
        if doc.is_encrypted() {
            return Err(FortressError::Protect(
                "PDF is already password-protected".into(),
            ));
        }

        doc.encryption_state = None;
        doc.trailer.remove(b"Encrypt");
        ensure_document_id(&mut doc);

        let version = EncryptionVersion::V2 {
            document: &doc,
            owner_password: &options.owner_password,
            user_password: &options.user_password,
            key_length: options.key_length,
            permissions: options.permissions(),
        };
        let state = EncryptionState::try_from(version).map_err(|e| {
            FortressError::Protect(format!("Failed to derive encryption key: {}", e))
        })?;

        doc.encrypt(&state)?;
        doc.save(output)?;
        Ok(())
    }
}

/// The key derivation mixes in the first trailer `/ID` entry, so documents
/// written without one get a fresh random pair.
fn ensure_document_id(doc: &mut Document) {
    let has_id = matches!(doc.trailer.get(b"ID"), Ok(Object::Array(ids)) if ids.len() == 2);
    if has_id {
        return;
    }

    let permanent = Uuid::new_v4().as_bytes().to_vec();
    let changing = Uuid::new_v4().as_bytes().to_vec();
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(permanent, StringFormat::Hexadecimal),
            Object::String(changing, StringFormat::Hexadecimal),
        ]),
    );
    tracing::debug!("Generated missing trailer ID");
}

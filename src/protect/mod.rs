pub mod encryptor;
pub mod temp;

#[cfg(test)]
pub(crate) mod fixtures;

use std::path::Path;

use lopdf::Permissions;

use crate::error::Result;
use crate::settings::ProtectionDefaults;

pub use encryptor::{LopdfEncryptor, PdfEncryptor};
pub use temp::TempFilePair;

/// Parameters handed to the encryptor for one document.
#[derive(Clone)]
pub struct ProtectionOptions {
    pub user_password: String,
    pub owner_password: String,
    /// Raw PDF permission bitmask (`/P` entry bits).
    pub permission_flags: u32,
    /// Key length in bits.
    pub key_length: usize,
}

impl ProtectionOptions {
    /// Use one password as both user and owner password.
    pub fn with_password(password: &str, defaults: &ProtectionDefaults) -> Self {
        Self {
            user_password: password.to_string(),
            owner_password: password.to_string(),
            permission_flags: defaults.permissions,
            key_length: defaults.key_length as usize,
        }
    }

    pub fn permissions(&self) -> Permissions {
        Permissions::from_bits_truncate(self.permission_flags.into())
    }
}

impl std::fmt::Debug for ProtectionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtectionOptions")
            .field("user_password", &"<redacted>")
            .field("owner_password", &"<redacted>")
            .field("permission_flags", &self.permission_flags)
            .field("key_length", &self.key_length)
            .finish()
    }
}

/// Encrypt `input` through a scratch file pair in `dir` and return the
/// protected bytes. The pair is removed on every return path.
pub fn protect_pdf(
    dir: &Path,
    encryptor: &dyn PdfEncryptor,
    input: &[u8],
    options: &ProtectionOptions,
) -> Result<Vec<u8>> {
    std::fs::create_dir_all(dir)?;

    let pair = TempFilePair::new(dir);
    tracing::debug!(
        "Temp pair {}: {} -> {}",
        pair.id(),
        pair.input().display(),
        pair.output().display()
    );

    std::fs::write(pair.input(), input)?;
    encryptor.recrypt(pair.input(), pair.output(), options)?;
    let output = std::fs::read(pair.output())?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FortressError;

    /// Writes a partial output and then fails, like a crash mid-save.
    struct FailingEncryptor;

    impl PdfEncryptor for FailingEncryptor {
        fn recrypt(&self, _input: &Path, output: &Path, _options: &ProtectionOptions) -> Result<()> {
            std::fs::write(output, b"%PDF-1.5 truncated")?;
            Err(FortressError::Protect("simulated failure".into()))
        }
    }

    fn options(password: &str) -> ProtectionOptions {
        ProtectionOptions::with_password(password, &ProtectionDefaults::default())
    }

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(name);
        std::fs::remove_dir_all(&dir).ok();
        dir
    }

    #[test]
    fn test_options_share_password() {
        let opts = options("secret123");
        assert_eq!(opts.user_password, "secret123");
        assert_eq!(opts.owner_password, "secret123");
        assert_eq!(opts.key_length, 128);
        assert_eq!(opts.permissions().bits(), Permissions::PRINTABLE.bits());
    }

    #[test]
    fn test_debug_hides_passwords() {
        let rendered = format!("{:?}", options("hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_protect_pdf_cleans_up_on_success() {
        let dir = scratch("pdf_fortress_test_protect_ok");
        let input = fixtures::sample_pdf("Hello, protected world");

        let output = protect_pdf(&dir, &LopdfEncryptor, &input, &options("secret123")).unwrap();

        assert!(output.starts_with(b"%PDF"));
        assert_ne!(output, input);
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_protect_pdf_cleans_up_on_failure() {
        let dir = scratch("pdf_fortress_test_protect_fail");
        let input = fixtures::sample_pdf("doomed");

        let result = protect_pdf(&dir, &FailingEncryptor, &input, &options("pw"));

        assert!(matches!(result, Err(FortressError::Protect(_))));
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_protect_pdf_invalid_input_cleans_up() {
        let dir = scratch("pdf_fortress_test_protect_invalid");

        let result = protect_pdf(&dir, &LopdfEncryptor, b"not a pdf", &options("pw"));

        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_concurrent_requests_do_not_interfere() {
        let dir = scratch("pdf_fortress_test_protect_concurrent");

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let dir = dir.clone();
                std::thread::spawn(move || {
                    let text = format!("Document number {}", i);
                    let password = format!("password-{}", i);
                    let input = fixtures::sample_pdf(&text);
                    let output =
                        protect_pdf(&dir, &LopdfEncryptor, &input, &options(&password)).unwrap();
                    (text, password, output)
                })
            })
            .collect();

        for handle in handles {
            let (text, password, output) = handle.join().unwrap();
            let doc = lopdf::Document::load_mem_with_password(&output, &password).unwrap();
            let pages: Vec<u32> = doc.get_pages().keys().cloned().collect();
            assert!(doc.extract_text(&pages).unwrap().contains(&text));
        }
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

        std::fs::remove_dir_all(&dir).ok();
    }
}

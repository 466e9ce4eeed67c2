use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::error::SignError;

/// Expand a leading `~` to the caller's home directory.
///
/// Anything after the `~` is joined onto home, so `~sigs/me.png` names a file under home
/// rather than another user's directory.
pub fn expand_signature_path(raw: &str) -> PathBuf {
    match raw.strip_prefix('~') {
        Some(rest) if !rest.is_empty() && !rest.starts_with(std::path::is_separator) => {
            match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => PathBuf::from(raw),
            }
        }
        _ => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

/// Read the configured signature image. An empty path is a configuration error.
pub fn read_signature(raw: &str) -> Result<Vec<u8>, SignError> {
    if raw.trim().is_empty() {
        return Err(SignError::MissingSignature);
    }
    let path = expand_signature_path(raw);
    std::fs::read(&path).map_err(|source| SignError::ReadSignature { path, source })
}

/// Write the signature bytes to a fresh temp file in `dir`.
///
/// The returned `TempPath` removes the file when dropped, on every exit path of the caller.
pub fn materialize_signature(dir: &Path, data: &[u8]) -> Result<TempPath, SignError> {
    let mut file = tempfile::Builder::new()
        .prefix("signature-")
        .suffix(".png")
        .tempfile_in(dir)
        .map_err(SignError::CreateTemp)?;
    file.write_all(data).map_err(SignError::WriteTemp)?;
    file.flush().map_err(SignError::WriteTemp)?;
    Ok(file.into_temp_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_rejected_before_io() {
        assert!(matches!(read_signature(""), Err(SignError::MissingSignature)));
        assert!(matches!(read_signature("   "), Err(SignError::MissingSignature)));
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(
            expand_signature_path("~/sig.png"),
            home.join("sig.png")
        );
        assert_eq!(expand_signature_path("/abs/sig.png"), PathBuf::from("/abs/sig.png"));
    }

    #[test]
    fn tilde_followed_by_a_name_joins_onto_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(
            expand_signature_path("~sigs/me.png"),
            home.join("sigs").join("me.png")
        );
        assert_eq!(expand_signature_path("~"), home);
        assert_eq!(expand_signature_path("sig~.png"), PathBuf::from("sig~.png"));
    }

    #[test]
    fn unreadable_signature_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        let err = read_signature(missing.to_str().unwrap()).unwrap_err();
        match err {
            SignError::ReadSignature { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn temp_signature_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let temp = materialize_signature(dir.path(), b"png").unwrap();
        let path = temp.to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), b"png");
        drop(temp);
        assert!(!path.exists());
    }
}

// # Credential Loader
//
// Reads the API bearer token from the externally-managed linode-cli
// configuration. This tool never writes that file and never logs the
// token.
//
// ## File Format
//
// ```ini
// [DEFAULT]
// default-user = alice
//
// [alice]
// token = <bearer token>
// ```
//
// All failures here are user-facing, fatal, and non-retryable: the tool
// cannot proceed without a credential, and only the operator can fix a
// missing or malformed CLI configuration.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ini;

/// Reader for the linode-cli configuration file
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    /// Create a loader for the given linode-cli config path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read the default user's API token
    ///
    /// # Errors
    ///
    /// - [`Error::CredentialNotFound`] when the file is absent
    /// - [`Error::CredentialInvalid`] when no default user is designated
    /// - [`Error::TokenMissing`] when the designated user has no token
    pub fn token(&self) -> Result<String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::CredentialNotFound(self.path.display().to_string()));
            }
            Err(e) => {
                return Err(Error::credential_invalid(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let sections = ini::parse(&content);

        let user = sections
            .get(ini::DEFAULT_SECTION)
            .and_then(|defaults| defaults.get("default-user"))
            .filter(|user| !user.is_empty())
            .ok_or_else(|| Error::credential_invalid("no default user designated"))?;

        let token = sections
            .get(user)
            .and_then(|section| section.get("token"))
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::TokenMissing(user.clone()))?;

        Ok(token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_config(content: &str) -> (tempfile::TempDir, CredentialFile) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("linode-cli");
        fs::write(&path, content).unwrap();
        (dir, CredentialFile::new(path))
    }

    #[test]
    fn reads_default_users_token() {
        let (_dir, creds) =
            write_config("[DEFAULT]\ndefault-user = alice\n\n[alice]\ntoken = tok-abc\n");
        assert_eq!(creds.token().unwrap(), "tok-abc");
    }

    #[test]
    fn absent_file_is_credential_not_found() {
        let dir = tempdir().unwrap();
        let creds = CredentialFile::new(dir.path().join("absent"));
        assert!(matches!(
            creds.token().unwrap_err(),
            Error::CredentialNotFound(_)
        ));
    }

    #[test]
    fn missing_default_user_is_invalid_config() {
        let (_dir, creds) = write_config("[alice]\ntoken = tok-abc\n");
        assert!(matches!(
            creds.token().unwrap_err(),
            Error::CredentialInvalid(_)
        ));
    }

    #[test]
    fn missing_token_names_the_user() {
        let (_dir, creds) = write_config("[DEFAULT]\ndefault-user = alice\n\n[alice]\n");
        match creds.token().unwrap_err() {
            Error::TokenMissing(user) => assert_eq!(user, "alice"),
            other => panic!("expected TokenMissing, got {other:?}"),
        }
    }
}

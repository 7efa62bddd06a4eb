//! File Credential Store
//!
//! Two-line plaintext cache: line 1 is the access token, line 2 the API
//! key. The layout is positional and written without a trailing newline so
//! existing cache files stay interchangeable.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::application::ports::{CredentialStorePort, StoreError};
use crate::domain::credentials::CredentialPair;

/// Credential cache backed by a local file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store at `path`. The file is not touched until used.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl CredentialStorePort for FileCredentialStore {
    fn load(&self) -> Result<Option<CredentialPair>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Credential cache not found");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut lines = content.lines().map(str::trim);
        let access_token = lines.next().unwrap_or_default();
        let api_key = lines.next().unwrap_or_default();

        match CredentialPair::new(access_token, api_key) {
            Ok(pair) => Ok(Some(pair)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Credential cache incomplete, ignoring it"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, pair: &CredentialPair) -> Result<(), StoreError> {
        let content = format!("{}\n{}", pair.access_token(), pair.api_key());
        std::fs::write(&self.path, content).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), "Credential cache written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use test_case::test_case;

    use super::*;

    #[test]
    fn missing_file_loads_none() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("__TOKEN_STORE.txt"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_writes_two_bare_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("__TOKEN_STORE.txt");
        let store = FileCredentialStore::new(&path);

        let pair = CredentialPair::new("access_abc", "key_xyz").unwrap();
        store.save(&pair).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "access_abc\nkey_xyz"
        );
        assert_eq!(store.load().unwrap(), Some(pair));
    }

    #[test_case("token\nkey", Some(("token", "key")) ; "bare lines")]
    #[test_case("token\r\nkey\r\n", Some(("token", "key")) ; "crlf with trailing newline")]
    #[test_case("  token  \n  key  \nextra", Some(("token", "key")) ; "padded with extra line")]
    #[test_case("token\n", None ; "missing key line")]
    #[test_case("\nkey", None ; "empty token line")]
    #[test_case("", None ; "empty file")]
    fn load_parses_positional_lines(content: &str, expected: Option<(&str, &str)>) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.txt");
        std::fs::write(&path, content).unwrap();

        let loaded = FileCredentialStore::new(&path).load().unwrap();
        let expected = expected.map(|(t, k)| CredentialPair::new(t, k).unwrap());
        assert_eq!(loaded, expected);
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = tempdir().unwrap();
        // A directory cannot be read as a file.
        let store = FileCredentialStore::new(dir.path());
        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn save_overwrites_previous_pair() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("store.txt"));

        store
            .save(&CredentialPair::new("old_token", "old_key").unwrap())
            .unwrap();
        store
            .save(&CredentialPair::new("new_token", "new_key").unwrap())
            .unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token(), "new_token");
        assert_eq!(loaded.api_key(), "new_key");
    }
}

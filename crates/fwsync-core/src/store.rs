// # Target Store
//
// Persists the `(firewall_id, label)` pair between runs so the operator
// can invoke the tool with no arguments after the first run.
//
// ## File Format
//
// configparser-compatible key-value text, as written by earlier versions
// of this tool:
//
// ```ini
// [DEFAULT]
// firewall_id = 123456
// label = home
// ```
//
// The path is injected at construction; there are no global config-path
// constants. Missing file is not an error at load time — the caller
// decides whether to fall back to required arguments.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ini;

/// The locally remembered firewall target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    /// ID of the firewall whose inbound chain is managed
    pub firewall_id: String,
    /// Label prefix for the managed rule group
    pub label: String,
}

/// File-backed store for the sync target
#[derive(Debug, Clone)]
pub struct TargetStore {
    path: PathBuf,
}

impl TargetStore {
    /// Create a store backed by the given file path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored target
    ///
    /// Returns `Ok(None)` when the file does not exist or holds no
    /// complete pair; other I/O failures are fatal.
    pub fn load(&self) -> Result<Option<SyncTarget>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no target file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::store(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let sections = ini::parse(&content);
        let Some(defaults) = sections.get(ini::DEFAULT_SECTION) else {
            return Ok(None);
        };

        match (defaults.get("firewall_id"), defaults.get("label")) {
            (Some(firewall_id), Some(label)) if !firewall_id.is_empty() && !label.is_empty() => {
                Ok(Some(SyncTarget {
                    firewall_id: firewall_id.clone(),
                    label: label.clone(),
                }))
            }
            _ => Ok(None),
        }
    }

    /// Overwrite the stored target
    ///
    /// Called whenever both identifiers are supplied explicitly, so every
    /// explicit invocation updates the remembered default.
    pub fn save(&self, target: &SyncTarget) -> Result<()> {
        let content = format!(
            "[DEFAULT]\nfirewall_id = {}\nlabel = {}\n",
            target.firewall_id, target.label
        );

        fs::write(&self.path, content).map_err(|e| {
            Error::store(format!("failed to write {}: {e}", self.path.display()))
        })?;

        tracing::debug!("stored target in {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = TargetStore::new(dir.path().join("config"));

        let target = SyncTarget {
            firewall_id: "123456".to_string(),
            label: "home".to_string(),
        };
        store.save(&target).unwrap();

        assert_eq!(store.load().unwrap(), Some(target));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = TargetStore::new(dir.path().join("absent"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn incomplete_pair_loads_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "[DEFAULT]\nfirewall_id = 123456\n").unwrap();

        assert_eq!(TargetStore::new(&path).load().unwrap(), None);
    }

    #[test]
    fn save_overwrites_previous_target() {
        let dir = tempdir().unwrap();
        let store = TargetStore::new(dir.path().join("config"));

        store
            .save(&SyncTarget {
                firewall_id: "1".to_string(),
                label: "old".to_string(),
            })
            .unwrap();
        let newer = SyncTarget {
            firewall_id: "2".to_string(),
            label: "new".to_string(),
        };
        store.save(&newer).unwrap();

        assert_eq!(store.load().unwrap(), Some(newer));
    }

    #[test]
    fn reads_configparser_output_with_trailing_blank_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "[DEFAULT]\nfirewall_id = 99\nlabel = lab\n\n").unwrap();

        let loaded = TargetStore::new(&path).load().unwrap().unwrap();
        assert_eq!(loaded.firewall_id, "99");
        assert_eq!(loaded.label, "lab");
    }
}

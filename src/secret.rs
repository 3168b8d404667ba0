//! Secret-value file loading.

use std::path::{Path, PathBuf};

use crate::error::LayerfigError;
use crate::layer::Contribute;
use crate::store::SettingsStore;

/// Settings contributor that fills `SECRET_KEY` from a file on disk.
///
/// `SECRET_KEY_FILE` defaults to `{CONF_DIR}/SECRET_KEY`. If `SECRET_KEY` is
/// still unset and the file exists, its contents are read (blocking,
/// synchronous), the trailing newline is trimmed, and the result is
/// installed with `set_default`.
///
/// A missing file is not an error: pair this step with
/// `.require(["SECRET_KEY"])` on the builder when the key is mandatory. An
/// existing but unreadable file is an I/O error carrying the path.
pub struct SecretFile {
    key: String,
    file_key: String,
}

impl SecretFile {
    pub fn new() -> Self {
        Self {
            key: "SECRET_KEY".to_string(),
            file_key: "SECRET_KEY_FILE".to_string(),
        }
    }

    /// Use different setting names for the secret and its file path.
    pub fn keys(key: &str, file_key: &str) -> Self {
        Self {
            key: key.to_string(),
            file_key: file_key.to_string(),
        }
    }
}

impl Default for SecretFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Contribute for SecretFile {
    fn contribute(&self, store: &mut SettingsStore) -> Result<(), LayerfigError> {
        if !store.contains(&self.file_key)
            && let Ok(conf_dir) = store.get_str("CONF_DIR")
        {
            let default_path = Path::new(conf_dir).join(&self.key);
            store.set_default(&self.file_key, default_path.to_string_lossy().into_owned());
        }

        if store.contains(&self.key) {
            return Ok(());
        }
        // No file path configured is fine; a wrong-typed one is not.
        let path = match store.get_str(&self.file_key) {
            Ok(file) => PathBuf::from(file),
            Err(LayerfigError::MissingSetting(_)) => return Ok(()),
            Err(other) => return Err(other),
        };
        if !path.exists() {
            return Ok(());
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| LayerfigError::IoError {
            path: path.clone(),
            source: e,
        })?;
        store.set_default(&self.key, contents.trim_end().to_string());
        Ok(())
    }
}

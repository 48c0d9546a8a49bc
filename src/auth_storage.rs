use std::{fs, io::ErrorKind, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{runtime_paths, AUTH_TOKEN_FILE};

/// Persistence seam for the session token, so the auth service can run
/// against an in-memory double in tests.
pub(crate) trait TokenStorage {
    fn save_token(&self, token: &str) -> Result<(), String>;
    fn load_token(&self) -> Result<Option<String>, String>;
    fn delete_token(&self) -> Result<(), String>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
}

/// Stores the token as JSON under the Bifrost root directory.
#[derive(Debug)]
pub(crate) struct LocalTokenStorage {
    file_path: PathBuf,
}

impl LocalTokenStorage {
    pub(crate) fn new() -> Result<Self, String> {
        let root_dir = runtime_paths::default_bifrost_root_dir().ok_or_else(|| {
            "Cannot resolve the user home directory for token storage.".to_string()
        })?;
        fs::create_dir_all(&root_dir).map_err(|error| {
            format!(
                "Failed to create storage directory {}: {}",
                root_dir.display(),
                error
            )
        })?;
        runtime_paths::restrict_storage_permissions(&root_dir, runtime_paths::STORAGE_DIR_MODE)?;

        Ok(Self::at_path(root_dir.join(AUTH_TOKEN_FILE)))
    }

    pub(crate) fn at_path(file_path: PathBuf) -> Self {
        Self { file_path }
    }
}

impl TokenStorage for LocalTokenStorage {
    fn save_token(&self, token: &str) -> Result<(), String> {
        let serialized = serde_json::to_string_pretty(&StoredToken {
            token: token.to_string(),
        })
        .map_err(|error| format!("Failed to serialize token state: {error}"))?;

        fs::write(&self.file_path, serialized).map_err(|error| {
            format!(
                "Failed to write token state {}: {}",
                self.file_path.display(),
                error
            )
        })?;
        runtime_paths::restrict_storage_permissions(
            &self.file_path,
            runtime_paths::STORAGE_FILE_MODE,
        )
    }

    fn load_token(&self) -> Result<Option<String>, String> {
        let raw = match fs::read_to_string(&self.file_path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(format!(
                    "Failed to read token state {}: {}",
                    self.file_path.display(),
                    error
                ));
            }
        };

        let stored: StoredToken = serde_json::from_str(&raw).map_err(|error| {
            format!(
                "Failed to parse token state {}: {}",
                self.file_path.display(),
                error
            )
        })?;
        if stored.token.is_empty() {
            return Ok(None);
        }
        Ok(Some(stored.token))
    }

    fn delete_token(&self) -> Result<(), String> {
        match fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(format!(
                "Failed to delete token state {}: {}",
                self.file_path.display(),
                error
            )),
        }
    }
}

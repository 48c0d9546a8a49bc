use std::{
    env,
    path::{Path, PathBuf},
};

use crate::ROOT_DIR_ENV;

pub(crate) const STORAGE_DIR_MODE: u32 = 0o700;
pub(crate) const STORAGE_FILE_MODE: u32 = 0o600;

/// Root directory for Bifrost desktop state, `~/.bifrost` unless overridden
/// through `BIFROST_ROOT`.
pub(crate) fn default_bifrost_root_dir() -> Option<PathBuf> {
    resolve_root_dir(env::var(ROOT_DIR_ENV).ok().as_deref(), home::home_dir())
}

fn resolve_root_dir(env_override: Option<&str>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(root) = env_override {
        let trimmed = root.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    home_dir.map(|home| home.join(".bifrost"))
}

/// Token storage is owner-only on Unix. Other platforms keep default ACLs.
#[cfg(unix)]
pub(crate) fn restrict_storage_permissions(path: &Path, mode: u32) -> Result<(), String> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|error| {
        format!(
            "Failed to restrict permissions on {}: {}",
            path.display(),
            error
        )
    })
}

#[cfg(not(unix))]
pub(crate) fn restrict_storage_permissions(_path: &Path, _mode: u32) -> Result<(), String> {
    Ok(())
}

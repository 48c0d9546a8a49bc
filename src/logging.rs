use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use crate::{runtime_paths, DESKTOP_LOG_FILE};

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    root_dir
        .map(|root| root.join("logs").join(file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

/// Best-effort line logger. Logging must never take the desktop process down,
/// so write failures are swallowed.
fn append_log_line(category: &str, message: &str) {
    let line = format!(
        "{} [{category}] {message}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
    );

    let log_path =
        resolve_desktop_log_path(runtime_paths::default_bifrost_root_dir(), DESKTOP_LOG_FILE);
    if let Some(parent_dir) = log_path.parent() {
        if fs::create_dir_all(parent_dir).is_err() {
            return;
        }
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) {
        let _ = file.write_all(line.as_bytes());
    }
}

pub(crate) fn append_desktop_log(message: &str) {
    append_log_line("desktop", message);
}

pub(crate) fn append_startup_log(message: &str) {
    append_log_line("startup", message);
}

pub(crate) fn append_auth_log(message: &str) {
    append_log_line("auth", message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_log_line("shutdown", message);
}

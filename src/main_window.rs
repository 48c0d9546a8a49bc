use tauri::{AppHandle, Manager};

use crate::MAIN_WINDOW_LABEL;

pub(crate) fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("show_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

/// Full reload of the bootstrap surface; the webview re-mounts and re-reads
/// the committed bootstrap state.
pub(crate) fn reload_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("reload_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.eval("window.location.reload();") {
        log(&format!("failed to reload main window: {error}"));
    }
}

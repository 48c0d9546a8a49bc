use std::sync::atomic::Ordering;

use tauri::{AppHandle, Manager};

use crate::{
    append_auth_log, append_desktop_log, append_startup_log, browser_open, main_window,
    startup_task, BootstrapRunState, BootstrapState, BridgeCallResult, HostBridgeState,
};

#[tauri::command]
pub(crate) fn desktop_bridge_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_bootstrap_state(app_handle: AppHandle) -> BootstrapState {
    app_handle.state::<BootstrapRunState>().state.snapshot()
}

/// The full-reload action offered from the error surface: reloads the
/// webview and starts a fresh bootstrap run from its first step.
#[tauri::command]
pub(crate) fn desktop_bridge_reload_bootstrap(app_handle: AppHandle) -> BridgeCallResult {
    let run_state = app_handle.state::<BootstrapRunState>();
    if run_state.is_bootstrapping.load(Ordering::Acquire) {
        return BridgeCallResult {
            ok: false,
            reason: Some("Bootstrap run already in progress.".to_string()),
        };
    }

    append_desktop_log("full reload requested from the bootstrap surface");
    run_state.state.begin_run();
    main_window::reload_main_window(&app_handle, append_desktop_log);
    startup_task::spawn_bootstrap_task(app_handle.clone(), append_startup_log);
    BridgeCallResult {
        ok: true,
        reason: None,
    }
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_auth_token(app_handle: AppHandle) -> Option<String> {
    let bridge = app_handle.state::<HostBridgeState>();
    let Some(service) = bridge.handle() else {
        append_auth_log("auth token requested before the auth bridge was installed");
        return None;
    };

    match service.auth_token() {
        Ok(token) => token,
        Err(error) => {
            append_auth_log(&format!("failed to read stored auth token: {error}"));
            None
        }
    }
}

#[tauri::command]
pub(crate) fn desktop_bridge_logout(app_handle: AppHandle) -> BridgeCallResult {
    let bridge = app_handle.state::<HostBridgeState>();
    let Some(service) = bridge.handle() else {
        return BridgeCallResult {
            ok: false,
            reason: Some("Auth bridge is not ready.".to_string()),
        };
    };

    match service.logout() {
        Ok(()) => {
            append_auth_log("stored session token deleted on logout");
            BridgeCallResult {
                ok: true,
                reason: None,
            }
        }
        Err(error) => BridgeCallResult {
            ok: false,
            reason: Some(error),
        },
    }
}

#[tauri::command]
pub(crate) fn desktop_bridge_open_external_url(url: String) -> BridgeCallResult {
    match browser_open::open_in_system_browser(&url) {
        Ok(()) => BridgeCallResult {
            ok: true,
            reason: None,
        },
        Err(error) => BridgeCallResult {
            ok: false,
            reason: Some(error),
        },
    }
}

use tauri::RunEvent;

use crate::{
    append_auth_log, append_desktop_log, append_shutdown_log, append_startup_log, auth_callback,
    logging, main_window, runtime_paths, startup_task, BootstrapRunState, HostBridgeState,
    DESKTOP_LOG_FILE,
};

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        logging::resolve_desktop_log_path(
            runtime_paths::default_bifrost_root_dir(),
            DESKTOP_LOG_FILE,
        )
        .display()
    ));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, args, _cwd| {
            // A second launch carries the OAuth deep link in its argv.
            if let Some(callback_url) = auth_callback::find_callback_url(&args) {
                auth_callback::handle_auth_callback(app_handle, callback_url, append_auth_log);
            } else {
                main_window::show_main_window(app_handle, append_desktop_log);
            }
        }))
        .manage(HostBridgeState::default())
        .manage(BootstrapRunState::default())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_is_desktop_runtime,
            crate::desktop_bridge_commands::desktop_bridge_get_bootstrap_state,
            crate::desktop_bridge_commands::desktop_bridge_reload_bootstrap,
            crate::desktop_bridge_commands::desktop_bridge_get_auth_token,
            crate::desktop_bridge_commands::desktop_bridge_logout,
            crate::desktop_bridge_commands::desktop_bridge_open_external_url,
        ])
        .setup(|app| {
            let app_handle = app.handle().clone();
            startup_task::spawn_bridge_install_task(app_handle.clone(), append_startup_log);
            startup_task::spawn_bootstrap_task(app_handle, append_startup_log);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|_app_handle, event| match event {
            #[cfg(target_os = "macos")]
            RunEvent::Opened { urls } => {
                for url in urls {
                    auth_callback::handle_auth_callback(_app_handle, url.as_str(), append_auth_log);
                }
            }
            RunEvent::Exit => {
                append_shutdown_log("desktop process exiting");
            }
            _ => {}
        });
}

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod auth_callback;
mod auth_service;
mod auth_storage;
mod bootstrap_state;
mod bridge_poll;
mod browser_open;
mod desktop_bridge_commands;
mod logging;
mod main_window;
mod runtime_paths;
mod startup_task;
mod token_claims;

pub(crate) use app_constants::*;
pub(crate) use app_types::{
    AtomicFlagGuard, BootstrapRunState, BridgeCallResult, BridgeFault, HostBridgeState,
};
pub(crate) use bootstrap_state::BootstrapState;
pub(crate) use logging::{
    append_auth_log, append_desktop_log, append_shutdown_log, append_startup_log,
};

fn main() {
    app_runtime::run();
}

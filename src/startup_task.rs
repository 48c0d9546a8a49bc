use std::{future::Future, sync::Arc};

use tauri::{AppHandle, Emitter, Manager};

use crate::{
    auth_service::HostAuthService,
    bootstrap_state::{BootstrapState, BootstrapStateCell},
    bridge_poll::{self, BridgeReadiness, PollConfig},
    AtomicFlagGuard, BootstrapRunState, BridgeFault, HostBridgeState, BOOTSTRAP_STATE_EVENT,
};

/// The bridge's one auth callable, abstracted so the sequencer can be driven
/// with scripted outcomes in tests.
pub(crate) trait AuthBridge {
    fn check_and_start_login(&self) -> impl Future<Output = Result<(), BridgeFault>> + Send;
}

/// One bootstrap run: enter loading, wait for the bridge, make the single
/// auth call, commit the terminal state. The auth call is the only failure
/// source and is absorbed here; nothing propagates to the host runtime.
///
/// `notify` is the rendering boundary: it observes every committed state in
/// order, starting with `Loading`.
pub(crate) async fn run_bootstrap<R, B, F>(
    readiness: &R,
    bridge: &B,
    cell: &BootstrapStateCell,
    config: &PollConfig,
    notify: F,
) -> Result<BootstrapState, String>
where
    R: BridgeReadiness,
    B: AuthBridge,
    F: Fn(&BootstrapState),
{
    cell.begin_run();
    notify(&BootstrapState::Loading);

    bridge_poll::wait_for_bridge(readiness, config).await;

    let terminal = match bridge.check_and_start_login().await {
        Ok(()) => BootstrapState::Ready,
        Err(fault) => BootstrapState::Error {
            message: fault.into_message(),
        },
    };

    cell.transition(terminal.clone())?;
    notify(&terminal);
    Ok(terminal)
}

/// Host-side view of the auth bridge: ready once the shell has installed the
/// auth service into the managed bridge slot.
#[derive(Clone)]
pub(crate) struct AppHandleBridge {
    app_handle: AppHandle,
}

impl AppHandleBridge {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }

    fn service(&self) -> Option<Arc<HostAuthService>> {
        self.app_handle.state::<HostBridgeState>().handle()
    }
}

impl BridgeReadiness for AppHandleBridge {
    fn is_ready(&self) -> bool {
        self.service().is_some()
    }
}

impl AuthBridge for AppHandleBridge {
    async fn check_and_start_login(&self) -> Result<(), BridgeFault> {
        let Some(service) = self.service() else {
            return Err(BridgeFault::with_reason("Auth bridge is not ready."));
        };
        service.check_and_start_login().map_err(|reason| {
            // A blank reason is a cause without a message; the sequencer
            // substitutes the fallback text for those.
            if reason.trim().is_empty() {
                BridgeFault::unspecified()
            } else {
                BridgeFault::with_reason(reason)
            }
        })
    }
}

/// Builds the auth service and installs it into the bridge slot; bootstrap
/// readiness polling observes the installation. A failed build is logged and
/// leaves the slot empty, which keeps the UI in the loading state.
pub(crate) fn spawn_bridge_install_task<F>(app_handle: AppHandle, log: F)
where
    F: Fn(&str) + Send + 'static,
{
    tauri::async_runtime::spawn(async move {
        match HostAuthService::from_env() {
            Ok(service) => {
                app_handle
                    .state::<HostBridgeState>()
                    .install(Arc::new(service));
                log("auth bridge installed into the host bridge slot");
            }
            Err(error) => log(&format!(
                "failed to initialize auth bridge, bootstrap keeps waiting: {error}"
            )),
        }
    });
}

/// Spawns one bootstrap run. At most one run is in flight per process; a
/// second spawn while one is running logs and returns.
pub(crate) fn spawn_bootstrap_task<F>(app_handle: AppHandle, log: F)
where
    F: Fn(&str) + Send + Sync + 'static,
{
    tauri::async_runtime::spawn(async move {
        let run_state = app_handle.state::<BootstrapRunState>();
        let Some(_running) = AtomicFlagGuard::try_set(&run_state.is_bootstrapping) else {
            log("bootstrap run skipped: a run is already in flight");
            return;
        };

        let bridge = AppHandleBridge::new(app_handle.clone());
        let config = PollConfig::from_env();
        let emitter = app_handle.clone();
        let notify = |state: &BootstrapState| {
            log(&format!("bootstrap state committed: {}", state.phase_label()));
            if let Err(error) = emitter.emit(BOOTSTRAP_STATE_EVENT, state) {
                log(&format!("failed to emit bootstrap state event: {error}"));
            }
        };

        match run_bootstrap(&bridge, &bridge, &run_state.state, &config, notify).await {
            Ok(terminal) => log(&format!("bootstrap run finished: {}", terminal.phase_label())),
            Err(error) => log(&format!("bootstrap run could not commit its state: {error}")),
        }
    });
}

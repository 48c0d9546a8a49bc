use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use serde::Serialize;

use crate::{auth_service::HostAuthService, bootstrap_state::BootstrapStateCell};

/// Result shape shared by the webview bridge commands.
#[derive(Debug, Serialize)]
pub(crate) struct BridgeCallResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

/// Failure of the bridge's auth callable. The reason is optional; the
/// bootstrap sequencer substitutes a fixed fallback message when the cause
/// carries none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BridgeFault {
    pub(crate) reason: Option<String>,
}

impl BridgeFault {
    pub(crate) fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    pub(crate) fn unspecified() -> Self {
        Self { reason: None }
    }

    pub(crate) fn into_message(self) -> String {
        self.reason
            .unwrap_or_else(|| crate::AUTH_FALLBACK_MESSAGE.to_string())
    }
}

/// Install point for the host auth bridge. The shell installs the auth
/// service once it finishes constructing; until then readiness probes see an
/// empty slot and the bootstrap sequencer keeps waiting.
#[derive(Debug, Default)]
pub(crate) struct HostBridgeState {
    slot: Mutex<Option<Arc<HostAuthService>>>,
}

impl HostBridgeState {
    pub(crate) fn install(&self, service: Arc<HostAuthService>) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(service);
        }
    }

    pub(crate) fn handle(&self) -> Option<Arc<HostAuthService>> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

/// Bootstrap run state managed by Tauri: the committed UI state plus the
/// single-flight flag for the sequencer task.
#[derive(Debug, Default)]
pub(crate) struct BootstrapRunState {
    pub(crate) state: BootstrapStateCell,
    pub(crate) is_bootstrapping: AtomicBool,
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::{AtomicFlagGuard, BridgeFault};

    #[test]
    fn atomic_flag_guard_rejects_double_set_until_drop() {
        let flag = AtomicBool::new(false);

        let guard = AtomicFlagGuard::try_set(&flag).expect("first set should succeed");
        assert!(flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_some());
    }

    #[test]
    fn bridge_fault_message_is_verbatim_when_present() {
        assert_eq!(
            BridgeFault::with_reason("network down").into_message(),
            "network down"
        );
    }

    #[test]
    fn bridge_fault_without_reason_uses_the_fallback_message() {
        assert_eq!(
            BridgeFault::unspecified().into_message(),
            "Authentication failed"
        );
    }
}

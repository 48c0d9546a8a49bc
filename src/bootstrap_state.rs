use std::sync::Mutex;

use serde::Serialize;

/// UI state of one bootstrap run. Exactly one variant is active at any
/// instant; `Error` and `Ready` are terminal until a full reload starts a
/// fresh run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub(crate) enum BootstrapState {
    Loading,
    Error { message: String },
    Ready,
}

impl BootstrapState {
    pub(crate) fn phase_label(&self) -> &'static str {
        match self {
            BootstrapState::Loading => "loading",
            BootstrapState::Error { .. } => "error",
            BootstrapState::Ready => "ready",
        }
    }
}

/// Holder of the committed bootstrap state. Written only by the bootstrap
/// sequencer; the command surface and the state event read snapshots.
#[derive(Debug)]
pub(crate) struct BootstrapStateCell {
    current: Mutex<BootstrapState>,
}

impl Default for BootstrapStateCell {
    fn default() -> Self {
        Self {
            current: Mutex::new(BootstrapState::Loading),
        }
    }
}

impl BootstrapStateCell {
    pub(crate) fn snapshot(&self) -> BootstrapState {
        self.current
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(BootstrapState::Loading)
    }

    /// Commits the terminal state of the current run. Only the single
    /// transition out of `Loading` is legal; once a run has ended, further
    /// commits are rejected until `begin_run`.
    pub(crate) fn transition(&self, next: BootstrapState) -> Result<(), String> {
        let mut guard = self
            .current
            .lock()
            .map_err(|_| "Bootstrap state lock poisoned.".to_string())?;

        if !matches!(*guard, BootstrapState::Loading) {
            return Err(format!(
                "illegal bootstrap transition from {} to {}",
                guard.phase_label(),
                next.phase_label()
            ));
        }
        if matches!(next, BootstrapState::Loading) {
            return Err("bootstrap run cannot re-enter loading without a reload".to_string());
        }

        *guard = next;
        Ok(())
    }

    /// Re-enters `Loading` for a fresh run. This is the externally triggered
    /// full-reload path, not a transition within a run.
    pub(crate) fn begin_run(&self) {
        if let Ok(mut guard) = self.current.lock() {
            *guard = BootstrapState::Loading;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BootstrapState, BootstrapStateCell};

    #[test]
    fn cell_starts_in_loading() {
        let cell = BootstrapStateCell::default();
        assert_eq!(cell.snapshot(), BootstrapState::Loading);
    }

    #[test]
    fn transition_commits_ready_from_loading() {
        let cell = BootstrapStateCell::default();
        cell.transition(BootstrapState::Ready).expect("loading -> ready");
        assert_eq!(cell.snapshot(), BootstrapState::Ready);
    }

    #[test]
    fn transition_commits_error_from_loading() {
        let cell = BootstrapStateCell::default();
        cell.transition(BootstrapState::Error {
            message: "invalid token".to_string(),
        })
        .expect("loading -> error");
        assert_eq!(
            cell.snapshot(),
            BootstrapState::Error {
                message: "invalid token".to_string()
            }
        );
    }

    #[test]
    fn transition_out_of_loading_happens_at_most_once_per_run() {
        let cell = BootstrapStateCell::default();
        cell.transition(BootstrapState::Ready).expect("first commit");

        let second = cell.transition(BootstrapState::Error {
            message: "late failure".to_string(),
        });
        assert!(second.is_err());
        assert_eq!(cell.snapshot(), BootstrapState::Ready);
    }

    #[test]
    fn terminal_states_do_not_swap_without_reload() {
        let cell = BootstrapStateCell::default();
        cell.transition(BootstrapState::Error {
            message: "network down".to_string(),
        })
        .expect("loading -> error");

        assert!(cell.transition(BootstrapState::Ready).is_err());
        assert_eq!(
            cell.snapshot().phase_label(),
            "error",
            "error stays committed until a reload"
        );
    }

    #[test]
    fn transition_rejects_reentering_loading() {
        let cell = BootstrapStateCell::default();
        assert!(cell.transition(BootstrapState::Loading).is_err());
    }

    #[test]
    fn begin_run_resets_terminal_state_to_loading() {
        let cell = BootstrapStateCell::default();
        cell.transition(BootstrapState::Ready).expect("first run");

        cell.begin_run();
        assert_eq!(cell.snapshot(), BootstrapState::Loading);
        cell.transition(BootstrapState::Ready)
            .expect("fresh run accepts a new terminal state");
    }

    #[test]
    fn bootstrap_state_serializes_as_tagged_phase() {
        let ready = serde_json::to_value(BootstrapState::Ready).expect("serialize ready");
        assert_eq!(ready, serde_json::json!({ "phase": "ready" }));

        let error = serde_json::to_value(BootstrapState::Error {
            message: "network down".to_string(),
        })
        .expect("serialize error");
        assert_eq!(
            error,
            serde_json::json!({ "phase": "error", "message": "network down" })
        );
    }
}

//! Run state, progress events and cancellation.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "state")]
pub enum RunState {
    NotStarted,
    Running { step_index: usize },
    Completed,
    Aborted,
}

/// Progress event emitted during a run (cloneable for broadcast).
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisProgress {
    pub run_id: Uuid,
    pub state: RunState,
    /// Step name, or `None` for run-level events.
    pub step: Option<String>,
    pub steps_completed: usize,
    pub steps_total: usize,
    pub passed: usize,
    pub failed: usize,
    pub message: String,
}

impl AnalysisProgress {
    pub(crate) fn new(run_id: Uuid, state: RunState, steps_total: usize, message: impl Into<String>) -> Self {
        Self {
            run_id,
            state,
            step: None,
            steps_completed: 0,
            steps_total,
            passed: 0,
            failed: 0,
            message: message.into(),
        }
    }
}

/// Cooperative cancellation for one run. The runner only looks at it
/// between steps.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_clones_share_state() {
        let token = CancellationToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_run_state_serialises_with_tag() {
        let json = serde_json::to_string(&RunState::Running { step_index: 2 }).unwrap();
        assert_eq!(json, r#"{"state":"RUNNING","step_index":2}"#);
    }
}

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;

/// Lifecycle of the synthesis pipeline.
///
/// `Idle`: no session in progress. `Active`: a session is accepting text.
/// `Draining`: end-of-stream was requested and the worker is finalizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Active,
    Draining,
}

/// Tracks the pipeline state and fans transitions out to subscribers.
#[derive(Clone)]
pub struct StateTracker {
    state: Arc<RwLock<PipelineState>>,
    state_tx: Sender<PipelineState>,
    state_rx: Receiver<PipelineState>,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTracker {
    pub fn new() -> Self {
        let (state_tx, state_rx) = crossbeam_channel::unbounded();
        Self {
            state: Arc::new(RwLock::new(PipelineState::Idle)),
            state_tx,
            state_rx,
        }
    }

    /// Apply a transition. Identity transitions are allowed (a restart while
    /// `Active` re-enters `Active`); anything else outside the session
    /// lifecycle is rejected.
    pub fn transition(&self, new_state: PipelineState) -> Result<(), InvalidTransition> {
        use PipelineState::*;
        let mut current = self.state.write();

        let valid = matches!(
            (*current, new_state),
            (Idle, Idle)
                | (Idle, Active)
                | (Active, Active)
                | (Active, Draining)
                | (Active, Idle)
                | (Draining, Draining)
                | (Draining, Active)
                | (Draining, Idle)
        );

        if !valid {
            return Err(InvalidTransition {
                from: *current,
                to: new_state,
            });
        }

        if *current != new_state {
            tracing::debug!("Pipeline state: {:?} -> {:?}", *current, new_state);
        }
        *current = new_state;
        let _ = self.state_tx.send(new_state);
        Ok(())
    }

    pub fn current(&self) -> PipelineState {
        *self.state.read()
    }

    pub fn subscribe(&self) -> Receiver<PipelineState> {
        self.state_rx.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid pipeline state transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: PipelineState,
    pub to: PipelineState,
}

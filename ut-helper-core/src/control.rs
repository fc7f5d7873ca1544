// trigger controls - enabled/label/busy per action, released by a scoped guard

use crate::error::{WorkflowError, WorkflowResult};
use tokio::sync::watch;

/// what a front-end needs to draw a button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    /// the gating rule allows this action
    pub available: bool,
    /// a call started from this control has not settled yet
    pub busy: bool,
    /// available and not busy
    pub enabled: bool,
    pub label: String,
}

#[derive(Debug)]
pub struct Control {
    name: &'static str,
    idle_label: String,
    busy_label: Option<String>,
    state: watch::Sender<ControlState>,
}

impl Control {
    pub fn new(name: &'static str, idle_label: &str, available: bool) -> Self {
        let (state, _rx) = watch::channel(ControlState {
            available,
            busy: false,
            enabled: available,
            label: idle_label.to_string(),
        });
        Self {
            name,
            idle_label: idle_label.to_string(),
            busy_label: None,
            state,
        }
    }

    /// relabel the control while its call is in flight
    pub fn with_busy_label(mut self, label: &str) -> Self {
        self.busy_label = Some(label.to_string());
        self
    }

    /// take the control for one call. a second caller gets `Busy` until the guard drops
    pub fn try_acquire(&self) -> WorkflowResult<ControlGuard<'_>> {
        let mut acquired = false;
        self.state.send_if_modified(|state| {
            if state.busy {
                return false;
            }
            state.busy = true;
            state.enabled = false;
            if let Some(label) = &self.busy_label {
                state.label = label.clone();
            }
            acquired = true;
            true
        });

        if !acquired {
            return Err(WorkflowError::Busy(self.name));
        }
        tracing::debug!(control = self.name, "control acquired");
        Ok(ControlGuard { control: self })
    }

    pub fn set_available(&self, available: bool) {
        self.state.send_if_modified(|state| {
            let enabled = available && !state.busy;
            if state.available == available && state.enabled == enabled {
                return false;
            }
            state.available = available;
            state.enabled = enabled;
            true
        });
    }

    fn release(&self) {
        self.state.send_modify(|state| {
            state.busy = false;
            state.enabled = state.available;
            state.label = self.idle_label.clone();
        });
        tracing::debug!(control = self.name, "control released");
    }

    pub fn state(&self) -> ControlState {
        self.state.borrow().clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    pub fn subscribe(&self) -> watch::Receiver<ControlState> {
        self.state.subscribe()
    }
}

/// holds a control busy. dropping it restores the enabled state and label on
/// every exit path, including unwinding
#[derive(Debug)]
pub struct ControlGuard<'a> {
    control: &'a Control,
}

impl Drop for ControlGuard<'_> {
    fn drop(&mut self) {
        self.control.release();
    }
}

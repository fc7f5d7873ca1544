// status banner - one message at a time, success messages fade out

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    // bumped on every emission so a stale auto-hide never clears a newer status
    generation: u64,
    status: Option<Status>,
}

/// the single status line. emitting replaces whatever is showing
#[derive(Debug)]
pub struct StatusBanner {
    slot: Arc<watch::Sender<Slot>>,
    auto_hide: Duration,
}

impl StatusBanner {
    pub fn new(auto_hide: Duration) -> Self {
        let (tx, _rx) = watch::channel(Slot {
            generation: 0,
            status: None,
        });
        Self {
            slot: Arc::new(tx),
            auto_hide,
        }
    }

    pub fn show(&self, status: Status) {
        match status.kind {
            StatusKind::Error => tracing::warn!(message = %status.message, "status"),
            _ => tracing::info!(kind = ?status.kind, message = %status.message, "status"),
        }

        let fades = status.kind == StatusKind::Success;
        let mut generation = 0;
        self.slot.send_modify(|slot| {
            slot.generation += 1;
            slot.status = Some(status);
            generation = slot.generation;
        });

        if fades {
            self.schedule_hide(generation);
        }
    }

    fn schedule_hide(&self, generation: u64) {
        let Ok(handle) = Handle::try_current() else {
            tracing::debug!("no runtime available, success status will not auto-hide");
            return;
        };
        let slot = Arc::clone(&self.slot);
        let delay = self.auto_hide;
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            slot.send_if_modified(|slot| {
                if slot.generation == generation && slot.status.is_some() {
                    slot.status = None;
                    true
                } else {
                    false
                }
            });
        });
    }

    pub fn current(&self) -> Option<Status> {
        self.slot.borrow().status.clone()
    }

    pub fn subscribe(&self) -> StatusReceiver {
        StatusReceiver {
            rx: self.slot.subscribe(),
        }
    }
}

/// watch side of the banner for whoever renders it
#[derive(Debug, Clone)]
pub struct StatusReceiver {
    rx: watch::Receiver<Slot>,
}

impl StatusReceiver {
    pub fn current(&self) -> Option<Status> {
        self.rx.borrow().status.clone()
    }

    /// wait for the next emission or auto-hide. returns None once the banner is gone
    pub async fn changed(&mut self) -> Option<Option<Status>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().status.clone())
    }
}

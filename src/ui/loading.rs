use crate::event::AppEvent;
use std::sync::mpsc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time;

/// Reports the end of the loading skeleton for a view entry.
///
/// At most one timer runs at a time: scheduling a new ticket aborts the
/// previous task, and dropping the timer aborts whatever is pending.
pub struct LoadingTimer {
    runtime_handle: Handle,
    tx: mpsc::Sender<AppEvent>,
    duration: Duration,
    task: Option<JoinHandle<()>>,
}

impl LoadingTimer {
    pub fn new(runtime_handle: Handle, tx: mpsc::Sender<AppEvent>, duration: Duration) -> Self {
        Self {
            runtime_handle,
            tx,
            duration,
            task: None,
        }
    }

    pub fn schedule(&mut self, ticket: u64) {
        self.cancel();
        let tx = self.tx.clone();
        let duration = self.duration;
        self.task = Some(self.runtime_handle.spawn(async move {
            time::sleep(duration).await;
            let _ = tx.send(AppEvent::LoadingElapsed { ticket });
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for LoadingTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

//! Progress channel between a running migration and its caller
//!
//! One producer, one consumer, small bounded queue. The producer blocks when
//! the queue is full. Events arrive in plan order, at most one
//! [`ProgressEvent::Error`] is sent and it is always last, and the channel
//! closing is the only completion signal.

use crate::error::MigrateError;
use mg_core::MigrationFile;
use tokio::sync::mpsc;

/// Queue depth between executor and consumer
pub const CHANNEL_CAPACITY: usize = 8;

/// One message on the progress channel
#[derive(Debug)]
pub enum ProgressEvent {
    /// Free-form status text
    Info(String),
    /// A file was applied and its version recorded
    FileApplied(MigrationFile),
    /// The run failed; nothing follows
    Error(MigrateError),
}

/// Create a connected sender/receiver pair.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    (ProgressSender { tx }, ProgressReceiver { rx, failed: false })
}

/// Producer half, owned by the executor
#[derive(Debug)]
pub struct ProgressSender {
    tx: mpsc::Sender<ProgressEvent>,
}

impl ProgressSender {
    /// Send a status line. Returns false once the consumer has gone away.
    pub async fn info(&self, text: impl Into<String>) -> bool {
        self.tx.send(ProgressEvent::Info(text.into())).await.is_ok()
    }

    /// Report an applied file. Returns false once the consumer has gone away.
    pub async fn file_applied(&self, file: MigrationFile) -> bool {
        self.tx.send(ProgressEvent::FileApplied(file)).await.is_ok()
    }

    /// Send the terminal error and close the channel.
    pub async fn fail(self, err: MigrateError) {
        let _ = self.tx.send(ProgressEvent::Error(err)).await;
    }
}

/// Consumer half
#[derive(Debug)]
pub struct ProgressReceiver {
    rx: mpsc::Receiver<ProgressEvent>,
    failed: bool,
}

impl ProgressReceiver {
    /// Wait for the next event; `None` once the run is over.
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        let event = self.rx.recv().await;
        if matches!(event, Some(ProgressEvent::Error(_))) {
            self.failed = true;
        }
        event
    }

    /// Whether an error event has been received so far.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Consume every remaining event, returning true when none was an error.
    pub async fn drain(&mut self, mut on_event: impl FnMut(ProgressEvent)) -> bool {
        while let Some(event) = self.recv().await {
            on_event(event);
        }
        !self.failed
    }
}

#[cfg(test)]
#[path = "progress_test.rs"]
mod tests;

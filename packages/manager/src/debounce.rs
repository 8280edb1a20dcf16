//! # Debouncer
//!
//! Coalesces bursts of triggers into one delivery of the latest value.
//!
//! Each trigger restarts a quiet window; the sink runs once the window
//! passes without another trigger. The timer task is spawned on the current
//! Tokio runtime the first time it is needed and aborted when the debouncer
//! is dropped. Outside a runtime there is no timer, so values are delivered
//! immediately.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type Sink<T> = Arc<dyn Fn(T) + Send + Sync>;

pub struct Debouncer<T> {
    window: Duration,
    sink: Sink<T>,
    sender: Option<UnboundedSender<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(window: Duration, sink: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            window,
            sink: Arc::new(sink),
            sender: None,
            task: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule delivery of `value`, superseding anything still pending
    pub fn trigger(&mut self, value: T) {
        let value = match &self.sender {
            Some(sender) => match sender.send(value) {
                Ok(()) => return,
                Err(mpsc::error::SendError(value)) => value,
            },
            None => value,
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("No async runtime available, delivering without debounce");
                (self.sink)(value);
                return;
            }
        };

        let (sender, receiver) = mpsc::unbounded_channel();
        if let Err(mpsc::error::SendError(value)) = sender.send(value) {
            (self.sink)(value);
            return;
        }

        debug!(window = ?self.window, "Starting debounce task");
        self.task = Some(runtime.spawn(run(self.window, receiver, Arc::clone(&self.sink))));
        self.sender = Some(sender);
    }
}

async fn run<T>(window: Duration, mut receiver: UnboundedReceiver<T>, sink: Sink<T>) {
    while let Some(mut latest) = receiver.recv().await {
        loop {
            match tokio::time::timeout(window, receiver.recv()).await {
                Ok(Some(next)) => latest = next,
                Ok(None) | Err(_) => break,
            }
        }
        sink(latest);
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

//! Back-reference handed to renderers.
//!
//! Renderers run while the manager is in the middle of a switch, so they
//! cannot call into it directly. Requests made through the handle are
//! queued and executed by [`Manager::run_deferred`](crate::Manager::run_deferred)
//! once the current operation has returned.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::events::EventBus;
use crate::manager::ImportOptions;

/// A request queued by a renderer or listener
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    Import { text: String, options: ImportOptions },
    Open { element_id: String },
}

#[derive(Debug, Clone)]
pub struct ManagerHandle {
    sender: UnboundedSender<Deferred>,
    events: EventBus,
}

impl ManagerHandle {
    pub(crate) fn channel(events: EventBus) -> (Self, UnboundedReceiver<Deferred>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender, events }, receiver)
    }

    /// Queue an import; returns false if the manager is gone
    pub fn import(&self, text: impl Into<String>, options: ImportOptions) -> bool {
        self.send(Deferred::Import {
            text: text.into(),
            options,
        })
    }

    /// Queue a switch to the view of the element with this id
    pub fn open(&self, element_id: impl Into<String>) -> bool {
        self.send(Deferred::Open {
            element_id: element_id.into(),
        })
    }

    /// The manager's event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn send(&self, request: Deferred) -> bool {
        debug!(?request, "Queueing deferred request");
        self.sender.send(request).is_ok()
    }
}

//! # Life-Cycle Events
//!
//! Named, prioritized notifications fired around import and render phases.
//!
//! Listeners run synchronously in priority order (higher first, ties in
//! registration order). A listener may return a [`HookValue`] to influence
//! the phase that fired the event; when several do, the last one wins.
//!
//! The bus is cheap to clone and shared: the debounced `views.changed`
//! notification fires from a timer task, and renderers reach the bus through
//! their [`ManagerHandle`](crate::ManagerHandle).

use dmn_model::{DocumentTree, Element, ParseError, Warning};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::ManagerError;
use crate::host::HostNode;
use crate::renderer::RenderError;
use crate::view::View;

pub const DEFAULT_PRIORITY: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    ParseStart,
    ParseComplete,
    RenderStart,
    RenderComplete,
    ImportDone,
    ViewsChanged,
    Attach,
    Detach,
}

impl EventName {
    pub const ALL: [EventName; 8] = [
        EventName::ParseStart,
        EventName::ParseComplete,
        EventName::RenderStart,
        EventName::RenderComplete,
        EventName::ImportDone,
        EventName::ViewsChanged,
        EventName::Attach,
        EventName::Detach,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::ParseStart => "import.parse.start",
            EventName::ParseComplete => "import.parse.complete",
            EventName::RenderStart => "import.render.start",
            EventName::RenderComplete => "import.render.complete",
            EventName::ImportDone => "import.done",
            EventName::ViewsChanged => "views.changed",
            EventName::Attach => "attach",
            EventName::Detach => "detach",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown event: {0}")]
pub struct UnknownEvent(pub String);

impl FromStr for EventName {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

/// Extra information accompanying a finished parse
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub warnings: &'a [Warning],
}

/// Event payloads, borrowed from the phase that fires them
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    ParseStart {
        text: &'a str,
    },
    ParseComplete {
        error: Option<&'a ParseError>,
        document: Option<&'a DocumentTree>,
        context: ParseContext<'a>,
    },
    RenderStart {
        view: &'a View,
        element: &'a Arc<Element>,
    },
    RenderComplete {
        view: &'a View,
        error: Option<&'a RenderError>,
        warnings: &'a [Warning],
    },
    ImportDone {
        error: Option<&'a ManagerError>,
        warnings: &'a [Warning],
    },
    ViewsChanged {
        views: &'a [View],
        active_view: Option<&'a View>,
    },
    Attach {
        host: &'a HostNode,
    },
    Detach {
        host: &'a HostNode,
    },
}

impl Event<'_> {
    pub fn name(&self) -> EventName {
        match self {
            Event::ParseStart { .. } => EventName::ParseStart,
            Event::ParseComplete { .. } => EventName::ParseComplete,
            Event::RenderStart { .. } => EventName::RenderStart,
            Event::RenderComplete { .. } => EventName::RenderComplete,
            Event::ImportDone { .. } => EventName::ImportDone,
            Event::ViewsChanged { .. } => EventName::ViewsChanged,
            Event::Attach { .. } => EventName::Attach,
            Event::Detach { .. } => EventName::Detach,
        }
    }
}

/// Replacement values a listener can hand back
#[derive(Debug, Clone)]
pub enum HookValue {
    /// Replaces the text about to be parsed (`import.parse.start`)
    Text(String),

    /// Replaces the parsed document (`import.parse.complete`)
    Document(DocumentTree),
}

impl HookValue {
    pub fn kind(&self) -> &'static str {
        match self {
            HookValue::Text(_) => "text",
            HookValue::Document(_) => "document",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler = Arc<dyn Fn(&Event<'_>) -> Option<HookValue> + Send + Sync>;

struct Listener {
    id: ListenerId,
    priority: i32,
    once: bool,
    handler: Handler,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    by_name: HashMap<EventName, Vec<Listener>>,
}

#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<Listeners>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&self, name: EventName, handler: F) -> ListenerId
    where
        F: Fn(&Event<'_>) -> Option<HookValue> + Send + Sync + 'static,
    {
        self.add(name, DEFAULT_PRIORITY, false, Arc::new(handler))
    }

    pub fn on_with_priority<F>(&self, name: EventName, priority: i32, handler: F) -> ListenerId
    where
        F: Fn(&Event<'_>) -> Option<HookValue> + Send + Sync + 'static,
    {
        self.add(name, priority, false, Arc::new(handler))
    }

    /// Listen for the next occurrence only
    pub fn once<F>(&self, name: EventName, handler: F) -> ListenerId
    where
        F: Fn(&Event<'_>) -> Option<HookValue> + Send + Sync + 'static,
    {
        self.add(name, DEFAULT_PRIORITY, true, Arc::new(handler))
    }

    pub fn once_with_priority<F>(&self, name: EventName, priority: i32, handler: F) -> ListenerId
    where
        F: Fn(&Event<'_>) -> Option<HookValue> + Send + Sync + 'static,
    {
        self.add(name, priority, true, Arc::new(handler))
    }

    /// Remove a listener; returns whether it was registered
    pub fn off(&self, name: EventName, id: ListenerId) -> bool {
        let mut inner = self.inner.lock();
        match inner.by_name.get_mut(&name) {
            Some(listeners) => {
                let before = listeners.len();
                listeners.retain(|l| l.id != id);
                listeners.len() != before
            }
            None => false,
        }
    }

    pub fn listener_count(&self, name: EventName) -> usize {
        self.inner.lock().by_name.get(&name).map_or(0, Vec::len)
    }

    /// Run every listener for the event; returns the last non-empty hook value
    pub fn fire(&self, event: &Event<'_>) -> Option<HookValue> {
        let handlers: Vec<Handler> = {
            let mut inner = self.inner.lock();
            let Some(listeners) = inner.by_name.get_mut(&event.name()) else {
                return None;
            };
            let handlers = listeners.iter().map(|l| Arc::clone(&l.handler)).collect();
            listeners.retain(|l| !l.once);
            handlers
        };

        handlers
            .iter()
            .fold(None, |result, handler| handler(event).or(result))
    }

    fn add(&self, name: EventName, priority: i32, once: bool, handler: Handler) -> ListenerId {
        let mut inner = self.inner.lock();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;

        let listeners = inner.by_name.entry(name).or_default();
        let index = listeners
            .iter()
            .position(|l| l.priority < priority)
            .unwrap_or(listeners.len());
        listeners.insert(
            index,
            Listener {
                id,
                priority,
                once,
                handler,
            },
        );
        id
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        let counts: HashMap<&str, usize> = inner
            .by_name
            .iter()
            .map(|(name, listeners)| (name.as_str(), listeners.len()))
            .collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

//! # DMN View Manager
//!
//! Keeps one view of a DMN document on screen and hands rendering between
//! pluggable renderers as the active view or the document changes.
//!
//! ## Architecture
//!
//! ```text
//!                ┌──────────────────────── Manager ────────────────────────┐
//!   text ──▶ DocumentGateway ──▶ DocumentTree ──▶ resolve() ──▶ Vec<View>  │
//!                │                                                  │      │
//!                │                          ViewSwitcher ◀──────────┘      │
//!                │                          │  Idle / Attached             │
//!                │                          ▼                              │
//!                │                   RendererPool (one per provider)       │
//!                │                                                         │
//!                │  EventBus: parse.start/complete, render.start/complete, │
//!                │            import.done, views.changed (debounced)       │
//!                └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dmn_manager::{ImportOptions, Manager, ManagerOptions, ProviderRegistry};
//! use dmn_model::XmlGateway;
//!
//! let mut manager = Manager::new(Arc::new(XmlGateway), registry, ManagerOptions::default());
//! let warnings = manager.import_document(&xml, ImportOptions::default()).await?;
//! println!("{} views", manager.views().len());
//! ```

pub mod debounce;
pub mod errors;
pub mod events;
pub mod handle;
pub mod host;
pub mod manager;
pub mod notifier;
pub mod options;
pub mod pool;
pub mod registry;
pub mod renderer;
pub mod resolver;
pub mod switcher;
pub mod view;

pub use debounce::Debouncer;
pub use errors::{ImportError, ManagerError};
pub use events::{
    Event, EventBus, EventName, HookValue, ListenerId, ParseContext, UnknownEvent, DEFAULT_PRIORITY,
};
pub use handle::{Deferred, ManagerHandle};
pub use host::{Container, HostNode};
pub use manager::{ImportOptions, Manager};
pub use notifier::{ViewsChangedNotifier, ViewsSnapshot};
pub use options::{ContainerOptions, ManagerOptions, RendererOptions};
pub use pool::RendererPool;
pub use registry::{Opens, ProviderDescriptor, ProviderRegistry, RendererFactory};
pub use renderer::{Clear, Destroy, RenderError, Renderer, RendererConfig};
pub use resolver::{resolve, ActiveResolution, Resolution};
pub use switcher::{SwitchState, ViewSwitcher};
pub use view::View;

pub use dmn_model::{DocumentGateway, DocumentTree, Element, SerializeOptions, Warning};

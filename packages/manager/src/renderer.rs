//! # Renderer Contract
//!
//! What the manager needs from a view renderer. Attaching, detaching and
//! opening are mandatory; clearing and destroying are optional capabilities
//! a renderer advertises by returning itself from [`Renderer::clearable`] or
//! [`Renderer::destroyable`].

use async_trait::async_trait;
use dmn_model::{DocumentGateway, Element, Warning};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::handle::ManagerHandle;
use crate::host::Container;

/// Failure reported by a renderer, with any warnings it produced on the way
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
    pub warnings: Vec<Warning>,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<Warning>) -> Self {
        self.warnings = warnings;
        self
    }
}

#[async_trait]
pub trait Renderer: Send {
    /// Mount onto the manager's container
    fn attach_to(&mut self, container: &Container);

    /// Unmount from whatever container this renderer is attached to
    fn detach(&mut self);

    /// Display `element`
    async fn open(&mut self, element: Arc<Element>) -> Result<Vec<Warning>, RenderError>;

    fn clearable(&mut self) -> Option<&mut dyn Clear> {
        None
    }

    fn destroyable(&mut self) -> Option<&mut dyn Destroy> {
        None
    }
}

/// Drop whatever is currently displayed, keeping internal state
pub trait Clear {
    fn clear(&mut self);
}

/// Release everything the renderer holds; called once when the manager goes away
pub trait Destroy {
    fn destroy(&mut self);
}

/// Everything a provider's factory receives when its renderer is created
#[derive(Clone)]
pub struct RendererConfig {
    pub provider_id: String,

    /// Common settings overlaid with provider-specific ones
    pub settings: Map<String, Value>,

    /// Extension modules, common ones first
    pub additional_modules: Vec<String>,

    /// Gateway used by the manager, for renderers that parse or serialize
    pub gateway: Arc<dyn DocumentGateway>,

    /// Back-reference for requesting imports and view switches
    pub parent: ManagerHandle,

    pub container_id: String,
}

impl std::fmt::Debug for RendererConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererConfig")
            .field("provider_id", &self.provider_id)
            .field("settings", &self.settings)
            .field("additional_modules", &self.additional_modules)
            .field("container_id", &self.container_id)
            .finish_non_exhaustive()
    }
}

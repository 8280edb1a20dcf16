//! Error types for the view manager

use dmn_model::{ParseError, SerializeError, Warning};
use thiserror::Error;

use crate::renderer::RenderError;

#[derive(Error, Debug, Clone)]
pub enum ManagerError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("no view to display")]
    NoView,

    #[error("no definitions loaded")]
    NoDocument,

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to create renderer for provider {provider}: {source}")]
    RendererInit {
        provider: String,
        #[source]
        source: RenderError,
    },

    #[error("{0}")]
    Serialize(#[from] SerializeError),

    #[error("No view for element {0}")]
    UnknownView(String),
}

/// Failed import, carrying every warning collected before the failure
#[derive(Error, Debug, Clone)]
#[error("{source}")]
pub struct ImportError {
    pub source: ManagerError,
    pub warnings: Vec<Warning>,
}

impl ImportError {
    pub fn new(source: ManagerError, warnings: Vec<Warning>) -> Self {
        Self { source, warnings }
    }
}

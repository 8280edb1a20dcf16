//! # Document Gateway
//!
//! Contract between the view manager and whatever turns text into a
//! [`DocumentTree`] and back. Both directions are asynchronous; errors are
//! returned as values and never panic.

use async_trait::async_trait;

use crate::{DocumentTree, ParseError, SerializeError, Warning};

/// Everything a parse produced, including partial results next to a fatal error
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    /// Parsed tree; may be present even when `error` is set
    pub document: Option<DocumentTree>,

    /// Non-fatal structural warnings
    pub warnings: Vec<Warning>,

    /// Fatal parse error, if any
    pub error: Option<ParseError>,
}

impl ParseOutput {
    pub fn ok(document: DocumentTree, warnings: Vec<Warning>) -> Self {
        Self {
            document: Some(document),
            warnings,
            error: None,
        }
    }

    pub fn failed(error: ParseError, document: Option<DocumentTree>, warnings: Vec<Warning>) -> Self {
        Self {
            document,
            warnings,
            error: Some(error),
        }
    }
}

/// Serialization switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Pretty-print with indentation
    pub format: bool,

    /// Emit the XML declaration header
    pub preamble: bool,
}

/// Parses and serializes documents
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    async fn parse(&self, text: &str) -> ParseOutput;

    async fn serialize(
        &self,
        document: &DocumentTree,
        options: SerializeOptions,
    ) -> Result<String, SerializeError>;
}

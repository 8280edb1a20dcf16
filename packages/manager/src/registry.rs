//! # View Provider Registry
//!
//! Static list of providers, each declaring which element type it opens
//! and how to build a renderer for it. Lookup is first-match-wins in
//! registration order.

use dmn_model::Element;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::renderer::{RenderError, Renderer, RendererConfig};

pub type RendererFactory =
    Arc<dyn Fn(RendererConfig) -> Result<Box<dyn Renderer>, RenderError> + Send + Sync>;

pub type ElementPredicate = Arc<dyn Fn(&Element) -> bool + Send + Sync>;

/// Which elements a provider can display
#[derive(Clone)]
pub enum Opens {
    /// Every element of this type
    Type(String),

    /// Elements of this type that also satisfy the predicate
    Matcher {
        type_tag: String,
        predicate: ElementPredicate,
    },
}

impl Opens {
    pub fn matching<F>(type_tag: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Element) -> bool + Send + Sync + 'static,
    {
        Self::Matcher {
            type_tag: type_tag.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn type_tag(&self) -> &str {
        match self {
            Opens::Type(tag) => tag,
            Opens::Matcher { type_tag, .. } => type_tag,
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Opens::Type(tag) => element.is(tag),
            Opens::Matcher {
                type_tag,
                predicate,
            } => element.is(type_tag) && predicate(element),
        }
    }
}

impl From<&str> for Opens {
    fn from(tag: &str) -> Self {
        Opens::Type(tag.to_string())
    }
}

impl From<String> for Opens {
    fn from(tag: String) -> Self {
        Opens::Type(tag)
    }
}

impl fmt::Debug for Opens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opens::Type(tag) => f.debug_tuple("Type").field(tag).finish(),
            Opens::Matcher { type_tag, .. } => {
                f.debug_struct("Matcher").field("type_tag", type_tag).finish_non_exhaustive()
            }
        }
    }
}

/// A renderer capability: identity, what it opens, and how to build it
pub struct ProviderDescriptor {
    pub id: String,
    pub opens: Opens,
    factory: RendererFactory,
}

impl ProviderDescriptor {
    pub fn new<F>(id: impl Into<String>, opens: impl Into<Opens>, factory: F) -> Self
    where
        F: Fn(RendererConfig) -> Result<Box<dyn Renderer>, RenderError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            opens: opens.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn create(&self, config: RendererConfig) -> Result<Box<dyn Renderer>, RenderError> {
        (self.factory)(config)
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("id", &self.id)
            .field("opens", &self.opens)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<ProviderDescriptor>>,
}

impl ProviderRegistry {
    /// Later registrations reusing an id are dropped: renderers are pooled
    /// per id, so one id must mean one factory.
    pub fn new(providers: Vec<ProviderDescriptor>) -> Self {
        let mut ids = HashSet::new();
        let mut tags = HashSet::new();
        let mut kept = Vec::with_capacity(providers.len());
        for provider in providers {
            if !ids.insert(provider.id.clone()) {
                warn!(provider = %provider.id, "Duplicate provider id, dropping later registration");
                continue;
            }
            if let Opens::Type(tag) = &provider.opens {
                if !tags.insert(tag.clone()) {
                    warn!(provider = %provider.id, opens = %tag, "Ambiguous provider, the first registration wins");
                }
            }
            kept.push(Arc::new(provider));
        }

        Self { providers: kept }
    }

    pub fn providers(&self) -> &[Arc<ProviderDescriptor>] {
        &self.providers
    }

    pub fn get(&self, id: &str) -> Option<&Arc<ProviderDescriptor>> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// First provider able to open `element`
    pub fn find_for(&self, element: &Element) -> Option<&Arc<ProviderDescriptor>> {
        self.providers.iter().find(|p| p.opens.matches(element))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

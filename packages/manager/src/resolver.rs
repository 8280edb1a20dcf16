//! # View Set Resolver
//!
//! Derives the displayable views from a document and decides what happens to
//! the active view when the document changes. Pure: it never touches
//! renderers.

use dmn_model::DocumentTree;
use std::sync::Arc;

use crate::registry::ProviderRegistry;
use crate::view::View;

/// Fate of the previously active view
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveResolution {
    /// There was no active view; the caller picks one if it wants to
    Unset,

    /// The active view still exists; use this instance, it points into the new tree
    Preserved(View),

    /// The active view is gone; this is the first view of the new set
    Replaced(View),

    /// The active view is gone and nothing can be displayed
    Cleared,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub views: Vec<View>,
    pub active: ActiveResolution,
}

impl Resolution {
    /// The view that should be active after this resolution
    pub fn active_view(&self) -> Option<&View> {
        match &self.active {
            ActiveResolution::Preserved(view) | ActiveResolution::Replaced(view) => Some(view),
            ActiveResolution::Unset | ActiveResolution::Cleared => None,
        }
    }
}

/// Compute the view set for `document` and re-resolve `previous` against it
pub fn resolve(
    document: Option<&DocumentTree>,
    registry: &ProviderRegistry,
    previous: Option<&View>,
) -> Resolution {
    let views: Vec<View> = document
        .map(|doc| {
            doc.candidates()
                .filter_map(|element| {
                    registry
                        .find_for(element)
                        .map(|provider| View::new(Arc::clone(element), Arc::clone(provider)))
                })
                .collect()
        })
        .unwrap_or_default();

    let active = match previous {
        None => ActiveResolution::Unset,
        Some(previous) => match views.iter().find(|view| *view == previous) {
            Some(view) => ActiveResolution::Preserved(view.clone()),
            None => match views.first() {
                Some(first) => ActiveResolution::Replaced(first.clone()),
                None => ActiveResolution::Cleared,
            },
        },
    };

    Resolution { views, active }
}

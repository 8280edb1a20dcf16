use dmn_model::Element;
use std::sync::Arc;

use crate::registry::ProviderDescriptor;

/// An element paired with the provider that displays it
#[derive(Debug, Clone)]
pub struct View {
    pub element: Arc<Element>,
    pub provider: Arc<ProviderDescriptor>,
}

impl View {
    pub fn new(element: Arc<Element>, provider: Arc<ProviderDescriptor>) -> Self {
        Self { element, provider }
    }

    pub fn element_id(&self) -> Option<&str> {
        self.element.id.as_deref()
    }

    pub fn provider_id(&self) -> &str {
        &self.provider.id
    }
}

/// Same element instance, or failing that, same element id. A re-parsed
/// document has new instances with the old ids, so a view survives reloads.
impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.element, &other.element) {
            return true;
        }
        matches!(
            (&self.element.id, &other.element.id),
            (Some(a), Some(b)) if a == b
        )
    }
}

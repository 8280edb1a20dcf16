//! # Renderer Pool
//!
//! One renderer per provider, created on first use and kept for the
//! lifetime of the manager. Switching views reuses the cached instance.

use dmn_model::DocumentGateway;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;

use crate::errors::ManagerError;
use crate::handle::ManagerHandle;
use crate::options::ManagerOptions;
use crate::registry::ProviderDescriptor;
use crate::renderer::{Renderer, RendererConfig};

/// Shared context merged into every renderer's configuration
pub(crate) struct RendererContext {
    pub gateway: Arc<dyn DocumentGateway>,
    pub parent: ManagerHandle,
    pub options: ManagerOptions,
}

impl RendererContext {
    fn config_for(&self, provider_id: &str) -> RendererConfig {
        let options = self.options.renderer_options(provider_id);
        RendererConfig {
            provider_id: provider_id.to_string(),
            settings: options.settings,
            additional_modules: options.additional_modules,
            gateway: Arc::clone(&self.gateway),
            parent: self.parent.clone(),
            container_id: self.options.container.id.clone(),
        }
    }
}

pub struct RendererPool {
    renderers: IndexMap<String, Box<dyn Renderer>>,
    context: RendererContext,
}

impl RendererPool {
    pub(crate) fn new(context: RendererContext) -> Self {
        Self {
            renderers: IndexMap::new(),
            context,
        }
    }

    /// Cached renderer for the provider, created through its factory if needed
    pub fn get_or_create(&mut self, provider: &ProviderDescriptor) -> Result<&mut Box<dyn Renderer>, ManagerError> {
        match self.renderers.entry(provider.id.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let config = self.context.config_for(&provider.id);
                let renderer = provider
                    .create(config)
                    .map_err(|source| ManagerError::RendererInit {
                        provider: provider.id.clone(),
                        source,
                    })?;
                debug!(provider = %provider.id, "Created renderer");
                Ok(entry.insert(renderer))
            }
        }
    }

    pub fn get(&self, provider_id: &str) -> Option<&dyn Renderer> {
        self.renderers.get(provider_id).map(|r| r.as_ref())
    }

    pub fn get_mut(&mut self, provider_id: &str) -> Option<&mut Box<dyn Renderer>> {
        self.renderers.get_mut(provider_id)
    }

    pub fn contains(&self, provider_id: &str) -> bool {
        self.renderers.contains_key(provider_id)
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Destroy every renderer that supports it, in creation order. The pool
    /// is empty afterwards, so a second call does nothing.
    pub fn teardown(&mut self) {
        for (provider_id, mut renderer) in self.renderers.drain(..) {
            if let Some(destroyable) = renderer.destroyable() {
                debug!(provider = %provider_id, "Destroying renderer");
                destroyable.destroy();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use crate::host::Container;
    use crate::renderer::{Destroy, RenderError};
    use async_trait::async_trait;
    use dmn_model::{Element, Warning, XmlGateway};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Probe {
        destroyed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Renderer for Probe {
        fn attach_to(&mut self, _container: &Container) {}

        fn detach(&mut self) {}

        async fn open(&mut self, _element: Arc<Element>) -> Result<Vec<Warning>, RenderError> {
            Ok(Vec::new())
        }

        fn destroyable(&mut self) -> Option<&mut dyn Destroy> {
            Some(self)
        }
    }

    impl Destroy for Probe {
        fn destroy(&mut self) {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn pool(options: ManagerOptions) -> RendererPool {
        let (parent, _receiver) = ManagerHandle::channel(EventBus::new());
        RendererPool::new(RendererContext {
            gateway: Arc::new(XmlGateway),
            parent,
            options,
        })
    }

    #[test]
    fn test_factory_runs_once_per_provider() {
        let created = Arc::new(AtomicUsize::new(0));
        let destroyed = Arc::new(AtomicUsize::new(0));
        let provider = {
            let created = Arc::clone(&created);
            let destroyed = Arc::clone(&destroyed);
            ProviderDescriptor::new("drd", "dmn:Definitions", move |_| {
                created.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(Probe {
                    destroyed: Arc::clone(&destroyed),
                }) as Box<dyn Renderer>)
            })
        };

        let mut pool = pool(ManagerOptions::default());
        pool.get_or_create(&provider).unwrap();
        pool.get_or_create(&provider).unwrap();

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert_eq!(pool.len(), 1);

        pool.teardown();
        pool.teardown();
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_factory_receives_merged_options() {
        let mut options: ManagerOptions = serde_json::from_value(json!({
            "common": { "settings": { "keyboard": true }, "additionalModules": ["common"] },
            "providers": { "drd": { "settings": { "grid": 10 }, "additionalModules": ["drd-only"] } },
            "container": { "id": "host" }
        }))
        .unwrap();
        options.views_changed_debounce_ms = 5;

        let seen = Arc::new(Mutex::new(None));
        let provider = {
            let seen = Arc::clone(&seen);
            ProviderDescriptor::new("drd", "dmn:Definitions", move |config: RendererConfig| {
                *seen.lock() = Some((config.settings, config.additional_modules, config.container_id));
                Ok(Box::new(Probe {
                    destroyed: Arc::new(AtomicUsize::new(0)),
                }) as Box<dyn Renderer>)
            })
        };

        let mut pool = pool(options);
        pool.get_or_create(&provider).unwrap();

        let (settings, modules, container) = seen.lock().clone().unwrap();
        assert_eq!(settings.get("keyboard"), Some(&json!(true)));
        assert_eq!(settings.get("grid"), Some(&json!(10)));
        assert_eq!(modules, vec!["common", "drd-only"]);
        assert_eq!(container, "host");
    }

    #[test]
    fn test_failing_factory_is_reported_and_not_cached() {
        let provider = ProviderDescriptor::new("broken", "dmn:Definitions", |_| Err(RenderError::new("boom")));
        let mut pool = pool(ManagerOptions::default());

        let err = pool.get_or_create(&provider).err().unwrap();
        assert!(matches!(err, ManagerError::RendererInit { ref provider, .. } if provider == "broken"));
        assert!(!pool.contains("broken"));
    }
}

//! # Manager
//!
//! The orchestrator. Owns the installed document, the current view set and
//! the switcher, and drives them through the import pipeline:
//!
//! ```text
//! parse.start ─▶ gateway.parse ─▶ parse.complete ─▶ install ─▶ switch ─▶ import.done
//!   (hook: text)                    (hook: document)  (resolve)  (render.start/complete)
//! ```
//!
//! Every state-changing operation takes `&mut self`, so imports and switches
//! on one manager never overlap. Renderers that want to trigger one queue it
//! through their [`ManagerHandle`] instead.

use dmn_model::{DocumentGateway, DocumentTree, Element, ParseOutput, SerializeOptions, Warning};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, instrument, warn};

use crate::errors::{ImportError, ManagerError};
use crate::events::{Event, EventBus, EventName, HookValue, ListenerId, ParseContext};
use crate::handle::{Deferred, ManagerHandle};
use crate::host::{Container, HostNode};
use crate::notifier::ViewsChangedNotifier;
use crate::options::ManagerOptions;
use crate::pool::{RendererContext, RendererPool};
use crate::registry::ProviderRegistry;
use crate::renderer::Renderer;
use crate::resolver::{resolve, ActiveResolution};
use crate::switcher::ViewSwitcher;
use crate::view::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Open a view once the document is installed
    pub open: bool,
}

impl ImportOptions {
    /// Install the document without displaying anything
    pub fn install_only() -> Self {
        Self { open: false }
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { open: true }
    }
}

pub struct Manager {
    gateway: Arc<dyn DocumentGateway>,
    registry: ProviderRegistry,
    events: EventBus,
    notifier: ViewsChangedNotifier,
    switcher: ViewSwitcher,
    container: Container,
    document: Option<DocumentTree>,
    views: Vec<View>,
    handle: ManagerHandle,
    deferred: UnboundedReceiver<Deferred>,
    destroyed: bool,
}

impl Manager {
    pub fn new(
        gateway: Arc<dyn DocumentGateway>,
        registry: ProviderRegistry,
        options: ManagerOptions,
    ) -> Self {
        let events = EventBus::new();
        let (handle, deferred) = ManagerHandle::channel(events.clone());
        let notifier = ViewsChangedNotifier::new(events.clone(), options.debounce_window());
        let container = Container::new(&options.container);

        let pool = RendererPool::new(RendererContext {
            gateway: Arc::clone(&gateway),
            parent: handle.clone(),
            options,
        });

        Self {
            gateway,
            registry,
            events,
            notifier,
            switcher: ViewSwitcher::new(pool),
            container,
            document: None,
            views: Vec::new(),
            handle,
            deferred,
            destroyed: false,
        }
    }

    /// Parse `text`, install the result and, unless told otherwise, display
    /// the active (or first) view.
    ///
    /// The document is installed even when parsing fails. Warnings from
    /// parsing and rendering are returned together, on success and inside
    /// the [`ImportError`] alike.
    #[instrument(skip_all, fields(bytes = text.len(), open = options.open))]
    pub async fn import_document(
        &mut self,
        text: &str,
        options: ImportOptions,
    ) -> Result<Vec<Warning>, ImportError> {
        info!("Importing document");

        let replacement = match self.events.fire(&Event::ParseStart { text }) {
            Some(HookValue::Text(replacement)) => {
                debug!("Listener replaced the import text");
                Some(replacement)
            }
            Some(other) => {
                warn!(kind = other.kind(), event = %EventName::ParseStart, "Ignoring hook value");
                None
            }
            None => None,
        };
        let text = replacement.as_deref().unwrap_or(text);

        let ParseOutput {
            document,
            mut warnings,
            error,
        } = self.gateway.parse(text).await;

        let hook = self.events.fire(&Event::ParseComplete {
            error: error.as_ref(),
            document: document.as_ref(),
            context: ParseContext {
                warnings: &warnings,
            },
        });
        let document = match hook {
            Some(HookValue::Document(replacement)) => {
                debug!("Listener replaced the parsed document");
                Some(replacement)
            }
            Some(other) => {
                warn!(kind = other.kind(), event = %EventName::ParseComplete, "Ignoring hook value");
                document
            }
            None => document,
        };

        for warning in &warnings {
            warn!(%warning, "Structural warning");
        }

        self.install(document);

        if let Some(error) = error {
            return self.finish_import(Some(ManagerError::Parse(error.refine())), warnings);
        }
        if !options.open {
            return self.finish_import(None, warnings);
        }

        let Some(view) = self
            .switcher
            .active_view()
            .or_else(|| self.views.first())
            .cloned()
        else {
            return self.finish_import(Some(ManagerError::NoView), warnings);
        };

        let error = match self.switch_view(Some(view)).await {
            Ok(render_warnings) => {
                warnings.extend(render_warnings);
                None
            }
            Err(ManagerError::Render(error)) => {
                warnings.extend(error.warnings.iter().cloned());
                Some(ManagerError::Render(error))
            }
            Err(error) => Some(error),
        };

        self.finish_import(error, warnings)
    }

    /// Serialize the installed document
    pub async fn export_document(&self, options: SerializeOptions) -> Result<String, ManagerError> {
        let document = self.document.as_ref().ok_or(ManagerError::NoDocument)?;
        Ok(self.gateway.serialize(document, options).await?)
    }

    /// The installed document, if any
    pub fn document(&self) -> Option<&DocumentTree> {
        self.document.as_ref()
    }

    pub fn active_view(&self) -> Option<&View> {
        self.switcher.active_view()
    }

    pub fn active_renderer(&self) -> Option<&dyn Renderer> {
        self.switcher.active_renderer()
    }

    /// The view showing this exact element instance
    pub fn view(&self, element: &Arc<Element>) -> Option<&View> {
        self.views
            .iter()
            .find(|view| Arc::ptr_eq(&view.element, element))
    }

    pub fn view_by_id(&self, element_id: &str) -> Option<&View> {
        self.views
            .iter()
            .find(|view| view.element_id() == Some(element_id))
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Display `view`. It must belong to the current view set; the set's own
    /// instance is used, so a view kept from before a reload opens the
    /// reloaded element.
    pub async fn open(&mut self, view: &View) -> Result<Vec<Warning>, ManagerError> {
        let view = self
            .views
            .iter()
            .find(|candidate| *candidate == view)
            .cloned()
            .ok_or_else(|| {
                ManagerError::UnknownView(view.element_id().unwrap_or(view.element.label()).to_string())
            })?;
        self.switch_view(Some(view)).await
    }

    pub async fn open_by_id(&mut self, element_id: &str) -> Result<Vec<Warning>, ManagerError> {
        let view = self
            .view_by_id(element_id)
            .cloned()
            .ok_or_else(|| ManagerError::UnknownView(element_id.to_string()))?;
        self.switch_view(Some(view)).await
    }

    pub fn on<F>(&self, name: EventName, handler: F) -> ListenerId
    where
        F: Fn(&Event<'_>) -> Option<HookValue> + Send + Sync + 'static,
    {
        self.events.on(name, handler)
    }

    pub fn on_with_priority<F>(&self, name: EventName, priority: i32, handler: F) -> ListenerId
    where
        F: Fn(&Event<'_>) -> Option<HookValue> + Send + Sync + 'static,
    {
        self.events.on_with_priority(name, priority, handler)
    }

    pub fn once<F>(&self, name: EventName, handler: F) -> ListenerId
    where
        F: Fn(&Event<'_>) -> Option<HookValue> + Send + Sync + 'static,
    {
        self.events.once(name, handler)
    }

    pub fn off(&self, name: EventName, id: ListenerId) -> bool {
        self.events.off(name, id)
    }

    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    /// Mount the container on `node`, leaving any previous host first
    pub fn attach_to_host(&mut self, node: HostNode) {
        self.detach_from_host();

        debug!(host = node.id(), "Attaching to host");
        self.container.mount(node);
        if let Some(host) = self.container.parent() {
            self.events.fire(&Event::Attach { host });
        }
    }

    pub fn detach_from_host(&mut self) {
        let Some(host) = self.container.parent().cloned() else {
            return;
        };

        debug!(host = host.id(), "Detaching from host");
        self.events.fire(&Event::Detach { host: &host });
        self.container.unmount();
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Handle for queueing work from inside renderers and listeners
    pub fn handle(&self) -> ManagerHandle {
        self.handle.clone()
    }

    /// Run queued requests in order, including any queued while running
    pub async fn run_deferred(&mut self) -> Vec<Result<Vec<Warning>, ManagerError>> {
        let mut results = Vec::new();
        while let Ok(request) = self.deferred.try_recv() {
            debug!(?request, "Running deferred request");
            let result = match request {
                Deferred::Import { text, options } => self
                    .import_document(&text, options)
                    .await
                    .map_err(|error| error.source),
                Deferred::Open { element_id } => self.open_by_id(&element_id).await,
            };
            results.push(result);
        }
        results
    }

    /// Leave the host and destroy every renderer
    pub fn destroy(mut self) {
        self.teardown();
    }

    fn install(&mut self, document: Option<DocumentTree>) {
        let previous = self.switcher.active_view().cloned();
        let resolution = resolve(document.as_ref(), &self.registry, previous.as_ref());

        debug!(views = resolution.views.len(), "Installed document");
        self.document = document;
        self.views = resolution.views;

        match resolution.active {
            ActiveResolution::Unset => {}
            ActiveResolution::Preserved(view) => self.switcher.adopt(view),
            ActiveResolution::Replaced(_) | ActiveResolution::Cleared => {
                debug!("Active view removed");
                self.switcher.deactivate();
            }
        }

        self.notify_views_changed();
    }

    async fn switch_view(&mut self, view: Option<View>) -> Result<Vec<Warning>, ManagerError> {
        let result = self
            .switcher
            .switch_to(view, &self.container, &self.events)
            .await;
        self.notify_views_changed();
        result
    }

    fn notify_views_changed(&mut self) {
        self.notifier
            .notify(&self.views, self.switcher.active_view());
    }

    fn finish_import(
        &self,
        error: Option<ManagerError>,
        warnings: Vec<Warning>,
    ) -> Result<Vec<Warning>, ImportError> {
        self.events.fire(&Event::ImportDone {
            error: error.as_ref(),
            warnings: &warnings,
        });

        match error {
            Some(error) => {
                warn!(%error, warnings = warnings.len(), "Import failed");
                Err(ImportError::new(error, warnings))
            }
            None => {
                info!(warnings = warnings.len(), "Import done");
                Ok(warnings)
            }
        }
    }

    fn teardown(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        info!("Destroying manager");
        self.detach_from_host();
        self.switcher.teardown();
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        self.teardown();
    }
}

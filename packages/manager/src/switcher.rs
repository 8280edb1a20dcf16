//! # View Switcher
//!
//! Two states: `Idle` (nothing attached) and `Attached` (one view, backed by
//! its provider's pooled renderer). Switching between views of the same
//! provider keeps the renderer attached and only re-opens the element; a
//! provider change clears and detaches the old renderer before the new one
//! is attached.

use dmn_model::Warning;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::errors::ManagerError;
use crate::events::{Event, EventBus};
use crate::host::Container;
use crate::pool::RendererPool;
use crate::renderer::Renderer;
use crate::view::View;

#[derive(Debug, Clone, Default)]
pub enum SwitchState {
    #[default]
    Idle,
    Attached {
        view: View,
        /// Provider whose renderer is attached to the container
        renderer: String,
    },
}

pub struct ViewSwitcher {
    state: SwitchState,
    pool: RendererPool,
}

impl ViewSwitcher {
    pub(crate) fn new(pool: RendererPool) -> Self {
        Self {
            state: SwitchState::Idle,
            pool,
        }
    }

    pub fn state(&self) -> &SwitchState {
        &self.state
    }

    pub fn active_view(&self) -> Option<&View> {
        match &self.state {
            SwitchState::Attached { view, .. } => Some(view),
            SwitchState::Idle => None,
        }
    }

    pub fn active_renderer(&self) -> Option<&dyn Renderer> {
        self.attached_provider()
            .and_then(|provider_id| self.pool.get(provider_id))
    }

    fn attached_provider(&self) -> Option<&str> {
        match &self.state {
            SwitchState::Attached { renderer, .. } => Some(renderer),
            SwitchState::Idle => None,
        }
    }

    pub fn pool(&self) -> &RendererPool {
        &self.pool
    }

    /// Swap in an equivalent view from a re-resolved set. The attached
    /// renderer is left alone, even when the new view belongs to another
    /// provider; the next switch hands over or re-opens.
    pub(crate) fn adopt(&mut self, view: View) {
        if let SwitchState::Attached { view: current, .. } = &mut self.state {
            *current = view;
        }
    }

    /// Clear and detach the active renderer, if any, and go idle
    pub fn deactivate(&mut self) {
        if let SwitchState::Attached { renderer, .. } = std::mem::take(&mut self.state) {
            debug!(provider = %renderer, "Deactivating view");
            self.release(&renderer);
        }
    }

    /// Show `requested`, or go idle when it is `None`.
    ///
    /// The view stays active even when the renderer fails to open it.
    #[instrument(
        skip_all,
        fields(
            provider = requested.as_ref().map(|v| v.provider_id()),
            element = requested.as_ref().and_then(|v| v.element_id()),
        )
    )]
    pub async fn switch_to(
        &mut self,
        requested: Option<View>,
        container: &Container,
        events: &EventBus,
    ) -> Result<Vec<Warning>, ManagerError> {
        let Some(view) = requested else {
            self.deactivate();
            return Ok(Vec::new());
        };

        let previous = self.attached_provider().map(str::to_string);
        let reuse = previous.as_deref() == Some(view.provider_id());

        // Create first: a failing factory must leave the current view in place
        self.pool.get_or_create(&view.provider)?;

        if !reuse {
            if let Some(previous) = &previous {
                self.release(previous);
            }
        }

        self.state = SwitchState::Attached {
            view: view.clone(),
            renderer: view.provider_id().to_string(),
        };

        let renderer = self.pool.get_or_create(&view.provider)?;
        if !reuse {
            debug!("Attaching renderer");
            renderer.attach_to(container);
        }

        events.fire(&Event::RenderStart {
            view: &view,
            element: &view.element,
        });

        let result = renderer.open(Arc::clone(&view.element)).await;

        let (error, warnings) = match &result {
            Ok(warnings) => (None, warnings.as_slice()),
            Err(error) => (Some(error), error.warnings.as_slice()),
        };
        events.fire(&Event::RenderComplete {
            view: &view,
            error,
            warnings,
        });

        result.map_err(ManagerError::Render)
    }

    /// Destroy every pooled renderer
    pub fn teardown(&mut self) {
        self.state = SwitchState::Idle;
        self.pool.teardown();
    }

    fn release(&mut self, provider_id: &str) {
        if let Some(renderer) = self.pool.get_mut(provider_id) {
            if let Some(clearable) = renderer.clearable() {
                clearable.clear();
            }
            renderer.detach();
        }
    }
}

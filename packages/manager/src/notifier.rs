use std::time::Duration;
use tracing::debug;

use crate::debounce::Debouncer;
use crate::events::{Event, EventBus};
use crate::view::View;

/// State carried by a `views.changed` notification
#[derive(Debug, Clone)]
pub struct ViewsSnapshot {
    pub views: Vec<View>,
    pub active_view: Option<View>,
}

/// Fires `views.changed` once per burst of view-set or active-view changes
pub struct ViewsChangedNotifier {
    debouncer: Debouncer<ViewsSnapshot>,
}

impl ViewsChangedNotifier {
    pub fn new(events: EventBus, window: Duration) -> Self {
        let debouncer = Debouncer::new(window, move |snapshot: ViewsSnapshot| {
            debug!(
                views = snapshot.views.len(),
                active = snapshot.active_view.as_ref().and_then(|v| v.element_id()),
                "Views changed"
            );
            events.fire(&Event::ViewsChanged {
                views: &snapshot.views,
                active_view: snapshot.active_view.as_ref(),
            });
        });

        Self { debouncer }
    }

    pub fn notify(&mut self, views: &[View], active_view: Option<&View>) {
        self.debouncer.trigger(ViewsSnapshot {
            views: views.to_vec(),
            active_view: active_view.cloned(),
        });
    }
}

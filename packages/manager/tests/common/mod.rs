//! Shared fixtures for manager integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use dmn_manager::{
    Clear, Container, Destroy, EventName, Manager, ManagerOptions, Opens, ProviderDescriptor,
    ProviderRegistry, RenderError, Renderer,
};
use dmn_model::{Element, Warning, XmlGateway};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub type CallLog = Arc<Mutex<Vec<String>>>;

/// One decision table, one literal expression, one input
pub const TWO_DECISIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions id="defs" name="Dish" namespace="http://camunda.org/schema/1.0/dmn">
  <decision id="season" name="Season">
    <decisionTable id="seasonTable"/>
  </decision>
  <inputData id="temperature" name="Temperature"/>
  <decision id="dish" name="Dish">
    <literalExpression id="dishExpression"><text>"Stew"</text></literalExpression>
  </decision>
</definitions>"#;

/// Same document without the `dish` decision
pub const WITHOUT_DISH: &str = r#"<definitions id="defs" name="Dish">
  <decision id="season" name="Season">
    <decisionTable id="seasonTable"/>
  </decision>
</definitions>"#;

/// Two decisions rendered by the same provider
pub const TWO_TABLES: &str = r#"<definitions id="defs">
  <decision id="season"><decisionTable/></decision>
  <decision id="guests"><decisionTable/></decision>
</definitions>"#;

/// Renderer that writes every call to a shared log as `provider.call`.
/// Elements carrying a `broken` attribute fail to open.
pub struct MockRenderer {
    provider: String,
    log: CallLog,
}

#[async_trait]
impl Renderer for MockRenderer {
    fn attach_to(&mut self, container: &Container) {
        self.record(format!("attach({})", container.id()));
    }

    fn detach(&mut self) {
        self.record("detach".to_string());
    }

    async fn open(&mut self, element: Arc<Element>) -> Result<Vec<Warning>, RenderError> {
        let id = element.id.clone().unwrap_or_default();
        self.record(format!("open({id})"));

        if element.attribute("broken").is_some() {
            return Err(RenderError::new(format!("cannot render {id}"))
                .with_warnings(vec![Warning::new("partially rendered").with_element(id)]));
        }
        Ok(Vec::new())
    }

    fn clearable(&mut self) -> Option<&mut dyn Clear> {
        Some(self)
    }

    fn destroyable(&mut self) -> Option<&mut dyn Destroy> {
        Some(self)
    }
}

impl Clear for MockRenderer {
    fn clear(&mut self) {
        self.record("clear".to_string());
    }
}

impl Destroy for MockRenderer {
    fn destroy(&mut self) {
        self.record("destroy".to_string());
    }
}

impl MockRenderer {
    fn record(&self, call: String) {
        self.log.lock().push(format!("{}.{}", self.provider, call));
    }
}

/// Registry of mock renderers plus the logs they write to
#[derive(Default)]
pub struct Harness {
    calls: CallLog,
    created: Arc<Mutex<HashMap<String, usize>>>,
    events: CallLog,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> ProviderRegistry {
        ProviderRegistry::new(vec![
            self.provider("drd", Opens::from("dmn:Definitions")),
            self.provider(
                "decisionTable",
                Opens::matching("dmn:Decision", |e| e.child_of_type("dmn:DecisionTable").is_some()),
            ),
            self.provider(
                "literalExpression",
                Opens::matching("dmn:Decision", |e| {
                    e.child_of_type("dmn:LiteralExpression").is_some()
                }),
            ),
        ])
    }

    pub fn manager(&self) -> Manager {
        self.manager_with(ManagerOptions::default())
    }

    pub fn manager_with(&self, options: ManagerOptions) -> Manager {
        Manager::new(Arc::new(XmlGateway::new()), self.registry(), options)
    }

    /// Record the name of every life-cycle event the manager fires
    pub fn record_events(&self, manager: &Manager) {
        for name in EventName::ALL {
            let events = Arc::clone(&self.events);
            manager.on(name, move |event| {
                events.lock().push(event.name().to_string());
                None
            });
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().clear();
    }

    pub fn created(&self, provider: &str) -> usize {
        self.created.lock().get(provider).copied().unwrap_or(0)
    }

    fn provider(&self, id: &'static str, opens: Opens) -> ProviderDescriptor {
        let calls = Arc::clone(&self.calls);
        let created = Arc::clone(&self.created);
        ProviderDescriptor::new(id, opens, move |config| {
            *created.lock().entry(config.provider_id.clone()).or_insert(0) += 1;
            Ok(Box::new(MockRenderer {
                provider: id.to_string(),
                log: Arc::clone(&calls),
            }) as Box<dyn Renderer>)
        })
    }
}

/// Element id of each view, in order
pub fn view_ids(manager: &Manager) -> Vec<String> {
    manager
        .views()
        .iter()
        .map(|v| v.element_id().unwrap_or_default().to_string())
        .collect()
}

pub fn active_id(manager: &Manager) -> Option<String> {
    manager
        .active_view()
        .and_then(|v| v.element_id())
        .map(str::to_string)
}

//! Plain-text renderers for the command line.
//!
//! Each renderer writes what it displays to a shared [`Transcript`], which
//! the running command drains and prints after every operation.

use async_trait::async_trait;
use dmn_manager::{
    Clear, Container, Destroy, Opens, ProviderDescriptor, ProviderRegistry, RenderError, Renderer,
    RendererConfig,
};
use dmn_model::{Element, Warning};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Lines written by renderers, in display order
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }

    fn extend(&self, lines: Vec<String>) {
        self.lines.lock().extend(lines);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Drd,
    DecisionTable,
    LiteralExpression,
}

/// Providers for the diagram and the two decision logic views
pub fn registry(transcript: &Transcript) -> ProviderRegistry {
    ProviderRegistry::new(vec![
        provider("drd", Opens::from("dmn:Definitions"), Kind::Drd, transcript),
        provider(
            "decisionTable",
            Opens::matching("dmn:Decision", |e| e.child_of_type("dmn:DecisionTable").is_some()),
            Kind::DecisionTable,
            transcript,
        ),
        provider(
            "literalExpression",
            Opens::matching("dmn:Decision", |e| e.child_of_type("dmn:LiteralExpression").is_some()),
            Kind::LiteralExpression,
            transcript,
        ),
    ])
}

fn provider(id: &str, opens: Opens, kind: Kind, transcript: &Transcript) -> ProviderDescriptor {
    let transcript = transcript.clone();
    ProviderDescriptor::new(id, opens, move |config: RendererConfig| {
        Ok(Box::new(TextRenderer::new(kind, &config, transcript.clone())) as Box<dyn Renderer>)
    })
}

struct TextRenderer {
    kind: Kind,
    transcript: Transcript,
    show_ids: bool,
    container: Option<String>,
    shown: Option<String>,
}

impl TextRenderer {
    fn new(kind: Kind, config: &RendererConfig, transcript: Transcript) -> Self {
        let show_ids = config
            .settings
            .get("showIds")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        debug!(provider = %config.provider_id, show_ids, "Created text renderer");

        Self {
            kind,
            transcript,
            show_ids,
            container: None,
            shown: None,
        }
    }

    fn name(&self, element: &Element) -> String {
        match (&element.name, &element.id) {
            (Some(name), Some(id)) if self.show_ids => format!("{name} ({id})"),
            _ => element.label().to_string(),
        }
    }

    fn render(&self, element: &Element) -> Result<(Vec<String>, Vec<Warning>), RenderError> {
        match self.kind {
            Kind::Drd => Ok(self.render_drd(element)),
            Kind::DecisionTable => self.render_table(element),
            Kind::LiteralExpression => self.render_literal(element),
        }
    }

    fn render_drd(&self, definitions: &Element) -> (Vec<String>, Vec<Warning>) {
        let mut lines = vec![format!("Definitions: {}", self.name(definitions))];
        let mut warnings = Vec::new();

        for child in &definitions.children {
            let kind = child.type_tag.trim_start_matches("dmn:");
            lines.push(format!("  {kind:<24} {}", self.name(child)));

            for requirement in child.children.iter().filter(|c| c.type_tag.ends_with("Requirement")) {
                for reference in &requirement.children {
                    match reference.attribute("href") {
                        Some(href) => lines.push(format!("    requires {}", href.trim_start_matches('#'))),
                        None => warnings.push(
                            Warning::new("requirement without href")
                                .with_element(child.id.clone().unwrap_or_default()),
                        ),
                    }
                }
            }
        }

        (lines, warnings)
    }

    fn render_table(&self, decision: &Element) -> Result<(Vec<String>, Vec<Warning>), RenderError> {
        let table = decision
            .child_of_type("dmn:DecisionTable")
            .ok_or_else(|| RenderError::new(format!("{} has no decision table", decision.label())))?;

        let inputs: Vec<String> = table
            .children
            .iter()
            .filter(|c| c.is("dmn:InputClause"))
            .map(|input| {
                input
                    .attribute("label")
                    .map(str::to_string)
                    .or_else(|| {
                        input
                            .child_of_type("dmn:LiteralExpression")
                            .and_then(|e| text_of(e))
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| input.label().to_string())
            })
            .collect();
        let outputs: Vec<String> = table
            .children
            .iter()
            .filter(|c| c.is("dmn:OutputClause"))
            .map(|output| {
                output
                    .attribute("label")
                    .or(output.attribute("name"))
                    .unwrap_or(output.label())
                    .to_string()
            })
            .collect();

        let hit_policy = table.attribute("hitPolicy").unwrap_or("UNIQUE");
        let mut lines = vec![
            format!("Decision: {} [{hit_policy}]", self.name(decision)),
            format!("  | {} || {} |", inputs.join(" | "), outputs.join(" | ")),
        ];

        let rules: Vec<&Arc<Element>> = table.children.iter().filter(|c| c.is("dmn:DecisionRule")).collect();
        for (index, rule) in rules.iter().enumerate() {
            lines.push(format!(
                "{:>3}| {} || {} |",
                index + 1,
                entries(rule, "inputEntry").join(" | "),
                entries(rule, "outputEntry").join(" | ")
            ));
        }

        let mut warnings = Vec::new();
        if rules.is_empty() {
            warnings.push(
                Warning::new("decision table has no rules")
                    .with_element(table.id.clone().or(decision.id.clone()).unwrap_or_default()),
            );
        }

        Ok((lines, warnings))
    }

    fn render_literal(&self, decision: &Element) -> Result<(Vec<String>, Vec<Warning>), RenderError> {
        let expression = decision
            .child_of_type("dmn:LiteralExpression")
            .ok_or_else(|| RenderError::new(format!("{} has no literal expression", decision.label())))?;

        let mut lines = vec![format!("Decision: {}", self.name(decision))];
        let mut warnings = Vec::new();
        match text_of(expression) {
            Some(text) => lines.push(format!("  = {text}")),
            None => warnings.push(
                Warning::new("literal expression is empty")
                    .with_element(expression.id.clone().or(decision.id.clone()).unwrap_or_default()),
            ),
        }
        Ok((lines, warnings))
    }
}

fn entries<'a>(rule: &'a Element, tag: &str) -> Vec<&'a str> {
    rule.children
        .iter()
        .filter(|c| c.tag.ends_with(tag))
        .map(|entry| text_of(entry).unwrap_or("-"))
        .collect()
}

fn text_of(element: &Element) -> Option<&str> {
    element
        .child_of_type("dmn:Text")
        .and_then(|t| t.text.as_deref())
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl Renderer for TextRenderer {
    fn attach_to(&mut self, container: &Container) {
        self.container = Some(container.id().to_string());
    }

    fn detach(&mut self) {
        self.container = None;
    }

    async fn open(&mut self, element: Arc<Element>) -> Result<Vec<Warning>, RenderError> {
        if self.container.is_none() {
            return Err(RenderError::new("renderer is not attached"));
        }

        let (lines, warnings) = self.render(&element)?;
        self.transcript.extend(lines);
        self.shown = element.id.clone();
        Ok(warnings)
    }

    fn clearable(&mut self) -> Option<&mut dyn Clear> {
        Some(self)
    }

    fn destroyable(&mut self) -> Option<&mut dyn Destroy> {
        Some(self)
    }
}

impl Clear for TextRenderer {
    fn clear(&mut self) {
        self.shown = None;
    }
}

impl Destroy for TextRenderer {
    fn destroy(&mut self) {
        debug!(kind = ?self.kind, shown = self.shown.as_deref(), "Destroying text renderer");
        self.container = None;
        self.shown = None;
    }
}

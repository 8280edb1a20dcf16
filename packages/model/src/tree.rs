//! # Document Tree
//!
//! In-memory representation of a parsed DMN document.
//!
//! The tree is immutable once built. Elements are shared through `Arc`, so
//! a view can hold on to the element it displays while the tree itself is
//! owned by the manager. Every successful import replaces the whole tree;
//! a re-parse produces fresh `Arc`s that keep their `id`s.

use std::sync::Arc;

/// A single node of the document tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Stable identifier (`id` attribute), if the element has one
    pub id: Option<String>,

    /// Normalized node type, e.g. `dmn:Decision`
    pub type_tag: String,

    /// Human readable name (`name` attribute)
    pub name: Option<String>,

    /// Qualified XML name as it appeared in the source
    pub tag: String,

    /// All attributes in source order, including namespace declarations
    pub attributes: Vec<(String, String)>,

    /// Trimmed text content
    pub text: Option<String>,

    /// Child elements in document order
    pub children: Vec<Arc<Element>>,
}

impl Element {
    /// Start building an element of the given type
    pub fn builder(type_tag: impl Into<String>) -> ElementBuilder {
        ElementBuilder::new(type_tag)
    }

    /// Whether this element is of the given type
    pub fn is(&self, type_tag: &str) -> bool {
        self.type_tag == type_tag
    }

    /// Look up an attribute by its qualified name
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child of the given type
    pub fn child_of_type(&self, type_tag: &str) -> Option<&Arc<Element>> {
        self.children.iter().find(|c| c.is(type_tag))
    }

    /// Label used in logs and listings: name, then id, then type
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or(&self.type_tag)
    }

    fn find(self: &Arc<Self>, id: &str) -> Option<Arc<Element>> {
        if self.id.as_deref() == Some(id) {
            return Some(Arc::clone(self));
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(|c| c.count()).sum::<usize>()
    }
}

/// Incremental constructor for [`Element`]
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    element: Element,
}

impl ElementBuilder {
    pub fn new(type_tag: impl Into<String>) -> Self {
        let type_tag = type_tag.into();
        let tag = type_tag
            .split_once(':')
            .map(|(_, local)| lower_first(local))
            .unwrap_or_else(|| type_tag.clone());

        Self {
            element: Element {
                id: None,
                type_tag,
                name: None,
                tag,
                attributes: Vec::new(),
                text: None,
                children: Vec::new(),
            },
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.set_attribute("id", &id);
        self.element.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.set_attribute("name", &name);
        self.element.name = Some(name);
        self
    }

    /// Override the qualified XML name (defaults to the local part of the type tag)
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.element.tag = tag.into();
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            "id" => self.id(value),
            "name" => self.name(value),
            _ => {
                self.set_attribute(&key, &value);
                self
            }
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.element.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: impl Into<Arc<Element>>) -> Self {
        self.element.children.push(child.into());
        self
    }

    pub(crate) fn push_child(&mut self, child: Arc<Element>) {
        self.element.children.push(child);
    }

    pub(crate) fn append_text(&mut self, text: &str) {
        match &mut self.element.text {
            Some(existing) => existing.push_str(text),
            None => self.element.text = Some(text.to_string()),
        }
    }

    pub fn build(self) -> Arc<Element> {
        Arc::new(self.element)
    }

    fn set_attribute(&mut self, key: &str, value: &str) {
        match self.element.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self
                .element
                .attributes
                .push((key.to_string(), value.to_string())),
        }
    }
}

impl From<ElementBuilder> for Arc<Element> {
    fn from(builder: ElementBuilder) -> Self {
        builder.build()
    }
}

/// Parsed document: a root element plus everything reachable from it
#[derive(Debug, Clone)]
pub struct DocumentTree {
    root: Arc<Element>,
}

impl DocumentTree {
    pub fn new(root: Arc<Element>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Arc<Element> {
        &self.root
    }

    /// Direct children of the root in document order
    pub fn children(&self) -> &[Arc<Element>] {
        &self.root.children
    }

    /// Elements that may be displayed as views: the root, then its children
    pub fn candidates(&self) -> impl Iterator<Item = &Arc<Element>> {
        std::iter::once(&self.root).chain(self.root.children.iter())
    }

    /// Depth-first search for an element by id
    pub fn find_by_id(&self, id: &str) -> Option<Arc<Element>> {
        self.root.find(id)
    }

    pub fn element_count(&self) -> usize {
        self.root.count()
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentTree {
        let root = Element::builder("dmn:Definitions")
            .id("defs")
            .child(
                Element::builder("dmn:Decision")
                    .id("dish")
                    .name("Dish")
                    .child(Element::builder("dmn:DecisionTable").id("table")),
            )
            .child(Element::builder("dmn:InputData").id("season"))
            .build();
        DocumentTree::new(root)
    }

    #[test]
    fn test_candidates_are_root_then_children() {
        let tree = sample();
        let ids: Vec<_> = tree
            .candidates()
            .map(|e| e.id.clone().unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["defs", "dish", "season"]);
    }

    #[test]
    fn test_find_by_id_descends() {
        let tree = sample();
        let table = tree.find_by_id("table").expect("nested element");
        assert!(table.is("dmn:DecisionTable"));
        assert!(tree.find_by_id("missing").is_none());
        assert_eq!(tree.element_count(), 4);
    }

    #[test]
    fn test_builder_derives_tag_and_attributes() {
        let el = Element::builder("dmn:InputData").id("i1").name("Season").build();
        assert_eq!(el.tag, "inputData");
        assert_eq!(el.attribute("id"), Some("i1"));
        assert_eq!(el.attribute("name"), Some("Season"));
        assert_eq!(el.label(), "Season");
    }
}

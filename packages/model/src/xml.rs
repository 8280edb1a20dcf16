//! # XML Gateway
//!
//! Reference [`DocumentGateway`] for DMN 1.1 style XML.
//!
//! Reading is lenient where the format allows it: unknown elements are
//! reported as warnings and skipped, duplicate ids are reported and kept.
//! Only a wrong root element, malformed XML, or empty input are fatal, and
//! even then whatever was built before the failure is handed back.

use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::gateway::{DocumentGateway, ParseOutput, SerializeOptions};
use crate::schema::{self, ROOT_ELEMENT};
use crate::serializer;
use crate::tree::{DocumentTree, Element, ElementBuilder};
use crate::{ParseError, SerializeError, Warning};

/// Parses and serializes DMN XML
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlGateway;

impl XmlGateway {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous parse, used by the async gateway implementation
    #[instrument(skip_all, fields(bytes = text.len()))]
    pub fn parse_str(&self, text: &str) -> ParseOutput {
        let output = read_document(text);
        debug!(
            elements = output.document.as_ref().map_or(0, |d| d.element_count()),
            warnings = output.warnings.len(),
            failed = output.error.is_some(),
            "Parsed document"
        );
        output
    }

    /// Synchronous serialize, used by the async gateway implementation
    pub fn to_xml(&self, document: &DocumentTree, options: SerializeOptions) -> Result<String, SerializeError> {
        serializer::write_document(document, options)
    }
}

#[async_trait]
impl DocumentGateway for XmlGateway {
    async fn parse(&self, text: &str) -> ParseOutput {
        self.parse_str(text)
    }

    async fn serialize(
        &self,
        document: &DocumentTree,
        options: SerializeOptions,
    ) -> Result<String, SerializeError> {
        self.to_xml(document, options)
    }
}

/// Element under construction
struct Frame {
    builder: ElementBuilder,
    /// Children are foreign extension content and accepted as-is
    extension: bool,
    tag: String,
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    root: Option<Arc<Element>>,
    skip_depth: usize,
    warnings: Vec<Warning>,
    seen_ids: HashSet<String>,
}

impl TreeBuilder {
    fn open(&mut self, text: &str, start: &BytesStart<'_>, offset: usize) -> Result<(), ParseError> {
        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return Ok(());
        }

        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let parent_extension = self.stack.last().map(|frame| frame.extension);
        let (type_tag, extension) = match parent_extension {
            None if self.root.is_some() => {
                let (line, column) = position(text, offset);
                self.warn_skipped(
                    Warning::new(format!("unexpected content <{tag}> after root element"))
                        .with_position(line, column),
                );
                return Ok(());
            }
            None if local != ROOT_ELEMENT => {
                let (line, column) = position(text, offset);
                return Err(ParseError::unparsable(
                    &tag,
                    line,
                    column,
                    format!("unrecognized element <{tag}>"),
                ));
            }
            Some(true) => (format!("ext:{local}"), true),
            _ => match schema::type_tag_for(&local) {
                Some(type_tag) => (type_tag.to_string(), schema::is_extension_container(&local)),
                None => {
                    let (line, column) = position(text, offset);
                    self.warn_skipped(
                        Warning::new(format!("unparsable content <{tag}> detected"))
                            .with_position(line, column),
                    );
                    return Ok(());
                }
            },
        };

        let mut builder = ElementBuilder::new(type_tag).tag(tag.clone());
        for attr in start.attributes() {
            let attr = attr.map_err(|e| {
                let (line, column) = position(text, offset);
                ParseError::at(format!("invalid attribute on <{tag}>: {e}"), line, column)
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| {
                let (line, column) = position(text, offset);
                ParseError::at(format!("invalid attribute value on <{tag}>: {e}"), line, column)
            })?;

            if key == "id" && !self.seen_ids.insert(value.to_string()) {
                let (line, column) = position(text, offset);
                let warning = Warning::new(format!("duplicate ID <{value}>"))
                    .with_element(value.to_string())
                    .with_position(line, column);
                warn!(%warning, "Structural warning");
                self.warnings.push(warning);
            }
            builder = builder.attribute(key, value.into_owned());
        }

        self.stack.push(Frame {
            builder,
            extension,
            tag,
        });
        Ok(())
    }

    fn close(&mut self) {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return;
        }
        if let Some(frame) = self.stack.pop() {
            self.attach(frame.builder.build());
        }
    }

    fn text(&mut self, content: &str) {
        if self.skip_depth > 0 || content.is_empty() {
            return;
        }
        if let Some(frame) = self.stack.last_mut() {
            frame.builder.append_text(content);
        }
    }

    fn attach(&mut self, element: Arc<Element>) {
        match self.stack.last_mut() {
            Some(parent) => parent.builder.push_child(element),
            None => self.root = Some(element),
        }
    }

    fn warn_skipped(&mut self, warning: Warning) {
        warn!(%warning, "Skipping element");
        self.warnings.push(warning);
        self.skip_depth = 1;
    }

    /// Close everything still open so the partial tree can be returned
    fn fail(mut self, error: ParseError) -> ParseOutput {
        while let Some(frame) = self.stack.pop() {
            self.attach(frame.builder.build());
        }
        ParseOutput::failed(error, self.root.map(DocumentTree::new), self.warnings)
    }

    fn finish(self, text: &str) -> ParseOutput {
        if let Some(open) = self.stack.last() {
            let (line, column) = position(text, text.len());
            let error = ParseError::at(
                format!("unexpected end of file: unclosed element <{}>", open.tag),
                line,
                column,
            );
            return self.fail(error);
        }
        match self.root {
            Some(root) => ParseOutput::ok(DocumentTree::new(root), self.warnings),
            None => ParseOutput::failed(ParseError::new("no root element found"), None, self.warnings),
        }
    }
}

fn read_document(text: &str) -> ParseOutput {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut builder = TreeBuilder::default();

    loop {
        let offset = reader.buffer_position() as usize;
        let result = match reader.read_event() {
            Ok(Event::Start(start)) => builder.open(text, &start, offset),
            Ok(Event::Empty(start)) => builder.open(text, &start, offset).map(|_| builder.close()),
            Ok(Event::End(_)) => {
                builder.close();
                Ok(())
            }
            Ok(Event::Text(content)) => match content.unescape() {
                Ok(content) => {
                    builder.text(&content);
                    Ok(())
                }
                Err(e) => {
                    let (line, column) = position(text, offset);
                    Err(ParseError::at(format!("invalid text content: {e}"), line, column))
                }
            },
            Ok(Event::CData(data)) => {
                builder.text(&String::from_utf8_lossy(&data.into_inner()));
                Ok(())
            }
            Ok(Event::Eof) => break,
            Ok(_) => Ok(()),
            Err(e) => {
                let (line, column) = position(text, reader.buffer_position() as usize);
                Err(ParseError::at(e.to_string(), line, column))
            }
        };

        if let Err(error) = result {
            return builder.fail(error);
        }
    }

    builder.finish(text)
}

/// Zero-based line and column of a byte offset
fn position(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = &text.as_bytes()[..offset];
    let line = before.iter().filter(|b| **b == b'\n').count();
    let line_start = before.iter().rposition(|b| *b == b'\n').map_or(0, |i| i + 1);
    (line, offset - line_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISH: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="http://www.omg.org/spec/DMN/20151101/dmn.xsd" id="dish" name="Dish">
  <decision id="season" name="Season">
    <decisionTable id="seasonTable">
      <input id="in1" label="Weather">
        <inputExpression id="expr1" typeRef="string"><text>weather</text></inputExpression>
      </input>
      <output id="out1" name="season" typeRef="string" />
    </decisionTable>
  </decision>
  <inputData id="weather" name="Weather" />
</definitions>"#;

    #[test]
    fn test_parse_builds_tree() {
        let output = XmlGateway.parse_str(DISH);
        assert!(output.error.is_none(), "unexpected error: {:?}", output.error);
        assert!(output.warnings.is_empty());

        let doc = output.document.expect("document");
        assert!(doc.root().is("dmn:Definitions"));
        assert_eq!(doc.root().name.as_deref(), Some("Dish"));
        assert_eq!(doc.children().len(), 2);

        let text = doc.find_by_id("expr1").and_then(|e| e.children.first().cloned());
        assert_eq!(text.and_then(|t| t.text.clone()).as_deref(), Some("weather"));
    }

    #[test]
    fn test_wrong_root_is_unparsable() {
        let output = XmlGateway.parse_str("<Foo><bar/></Foo>");
        let error = output.error.expect("fatal error");
        assert!(error.message.starts_with("unparsable content <Foo> detected"));
        assert!(error.message.contains("unrecognized element <Foo>"));
        assert!(output.document.is_none());
    }

    #[test]
    fn test_unknown_elements_warn_and_skip() {
        let xml = r#"<definitions id="d"><decision id="a"><shape><nested/></shape></decision></definitions>"#;
        let output = XmlGateway.parse_str(xml);
        assert!(output.error.is_none());
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].message, "unparsable content <shape> detected");

        let doc = output.document.expect("document");
        let decision = doc.find_by_id("a").expect("decision");
        assert!(decision.children.is_empty());
    }

    #[test]
    fn test_duplicate_ids_warn() {
        let xml = r#"<definitions id="d"><decision id="a"/><inputData id="a"/></definitions>"#;
        let output = XmlGateway.parse_str(xml);
        assert!(output.error.is_none());
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].element_id.as_deref(), Some("a"));
        assert_eq!(output.document.expect("document").children().len(), 2);
    }

    #[test]
    fn test_extension_elements_are_kept() {
        let xml = r#"<definitions id="d"><extensionElements><camunda:meta key="x"><camunda:inner/></camunda:meta></extensionElements></definitions>"#;
        let output = XmlGateway.parse_str(xml);
        assert!(output.warnings.is_empty());

        let doc = output.document.expect("document");
        let ext = doc.root().child_of_type("dmn:ExtensionElements").expect("extension container");
        assert_eq!(ext.children[0].type_tag, "ext:meta");
        assert_eq!(ext.children[0].tag, "camunda:meta");
        assert_eq!(ext.children[0].children[0].type_tag, "ext:inner");
    }

    #[test]
    fn test_malformed_xml_keeps_partial_tree() {
        let xml = "<definitions id=\"d\">\n  <decision id=\"a\"></inputData>\n</definitions>";
        let output = XmlGateway.parse_str(xml);
        assert!(output.error.is_some());

        let doc = output.document.expect("partial document");
        assert_eq!(doc.root().id.as_deref(), Some("d"));
        assert!(doc.find_by_id("a").is_some());
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let output = XmlGateway.parse_str("   ");
        assert_eq!(output.error.map(|e| e.message).as_deref(), Some("no root element found"));
    }

    #[test]
    fn test_position_is_zero_based() {
        assert_eq!(position("ab\ncd", 4), (1, 1));
        assert_eq!(position("ab", 0), (0, 0));
    }
}

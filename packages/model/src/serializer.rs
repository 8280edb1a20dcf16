//! Document tree → XML text.
//!
//! Elements are written back with the qualified names they were read with and
//! attributes in source order. Whitespace is normalized: either none at all
//! or two-space indentation when formatting is requested.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use crate::gateway::SerializeOptions;
use crate::tree::{DocumentTree, Element};
use crate::SerializeError;

pub fn write_document(document: &DocumentTree, options: SerializeOptions) -> Result<String, SerializeError> {
    let mut writer = if options.format {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    } else {
        Writer::new(Vec::new())
    };

    if options.preamble {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_error)?;
    }

    write_element(&mut writer, document.root())?;

    String::from_utf8(writer.into_inner()).map_err(|e| SerializeError::new(e.to_string()))
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<(), SerializeError> {
    let start = BytesStart::new(element.tag.as_str())
        .with_attributes(element.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    if element.children.is_empty() && element.text.is_none() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_error)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.tag.as_str())))
        .map_err(write_error)
}

fn write_error(e: impl std::fmt::Display) -> SerializeError {
    SerializeError::new(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XmlGateway;

    fn tree() -> DocumentTree {
        DocumentTree::new(
            Element::builder("dmn:Definitions")
                .tag("definitions")
                .attribute("xmlns", "http://www.omg.org/spec/DMN/20151101/dmn.xsd")
                .id("defs")
                .child(
                    Element::builder("dmn:Decision").id("d1").name("Fish & Chips").child(
                        Element::builder("dmn:LiteralExpression")
                            .id("le")
                            .child(Element::builder("dmn:Text").text("a < b")),
                    ),
                )
                .build(),
        )
    }

    #[test]
    fn test_compact_output() {
        let xml = write_document(&tree(), SerializeOptions::default()).unwrap();
        assert_eq!(
            xml,
            "<definitions xmlns=\"http://www.omg.org/spec/DMN/20151101/dmn.xsd\" id=\"defs\">\
             <decision id=\"d1\" name=\"Fish &amp; Chips\">\
             <literalExpression id=\"le\"><text>a &lt; b</text></literalExpression>\
             </decision></definitions>"
        );
    }

    #[test]
    fn test_preamble_and_format() {
        let options = SerializeOptions {
            format: true,
            preamble: true,
        };
        let xml = write_document(&tree(), options).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("\n  <decision"));
    }

    #[test]
    fn test_output_parses_back_to_same_tree() {
        let xml = write_document(&tree(), SerializeOptions::default()).unwrap();
        let reparsed = XmlGateway.parse_str(&xml);
        assert!(reparsed.error.is_none());
        assert_eq!(reparsed.document.unwrap().root(), tree().root());
    }
}

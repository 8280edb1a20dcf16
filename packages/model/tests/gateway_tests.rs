//! The XML gateway through its async `DocumentGateway` interface

use dmn_model::{DocumentGateway, SerializeOptions, XmlGateway};
use std::sync::Arc;

const DISH: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="http://www.omg.org/spec/DMN/20151101/dmn.xsd" id="dish" name="Dish">
  <decision id="season" name="Season">
    <decisionTable id="seasonTable">
      <input id="temp" label="Weather in Celsius">
        <inputExpression id="tempExpr" typeRef="integer"><text>temperature</text></inputExpression>
      </input>
      <output id="out" name="season" typeRef="string"/>
      <rule id="r1">
        <inputEntry id="r1in"><text>&gt;30</text></inputEntry>
        <outputEntry id="r1out"><text>"Summer"</text></outputEntry>
      </rule>
    </decisionTable>
  </decision>
  <inputData id="temperature" name="Weather in Celsius">
    <variable id="tempVar" name="temperature" typeRef="integer"/>
  </inputData>
</definitions>"#;

#[tokio::test]
async fn test_parse_through_trait_object() {
    let gateway: Arc<dyn DocumentGateway> = Arc::new(XmlGateway::new());
    let output = gateway.parse(DISH).await;

    assert!(output.error.is_none(), "{:?}", output.error);
    assert!(output.warnings.is_empty(), "{:?}", output.warnings);

    let document = output.document.unwrap();
    let types: Vec<_> = document.candidates().map(|e| e.type_tag.as_str()).collect();
    assert_eq!(types, vec!["dmn:Definitions", "dmn:Decision", "dmn:InputData"]);

    let entry = document.find_by_id("r1in").unwrap();
    let text = entry.child_of_type("dmn:Text").unwrap();
    assert_eq!(text.text.as_deref(), Some(">30"));
}

#[tokio::test]
async fn test_serialize_then_parse_keeps_structure() {
    let gateway = XmlGateway::new();
    let document = gateway.parse(DISH).await.document.unwrap();

    let xml = gateway
        .serialize(
            &document,
            SerializeOptions {
                format: true,
                preamble: false,
            },
        )
        .await
        .unwrap();
    assert!(!xml.starts_with("<?xml"));
    assert!(xml.contains("&gt;30"));

    let reparsed = gateway.parse(&xml).await.document.unwrap();
    assert_eq!(reparsed.element_count(), document.element_count());
    assert_eq!(reparsed.root().as_ref(), document.root().as_ref());
}

#[tokio::test]
async fn test_truncated_input_returns_partial_tree() {
    let gateway = XmlGateway::new();
    let output = gateway
        .parse(r#"<definitions id="d"><decision id="a"><decisionTable id="t">"#)
        .await;

    assert!(output.error.is_some());

    let document = output.document.unwrap();
    assert_eq!(document.root().id.as_deref(), Some("d"));
    assert!(document.find_by_id("t").is_some());
}

//! Known DMN element names and the type tags they map to.

/// Local element name → type tag
const ELEMENTS: &[(&str, &str)] = &[
    ("definitions", "dmn:Definitions"),
    ("decision", "dmn:Decision"),
    ("inputData", "dmn:InputData"),
    ("businessKnowledgeModel", "dmn:BusinessKnowledgeModel"),
    ("knowledgeSource", "dmn:KnowledgeSource"),
    ("itemDefinition", "dmn:ItemDefinition"),
    ("textAnnotation", "dmn:TextAnnotation"),
    ("association", "dmn:Association"),
    ("decisionTable", "dmn:DecisionTable"),
    ("literalExpression", "dmn:LiteralExpression"),
    ("context", "dmn:Context"),
    ("invocation", "dmn:Invocation"),
    ("input", "dmn:InputClause"),
    ("output", "dmn:OutputClause"),
    ("inputExpression", "dmn:LiteralExpression"),
    ("inputValues", "dmn:UnaryTests"),
    ("outputValues", "dmn:UnaryTests"),
    ("rule", "dmn:DecisionRule"),
    ("inputEntry", "dmn:UnaryTests"),
    ("outputEntry", "dmn:LiteralExpression"),
    ("text", "dmn:Text"),
    ("variable", "dmn:InformationItem"),
    ("parameter", "dmn:InformationItem"),
    ("encapsulatedLogic", "dmn:FunctionDefinition"),
    ("informationRequirement", "dmn:InformationRequirement"),
    ("knowledgeRequirement", "dmn:KnowledgeRequirement"),
    ("authorityRequirement", "dmn:AuthorityRequirement"),
    ("requiredInput", "dmn:DMNElementReference"),
    ("requiredDecision", "dmn:DMNElementReference"),
    ("requiredKnowledge", "dmn:DMNElementReference"),
    ("requiredAuthority", "dmn:DMNElementReference"),
    ("sourceRef", "dmn:DMNElementReference"),
    ("targetRef", "dmn:DMNElementReference"),
    ("typeRef", "dmn:Text"),
    ("allowedValues", "dmn:UnaryTests"),
    ("question", "dmn:Text"),
    ("allowedAnswers", "dmn:Text"),
    ("description", "dmn:Description"),
    ("extensionElements", "dmn:ExtensionElements"),
];

/// Name the document root must carry
pub const ROOT_ELEMENT: &str = "definitions";

/// Type tag for a local element name, if the name is part of the schema
pub fn type_tag_for(local_name: &str) -> Option<&'static str> {
    ELEMENTS
        .iter()
        .find(|(name, _)| *name == local_name)
        .map(|(_, tag)| *tag)
}

/// Children of `extensionElements` belong to foreign vocabularies and are kept as-is
pub fn is_extension_container(local_name: &str) -> bool {
    local_name == "extensionElements"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names() {
        assert_eq!(type_tag_for("definitions"), Some("dmn:Definitions"));
        assert_eq!(type_tag_for("decisionTable"), Some("dmn:DecisionTable"));
        assert_eq!(type_tag_for("Decision"), None);
        assert_eq!(type_tag_for("shape"), None);
    }
}

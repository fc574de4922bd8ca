//! Re-parses emitted Java with tree-sitter as a syntax check.

use serde::Serialize;
use tree_sitter::{Node, Parser};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub package: Option<String>,
    /// Type header up to the body, whitespace-normalized.
    pub declaration: String,
    pub members: usize,
    pub has_errors: bool,
}

pub fn check_source(source: &str) -> Option<SourceSummary> {
    if source.trim().is_empty() {
        return None;
    }

    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_java::LANGUAGE.into()).ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let bytes = source.as_bytes();

    let mut summary = SourceSummary {
        package: None,
        declaration: String::new(),
        members: 0,
        has_errors: root.has_error(),
    };

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "package_declaration" => {
                let mut inner = child.walk();
                summary.package = child
                    .children(&mut inner)
                    .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))
                    .map(|c| node_text(&c, bytes).to_string());
            }
            "class_declaration" | "interface_declaration" | "annotation_type_declaration" => {
                summary.declaration = header(&child, bytes);
                summary.members = find_body(&child).map_or(0, |body| count_members(&body));
            }
            _ => {}
        }
    }

    Some(summary)
}

fn header(node: &Node, source: &[u8]) -> String {
    let mut parts = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if is_body(child.kind()) {
            break;
        }
        parts.push(normalize_whitespace(node_text(&child, source)));
    }
    parts.join(" ")
}

fn is_body(kind: &str) -> bool {
    matches!(kind, "class_body" | "interface_body" | "annotation_type_body")
}

fn find_body<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| is_body(c.kind()))
}

fn count_members(body: &Node) -> usize {
    let mut cursor = body.walk();
    body.children(&mut cursor)
        .filter(|c| {
            matches!(
                c.kind(),
                "field_declaration"
                    | "constant_declaration"
                    | "method_declaration"
                    | "constructor_declaration"
                    | "static_initializer"
                    | "annotation_type_element_declaration"
            )
        })
        .count()
}

fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

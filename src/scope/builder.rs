//! Builds a [`Scope`] tree from a tree-sitter JavaScript syntax tree.

use super::{Association, Binding, Scope, ScopeKind, ScopeNode};
use crate::parsing::SyntaxTree;
use crate::types::TokenValue;
use tree_sitter::Node;

/// Deepest syntax nesting descended into; deeper subtrees are skipped.
pub const MAX_DEPTH: usize = 1024;

pub(super) fn build(tree: &SyntaxTree) -> Scope {
    let root_node = tree.root_node();
    let mut root = Scope::new(ScopeKind::Global, None, root_node.byte_range().into());
    let mut builder = ScopeBuilder {
        code: tree.source(),
        depth_exceeded: false,
    };
    builder.visit_children(root_node, &mut root, 0);
    root
}

struct ScopeBuilder<'a> {
    code: &'a str,
    depth_exceeded: bool,
}

impl<'a> ScopeBuilder<'a> {
    fn text(&self, node: Node<'_>) -> &'a str {
        &self.code[node.byte_range()]
    }

    fn record(&self, node: Node<'_>) -> ScopeNode {
        ScopeNode {
            name: self.text(node).to_string(),
            value: None,
            range: node.byte_range().into(),
        }
    }

    fn binding(&self, node: Node<'_>) -> Binding {
        Binding {
            name: self.text(node).to_string(),
            range: node.byte_range().into(),
        }
    }

    fn visit_children(&mut self, node: Node<'_>, scope: &mut Scope, depth: usize) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child, scope, depth + 1);
        }
    }

    fn visit(&mut self, node: Node<'_>, scope: &mut Scope, depth: usize) {
        if depth > MAX_DEPTH {
            if !self.depth_exceeded {
                tracing::warn!(
                    "[scope] nesting deeper than {MAX_DEPTH} at byte {}; subtree skipped",
                    node.start_byte()
                );
                self.depth_exceeded = true;
            }
            return;
        }
        // Zero-width tokens inserted by error recovery have no source text.
        if !node.is_named() || node.is_missing() {
            return;
        }

        match node.kind() {
            "comment" => {}
            "identifier"
            | "shorthand_property_identifier"
            | "shorthand_property_identifier_pattern" => {
                scope.identifiers.push(self.record(node));
            }
            "property_identifier" => scope.properties.push(self.record(node)),
            "string" => scope.literals.push(ScopeNode {
                value: Some(TokenValue::String(decode_string(self.text(node)))),
                ..self.record(node)
            }),
            "number" => scope.literals.push(ScopeNode {
                value: parse_number(self.text(node)).map(TokenValue::Number),
                ..self.record(node)
            }),
            "member_expression" => {
                self.record_association(node, scope);
                self.visit_children(node, scope, depth);
            }
            "variable_declarator" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.bind_pattern(name, scope);
                }
                self.visit_children(node, scope, depth);
            }
            "class_declaration" => {
                if let Some(name) = node.child_by_field_name("name").filter(|n| !n.is_missing()) {
                    scope.bindings.push(self.binding(name));
                }
                self.visit_children(node, scope, depth);
            }
            "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "generator_function"
            | "arrow_function"
            | "method_definition" => self.visit_function(node, scope, depth),
            "catch_clause" => {
                let mut catch = Scope::new(ScopeKind::Catch, None, node.byte_range().into());
                if let Some(param) = node.child_by_field_name("parameter") {
                    self.bind_pattern(param, &mut catch);
                }
                self.visit_children(node, &mut catch, depth);
                scope.children.push(catch);
            }
            _ => self.visit_children(node, scope, depth),
        }
    }

    /// Functions open a scope holding their parameters and body.
    ///
    /// Declaration names bind in the enclosing scope, function-expression
    /// names in their own, method names are properties of the enclosing one.
    fn visit_function(&mut self, node: Node<'_>, scope: &mut Scope, depth: usize) {
        let name = node.child_by_field_name("name").filter(|n| !n.is_missing());
        let mut function = Scope::new(
            ScopeKind::Function,
            name.map(|n| self.text(n).to_string()),
            node.byte_range().into(),
        );

        if let Some(name) = name {
            match node.kind() {
                "function_declaration" | "generator_function_declaration" => {
                    scope.bindings.push(self.binding(name));
                    scope.identifiers.push(self.record(name));
                }
                "method_definition" => self.visit(name, scope, depth + 1),
                _ => {
                    function.bindings.push(self.binding(name));
                    function.identifiers.push(self.record(name));
                }
            }
        }

        if let Some(params) = node
            .child_by_field_name("parameters")
            .or_else(|| node.child_by_field_name("parameter"))
        {
            self.bind_pattern(params, &mut function);
        }

        let name_id = name.map(|n| n.id());
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if Some(child.id()) != name_id {
                self.visit(child, &mut function, depth + 1);
            }
        }

        scope.children.push(function);
    }

    /// Record the names a declaration pattern introduces, skipping defaults.
    fn bind_pattern(&self, node: Node<'_>, scope: &mut Scope) {
        if node.is_missing() {
            return;
        }
        match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => {
                scope.bindings.push(self.binding(node));
            }
            "assignment_pattern" | "object_assignment_pattern" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.bind_pattern(left, scope);
                }
            }
            "pair_pattern" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.bind_pattern(value, scope);
                }
            }
            "object_pattern" | "array_pattern" | "formal_parameters" | "rest_pattern" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.bind_pattern(child, scope);
                }
            }
            _ => {}
        }
    }

    fn record_association(&self, node: Node<'_>, scope: &mut Scope) {
        let (Some(object), Some(property)) = (
            node.child_by_field_name("object"),
            node.child_by_field_name("property"),
        ) else {
            return;
        };

        if object.is_missing() || property.is_missing() {
            return;
        }
        if object.kind() == "identifier" && property.kind() == "property_identifier" {
            scope.associations.push(Association {
                object: self.record(object),
                property: self.record(property),
            });
        }
    }
}

/// Decode the content of a quoted string literal.
fn decode_string(raw: &str) -> String {
    let inner = match raw.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &raw[1..];
            body.strip_suffix(quote).unwrap_or(body)
        }
        _ => raw,
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex, 'x');
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|c| *c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                push_code_point(&mut out, &hex, 'u');
            }
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some('\n') | Some('\u{2028}') | Some('\u{2029}') => {}
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn push_code_point(out: &mut String, hex: &str, marker: char) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push('\\');
            out.push(marker);
            out.push_str(hex);
        }
    }
}

/// Numeric value of a JavaScript number literal. BigInts have none.
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '_').collect();
    if cleaned.ends_with('n') {
        return None;
    }

    let lower = cleaned.to_ascii_lowercase();
    let (radix, digits) = if let Some(digits) = lower.strip_prefix("0x") {
        (16, digits)
    } else if let Some(digits) = lower.strip_prefix("0o") {
        (8, digits)
    } else if let Some(digits) = lower.strip_prefix("0b") {
        (2, digits)
    } else if is_legacy_octal(&lower) {
        (8, &lower[1..])
    } else {
        return lower.parse::<f64>().ok();
    };

    u64::from_str_radix(digits, radix).ok().map(|v| v as f64)
}

/// Sloppy-mode `010`: a leading zero followed only by octal digits.
fn is_legacy_octal(lower: &str) -> bool {
    lower.len() > 1
        && lower.starts_with('0')
        && lower.bytes().skip(1).all(|b| (b'0'..=b'7').contains(&b))
}

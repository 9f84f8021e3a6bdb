use crate::adapter::{Adapter, AdapterKind, Value};
use crate::error::MutationError;
use crate::range::Range;
use crate::ts::ParsedSource;
use ::tree_sitter::{Language, Node};
use ast_grep_language::{LanguageExt, SupportLang};

/// Node kinds that resolve to the ordered list of their elements when reached
/// through a field.
const LIST_KINDS: &[&str] = &[
    "arguments",
    "parameters",
    "type_arguments",
    "type_parameters",
    "field_initializer_list",
    "field_declaration_list",
    "tuple_expression",
    "array_expression",
    "declaration_list",
    "enum_variant_list",
    "use_list",
];

/// Delimited lists reachable as a whole through `parentheses`.
const PARENTHESIZED_KINDS: &[&str] = &["arguments", "parameters"];

/// Delimited lists reachable as a whole through `angle_brackets`.
const ANGLE_BRACKETED_KINDS: &[&str] = &["type_arguments", "type_parameters"];

/// Adapter over tree-sitter Rust syntax trees.
///
/// Named path tokens resolve, in order, to:
/// - grammar fields (`name`, `parameters`, `body`, `value`, ...), where a
///   field the grammar knows but the node lacks is absent;
/// - the anonymous `dot` and `semicolon` tokens;
/// - `parentheses` / `angle_brackets`: the delimited argument, parameter or
///   generic list including its delimiters, so empty lists still have a range;
/// - `{key}_field` / `{key}_value` on struct literals;
/// - computed text: `to_string_literal`, `to_raw_string`,
///   `strip_curly_braces`, `wrap_curly_braces`, `kind`, plus the `has_error`
///   flag.
pub struct TreeSitterAdapter<'t> {
    source: &'t str,
    language: Language,
}

impl<'t> TreeSitterAdapter<'t> {
    pub fn new(parsed: &'t ParsedSource<'_>) -> Self {
        Self {
            source: parsed.source,
            language: SupportLang::Rust.get_ts_language(),
        }
    }

    fn text(&self, node: &Node<'t>) -> &'t str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    fn field(&self, node: &Node<'t>, name: &str) -> Option<Value<Node<'t>>> {
        self.language.field_id_for_name(name)?;

        let mut cursor = node.walk();
        let nodes: Vec<Node<'t>> = node.children_by_field_name(name, &mut cursor).collect();
        let value = match nodes.as_slice() {
            [] => Value::Absent,
            [single] if LIST_KINDS.contains(&single.kind()) => {
                Value::Sequence(named_elements(single))
            }
            [single] => Value::Node(*single),
            _ => Value::Sequence(nodes),
        };
        Some(value)
    }

    fn token(&self, node: &Node<'t>, kind: &str) -> Value<Node<'t>> {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|child| !child.is_named() && child.kind() == kind);
        found.map_or(Value::Absent, Value::Node)
    }

    /// Initializer for `key` inside a struct literal.
    fn struct_field(&self, node: &Node<'t>, key: &str) -> Option<Node<'t>> {
        let body = node.child_by_field_name("body")?;
        let mut cursor = body.walk();
        let found = body
            .named_children(&mut cursor)
            .find(|init| self.initializer_key(init) == Some(key));
        found
    }

    fn initializer_key(&self, init: &Node<'t>) -> Option<&'t str> {
        match init.kind() {
            "field_initializer" => init
                .child_by_field_name("field")
                .map(|field| self.text(&field)),
            "shorthand_field_initializer" => first_named(init).map(|ident| self.text(&ident)),
            _ => None,
        }
    }

    fn struct_value(&self, node: &Node<'t>, key: &str) -> Option<Node<'t>> {
        let init = self.struct_field(node, key)?;
        match init.kind() {
            "field_initializer" => init.child_by_field_name("value"),
            _ => first_named(&init),
        }
    }

    fn computed(&self, node: &Node<'t>, name: &str) -> Option<Value<Node<'t>>> {
        let text = self.text(node);
        match name {
            "kind" => Some(Value::Text(node.kind().to_string())),
            "has_error" => Some(Value::Bool(node.has_error())),
            "to_string_literal" => to_string_literal(node.kind(), text).map(Value::Text),
            "to_raw_string" => to_raw_string(node.kind(), text).map(Value::Text),
            "strip_curly_braces" => Some(Value::Text(strip_curly_braces(text).to_string())),
            "wrap_curly_braces" => Some(Value::Text(wrap_curly_braces(text))),
            _ => None,
        }
    }
}

impl<'t> Adapter for TreeSitterAdapter<'t> {
    type Node = Node<'t>;

    fn kind(&self) -> AdapterKind {
        AdapterKind::TreeSitterRust
    }

    fn file_source(&self) -> &str {
        self.source
    }

    fn node_range(&self, node: &Node<'t>) -> Range {
        Range::new(node.start_byte(), node.end_byte())
    }

    fn child(&self, node: &Node<'t>, name: &str) -> Result<Value<Node<'t>>, MutationError> {
        if let Some(value) = self.field(node, name) {
            return Ok(value);
        }

        match name {
            "dot" => return Ok(self.token(node, ".")),
            "semicolon" => return Ok(self.token(node, ";")),
            "parentheses" => return Ok(delimited(node, PARENTHESIZED_KINDS)),
            "angle_brackets" => return Ok(delimited(node, ANGLE_BRACKETED_KINDS)),
            _ => {}
        }

        if node.kind() == "struct_expression" {
            if let Some(key) = name.strip_suffix("_field") {
                return Ok(self.struct_field(node, key).map_or(Value::Absent, Value::Node));
            }
            if let Some(key) = name.strip_suffix("_value") {
                return Ok(self.struct_value(node, key).map_or(Value::Absent, Value::Node));
            }
        }

        self.computed(node, name)
            .ok_or_else(|| MutationError::selector_not_supported(name, self.text(node)))
    }

    fn node_text(&self, node: &Node<'t>) -> String {
        let text = self.text(node);
        if node.kind() == "closure_parameters" {
            return text
                .trim_start_matches('|')
                .trim_end_matches('|')
                .trim()
                .to_string();
        }
        text.to_string()
    }
}

fn delimited<'t>(node: &Node<'t>, kinds: &[&str]) -> Value<Node<'t>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| kinds.contains(&child.kind()));
    found.map_or(Value::Absent, Value::Node)
}

fn named_elements<'t>(list: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = list.walk();
    let elements = list
        .named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect();
    elements
}

fn first_named<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let first = node.named_children(&mut cursor).next();
    first
}

fn to_string_literal(kind: &str, text: &str) -> Option<String> {
    match kind {
        "string_literal" => Some(text.to_string()),
        "char_literal" => {
            let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
            let inner = match inner {
                "\\'" => "'",
                "\"" => "\\\"",
                other => other,
            };
            Some(format!("\"{inner}\""))
        }
        _ => None,
    }
}

/// Raw form of a plain string literal. Literals with escapes are rejected
/// because their raw form would change meaning.
fn to_raw_string(kind: &str, text: &str) -> Option<String> {
    match kind {
        "raw_string_literal" => Some(text.to_string()),
        "string_literal" => {
            let inner = text.strip_prefix('"')?.strip_suffix('"')?;
            if inner.contains('\\') {
                return None;
            }
            Some(format!("r\"{inner}\""))
        }
        _ => None,
    }
}

fn strip_curly_braces(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(inner) => inner.trim(),
        None => text,
    }
}

fn wrap_curly_braces(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        trimmed.to_string()
    } else {
        format!("{{ {trimmed} }}")
    }
}

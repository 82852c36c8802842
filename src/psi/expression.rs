//! Expressions that may appear as annotation arguments or const initializers

use tree_sitter::Node;

use super::builder::{is_kind, node_text, IDENTIFIER_KINDS};

const STRING_KINDS: &[&str] = &[
    "string_literal",
    "line_string_literal",
    "multi_line_string_literal",
];
const INTEGER_KINDS: &[&str] = &["integer_literal", "long_literal", "hex_literal", "bin_literal"];
const BINARY_KINDS: &[&str] = &["additive_expression", "binary_expression"];
const WRAPPER_KINDS: &[&str] = &["parenthesized_expression", "expression"];

/// Compile-time-relevant expression shapes
#[derive(Debug, Clone, PartialEq)]
pub enum KtExpression {
    /// String literal; `None` when it contains an interpolation
    StringTemplate(Option<String>),
    Integer(i64),
    Boolean(bool),
    /// `NAME` or `Owner.NAME`
    Reference(String),
    Binary {
        op: char,
        lhs: Box<KtExpression>,
        rhs: Box<KtExpression>,
    },
    /// Anything else, kept as source text
    Other(String),
}

/// Build an expression from its syntax node
pub(crate) fn build_expression(node: &Node, source: &str) -> KtExpression {
    let kind = node.kind();

    if is_kind(node, WRAPPER_KINDS) {
        let mut cursor = node.walk();
        let inner = node.named_children(&mut cursor).find(|c| !c.is_extra());
        if let Some(inner) = inner {
            return build_expression(&inner, source);
        }
    }

    if is_kind(node, BINARY_KINDS) {
        if let Some(binary) = build_binary(node, source) {
            return binary;
        }
    }

    let text = node_text(node, source);
    if is_kind(node, STRING_KINDS) {
        return KtExpression::StringTemplate(parse_string_literal(&text));
    }
    if INTEGER_KINDS.contains(&kind) {
        if let Some(value) = parse_integer(&text) {
            return KtExpression::Integer(value);
        }
    }
    // Some grammars leave `true`/`false`/`null` as plain identifiers
    if let Some(literal) = keyword_literal(&text) {
        return literal;
    }
    if is_kind(node, IDENTIFIER_KINDS) || kind == "navigation_expression" {
        if is_reference_path(&text) {
            return KtExpression::Reference(strip_whitespace(&text));
        }
    }

    classify_text(&text)
}

fn build_binary(node: &Node, source: &str) -> Option<KtExpression> {
    let mut operands = Vec::new();
    let mut op = None;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.is_extra() {
            continue;
        }
        if child.is_named() && child.kind() != "operator" {
            operands.push(child);
        } else {
            let text = node_text(&child, source);
            if text == "+" || text == "-" {
                op = text.chars().next();
            }
        }
    }
    match (op, operands.as_slice()) {
        (Some(op), [lhs, rhs]) => Some(KtExpression::Binary {
            op,
            lhs: Box::new(build_expression(lhs, source)),
            rhs: Box::new(build_expression(rhs, source)),
        }),
        _ => None,
    }
}

/// Classify an expression purely by its text
fn classify_text(text: &str) -> KtExpression {
    let trimmed = text.trim();
    if trimmed.starts_with('"') {
        return KtExpression::StringTemplate(parse_string_literal(trimmed));
    }
    if let Some(literal) = keyword_literal(trimmed) {
        return literal;
    }
    if let Some(value) = parse_integer(trimmed) {
        return KtExpression::Integer(value);
    }
    if is_reference_path(trimmed) {
        return KtExpression::Reference(strip_whitespace(trimmed));
    }
    KtExpression::Other(trimmed.to_string())
}

fn keyword_literal(text: &str) -> Option<KtExpression> {
    match text.trim() {
        "true" => Some(KtExpression::Boolean(true)),
        "false" => Some(KtExpression::Boolean(false)),
        "null" => Some(KtExpression::Other("null".to_string())),
        _ => None,
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// `NAME`, `Owner.NAME`, `a.b.Owner.NAME`
fn is_reference_path(text: &str) -> bool {
    let compact = strip_whitespace(text);
    !compact.is_empty()
        && compact.split('.').all(|segment| {
            let segment = segment.trim_matches('`');
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
}

fn parse_integer(text: &str) -> Option<i64> {
    let cleaned: String = text
        .trim_end_matches(['L', 'l', 'u', 'U'])
        .chars()
        .filter(|c| *c != '_')
        .collect();
    if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        return i64::from_str_radix(hex, 16).ok();
    }
    if let Some(bin) = cleaned
        .strip_prefix("0b")
        .or_else(|| cleaned.strip_prefix("0B"))
    {
        return i64::from_str_radix(bin, 2).ok();
    }
    cleaned.parse().ok()
}

/// Value of a Kotlin string literal, including its quotes.
///
/// Returns `None` for templates with interpolation (`$name`, `${...}`),
/// which are not compile-time constants, and for malformed escapes.
pub fn parse_string_literal(text: &str) -> Option<String> {
    if let Some(raw) = text
        .strip_prefix("\"\"\"")
        .and_then(|t| t.strip_suffix("\"\"\""))
    {
        if has_interpolation(raw) {
            return None;
        }
        return Some(raw.to_string());
    }

    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = match chars.next()? {
                    't' => '\t',
                    'b' => '\u{8}',
                    'n' => '\n',
                    'r' => '\r',
                    '\'' => '\'',
                    '"' => '"',
                    '\\' => '\\',
                    '$' => '$',
                    'u' => {
                        let hex: String = chars.by_ref().take(4).collect();
                        char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
                    }
                    _ => return None,
                };
                value.push(escaped);
            }
            '$' if matches!(chars.peek(), Some(n) if *n == '{' || n.is_alphabetic() || *n == '_') => {
                return None;
            }
            _ => value.push(c),
        }
    }
    Some(value)
}

fn has_interpolation(raw: &str) -> bool {
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '$' && matches!(chars.peek(), Some(n) if *n == '{' || n.is_alphabetic() || *n == '_') {
            return true;
        }
    }
    false
}

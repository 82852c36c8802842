//! Projection of a tree-sitter Kotlin syntax tree into [`KtFile`]
//!
//! Node kinds are matched through small kind tables rather than single
//! names, so the builder works with both naming schemes found in Kotlin
//! grammars (`simple_identifier`/`identifier`, `multiline_comment`/
//! `block_comment`, `import_header`/`import`).

use std::path::Path;

use tracing::debug;
use tree_sitter::{Node, Tree};

use super::expression::build_expression;
use crate::lang::KotlinLanguage;
use super::{
    ClassKind, KDoc, KtAnnotationEntry, KtClass, KtExpression, KtFile, KtImport, KtProperty,
    KtValueArgument, Visibility,
};

pub(crate) const IDENTIFIER_KINDS: &[&str] = &["simple_identifier", "identifier", "type_identifier"];
const BLOCK_COMMENT_KINDS: &[&str] = &["block_comment", "multiline_comment"];
const PACKAGE_KINDS: &[&str] = &["package_header"];
const IMPORT_KINDS: &[&str] = &["import_header", "import"];
const IMPORT_LIST_KINDS: &[&str] = &["import_list"];
const CLASS_KINDS: &[&str] = &["class_declaration", "object_declaration", "companion_object"];
const CLASS_BODY_KINDS: &[&str] = &["class_body", "enum_class_body"];
const PROPERTY_KINDS: &[&str] = &["property_declaration"];
const ANNOTATION_KINDS: &[&str] = &["annotation"];
const CONSTRUCTOR_PARAMETER_KINDS: &[&str] = &["class_parameter"];
const DELEGATION_KINDS: &[&str] = &["delegation_specifier"];
const DELEGATION_LIST_KINDS: &[&str] = &["delegation_specifiers"];
const ENUM_ENTRY_KINDS: &[&str] = &["enum_entry"];

/// Syntax problem found while parsing a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

pub(crate) fn is_kind(node: &Node, kinds: &[&str]) -> bool {
    kinds.contains(&node.kind())
}

pub(crate) fn node_text(node: &Node, source: &str) -> String {
    node.utf8_text(source.as_bytes()).unwrap_or("").to_string()
}

fn line_of(node: &Node) -> usize {
    node.start_position().row + 1
}

fn child_of_kind<'t>(node: &Node<'t>, kinds: &[&str]) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| is_kind(c, kinds));
    found
}

fn children_of_kind<'t>(node: &Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|c| is_kind(c, kinds))
        .collect();
    found
}

/// Depth-first search for the first descendant of a kind, not descending
/// into nodes of `stop` kinds
fn find_descendant<'t>(node: &Node<'t>, kinds: &[&str], stop: &[&str]) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if is_kind(&child, kinds) {
            return Some(child);
        }
        if is_kind(&child, stop) {
            continue;
        }
        if let Some(found) = find_descendant(&child, kinds, stop) {
            return Some(found);
        }
    }
    None
}

/// Project a parsed file
pub fn build_file(path: &Path, source: &str, tree: &Tree) -> KtFile {
    build_tree(path, source, tree, true)
}

fn build_tree(path: &Path, source: &str, tree: &Tree, recover: bool) -> KtFile {
    let root = tree.root_node();
    let mut file = KtFile {
        path: path.to_path_buf(),
        ..Default::default()
    };

    if root.has_error() {
        collect_syntax_errors(&root, source, &mut file.syntax_errors);
    }

    let mut members = Members::default();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if is_kind(&child, PACKAGE_KINDS) {
            file.package = package_name(&child, source);
        } else if is_kind(&child, IMPORT_LIST_KINDS) {
            for import in children_of_kind(&child, IMPORT_KINDS) {
                file.imports.extend(build_import(&import, source));
            }
        } else if is_kind(&child, IMPORT_KINDS) {
            file.imports.extend(build_import(&child, source));
        } else {
            visit_member(&child, &root, source, Scope::File, recover, &mut members);
        }
    }

    file.classes = members.classes;
    file.properties = members.properties;
    file
}

/// Where a declaration-level node sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    File,
    ClassBody,
}

/// Declarations collected from a file or class body. Annotations that the
/// grammar left detached from their declaration are carried over in
/// `pending`.
#[derive(Default)]
struct Members {
    pending: Vec<KtAnnotationEntry>,
    classes: Vec<KtClass>,
    properties: Vec<KtProperty>,
}

/// Handle one declaration-level node of a file or class body
fn visit_member(
    node: &Node,
    root: &Node,
    source: &str,
    scope: Scope,
    recover: bool,
    members: &mut Members,
) {
    if node.is_extra() {
        return;
    }
    if node.is_error() {
        recover_error(node, root, source, scope, recover, members);
        return;
    }
    if is_kind(node, ANNOTATION_KINDS) {
        members.pending.extend(build_annotation(node, source));
        return;
    }
    if is_kind(node, CLASS_KINDS) {
        let mut class = build_class(node, root, source, recover);
        prepend(&mut class.annotations, &mut members.pending);
        members.classes.push(class);
    } else if is_kind(node, PROPERTY_KINDS) {
        if let Some(mut property) = build_property(node, root, source) {
            prepend(&mut property.annotations, &mut members.pending);
            members.properties.push(property);
        }
    }
    members.pending.clear();
}

/// Pull declarations out of an `ERROR` node.
///
/// Declarations the grammar still recognized inside the node are visited
/// in place. Otherwise the node's text is split into one statement per line
/// and parsed again on its own, which is how single-line bodies such as
/// `class A { var a = 1 }` are read. Fragments are parsed once; errors
/// inside a fragment are not recovered again.
fn recover_error(
    node: &Node,
    root: &Node,
    source: &str,
    scope: Scope,
    recover: bool,
    members: &mut Members,
) {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    let recognized = children
        .iter()
        .any(|c| is_kind(c, CLASS_KINDS) || is_kind(c, PROPERTY_KINDS));
    if recognized || !recover {
        for child in &children {
            visit_member(child, root, source, scope, recover, members);
        }
        return;
    }

    let text = node_text(node, source);
    let trimmed = text.trim_start();
    let first_line = line_of(node) + text[..text.len() - trimmed.len()].matches('\n').count();
    let trimmed = trimmed.trim_end();
    if !mentions_declaration(trimmed) {
        return;
    }

    // A body the grammar split off from the class before it
    if scope == Scope::File && trimmed.starts_with('{') {
        if let Some(class) = members.classes.last_mut() {
            if let Some(mut fragment) = reparse_fragment(trimmed, Scope::ClassBody, first_line) {
                debug!(class = %class.name, line = first_line, "recovered class body");
                class.properties.append(&mut fragment.properties);
                class.nested.append(&mut fragment.classes);
            }
            members.pending.clear();
            return;
        }
    }

    let Some(mut fragment) = reparse_fragment(trimmed, scope, first_line) else {
        return;
    };
    debug!(
        line = first_line,
        classes = fragment.classes.len(),
        properties = fragment.properties.len(),
        "recovered declarations from syntax error"
    );
    if let Some(first) = fragment.classes.first_mut() {
        prepend(&mut first.annotations, &mut members.pending);
    } else if let Some(first) = fragment.properties.first_mut() {
        prepend(&mut first.annotations, &mut members.pending);
    }
    members.pending.clear();
    members.classes.append(&mut fragment.classes);
    members.properties.append(&mut fragment.properties);
}

fn mentions_declaration(text: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .any(|word| matches!(word, "val" | "var" | "class" | "object" | "interface"))
}

/// Declarations parsed from a piece of source text
struct Fragment {
    classes: Vec<KtClass>,
    properties: Vec<KtProperty>,
}

fn reparse_fragment(text: &str, scope: Scope, first_line: usize) -> Option<Fragment> {
    let (wrapped, mut lines) = match scope {
        Scope::File => split_statements(text),
        Scope::ClassBody => {
            let body = text.strip_prefix('{').unwrap_or(text);
            let body = body.strip_suffix('}').unwrap_or(body);
            let (body, mut lines) = split_statements(body);
            lines.insert(0, 0);
            (format!("class Fragment {{\n{}\n}}\n", body), lines)
        }
    };
    lines.push(lines.last().copied().unwrap_or(0));

    let mut parser = KotlinLanguage::parser().ok()?;
    let tree = parser.parse(&wrapped, None)?;
    let file = build_tree(Path::new(""), &wrapped, &tree, false);

    let mut fragment = match scope {
        Scope::File => Fragment {
            classes: file.classes,
            properties: file.properties,
        },
        Scope::ClassBody => {
            let wrapper = file.classes.into_iter().next()?;
            Fragment {
                classes: wrapper.nested,
                properties: wrapper.properties,
            }
        }
    };

    let remap = |line: usize| first_line + lines.get(line.saturating_sub(1)).copied().unwrap_or(0);
    for class in &mut fragment.classes {
        remap_class_lines(class, &remap);
    }
    for property in &mut fragment.properties {
        remap_property_lines(property, &remap);
    }
    Some(fragment)
}

/// Put each statement of `text` on its own line, leaving strings and
/// comments untouched. The second value maps every output line to the
/// zero-based input line it came from.
fn split_statements(text: &str) -> (String, Vec<usize>) {
    let mut out = String::with_capacity(text.len() + 16);
    let mut lines = vec![0];
    let mut line = 0;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        let verbatim = verbatim_len(rest);
        if verbatim > 0 {
            for c in rest[..verbatim].chars() {
                out.push(c);
                if c == '\n' {
                    line += 1;
                    lines.push(line);
                }
            }
            i += verbatim;
            continue;
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        match c {
            '{' => {
                out.push_str("{\n");
                lines.push(line);
            }
            '}' => {
                out.push('\n');
                lines.push(line);
                out.push('}');
            }
            ';' => {
                out.push('\n');
                lines.push(line);
            }
            '\n' => {
                out.push('\n');
                line += 1;
                lines.push(line);
            }
            _ => out.push(c),
        }
        i += c.len_utf8();
    }

    (out, lines)
}

/// Length of a string, character literal or comment starting `text`
fn verbatim_len(text: &str) -> usize {
    if text.starts_with("\"\"\"") {
        text[3..].find("\"\"\"").map(|p| p + 6).unwrap_or(text.len())
    } else if text.starts_with('"') || text.starts_with('\'') {
        quoted_len(text)
    } else if text.starts_with("//") {
        text.find('\n').unwrap_or(text.len())
    } else if text.starts_with("/*") {
        text[2..].find("*/").map(|p| p + 4).unwrap_or(text.len())
    } else {
        0
    }
}

fn quoted_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    let Some((_, quote)) = chars.next() else {
        return 0;
    };
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\n' => return index,
            c if c == quote => return index + c.len_utf8(),
            _ => {}
        }
    }
    text.len()
}

fn remap_class_lines(class: &mut KtClass, remap: &impl Fn(usize) -> usize) {
    class.line = remap(class.line);
    remap_annotation_lines(&mut class.annotations, remap);
    if let Some(doc) = class.doc_comment.as_mut() {
        doc.line = remap(doc.line);
    }
    for property in &mut class.properties {
        remap_property_lines(property, remap);
    }
    for nested in &mut class.nested {
        remap_class_lines(nested, remap);
    }
}

fn remap_property_lines(property: &mut KtProperty, remap: &impl Fn(usize) -> usize) {
    property.line = remap(property.line);
    remap_annotation_lines(&mut property.annotations, remap);
    if let Some(doc) = property.doc_comment.as_mut() {
        doc.line = remap(doc.line);
    }
}

fn remap_annotation_lines(annotations: &mut [KtAnnotationEntry], remap: &impl Fn(usize) -> usize) {
    for annotation in annotations {
        annotation.line = remap(annotation.line);
    }
}

fn prepend(annotations: &mut Vec<KtAnnotationEntry>, pending: &mut Vec<KtAnnotationEntry>) {
    if !pending.is_empty() {
        let own = std::mem::take(annotations);
        annotations.append(pending);
        annotations.extend(own);
    }
}

fn collect_syntax_errors(node: &Node, source: &str, errors: &mut Vec<SyntaxError>) {
    if node.is_error() {
        let snippet: String = node_text(node, source)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(40)
            .collect();
        errors.push(SyntaxError {
            message: format!("Expecting an element near '{}'", snippet),
            line: line_of(node),
            column: node.start_position().column + 1,
        });
        return;
    }
    if node.is_missing() {
        errors.push(SyntaxError {
            message: format!("Missing '{}'", node.kind()),
            line: line_of(node),
            column: node.start_position().column + 1,
        });
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            collect_syntax_errors(&child, source, errors);
        }
    }
}

fn package_name(node: &Node, source: &str) -> String {
    let text = node_text(node, source);
    let text = text.trim();
    let text = text.strip_prefix("package").unwrap_or(text);
    text.trim()
        .trim_end_matches(';')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn build_import(node: &Node, source: &str) -> Option<KtImport> {
    let text = node_text(node, source);
    let text = text.trim().strip_prefix("import")?.trim().trim_end_matches(';').trim();

    let (path, alias) = match text.split_once(" as ") {
        Some((path, alias)) => (path, Some(alias.trim().to_string())),
        None => (text, None),
    };
    let path: String = path.chars().filter(|c| !c.is_whitespace()).collect();
    let (path, all_under) = match path.strip_suffix(".*") {
        Some(package) => (package.to_string(), true),
        None => (path, false),
    };
    if path.is_empty() {
        return None;
    }

    Some(KtImport {
        path,
        alias,
        all_under,
        line: line_of(node),
    })
}

/// Modifier keywords and annotations of a declaration
#[derive(Default)]
struct Modifiers {
    keywords: Vec<String>,
    annotations: Vec<KtAnnotationEntry>,
}

impl Modifiers {
    fn has(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    fn visibility(&self) -> Visibility {
        self.keywords
            .iter()
            .find_map(|k| Visibility::from_keyword(k))
            .unwrap_or_default()
    }
}

fn build_modifiers(node: &Node, source: &str) -> Modifiers {
    let mut modifiers = Modifiers::default();
    let Some(list) = child_of_kind(node, &["modifiers"]) else {
        return modifiers;
    };
    let mut cursor = list.walk();
    for child in list.children(&mut cursor) {
        if child.is_extra() {
            continue;
        }
        if is_kind(&child, ANNOTATION_KINDS) {
            modifiers.annotations.extend(build_annotation(&child, source));
        } else {
            modifiers.keywords.extend(
                node_text(&child, source)
                    .split_whitespace()
                    .map(str::to_string),
            );
        }
    }
    modifiers
}

fn build_annotation(node: &Node, source: &str) -> Option<KtAnnotationEntry> {
    let type_name = match find_descendant(node, &["user_type"], &["value_arguments"]) {
        Some(user_type) => strip_type_arguments(&node_text(&user_type, source)),
        None => annotation_name_from_text(&node_text(node, source)),
    };
    if type_name.is_empty() {
        return None;
    }

    let arguments = find_descendant(node, &["value_arguments"], &[])
        .map(|args| build_value_arguments(&args, source))
        .unwrap_or_default();

    Some(KtAnnotationEntry {
        type_name,
        arguments,
        line: line_of(node),
        column: node.start_position().column + 1,
    })
}

/// `@field:Foo.Bar(x)` -> `Foo.Bar`
fn annotation_name_from_text(text: &str) -> String {
    let text = text.trim().trim_start_matches('@');
    let head = text.split('(').next().unwrap_or("");
    let head = match head.split_once(':') {
        Some((_, name)) => name,
        None => head,
    };
    strip_type_arguments(head)
}

fn strip_type_arguments(text: &str) -> String {
    text.split('<')
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '?')
        .collect()
}

fn build_value_arguments(node: &Node, source: &str) -> Vec<KtValueArgument> {
    children_of_kind(node, &["value_argument"])
        .iter()
        .filter_map(|arg| build_value_argument(arg, source))
        .collect()
}

fn build_value_argument(node: &Node, source: &str) -> Option<KtValueArgument> {
    let mut name = None;
    let mut expression = None;
    let mut last_named: Option<Node> = None;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.is_extra() {
            continue;
        }
        if !child.is_named() && node_text(&child, source) == "=" {
            name = last_named
                .filter(|n| is_kind(n, IDENTIFIER_KINDS))
                .map(|n| node_text(&n, source));
            expression = None;
            continue;
        }
        if child.is_named() {
            last_named = Some(child);
            expression = Some(child);
        }
    }

    let expression = expression?;
    Some(KtValueArgument {
        name,
        expression: build_expression(&expression, source),
    })
}

fn declaration_name(node: &Node, source: &str) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        let text = node_text(&name, source);
        if !text.is_empty() {
            return Some(text);
        }
    }
    child_of_kind(node, IDENTIFIER_KINDS).map(|n| node_text(&n, source))
}

fn class_kind(node: &Node, modifiers: &Modifiers, source: &str) -> ClassKind {
    match node.kind() {
        "companion_object" => return ClassKind::CompanionObject,
        "object_declaration" => return ClassKind::Object,
        _ => {}
    }
    let mut cursor = node.walk();
    let is_interface = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && node_text(&c, source) == "interface");
    if is_interface {
        ClassKind::Interface
    } else if modifiers.has("enum") {
        ClassKind::EnumClass
    } else if modifiers.has("annotation") {
        ClassKind::AnnotationClass
    } else {
        ClassKind::Class
    }
}

fn build_class(node: &Node, root: &Node, source: &str, recover: bool) -> KtClass {
    let modifiers = build_modifiers(node, source);
    let kind = class_kind(node, &modifiers, source);
    let name = declaration_name(node, source).unwrap_or_else(|| {
        if kind == ClassKind::CompanionObject {
            "Companion".to_string()
        } else {
            String::new()
        }
    });

    let mut class = KtClass {
        name,
        kind,
        visibility: modifiers.visibility(),
        annotations: modifiers.annotations,
        doc_comment: find_doc_comment(node, root, source),
        supertypes: supertypes(node, source),
        properties: Vec::new(),
        nested: Vec::new(),
        enum_entries: Vec::new(),
        line: line_of(node),
    };

    if let Some(constructor) = child_of_kind(node, &["primary_constructor"]) {
        collect_constructor_properties(&constructor, source, &mut class.properties);
    }

    let mut members = Members::default();
    match child_of_kind(node, CLASS_BODY_KINDS) {
        Some(body) => {
            let mut cursor = body.walk();
            for child in body.children(&mut cursor) {
                if is_kind(&child, ENUM_ENTRY_KINDS) {
                    if let Some(entry) = declaration_name(&child, source) {
                        class.enum_entries.push(entry);
                    }
                    continue;
                }
                visit_member(&child, root, source, Scope::ClassBody, recover, &mut members);
            }
        }
        // Body swallowed by a syntax error
        None if recover => {
            if let Some(mut fragment) = detached_body(node, source) {
                debug!(class = %class.name, line = class.line, "recovered class body");
                members.properties.append(&mut fragment.properties);
                members.classes.append(&mut fragment.classes);
            }
        }
        None => {}
    }
    class.properties.append(&mut members.properties);
    class.nested = members.classes;

    class
}

/// Declarations written after the first `{` of a class the grammar could
/// not give a body, e.g. when it read the braces as a lambda after a
/// supertype call
fn detached_body(node: &Node, source: &str) -> Option<Fragment> {
    let brace = find_token(node, "{", source)?;
    let body = source.get(brace.start_byte()..node.end_byte())?;
    if !mentions_declaration(body) {
        return None;
    }
    reparse_fragment(body, Scope::ClassBody, line_of(&brace))
}

fn find_token<'t>(node: &Node<'t>, token: &str, source: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if !child.is_named() && node_text(&child, source) == token {
            return Some(child);
        }
        if is_kind(&child, &["primary_constructor", "modifiers"]) || is_kind(&child, CLASS_KINDS) {
            continue;
        }
        if let Some(found) = find_token(&child, token, source) {
            return Some(found);
        }
    }
    None
}

fn supertypes(node: &Node, source: &str) -> Vec<String> {
    let mut specifiers = children_of_kind(node, DELEGATION_KINDS);
    for list in children_of_kind(node, DELEGATION_LIST_KINDS) {
        specifiers.extend(children_of_kind(&list, DELEGATION_KINDS));
    }

    specifiers
        .iter()
        .filter_map(|spec| {
            let name = match find_descendant(spec, &["user_type"], &["value_arguments"]) {
                Some(user_type) => strip_type_arguments(&node_text(&user_type, source)),
                None => {
                    let text = node_text(spec, source);
                    let head = text.split(['(', ' ']).next().unwrap_or("");
                    strip_type_arguments(head)
                }
            };
            (!name.is_empty()).then_some(name)
        })
        .collect()
}

fn collect_constructor_properties(node: &Node, source: &str, properties: &mut Vec<KtProperty>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if is_kind(&child, CONSTRUCTOR_PARAMETER_KINDS) {
            if let Some(property) = build_constructor_property(&child, source) {
                properties.push(property);
            }
        } else if child.is_named() {
            collect_constructor_properties(&child, source, properties);
        }
    }
}

fn is_binding_keyword(node: &Node, source: &str) -> bool {
    node.kind() == "binding_pattern_kind"
        || (!node.is_named() && matches!(node_text(node, source).as_str(), "val" | "var"))
}

fn build_constructor_property(node: &Node, source: &str) -> Option<KtProperty> {
    let mut cursor = node.walk();
    let is_property = node
        .children(&mut cursor)
        .any(|c| is_binding_keyword(&c, source));
    if !is_property {
        return None;
    }

    let modifiers = build_modifiers(node, source);
    Some(KtProperty {
        name: declaration_name(node, source)?,
        visibility: modifiers.visibility(),
        is_const: false,
        from_constructor: true,
        annotations: modifiers.annotations,
        doc_comment: None,
        initializer: None,
        line: line_of(node),
    })
}

fn build_property(node: &Node, root: &Node, source: &str) -> Option<KtProperty> {
    let name = match child_of_kind(node, &["variable_declaration"]) {
        Some(variable) => declaration_name(&variable, source),
        None => declaration_name(node, source),
    }?;

    let modifiers = build_modifiers(node, source);
    Some(KtProperty {
        name,
        visibility: modifiers.visibility(),
        is_const: modifiers.has("const"),
        from_constructor: false,
        annotations: modifiers.annotations,
        doc_comment: find_doc_comment(node, root, source),
        initializer: property_initializer(node, source),
        line: line_of(node),
    })
}

/// Expression after `=`; delegated properties have none
fn property_initializer(node: &Node, source: &str) -> Option<KtExpression> {
    let mut seen_assign = false;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.is_extra() {
            continue;
        }
        if !child.is_named() && node_text(&child, source) == "=" {
            seen_assign = true;
            continue;
        }
        if seen_assign && child.is_named() {
            return Some(build_expression(&child, source));
        }
    }
    None
}

fn is_doc_comment(node: &Node, source: &str) -> bool {
    is_kind(node, BLOCK_COMMENT_KINDS) && node_text(node, source).starts_with("/**")
}

/// KDoc immediately preceding a declaration.
///
/// Grammars differ on whether a leading comment is the first child of the
/// declaration or a preceding sibling, so both places are checked. Only
/// whitespace may separate a preceding comment from the declaration.
fn find_doc_comment(node: &Node, root: &Node, source: &str) -> Option<KDoc> {
    let mut cursor = node.walk();
    let leading = node.children(&mut cursor).next();
    if let Some(first) = leading {
        if is_doc_comment(&first, source) {
            return Some(KDoc {
                text: node_text(&first, source),
                line: line_of(&first),
            });
        }
        if first.kind() == "modifiers" {
            let mut inner = first.walk();
            let first_modifier = first.children(&mut inner).next();
            if let Some(comment) = first_modifier.filter(|c| is_doc_comment(c, source)) {
                return Some(KDoc {
                    text: node_text(&comment, source),
                    line: line_of(&comment),
                });
            }
        }
    }

    let before = source.get(..node.start_byte())?.trim_end();
    if !before.ends_with("*/") {
        return None;
    }
    let end = before.len();
    let comment = root.descendant_for_byte_range(end - 1, end)?;
    if comment.end_byte() == end && is_doc_comment(&comment, source) {
        return Some(KDoc {
            text: node_text(&comment, source),
            line: line_of(&comment),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(source: &str) -> KtFile {
        let mut parser = KotlinLanguage::parser().unwrap();
        let tree = parser.parse(source, None).unwrap();
        build_file(&PathBuf::from("Test.kt"), source, &tree)
    }

    const MY_MOJO: &str = r#"package root

import org.apache.maven.plugins.annotations.Mojo
import org.apache.maven.plugins.annotations.Parameter

/**
 * My mojo
 */
@Mojo(name = "myMojo")
class MyMojo {

    /**
     * My param
     */
    @Parameter(defaultValue = "\${project.compileClasspathElements}", required = true, readonly = true)
    var classpath: List<String>? = null
}
"#;

    #[test]
    fn test_package_and_imports() {
        let file = parse(MY_MOJO);
        assert_eq!(file.package, "root");
        let paths: Vec<_> = file.imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "org.apache.maven.plugins.annotations.Mojo",
                "org.apache.maven.plugins.annotations.Parameter"
            ]
        );
        assert_eq!(file.imports[0].imported_name(), Some("Mojo"));
    }

    #[test]
    fn test_class_annotation_and_doc() {
        let file = parse(MY_MOJO);
        assert_eq!(file.classes.len(), 1);
        let class = &file.classes[0];
        assert_eq!(class.name, "MyMojo");
        assert_eq!(class.kind, ClassKind::Class);
        assert_eq!(class.annotations.len(), 1);
        assert_eq!(class.annotations[0].type_name, "Mojo");
        let arg = &class.annotations[0].arguments[0];
        assert_eq!(arg.name.as_deref(), Some("name"));
        assert_eq!(
            arg.expression,
            KtExpression::StringTemplate(Some("myMojo".to_string()))
        );
        assert_eq!(
            class.doc_comment.as_ref().map(KDoc::normalized).as_deref(),
            Some("My mojo")
        );
    }

    #[test]
    fn test_property_with_doc() {
        let file = parse(MY_MOJO);
        let class = &file.classes[0];
        assert_eq!(class.properties.len(), 1);
        let property = &class.properties[0];
        assert_eq!(property.name, "classpath");
        assert!(!property.from_constructor);
        assert_eq!(property.annotations[0].type_name, "Parameter");
        assert_eq!(
            property.doc_comment.as_ref().map(KDoc::normalized).as_deref(),
            Some("My param")
        );
    }

    #[test]
    fn test_plain_comment_is_not_doc() {
        let file = parse("/* not docs */\nclass A\n\n// nor this\nclass B\n");
        assert_eq!(file.classes.len(), 2);
        assert!(file.classes[0].doc_comment.is_none());
        assert!(file.classes[1].doc_comment.is_none());
    }

    #[test]
    fn test_constructor_properties_come_first() {
        let source = r#"
class Config(val first: String, plain: Int, var second: Boolean) {
    val third = 3
}
"#;
        let file = parse(source);
        let names: Vec<_> = file.classes[0]
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.from_constructor))
            .collect();
        assert_eq!(
            names,
            vec![("first", true), ("second", true), ("third", false)]
        );
    }

    #[test]
    fn test_nested_and_companion() {
        let source = r#"
class Outer {
    class Inner
    companion object {
        const val GOAL = "run"
    }
}
"#;
        let file = parse(source);
        let outer = &file.classes[0];
        let nested: Vec<_> = outer.nested.iter().map(|c| (c.name.as_str(), c.kind)).collect();
        assert_eq!(
            nested,
            vec![
                ("Inner", ClassKind::Class),
                ("Companion", ClassKind::CompanionObject)
            ]
        );
        let companion = outer.companion().unwrap();
        let goal = companion.property("GOAL").unwrap();
        assert!(goal.is_const);
        assert_eq!(
            goal.initializer,
            Some(KtExpression::StringTemplate(Some("run".to_string())))
        );
    }

    #[test]
    fn test_supertypes_and_visibility() {
        let source = "private abstract class Base : AbstractMojo(), Runnable, Comparable<Base>\n";
        let file = parse(source);
        let class = &file.classes[0];
        assert_eq!(class.visibility, Visibility::Private);
        assert_eq!(class.supertypes, vec!["AbstractMojo", "Runnable", "Comparable"]);
    }

    #[test]
    fn test_interface_and_object_kinds() {
        let file = parse("interface I\nobject O\nenum class E { A, B }\n");
        let kinds: Vec<_> = file.classes.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ClassKind::Interface, ClassKind::Object, ClassKind::EnumClass]
        );
        assert_eq!(file.classes[2].enum_entries, vec!["A", "B"]);
    }

    #[test]
    fn test_function_bodies_are_not_visited() {
        let source = "fun build() {\n    class Local\n}\nclass Top\n";
        let file = parse(source);
        let names: Vec<_> = file.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Top"]);
    }

    #[test]
    fn test_syntax_errors_reported() {
        let file = parse("class Broken {\n    val = \n}\nclass Fine\n");
        assert!(!file.syntax_errors.is_empty());
    }

    #[test]
    fn test_import_alias_and_star() {
        let file = parse("import a.b.Mojo as Goal\nimport c.d.*\n");
        assert_eq!(file.imports[0].alias.as_deref(), Some("Goal"));
        assert_eq!(file.imports[0].imported_name(), Some("Goal"));
        assert!(file.imports[1].all_under);
        assert_eq!(file.imports[1].path, "c.d");
        assert_eq!(file.imports[1].imported_name(), None);
    }

    #[test]
    fn test_annotation_name_from_text() {
        assert_eq!(annotation_name_from_text("@field:Foo.Bar(x)"), "Foo.Bar");
        assert_eq!(annotation_name_from_text("@Mojo"), "Mojo");
    }

    #[test]
    fn test_single_line_class_body() {
        let file = parse("package c\n\nopen class A : B() { var a = 1 }\nopen class B : A() { val b = \"}\" }\n");
        let names: Vec<_> = file.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(file.classes[0].supertypes, vec!["B"]);
        assert_eq!(file.classes[0].property("a").map(|p| p.line), Some(3));
        assert_eq!(
            file.classes[1].property("b").and_then(|p| p.initializer.clone()),
            Some(KtExpression::StringTemplate(Some("}".to_string())))
        );
    }

    #[test]
    fn test_annotated_single_line_class_body() {
        let file = parse("@Mojo(name = \"x\")\nopen class A : B() { var a = 1; private val b: Int = 2 }\n");
        assert_eq!(file.classes.len(), 1);
        let class = &file.classes[0];
        assert_eq!(class.annotations[0].type_name, "Mojo");
        let properties: Vec<_> = class.properties.iter().map(|p| (p.name.as_str(), p.visibility)).collect();
        assert_eq!(
            properties,
            vec![("a", Visibility::Public), ("b", Visibility::Private)]
        );
    }

    #[test]
    fn test_split_statements_keeps_strings() {
        let (text, lines) = split_statements("{ val a = \"{;}\" // }\n; var b = 'x' }");
        assert_eq!(text, "{\n val a = \"{;}\" // }\n\n var b = 'x' \n}");
        assert_eq!(lines, vec![0, 0, 1, 1, 1]);
    }
}

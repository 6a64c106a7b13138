//! Gradle script front-end on top of tree-sitter
//!
//! Kotlin scripts go through `tree-sitter-kotlin-sg`, Groovy scripts through
//! `tree-sitter-groovy`. The concrete trees are folded into a [`SyntaxTree`]:
//! wrapper nodes (`call_suffix`, `statements`, `expression_statement`, ...)
//! disappear, calls keep their callee as the node name, and anything the
//! analyzers never look at becomes [`NodeKind::Other`].
//!
//! Grammar errors are handled per line. An error region that stays on one line
//! with balanced brackets is kept as an `Other` node. Any other region points
//! at a line; when that line is balanced on its own it is blanked and the
//! script parsed again, otherwise the script is rejected.

use thiserror::Error;
use tracing::debug;
use tree_sitter::{Language, Node, Parser, Point};

use crate::models::syntax::{NodeKind, ScriptDialect, SyntaxTree, TreeBuilder};

/// Deepest grammar node the conversion descends to
pub const MAX_NESTING: usize = 512;

/// How many lines may be blanked before a script is given up on
const MAX_RECOVERIES: usize = 16;

/// The script could not be turned into a tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {message}")]
pub struct ScriptSyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ScriptSyntaxError {
    fn at(point: Point, message: impl Into<String>) -> Self {
        Self {
            line: point.row + 1,
            column: point.column + 1,
            message: message.into(),
        }
    }
}

/// Parser for one script dialect
#[derive(Debug, Clone, Copy)]
pub struct ScriptParser {
    dialect: ScriptDialect,
}

impl ScriptParser {
    pub fn new(dialect: ScriptDialect) -> Self {
        Self { dialect }
    }

    pub fn kotlin() -> Self {
        Self::new(ScriptDialect::Kotlin)
    }

    pub fn groovy() -> Self {
        Self::new(ScriptDialect::Groovy)
    }

    fn language(&self) -> Language {
        match self.dialect {
            ScriptDialect::Kotlin => tree_sitter_kotlin_sg::LANGUAGE.into(),
            ScriptDialect::Groovy => tree_sitter_groovy::LANGUAGE.into(),
        }
    }

    pub fn parse(&self, src: &str) -> Result<SyntaxTree, ScriptSyntaxError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language())
            .map_err(|e| ScriptSyntaxError::at(Point::default(), format!("grammar unavailable: {e}")))?;

        let mut text = src.to_string();
        for _ in 0..=MAX_RECOVERIES {
            let tree = parser
                .parse(&text, None)
                .ok_or_else(|| ScriptSyntaxError::at(Point::default(), "parser produced no tree"))?;

            let Some(fault) = first_fault(tree.root_node(), &text) else {
                return Converter::new(self.dialect, &text).run(tree.root_node());
            };
            text = blank_line(text, fault)?;
        }

        Err(ScriptSyntaxError::at(Point::default(), "too many syntax errors"))
    }
}

/// First error region in document order that cannot be kept as it is
fn first_fault(root: Node<'_>, src: &str) -> Option<Point> {
    if !root.has_error() {
        return None;
    }

    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_missing() {
            return Some(node.start_position());
        }
        if node.is_error() {
            if !is_contained(node, src) {
                return Some(last_leaf(node).start_position());
            }
        } else if node.has_error() && cursor.goto_first_child() {
            continue;
        }

        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// An error region on a single line whose brackets pair up
fn is_contained(node: Node<'_>, src: &str) -> bool {
    node.start_position().row == node.end_position().row
        && src
            .get(node.start_byte()..node.end_byte())
            .is_some_and(is_balanced)
}

fn last_leaf(mut node: Node<'_>) -> Node<'_> {
    while node.child_count() > 0 {
        match node.child(node.child_count() - 1) {
            Some(child) => node = child,
            None => break,
        }
    }
    node
}

/// Brackets nest properly and every quote is closed; `//` ends the scan
fn is_balanced(text: &str) -> bool {
    let mut open = Vec::new();
    let mut quote = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '/' if chars.peek() == Some(&'/') => break,
            '(' | '[' | '{' => open.push(c),
            ')' => {
                if open.pop() != Some('(') {
                    return false;
                }
            }
            ']' => {
                if open.pop() != Some('[') {
                    return false;
                }
            }
            '}' => {
                if open.pop() != Some('{') {
                    return false;
                }
            }
            _ => {}
        }
    }

    open.is_empty() && quote.is_none()
}

/// Replace the line holding `fault` with spaces, keeping every byte offset
fn blank_line(text: String, fault: Point) -> Result<String, ScriptSyntaxError> {
    let start = match fault.row {
        0 => 0,
        row => match text.match_indices('\n').nth(row - 1) {
            Some((newline, _)) => newline + 1,
            None => return Err(ScriptSyntaxError::at(fault, "syntax error at end of script")),
        },
    };
    let end = text[start..].find('\n').map_or(text.len(), |i| start + i);
    let line = &text[start..end];

    if line.trim().is_empty() || !is_balanced(line) {
        return Err(ScriptSyntaxError::at(fault, format!("syntax error near `{}`", line.trim())));
    }
    debug!(line = fault.row + 1, "skipping line the grammar rejects");

    let mut bytes = text.into_bytes();
    bytes[start..end].fill(b' ');
    String::from_utf8(bytes).map_err(|e| ScriptSyntaxError::at(fault, e.to_string()))
}

/// What a grammar node turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// A node whose children are converted too
    Node(NodeKind),
    /// A node whose children are dropped
    Leaf(NodeKind),
    /// No node of its own, children go to the enclosing node
    Transparent,
    Skip,
}

fn kotlin_role(node: Node<'_>) -> Role {
    match node.kind() {
        "source_file" => Role::Node(NodeKind::Script),
        "call_expression" => Role::Node(NodeKind::Call),
        "lambda_literal" | "control_structure_body" => Role::Node(NodeKind::Block),
        "value_arguments" => Role::Node(NodeKind::Arguments),
        "value_argument" if has_child_kind(node, "=") => Role::Node(NodeKind::Assignment),
        "infix_expression" => Role::Node(NodeKind::Binary),
        "assignment" | "property_declaration" => Role::Node(NodeKind::Assignment),
        "navigation_expression" => Role::Node(NodeKind::Reference),
        "simple_identifier" => Role::Leaf(NodeKind::Reference),
        "string_literal" => Role::Leaf(NodeKind::StringLiteral),
        "integer_literal" | "long_literal" | "hex_literal" | "bin_literal" | "unsigned_literal"
        | "real_literal" | "boolean_literal" | "character_literal" | "null_literal" => Role::Leaf(NodeKind::Literal),
        "line_comment" | "multiline_comment" | "shebang_line" => Role::Skip,
        "statements" | "call_suffix" | "annotated_lambda" | "value_argument" | "navigation_suffix"
        | "directly_assignable_expression" => Role::Transparent,
        _ if node.is_named() => Role::Node(NodeKind::Other),
        _ => Role::Skip,
    }
}

fn groovy_role(node: Node<'_>, parent: &str) -> Role {
    match node.kind() {
        "program" => Role::Node(NodeKind::Script),
        "method_invocation" => Role::Node(NodeKind::MethodCall),
        "juxt_function_call" => Role::Node(NodeKind::Command),
        "closure" | "block" => Role::Node(NodeKind::Block),
        "argument_list" if parent == "juxt_function_call" => Role::Transparent,
        "argument_list" => Role::Node(NodeKind::Arguments),
        "assignment_expression" => Role::Node(NodeKind::Assignment),
        "local_variable_declaration" => match node
            .child_by_field_name("declarator")
            .and_then(|declarator| declarator.child_by_field_name("value"))
        {
            Some(_) => Role::Node(NodeKind::Assignment),
            None => Role::Leaf(NodeKind::Reference),
        },
        "field_access" => Role::Node(NodeKind::Reference),
        "identifier" | "type_identifier" => Role::Leaf(NodeKind::Reference),
        "string_literal" | "character_literal" => Role::Leaf(NodeKind::StringLiteral),
        "decimal_integer_literal" | "hex_integer_literal" | "octal_integer_literal" | "binary_integer_literal"
        | "decimal_floating_point_literal" | "hex_floating_point_literal" | "true" | "false" | "null_literal" => {
            Role::Leaf(NodeKind::Literal)
        }
        "line_comment" | "block_comment" | "shebang" => Role::Skip,
        "expression_statement" | "variable_declarator" => Role::Transparent,
        _ if node.is_named() => Role::Node(NodeKind::Other),
        _ => Role::Skip,
    }
}

fn has_child_kind(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == kind);
    found
}

/// Node of the intermediate tree; merging Groovy commands needs the whole
/// statement list before anything is emitted
#[derive(Debug)]
struct Draft {
    kind: NodeKind,
    name: Option<String>,
    start: usize,
    end: usize,
    children: Vec<usize>,
}

struct Pending<'t> {
    node: Node<'t>,
    parent: Option<usize>,
    parent_kind: &'static str,
    depth: usize,
}

struct Converter<'s> {
    dialect: ScriptDialect,
    src: &'s str,
    line_starts: Vec<usize>,
    drafts: Vec<Draft>,
}

impl<'s> Converter<'s> {
    fn new(dialect: ScriptDialect, src: &'s str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(src.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            dialect,
            src,
            line_starts,
            drafts: Vec::new(),
        }
    }

    fn run(mut self, root: Node<'_>) -> Result<SyntaxTree, ScriptSyntaxError> {
        self.collect(root)?;
        if self.dialect == ScriptDialect::Groovy {
            self.merge_commands();
        }
        Ok(self.emit())
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        let src = self.src;
        src.get(node.start_byte()..node.end_byte()).unwrap_or("")
    }

    fn row_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|start| *start <= offset).saturating_sub(1)
    }

    fn role(&self, node: Node<'_>, parent_kind: &str) -> Role {
        match self.dialect {
            ScriptDialect::Kotlin => kotlin_role(node),
            ScriptDialect::Groovy => groovy_role(node, parent_kind),
        }
    }

    /// Pre-order walk over the grammar tree with an explicit stack
    fn collect(&mut self, root: Node<'_>) -> Result<(), ScriptSyntaxError> {
        let mut stack = vec![Pending {
            node: root,
            parent: None,
            parent_kind: "",
            depth: 0,
        }];

        while let Some(Pending {
            node,
            parent,
            parent_kind,
            depth,
        }) = stack.pop()
        {
            if depth > MAX_NESTING {
                return Err(ScriptSyntaxError::at(
                    node.start_position(),
                    format!("nesting deeper than {MAX_NESTING} levels"),
                ));
            }

            let role = match depth {
                0 => Role::Node(NodeKind::Script),
                _ => self.role(node, parent_kind),
            };
            let (attach, descend) = match role {
                Role::Skip => continue,
                Role::Transparent => (parent, true),
                Role::Leaf(kind) => (Some(self.add(node, kind, parent)), false),
                Role::Node(kind) => (Some(self.add(node, kind, parent)), true),
            };
            if !descend {
                continue;
            }

            let skipped = callee(node).map(|callee| callee.id());
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node
                .children(&mut cursor)
                .filter(|child| Some(child.id()) != skipped)
                .collect();
            for child in children.into_iter().rev() {
                stack.push(Pending {
                    node: child,
                    parent: attach,
                    parent_kind: node.kind(),
                    depth: depth + 1,
                });
            }
        }

        Ok(())
    }

    fn add(&mut self, node: Node<'_>, kind: NodeKind, parent: Option<usize>) -> usize {
        let (start, end) = match kind {
            NodeKind::Script => (0, self.src.len()),
            _ => (node.start_byte(), node.start_byte() + self.text(node).trim_end().len()),
        };
        let name = match kind {
            NodeKind::Call | NodeKind::MethodCall | NodeKind::Command => callee_name(node, self.src),
            NodeKind::Assignment => assigned_name(node, self.src),
            NodeKind::Reference => last_identifier(node, self.src),
            _ => None,
        };

        let id = self.drafts.len();
        self.drafts.push(Draft {
            kind,
            name,
            start,
            end,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.drafts[parent].children.push(id);
        }
        id
    }

    /// Fold Groovy statements sharing a line into one command
    ///
    /// The grammar splits `id 'x' version '1' apply false` and
    /// `api project(':core')` into sibling statements.
    fn merge_commands(&mut self) {
        for container in 0..self.drafts.len() {
            if !matches!(self.drafts[container].kind, NodeKind::Script | NodeKind::Block) {
                continue;
            }
            let statements = std::mem::take(&mut self.drafts[container].children);
            let mut merged = Vec::with_capacity(statements.len());
            let mut run: Vec<usize> = Vec::new();

            for statement in statements {
                if let Some(&previous) = run.last() {
                    if !self.continues_line(previous, statement) {
                        merged.extend(self.fold(&run));
                        run.clear();
                    }
                }
                run.push(statement);
            }
            merged.extend(self.fold(&run));

            self.drafts[container].children = merged;
        }
    }

    fn continues_line(&self, previous: usize, next: usize) -> bool {
        let (previous, next) = (&self.drafts[previous], &self.drafts[next]);
        let ends_with_block = previous
            .children
            .last()
            .is_some_and(|child| self.drafts[*child].kind == NodeKind::Block);
        let between = self.src.get(previous.end..next.start).unwrap_or(";");

        !ends_with_block && !between.contains(';') && self.row_of(previous.end) == self.row_of(next.start)
    }

    fn fold(&mut self, run: &[usize]) -> Option<usize> {
        let (&first, rest) = run.split_first()?;
        let Some(&last) = rest.last() else {
            return Some(first);
        };

        let head = &self.drafts[first];
        let mut children = match head.kind {
            NodeKind::Command => head.children.clone(),
            _ => vec![first],
        };
        children.extend_from_slice(rest);
        let draft = Draft {
            kind: NodeKind::Command,
            name: head.name.clone(),
            start: head.start,
            end: self.drafts[last].end,
            children,
        };

        self.drafts.push(draft);
        Some(self.drafts.len() - 1)
    }

    fn emit(self) -> SyntaxTree {
        enum Step {
            Open(usize),
            Close,
        }

        let mut builder = TreeBuilder::new().with_dialect(self.dialect);
        if self.drafts.is_empty() {
            return builder.build();
        }

        let mut steps = vec![Step::Open(0)];
        while let Some(step) = steps.pop() {
            let id = match step {
                Step::Open(id) => id,
                Step::Close => {
                    builder.finish_node();
                    continue;
                }
            };
            let draft = &self.drafts[id];
            let text = self.src.get(draft.start..draft.end).unwrap_or("");
            if draft.children.is_empty() {
                builder.leaf(draft.kind, draft.name.as_deref(), text);
                continue;
            }
            builder.start_node(draft.kind, draft.name.as_deref(), text);
            steps.push(Step::Close);
            steps.extend(draft.children.iter().rev().map(|child| Step::Open(*child)));
        }

        builder.build()
    }
}

/// The child naming a call, when it is a plain identifier
fn callee(node: Node<'_>) -> Option<Node<'_>> {
    let name = match node.kind() {
        "call_expression" => node.named_child(0)?,
        "method_invocation" | "juxt_function_call" => node.child_by_field_name("name")?,
        _ => return None,
    };
    matches!(name.kind(), "simple_identifier" | "identifier").then_some(name)
}

fn callee_name(node: Node<'_>, src: &str) -> Option<String> {
    match node.kind() {
        "call_expression" => last_identifier(node.named_child(0)?, src),
        "method_invocation" | "juxt_function_call" => {
            let name = node.child_by_field_name("name")?;
            match name.kind() {
                "method_invocation" => callee_name(name, src),
                _ => last_identifier(name, src),
            }
        }
        _ => None,
    }
}

fn assigned_name(node: Node<'_>, src: &str) -> Option<String> {
    match node.kind() {
        "assignment" | "value_argument" => last_identifier(node.named_child(0)?, src),
        "property_declaration" => {
            let mut cursor = node.walk();
            let declaration = node
                .named_children(&mut cursor)
                .find(|child| child.kind() == "variable_declaration")?;
            last_identifier(declaration, src)
        }
        "assignment_expression" => last_identifier(node.child_by_field_name("left")?, src),
        "local_variable_declaration" => {
            let declarator = node.child_by_field_name("declarator")?;
            last_identifier(declarator.child_by_field_name("name")?, src)
        }
        _ => None,
    }
}

/// Rightmost identifier of a (possibly dotted) name, backticks removed
fn last_identifier(mut node: Node<'_>, src: &str) -> Option<String> {
    loop {
        match node.kind() {
            "simple_identifier" | "identifier" | "type_identifier" => {
                let text = src.get(node.start_byte()..node.end_byte())?;
                return Some(text.trim_matches('`').to_string());
            }
            "local_variable_declaration" => {
                node = node.child_by_field_name("declarator")?.child_by_field_name("name")?;
            }
            _ => {
                let count = node.named_child_count();
                node = node.named_child(count.checked_sub(1)?)?;
            }
        }
    }
}

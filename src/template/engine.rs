//! Block-structured template engine.
//!
//! Parsing and execution are separate steps so that a broken template is
//! reported once, before any data is rendered, while a data problem only
//! fails the render it occurred in.

use crate::error::StageTimeError;
use serde_json::{Value, json};
use std::fmt;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Error type for template parsing and execution failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{{` was found without a matching `}}`.
    UnclosedAction {
        /// The position of the unmatched `{{`.
        position: usize,
    },
    /// An action with nothing inside (e.g. `{{ }}`).
    EmptyAction {
        /// The position of the empty action.
        position: usize,
    },
    /// An action that is not a field reference, `range`, `if`, or `end`.
    UnknownAction {
        /// The action text.
        action: String,
        /// The position of the action.
        position: usize,
    },
    /// An `{{ end }}` with no open block.
    UnexpectedEnd {
        /// The position of the stray `end`.
        position: usize,
    },
    /// A `range` or `if` block never closed by `{{ end }}`.
    UnclosedBlock {
        /// `range` or `if`.
        keyword: &'static str,
        /// The position of the block's opening action.
        position: usize,
    },
    /// A field referenced by the template is absent from the scope.
    MissingField {
        /// The referenced field path.
        name: String,
        /// The position of the reference.
        position: usize,
    },
    /// A list or map was interpolated as text.
    NotScalar {
        /// The referenced field path.
        name: String,
        /// The position of the reference.
        position: usize,
    },
    /// `range` over a scalar value.
    NotIterable {
        /// The referenced field path.
        name: String,
        /// The position of the `range` action.
        position: usize,
    },
}

impl TemplateError {
    /// Whether the error comes from the template text rather than the data.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            TemplateError::UnclosedAction { .. }
                | TemplateError::EmptyAction { .. }
                | TemplateError::UnknownAction { .. }
                | TemplateError::UnexpectedEnd { .. }
                | TemplateError::UnclosedBlock { .. }
        )
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UnclosedAction { position } => {
                write!(f, "unclosed '{{{{' at position {} in template", position)
            }
            TemplateError::EmptyAction { position } => {
                write!(f, "empty action at position {} in template", position)
            }
            TemplateError::UnknownAction { action, position } => {
                write!(
                    f,
                    "unknown action '{}' at position {} in template",
                    action, position
                )
            }
            TemplateError::UnexpectedEnd { position } => {
                write!(
                    f,
                    "'end' without an open block at position {} in template",
                    position
                )
            }
            TemplateError::UnclosedBlock { keyword, position } => {
                write!(
                    f,
                    "'{}' block opened at position {} is never closed",
                    keyword, position
                )
            }
            TemplateError::MissingField { name, position } => {
                write!(
                    f,
                    "field '{}' referenced at position {} is not defined",
                    name, position
                )
            }
            TemplateError::NotScalar { name, position } => {
                write!(
                    f,
                    "field '{}' at position {} is a list or map and cannot be printed",
                    name, position
                )
            }
            TemplateError::NotIterable { name, position } => {
                write!(
                    f,
                    "cannot range over scalar field '{}' at position {}",
                    name, position
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}

impl From<TemplateError> for StageTimeError {
    fn from(err: TemplateError) -> Self {
        if err.is_parse_error() {
            StageTimeError::TemplateConfiguration(err.to_string())
        } else {
            StageTimeError::TemplateExecution(err.to_string())
        }
    }
}

/// A parsed template, ready to execute against any number of scopes.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Print {
        path: FieldPath,
        position: usize,
    },
    Range {
        path: FieldPath,
        position: usize,
        body: Vec<Node>,
    },
    If {
        path: FieldPath,
        position: usize,
        body: Vec<Node>,
    },
}

/// A dotted field path; empty means the current scope (`.`).
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldPath(Vec<String>);

impl FieldPath {
    fn parse(text: &str) -> Option<Self> {
        if text == "." {
            return Some(Self(Vec::new()));
        }
        let rest = text.strip_prefix('.')?;
        let segments: Vec<String> = rest.split('.').map(str::to_string).collect();
        if segments.iter().all(|s| is_identifier(s)) {
            Some(Self(segments))
        } else {
            None
        }
    }

    fn resolve<'a>(&self, scope: &'a Value) -> Option<&'a Value> {
        self.0
            .iter()
            .try_fold(scope, |current, segment| current.as_object()?.get(segment))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, ".")
        } else {
            write!(f, ".{}", self.0.join("."))
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Clone, Copy)]
enum BlockKind {
    Range,
    If,
}

impl BlockKind {
    fn keyword(self) -> &'static str {
        match self {
            BlockKind::Range => "range",
            BlockKind::If => "if",
        }
    }
}

/// An open block while parsing: its header and the nodes collected so far.
struct Frame {
    header: Option<(BlockKind, FieldPath, usize)>,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template text.
    ///
    /// # Errors
    ///
    /// Any syntax problem; see `TemplateError::is_parse_error`.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut stack = vec![Frame {
            header: None,
            nodes: Vec::new(),
        }];
        let mut cursor = 0;

        while let Some(offset) = source[cursor..].find(OPEN) {
            let start = cursor + offset;
            if start > cursor {
                push_node(&mut stack, Node::Text(source[cursor..start].to_string()));
            }

            let inner_start = start + OPEN.len();
            let Some(close) = source[inner_start..].find(CLOSE) else {
                return Err(TemplateError::UnclosedAction { position: start });
            };
            let action = source[inner_start..inner_start + close].trim();
            cursor = inner_start + close + CLOSE.len();

            if action.is_empty() {
                return Err(TemplateError::EmptyAction { position: start });
            }

            if action == "end" {
                let frame = stack.pop().filter(|f| f.header.is_some());
                let Some(Frame {
                    header: Some((kind, path, position)),
                    nodes: body,
                }) = frame
                else {
                    return Err(TemplateError::UnexpectedEnd { position: start });
                };
                let node = match kind {
                    BlockKind::Range => Node::Range {
                        path,
                        position,
                        body,
                    },
                    BlockKind::If => Node::If {
                        path,
                        position,
                        body,
                    },
                };
                push_node(&mut stack, node);
                continue;
            }

            let (kind, target) = if let Some(rest) = action.strip_prefix("range ") {
                (Some(BlockKind::Range), rest.trim())
            } else if let Some(rest) = action.strip_prefix("if ") {
                (Some(BlockKind::If), rest.trim())
            } else {
                (None, action)
            };

            let Some(path) = FieldPath::parse(target) else {
                return Err(TemplateError::UnknownAction {
                    action: action.to_string(),
                    position: start,
                });
            };

            match kind {
                Some(kind) => stack.push(Frame {
                    header: Some((kind, path, start)),
                    nodes: Vec::new(),
                }),
                None => push_node(
                    &mut stack,
                    Node::Print {
                        path,
                        position: start,
                    },
                ),
            }
        }

        if cursor < source.len() {
            push_node(&mut stack, Node::Text(source[cursor..].to_string()));
        }

        // Only the root frame may remain.
        match stack.pop() {
            Some(Frame {
                header: Some((kind, _, position)),
                ..
            }) => Err(TemplateError::UnclosedBlock {
                keyword: kind.keyword(),
                position,
            }),
            Some(Frame { nodes, .. }) => Ok(Self { nodes }),
            None => Ok(Self { nodes: Vec::new() }),
        }
    }

    /// Render the template against a scope.
    ///
    /// # Errors
    ///
    /// `MissingField`, `NotScalar`, or `NotIterable` when the scope does not
    /// fit the template.
    pub fn execute(&self, scope: &Value) -> Result<String, TemplateError> {
        let mut out = String::new();
        render_nodes(&self.nodes, scope, &mut out)?;
        Ok(out)
    }
}

fn push_node(stack: &mut [Frame], node: Node) {
    if let Some(frame) = stack.last_mut() {
        frame.nodes.push(node);
    }
}

fn render_nodes(nodes: &[Node], scope: &Value, out: &mut String) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Print { path, position } => {
                let value = lookup(path, *position, scope)?;
                match value {
                    Value::String(s) => out.push_str(s),
                    Value::Number(n) => out.push_str(&n.to_string()),
                    Value::Bool(b) => out.push_str(&b.to_string()),
                    Value::Null => {}
                    Value::Array(_) | Value::Object(_) => {
                        return Err(TemplateError::NotScalar {
                            name: path.to_string(),
                            position: *position,
                        });
                    }
                }
            }
            Node::Range {
                path,
                position,
                body,
            } => match lookup(path, *position, scope)? {
                Value::Array(items) => {
                    for item in items {
                        render_nodes(body, item, out)?;
                    }
                }
                Value::Object(entries) => {
                    for (key, value) in entries {
                        let entry = json!({ "Key": key, "Value": value });
                        render_nodes(body, &entry, out)?;
                    }
                }
                Value::Null => {}
                _ => {
                    return Err(TemplateError::NotIterable {
                        name: path.to_string(),
                        position: *position,
                    });
                }
            },
            Node::If {
                path,
                position,
                body,
            } => {
                if is_truthy(lookup(path, *position, scope)?) {
                    render_nodes(body, scope, out)?;
                }
            }
        }
    }
    Ok(())
}

fn lookup<'a>(
    path: &FieldPath,
    position: usize,
    scope: &'a Value,
) -> Result<&'a Value, TemplateError> {
    path.resolve(scope).ok_or_else(|| TemplateError::MissingField {
        name: path.to_string(),
        position,
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

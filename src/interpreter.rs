//! Tree-walking interpreter for the template preprocessor.
//!
//! Walks a parsed tree, resolves variable references against the local and
//! environment tables, evaluates boolean/string expressions, and emits the
//! final text. `%PRINT` output goes to an injected sink so the interpreter
//! stays testable without capturing the real console.

use std::io::Write;

use indexmap::IndexMap;

use crate::ast::{Arity, Node, NodeKind};
use crate::error::{Error, Result};

/// The two name→value tables consulted when resolving a name, in order:
/// local variables first, then environment variables.
#[derive(Debug, Clone, Default)]
pub struct InterpreterContext {
    pub local_variables: IndexMap<String, String>,
    pub environment_variables: IndexMap<String, String>,
}

impl InterpreterContext {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.local_variables
            .get(name)
            .or_else(|| self.environment_variables.get(name))
            .map(String::as_str)
    }
}

/// Strips one pair of surrounding double quotes, if present.
fn unquoted(value: &str) -> &str {
    match value.strip_prefix('"') {
        Some(rest) => rest.strip_suffix('"').unwrap_or(rest),
        None => value,
    }
}

fn encode_boolean(value: bool) -> String {
    if value { "TRUE" } else { "FALSE" }.to_string()
}

/// Coerces a literal to a boolean: `TRUE`/`FALSE`, or a non-negative integer
/// treated as zero/nonzero. Anything else is an evaluation error.
pub fn decay_to_boolean(literal: &str) -> Result<bool> {
    if literal.is_empty() {
        return Err(Error::Evaluation("Cannot decay an empty literal.".to_string()));
    }

    match literal {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        _ => literal.parse::<u64>().map(|value| value != 0).map_err(|_| {
            Error::Evaluation(format!("Couldn't decay literal \"{literal}\" to a boolean."))
        }),
    }
}

/// Interprets one tree against a read-only context, accumulating the output
/// text and writing `%PRINT` results to `sink`.
pub struct Interpreter<'a, W: Write> {
    context: &'a InterpreterContext,
    sink: W,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(context: &'a InterpreterContext, sink: W) -> Self {
        Self { context, sink }
    }

    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Walks the tree rooted at `root`, following the sibling chain, and
    /// returns the produced text.
    pub fn traverse(&mut self, root: &Node) -> Result<String> {
        let mut output = String::new();
        self.traverse_chain(root, &mut output)?;
        Ok(output)
    }

    fn traverse_chain(&mut self, head: &Node, output: &mut String) -> Result<()> {
        let mut cursor = Some(head);
        while let Some(node) = cursor {
            self.traverse_node(node, output)?;
            cursor = node.next.as_deref();
        }
        Ok(())
    }

    fn traverse_node(&mut self, node: &Node, output: &mut String) -> Result<()> {
        match &node.kind {
            NodeKind::Content(text) => {
                output.push_str(text);
                // One newline per content chunk, except for the chunk that is
                // itself a lone newline.
                if text != "\n" {
                    output.push('\n');
                }
                Ok(())
            }
            NodeKind::Conditional { condition, then_branch, else_branch } => {
                let value = self.evaluate_expression(condition)?;
                if decay_to_boolean(&value)? {
                    if let Some(branch) = then_branch {
                        self.traverse_chain(branch, output)?;
                    }
                } else if let Some(branch) = else_branch {
                    self.traverse_node(branch, output)?;
                }
                Ok(())
            }
            NodeKind::Unconditional { branch } => {
                if let Some(branch) = branch {
                    self.traverse_chain(branch, output)?;
                }
                Ok(())
            }
            NodeKind::Match { selector, cases, default } => {
                let selected = self.evaluate_expression(selector)?;

                let mut cursor = cases.as_deref();
                while let Some(case) = cursor {
                    let NodeKind::MatchCase { label, branch } = &case.kind else {
                        return Err(Error::Evaluation(format!(
                            "A \"%SWITCH\" case was expected, but \"{}\" was reached.",
                            case.kind_name()
                        )));
                    };
                    let NodeKind::Literal(label) = &label.kind else {
                        return Err(Error::Evaluation(
                            "A \"%CASE\" label must be a literal.".to_string(),
                        ));
                    };
                    if unquoted(label) == selected {
                        if let Some(branch) = branch {
                            self.traverse_chain(branch, output)?;
                        }
                        return Ok(());
                    }
                    cursor = case.next.as_deref();
                }

                if let Some(default) = default {
                    let NodeKind::MatchCase { branch, .. } = &default.kind else {
                        return Err(Error::Evaluation(format!(
                            "A \"%DEFAULT\" case was expected, but \"{}\" was reached.",
                            default.kind_name()
                        )));
                    };
                    if let Some(branch) = branch {
                        self.traverse_chain(branch, output)?;
                    }
                }
                Ok(())
            }
            NodeKind::Print { content } => {
                let text = self.evaluate_expression(content)?;
                writeln!(self.sink, "{text}")?;
                Ok(())
            }
            _ => Err(Error::Evaluation(format!(
                "Unexpected node of kind \"{}\" was reached.",
                node.kind_name()
            ))),
        }
    }

    /// Evaluates an expression node to its string form.
    pub fn evaluate_expression(&mut self, node: &Node) -> Result<String> {
        let NodeKind::Expression(value) = &node.kind else {
            return Err(Error::Evaluation(format!(
                "An expression was expected, but \"{}\" was reached.",
                node.kind_name()
            )));
        };

        match &value.kind {
            NodeKind::Operator { name, arity, lhs, rhs } => {
                let lhs = lhs.as_deref().ok_or_else(|| {
                    Error::Evaluation(format!(
                        "Operator \"{name}\" must have at least one operand."
                    ))
                })?;
                let lhs = self.reduce_operand(lhs)?;

                match arity {
                    Arity::Unary => match name.as_str() {
                        "NOT" => Ok(encode_boolean(!decay_to_boolean(&lhs)?)),
                        other => Err(Error::Internal(format!(
                            "Unrecognized unary operator \"{other}\"."
                        ))),
                    },
                    Arity::Binary => {
                        let rhs = rhs.as_deref().ok_or_else(|| {
                            Error::Evaluation(format!(
                                "Operator \"{name}\" expects both a left-hand and a right-hand \
                                 side, but only the former was given."
                            ))
                        })?;
                        let rhs = self.reduce_operand(rhs)?;

                        // Operands resolve by exact variable lookup only;
                        // in-place interpolation is a plain-literal affair.
                        let lhs = self.resolve_operand(&lhs);
                        let rhs = self.resolve_operand(&rhs);

                        let result = match name.as_str() {
                            "CONTAINS" => lhs.contains(&rhs),
                            "EQUALS" => lhs == rhs,
                            "AND" => lhs == "TRUE" && rhs == "TRUE",
                            "OR" => lhs == "TRUE" || rhs == "TRUE",
                            other => {
                                return Err(Error::Internal(format!(
                                    "Unrecognized binary operator \"{other}\"."
                                )))
                            }
                        };
                        Ok(encode_boolean(result))
                    }
                }
            }
            NodeKind::Literal(value) => {
                let unquoted = unquoted(value);
                if let Some(resolved) = self.context.lookup(unquoted) {
                    return Ok(resolved.to_string());
                }
                self.interpolate(unquoted)
            }
            _ => Err(Error::Evaluation(format!(
                "An expression must hold a literal or an operator, but \"{}\" was reached.",
                value.kind_name()
            ))),
        }
    }

    /// Reduces an operand to its literal text: nested expressions evaluate
    /// recursively, literals pass through as written.
    fn reduce_operand(&mut self, node: &Node) -> Result<String> {
        match &node.kind {
            NodeKind::Expression(_) => self.evaluate_expression(node),
            NodeKind::Literal(value) => Ok(value.clone()),
            _ => Err(Error::Evaluation(format!(
                "An operand must decay to a literal, but \"{}\" was reached.",
                node.kind_name()
            ))),
        }
    }

    /// Unquotes an operand and resolves it by exact name lookup, falling back
    /// to the text itself.
    fn resolve_operand(&self, text: &str) -> String {
        let unquoted = unquoted(text);
        match self.context.lookup(unquoted) {
            Some(resolved) => resolved.to_string(),
            None => unquoted.to_string(),
        }
    }

    /// Splices `<name>` references inside a literal in place. References may
    /// nest one level: the inner reference resolves first and its value
    /// becomes part of the outer name.
    fn interpolate(&self, text: &str) -> Result<String> {
        if text.is_empty() {
            return Err(Error::Evaluation("Cannot interpolate an empty literal.".to_string()));
        }

        let chars: Vec<char> = text.chars().collect();
        let mut result = String::new();
        let mut index = 0;

        while index < chars.len() {
            if chars[index] == '<' {
                result.push_str(&self.resolve_reference(&chars, &mut index)?);
            } else {
                result.push(chars[index]);
                index += 1;
            }
        }

        Ok(result)
    }

    fn resolve_reference(&self, chars: &[char], index: &mut usize) -> Result<String> {
        let mut name = String::new();

        *index += 1;
        while *index < chars.len() && chars[*index] != '>' {
            if chars[*index] == '<' {
                name.push_str(&self.resolve_reference(chars, index)?);
            } else {
                name.push(chars[*index]);
                *index += 1;
            }
        }

        if *index >= chars.len() {
            return Err(Error::Evaluation(format!(
                "Reference \"<{name}\" is missing its \">\"."
            )));
        }
        *index += 1;

        match self.context.lookup(&name) {
            Some(resolved) => Ok(resolved.to_string()),
            None => Ok(name),
        }
    }
}

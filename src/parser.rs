//! Recursive-descent parser for the template preprocessor.
//!
//! Consumes the token sequence and builds one tree per file. The `depth`
//! argument threaded through the recursion distinguishes a nested sub-parse
//! (depth > 0, which returns its single resulting node to the caller) from a
//! top-level or body sequence (depth == 0, where statement nodes are chained
//! through `next` with the remainder of the current body).

use crate::ast::{Arity, Node, NodeKind, DEFAULT_LABEL};
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};

/// Index cursor over the token sequence with one-token push-back.
pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

fn operator_arity(name: &str) -> Option<Arity> {
    match name {
        "NOT" => Some(Arity::Unary),
        "AND" | "OR" | "EQUALS" | "CONTAINS" => Some(Arity::Binary),
        _ => None,
    }
}

/// Attaches `chain` after the last sibling of `node`.
fn append_next(node: &mut Node, chain: Option<Box<Node>>) {
    match node.next.as_mut() {
        Some(next) => append_next(next, chain),
        None => node.next = chain,
    }
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Parses the whole token sequence into one tree. An empty sequence
    /// yields `None`.
    pub fn parse(&mut self) -> Result<Option<Box<Node>>> {
        self.parse_at(0)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn take(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn untake(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    fn peek_keyword(&self) -> Option<&str> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Keyword => Some(token.data.as_str()),
            _ => None,
        }
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        matches!(self.peek(), Some(token) if token.kind == kind)
    }

    /// Consumes the `END` keyword closing `statement`. The `%` before it has
    /// already been consumed by the sub-parse that returned.
    fn expect_end(&mut self, statement: &str) -> Result<()> {
        match self.peek_keyword() {
            Some("END") => {
                self.take();
                Ok(())
            }
            _ => Err(Error::Syntax(format!(
                "A \"{statement}\" statement missing its \"%END\" was reached."
            ))),
        }
    }

    /// Consumes a full `%END` (percent and keyword) closing `statement`.
    fn expect_percent_end(&mut self, statement: &str) -> Result<()> {
        match self.take() {
            Some(token) if token.kind == TokenKind::Percent => self.expect_end(statement),
            _ => Err(Error::Syntax(format!(
                "A \"{statement}\" statement missing its \"%END\" was reached."
            ))),
        }
    }

    /// Parses a bracketed label and unwraps it down to its literal.
    fn parse_label(&mut self, depth: usize) -> Result<Box<Node>> {
        let node = self.parse_at(depth)?.ok_or_else(|| {
            Error::Syntax("A \"%CASE\" statement is missing its label.".to_string())
        })?;

        match node.kind {
            NodeKind::Expression(value) if matches!(value.kind, NodeKind::Literal(_)) => Ok(value),
            _ => Err(Error::Syntax(
                "A \"%CASE\" label must be a bracketed literal.".to_string(),
            )),
        }
    }

    fn parse_at(&mut self, depth: usize) -> Result<Option<Box<Node>>> {
        let mut root: Option<Box<Node>> = None;

        while let Some(token) = self.take() {
            match token.kind {
                TokenKind::Percent => {
                    let keyword = match self.peek_keyword() {
                        Some(keyword) => keyword.to_string(),
                        None => {
                            return Err(Error::Syntax(
                                "Expected a keyword after \"%\".".to_string(),
                            ))
                        }
                    };

                    // `%END` terminates the enclosing body; the keyword is
                    // left for the enclosing statement to verify.
                    if keyword == "END" {
                        return Ok(root);
                    }
                    self.take();

                    match keyword.as_str() {
                        "IF" => {
                            let condition = self.parse_at(depth + 1)?.ok_or_else(|| {
                                Error::Syntax(
                                    "An \"%IF\" statement is missing its condition.".to_string(),
                                )
                            })?;
                            let then_branch = self.parse_at(depth + 1)?;
                            let else_branch = self.parse_at(depth + 1)?;
                            self.expect_end("%IF")?;

                            let mut node = Node::new(NodeKind::Conditional {
                                condition,
                                then_branch,
                                else_branch,
                            });
                            if depth != 0 {
                                return Ok(Some(node));
                            }
                            node.next = self.parse_at(depth)?;
                            root = Some(node);
                        }
                        "ELSE" => {
                            let branch = self.parse_at(depth + 1)?;
                            root = Some(Node::new(NodeKind::Unconditional { branch }));
                        }
                        "SWITCH" => {
                            let selector = self.parse_at(depth + 1)?.ok_or_else(|| {
                                Error::Syntax(
                                    "A \"%SWITCH\" statement is missing its selector.".to_string(),
                                )
                            })?;
                            let cases = self.parse_at(depth + 1)?;
                            let default = self.parse_at(depth + 1)?;
                            self.expect_end("%SWITCH")?;

                            let mut node =
                                Node::new(NodeKind::Match { selector, cases, default });
                            if depth != 0 {
                                return Ok(Some(node));
                            }
                            node.next = self.parse_at(depth)?;
                            root = Some(node);
                        }
                        "CASE" => {
                            let label = self.parse_label(depth + 1)?;
                            let branch = self.parse_at(depth + 1)?;
                            self.expect_percent_end("%CASE")?;
                            return Ok(Some(Node::new(NodeKind::MatchCase { label, branch })));
                        }
                        "DEFAULT" => {
                            let label = Node::new(NodeKind::Literal(DEFAULT_LABEL.to_string()));
                            let branch = self.parse_at(depth + 1)?;
                            self.expect_percent_end("%DEFAULT")?;
                            root = Some(Node::new(NodeKind::MatchCase { label, branch }));
                        }
                        "PRINT" => {
                            let content = self.parse_at(depth + 1)?.ok_or_else(|| {
                                Error::Syntax(
                                    "A \"%PRINT\" statement is missing its argument.".to_string(),
                                )
                            })?;

                            let mut node = Node::new(NodeKind::Print { content });
                            if depth != 0 {
                                return Ok(Some(node));
                            }
                            node.next = self.parse_at(depth)?;
                            root = Some(node);
                        }
                        other => {
                            return Err(Error::Syntax(format!(
                                "Unexpected keyword \"{other}\" was reached."
                            )))
                        }
                    }
                }
                TokenKind::LeftSquareBracket => {
                    let value = self.parse_at(depth + 1)?.ok_or_else(|| {
                        Error::Syntax("\"[\" encloses an empty expression.".to_string())
                    })?;
                    if !self.peek_is(TokenKind::RightSquareBracket) {
                        return Err(Error::Syntax("\"[\" missing its \"]\".".to_string()));
                    }
                    root = Some(Node::new(NodeKind::Expression(value)));
                }
                TokenKind::RightSquareBracket => {
                    // An identifier here is an operator continuing the
                    // enclosing expression; anything else ends this body.
                    if !self.peek_is(TokenKind::Identifier) {
                        return Ok(root);
                    }
                }
                TokenKind::LeftAngleBracket => {
                    let value = self.take().ok_or_else(|| {
                        Error::Syntax("\"<\" is missing its reference.".to_string())
                    })?;
                    root = Some(Node::new(NodeKind::Literal(value.data)));
                }
                TokenKind::RightAngleBracket => {
                    if self.peek_is(TokenKind::RightSquareBracket) {
                        return Ok(root);
                    }
                }
                TokenKind::Colon => {
                    return self.parse_body(depth);
                }
                TokenKind::Identifier => match operator_arity(&token.data) {
                    Some(arity) => {
                        let lhs = match root.take() {
                            Some(node) => Some(node),
                            None => self.parse_at(depth + 1)?,
                        };
                        let rhs = if arity == Arity::Binary {
                            self.parse_at(depth + 1)?
                        } else {
                            None
                        };
                        return Ok(Some(Node::new(NodeKind::Operator {
                            name: token.data,
                            arity,
                            lhs,
                            rhs,
                        })));
                    }
                    None => {
                        // A bareword or quoted operand. Where an operator is
                        // required instead, fail rather than drop the operand
                        // already parsed.
                        if root.is_some() {
                            return Err(Error::Syntax(format!(
                                "Expected an operator, but found \"{}\" instead.",
                                token.data
                            )));
                        }
                        let node = Node::new(NodeKind::Literal(token.data));
                        if self.peek_is(TokenKind::RightSquareBracket) {
                            return Ok(Some(node));
                        }
                        root = Some(node);
                    }
                },
                TokenKind::Content => {
                    let mut node = Node::new(NodeKind::Content(token.data));
                    node.next = self.parse_at(depth)?;
                    root = Some(node);
                }
                TokenKind::Literal | TokenKind::Keyword => {
                    return Err(Error::Syntax(format!(
                        "Unexpected token of kind \"{:?}\" was reached.",
                        token.kind
                    )));
                }
            }
        }

        Ok(root)
    }

    /// Parses a statement body after its `:`, linking items through `next`.
    /// Stops, without consuming, at a `%` followed by `END`, `ELSE`, or
    /// `DEFAULT`; that directive belongs to the enclosing construct.
    fn parse_body(&mut self, depth: usize) -> Result<Option<Box<Node>>> {
        let mut items: Vec<Box<Node>> = Vec::new();

        while let Some(token) = self.take() {
            if token.kind == TokenKind::Percent {
                let stop = matches!(self.peek_keyword(), Some("END" | "ELSE" | "DEFAULT"));
                self.untake();
                if stop {
                    break;
                }
                if let Some(node) = self.parse_at(depth)? {
                    items.push(node);
                }
            } else {
                items.push(Node::new(NodeKind::Content(token.data)));
            }
        }

        let mut head: Option<Box<Node>> = None;
        for mut node in items.into_iter().rev() {
            append_next(&mut node, head);
            head = Some(node);
        }
        Ok(head)
    }
}

/// Parses `tokens` into one tree.
pub fn parse(tokens: Vec<Token>) -> Result<Option<Box<Node>>> {
    Parser::new(tokens).parse()
}

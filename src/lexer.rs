//! Lexer for the template preprocessor.
//!
//! Turns raw template text into a flat token sequence. Lexing is context
//! sensitive: `%` starts a directive keyword, `[` opens a bracketed
//! expression whose body follows its own rules, and everything else is
//! accumulated line by line into content tokens.

use crate::error::{Error, Result};

/// The kind of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Percent,
    LeftSquareBracket,
    RightSquareBracket,
    LeftAngleBracket,
    RightAngleBracket,
    Colon,
    Identifier,
    Literal,
    Keyword,
    Content,
}

/// A token with its raw text and char offsets into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub data: String,
    pub begin: usize,
    pub end: usize,
}

/// Single forward/backward cursor over the source text.
pub struct Lexer {
    source: Vec<char>,
    cursor: usize,
}

fn printable(value: char) -> String {
    match value {
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        '\r' => "\\r".to_string(),
        '\0' => "\\0".to_string(),
        other => other.to_string(),
    }
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self { source: source.chars().collect(), cursor: 0 }
    }

    fn eof(&self) -> bool {
        self.cursor >= self.source.len()
    }

    fn peek(&self) -> Result<char> {
        self.source
            .get(self.cursor)
            .copied()
            .ok_or_else(|| Error::Lexical("End of file reached.".to_string()))
    }

    fn peek_next(&self) -> Result<char> {
        self.source
            .get(self.cursor + 1)
            .copied()
            .ok_or_else(|| Error::Lexical("End of file reached.".to_string()))
    }

    fn take(&mut self) -> Result<char> {
        let value = self.peek()?;
        self.cursor += 1;
        Ok(value)
    }

    fn untake(&mut self) -> Result<()> {
        if self.cursor == 0 {
            return Err(Error::Lexical("Start of file reached.".to_string()));
        }
        self.cursor -= 1;
        Ok(())
    }

    fn drop_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(&value) = self.source.get(self.cursor) {
            if !predicate(value) {
                break;
            }
            self.cursor += 1;
        }
    }

    fn expect_to_peek(&self, expected: char) -> Result<()> {
        match self.source.get(self.cursor) {
            Some(&found) if found == expected => Ok(()),
            Some(&found) => Err(Error::Lexical(format!(
                "Expected \"{}\", but found \"{}\" instead.",
                expected,
                printable(found)
            ))),
            None => Err(Error::Lexical(format!(
                "Expected \"{}\", but reached the end of the file.",
                expected
            ))),
        }
    }

    /// Emits a token for the single character under the cursor.
    fn lex_single(&mut self, tokens: &mut Vec<Token>, kind: TokenKind) -> Result<()> {
        let begin = self.cursor;
        let data = self.take()?.to_string();
        tokens.push(Token { kind, data, begin, end: self.cursor });
        Ok(())
    }

    /// Tokenizes the whole source.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while !self.eof() {
            match self.peek()? {
                '%' => {
                    self.lex_single(&mut tokens, TokenKind::Percent)?;
                    self.lex_keyword(&mut tokens)?;
                }
                '[' => {
                    self.lex_single(&mut tokens, TokenKind::LeftSquareBracket)?;
                    self.lex_expression(&mut tokens, 0)?;
                    self.expect_to_peek(']')?;
                }
                ']' => {
                    self.lex_single(&mut tokens, TokenKind::RightSquareBracket)?;
                    self.drop_while(|value| value == '\n');
                }
                ':' => {
                    self.lex_single(&mut tokens, TokenKind::Colon)?;
                    self.lex_body_separator()?;
                }
                ' ' => self.lex_after_spaces(&mut tokens)?,
                _ => self.lex_content(&mut tokens, None)?,
            }
        }

        Ok(tokens)
    }

    /// Consumes the separator after a statement `:`. The character directly
    /// after the colon (normally a newline) and any following whitespace are
    /// dropped when a directive comes next; otherwise the whitespace is
    /// pushed back so the body content keeps its indentation.
    fn lex_body_separator(&mut self) -> Result<()> {
        if self.eof() {
            return Ok(());
        }
        self.take()?;

        let mut dropped = 0usize;
        while !self.eof() && self.peek()?.is_whitespace() {
            dropped += 1;
            self.take()?;
        }

        if self.eof() || self.peek()? != '%' {
            for _ in 0..dropped {
                self.untake()?;
            }
        }

        Ok(())
    }

    /// Handles a run of spaces at dispatch position: either the `<<` escape,
    /// a space-padded statement colon, or plain indented content.
    fn lex_after_spaces(&mut self, tokens: &mut Vec<Token>) -> Result<()> {
        let mut dropped = 0usize;
        while !self.eof() && self.peek()? == ' ' {
            dropped += 1;
            self.take()?;
        }

        if self.eof() {
            return Ok(());
        }

        if self.peek()? == '<' && self.peek_next().is_ok_and(|value| value == '<') {
            // `<< ` escapes one literal angle bracket into the content.
            self.take()?;
            self.take()?;
            self.expect_to_peek(' ')?;
            self.take()?;
            return self.lex_content(tokens, Some('<'));
        }

        if self.peek()? == ':' {
            // `] :` spelling; the padding is insignificant.
            return Ok(());
        }

        for _ in 0..dropped {
            self.untake()?;
        }
        self.lex_content(tokens, None)
    }

    /// Consumes the directive keyword after a `%` plus its trailing separator.
    fn lex_keyword(&mut self, tokens: &mut Vec<Token>) -> Result<()> {
        let begin = self.cursor;
        let mut data = String::new();

        while !self.eof() {
            let value = self.peek()?;
            if value == ':' || value == ' ' || value == '\n' {
                break;
            }
            data.push(self.take()?);
        }

        tokens.push(Token { kind: TokenKind::Keyword, data, begin, end: self.cursor });

        if !self.eof() && matches!(self.peek()?, ' ' | '\n') {
            self.take()?;
            self.drop_while(|value| value == ' ');
        }

        Ok(())
    }

    /// Tokenizes an expression body, tracking `[`/`]` nesting. At depth zero
    /// the closing `]` is left for the caller to verify and emit.
    fn lex_expression(&mut self, tokens: &mut Vec<Token>, depth: usize) -> Result<()> {
        while !self.eof() {
            self.drop_while(|value| value == ' ');
            if self.eof() {
                break;
            }

            match self.peek()? {
                '[' => {
                    self.lex_single(tokens, TokenKind::LeftSquareBracket)?;
                    self.lex_expression(tokens, depth + 1)?;
                }
                ']' => {
                    if depth == 0 {
                        return Ok(());
                    }
                    self.lex_single(tokens, TokenKind::RightSquareBracket)?;
                    return Ok(());
                }
                '<' => {
                    self.lex_single(tokens, TokenKind::LeftAngleBracket)?;
                    self.lex_reference(tokens)?;
                    self.expect_to_peek('>')?;
                }
                '>' => self.lex_single(tokens, TokenKind::RightAngleBracket)?,
                _ => {
                    let begin = self.cursor;
                    let mut data = String::new();
                    while !self.eof() && self.peek()? != ' ' {
                        data.push(self.take()?);
                    }
                    tokens.push(Token {
                        kind: TokenKind::Identifier,
                        data,
                        begin,
                        end: self.cursor,
                    });
                }
            }
        }

        Ok(())
    }

    /// Consumes the text between `<` and `>`. A namespaced key (one that
    /// contains `:`) is an identifier, anything else a literal.
    fn lex_reference(&mut self, tokens: &mut Vec<Token>) -> Result<()> {
        let begin = self.cursor;
        let mut data = String::new();

        while !self.eof() && self.peek()? != '>' {
            data.push(self.take()?);
        }

        let kind = if data.contains(':') { TokenKind::Identifier } else { TokenKind::Literal };
        tokens.push(Token { kind, data, begin, end: self.cursor });
        Ok(())
    }

    /// Accumulates plain text into content tokens, one line at a time,
    /// stopping at the next `%`. Content runs that are entirely spaces are
    /// discarded.
    fn lex_content(&mut self, tokens: &mut Vec<Token>, seed: Option<char>) -> Result<()> {
        let mut seed = seed;

        while !self.eof() && self.peek()? != '%' {
            let begin = self.cursor;
            let mut data = String::new();
            if let Some(value) = seed.take() {
                data.push(value);
            }

            loop {
                data.push(self.take()?);
                if self.eof() || self.peek()? == '%' {
                    break;
                }
                if data.starts_with('\n') || self.peek()? == '\n' {
                    break;
                }
            }

            if !self.eof() && self.peek()? == '\n' {
                self.take()?;
            }

            if data.chars().all(|value| value == ' ') {
                return Ok(());
            }

            tokens.push(Token { kind: TokenKind::Content, data, begin, end: self.cursor });
        }

        Ok(())
    }
}

/// Tokenizes `source` into a flat token sequence.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}

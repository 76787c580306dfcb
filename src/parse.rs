use std::fmt::Display;

use miette::{Diagnostic, Error, NamedSource, SourceSpan};
use thiserror::Error;

use crate::lex::{Lexer, Token, TokenKind};

#[derive(Error, Debug, Diagnostic)]
#[error("expected {expected}, found `{found}`")]
#[diagnostic(help("a line looks like `+ 1 (* 2 3)`: an operator followed by its operands"))]
pub struct SyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    bad_bit: SourceSpan,

    expected: String,
    found: String,
}

impl SyntaxError {
    pub(crate) fn at(src: NamedSource<String>, token: &Token<'_>, expected: &str) -> Self {
        SyntaxError {
            src,
            bad_bit: SourceSpan::from(token.offset..token.end()),
            expected: expected.to_string(),
            found: token.literal.to_string(),
        }
    }

    pub fn offset(&self) -> usize {
        self.bad_bit.offset()
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn found(&self) -> &str {
        &self.found
    }
}

#[derive(Error, Debug, Diagnostic)]
#[error("expected {expected}, found end of input")]
#[diagnostic(help("the line ended early, possibly due to a missing operand or `)`"))]
pub struct UnexpectedEof {
    #[source_code]
    src: NamedSource<String>,

    #[label("input ends here")]
    bad_bit: SourceSpan,

    expected: String,
}

impl UnexpectedEof {
    pub(crate) fn at(src: NamedSource<String>, offset: usize, expected: &str) -> Self {
        UnexpectedEof {
            src,
            bad_bit: SourceSpan::from((offset, 0)),
            expected: expected.to_string(),
        }
    }

    pub fn offset(&self) -> usize {
        self.bad_bit.offset()
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }
}

/// Syntax tree of one line. Literal text borrows from the parsed input.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenTree<'de> {
    /// Numeral text, sign included. Range checking is left to evaluation.
    Numeral(&'de str),
    Cons(Application<'de>),
}

/// An operator applied to one or more operands, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Application<'de> {
    operator: &'de str,
    head: Box<TokenTree<'de>>,
    tail: Vec<TokenTree<'de>>,
}

impl<'de> Application<'de> {
    pub fn new(operator: &'de str, head: TokenTree<'de>, tail: Vec<TokenTree<'de>>) -> Self {
        Application {
            operator,
            head: Box::new(head),
            tail,
        }
    }

    /// The operator symbol as written. Not guaranteed to be a known operator
    /// when the tree was built by hand.
    pub fn operator(&self) -> &'de str {
        self.operator
    }

    pub fn head(&self) -> &TokenTree<'de> {
        &self.head
    }

    pub fn tail(&self) -> &[TokenTree<'de>] {
        &self.tail
    }

    pub fn operands(&self) -> impl Iterator<Item = &TokenTree<'de>> {
        std::iter::once(self.head.as_ref()).chain(self.tail.iter())
    }
}

impl<'de> TokenTree<'de> {
    /// Total number of nodes, numerals and applications alike.
    pub fn nodes(&self) -> usize {
        match self {
            TokenTree::Numeral(_) => 1,
            TokenTree::Cons(app) => 1 + app.operands().map(TokenTree::nodes).sum::<usize>(),
        }
    }

    /// Number of application nodes.
    pub fn branches(&self) -> usize {
        match self {
            TokenTree::Numeral(_) => 0,
            TokenTree::Cons(app) => 1 + app.operands().map(TokenTree::branches).sum::<usize>(),
        }
    }

    /// Largest operand count of any application in the tree.
    pub fn widest(&self) -> usize {
        match self {
            TokenTree::Numeral(_) => 0,
            TokenTree::Cons(app) => app
                .operands()
                .map(TokenTree::widest)
                .fold(app.tail.len() + 1, usize::max),
        }
    }
}

impl Display for TokenTree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenTree::Numeral(text) => write!(f, "{text}"),
            TokenTree::Cons(app) => {
                write!(f, "({}", app.operator)?;
                for operand in app.operands() {
                    write!(f, " {operand}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Deepest `(` nesting a line may have. Parsing, evaluation and display all
/// recurse once per level.
pub const MAX_DEPTH: usize = 256;

pub struct Parser<'de> {
    whole: &'de str,
    lexer: Lexer<'de>,
    depth: usize,
}

impl<'de> Parser<'de> {
    pub fn new(filename: Option<&'de str>, whole: &'de str) -> Self {
        Parser {
            whole,
            lexer: Lexer::new(filename, whole),
            depth: 0,
        }
    }

    /// Parses a whole line: an operator and its operands with no enclosing
    /// parentheses, and nothing left over.
    pub fn parse(mut self) -> Result<TokenTree<'de>, Error> {
        // without an enclosing `(` the operand loop only stops at end of input
        Ok(TokenTree::Cons(self.parse_application(None)?))
    }

    /// Parses `operator expression {expression}`, then the `)` matching
    /// `open` if there is one.
    fn parse_application(&mut self, open: Option<Token<'de>>) -> Result<Application<'de>, Error> {
        let operator = self
            .lexer
            .expect_where(|token| token.kind.is_operator(), "an operator")?;

        let head = self.parse_expression()?;
        let mut tail = Vec::new();

        loop {
            let next = match self.lexer.peek() {
                Some(Ok(token)) => Some(*token),
                Some(Err(_)) => return Err(self.take_error()),
                None => None,
            };

            match (next, open) {
                (Some(token), Some(_)) if token.kind == TokenKind::RightParen => {
                    self.lexer.next();
                    break;
                }
                (Some(token), None) if token.kind == TokenKind::RightParen => {
                    return Err(SyntaxError::at(
                        self.lexer.source(),
                        &token,
                        "an expression or end of input",
                    )
                    .into());
                }
                (None, None) => break,
                (None, Some(open)) => {
                    let expected = format!("`)` closing the `(` at {}", open.offset);
                    return Err(
                        UnexpectedEof::at(self.lexer.source(), self.whole.len(), &expected).into(),
                    );
                }
                _ => tail.push(self.parse_expression()?),
            }
        }

        Ok(Application::new(operator.literal, head, tail))
    }

    fn parse_expression(&mut self) -> Result<TokenTree<'de>, Error> {
        let token = match self.lexer.next() {
            Some(Ok(token)) => token,
            Some(Err(e)) => return Err(e),
            None => {
                return Err(
                    UnexpectedEof::at(self.lexer.source(), self.whole.len(), "an expression")
                        .into(),
                );
            }
        };

        match token.kind {
            TokenKind::Digits => Ok(TokenTree::Numeral(token.literal)),
            TokenKind::LeftParen => {
                if self.depth >= MAX_DEPTH {
                    let expected = format!("at most {MAX_DEPTH} nested groups");
                    return Err(SyntaxError::at(self.lexer.source(), &token, &expected).into());
                }
                self.depth += 1;
                let app = self.parse_application(Some(token))?;
                self.depth -= 1;
                Ok(TokenTree::Cons(app))
            }
            TokenKind::Minus => {
                // a sign only counts when it touches the digits
                let digits = match self.lexer.peek() {
                    Some(Ok(next)) if next.kind == TokenKind::Digits && next.offset == token.end() => {
                        Some(next.end())
                    }
                    _ => None,
                };
                match digits {
                    Some(end) => {
                        self.lexer.next();
                        Ok(TokenTree::Numeral(&self.whole[token.offset..end]))
                    }
                    None => Err(SyntaxError::at(self.lexer.source(), &token, "an expression").into()),
                }
            }
            _ => Err(SyntaxError::at(self.lexer.source(), &token, "an expression").into()),
        }
    }

    fn take_error(&mut self) -> Error {
        match self.lexer.next() {
            Some(Err(e)) => e,
            _ => unreachable!("peeked a lexing error"),
        }
    }
}

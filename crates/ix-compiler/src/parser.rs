use ix_core::{CallSiteInfo, Expr, IxError, Value};

use crate::lexer::{Token, TokenKind};

pub(crate) const MAX_NESTING: usize = 128;

pub(crate) struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
        }
    }

    /// Runs `parse` one nesting level deeper, failing past [`MAX_NESTING`].
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, IxError>) -> Result<T, IxError> {
        if self.depth >= MAX_NESTING {
            return Err(IxError::compilation(
                format!("nesting deeper than {} levels", MAX_NESTING),
                self.peek().site.clone(),
            ));
        }
        self.depth += 1;
        let parsed = parse(self);
        self.depth -= 1;
        parsed
    }

    pub(crate) fn parse_script(mut self, site: CallSiteInfo) -> Result<Expr, IxError> {
        let statements = self.parse_statements(None)?;
        Ok(Expr::Block { statements, site })
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
        token
    }

    fn at_punct(&self, punct: char) -> bool {
        self.peek().kind == TokenKind::Punct(punct)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(name) if name == keyword)
    }

    fn expect_punct(&mut self, punct: char) -> Result<Token, IxError> {
        if self.at_punct(punct) {
            return Ok(self.advance());
        }
        Err(self.unexpected(&format!("'{}'", punct)))
    }

    fn expect_ident(&mut self) -> Result<(String, CallSiteInfo), IxError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Ident(name) => Ok((name, token.site)),
            other => Err(IxError::compilation(
                format!("expected identifier, found {}", describe(&other)),
                token.site,
            )),
        }
    }

    fn unexpected(&self, expected: &str) -> IxError {
        let token = self.peek();
        IxError::compilation(
            format!("expected {}, found {}", expected, describe(&token.kind)),
            token.site.clone(),
        )
    }

    /// Statements up to `closing` (or end of input when `closing` is `None`).
    fn parse_statements(&mut self, closing: Option<char>) -> Result<Vec<Expr>, IxError> {
        let mut statements = Vec::new();
        loop {
            while self.at_punct(';') {
                self.advance();
            }
            match (closing, &self.peek().kind) {
                (None, TokenKind::Eof) => break,
                (Some(punct), TokenKind::Punct(found)) if *found == punct => break,
                (Some(punct), TokenKind::Eof) => {
                    return Err(self.unexpected(&format!("'{}'", punct)));
                }
                _ => {}
            }

            let statement = self.parse_statement()?;
            let ends_with_block = matches!(statement, Expr::Foreach { .. });
            statements.push(statement);

            if self.at_punct(';') || ends_with_block {
                continue;
            }
            match (closing, &self.peek().kind) {
                (None, TokenKind::Eof) => break,
                (Some(punct), TokenKind::Punct(found)) if *found == punct => break,
                (Some(punct), TokenKind::Eof) => {
                    return Err(self.unexpected(&format!("'{}'", punct)));
                }
                _ => return Err(self.unexpected("';'")),
            }
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Expr, IxError> {
        if self.at_keyword("for") {
            return self.nested(Self::parse_foreach);
        }

        let target = self.parse_expression()?;
        if !self.at_punct('=') {
            return Ok(target);
        }
        let site = self.advance().site;
        if !matches!(target, Expr::Variable { .. } | Expr::Property { .. }) {
            return Err(IxError::compilation(
                "left side of '=' must be a variable or property",
                site,
            ));
        }
        let value = self.parse_expression()?;
        Ok(Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
            site,
        })
    }

    fn parse_foreach(&mut self) -> Result<Expr, IxError> {
        let site = self.advance().site;
        self.expect_punct('(')?;
        let (variable, _) = self.expect_ident()?;
        self.expect_punct(':')?;
        let iterable = self.parse_expression()?;
        self.expect_punct(')')?;
        let block_site = self.expect_punct('{')?.site;
        let statements = self.parse_statements(Some('}'))?;
        self.expect_punct('}')?;
        Ok(Expr::Foreach {
            variable,
            iterable: Box::new(iterable),
            body: Box::new(Expr::Block {
                statements,
                site: block_site,
            }),
            site,
        })
    }

    fn parse_expression(&mut self) -> Result<Expr, IxError> {
        self.nested(Self::parse_sum)
    }

    fn parse_sum(&mut self) -> Result<Expr, IxError> {
        let mut left = self.parse_postfix()?;
        while self.at_punct('+') {
            let site = self.advance().site;
            let right = self.parse_postfix()?;
            left = Expr::Add {
                left: Box::new(left),
                right: Box::new(right),
                site,
            };
        }
        Ok(left)
    }

    fn parse_postfix(&mut self) -> Result<Expr, IxError> {
        let mut expr = self.parse_primary()?;
        while self.at_punct('.') {
            self.advance();
            let (name, site) = self.expect_ident()?;
            if self.at_punct('(') {
                self.advance();
                let args = self.parse_arguments()?;
                expr = Expr::MethodCall {
                    target: Box::new(expr),
                    name,
                    args,
                    site,
                };
            } else {
                expr = Expr::Property {
                    target: Box::new(expr),
                    name,
                    site,
                };
            }
        }
        Ok(expr)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, IxError> {
        let mut args = Vec::new();
        if self.at_punct(')') {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if self.at_punct(',') {
                self.advance();
                continue;
            }
            self.expect_punct(')')?;
            return Ok(args);
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, IxError> {
        let token = self.advance();
        let site = token.site;
        let value = match token.kind {
            TokenKind::Int(value) => Value::Int(value),
            TokenKind::Float(value) => Value::Float(value),
            TokenKind::Str(value) => Value::String(value),
            TokenKind::Ident(name) => match name.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                "null" => Value::Null,
                "for" => {
                    return Err(IxError::compilation(
                        "'for' is only allowed as a statement",
                        site,
                    ))
                }
                _ => return Ok(Expr::Variable { name, site }),
            },
            TokenKind::Punct('(') => {
                let inner = self.parse_expression()?;
                self.expect_punct(')')?;
                return Ok(inner);
            }
            other => {
                return Err(IxError::compilation(
                    format!("expected expression, found {}", describe(&other)),
                    site,
                ))
            }
        };
        Ok(Expr::Literal { value, site })
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Int(value) => format!("integer {}", value),
        TokenKind::Float(value) => format!("float {}", value),
        TokenKind::Str(value) => format!("string \"{}\"", value),
        TokenKind::Ident(name) => format!("identifier `{}`", name),
        TokenKind::Punct(punct) => format!("'{}'", punct),
        TokenKind::Eof => "end of input".to_string(),
    }
}

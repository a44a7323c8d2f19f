//! Recursive-descent parser.

use sapling_ast::{BinaryOp, DeclKind, Node, SourceKind};

use crate::{
    error::{ParseError, Result},
    lexer::{Token, TokenKind, tokenize},
};

/// Parse source text into a program node of the given kind.
pub fn parse(source: &str, filename: &str, kind: SourceKind) -> Result<Node> {
    let tokens = tokenize(source, filename)?;
    let mut parser = Parser {
        source,
        filename,
        tokens,
        pos: 0,
    };
    parser.program(kind)
}

struct Parser<'a> {
    source: &'a str,
    filename: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!(
                "expected {}, found {}",
                kind.describe(),
                self.peek().kind.describe()
            )))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(self.error_here(format!(
                "expected identifier, found {}",
                other.describe()
            ))),
        }
    }

    fn error_here(&self, message: impl Into<String>) -> Box<ParseError> {
        let token = self.peek();
        ParseError::new(self.source, self.filename, token.offset, token.len, message)
    }

    fn program(&mut self, kind: SourceKind) -> Result<Node> {
        let mut body = Vec::new();
        while self.peek().kind != TokenKind::Eof {
            body.push(self.statement()?);
        }
        Ok(Node::Program { kind, body })
    }

    fn statement(&mut self) -> Result<Node> {
        let line = Some(self.peek().line);
        match self.peek().kind {
            TokenKind::Import => self.import_decl(line),
            TokenKind::Let => self.var_decl(DeclKind::Let, line),
            TokenKind::Const => self.var_decl(DeclKind::Const, line),
            TokenKind::Var => self.var_decl(DeclKind::Var, line),
            TokenKind::Function => self.fn_decl(line),
            TokenKind::Return => self.return_stmt(line),
            _ => {
                let expr = self.expression()?;
                self.expect(TokenKind::Semi)?;
                Ok(Node::ExprStmt {
                    expr: Box::new(expr),
                    line,
                })
            }
        }
    }

    fn import_decl(&mut self, line: Option<u32>) -> Result<Node> {
        self.expect(TokenKind::Import)?;
        self.expect(TokenKind::LBrace)?;
        let mut names = Vec::new();
        loop {
            names.push(self.expect_ident()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::From)?;
        let source = match self.peek().kind.clone() {
            TokenKind::Str(value) => {
                self.advance();
                value
            }
            other => {
                return Err(self.error_here(format!(
                    "expected module path string, found {}",
                    other.describe()
                )));
            }
        };
        self.expect(TokenKind::Semi)?;
        Ok(Node::ImportDecl {
            names,
            source,
            line,
        })
    }

    fn var_decl(&mut self, kind: DeclKind, line: Option<u32>) -> Result<Node> {
        self.advance(); // declaration keyword
        let name = self.expect_ident()?;
        let init = if self.eat(&TokenKind::Assign) {
            Some(Box::new(self.expression()?))
        } else {
            None
        };
        self.expect(TokenKind::Semi)?;
        Ok(Node::VarDecl {
            kind,
            name,
            init,
            line,
        })
    }

    fn fn_decl(&mut self, line: Option<u32>) -> Result<Node> {
        self.expect(TokenKind::Function)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if self.peek().kind != TokenKind::RParen {
            loop {
                params.push(self.expect_ident()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;
        let mut body = Vec::new();
        while self.peek().kind != TokenKind::RBrace {
            if self.peek().kind == TokenKind::Eof {
                return Err(self.error_here("unclosed function body"));
            }
            body.push(self.statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Node::FnDecl {
            name,
            params,
            body,
            line,
        })
    }

    fn return_stmt(&mut self, line: Option<u32>) -> Result<Node> {
        self.expect(TokenKind::Return)?;
        let arg = if self.peek().kind == TokenKind::Semi {
            None
        } else {
            Some(Box::new(self.expression()?))
        };
        self.expect(TokenKind::Semi)?;
        Ok(Node::Return { arg, line })
    }

    fn expression(&mut self) -> Result<Node> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Node> {
        let target = self.comparison()?;
        if self.peek().kind == TokenKind::Assign {
            if !matches!(target, Node::Ident { .. }) {
                return Err(self.error_here("assignment target must be an identifier"));
            }
            self.advance();
            let value = self.assignment()?;
            return Ok(Node::Assign {
                target: Box::new(target),
                value: Box::new(value),
            });
        }
        Ok(target)
    }

    fn comparison(&mut self) -> Result<Node> {
        let mut left = self.additive()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                _ => break,
            };
            self.advance();
            let right = self.additive()?;
            left = Node::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Node> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.multiplicative()?;
            left = Node::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Node> {
        let mut left = self.call()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.call()?;
            left = Node::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn call(&mut self) -> Result<Node> {
        let mut expr = self.primary()?;
        while self.peek().kind == TokenKind::LParen {
            self.advance();
            let mut args = Vec::new();
            if self.peek().kind != TokenKind::RParen {
                loop {
                    args.push(self.expression()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen)?;
            expr = Node::Call {
                callee: Box::new(expr),
                args,
            };
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Node> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Node::Ident { name })
            }
            TokenKind::Number(value) => {
                self.advance();
                Ok(Node::Number { value })
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Node::Str { value })
            }
            TokenKind::True => {
                self.advance();
                Ok(Node::Bool { value: true })
            }
            TokenKind::False => {
                self.advance();
                Ok(Node::Bool { value: false })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            other => Err(self.error_here(format!(
                "expected expression, found {}",
                other.describe()
            ))),
        }
    }
}

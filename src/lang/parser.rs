use lazy_static::lazy_static;
use thiserror::Error;
use crate::errors::Error;
use crate::lang::ast::{Expr, MessageExpr};
use crate::lang::lexer::{Lexer, Token, TokenPos, TokenType};
use crate::util;
use crate::util::stack::ensure_sufficient_stack;

lazy_static! {
    // Word verbs like `and` lex as names; after a value a name can only start a message
    static ref MESSAGE_VERB_TYPES: [TokenType; 2] = [
        TokenType::Verb,
        TokenType::Name,
    ];
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParserError {
    #[error("{pos} Unexpected token of type {token_type} ('{text}'): {message}")]
    UnexpectedToken {
        token_type: TokenType,
        text: String,
        pos: TokenPos,
        message: String,
    },
    #[error("{pos} Failed to parse {token_type} literal '{text}': {reason}")]
    InvalidLiteral {
        token_type: TokenType,
        text: String,
        pos: TokenPos,
        reason: String,
    },
}

impl ParserError {
    pub fn get_pos(&self) -> TokenPos {
        match self {
            ParserError::UnexpectedToken { pos, .. } => *pos,
            ParserError::InvalidLiteral { pos, .. } => *pos,
        }
    }
}

type ParseResult<T> = Result<T, Error>;

/// Recursive descent over the token stream. Stops at the first error; there is no recovery.
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    previous: Token, current: Token,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'_>) -> Parser<'_> {
        Parser {
            lexer,
            previous: Token::empty(), current: Token::empty(),
        }
    }

    pub fn parse(&mut self) -> ParseResult<Expr> {
        self.consume()?;

        let expr = self.parse_send()?;
        self.expect(TokenType::Eof, "Expected end of input after expression")?;

        Ok(expr)
    }

    // Sends

    fn parse_send(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_value()?;

        while self.check_any(&*MESSAGE_VERB_TYPES) {
            let message = self.parse_message()?;
            expr = Expr::Send { subject: Box::new(expr), message };
        }

        Ok(expr)
    }

    fn parse_message(&mut self) -> ParseResult<MessageExpr> {
        self.expect_any(&*MESSAGE_VERB_TYPES, "Expected verb")?;
        let verb = self.previous.source().to_owned();

        let object = self.parse_value()?;
        Ok(MessageExpr::new(verb, object))
    }

    // Values

    fn parse_value(&mut self) -> ParseResult<Expr> {
        ensure_sufficient_stack(|| {
            let head = self.parse_pair_head()?;

            if self.matches(TokenType::Colon)? {
                let tail = self.parse_value()?;
                Ok(Expr::Pair(Box::new(head), Box::new(tail)))
            } else {
                Ok(head)
            }
        })
    }

    fn parse_pair_head(&mut self) -> ParseResult<Expr> {
        if self.matches(TokenType::At)? {
            return Ok(Expr::Later(Box::new(self.parse_value()?)));
        } else if self.matches(TokenType::ParenLeft)? {
            if self.matches(TokenType::ParenRight)? {
                return Ok(Expr::Nil);
            }

            let expr = self.parse_send()?;
            self.expect(TokenType::ParenRight, "Expected ')' after expression")?;

            return Ok(expr);
        } else if self.matches(TokenType::BlockLeft)? {
            let items = self.parse_exprs(TokenType::BlockRight)?;
            self.expect(TokenType::BlockRight, "Expected '}' after block items")?;

            return Ok(Expr::Block(items));
        } else if self.matches(TokenType::ArrayLeft)? {
            let items = self.parse_exprs(TokenType::ArrayRight)?;
            self.expect(TokenType::ArrayRight, "Expected ']' after array items")?;

            return Ok(Expr::Array(items));
        } else if self.matches(TokenType::MapLeft)? {
            return self.parse_map();
        }

        self.parse_scalar()
    }

    fn parse_scalar(&mut self) -> ParseResult<Expr> {
        if self.matches(TokenType::Number)? {
            let parsed: Result<i64, _> = self.previous.source().parse();

            return match parsed {
                Ok(number) => Ok(Expr::ConstantInt(number)),
                Err(err) => Err(self.invalid_literal(err.to_string())),
            };
        } else if self.matches(TokenType::Float)? {
            let parsed: Result<f64, _> = self.previous.source().parse();

            return match parsed {
                Ok(number) => Ok(Expr::ConstantFloat(number)),
                Err(err) => Err(self.invalid_literal(err.to_string())),
            };
        } else if self.matches(TokenType::String)? {
            return Ok(Expr::ConstantString(util::unquote_str(self.previous.source())));
        } else if self.matches(TokenType::Name)? {
            return Ok(Expr::Identifier(self.previous.source().to_owned()));
        } else if self.matches(TokenType::Backslash)? {
            return Ok(Expr::Message(self.parse_message()?));
        }

        Err(self.error_at_current("Expected value"))
    }

    fn parse_exprs(&mut self, closing: TokenType) -> ParseResult<Vec<Expr>> {
        let mut items = vec![];

        if self.check(closing) {
            return Ok(items);
        }

        items.push(self.parse_send()?);

        while self.matches(TokenType::Sep)? {
            items.push(self.parse_send()?);
        }

        Ok(items)
    }

    fn parse_map(&mut self) -> ParseResult<Expr> {
        let mut entries = vec![];

        if !self.check(TokenType::BlockRight) {
            loop {
                self.expect(TokenType::String, "Expected string key in map")?;
                let key = util::unquote_str(self.previous.source());

                self.expect(TokenType::Colon, "Expected ':' after map key")?;
                let value = self.parse_value()?;
                entries.push((key, value));

                if !self.matches(TokenType::Sep)? {
                    break;
                }
            }
        }

        self.expect(TokenType::BlockRight, "Expected '}' after map entries")?;
        Ok(Expr::Map(entries))
    }

    // Token cursor

    fn consume(&mut self) -> ParseResult<()> {
        std::mem::swap(&mut self.previous, &mut self.current); // self.current gets replaced below

        self.current = self.lexer.scan_token()?;
        Ok(())
    }

    fn expect(&mut self, token_type: TokenType, message: &str) -> ParseResult<()> {
        if self.check(token_type) {
            return self.consume();
        }

        Err(self.error_at_current(message))
    }

    fn expect_any(&mut self, token_types: &[TokenType], message: &str) -> ParseResult<()> {
        if self.check_any(token_types) {
            return self.consume();
        }

        Err(self.error_at_current(message))
    }

    fn matches(&mut self, token_type: TokenType) -> ParseResult<bool> { // Should be called "match", but that's a keyword
        if !self.check(token_type) {
            return Ok(false);
        }

        self.consume()?;
        Ok(true)
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    fn check_any(&self, token_types: &[TokenType]) -> bool {
        token_types.iter().any(|token_type| self.check(*token_type))
    }

    // Error handling

    fn error_at_current(&self, message: &str) -> Error {
        ParserError::UnexpectedToken {
            token_type: self.current.token_type(),
            text: self.current.source().to_owned(),
            pos: *self.current.start(),
            message: message.to_owned(),
        }.into()
    }

    fn invalid_literal(&self, reason: String) -> Error {
        ParserError::InvalidLiteral {
            token_type: self.previous.token_type(),
            text: self.previous.source().to_owned(),
            pos: *self.previous.start(),
            reason,
        }.into()
    }
}

#[cfg(test)]
mod tests;

use std::fmt::{Display, Formatter};
use std::str::Chars;
use thiserror::Error;
use crate::util;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenType {
    None,

    At, Colon,
    Float, Number,
    String,
    Name, Verb,
    Sep, Backslash,

    BlockLeft, BlockRight,
    MapLeft,
    ArrayLeft, ArrayRight,
    ParenLeft, ParenRight,

    // EOF
    Eof,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenType::None => "none",
            TokenType::At => "at",
            TokenType::Colon => "colon",
            TokenType::Float => "float",
            TokenType::Number => "number",
            TokenType::String => "string",
            TokenType::Name => "name",
            TokenType::Verb => "verb",
            TokenType::Sep => "sep",
            TokenType::Backslash => "bslash",
            TokenType::BlockLeft => "oblock",
            TokenType::BlockRight => "cblock",
            TokenType::MapLeft => "omap",
            TokenType::ArrayLeft => "oarray",
            TokenType::ArrayRight => "carray",
            TokenType::ParenLeft => "opar",
            TokenType::ParenRight => "cpar",
            TokenType::Eof => "eof",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    start: TokenPos, end: TokenPos,
}

impl Token {
    pub fn empty() -> Token {
        Token {
            token_type: TokenType::None,
            source: String::from(""),
            start: TokenPos::begin(), end: TokenPos::begin(),
        }
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn end(&self) -> &TokenPos { &self.end }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexerError {
    #[error("{0} Unexpected character '{1}'")]
    UnexpectedCharacter(TokenPos, char),
    #[error("{pos} Unexpected character; expected '{expected}', got '{got}'")]
    ExpectedCharacter {
        pos: TokenPos,
        expected: char,
        got: char,
    },
    #[error("{pos} Unexpected end of input; expected '{expected}'")]
    ExpectedCharacterAtEof {
        pos: TokenPos,
        expected: char,
    },
    #[error("{pos} Unterminated string")]
    UnterminatedString {
        pos: TokenPos,
    },
}

impl LexerError {
    pub fn get_pos(&self) -> TokenPos {
        match self {
            LexerError::UnexpectedCharacter(pos, _) => *pos,
            LexerError::ExpectedCharacter { pos, .. } => *pos,
            LexerError::ExpectedCharacterAtEof { pos, .. } => *pos,
            LexerError::UnterminatedString { pos } => *pos,
        }
    }
}

pub type LexerResult<T> = Result<T, LexerError>;

/// Scans tokens on demand. Cloning a lexer gives an independent cursor that restarts
/// the stream from the same point.
#[derive(Clone, Debug)]
pub struct Lexer<'source> {
    input: &'source str,

    chars: Chars<'source>,
    peek_1: Option<char>,
    peek_2: Option<char>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,

    finished: bool,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            chars: source.chars(),
            peek_1: None,
            peek_2: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),

            finished: false,
        }
    }

    pub fn scan_token(&mut self) -> LexerResult<Token> {
        self.skip_whitespace();
        self.start_index = self.current_index;
        self.start_pos = self.current_pos;

        let c = match self.consume() {
            Some(c) => c,
            None => return Ok(self.make_token(TokenType::Eof)),
        };

        match c {
            '@' => Ok(self.make_token(TokenType::At)),
            ':' => Ok(self.make_token(TokenType::Colon)),
            '0'..='9' => Ok(self.scan_number()),
            '"' => self.scan_string(),
            c if util::is_alphabetic(c) => Ok(self.scan_name()),
            c if util::is_verb_symbol(c) => Ok(self.scan_verb()),
            ',' => Ok(self.make_token(TokenType::Sep)),
            '\\' => Ok(self.make_token(TokenType::Backslash)),
            '{' => Ok(self.make_token(TokenType::BlockLeft)),
            '}' => Ok(self.make_token(TokenType::BlockRight)),
            '#' => match self.peek() {
                Some('{') => {
                    self.consume();
                    Ok(self.make_token(TokenType::MapLeft))
                },
                Some(got) => Err(LexerError::ExpectedCharacter { pos: self.current_pos, expected: '{', got }),
                None => Err(LexerError::ExpectedCharacterAtEof { pos: self.current_pos, expected: '{' }),
            },
            '[' => Ok(self.make_token(TokenType::ArrayLeft)),
            ']' => Ok(self.make_token(TokenType::ArrayRight)),
            '(' => Ok(self.make_token(TokenType::ParenLeft)),
            ')' => Ok(self.make_token(TokenType::ParenRight)),

            _ => Err(LexerError::UnexpectedCharacter(self.start_pos, c)),
        }
    }

    fn scan_string(&mut self) -> LexerResult<Token> {
        loop {
            match self.consume() {
                Some('"') => break,
                // A backslash takes the next character with it, so `\"` never ends the string
                Some('\\') => if self.consume().is_none() {
                    return Err(LexerError::UnterminatedString { pos: self.start_pos });
                },
                Some(_) => {},
                None => return Err(LexerError::UnterminatedString { pos: self.start_pos }),
            }
        }

        // Quotes stay in the token; the parser unquotes
        Ok(self.make_token(TokenType::String))
    }

    fn scan_number(&mut self) -> Token {
        while let Some('0'..='9') = self.peek() {
            self.consume();
        }

        let mut floating_point = false;

        if let Some('.') = self.peek() {
            if let Some('0'..='9') = self.peek_next() {
                self.consume();
                floating_point = true;

                while let Some('0'..='9') = self.peek() {
                    self.consume();
                }
            }
        }

        self.make_token(if floating_point { TokenType::Float } else { TokenType::Number })
    }

    fn scan_name(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_alphanumeric(c) {
                break;
            }

            self.consume();
        }

        self.make_token(TokenType::Name)
    }

    fn scan_verb(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_verb_part(c) {
                break;
            }

            self.consume();
        }

        self.make_token(TokenType::Verb)
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            source: self.input[self.start_index..self.current_index].to_owned(),

            start: self.start_pos, end: self.current_pos,
        }
    }

    fn consume(&mut self) -> Option<char> {
        (if let Some(c) = self.peek_1.take() {
            self.peek_1 = self.peek_2.take();
            Some(c)
        } else {
            self.chars.next()
        }).map(|c| {
            self.current_index += c.len_utf8();

            if c == '\n' {
                self.current_pos.line += 1;
                self.current_pos.column = 1;
            } else {
                self.current_pos.column += 1;
            }

            c
        })
    }

    fn peek(&mut self) -> Option<char> {
        if self.peek_1.is_none() {
            self.peek_1 = self.chars.next();
        }

        self.peek_1
    }

    fn peek_next(&mut self) -> Option<char> {
        self.peek()?;

        if self.peek_2.is_none() {
            self.peek_2 = self.chars.next();
        }

        self.peek_2
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                return;
            }

            self.consume();
        }
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = LexerResult<Token>;

    /// Yields every token up to and including `Eof`, then stops. An error also ends the stream.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.scan_token();

        if !matches!(&token, Ok(token) if token.token_type() != TokenType::Eof) {
            self.finished = true;
        }

        Some(token)
    }
}

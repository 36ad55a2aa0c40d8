pub mod token;

use crate::scanner::token::{Token, TokenType};
use std::collections::HashMap;

/// Pull-model lexer. Each call to [`Scanner::next_token`] yields one token;
/// once the input is exhausted every further call yields `Eof`. The scanner
/// itself never fails: bytes it does not recognize come back as `Illegal`
/// tokens for the parser to complain about.
pub struct Scanner {
    source: Vec<u8>,
    start: usize,
    current: usize,
    line: usize,
    keywords: HashMap<String, TokenType>,
}

impl Scanner {
    pub fn new(source: impl Into<String>, keywords: &HashMap<String, TokenType>) -> Self {
        Scanner {
            source: source.into().into_bytes(),
            start: 0,
            current: 0,
            line: 1,
            keywords: keywords.clone(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.current;

        if self.is_at_end() {
            return Token::new(TokenType::Eof, "", self.line);
        }

        let c = self.advance();
        match c {
            b'(' => self.make_token(TokenType::LeftParen),
            b')' => self.make_token(TokenType::RightParen),
            b'{' => self.make_token(TokenType::LeftBrace),
            b'}' => self.make_token(TokenType::RightBrace),
            b'[' => self.make_token(TokenType::LeftBracket),
            b']' => self.make_token(TokenType::RightBracket),
            b',' => self.make_token(TokenType::Comma),
            b';' => self.make_token(TokenType::Semicolon),
            b':' => self.make_token(TokenType::Colon),
            b'-' => self.make_token(TokenType::Minus),
            b'+' => self.make_token(TokenType::Plus),
            b'/' => self.make_token(TokenType::Slash),
            b'*' => self.make_token(TokenType::Star),
            b'<' => self.make_token(TokenType::Less),
            b'>' => self.make_token(TokenType::Greater),

            b'!' => {
                let token_type = if self.match_char(b'=') {
                    TokenType::NotEqual
                } else {
                    TokenType::Bang
                };
                self.make_token(token_type)
            }

            b'=' => {
                let token_type = if self.match_char(b'=') {
                    TokenType::Equal
                } else {
                    TokenType::Assign
                };
                self.make_token(token_type)
            }

            b'"' => self.handle_string(),

            c if is_digit(c) => self.handle_number(),
            c if is_letter(c) => self.handle_identifier(),

            _ => self.make_token(TokenType::Illegal),
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> u8 {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> u8 {
        self.source.get(self.current).copied().unwrap_or(0)
    }

    fn match_char(&mut self, expected: u8) -> bool {
        if self.peek() == expected {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\t' | b'\r' => {
                    self.current += 1;
                }
                b'\n' => {
                    self.line += 1;
                    self.current += 1;
                }
                _ => break,
            }
        }
    }

    fn handle_string(&mut self) -> Token {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.peek() == b'\n' {
                self.line += 1;
            }
            self.current += 1;
        }

        // The literal excludes the quotes. There are no escape sequences;
        // an unterminated string runs to end of input.
        let literal = self.lexeme_at(self.start + 1, self.current);
        if !self.is_at_end() {
            self.current += 1;
        }
        Token::new(TokenType::Str, literal, self.line)
    }

    fn handle_number(&mut self) -> Token {
        while is_digit(self.peek()) {
            self.current += 1;
        }
        self.make_token(TokenType::Int)
    }

    fn handle_identifier(&mut self) -> Token {
        while is_letter(self.peek()) || is_digit(self.peek()) {
            self.current += 1;
        }

        let text = self.lexeme_at(self.start, self.current);
        let token_type = self
            .keywords
            .get(&text)
            .copied()
            .unwrap_or(TokenType::Identifier);
        Token::new(token_type, text, self.line)
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token::new(token_type, self.lexeme_at(self.start, self.current), self.line)
    }

    fn lexeme_at(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.source[start..end]).into_owned()
    }
}

fn is_letter(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

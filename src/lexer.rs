use std::iter::Peekable;
use std::str::Chars;

use crate::types::ShellError;
use crate::word::{Word, WordPart};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Word(Word),
    Operator(Operator),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
    Pipe,              // |
    And,               // &&
    Or,                // ||
    Background,        // &
    Semicolon,         // ;
    RedirectIn,        // <
    RedirectOut,       // >
    RedirectAppend,    // >>
    RedirectErr,       // 2>
    RedirectErrAppend, // 2>>
    RedirectBoth,      // &>
}

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

pub fn lex(input: &str) -> Result<Vec<Token>, ShellError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.chars().peekable(),
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ShellError> {
        while matches!(self.input.peek(), Some(' ') | Some('\t') | Some('\n')) {
            self.input.next();
        }

        let c = match self.input.peek() {
            Some(c) => *c,
            None => return Ok(None),
        };

        match c {
            '|' | ';' => Ok(Some(Token::Operator(self.read_control(c)))),
            '&' => Ok(Some(Token::Operator(self.read_ampersand()))),
            '<' => {
                self.input.next();
                Ok(Some(Token::Operator(Operator::RedirectIn)))
            }
            '>' => Ok(Some(Token::Operator(self.read_out_redirect(false)))),
            '2' if self.peeks_redirect() => {
                self.input.next(); // the '2'
                Ok(Some(Token::Operator(self.read_out_redirect(true))))
            }
            _ => Ok(Some(Token::Word(self.read_word()?))),
        }
    }

    fn read_control(&mut self, first: char) -> Operator {
        self.input.next();
        match first {
            '|' if self.input.peek() == Some(&'|') => {
                self.input.next();
                Operator::Or
            }
            '|' => Operator::Pipe,
            _ => Operator::Semicolon,
        }
    }

    fn read_ampersand(&mut self) -> Operator {
        self.input.next();
        match self.input.peek() {
            Some('&') => {
                self.input.next();
                Operator::And
            }
            Some('>') => {
                self.input.next();
                Operator::RedirectBoth
            }
            _ => Operator::Background,
        }
    }

    fn read_out_redirect(&mut self, err: bool) -> Operator {
        self.input.next(); // the '>'
        let append = self.input.peek() == Some(&'>');
        if append {
            self.input.next();
        }
        match (err, append) {
            (false, false) => Operator::RedirectOut,
            (false, true) => Operator::RedirectAppend,
            (true, false) => Operator::RedirectErr,
            (true, true) => Operator::RedirectErrAppend,
        }
    }

    // `2>` is a stderr redirect only when the 2 starts a token; a 2 inside
    // a word stays part of the word.
    fn peeks_redirect(&mut self) -> bool {
        let mut lookahead = self.input.clone();
        lookahead.next();
        lookahead.peek() == Some(&'>')
    }

    fn read_word(&mut self) -> Result<Word, ShellError> {
        let mut word = Word::new();
        while let Some(&c) = self.input.peek() {
            match c {
                ' ' | '\t' | '\n' | '|' | '&' | ';' | '<' | '>' => break,
                '\\' => {
                    self.input.next();
                    match self.input.next() {
                        Some(escaped) => word.push_char(escaped),
                        None => {
                            return Err(ShellError::Parse(
                                "trailing backslash".to_string(),
                            ))
                        }
                    }
                }
                '\'' => {
                    self.input.next();
                    word.push_str(&self.read_until('\'')?);
                }
                '"' => {
                    self.input.next();
                    self.read_double_quoted(&mut word)?;
                }
                '$' => {
                    self.input.next();
                    self.read_variable(&mut word);
                }
                _ => {
                    self.input.next();
                    word.push_char(c);
                }
            }
        }
        Ok(word)
    }

    fn read_until(&mut self, quote: char) -> Result<String, ShellError> {
        let mut text = String::new();
        for c in self.input.by_ref() {
            if c == quote {
                return Ok(text);
            }
            text.push(c);
        }
        Err(ShellError::Parse(format!("unterminated {quote} quote")))
    }

    // Inside double quotes `\` escapes only `"`, `\` and `$`; `$NAME` still
    // expands.
    fn read_double_quoted(&mut self, word: &mut Word) -> Result<(), ShellError> {
        while let Some(c) = self.input.next() {
            match c {
                '"' => return Ok(()),
                '\\' => match self.input.next() {
                    Some(next @ ('"' | '\\' | '$')) => word.push_char(next),
                    Some(next) => {
                        word.push_char('\\');
                        word.push_char(next);
                    }
                    None => {
                        return Err(ShellError::Parse(
                            "unterminated \" quote".to_string(),
                        ))
                    }
                },
                '$' => self.read_variable(word),
                _ => word.push_char(c),
            }
        }
        Err(ShellError::Parse("unterminated \" quote".to_string()))
    }

    fn read_variable(&mut self, word: &mut Word) {
        let mut name = String::new();
        while let Some(&c) = self.input.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.input.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            // A lone `$` is literal.
            word.push_char('$');
        } else {
            word.add_part(WordPart::Variable(name));
        }
    }
}

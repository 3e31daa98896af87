use std::env;

/// A lexed word: literal text interleaved with `$NAME` references. Quote
/// handling happens in the lexer, so by the time a `Word` exists its literal
/// parts carry no quoting or escape characters.
#[derive(Debug, Clone, PartialEq)]
pub enum WordPart {
    Literal(String),
    Variable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    parts: Vec<WordPart>,
}

impl Word {
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    pub fn add_part(&mut self, part: WordPart) {
        self.parts.push(part);
    }

    pub fn push_str(&mut self, s: &str) {
        if let Some(WordPart::Literal(last)) = self.parts.last_mut() {
            last.push_str(s);
        } else {
            self.parts.push(WordPart::Literal(s.to_string()));
        }
    }

    pub fn push_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.push_str(c.encode_utf8(&mut buf));
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Resolve the word to its final string. Unset variables expand to the
    /// empty string, as in POSIX shells.
    pub fn resolve(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                WordPart::Literal(s) => s.clone(),
                WordPart::Variable(name) => env::var(name).unwrap_or_default(),
            })
            .collect()
    }
}

impl Default for Word {
    fn default() -> Self {
        Self::new()
    }
}

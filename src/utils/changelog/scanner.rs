// position-tracking reader over changelog text

use std::fmt;

const NEWLINE: char = '\n';

/// raised when the scanner is asked for a character past the end of the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfInput {
    pub position: usize,
}

impl fmt::Display for EndOfInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected end of input at byte {}", self.position)
    }
}

impl std::error::Error for EndOfInput {}

/// cursor over normalized changelog text
///
/// carriage returns are dropped on construction so every line ends with a
/// single `\n`. all reads advance the cursor; nothing is ever re-read.
#[derive(Debug, Clone)]
pub struct Scanner {
    text: String,
    position: usize,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.replace('\r', ""),
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.text.len()
    }

    /// the unconsumed text
    pub fn remaining(&self) -> &str {
        &self.text[self.position..]
    }

    pub fn current(&self) -> Result<char, EndOfInput> {
        self.remaining().chars().next().ok_or(EndOfInput {
            position: self.position,
        })
    }

    /// true when the current character is `expected`; false at end of input
    pub fn current_is(&self, expected: char) -> bool {
        self.current().map(|c| c == expected).unwrap_or(false)
    }

    pub fn advance(&mut self) -> Result<char, EndOfInput> {
        let current = self.current()?;
        self.position += current.len_utf8();
        Ok(current)
    }

    /// consume up to (not including) the first character in `stops`, or to the end
    pub fn read_until(&mut self, stops: &[char]) -> String {
        let rest = self.remaining();
        let length = rest.find(|c: char| stops.contains(&c)).unwrap_or(rest.len());
        let result = rest[..length].to_string();
        self.position += length;
        result
    }

    /// skip spaces and tabs, never newlines
    pub fn skip_blanks(&mut self) {
        let rest = self.remaining();
        let length = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        self.position += length;
    }

    /// consume the rest of the line including its newline; the newline is not returned
    pub fn read_line(&mut self) -> String {
        let line = self.read_until(&[NEWLINE]);
        if self.current_is(NEWLINE) {
            self.position += 1;
        }
        line
    }

    /// consume a run of `character` and return its length
    pub fn read_run(&mut self, character: char) -> usize {
        let mut count = 0;
        while self.current_is(character) {
            self.position += character.len_utf8();
            count += 1;
        }
        count
    }

    /// consume whole lines until one starts with `boundary` or the text ends.
    /// trailing newlines are dropped from the result, leading ones are kept.
    pub fn read_block(&mut self, boundary: char) -> String {
        let mut block = String::new();
        while !self.is_at_end() && !self.current_is(boundary) {
            block.push_str(&self.read_until(&[NEWLINE]));
            if self.current_is(NEWLINE) {
                self.position += 1;
                block.push(NEWLINE);
            }
        }
        block.truncate(block.trim_end_matches(NEWLINE).len());
        block
    }
}

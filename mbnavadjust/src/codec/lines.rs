//! Line cursor and field decoding with error context.

use std::str::FromStr;

use super::layout::{RecordField, RecordLayout, shapes_for};
use super::FormatVersion;
use crate::error::ParseError;

/// A whitespace-delimited token and its byte offset in the line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Token<'a> {
    pub start: usize,
    pub text: &'a str,
}

pub(crate) fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, ch) in line.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(Token {
                    start: s,
                    text: &line[s..i],
                });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            start: s,
            text: &line[s..],
        });
    }
    tokens
}

/// One input line with its position.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
    pub version: Option<FormatVersion>,
}

impl<'a> Line<'a> {
    pub fn error(&self, reason: impl Into<String>) -> ParseError {
        ParseError {
            version: self.version,
            line: self.number,
            content: self.text.to_string(),
            reason: reason.into(),
        }
    }

    /// Parses a numeric field.
    pub fn number<T: FromStr>(&self, name: &str, text: &str) -> Result<T, ParseError> {
        text.parse::<T>()
            .map_err(|_| self.error(format!("invalid {} `{}`", name, text)))
    }

    /// Parses an integer flag, any non-zero value being true.
    pub fn flag(&self, name: &str, text: &str) -> Result<bool, ParseError> {
        Ok(self.number::<i64>(name, text)? != 0)
    }

    /// Splits a `KEY<whitespace>VALUE` header line, checking the key.
    pub fn header_value(&self, key: &str) -> Result<&'a str, ParseError> {
        let text = self.text.trim_end();
        let (found, value) = match text.split_once(char::is_whitespace) {
            Some((k, v)) => (k, v.trim()),
            None => (text, ""),
        };
        if found != key {
            return Err(self.error(format!("expected header {}", key)));
        }
        if value.is_empty() {
            return Err(self.error(format!("header {} has no value", key)));
        }
        Ok(value)
    }

    /// Matches the line against a record layout and pairs fields with text.
    pub fn record<F: RecordField>(
        &self,
        keyword: &str,
        table: &'static [RecordLayout<F>],
    ) -> Result<Vec<(F, &'a str)>, ParseError> {
        let version = self
            .version
            .ok_or_else(|| self.error("record before format version"))?;
        let tokens = tokenize(self.text);
        match tokens.first() {
            Some(t) if t.text == keyword => {}
            _ => return Err(self.error(format!("expected {} record", keyword))),
        }
        let values = &tokens[1..];

        let shapes = shapes_for(table, version);
        if shapes.is_empty() {
            return Err(self.error(format!("{} records are not part of this format", keyword)));
        }

        for shape in shapes {
            let text_tail = shape.last().map(|f| f.is_text()).unwrap_or(false);
            let fits = if text_tail {
                values.len() >= shape.len()
            } else {
                values.len() == shape.len()
            };
            if !fits {
                continue;
            }
            let last = shape.len() - 1;
            let fields = shape
                .iter()
                .enumerate()
                .map(|(k, &field)| {
                    let text = if text_tail && k == last {
                        self.text[values[k].start..].trim_end()
                    } else {
                        values[k].text
                    };
                    (field, text)
                })
                .collect();
            return Ok(fields);
        }

        let expected: Vec<String> = shapes.iter().map(|s| s.len().to_string()).collect();
        Err(self.error(format!(
            "{} record has {} fields, expected {}",
            keyword,
            values.len(),
            expected.join(" or ")
        )))
    }
}

/// Sequential reader over the lines of a project file.
pub(crate) struct LineCursor<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    last_number: usize,
    pub version: Option<FormatVersion>,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            last_number: 0,
            version: None,
        }
    }

    /// Returns the next line, failing at end of input.
    pub fn next_line(&mut self, expecting: &str) -> Result<Line<'a>, ParseError> {
        match self.lines.next() {
            Some((i, text)) => {
                self.last_number = i + 1;
                Ok(Line {
                    number: i + 1,
                    text,
                    version: self.version,
                })
            }
            None => Err(ParseError {
                version: self.version,
                line: self.last_number + 1,
                content: String::new(),
                reason: format!("unexpected end of file, expected {}", expecting),
            }),
        }
    }

    /// Returns the first remaining line that is not blank, if any.
    pub fn next_non_blank(&mut self) -> Option<Line<'a>> {
        for (i, text) in self.lines.by_ref() {
            self.last_number = i + 1;
            if !text.trim().is_empty() {
                return Some(Line {
                    number: i + 1,
                    text,
                    version: self.version,
                });
            }
        }
        None
    }
}

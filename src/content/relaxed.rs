//! Comment-tolerant JSON
//!
//! Accepts standard JSON plus `//` and `#` line comments and `/* */` block comments.
//! Comments are blanked out with spaces before parsing so that line and column
//! numbers reported by `serde_json` still point into the original text.

use serde_json::Value;

/// Parse a comment-tolerant JSON document into a dynamic value
pub fn parse(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str(&strip_comments(text))
}

/// Replace every comment in `text` with whitespace of the same shape
///
/// Newlines inside block comments are kept. Comment markers inside string
/// literals are left alone. An unterminated block comment runs to the end
/// of the input.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut state = State::Code;

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '"' => {
                    state = State::Str;
                    out.push(c);
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                    out.push_str("  ");
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                    out.push_str("  ");
                }
                '#' => {
                    state = State::LineComment;
                    out.push(' ');
                }
                _ => out.push(c),
            },
            State::Str => {
                match c {
                    '\\' => {
                        out.push(c);
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                        continue;
                    }
                    '"' => state = State::Code,
                    _ => {}
                }
                out.push(c);
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                    out.push(c);
                } else {
                    blank(&mut out, c);
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                    out.push_str("  ");
                } else {
                    blank(&mut out, c);
                }
            }
        }
    }

    out
}

#[derive(Clone, Copy)]
enum State {
    Code,
    Str,
    LineComment,
    BlockComment,
}

fn blank(out: &mut String, c: char) {
    match c {
        '\n' | '\r' => out.push(c),
        _ => out.push(' '),
    }
}

//! Compact path notation: tokenizer, parser and serializer.
//!
//! Supports the move / line / cubic / quadratic / close subset of SVG path
//! data. Parsed commands always carry absolute coordinates; relative input is
//! resolved against the running cursor at parse time, so nothing downstream
//! needs to know whether the source was relative.

use std::fmt;

use thiserror::Error;

/// One parsed path command with absolute coordinates in the shape's local space.
///
/// The coordinate arrays are flat `x, y` pairs; their length is fixed by the
/// command type (2 for move/line, 4 for quadratic, 6 for cubic).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    Move([f32; 2]),
    Line([f32; 2]),
    Quadratic([f32; 4]),
    Cubic([f32; 6]),
    Close,
}

impl PathCommand {
    /// Absolute-form command letter.
    pub fn letter(&self) -> char {
        match self {
            PathCommand::Move(_) => 'M',
            PathCommand::Line(_) => 'L',
            PathCommand::Quadratic(_) => 'Q',
            PathCommand::Cubic(_) => 'C',
            PathCommand::Close => 'Z',
        }
    }

    /// Flat coordinate list (empty for close).
    pub fn points(&self) -> &[f32] {
        match self {
            PathCommand::Move(p) | PathCommand::Line(p) => p,
            PathCommand::Quadratic(p) => p,
            PathCommand::Cubic(p) => p,
            PathCommand::Close => &[],
        }
    }

    pub fn points_mut(&mut self) -> &mut [f32] {
        match self {
            PathCommand::Move(p) | PathCommand::Line(p) => p,
            PathCommand::Quadratic(p) => p,
            PathCommand::Cubic(p) => p,
            PathCommand::Close => &mut [],
        }
    }

    /// On-curve end point of the segment, if the command has one.
    pub fn endpoint(&self) -> Option<[f32; 2]> {
        let pts = self.points();
        let n = pts.len();
        (n >= 2).then(|| [pts[n - 2], pts[n - 1]])
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())?;
        for (i, v) in self.points().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Problems found while reading path data. The lenient parser skips past
/// them; [`parse_path_strict`] reports the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("unexpected character {found:?} at byte {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("unsupported path command {0:?}")]
    UnsupportedCommand(char),
    #[error("number {value} at byte {offset} does not belong to any command")]
    NumberWithoutCommand { value: f32, offset: usize },
    #[error("command {command} expects {expected} numbers, found {found}")]
    MissingArguments {
        command: char,
        expected: usize,
        found: usize,
    },
    #[error("number at byte {offset} is out of range")]
    NumberOutOfRange { offset: usize },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Letter(char),
    Number(f32),
    /// A well-formed literal too large for `f32`.
    OutOfRange,
    Invalid(char),
}

/// Splits path data into command letters and numbers. Whitespace and commas
/// separate tokens but are not required between them (`M0-5L.5.5` is valid).
struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek_byte(&self, at: usize) -> Option<u8> {
        self.src.as_bytes().get(at).copied()
    }

    fn digits_from(&self, mut at: usize) -> usize {
        while matches!(self.peek_byte(at), Some(b'0'..=b'9')) {
            at += 1;
        }
        at
    }

    /// Scans `[+-]? digits? ('.' digits?)? ([eE] [+-]? digits)?` with at least
    /// one mantissa digit, so `5.` is a number. Returns the end offset when a number starts here.
    fn scan_number(&self, start: usize) -> Option<usize> {
        let mut at = start;
        if matches!(self.peek_byte(at), Some(b'-' | b'+')) {
            at += 1;
        }
        let int_end = self.digits_from(at);
        let has_int = int_end > at;
        at = int_end;
        let mut has_frac = false;
        if self.peek_byte(at) == Some(b'.') {
            let frac_end = self.digits_from(at + 1);
            if frac_end > at + 1 {
                has_frac = true;
                at = frac_end;
            } else if has_int {
                at += 1;
            }
        }
        if !has_int && !has_frac {
            return None;
        }
        if matches!(self.peek_byte(at), Some(b'e' | b'E')) {
            let mut exp = at + 1;
            if matches!(self.peek_byte(exp), Some(b'-' | b'+')) {
                exp += 1;
            }
            let exp_end = self.digits_from(exp);
            if exp_end > exp {
                at = exp_end;
            }
        }
        Some(at)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = (usize, Token);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let ch = self.src[self.pos..].chars().next()?;
            let start = self.pos;
            if ch.is_whitespace() || ch == ',' {
                self.pos += ch.len_utf8();
                continue;
            }
            if let Some(end) = self.scan_number(start) {
                self.pos = end;
                // The scanned slice is always a valid float literal.
                let value = self.src[start..end].parse::<f32>().unwrap_or(0.0);
                if !value.is_finite() {
                    return Some((start, Token::OutOfRange));
                }
                return Some((start, Token::Number(value)));
            }
            self.pos += ch.len_utf8();
            if ch.is_ascii_alphabetic() {
                return Some((start, Token::Letter(ch)));
            }
            return Some((start, Token::Invalid(ch)));
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verb {
    Move,
    Line,
    Quadratic,
    Cubic,
}

impl Verb {
    fn from_letter(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'M' => Some(Verb::Move),
            'L' => Some(Verb::Line),
            'Q' => Some(Verb::Quadratic),
            'C' => Some(Verb::Cubic),
            _ => None,
        }
    }

    fn arity(self) -> usize {
        match self {
            Verb::Move | Verb::Line => 2,
            Verb::Quadratic => 4,
            Verb::Cubic => 6,
        }
    }

    fn letter(self) -> char {
        match self {
            Verb::Move => 'M',
            Verb::Line => 'L',
            Verb::Quadratic => 'Q',
            Verb::Cubic => 'C',
        }
    }

    fn build(self, v: &[f32]) -> PathCommand {
        match self {
            Verb::Move => PathCommand::Move([v[0], v[1]]),
            Verb::Line => PathCommand::Line([v[0], v[1]]),
            Verb::Quadratic => PathCommand::Quadratic([v[0], v[1], v[2], v[3]]),
            Verb::Cubic => PathCommand::Cubic([v[0], v[1], v[2], v[3], v[4], v[5]]),
        }
    }
}

/// What the parser does with the next run of numbers.
#[derive(Clone, Copy, Debug)]
enum Pending {
    /// No command yet, or the last one was close.
    Nothing,
    /// An unsupported letter; its arguments are skipped.
    Skip,
    Verb { verb: Verb, relative: bool },
}

fn parse_inner(d: &str) -> (Vec<PathCommand>, Vec<PathError>) {
    let tokens: Vec<(usize, Token)> = Tokenizer::new(d).collect();
    let mut commands = Vec::new();
    let mut issues = Vec::new();
    let mut cursor = [0.0f32, 0.0];
    let mut subpath_start = [0.0f32, 0.0];
    let mut pending = Pending::Nothing;
    let mut i = 0;

    while i < tokens.len() {
        let (offset, token) = tokens[i];
        match token {
            Token::Invalid(found) => {
                issues.push(PathError::UnexpectedChar { found, offset });
                i += 1;
            }
            Token::OutOfRange => {
                // The command owning this number is dropped with the rest of its run.
                issues.push(PathError::NumberOutOfRange { offset });
                if matches!(pending, Pending::Verb { .. }) {
                    pending = Pending::Skip;
                }
                i += 1;
            }
            Token::Letter(ch) => {
                i += 1;
                if ch.eq_ignore_ascii_case(&'z') {
                    commands.push(PathCommand::Close);
                    cursor = subpath_start;
                    pending = Pending::Nothing;
                } else if let Some(verb) = Verb::from_letter(ch) {
                    pending = Pending::Verb { verb, relative: ch.is_ascii_lowercase() };
                } else {
                    issues.push(PathError::UnsupportedCommand(ch));
                    pending = Pending::Skip;
                }
            }
            Token::Number(value) => {
                let (verb, relative) = match pending {
                    Pending::Verb { verb, relative } => (verb, relative),
                    Pending::Skip => {
                        i += 1;
                        continue;
                    }
                    Pending::Nothing => {
                        issues.push(PathError::NumberWithoutCommand { value, offset });
                        i += 1;
                        continue;
                    }
                };
                let needed = verb.arity();
                let available = tokens[i..]
                    .iter()
                    .take(needed)
                    .take_while(|(_, t)| matches!(t, Token::Number(_)))
                    .count();
                if available < needed {
                    // Drop the incomplete command and resume at whatever follows it.
                    issues.push(PathError::MissingArguments {
                        command: if relative {
                            verb.letter().to_ascii_lowercase()
                        } else {
                            verb.letter()
                        },
                        expected: needed,
                        found: available,
                    });
                    i += available;
                    pending = Pending::Nothing;
                    continue;
                }
                let mut values = [0.0f32; 6];
                for (slot, (_, t)) in values.iter_mut().zip(&tokens[i..i + needed]) {
                    if let Token::Number(v) = t {
                        *slot = *v;
                    }
                }
                i += needed;
                if relative {
                    for pair in values[..needed].chunks_exact_mut(2) {
                        pair[0] += cursor[0];
                        pair[1] += cursor[1];
                    }
                }
                cursor = [values[needed - 2], values[needed - 1]];
                commands.push(verb.build(&values[..needed]));
                if verb == Verb::Move {
                    subpath_start = cursor;
                    // Extra pairs after a move are implicit line-tos.
                    pending = Pending::Verb { verb: Verb::Line, relative };
                }
            }
        }
    }
    (commands, issues)
}

/// Parse path data, keeping every well-formed command and discarding the rest.
///
/// Never fails: incomplete trailing commands, stray numbers, unsupported
/// letters and junk characters are skipped.
pub fn parse_path(d: &str) -> Vec<PathCommand> {
    let (commands, issues) = parse_inner(d);
    if let Some(first) = issues.first() {
        tracing::debug!(issues = issues.len(), first = %first, "path data partially discarded");
    }
    commands
}

/// Parse path data, failing on the first malformed piece.
pub fn parse_path_strict(d: &str) -> Result<Vec<PathCommand>, PathError> {
    let (commands, mut issues) = parse_inner(d);
    if issues.is_empty() {
        Ok(commands)
    } else {
        Err(issues.swap_remove(0))
    }
}

/// Render commands back to path notation: each command is its absolute letter
/// followed by space-separated coordinates, commands joined by spaces.
pub fn serialize_path(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

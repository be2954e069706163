use crate::error::{NuclidesError, Result};

/// Deepest parenthesis nesting accepted by [`parse_formula`].
pub const MAX_NESTING_DEPTH: usize = 64;

/// Parse a chemical formula into (symbol, count) pairs.
///
/// Symbols are returned as written, in order of first appearance, with
/// repeated symbols merged. Whether a symbol names a real element is left to
/// the caller. Supports nested parentheses, fractional and scientific-notation
/// counts, and counts with a leading dot (`Fe.7Mg.3O`).
///
/// # Examples
/// ```
/// let parsed = nuclides::chemparser::parse_formula("Mn(SO4)2").unwrap();
/// assert_eq!(parsed[0], ("Mn".to_string(), 1.0));
/// assert_eq!(parsed[1], ("S".to_string(), 2.0));
/// assert_eq!(parsed[2], ("O".to_string(), 8.0));
/// ```
pub fn parse_formula(formula: &str) -> Result<Vec<(String, f64)>> {
    let compact: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(invalid("empty formula"));
    }

    let mut parser = Parser {
        input: compact.as_bytes(),
        pos: 0,
    };
    let terms = parser.group(0)?;
    if parser.pos < parser.input.len() {
        return Err(invalid(format!(
            "unexpected '{}' at position {}",
            char::from(parser.input[parser.pos]),
            parser.pos
        )));
    }

    let mut merged: Vec<(String, f64)> = Vec::new();
    for (symbol, count) in terms {
        match merged.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, total)) => *total += count,
            None => merged.push((symbol, count)),
        }
    }
    Ok(merged)
}

/// Returns true if the formula is syntactically valid.
pub fn validate_formula(formula: &str) -> bool {
    parse_formula(formula).is_ok()
}

fn invalid(msg: impl Into<String>) -> NuclidesError {
    NuclidesError::InvalidFormula(msg.into())
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Terms up to the end of input or a closing parenthesis.
    fn group(&mut self, depth: usize) -> Result<Vec<(String, f64)>> {
        let mut terms = Vec::new();
        loop {
            match self.peek() {
                Some(b'(') => {
                    let open = self.pos;
                    if depth >= MAX_NESTING_DEPTH {
                        return Err(invalid(format!(
                            "nesting too deep at position {open} (max {MAX_NESTING_DEPTH})"
                        )));
                    }
                    self.pos += 1;
                    let inner = self.group(depth + 1)?;
                    if self.peek() != Some(b')') {
                        return Err(invalid(format!(
                            "unclosed parenthesis at position {open}"
                        )));
                    }
                    self.pos += 1;
                    if inner.is_empty() {
                        return Err(invalid(format!("empty group at position {open}")));
                    }
                    let count = self.count()?;
                    terms.extend(inner.into_iter().map(|(s, n)| (s, n * count)));
                }
                Some(b')') if depth > 0 => break,
                Some(c) if c.is_ascii_uppercase() => {
                    let start = self.pos;
                    self.pos += 1;
                    while self.peek().is_some_and(|c| c.is_ascii_lowercase()) {
                        self.pos += 1;
                    }
                    let symbol = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
                    let count = self.count()?;
                    terms.push((symbol, count));
                }
                _ => break,
            }
        }
        Ok(terms)
    }

    /// Optional count after a symbol or group; 1 if absent.
    fn count(&mut self) -> Result<f64> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if self.pos == start {
            return Ok(1.0);
        }
        // An exponent needs a digit after the optional sign, so "2Er" stays a count and a symbol.
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let digit_at = if matches!(self.peek_at(1), Some(b'+' | b'-')) { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += digit_at;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }

        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| invalid("non-ASCII count"))?;
        text.parse::<f64>()
            .map_err(|_| invalid(format!("invalid count '{text}'")))
    }
}

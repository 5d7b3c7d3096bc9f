//! Recursive descent over the source text, one function per grammar rule.
//!
//! Tokenization is folded into the rules because the dialect's unquoted
//! strings are context-dependent: a literal token runs until a structural
//! delimiter or an inline-comment opener, so there is no fixed lexeme
//! boundary to pre-compute.

use crate::error::ParseError;
use crate::tree::{comment_key, CommentedEntry, OrderedMap, Value};

/// Parse a complete pbxproj document.
///
/// Returns the root mapping with up to two entries: `headComment` (the
/// leading `// ...` line, if present) and `project` (the body mapping).
pub fn parse(source: &str) -> Result<OrderedMap, ParseError> {
    Parser { src: source, pos: 0 }.parse_project()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    // =========================================================================
    // Cursor primitives
    // =========================================================================

    fn at_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.src.as_bytes()[self.pos..].starts_with(prefix.as_bytes())
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn expect_byte(&mut self, byte: u8, rule: &'static str) -> Result<(), ParseError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(rule))
        }
    }

    fn expect_str(&mut self, prefix: &str, rule: &'static str) -> Result<(), ParseError> {
        if self.starts_with(prefix) {
            self.pos += prefix.len();
            Ok(())
        } else {
            Err(self.error(rule))
        }
    }

    fn error(&self, rule: &'static str) -> ParseError {
        let consumed = &self.src.as_bytes()[..self.pos];
        let line = consumed.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = consumed
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let column = self.pos - line_start + 1;
        let rest = String::from_utf8_lossy(&self.src.as_bytes()[self.pos..]);
        let snippet: String = rest.chars().take(24).collect();
        ParseError {
            line,
            column,
            rule,
            snippet: if snippet.is_empty() {
                "<end of input>".to_string()
            } else {
                snippet
            },
        }
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// Project := SingleLineComment? InlineComment? WS Mapping WS
    fn parse_project(mut self) -> Result<OrderedMap, ParseError> {
        let mut root = OrderedMap::new();
        self.skip_ws();
        if self.starts_with("//") {
            self.pos += 2;
            let start = self.pos;
            while let Some(b) = self.peek() {
                if b == b'\n' {
                    break;
                }
                self.pos += 1;
            }
            root.set("headComment", self.src[start..self.pos].trim());
        }
        self.skip_ws();
        if self.starts_with("/*") {
            self.inline_comment()?;
            self.skip_ws();
        }
        let body = self.mapping()?;
        root.set("project", Value::Mapping(body));
        self.skip_ws();
        if !self.at_eof() {
            return Err(self.error("end of input"));
        }
        Ok(root)
    }

    /// Mapping := '{' (AssignmentList | WS) '}'
    fn mapping(&mut self) -> Result<OrderedMap, ParseError> {
        self.expect_byte(b'{', "mapping")?;
        let body = self.assignment_list()?;
        self.expect_byte(b'}', "mapping close")?;
        Ok(body)
    }

    /// Assignments and delimited sections until `}` or a section end marker.
    ///
    /// The merge is left-biased: a duplicate key never overwrites the entry
    /// already present.
    fn assignment_list(&mut self) -> Result<OrderedMap, ParseError> {
        let mut map = OrderedMap::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None | Some(b'}') => break,
                Some(b'/') if self.starts_with("/*") => {
                    if self.starts_with("/* Begin ") {
                        self.delimited_section(&mut map)?;
                    } else {
                        // An `End` marker belonging to the enclosing section,
                        // or a misplaced comment the caller will reject.
                        break;
                    }
                }
                _ => self.assignment(&mut map)?,
            }
        }
        Ok(map)
    }

    /// DelimitedSection := '/* Begin N section */' AssignmentList '/* End N section */'
    fn delimited_section(&mut self, map: &mut OrderedMap) -> Result<(), ParseError> {
        self.expect_str("/* Begin ", "section begin")?;
        let name = self.plain_ident("section name")?;
        self.expect_str(" section */", "section begin")?;
        let body = self.assignment_list()?;
        self.skip_ws();
        self.expect_str("/* End ", "section end")?;
        let end_name = self.plain_ident("section name")?;
        self.expect_str(" section */", "section end")?;
        if end_name != name {
            return Err(self.error("matching section name"));
        }
        map.set_if_absent(name, Value::Mapping(body));
        Ok(())
    }

    /// Assignment := Simple | CommentedKey | CommentedValue
    ///
    /// All three shapes reduce to: key, optional label before `=`, value,
    /// optional label before `;`. A label contributes the `<key>_comment`
    /// entry immediately after the key's own entry.
    fn assignment(&mut self, map: &mut OrderedMap) -> Result<(), ParseError> {
        let key = self.ident()?;
        self.skip_ws();
        let mut comment = None;
        if self.starts_with("/*") {
            comment = Some(self.inline_comment()?);
            self.skip_ws();
        }
        self.expect_byte(b'=', "'='")?;
        self.skip_ws();
        let value = self.value()?;
        self.skip_ws();
        if comment.is_none() && self.starts_with("/*") {
            comment = Some(self.inline_comment()?);
            self.skip_ws();
        }
        self.expect_byte(b';', "';'")?;
        if map.set_if_absent(key.clone(), value) {
            if let Some(comment) = comment {
                map.set(comment_key(&key), comment);
            }
        }
        Ok(())
    }

    /// Value := Mapping | Sequence | Number | String
    fn value(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            Some(b'{') => Ok(Value::Mapping(self.mapping()?)),
            Some(b'(') => Ok(Value::Sequence(self.sequence()?)),
            Some(b'"') => Ok(Value::String(self.quoted_string()?)),
            _ => self.scalar(),
        }
    }

    /// Sequence := '(' (ArrayEntry (',' ArrayEntry)* ','?)? ')'
    ///
    /// An entry may carry an inline label; the pair is stored as the
    /// anonymous `{ value, comment }` mapping.
    fn sequence(&mut self) -> Result<Vec<Value>, ParseError> {
        self.expect_byte(b'(', "sequence")?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.error("sequence close")),
                _ => {}
            }
            let value = self.value()?;
            self.skip_ws();
            let item = if self.starts_with("/*") {
                let comment = self.inline_comment()?;
                match value {
                    Value::String(s) => CommentedEntry::new(s, comment).into_value(),
                    other => Value::Mapping(OrderedMap::from_entries([
                        ("value", other),
                        ("comment", Value::from(comment)),
                    ])),
                }
            } else {
                value
            };
            items.push(item);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.error("',' or ')'")),
            }
        }
        Ok(items)
    }

    /// An unquoted token: everything up to a structural delimiter or an
    /// inline-comment opener, trailing whitespace trimmed. A pure digit run
    /// that fits a 64-bit integer becomes `Integer`; anything else, digit
    /// runs too long for one included, stays `String` so the source
    /// spelling survives a round-trip.
    fn scalar(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(
                b,
                b';' | b',' | b'\n' | b'\r' | b'(' | b')' | b'{' | b'}' | b'"'
            ) {
                break;
            }
            if b == b'/' && self.starts_with("/*") {
                break;
            }
            self.pos += 1;
        }
        let text = self.src[start..self.pos].trim_end();
        self.pos = start + text.len();
        if text.is_empty() {
            return Err(self.error("value"));
        }
        // Leading-zero runs (LastUpgradeCheck = 0830) keep their spelling.
        if text.bytes().all(|b| b.is_ascii_digit()) && !(text.len() > 1 && text.starts_with('0')) {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Integer(n));
            }
        }
        Ok(Value::String(text.to_string()))
    }

    /// Ident := [A-Za-z0-9_.]+ | QuotedString
    ///
    /// Quoted keys keep their quotes, like quoted values do.
    fn ident(&mut self) -> Result<String, ParseError> {
        if self.peek() == Some(b'"') {
            self.quoted_string()
        } else {
            self.plain_ident("identifier")
        }
    }

    fn plain_ident(&mut self, rule: &'static str) -> Result<String, ParseError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error(rule));
        }
        Ok(self.src[start..self.pos].to_string())
    }

    /// QuotedString := '"' ('\' any | non-'"')* '"', outer quotes kept.
    fn quoted_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.expect_byte(b'"', "string")?;
        loop {
            match self.peek() {
                None => return Err(self.error("closing quote")),
                Some(b'\\') => {
                    self.pos += 1;
                    if self.at_eof() {
                        return Err(self.error("closing quote"));
                    }
                    self.pos += 1;
                }
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(self.src[start..self.pos].to_string());
                }
                _ => self.pos += 1,
            }
        }
    }

    /// InlineComment := '/*' ... '*/', content trimmed.
    fn inline_comment(&mut self) -> Result<String, ParseError> {
        self.expect_str("/*", "inline comment")?;
        let start = self.pos;
        loop {
            if self.at_eof() {
                return Err(self.error("inline comment close"));
            }
            if self.starts_with("*/") {
                let text = self.src[start..self.pos].trim().to_string();
                self.pos += 2;
                return Ok(text);
            }
            self.pos += 1;
        }
    }
}

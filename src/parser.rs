use crate::ast::{
    Assertion, AssertionKind, Backreference, Capture, Char, CharKind, Flags, Group, Node, Quantifier,
    QuantifierKind, Regex, Repetition,
};
use crate::error::{Error, Result, SyntaxErrorKind};
use std::str::FromStr;

// Deepest group nesting accepted, keeps the recursive descent off the end of the stack
pub const MAX_NESTING: usize = 256;

pub fn parse_pattern(s: &str) -> Result<Regex> {
    Regex::from_str(s)
}

impl FromStr for Regex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Parser::new(s).parse(Flags::default())
    }
}

impl Regex {
    pub fn with_flags(pattern: &str, flags: &str) -> Result<Self> {
        let flags = flags.parse::<Flags>()?;
        Parser::new(pattern).parse(flags)
    }

    // Parses the `/pattern/flags` literal form
    pub fn from_literal(literal: &str) -> Result<Self> {
        let (pattern, flags) = split_literal(literal)?;
        Self::with_flags(pattern, flags)
    }
}

pub(crate) fn split_literal(literal: &str) -> Result<(&str, &str)> {
    let rest = literal.strip_prefix('/').ok_or(Error::MalformedLiteral)?;
    let end = rest.rfind('/').ok_or(Error::MalformedLiteral)?;
    // `//` is not a regular expression
    if end == 0 {
        return Err(Error::MalformedLiteral);
    }
    Ok((&rest[..end], &rest[end + 1..]))
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    captures: usize,
    names: Vec<String>,
    named_references: Vec<(usize, String)>,
    nesting: usize,
}

impl Parser {
    fn new(pattern: &str) -> Self {
        Parser {
            chars: pattern.chars().collect(),
            pos: 0,
            captures: 0,
            names: Vec::new(),
            named_references: Vec::new(),
            nesting: 0,
        }
    }

    fn parse(mut self, flags: Flags) -> Result<Regex> {
        let body = self.disjunction()?;
        // A disjunction only stops early at a ')' nobody opened
        if self.peek().is_some() {
            return Err(self.error(SyntaxErrorKind::UnmatchedParen));
        }
        for (offset, name) in &self.named_references {
            if !self.names.contains(name) {
                return Err(Error::Syntax {
                    offset: *offset,
                    kind: SyntaxErrorKind::UnknownGroupName(name.clone()),
                });
            }
        }
        log::trace!("Parsed {} capture(s)", self.captures);
        Ok(Regex {
            body,
            flags,
            captures: self.captures,
        })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        let len = s.chars().count();
        let matches = self.pos + len <= self.chars.len()
            && s.chars().zip(&self.chars[self.pos..]).all(|(a, b)| a == *b);
        if matches {
            self.pos += len;
        }
        matches
    }

    fn error(&self, kind: SyntaxErrorKind) -> Error {
        Self::error_at(self.pos, kind)
    }

    fn error_at(offset: usize, kind: SyntaxErrorKind) -> Error {
        Error::Syntax { offset, kind }
    }

    // disjunction = alternative ( '|' alternative ) *
    fn disjunction(&mut self) -> Result<Option<Node>> {
        let mut node = self.alternative()?;
        while self.eat('|') {
            let right = self.alternative()?;
            node = Some(Node::Disjunction {
                left: node.map(Box::new),
                right: right.map(Box::new),
            });
        }
        Ok(node)
    }

    // alternative = term *
    fn alternative(&mut self) -> Result<Option<Node>> {
        let mut terms = vec![];
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            terms.push(self.term()?);
        }
        Ok(match terms.len() {
            0 => None,
            1 => terms.pop(),
            _ => Some(Node::Alternative(terms)),
        })
    }

    // term = atom quantifier ?
    fn term(&mut self) -> Result<Node> {
        let atom = self.atom()?;
        let quantifier_start = self.pos;
        match self.quantifier()? {
            Some(quantifier) => {
                if let Node::Assertion(assertion) = &atom {
                    if !assertion.kind.is_quantifiable() {
                        return Err(Self::error_at(quantifier_start, SyntaxErrorKind::NothingToRepeat));
                    }
                }
                Ok(Node::Repetition(Repetition {
                    expression: Box::new(atom),
                    quantifier,
                }))
            }
            None => Ok(atom),
        }
    }

    fn quantifier(&mut self) -> Result<Option<Quantifier>> {
        let kind = match self.peek() {
            Some('*') => QuantifierKind::Star,
            Some('+') => QuantifierKind::Plus,
            Some('?') => QuantifierKind::Optional,
            Some('{') => match self.braced_quantifier()? {
                Some(kind) => {
                    let greedy = !self.eat('?');
                    return Ok(Some(Quantifier { kind, greedy }));
                }
                None => return Ok(None),
            },
            _ => return Ok(None),
        };
        self.pos += 1;
        let greedy = !self.eat('?');
        Ok(Some(Quantifier { kind, greedy }))
    }

    // Parses `{n}`, `{n,}` or `{n,m}`. When the brace does not open a
    // quantifier the position is restored and the brace is a literal.
    fn braced_quantifier(&mut self) -> Result<Option<QuantifierKind>> {
        let start = self.pos;
        self.pos += 1;
        let Some(min) = self.number() else {
            self.pos = start;
            return Ok(None);
        };
        let max = if self.eat(',') { self.number() } else { Some(min) };
        if !self.eat('}') {
            self.pos = start;
            return Ok(None);
        }
        match max {
            Some(max) if max < min => Err(Self::error_at(start, SyntaxErrorKind::QuantifierOutOfOrder)),
            Some(max) if max == min => Ok(Some(QuantifierKind::Exact(min))),
            max => Ok(Some(QuantifierKind::Range { min, max })),
        }
    }

    fn number(&mut self) -> Option<u32> {
        let mut value: Option<u32> = None;
        while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
            self.pos += 1;
            value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit));
        }
        value
    }

    fn atom(&mut self) -> Result<Node> {
        let start = self.pos;
        let Some(c) = self.bump() else {
            return Err(self.error(SyntaxErrorKind::NothingToRepeat));
        };
        match c {
            '(' => self.group(start),
            '[' => self.class(start),
            '\\' => self.atom_escape(start),
            '.' => Ok(Node::Char(Char::meta(".", None))),
            '^' => Ok(Node::Assertion(Assertion::anchor(AssertionKind::Start))),
            '$' => Ok(Node::Assertion(Assertion::anchor(AssertionKind::End))),
            '*' | '+' | '?' => Err(Self::error_at(start, SyntaxErrorKind::NothingToRepeat)),
            '{' => {
                self.pos = start;
                if self.braced_quantifier()?.is_some() {
                    return Err(Self::error_at(start, SyntaxErrorKind::NothingToRepeat));
                }
                self.pos = start + 1;
                Ok(Node::Char(Char::simple('{')))
            }
            c => Ok(Node::Char(Char::simple(c))),
        }
    }

    fn group(&mut self, start: usize) -> Result<Node> {
        let lookaround = [
            ("?=", AssertionKind::Lookahead),
            ("?!", AssertionKind::NegativeLookahead),
            ("?<=", AssertionKind::Lookbehind),
            ("?<!", AssertionKind::NegativeLookbehind),
        ];
        for (prefix, kind) in lookaround {
            if self.eat_str(prefix) {
                let assertion = self.group_body(start)?;
                return Ok(Node::Assertion(Assertion { kind, assertion }));
            }
        }

        let capture = if self.eat_str("?:") {
            None
        } else if self.eat_str("?<") {
            let name_start = self.pos;
            let name = self.group_name()?;
            if self.names.contains(&name) {
                return Err(Self::error_at(name_start, SyntaxErrorKind::DuplicateGroupName(name)));
            }
            self.names.push(name.clone());
            Some(self.next_capture(Some(name)))
        } else if self.peek() == Some('?') {
            return Err(self.error(SyntaxErrorKind::InvalidGroup));
        } else {
            Some(self.next_capture(None))
        };

        let expression = self.group_body(start)?;
        Ok(Node::Group(Group { capture, expression }))
    }

    // Numbers are handed out at the opening paren, so nested groups follow
    // their parents.
    fn next_capture(&mut self, name: Option<String>) -> Capture {
        self.captures += 1;
        Capture {
            number: self.captures,
            name,
        }
    }

    fn group_body(&mut self, start: usize) -> Result<Option<Box<Node>>> {
        if self.nesting == MAX_NESTING {
            return Err(Self::error_at(start, SyntaxErrorKind::NestingTooDeep));
        }
        self.nesting += 1;
        let expression = self.disjunction()?;
        self.nesting -= 1;
        if !self.eat(')') {
            return Err(Self::error_at(start, SyntaxErrorKind::UnterminatedGroup));
        }
        Ok(expression.map(Box::new))
    }

    // Reads `name>` after the opening `<`
    fn group_name(&mut self) -> Result<String> {
        let start = self.pos;
        let mut name = String::new();
        loop {
            match self.bump() {
                Some('>') if !name.is_empty() => return Ok(name),
                Some(c) if c.is_alphabetic() || c == '_' || c == '$' => name.push(c),
                Some(c) if c.is_alphanumeric() && !name.is_empty() => name.push(c),
                _ => return Err(Self::error_at(start, SyntaxErrorKind::InvalidGroupName)),
            }
        }
    }

    fn atom_escape(&mut self, start: usize) -> Result<Node> {
        let Some(c) = self.bump() else {
            return Err(Self::error_at(start, SyntaxErrorKind::TrailingBackslash));
        };
        match c {
            'b' => Ok(Node::Assertion(Assertion::anchor(AssertionKind::WordBoundary))),
            'B' => Ok(Node::Assertion(Assertion::anchor(AssertionKind::NonWordBoundary))),
            '1'..='9' => {
                self.pos -= 1;
                let number = self.number().unwrap_or_default() as usize;
                Ok(Node::Backreference(Backreference::Number(number)))
            }
            'k' if self.peek() == Some('<') => {
                self.pos += 1;
                let name = self.group_name()?;
                self.named_references.push((start, name.clone()));
                Ok(Node::Backreference(Backreference::Name(name)))
            }
            c => self.char_escape(c, start, false).map(Node::Char),
        }
    }

    fn char_escape(&mut self, c: char, start: usize, in_class: bool) -> Result<Char> {
        let escaped = match c {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' => Char::meta(format!("\\{c}"), None),
            'n' => Char::meta("\\n", Some(0x0a)),
            't' => Char::meta("\\t", Some(0x09)),
            'r' => Char::meta("\\r", Some(0x0d)),
            'f' => Char::meta("\\f", Some(0x0c)),
            'v' => Char::meta("\\v", Some(0x0b)),
            '0' => Char::meta("\\0", Some(0)),
            'b' if in_class => Char::meta("\\b", Some(0x08)),
            'c' => match self.peek() {
                Some(letter) if letter.is_ascii_alphabetic() => {
                    self.pos += 1;
                    Char {
                        value: format!("\\c{letter}"),
                        kind: CharKind::Control,
                        code_point: Some(letter as u32 % 32),
                    }
                }
                _ => return Err(Self::error_at(start, SyntaxErrorKind::InvalidEscape)),
            },
            'x' => match self.hex_digits(2) {
                Some((digits, code_point)) => Char {
                    value: format!("\\x{digits}"),
                    kind: CharKind::Hex,
                    code_point: Some(code_point),
                },
                None => Char::simple('x'),
            },
            'u' => match self.unicode_escape() {
                Some((text, code_point)) => Char {
                    value: format!("\\u{text}"),
                    kind: CharKind::Unicode,
                    code_point: Some(code_point),
                },
                None => Char::simple('u'),
            },
            c => Char::simple(c),
        };
        Ok(escaped)
    }

    fn hex_digits(&mut self, count: usize) -> Option<(String, u32)> {
        let digits: String = self.chars.get(self.pos..self.pos + count)?.iter().collect();
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let code_point = u32::from_str_radix(&digits, 16).ok()?;
        self.pos += count;
        Some((digits, code_point))
    }

    // `\uHHHH` or `\u{H...}`, returning the text after `\u`
    fn unicode_escape(&mut self) -> Option<(String, u32)> {
        if self.peek() != Some('{') {
            return self.hex_digits(4);
        }
        let close = self.chars[self.pos..].iter().position(|&c| c == '}')?;
        let digits: String = self.chars[self.pos + 1..self.pos + close].iter().collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let code_point = u32::from_str_radix(&digits, 16).ok().filter(|&cp| cp <= 0x10ffff)?;
        self.pos += close + 1;
        Some((format!("{{{digits}}}"), code_point))
    }

    fn class(&mut self, start: usize) -> Result<Node> {
        let negative = self.eat('^');
        let mut expressions = vec![];
        loop {
            let Some(c) = self.bump() else {
                return Err(Self::error_at(start, SyntaxErrorKind::UnterminatedClass));
            };
            if c == ']' {
                break;
            }
            let item_start = self.pos - 1;
            let from = self.class_atom(c, start)?;
            let is_range = self.peek() == Some('-') && self.peek_at(1).is_some_and(|next| next != ']');
            if !is_range {
                expressions.push(Node::Char(from));
                continue;
            }
            self.pos += 1;
            let Some(next) = self.bump() else {
                return Err(Self::error_at(start, SyntaxErrorKind::UnterminatedClass));
            };
            let to = self.class_atom(next, start)?;
            match (from.code_point, to.code_point) {
                (Some(low), Some(high)) if low > high => {
                    return Err(Self::error_at(item_start, SyntaxErrorKind::RangeOutOfOrder));
                }
                (Some(_), Some(_)) => expressions.push(Node::ClassRange { from, to }),
                // Class escapes such as `\d` cannot bound a range, the dash is literal
                _ => {
                    expressions.push(Node::Char(from));
                    expressions.push(Node::Char(Char::simple('-')));
                    expressions.push(Node::Char(to));
                }
            }
        }
        Ok(Node::CharacterClass { negative, expressions })
    }

    fn class_atom(&mut self, c: char, class_start: usize) -> Result<Char> {
        if c != '\\' {
            return Ok(Char::simple(c));
        }
        let escape_start = self.pos - 1;
        match self.bump() {
            Some(escaped) => self.char_escape(escaped, escape_start, true),
            None => Err(Self::error_at(class_start, SyntaxErrorKind::UnterminatedClass)),
        }
    }
}

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

// Parsed regular expression: the tree plus the flags it was written with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Regex {
    pub body: Option<Node>,
    pub flags: Flags,
    pub captures: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Char(Char),
    Group(Group),
    Repetition(Repetition),
    Alternative(Vec<Node>),
    Disjunction {
        left: Option<Box<Node>>,
        right: Option<Box<Node>>,
    },
    Assertion(Assertion),
    CharacterClass {
        negative: bool,
        expressions: Vec<Node>,
    },
    ClassRange {
        from: Char,
        to: Char,
    },
    Backreference(Backreference),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Char {
    pub value: String,
    pub kind: CharKind,
    pub code_point: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharKind {
    Simple,
    Meta,
    Hex,
    Unicode,
    Control,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub capture: Option<Capture>,
    pub expression: Option<Box<Node>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    pub number: usize,
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repetition {
    pub expression: Box<Node>,
    pub quantifier: Quantifier,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quantifier {
    pub kind: QuantifierKind,
    pub greedy: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantifierKind {
    Star,
    Plus,
    Optional,
    Exact(u32),
    Range { min: u32, max: Option<u32> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assertion {
    pub kind: AssertionKind,
    pub assertion: Option<Box<Node>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssertionKind {
    Start,
    End,
    WordBoundary,
    NonWordBoundary,
    Lookahead,
    NegativeLookahead,
    Lookbehind,
    NegativeLookbehind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backreference {
    Number(usize),
    Name(String),
}

impl Char {
    pub fn simple(c: char) -> Self {
        Char {
            value: c.to_string(),
            kind: CharKind::Simple,
            code_point: Some(c as u32),
        }
    }

    pub fn meta(value: impl Into<String>, code_point: Option<u32>) -> Self {
        Char {
            value: value.into(),
            kind: CharKind::Meta,
            code_point,
        }
    }

    // Template text, no single code point
    pub fn placeholder(value: impl Into<String>) -> Self {
        Char {
            value: value.into(),
            kind: CharKind::Simple,
            code_point: None,
        }
    }
}

impl Capture {
    pub fn identity(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.number.to_string(),
        }
    }
}

impl Assertion {
    pub fn anchor(kind: AssertionKind) -> Self {
        Assertion { kind, assertion: None }
    }
}

impl AssertionKind {
    // Only lookaheads may carry a quantifier
    pub fn is_quantifiable(&self) -> bool {
        matches!(self, AssertionKind::Lookahead | AssertionKind::NegativeLookahead)
    }
}

impl Node {
    pub fn capture(&self) -> Option<&Capture> {
        match self {
            Node::Group(Group { capture: Some(capture), .. }) => Some(capture),
            _ => None,
        }
    }

    // Depth-first in document order; children are skipped when `visit` returns false
    pub fn walk<F: FnMut(&Node) -> bool>(&self, visit: &mut F) {
        if !visit(self) {
            return;
        }
        match self {
            Node::Group(group) => {
                if let Some(expression) = &group.expression {
                    expression.walk(visit);
                }
            }
            Node::Repetition(repetition) => repetition.expression.walk(visit),
            Node::Alternative(expressions) | Node::CharacterClass { expressions, .. } => {
                for expression in expressions {
                    expression.walk(visit);
                }
            }
            Node::Disjunction { left, right } => {
                for branch in [left, right].into_iter().flatten() {
                    branch.walk(visit);
                }
            }
            Node::Assertion(assertion) => {
                if let Some(body) = &assertion.assertion {
                    body.walk(visit);
                }
            }
            Node::Char(_) | Node::ClassRange { .. } | Node::Backreference(_) => {}
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub has_indices: bool,
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub unicode_sets: bool,
    pub sticky: bool,
}

impl FromStr for Flags {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut flags = Flags::default();
        for c in s.chars() {
            let slot = match c {
                'd' => &mut flags.has_indices,
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multiline,
                's' => &mut flags.dot_all,
                'u' => &mut flags.unicode,
                'v' => &mut flags.unicode_sets,
                'y' => &mut flags.sticky,
                other => return Err(Error::InvalidFlag(other)),
            };
            if std::mem::replace(slot, true) {
                return Err(Error::DuplicateFlag(c));
            }
        }
        Ok(flags)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = [
            (self.has_indices, 'd'),
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.unicode_sets, 'v'),
            (self.sticky, 'y'),
        ];
        for (enabled, flag) in set {
            if enabled {
                write!(f, "{flag}")?;
            }
        }
        Ok(())
    }
}

use std::fmt;
use std::str::FromStr;

use crate::ast::{Flags, Node, Regex};
use crate::error::{Error, Result};
use crate::parser::{parse_pattern, split_literal};
use crate::rewrite::Rewriter;
use crate::Mode;

/// Converts a pattern into its template. `mode` accepts a [`Mode`] or its
/// name; unknown names mean Mustache.
pub fn convert(pattern: &str, mode: impl Into<Mode>) -> Result<String> {
    let regex = parse_pattern(pattern)?;
    Ok(render(regex, mode.into()))
}

pub fn render(regex: Regex, mode: Mode) -> String {
    log::debug!("Parsed pattern: {:?}", regex);
    let rewritten = Rewriter::new(mode).rewrite(regex);
    let template = serialize(&rewritten);
    log::debug!("{} template: {:?}", mode, template);
    template
}

// Character classes and assertion bodies never contribute text
pub fn serialize(regex: &Regex) -> String {
    let mut template = String::new();
    if let Some(body) = &regex.body {
        body.walk(&mut |node: &Node| match node {
            Node::Char(c) => {
                template.push_str(&c.value);
                true
            }
            Node::CharacterClass { .. } | Node::Assertion(_) => false,
            _ => true,
        });
    }
    template
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegexTemplate {
    pattern: String,
    flags: Flags,
    mode: Mode,
    template: String,
}

impl RegexTemplate {
    pub fn new(pattern: &str, mode: impl Into<Mode>) -> Result<Self> {
        Self::with_flags(pattern, "", mode)
    }

    pub fn with_flags(pattern: &str, flags: &str, mode: impl Into<Mode>) -> Result<Self> {
        let mode = mode.into();
        let regex = Regex::with_flags(pattern, flags)?;
        let flags = regex.flags;
        Ok(RegexTemplate {
            pattern: pattern.to_string(),
            flags,
            mode,
            template: render(regex, mode),
        })
    }

    pub fn from_literal(literal: &str, mode: impl Into<Mode>) -> Result<Self> {
        let (pattern, flags) = split_literal(literal)?;
        Self::with_flags(pattern, flags, mode)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl fmt::Display for RegexTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl FromStr for RegexTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s, Mode::default())
    }
}

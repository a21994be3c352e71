pub mod ast;
mod error;
mod mode;
mod parser;
mod rewrite;
mod template;

pub use ast::Regex;
pub use error::{Error, Result, SyntaxErrorKind};
pub use mode::Mode;
pub use parser::{parse_pattern, MAX_NESTING};
pub use rewrite::{strip, Rewriter, EXPANSION_LIMIT};
pub use template::{convert, render, serialize, RegexTemplate};

use anyhow::{bail, Context};
use std::env;

pub fn run() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let mut mode = Mode::default();
    let mut flags = String::new();
    let mut pattern = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-m" | "--mode" => {
                let name = args.next().context("No mode provided after --mode")?;
                mode = Mode::from(name.as_str());
            }
            "-f" | "--flags" => flags = args.next().context("No flags provided after --flags")?,
            other => {
                if pattern.is_some() {
                    bail!("Unexpected argument {:?}", other);
                }
                pattern = Some(other.to_string());
            }
        }
    }

    let pattern = pattern.context("No pattern provided")?;
    log::debug!("Pattern string: {:?}", pattern);
    let template = RegexTemplate::with_flags(&pattern, &flags, mode)
        .with_context(|| format!("Failed to convert {:?}", pattern))?;
    println!("{}", template);
    Ok(())
}

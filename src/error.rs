use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid pattern at offset {offset}: {kind}")]
    Syntax { offset: usize, kind: SyntaxErrorKind },

    #[error("invalid regular expression flag '{0}'")]
    InvalidFlag(char),

    #[error("duplicate regular expression flag '{0}'")]
    DuplicateFlag(char),

    #[error("regular expression literal must look like /pattern/flags")]
    MalformedLiteral,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("unterminated group")]
    UnterminatedGroup,
    #[error("unmatched ')'")]
    UnmatchedParen,
    #[error("unterminated character class")]
    UnterminatedClass,
    #[error("nothing to repeat")]
    NothingToRepeat,
    #[error("numbers out of order in {{}} quantifier")]
    QuantifierOutOfOrder,
    #[error("range out of order in character class")]
    RangeOutOfOrder,
    #[error("\\ at end of pattern")]
    TrailingBackslash,
    #[error("invalid group")]
    InvalidGroup,
    #[error("invalid capture group name")]
    InvalidGroupName,
    #[error("duplicate capture group name '{0}'")]
    DuplicateGroupName(String),
    #[error("invalid named reference '{0}'")]
    UnknownGroupName(String),
    #[error("invalid escape")]
    InvalidEscape,
    #[error("groups nested too deeply")]
    NestingTooDeep,
}

pub type Result<T> = std::result::Result<T, Error>;

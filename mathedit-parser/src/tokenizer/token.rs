use logos::Logos;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The lexical classes of the linear notation.
///
/// The opening brackets `(`, `[` and `{` all produce [`TokenKind::OpenParen`], and the closing
/// brackets all produce [`TokenKind::CloseParen`]; bracket styles are interchangeable.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    #[regex(r"\s+")]
    Whitespace,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("^")]
    Exp,

    #[token("(")]
    #[token("[")]
    #[token("{")]
    OpenParen,

    #[token(")")]
    #[token("]")]
    #[token("}")]
    CloseParen,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[a-zA-Z_]")]
    Var,
}

impl TokenKind {
    /// Returns true for whitespace, which separates tokens but is otherwise ignored.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }

    /// Returns true if the token can begin an atom (a variable, an integer, or a parenthesized
    /// expression). Such a token directly following an atom is an implicit multiplication.
    pub fn starts_atom(self) -> bool {
        matches!(self, TokenKind::Var | TokenKind::Int | TokenKind::OpenParen)
    }
}

/// A token of the source, borrowing its text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token<'source> {
    /// Byte range of the token in the source.
    pub span: Range<usize>,

    pub kind: TokenKind,

    /// The text of the token, such as `x` or `144`.
    pub lexeme: &'source str,
}

//! The kinds of errors that can occur while parsing an expression.

use ariadne::Fmt;
use mathedit_attrs::ErrorKind;
use mathedit_error::EXPR;

/// A character that does not begin any token.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown character `{}`", character),
    labels = ["this character is not part of the notation"],
    help = format!("expressions may only contain integers, single-letter variables, and {}", "+ - * / ^ ( ) [ ] { }".fg(EXPR)),
)]
pub struct UnknownCharacter {
    /// The character that was found.
    pub character: String,
}

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
    help = "check for an unmatched closing bracket",
)]
pub struct ExpectedEof;

/// A token was found where it cannot appear.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unexpected token: `{}`", found),
    labels = ["here"],
)]
pub struct UnexpectedToken {
    /// The text of the token that was found.
    pub found: String,
}

/// A sum that contains no terms at all.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected an expression",
    labels = [format!("I expected to see an {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedExpr;

/// An integer literal that does not fit the integer storage of the tree.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "integer is too large",
    labels = ["this integer"],
    help = format!("integers must be at most {}", u64::MAX.fg(EXPR)),
)]
pub struct IntegerTooLarge;

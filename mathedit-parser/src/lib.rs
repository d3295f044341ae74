//! Tokenizer and parser for the linear notation of mathedit expressions.
//!
//! The notation consists of unsigned integers, single-letter variables, the operators
//! `+ - * / ^`, and brackets (`(`, `[` and `{` are interchangeable, as are their closing
//! counterparts). Atoms written next to each other are multiplied, so `2x(y+1)` means
//! `2*x*(y+1)`.
//!
//! Operators are reduced in the order `^`, `/`, `*`, then `+`/`-`. `^` and `/` are binary and
//! left-associative; runs of `*` produce a single [`Elem::Product`](mathedit_tree::Elem::Product)
//! and runs of `+`/`-` a single [`Elem::Sum`](mathedit_tree::Elem::Sum), in which every
//! subtracted term is wrapped in a [`Elem::Negation`](mathedit_tree::Elem::Negation):
//!
//! ```
//! use mathedit_parser::parse;
//! use mathedit_tree::{ElemKind, Tree};
//!
//! let mut tree = Tree::new();
//! let sum = parse(&mut tree, "-x^2-y").unwrap();
//!
//! assert_eq!(tree.kind(sum), ElemKind::Sum);
//! for term in tree.children(sum) {
//!     assert_eq!(tree.kind(term), ElemKind::Negation);
//! }
//! assert_eq!(tree.display(sum).to_string(), "-x^2 - y");
//! ```

pub mod parser;
pub mod tokenizer;

pub use mathedit_error::Error;
pub use parser::Parser;

use mathedit_tree::{ElemId, Tree};

/// Parses the source into a new, unattached element of the given tree.
///
/// Use [`Error::report_to_stderr`] to show the error, if any, to the user.
pub fn parse(tree: &mut Tree, source: &str) -> Result<ElemId, Error> {
    Parser::new(source)?.parse_full(tree)
}

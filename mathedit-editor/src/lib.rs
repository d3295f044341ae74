//! Interactive editing of algebraic expression trees.
//!
//! A [`Session`] owns an expression [`Tree`](mathedit_tree::Tree) and a [`Selection`] of its
//! elements. The user moves the selection around the tree, then runs [`Action`]s on it: each
//! action is a rewrite rule (expanding a product, factoring terms, cancelling opposite terms,
//! and so on) bound to a key, and listed in the [`CATALOG`].
//!
//! ```
//! use mathedit_editor::Session;
//!
//! let mut session = Session::parse("a*(b + c)").unwrap();
//! session.select_child().unwrap();
//! assert_eq!(session.run_binding("E"), Some(true));
//!
//! let tree = session.tree();
//! assert_eq!(tree.display(tree.content()).to_string(), "a*b + a*c");
//! ```

pub mod action;
pub mod catalog;
pub mod selection;
pub mod session;

#[cfg(test)]
mod test_util;

pub use action::{Action, ActionKind};
pub use catalog::{Catalog, CATALOG};
pub use selection::{Direction, GrowMode, SelectError, Selection};
pub use session::Session;

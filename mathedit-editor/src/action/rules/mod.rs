//! The algebraic rewrite rules behind the built-in actions.
//!
//! Every rule is a plain function that either transforms the tree and returns the elements to
//! select, or leaves the tree untouched and returns [`None`].

mod cancel;
mod edit;
mod expand;
mod factor;
mod minus;
mod swap;
mod unnest;

pub use cancel::cancel;
pub use edit::edit_as_text;
pub use expand::expand;
pub use factor::{factor, factor_all_terms};
pub use minus::{bring_minus_inside, bring_minus_to_front};
pub use swap::swap;
pub use unnest::unnest;

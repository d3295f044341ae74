use std::fmt::{self, Display, Formatter};
use super::{Elem, ElemId, ParenPurpose, Tree};

/// Writes an element of a [`Tree`] as text.
///
/// Created by [`Tree::display`] and [`Tree::display_for`].
pub struct ElemDisplay<'a> {
    tree: &'a Tree,
    id: ElemId,
    purpose: ParenPurpose,
}

impl<'a> ElemDisplay<'a> {
    pub(crate) fn new(tree: &'a Tree, id: ElemId, purpose: ParenPurpose) -> Self {
        Self { tree, id, purpose }
    }

    /// Returns a display of the given child element with the same tree and purpose.
    fn child(&self, id: ElemId) -> Self {
        Self::new(self.tree, id, self.purpose)
    }

    /// Writes the child of `parent`, surrounding it with parentheses if needed.
    fn fmt_child(&self, f: &mut Formatter, parent: ElemId, child: ElemId) -> fmt::Result {
        if self.tree.child_needs_parens(parent, child, self.purpose) {
            write!(f, "({})", self.child(child))
        } else {
            write!(f, "{}", self.child(child))
        }
    }
}

impl Display for ElemDisplay<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let id = self.id;
        match self.tree.get(id) {
            Elem::Symbol(name) => write!(f, "{}", name),
            Elem::IntConstant(value) => write!(f, "{}", value),
            Elem::Negation { inner } => {
                write!(f, "-")?;
                self.fmt_child(f, id, *inner)
            },
            Elem::Fraction { numer, denom } => {
                self.fmt_child(f, id, *numer)?;
                write!(f, "/")?;
                self.fmt_child(f, id, *denom)
            },
            Elem::Power { base, exponent } => {
                self.fmt_child(f, id, *base)?;
                write!(f, "^")?;
                self.fmt_child(f, id, *exponent)
            },
            Elem::Product(factors) => {
                for (i, &factor) in factors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    self.fmt_child(f, id, factor)?;
                }
                Ok(())
            },
            Elem::Sum(terms) => {
                // negated terms are written as subtractions; the parentheses of the negated
                // element are decided by the negation it sits in
                for (i, &term) in terms.iter().enumerate() {
                    match self.tree.as_negation(term) {
                        Some(inner) => {
                            write!(f, "{}", if i == 0 { "-" } else { " - " })?;
                            self.fmt_child(f, term, inner)?;
                        },
                        None => {
                            if i > 0 {
                                write!(f, " + ")?;
                            }
                            self.fmt_child(f, id, term)?;
                        },
                    }
                }
                Ok(())
            },
            Elem::Root { inner } => self.fmt_child(f, id, *inner),
        }
    }
}

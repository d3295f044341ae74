use slotmap::new_key_type;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

new_key_type! {
    /// A handle to an element stored in a [`Tree`](crate::Tree).
    ///
    /// Handles are compared by identity: two handles are equal only if they refer to the same
    /// element instance. Use [`Tree::equals`](crate::Tree::equals) to compare elements
    /// structurally.
    pub struct ElemId;
}

/// The variant of an element, along with the handles of its child elements.
///
/// Fixed-arity containers name their children; the list containers ([`Elem::Product`] and
/// [`Elem::Sum`]) store them in order. A subtraction `x - y` is represented as
/// `Sum[x, Negation(y)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Elem {
    /// A variable, such as `x`.
    Symbol(String),

    /// A non-negative integer, such as `2` or `144`.
    IntConstant(u64),

    /// The additive inverse of the inner element, such as `-x`.
    Negation { inner: ElemId },

    /// A fraction, such as `x/y`.
    Fraction { numer: ElemId, denom: ElemId },

    /// An element raised to a power, such as `x^2`.
    Power { base: ElemId, exponent: ElemId },

    /// Two or more factors multiplied together.
    Product(Vec<ElemId>),

    /// Two or more terms added together. Subtracted terms are wrapped in [`Elem::Negation`].
    Sum(Vec<ElemId>),

    /// The parent-of-everything element, which wraps the whole expression of a tree.
    Root { inner: ElemId },
}

impl Elem {
    /// Returns the variant tag of this element.
    pub fn kind(&self) -> ElemKind {
        match self {
            Self::Symbol(_) => ElemKind::Symbol,
            Self::IntConstant(_) => ElemKind::IntConstant,
            Self::Negation { .. } => ElemKind::Negation,
            Self::Fraction { .. } => ElemKind::Fraction,
            Self::Power { .. } => ElemKind::Power,
            Self::Product(_) => ElemKind::Product,
            Self::Sum(_) => ElemKind::Sum,
            Self::Root { .. } => ElemKind::Root,
        }
    }

    /// Returns the child elements in slot order. Leaf variants have no children.
    pub fn children(&self) -> Vec<ElemId> {
        match self {
            Self::Symbol(_) | Self::IntConstant(_) => Vec::new(),
            Self::Negation { inner } | Self::Root { inner } => vec![*inner],
            Self::Fraction { numer, denom } => vec![*numer, *denom],
            Self::Power { base, exponent } => vec![*base, *exponent],
            Self::Product(children) | Self::Sum(children) => children.clone(),
        }
    }

    /// Returns the slot holding the given child, if it is a child of this element.
    pub(crate) fn slot_of_mut(&mut self, child: ElemId) -> Option<&mut ElemId> {
        match self {
            Self::Symbol(_) | Self::IntConstant(_) => None,
            Self::Negation { inner } | Self::Root { inner } => (*inner == child).then_some(inner),
            Self::Fraction { numer, denom } => [numer, denom].into_iter().find(|slot| **slot == child),
            Self::Power { base, exponent } => [base, exponent].into_iter().find(|slot| **slot == child),
            Self::Product(children) | Self::Sum(children) => children.iter_mut().find(|slot| **slot == child),
        }
    }

    /// Returns the list of children if this element is a list container.
    pub(crate) fn list_mut(&mut self) -> Option<&mut Vec<ElemId>> {
        match self {
            Self::Product(children) | Self::Sum(children) => Some(children),
            _ => None,
        }
    }
}

/// The variant tag of an [`Elem`], without any of its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElemKind {
    Symbol,
    IntConstant,
    Negation,
    Fraction,
    Power,
    Product,
    Sum,
    Root,
}

impl ElemKind {
    /// Returns the precedence of elements of this kind.
    pub fn precedence(self) -> Precedence {
        match self {
            Self::Root => Precedence::Any,
            Self::Sum | Self::Negation => Precedence::Term,
            Self::Product => Precedence::Factor,
            Self::Fraction => Precedence::Fraction,
            Self::Power => Precedence::Exp,
            Self::Symbol | Self::IntConstant => Precedence::Atom,
        }
    }

    /// Returns true if elements of this kind are variable-arity lists.
    pub fn is_list(self) -> bool {
        matches!(self, Self::Product | Self::Sum)
    }

    /// Returns true if elements of this kind have no children.
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Symbol | Self::IntConstant)
    }

    /// Returns the value a list of this kind collapses to when it has no children.
    pub(crate) fn identity(self) -> Option<u64> {
        match self {
            Self::Sum => Some(0),
            Self::Product => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for ElemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Symbol => "Symbol",
            Self::IntConstant => "IntConstant",
            Self::Negation => "Negation",
            Self::Fraction => "Fraction",
            Self::Power => "Power",
            Self::Product => "Product",
            Self::Sum => "Sum",
            Self::Root => "Root",
        };
        f.write_str(name)
    }
}

/// The precedence of an element, in order from lowest (binds loosest) to highest.
///
/// Precedence is only used to decide if a child element needs parentheses around it: a child
/// needs them if the precedence of its parent is greater than or equal to its own precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// The root wrapper, which never parenthesizes its child.
    Any,

    /// Sums and negations, which separate terms.
    Term,

    /// Products, which separate factors.
    Factor,

    /// Fractions.
    Fraction,

    /// Powers.
    Exp,

    /// Symbols and integer constants, which are never parenthesized.
    Atom,
}

/// The reason parentheses are being considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParenPurpose {
    /// Linear text that must parse back into the same tree.
    Text,

    /// Two-dimensional display, where the exponent of a power is raised and needs no
    /// parentheses.
    Display,
}

//! Binary operators and the order in which they are reduced.

use crate::tokenizer::TokenKind;

/// A binary operator between two atoms of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Exp,
    Div,
    /// Explicit `*`, or two atoms written next to each other.
    Mul,
    Add,
    Sub,
}

impl BinOp {
    /// Returns the operator represented by the given token, if any.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Exp => Some(Self::Exp),
            TokenKind::Div => Some(Self::Div),
            TokenKind::Mul => Some(Self::Mul),
            TokenKind::Add => Some(Self::Add),
            TokenKind::Sub => Some(Self::Sub),
            _ => None,
        }
    }

    /// Returns the class the operator is reduced with.
    pub fn class(self) -> OpClass {
        match self {
            Self::Exp => OpClass::Exp,
            Self::Div => OpClass::Div,
            Self::Mul => OpClass::Mul,
            Self::Add | Self::Sub => OpClass::Term,
        }
    }
}

/// A group of operators that are reduced together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    /// `^`, reduced pairwise from the left.
    Exp,

    /// `/`, reduced pairwise from the left.
    Div,

    /// `*`, reduced in maximal runs into a single product.
    Mul,

    /// `+` and `-`, reduced in maximal runs into a single sum.
    Term,
}

impl OpClass {
    /// The classes in the order they are reduced, from the tightest binding to the loosest.
    pub const REDUCTION_ORDER: [Self; 4] = [Self::Exp, Self::Div, Self::Mul, Self::Term];

    /// Returns true if a maximal run of operators of this class is reduced at once into one
    /// list element, rather than one operator at a time.
    pub fn reduces_runs(self) -> bool {
        matches!(self, Self::Mul | Self::Term)
    }
}

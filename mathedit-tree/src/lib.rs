//! The expression tree model used by the mathedit editor.
//!
//! Every element of an expression lives in a [`Tree`], an arena that hands out [`ElemId`]
//! handles. An element is one of the variants of [`Elem`]: a [`Elem::Symbol`] or
//! [`Elem::IntConstant`] leaf, a fixed-arity container ([`Elem::Negation`], [`Elem::Fraction`],
//! [`Elem::Power`]), or a list container ([`Elem::Product`], [`Elem::Sum`]). The whole expression
//! hangs off a fixed [`Elem::Root`] wrapper, returned by [`Tree::root`], so that every element
//! the user can select has a parent and can be replaced in place.
//!
//! # Ownership
//!
//! The tree enforces single ownership: an element is held by at most one container at a time,
//! and it records that container as its parent. Attaching an element that is already attached
//! somewhere is a programming error and panics, as does attaching an element inside itself.
//! Elements detached by an edit stay in the arena (their handles stay valid) until
//! [`Tree::sweep`] removes everything that is no longer reachable from the root.
//!
//! # Lists
//!
//! Products and sums always hold at least two children while they are part of the tree.
//! [`Tree::product`] and [`Tree::sum`] collapse to the identity value or to the single child
//! when given fewer, and [`Tree::remove_children`] does the same to a list in place after
//! removing any number of children in one step.
//!
//! # Equality
//!
//! [`ElemId`]s compare by identity. [`Tree::equals`] compares elements structurally: variants,
//! symbol names, integer values and children in order.
//!
//! ```
//! use mathedit_tree::Tree;
//!
//! let mut tree = Tree::new();
//! let x = tree.symbol("x");
//! let two = tree.int_constant(2);
//! let square = tree.power(x, two);
//! let copy = tree.copy(square);
//!
//! assert_ne!(square, copy);
//! assert!(tree.equals(square, copy));
//! assert_eq!(tree.display(copy).to_string(), "x^2");
//! ```

mod display;
mod elem;
mod iter;
mod tree;

pub use display::ElemDisplay;
pub use elem::{Elem, ElemId, ElemKind, ParenPurpose, Precedence};
pub use iter::{Ancestors, PreOrder};
pub use tree::Tree;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
    use std::cmp::Ordering;
    use super::*;

    /// Builds a random unattached element with at most the given depth.
    fn random_elem(tree: &mut Tree, rng: &mut StdRng, depth: usize) -> ElemId {
        let choice = if depth == 0 { rng.gen_range(0..2) } else { rng.gen_range(0..7) };
        match choice {
            0 => {
                let name = ["x", "y", "z"].choose(rng).unwrap();
                tree.symbol(*name)
            },
            1 => tree.unsigned_constant(rng.gen_range(0..5)),
            2 => {
                let inner = random_elem(tree, rng, depth - 1);
                tree.negation(inner)
            },
            3 => {
                let numer = random_elem(tree, rng, depth - 1);
                let denom = random_elem(tree, rng, depth - 1);
                tree.fraction(numer, denom)
            },
            4 => {
                let base = random_elem(tree, rng, depth - 1);
                let exponent = random_elem(tree, rng, depth - 1);
                tree.power(base, exponent)
            },
            kind => {
                let len = rng.gen_range(2..5);
                let children = (0..len).map(|_| random_elem(tree, rng, depth - 1)).collect();
                if kind == 5 {
                    tree.product(children)
                } else {
                    tree.sum(children)
                }
            },
        }
    }

    /// Builds a tree holding the expression `a*b + c`.
    fn product_plus_symbol() -> (Tree, [ElemId; 5]) {
        let mut tree = Tree::new();
        let a = tree.symbol("a");
        let b = tree.symbol("b");
        let c = tree.symbol("c");
        let product = tree.product(vec![a, b]);
        let sum = tree.sum(vec![product, c]);
        tree.set_content(sum);
        (tree, [sum, product, a, b, c])
    }

    #[test]
    fn new_tree_holds_zero() {
        let tree = Tree::new();
        assert_eq!(tree.kind(tree.root()), ElemKind::Root);
        assert_eq!(tree.as_int(tree.content()), Some(0));
        assert_eq!(tree.parent(tree.content()), Some(tree.root()));
        assert_eq!(tree.parent(tree.root()), None);
        tree.check_invariants();
    }

    #[test]
    fn negative_constant_is_negation() {
        let mut tree = Tree::new();
        let minus_three = tree.int_constant(-3);
        let inner = tree.as_negation(minus_three).unwrap();
        assert_eq!(tree.as_int(inner), Some(3));

        let min = tree.int_constant(i64::MIN);
        let inner = tree.as_negation(min).unwrap();
        assert_eq!(tree.as_int(inner), Some(i64::MIN.unsigned_abs()));
    }

    #[test]
    fn list_constructors_collapse() {
        let mut tree = Tree::new();
        let empty_product = tree.product(vec![]);
        let empty_sum = tree.sum(vec![]);
        assert_eq!(tree.as_int(empty_product), Some(1));
        assert_eq!(tree.as_int(empty_sum), Some(0));

        let x = tree.symbol("x");
        assert_eq!(tree.sum(vec![x]), x);
        assert_eq!(tree.parent(x), None);
    }

    #[test]
    fn structural_equality_is_an_equivalence() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let mut tree = Tree::new();
            let a = random_elem(&mut tree, &mut rng, 3);
            let b = tree.copy(a);
            let c = tree.copy(b);
            let other = random_elem(&mut tree, &mut rng, 3);

            assert!(tree.equals(a, a));
            assert!(tree.equals(a, b) && tree.equals(b, a));
            assert!(tree.equals(b, c) && tree.equals(a, c));
            assert_eq!(tree.equals(a, other), tree.equals(other, a));
            assert_eq!(tree.equals(a, other), tree.equals(c, other));
        }
    }

    #[test]
    fn equality_ignores_handles_not_structure() {
        let mut tree = Tree::new();
        let x = tree.symbol("x");
        let y = tree.symbol("y");
        let x2 = tree.symbol("x");
        let y2 = tree.symbol("y");
        let xy = tree.product(vec![x, y]);
        let yx = tree.product(vec![y2, x2]);
        assert!(!tree.equals(xy, yx));

        let one = tree.unsigned_constant(1);
        let also_one = tree.unsigned_constant(1);
        assert!(tree.equals(one, also_one));

        let mut other = Tree::new();
        let other_one = other.unsigned_constant(1);
        assert!(tree.equals_in(one, &other, other_one));
    }

    #[test]
    fn copies_are_equal_and_independent() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let mut tree = Tree::new();
            let original = random_elem(&mut tree, &mut rng, 4);
            let copy = tree.copy(original);
            assert!(tree.equals(original, copy));
            assert_eq!(tree.parent(copy), None);

            let original_elems = tree.pre_order(original).collect::<Vec<_>>();
            assert!(tree.pre_order(copy).all(|id| !original_elems.contains(&id)));

            // mutating the copy leaves the original untouched
            let before = tree.display(original).to_string();
            tree.set_content(copy);
            let leaf = tree.pre_order(copy).last().unwrap();
            let marker = tree.symbol("w");
            let leaf_parent = tree.parent(leaf).unwrap();
            tree.replace(leaf_parent, leaf, marker);
            assert_eq!(tree.display(original).to_string(), before);
            assert!(!tree.equals(original, tree.content()));
        }
    }

    #[test]
    fn replace_keeps_slot_and_ownership() {
        let (mut tree, [sum, product, _, b, c]) = product_plus_symbol();
        let d = tree.symbol("d");
        tree.replace(product, b, d);

        assert_eq!(tree.parent(b), None);
        assert_eq!(tree.parent(d), Some(product));
        assert_eq!(tree.child_index(product, d), Some(1));
        assert_eq!(tree.display(sum).to_string(), "a*d + c");

        // replacing an element with itself changes nothing
        tree.replace(sum, c, c);
        assert_eq!(tree.display(sum).to_string(), "a*d + c");
        tree.check_invariants();
    }

    #[test]
    fn replace_with_reuses_the_element() {
        let (mut tree, [sum, product, ..]) = product_plus_symbol();
        let negated = tree.replace_with(product, |tree, product| tree.negation(product));
        assert_eq!(tree.parent(product), Some(negated));
        assert_eq!(tree.display(sum).to_string(), "-a*b + c");
        tree.check_invariants();
    }

    #[test]
    fn insert_and_append_children() {
        let (mut tree, [sum, product, ..]) = product_plus_symbol();
        let z = tree.symbol("z");
        tree.insert_child(product, 0, z);
        let w = tree.symbol("w");
        tree.append_child(sum, w);
        assert_eq!(tree.display(tree.root()).to_string(), "z*a*b + c + w");
        tree.check_invariants();
    }

    #[test]
    fn remove_children_normalizes_once() {
        let mut tree = Tree::new();
        let terms = ["a", "b", "c"].map(|name| tree.symbol(name));
        let sum = tree.sum(terms.to_vec());
        tree.set_content(sum);

        // removing two of three terms leaves the last one in the slot of the sum
        let result = tree.remove_children(sum, &[terms[0], terms[2]]);
        assert_eq!(result, terms[1]);
        assert_eq!(tree.content(), terms[1]);
        assert_eq!(tree.parent(sum), None);
        tree.check_invariants();
    }

    #[test]
    fn remove_all_children_leaves_identity() {
        let (mut tree, [sum, product, a, b, _]) = product_plus_symbol();
        let result = tree.remove_children(product, &[b, a]);
        assert_eq!(tree.as_int(result), Some(1));
        assert_eq!(tree.child_index(sum, result), Some(0));
        assert_eq!(tree.display(sum).to_string(), "1 + c");

        let terms = tree.children(sum);
        let result = tree.remove_children(sum, &terms);
        assert_eq!(tree.as_int(result), Some(0));
        assert_eq!(tree.content(), result);
        tree.check_invariants();
    }

    #[test]
    fn random_edits_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let mut tree = Tree::with_content(|tree| random_elem(tree, &mut rng, 4));
            for _ in 0..10 {
                let elems = tree.pre_order(tree.content()).collect::<Vec<_>>();
                let target = *elems.choose(&mut rng).unwrap();
                let parent = tree.parent(target).unwrap();
                match tree.kind(target) {
                    kind if kind.is_list() && rng.gen_bool(0.5) => {
                        let children = tree.children(target);
                        let count = rng.gen_range(1..=children.len());
                        let removed = children.choose_multiple(&mut rng, count).copied().collect::<Vec<_>>();
                        tree.remove_children(target, &removed);
                    },
                    _ => {
                        let new = random_elem(&mut tree, &mut rng, 2);
                        tree.replace(parent, target, new);
                    },
                }
                tree.check_invariants();
            }

            let len = tree.len();
            let removed = tree.sweep();
            assert_eq!(tree.len(), len - removed);
            assert_eq!(tree.len(), tree.pre_order(tree.root()).count());
            tree.check_invariants();
        }
    }

    #[test]
    fn document_order_follows_pre_order() {
        let (tree, [sum, product, a, b, c]) = product_plus_symbol();
        assert_eq!(tree.document_order(sum, a), Ordering::Less);
        assert_eq!(tree.document_order(b, product), Ordering::Greater);
        assert_eq!(tree.document_order(b, c), Ordering::Less);
        assert_eq!(tree.document_order(c, a), Ordering::Greater);
        assert_eq!(tree.document_order(a, a), Ordering::Equal);

        let order = tree.pre_order(tree.root()).collect::<Vec<_>>();
        for window in order.windows(2) {
            assert_eq!(tree.document_order(window[0], window[1]), Ordering::Less);
        }
    }

    #[test]
    fn ancestors_reach_the_root() {
        let (tree, [sum, product, a, ..]) = product_plus_symbol();
        assert_eq!(tree.ancestors(a).collect::<Vec<_>>(), vec![product, sum, tree.root()]);
        assert!(tree.is_ancestor_of(sum, a));
        assert!(!tree.is_ancestor_of(a, sum));
        assert!(tree.is_reachable(a));
    }

    #[test]
    fn parens_follow_precedence() {
        let mut tree = Tree::new();
        let x = tree.symbol("x");
        let y = tree.symbol("y");
        let sum = tree.sum(vec![x, y]);
        let two = tree.int_constant(2);
        let z = tree.symbol("z");
        let exponent = tree.power(z, two);
        let power = tree.power(sum, exponent);
        tree.set_content(power);

        assert!(tree.child_needs_parens(power, sum, ParenPurpose::Text));
        assert!(tree.child_needs_parens(power, exponent, ParenPurpose::Text));
        assert!(!tree.child_needs_parens(power, exponent, ParenPurpose::Display));
        assert!(!tree.child_needs_parens(tree.root(), power, ParenPurpose::Text));
        assert_eq!(tree.display(power).to_string(), "(x + y)^(z^2)");
        assert_eq!(tree.display_for(power, ParenPurpose::Display).to_string(), "(x + y)^z^2");
    }

    #[test]
    fn negations_in_sums_are_subtractions() {
        let mut tree = Tree::new();
        let x = tree.symbol("x");
        let neg_x = tree.negation(x);
        let y = tree.symbol("y");
        let z = tree.symbol("z");
        let yz = tree.sum(vec![y, z]);
        let neg_yz = tree.negation(yz);
        let sum = tree.sum(vec![neg_x, neg_yz]);
        tree.set_content(sum);

        assert!(!tree.child_needs_parens(sum, neg_x, ParenPurpose::Text));
        assert_eq!(tree.display(sum).to_string(), "-x - (y + z)");

        let a = tree.symbol("a");
        let neg_a = tree.negation(a);
        let neg_neg_a = tree.negation(neg_a);
        let b = tree.symbol("b");
        let product = tree.product(vec![b, neg_neg_a]);
        assert_eq!(tree.display(product).to_string(), "b*(-(-a))");
    }

    #[test]
    #[should_panic(expected = "cannot add")]
    fn attaching_twice_panics() {
        let mut tree = Tree::new();
        let x = tree.symbol("x");
        tree.negation(x);
        tree.negation(x);
    }

    #[test]
    #[should_panic(expected = "inside itself")]
    fn attaching_inside_itself_panics() {
        let mut tree = Tree::new();
        let x = tree.symbol("x");
        let negation = tree.negation(x);
        tree.replace(negation, x, negation);
    }

    #[test]
    #[should_panic(expected = "not found")]
    fn replacing_a_foreign_child_panics() {
        let (mut tree, [_, product, _, _, c]) = product_plus_symbol();
        let d = tree.symbol("d");
        tree.replace(product, c, d);
    }

    #[test]
    #[should_panic(expected = "not a child")]
    fn removing_a_child_twice_panics() {
        let (mut tree, [sum, _, _, _, c]) = product_plus_symbol();
        tree.remove_children(sum, &[c, c]);
    }

    #[test]
    #[should_panic(expected = "cannot be copied")]
    fn copying_the_root_panics() {
        let mut tree = Tree::new();
        tree.copy(tree.root());
    }
}

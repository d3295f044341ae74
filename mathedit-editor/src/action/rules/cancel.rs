use mathedit_tree::{ElemId, ElemKind, Tree};

/// Returns true if `negation` is the negation of an element structurally equal to `other`.
fn negates(tree: &Tree, negation: ElemId, other: ElemId) -> bool {
    tree.as_negation(negation).is_some_and(|inner| tree.equals(inner, other))
}

/// Removes two terms of a sum that cancel each other out, such as `x` and `-x`.
///
/// The sibling to select afterwards is the one with the lowest index among the neighbors of the
/// removed terms; nothing is selected if the terms had no other neighbors.
pub fn cancel(tree: &mut Tree, parent: ElemId, children: &[ElemId]) -> Option<Vec<ElemId>> {
    let &[first, second] = children else {
        return None;
    };
    if tree.kind(parent) != ElemKind::Sum || tree.parent(parent).is_none() {
        return None;
    }
    if !negates(tree, first, second) && !negates(tree, second, first) {
        return None;
    }

    let siblings = tree.children(parent);
    let neighbor = children.iter()
        .filter_map(|&child| siblings.iter().position(|&s| s == child))
        .flat_map(|i| [i.checked_sub(1), Some(i + 1)])
        .flatten()
        .filter(|&i| i < siblings.len() && !children.contains(&siblings[i]))
        .min()
        .map(|i| siblings[i]);

    tree.remove_children(parent, children);
    Some(neighbor.into_iter().collect())
}

use mathedit_tree::{ElemId, Tree};

/// Exchanges the positions of two children of a sum or product. The elements themselves are
/// moved, not copied.
pub fn swap(tree: &mut Tree, parent: ElemId, children: &[ElemId]) -> Option<Vec<ElemId>> {
    let &[first, second] = children else {
        return None;
    };
    if !tree.kind(parent).is_list() {
        return None;
    }

    // an element cannot be in two slots at once, so both leave before either comes back
    let first_slot = tree.unsigned_constant(0);
    let second_slot = tree.unsigned_constant(0);
    tree.replace(parent, first, first_slot);
    tree.replace(parent, second, second_slot);
    tree.replace(parent, first_slot, second);
    tree.replace(parent, second_slot, first);
    Some(vec![first, second])
}

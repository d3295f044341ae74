use mathedit_tree::{ElemId, Tree};

/// Flattens a sum inside a sum, or a product inside a product, into its parent: the children of
/// the element are spliced into the parent where the element was. `a + (b + c) + d` becomes
/// `a + b + c + d`.
pub fn unnest(tree: &mut Tree, elem: ElemId) -> Option<Vec<ElemId>> {
    let parent = tree.parent(elem)?;
    let kind = tree.kind(elem);
    if !kind.is_list() || tree.kind(parent) != kind {
        return None;
    }

    let index = tree.child_index(parent, elem)?;
    let copies = tree.children(elem)
        .into_iter()
        .map(|child| tree.copy(child))
        .collect::<Vec<_>>();

    tree.replace(parent, elem, copies[0]);
    for (offset, &copy) in copies.iter().enumerate().skip(1) {
        tree.insert_child(parent, index + offset, copy);
    }
    Some(copies)
}

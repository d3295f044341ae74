use mathedit_tree::{ElemId, ElemKind, Tree};

/// Moves the sign of the first negated factor of a product in front of the product:
/// `a*(-b)*c` becomes `-a*b*c`.
pub fn bring_minus_to_front(tree: &mut Tree, elem: ElemId) -> Option<Vec<ElemId>> {
    tree.parent(elem)?;
    if tree.kind(elem) != ElemKind::Product {
        return None;
    }

    let negated = tree.children(elem)
        .into_iter()
        .find(|&factor| tree.kind(factor) == ElemKind::Negation)?;
    let inner = tree.as_negation(negated)?;
    let inner = tree.copy(inner);
    tree.replace(elem, negated, inner);

    let negation = tree.replace_with(elem, |tree, product| tree.negation(product));
    Some(vec![negation])
}

/// Moves the sign in front of a product into its first factor: `-a*b` becomes `(-a)*b`.
pub fn bring_minus_inside(tree: &mut Tree, elem: ElemId) -> Option<Vec<ElemId>> {
    let parent = tree.parent(elem)?;
    let product = tree.as_negation(elem)
        .filter(|&inner| tree.kind(inner) == ElemKind::Product)?;

    let first = tree.children(product)[0];
    tree.replace_with(first, |tree, first| tree.negation(first));

    let product = tree.copy(product);
    tree.replace(parent, elem, product);
    Some(vec![product])
}

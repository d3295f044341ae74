use mathedit_tree::{ElemId, ElemKind, Tree};

/// Returns copies of `before * t * after` for every term `t` of the first sum factor of the
/// product, or [`None`] if no factor is a sum.
fn distribute(tree: &mut Tree, product: ElemId) -> Option<Vec<ElemId>> {
    let factors = tree.children(product);
    let sum = *factors.iter().find(|&&factor| tree.kind(factor) == ElemKind::Sum)?;

    let mut terms = Vec::new();
    for term in tree.children(sum) {
        let mut term_factors = Vec::with_capacity(factors.len());
        for &factor in &factors {
            let source = if factor == sum { term } else { factor };
            term_factors.push(tree.copy(source));
        }
        terms.push(tree.product(term_factors));
    }
    Some(terms)
}

/// Distributes a product over its first sum factor: `a*(b + c)*d` becomes `a*b*d + a*c*d`.
///
/// A negated product is expanded the same way, negating every resulting term, and a negated sum
/// is expanded into its negated terms: `-(a + b)` becomes `-a - b`.
pub fn expand(tree: &mut Tree, elem: ElemId) -> Option<Vec<ElemId>> {
    let parent = tree.parent(elem)?;
    let terms = match tree.kind(elem) {
        ElemKind::Product => distribute(tree, elem)?,
        ElemKind::Negation => {
            let inner = tree.as_negation(elem)?;
            let terms = match tree.kind(inner) {
                ElemKind::Product => distribute(tree, inner)?,
                ElemKind::Sum => tree.children(inner)
                    .into_iter()
                    .map(|term| tree.copy(term))
                    .collect(),
                _ => return None,
            };
            terms.into_iter().map(|term| tree.negation(term)).collect()
        },
        _ => return None,
    };

    let sum = tree.sum(terms);
    tree.replace(parent, elem, sum);
    Some(vec![sum])
}

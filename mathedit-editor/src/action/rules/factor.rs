use mathedit_tree::{ElemId, ElemKind, Tree};

/// A term of a sum, split into its sign and its factors.
struct SplitTerm {
    negated: bool,
    factors: Vec<ElemId>,
    used: Vec<bool>,
}

impl SplitTerm {
    fn new(tree: &Tree, term: ElemId) -> Self {
        let (negated, base) = match tree.as_negation(term) {
            Some(inner) => (true, inner),
            None => (false, term),
        };
        let factors = match tree.kind(base) {
            ElemKind::Product => tree.children(base),
            _ => vec![base],
        };
        let used = vec![false; factors.len()];
        Self { negated, factors, used }
    }

    /// Returns the index of an unused factor structurally equal to `factor`.
    fn find_unused(&self, tree: &Tree, factor: ElemId) -> Option<usize> {
        self.factors.iter()
            .zip(&self.used)
            .position(|(&candidate, &used)| !used && tree.equals(candidate, factor))
    }

    /// Builds a copy of what is left of the term once its used factors are taken out.
    fn remainder(&self, tree: &mut Tree) -> ElemId {
        let factors = self.factors.iter()
            .zip(&self.used)
            .filter(|(_, &used)| !used)
            .map(|(&factor, _)| factor)
            .collect::<Vec<_>>();
        let copies = factors.into_iter().map(|factor| tree.copy(factor)).collect();
        let product = tree.product(copies);
        if self.negated {
            tree.negation(product)
        } else {
            product
        }
    }
}

/// Pulls the factors shared by the given terms of a sum out of them: `a*x + a*y` becomes
/// `(x + y)*a`. Factors are matched structurally, and a factor that appears more than once is
/// pulled out as many times as every term has it: `x*x*y + x*x` becomes `(y + 1)*x*x`.
///
/// If the terms share no factor but are all negated, the sign is pulled out instead:
/// `-a - b` becomes `-(a + b)`.
///
/// The result takes the place of the first term, and the other terms are removed.
pub fn factor(tree: &mut Tree, parent: ElemId, terms: &[ElemId]) -> Option<Vec<ElemId>> {
    if tree.kind(parent) != ElemKind::Sum || tree.parent(parent).is_none() || terms.len() < 2 {
        return None;
    }

    let mut split = terms.iter()
        .map(|&term| SplitTerm::new(tree, term))
        .collect::<Vec<_>>();
    let (first, rest) = split.split_first_mut()?;

    let mut common = Vec::new();
    for (i, &factor) in first.factors.iter().enumerate() {
        let matches = rest.iter()
            .map(|term| term.find_unused(tree, factor))
            .collect::<Option<Vec<_>>>();
        if let Some(matches) = matches {
            first.used[i] = true;
            for (term, index) in rest.iter_mut().zip(matches) {
                term.used[index] = true;
            }
            common.push(factor);
        }
    }

    let result = if !common.is_empty() {
        let remainders = split.iter()
            .map(|term| term.remainder(tree))
            .collect();
        let mut factors = vec![tree.sum(remainders)];
        factors.extend(common.into_iter().map(|factor| tree.copy(factor)));
        tree.product(factors)
    } else if split.iter().all(|term| term.negated) {
        let inners = terms.iter()
            .filter_map(|&term| tree.as_negation(term))
            .collect::<Vec<_>>();
        let copies = inners.into_iter().map(|inner| tree.copy(inner)).collect();
        let sum = tree.sum(copies);
        tree.negation(sum)
    } else {
        return None;
    };

    tree.replace(parent, terms[0], result);
    tree.remove_children(parent, &terms[1..]);
    Some(vec![result])
}

/// Factors every term of a sum.
pub fn factor_all_terms(tree: &mut Tree, elem: ElemId) -> Option<Vec<ElemId>> {
    if tree.kind(elem) != ElemKind::Sum {
        return None;
    }
    let terms = tree.children(elem);
    factor(tree, elem, &terms)
}

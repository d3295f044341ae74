use super::{ElemId, Tree};

/// An iterator over the ancestors of an element, starting with its parent and ending with the
/// topmost element of its tree (the root wrapper, if the element is attached to it).
///
/// This iterator is created by [`Tree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<ElemId>,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(tree: &'a Tree, elem: ElemId) -> Self {
        Self { tree, next: tree.parent(elem) }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = ElemId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// An iterator that traverses an element and its descendants in left-to-right pre-order (i.e.
/// every element is visited before its children).
///
/// This iterator is created by [`Tree::pre_order`].
pub struct PreOrder<'a> {
    tree: &'a Tree,
    stack: Vec<ElemId>,
}

impl<'a> PreOrder<'a> {
    pub(crate) fn new(tree: &'a Tree, elem: ElemId) -> Self {
        Self { tree, stack: vec![elem] }
    }
}

impl Iterator for PreOrder<'_> {
    type Item = ElemId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(self.tree.get(current).children().into_iter().rev());
        Some(current)
    }
}

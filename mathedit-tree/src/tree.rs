use slotmap::SlotMap;
use std::{cmp::Ordering, collections::HashSet};
use super::{
    elem::{Elem, ElemId, ElemKind, ParenPurpose},
    display::ElemDisplay,
    iter::{Ancestors, PreOrder},
};
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single slot of the arena: an element and the container that currently owns it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Node {
    /// The container holding this element, or [`None`] if the element is unattached (or is the
    /// root wrapper).
    parent: Option<ElemId>,

    /// The variant and children of this element.
    elem: Elem,
}

/// An arena of elements with a fixed root wrapper.
///
/// See the [crate-level documentation](crate) for the ownership rules the tree enforces.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tree {
    nodes: SlotMap<ElemId, Node>,
    root: ElemId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree whose root wrapper holds the integer `0`.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let content = nodes.insert(Node { parent: None, elem: Elem::IntConstant(0) });
        let root = nodes.insert(Node { parent: None, elem: Elem::Root { inner: content } });
        nodes[content].parent = Some(root);
        Self { nodes, root }
    }

    /// Creates a tree whose root wrapper holds the element returned by `build`.
    pub fn with_content(build: impl FnOnce(&mut Self) -> ElemId) -> Self {
        let mut tree = Self::new();
        let content = build(&mut tree);
        tree.set_content(content);
        tree
    }

    /// Returns the root wrapper (the "parent-of-everything" element).
    pub fn root(&self) -> ElemId {
        self.root
    }

    /// Returns the element held by the root wrapper.
    pub fn content(&self) -> ElemId {
        match self.get(self.root) {
            Elem::Root { inner } => *inner,
            other => unreachable!("root wrapper holds {:?}", other.kind()),
        }
    }

    /// Replaces the element held by the root wrapper, returning the old (now unattached)
    /// content.
    pub fn set_content(&mut self, content: ElemId) -> ElemId {
        let old = self.content();
        self.replace(self.root, old, content);
        old
    }

    /// Returns the number of elements stored in the arena, including unattached ones that have
    /// not been swept yet.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena stores no elements. A tree always stores at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if the handle refers to an element stored in this tree.
    pub fn contains(&self, id: ElemId) -> bool {
        self.nodes.contains_key(id)
    }

    fn node(&self, id: ElemId) -> &Node {
        self.nodes
            .get(id)
            .unwrap_or_else(|| panic!("stale element handle {:?}", id))
    }

    fn node_mut(&mut self, id: ElemId) -> &mut Node {
        self.nodes
            .get_mut(id)
            .unwrap_or_else(|| panic!("stale element handle {:?}", id))
    }

    /// Returns the element with the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale (the element was swept).
    pub fn get(&self, id: ElemId) -> &Elem {
        &self.node(id).elem
    }

    /// Returns the variant tag of the element.
    pub fn kind(&self, id: ElemId) -> ElemKind {
        self.get(id).kind()
    }

    /// Returns the container currently holding the element.
    pub fn parent(&self, id: ElemId) -> Option<ElemId> {
        self.node(id).parent
    }

    /// Returns the children of the element in slot order.
    pub fn children(&self, id: ElemId) -> Vec<ElemId> {
        self.get(id).children()
    }

    /// Returns the position of `child` among the children of `parent`.
    pub fn child_index(&self, parent: ElemId, child: ElemId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Returns the name of the element if it is a [`Elem::Symbol`].
    pub fn as_symbol(&self, id: ElemId) -> Option<&str> {
        match self.get(id) {
            Elem::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the value of the element if it is an [`Elem::IntConstant`].
    pub fn as_int(&self, id: ElemId) -> Option<u64> {
        match self.get(id) {
            Elem::IntConstant(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the inner element if the element is an [`Elem::Negation`].
    pub fn as_negation(&self, id: ElemId) -> Option<ElemId> {
        match self.get(id) {
            Elem::Negation { inner } => Some(*inner),
            _ => None,
        }
    }

    /// Returns an iterator over the ancestors of the element, nearest first.
    pub fn ancestors(&self, id: ElemId) -> Ancestors<'_> {
        Ancestors::new(self, id)
    }

    /// Returns an iterator over the element and all of its descendants, in pre-order.
    pub fn pre_order(&self, id: ElemId) -> PreOrder<'_> {
        PreOrder::new(self, id)
    }

    /// Returns true if `ancestor` is a proper ancestor of `id`.
    pub fn is_ancestor_of(&self, ancestor: ElemId, id: ElemId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Returns true if the element is the root wrapper or one of its descendants.
    pub fn is_reachable(&self, id: ElemId) -> bool {
        id == self.root || self.ancestors(id).last() == Some(self.root)
    }

    /// Compares two elements of the same tree by their position in a pre-order traversal.
    ///
    /// The chains of ancestors of both elements are compared to find their lowest common
    /// ancestor; an ancestor comes before its descendants, and siblings are ordered by the child
    /// order of that common ancestor.
    ///
    /// # Panics
    ///
    /// Panics if the elements do not share a topmost ancestor.
    pub fn document_order(&self, a: ElemId, b: ElemId) -> Ordering {
        let chain = |id: ElemId| {
            let mut chain = self.ancestors(id).collect::<Vec<_>>();
            chain.reverse();
            chain.push(id);
            chain
        };
        let (chain_a, chain_b) = (chain(a), chain(b));
        if chain_a[0] != chain_b[0] {
            panic!("{:?} and {:?} are not part of the same tree", a, b);
        }

        // the first position where the chains diverge is just below the common ancestor
        let common_len = chain_a.iter()
            .zip(&chain_b)
            .take_while(|(x, y)| x == y)
            .count();
        match (chain_a.get(common_len), chain_b.get(common_len)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(&x), Some(&y)) => {
                let common = chain_a[common_len - 1];
                let siblings = self.children(common);
                let index = |id| siblings.iter().position(|&s| s == id);
                index(x).cmp(&index(y))
            },
        }
    }

    /// Inserts an element into the arena and attaches its children to it.
    fn alloc(&mut self, elem: Elem) -> ElemId {
        let children = elem.children();
        let id = self.nodes.insert(Node { parent: None, elem });
        for child in children {
            self.attach(id, child);
        }
        id
    }

    /// Checks that `child` can be attached to `container`, panicking otherwise.
    fn check_attachable(&self, container: ElemId, child: ElemId) {
        if child == self.root {
            panic!("cannot add the root element to {:?}", container);
        }
        if let Some(parent) = self.parent(child) {
            panic!("cannot add {:?} to two places, it is already a child of {:?}", child, parent);
        }
        if child == container || self.is_ancestor_of(child, container) {
            panic!("cannot add {:?} inside itself", child);
        }
    }

    /// Records `container` as the owner of `child`.
    fn attach(&mut self, container: ElemId, child: ElemId) {
        self.check_attachable(container, child);
        self.node_mut(child).parent = Some(container);
    }

    /// Clears the owner of `child`, which must currently be `container`.
    fn detach(&mut self, container: ElemId, child: ElemId) {
        let node = self.node_mut(child);
        if node.parent != Some(container) {
            panic!("cannot remove {:?} from {:?}, it has not been added there", child, container);
        }
        node.parent = None;
    }

    /// Creates an unattached [`Elem::Symbol`].
    pub fn symbol(&mut self, name: impl Into<String>) -> ElemId {
        self.alloc(Elem::Symbol(name.into()))
    }

    /// Creates an unattached integer constant. Negative values produce a [`Elem::Negation`]
    /// wrapping the magnitude, since an [`Elem::IntConstant`] never holds a negative value.
    pub fn int_constant(&mut self, value: i64) -> ElemId {
        let magnitude = self.unsigned_constant(value.unsigned_abs());
        if value < 0 {
            self.negation(magnitude)
        } else {
            magnitude
        }
    }

    /// Creates an unattached [`Elem::IntConstant`].
    pub fn unsigned_constant(&mut self, value: u64) -> ElemId {
        self.alloc(Elem::IntConstant(value))
    }

    /// Creates an unattached [`Elem::Negation`] owning `inner`.
    pub fn negation(&mut self, inner: ElemId) -> ElemId {
        self.alloc(Elem::Negation { inner })
    }

    /// Creates an unattached [`Elem::Fraction`] owning `numer` and `denom`.
    pub fn fraction(&mut self, numer: ElemId, denom: ElemId) -> ElemId {
        self.alloc(Elem::Fraction { numer, denom })
    }

    /// Creates an unattached [`Elem::Power`] owning `base` and `exponent`.
    pub fn power(&mut self, base: ElemId, exponent: ElemId) -> ElemId {
        self.alloc(Elem::Power { base, exponent })
    }

    /// Creates a product of the given factors. Zero factors produce the integer `1`, and a single
    /// factor is returned as-is.
    pub fn product(&mut self, factors: Vec<ElemId>) -> ElemId {
        self.list(ElemKind::Product, factors)
    }

    /// Creates a sum of the given terms. Zero terms produce the integer `0`, and a single term is
    /// returned as-is.
    pub fn sum(&mut self, terms: Vec<ElemId>) -> ElemId {
        self.list(ElemKind::Sum, terms)
    }

    fn list(&mut self, kind: ElemKind, mut children: Vec<ElemId>) -> ElemId {
        match children.len() {
            0 => {
                let identity = kind.identity().unwrap_or_else(|| unreachable!("{} is not a list", kind));
                self.unsigned_constant(identity)
            },
            1 => {
                let only = children.remove(0);
                if let Some(parent) = self.parent(only) {
                    panic!("cannot use {:?} as a {}, it is already a child of {:?}", only, kind, parent);
                }
                only
            },
            _ => match kind {
                ElemKind::Product => self.alloc(Elem::Product(children)),
                ElemKind::Sum => self.alloc(Elem::Sum(children)),
                _ => unreachable!("{} is not a list", kind),
            },
        }
    }

    /// Returns true if both elements are structurally equal.
    ///
    /// Structural equality compares variants, symbol names, integer values and children in
    /// order; it never compares handles. It is an equivalence relation.
    pub fn equals(&self, a: ElemId, b: ElemId) -> bool {
        structurally_equal(self, a, self, b)
    }

    /// Returns true if the element `a` of this tree is structurally equal to the element `b` of
    /// `other`.
    pub fn equals_in(&self, a: ElemId, other: &Tree, b: ElemId) -> bool {
        structurally_equal(self, a, other, b)
    }

    /// Creates an unattached deep copy of the element. The copy is structurally equal to the
    /// original but shares no element with it.
    ///
    /// # Panics
    ///
    /// Panics if asked to copy the root wrapper.
    pub fn copy(&mut self, id: ElemId) -> ElemId {
        let copied = match self.get(id).clone() {
            Elem::Symbol(name) => Elem::Symbol(name),
            Elem::IntConstant(value) => Elem::IntConstant(value),
            Elem::Negation { inner } => Elem::Negation { inner: self.copy(inner) },
            Elem::Fraction { numer, denom } => Elem::Fraction {
                numer: self.copy(numer),
                denom: self.copy(denom),
            },
            Elem::Power { base, exponent } => Elem::Power {
                base: self.copy(base),
                exponent: self.copy(exponent),
            },
            Elem::Product(factors) => Elem::Product(factors.into_iter().map(|f| self.copy(f)).collect()),
            Elem::Sum(terms) => Elem::Sum(terms.into_iter().map(|t| self.copy(t)).collect()),
            Elem::Root { .. } => panic!("the root element cannot be copied"),
        };
        self.alloc(copied)
    }

    /// Replaces the child `old` of `container` with the unattached element `new`, keeping the
    /// position of the slot. `old` becomes unattached.
    ///
    /// # Panics
    ///
    /// Panics if `old` is not a child of `container`, or if `new` is already attached somewhere.
    pub fn replace(&mut self, container: ElemId, old: ElemId, new: ElemId) {
        if old == new {
            if self.parent(old) != Some(container) {
                panic!("child element {:?} not found in {:?}", old, container);
            }
            return;
        }

        if self.parent(old) != Some(container) || self.get(container).children().iter().all(|&c| c != old) {
            panic!("child element {:?} not found in {:?}", old, container);
        }
        self.check_attachable(container, new);

        let node = self.node_mut(container);
        match node.elem.slot_of_mut(old) {
            Some(slot) => *slot = new,
            None => unreachable!(),
        }
        self.detach(container, old);
        self.attach(container, new);
    }

    /// Replaces `elem` in its parent with the element built by `build`, which receives `elem`
    /// already detached, so it can be reused inside the replacement.
    ///
    /// # Panics
    ///
    /// Panics if `elem` has no parent.
    pub fn replace_with(
        &mut self,
        elem: ElemId,
        build: impl FnOnce(&mut Self, ElemId) -> ElemId,
    ) -> ElemId {
        let parent = self.parent(elem)
            .unwrap_or_else(|| panic!("cannot replace {:?}, it has no parent", elem));

        // hold the slot with a placeholder while `elem` is unattached
        let placeholder = self.unsigned_constant(0);
        self.replace(parent, elem, placeholder);
        let new = build(self, elem);
        self.replace(parent, placeholder, new);
        new
    }

    /// Inserts the unattached element `child` into the list `list` at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `list` is not a list, if the index is greater than the number of children, or
    /// if `child` is already attached.
    pub fn insert_child(&mut self, list: ElemId, index: usize, child: ElemId) {
        let len = match self.get(list) {
            Elem::Product(children) | Elem::Sum(children) => children.len(),
            other => panic!("cannot insert into {:?}, it is a {}, not a list", list, other.kind()),
        };
        if index > len {
            panic!("invalid index {} for a list of {} children", index, len);
        }
        self.check_attachable(list, child);

        if let Some(children) = self.node_mut(list).elem.list_mut() {
            children.insert(index, child);
        }
        self.attach(list, child);
    }

    /// Appends the unattached element `child` to the end of the list `list`.
    pub fn append_child(&mut self, list: ElemId, child: ElemId) {
        let len = self.children(list).len();
        self.insert_child(list, len, child);
    }

    /// Removes the given children from the list `list` in a single step, then normalizes the
    /// list once: a list left with no children is replaced in its parent by its identity value
    /// (`0` for a sum, `1` for a product), and a list left with one child is replaced in its
    /// parent by that child.
    ///
    /// Returns the element that occupies the former slot of the list afterwards (the list
    /// itself if no normalization was needed).
    ///
    /// # Panics
    ///
    /// Panics if `list` is not a list, if it has no parent, or if any of the given elements is
    /// not a child of `list` (including elements requested twice).
    pub fn remove_children(&mut self, list: ElemId, children: &[ElemId]) -> ElemId {
        let kind = self.kind(list);
        let Some(identity) = kind.identity() else {
            panic!("cannot remove children from {:?}, it is a {}, not a list", list, kind);
        };
        let Some(parent) = self.parent(list) else {
            panic!("cannot remove children from {:?}, it has no parent", list);
        };

        let current = self.children(list);
        for (i, child) in children.iter().enumerate() {
            if !current.contains(child) || children[..i].contains(child) {
                panic!("cannot remove {:?}, it is not a child of {:?}", child, list);
            }
        }

        if let Some(list_children) = self.node_mut(list).elem.list_mut() {
            list_children.retain(|c| !children.contains(c));
        }
        for &child in children {
            self.detach(list, child);
        }

        let remaining = self.children(list);
        match remaining.as_slice() {
            [] => {
                trace!(?list, %kind, identity, "list emptied, collapsing to its identity");
                let value = self.unsigned_constant(identity);
                self.replace(parent, list, value);
                value
            },
            [only] => {
                let only = *only;
                trace!(?list, %kind, ?only, "list has one child left, collapsing to it");
                if let Some(list_children) = self.node_mut(list).elem.list_mut() {
                    list_children.clear();
                }
                self.detach(list, only);
                self.replace(parent, list, only);
                only
            },
            _ => list,
        }
    }

    /// Returns true if `child` needs parentheses around it when written inside `parent` for the
    /// given purpose.
    ///
    /// A child needs parentheses if the precedence of the parent is greater than or equal to its
    /// own, except that a negation directly inside a sum never does (it is written as the sign
    /// of the term), and the exponent of a power does not for display purposes.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not a child of `parent`.
    pub fn child_needs_parens(&self, parent: ElemId, child: ElemId, purpose: ParenPurpose) -> bool {
        if self.parent(child) != Some(parent) {
            panic!("{:?} is not a child of {:?}", child, parent);
        }

        let child_kind = self.kind(child);
        match (self.get(parent), purpose) {
            (Elem::Sum(_), _) if child_kind == ElemKind::Negation => false,
            (Elem::Power { exponent, .. }, ParenPurpose::Display) if *exponent == child => false,
            (parent_elem, _) => parent_elem.kind().precedence() >= child_kind.precedence(),
        }
    }

    /// Returns a value that writes the element as parseable text.
    pub fn display(&self, id: ElemId) -> ElemDisplay<'_> {
        ElemDisplay::new(self, id, ParenPurpose::Text)
    }

    /// Returns a value that writes the element as text, placing parentheses for the given
    /// purpose.
    pub fn display_for(&self, id: ElemId, purpose: ParenPurpose) -> ElemDisplay<'_> {
        ElemDisplay::new(self, id, purpose)
    }

    /// Removes every element that is not reachable from the root wrapper, returning how many
    /// were removed.
    ///
    /// Handles to the removed elements become stale; do not hold handles to unattached
    /// elements across a sweep.
    pub fn sweep(&mut self) -> usize {
        let reachable = self.pre_order(self.root).collect::<HashSet<_>>();
        let before = self.nodes.len();
        self.nodes.retain(|id, _| reachable.contains(&id));
        let removed = before - self.nodes.len();
        trace!(removed, remaining = self.nodes.len(), "swept unreachable elements");
        removed
    }

    /// Walks the tree from the root wrapper and checks the ownership and list invariants.
    ///
    /// # Panics
    ///
    /// Panics if any reachable element does not record its container as its parent, is
    /// reachable through two containers, or is a list with fewer than two children, or if a root
    /// wrapper appears below the root.
    pub fn check_invariants(&self) {
        if let Some(parent) = self.parent(self.root) {
            panic!("root element has a parent {:?}", parent);
        }

        let mut seen = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                panic!("{:?} is reachable through two containers", id);
            }

            let elem = self.get(id);
            match elem {
                Elem::Root { .. } if id != self.root => panic!("root wrapper {:?} found inside the tree", id),
                Elem::Product(children) | Elem::Sum(children) if children.len() < 2 => {
                    panic!("{} {:?} has {} children", elem.kind(), id, children.len());
                },
                _ => (),
            }

            for child in elem.children() {
                if self.parent(child) != Some(id) {
                    panic!("{:?} is held by {:?} but records {:?} as its parent", child, id, self.parent(child));
                }
                stack.push(child);
            }
        }
    }
}

/// Compares two elements, possibly of different trees, for structural equality.
fn structurally_equal(lhs: &Tree, a: ElemId, rhs: &Tree, b: ElemId) -> bool {
    let (elem_a, elem_b) = (lhs.get(a), rhs.get(b));
    match (elem_a, elem_b) {
        (Elem::Symbol(x), Elem::Symbol(y)) => x == y,
        (Elem::IntConstant(x), Elem::IntConstant(y)) => x == y,
        _ if elem_a.kind() == elem_b.kind() => {
            let (children_a, children_b) = (elem_a.children(), elem_b.children());
            children_a.len() == children_b.len()
                && children_a.iter()
                    .zip(&children_b)
                    .all(|(&x, &y)| structurally_equal(lhs, x, rhs, y))
        },
        _ => false,
    }
}

//! Actions: named transformations of the selected elements, bound to a key.
//!
//! An action is run on the selected elements and either reports that it did nothing (a no-op,
//! [`None`]) or returns the elements to select afterwards. A no-op is not an error: it is how an
//! action reports that it does not apply to the selection.

pub mod rules;

use mathedit_tree::{ElemId, Tree};
use std::fmt;
use tracing::debug;

/// A callback transforming a single element.
///
/// Returns [`None`] if nothing was done, or the elements that replace `elem` in the selection.
pub type ElemFn = dyn Fn(&mut Tree, ElemId) -> Option<Vec<ElemId>> + Send + Sync;

/// A callback transforming children of one parent. The first [`ElemId`] is the parent, and the
/// slice holds the children, in child order.
///
/// Returns [`None`] if nothing was done, or the elements that replace the children in the
/// selection.
pub type ChildrenFn = dyn Fn(&mut Tree, ElemId, &[ElemId]) -> Option<Vec<ElemId>> + Send + Sync;

/// How an action is applied to the selected elements.
pub enum ActionKind {
    /// The callback is applied to every selected element independently. Elements it does
    /// nothing to stay selected.
    Single(Box<ElemFn>),

    /// The callback is applied to the selected element if exactly one is selected; otherwise the
    /// action does nothing.
    SingleStrict(Box<ElemFn>),

    /// The callback is applied if exactly `n` elements sharing one parent are selected;
    /// otherwise the action does nothing.
    Fixed {
        n: usize,
        callback: Box<ChildrenFn>,
    },

    /// The selected elements are grouped by parent, and the callback is applied to every group
    /// of two or more. Smaller groups, and groups the callback does nothing to, stay selected.
    Grouped(Box<ChildrenFn>),
}

impl fmt::Debug for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(_) => write!(f, "Single"),
            Self::SingleStrict(_) => write!(f, "SingleStrict"),
            Self::Fixed { n, .. } => write!(f, "Fixed({})", n),
            Self::Grouped(_) => write!(f, "Grouped"),
        }
    }
}

/// A named transformation bound to a key.
#[derive(Debug)]
pub struct Action {
    /// The name of the action, shown to the user.
    pub name: &'static str,

    /// The label of the key that runs the action, such as `E` or `Shift+B`.
    pub key_binding: &'static str,

    /// How the action is applied.
    pub kind: ActionKind,
}

impl Action {
    /// Creates an action applied to every selected element.
    pub fn single<F>(name: &'static str, key_binding: &'static str, callback: F) -> Self
    where
        F: Fn(&mut Tree, ElemId) -> Option<Vec<ElemId>> + Send + Sync + 'static,
    {
        Self { name, key_binding, kind: ActionKind::Single(Box::new(callback)) }
    }

    /// Creates an action applied only when exactly one element is selected.
    pub fn single_strict<F>(name: &'static str, key_binding: &'static str, callback: F) -> Self
    where
        F: Fn(&mut Tree, ElemId) -> Option<Vec<ElemId>> + Send + Sync + 'static,
    {
        Self { name, key_binding, kind: ActionKind::SingleStrict(Box::new(callback)) }
    }

    /// Creates an action applied only when exactly `n` siblings are selected.
    pub fn fixed<F>(name: &'static str, key_binding: &'static str, n: usize, callback: F) -> Self
    where
        F: Fn(&mut Tree, ElemId, &[ElemId]) -> Option<Vec<ElemId>> + Send + Sync + 'static,
    {
        Self { name, key_binding, kind: ActionKind::Fixed { n, callback: Box::new(callback) } }
    }

    /// Creates an action applied to every group of two or more selected siblings.
    pub fn grouped<F>(name: &'static str, key_binding: &'static str, callback: F) -> Self
    where
        F: Fn(&mut Tree, ElemId, &[ElemId]) -> Option<Vec<ElemId>> + Send + Sync + 'static,
    {
        Self { name, key_binding, kind: ActionKind::Grouped(Box::new(callback)) }
    }

    /// Runs the action on the given selected elements.
    ///
    /// Returns [`None`] if the action did nothing, or the elements to select afterwards, in the
    /// order of the selected elements they came from.
    pub fn run(&self, tree: &mut Tree, selected: &[ElemId]) -> Option<Vec<ElemId>> {
        let result = match &self.kind {
            ActionKind::Single(callback) => {
                let mut done = false;
                let mut to_select = Vec::with_capacity(selected.len());
                for &elem in selected {
                    match callback(tree, elem) {
                        Some(result) => {
                            done = true;
                            to_select.extend(result);
                        },
                        None => to_select.push(elem),
                    }
                }
                done.then_some(to_select)
            },
            ActionKind::SingleStrict(callback) => match selected {
                &[elem] => callback(tree, elem),
                _ => None,
            },
            ActionKind::Fixed { n, callback } => (selected.len() == *n)
                .then(|| common_parent(tree, selected))
                .flatten()
                .and_then(|parent| callback(tree, parent, selected)),
            ActionKind::Grouped(callback) => {
                let mut done = false;
                let mut to_select = Vec::with_capacity(selected.len());
                for (parent, group) in group_by_parent(tree, selected) {
                    let result = match parent {
                        Some(parent) if group.len() >= 2 => callback(tree, parent, &group),
                        _ => None,
                    };
                    match result {
                        Some(result) => {
                            done = true;
                            to_select.extend(result);
                        },
                        None => to_select.extend(group),
                    }
                }
                done.then_some(to_select)
            },
        };

        debug!(action = self.name, ?selected, ?result, "ran action");
        result
    }
}

/// Returns the parent shared by all of the elements, if there is one.
fn common_parent(tree: &Tree, elems: &[ElemId]) -> Option<ElemId> {
    let parent = tree.parent(*elems.first()?)?;
    elems.iter()
        .all(|&elem| tree.parent(elem) == Some(parent))
        .then_some(parent)
}

/// Groups the elements by parent. Groups are ordered by the first appearance of their parent,
/// and keep the order of the elements inside them.
fn group_by_parent(tree: &Tree, elems: &[ElemId]) -> Vec<(Option<ElemId>, Vec<ElemId>)> {
    let mut groups: Vec<(Option<ElemId>, Vec<ElemId>)> = Vec::new();
    for &elem in elems {
        let parent = tree.parent(elem);
        match groups.iter_mut().find(|(p, _)| *p == parent) {
            Some((_, group)) => group.push(elem),
            None => groups.push((parent, vec![elem])),
        }
    }
    groups
}

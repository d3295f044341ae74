//! The set of elements the user is currently working on.

use mathedit_tree::{ElemId, Tree};
use thiserror::Error;
use tracing::debug;

/// A selection request that cannot be satisfied.
///
/// These errors are caused by the user and should be reported to them; the selection is left
/// unchanged when one is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    /// No elements were given.
    #[error("cannot select nothing")]
    Empty,

    /// An element is not part of the expression (it was removed by an edit, or was never added).
    #[error("cannot select an element that is not part of the expression")]
    Detached,

    /// Two or more elements that do not share the same parent were given.
    #[error("the selected elements do not have the same parent")]
    DifferentParents,

    /// Two or more siblings were given, but there are other siblings between them.
    #[error("the selected elements are not next to each other")]
    NotAdjacent,
}

/// The direction to move in when moving to a sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the first sibling.
    Previous,

    /// Towards the last sibling.
    Next,
}

impl Direction {
    /// Returns the index next to `index` in this direction, if it is within `0..len`.
    fn step(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Self::Previous => index.checked_sub(1),
            Self::Next => Some(index + 1).filter(|&next| next < len),
        }
    }
}

/// The selected elements of a [`Tree`].
///
/// A selection is never empty. It holds either a single element (which may be the root wrapper),
/// or two or more siblings that occupy a contiguous run of their parent's children, in child
/// order. Selecting every child of a parent selects the parent instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    selected: Vec<ElemId>,
}

impl Selection {
    /// Creates a selection of the root wrapper of the tree.
    pub fn new(tree: &Tree) -> Self {
        Self { selected: vec![tree.root()] }
    }

    /// Returns the selected elements, in child order.
    pub fn selected(&self) -> &[ElemId] {
        &self.selected
    }

    /// Returns the first selected element.
    pub fn first(&self) -> ElemId {
        self.selected[0]
    }

    /// Returns the last selected element.
    pub fn last(&self) -> ElemId {
        self.selected[self.selected.len() - 1]
    }

    /// Selects the given elements.
    ///
    /// Duplicates and elements nested inside other given elements are dropped first. The
    /// remaining elements must be a single element, or siblings forming a contiguous run; if
    /// the run covers every child of the parent, the parent is selected instead.
    pub fn select(&mut self, tree: &Tree, elems: &[ElemId]) -> Result<(), SelectError> {
        self.selected = validate(tree, elems)?;
        debug!(selected = ?self.selected, "selection changed");
        Ok(())
    }

    /// Selects the first child of the first selected element. Does nothing for leaves.
    pub fn select_child(&mut self, tree: &Tree) -> Result<(), SelectError> {
        match tree.children(self.first()).first() {
            Some(&child) => self.select(tree, &[child]),
            None => {
                debug!(elem = ?self.first(), "cannot select a child of a leaf");
                Ok(())
            },
        }
    }

    /// Selects the parent of the first selected element. Does nothing for the root wrapper.
    pub fn select_parent(&mut self, tree: &Tree) -> Result<(), SelectError> {
        match tree.parent(self.first()) {
            Some(parent) => self.select(tree, &[parent]),
            None => {
                debug!("cannot select the parent of the root");
                Ok(())
            },
        }
    }

    /// Selects the sibling before the first selected element, or after the last one. Does
    /// nothing if there is no such sibling.
    pub fn select_previous_or_next_sibling(
        &mut self,
        tree: &Tree,
        direction: Direction,
    ) -> Result<(), SelectError> {
        let from = match direction {
            Direction::Previous => self.first(),
            Direction::Next => self.last(),
        };
        match sibling(tree, from, direction) {
            Some(sibling) => self.select(tree, &[sibling]),
            None => {
                debug!(elem = ?from, ?direction, "no sibling to select");
                Ok(())
            },
        }
    }

    /// Selects the first or the last sibling of the first selected element. Does nothing for
    /// the root wrapper.
    pub fn select_first_or_last_sibling(&mut self, tree: &Tree, last: bool) -> Result<(), SelectError> {
        let Some(parent) = tree.parent(self.first()) else {
            debug!("the root has no siblings");
            return Ok(());
        };
        let siblings = tree.children(parent);
        let target = if last { siblings.last() } else { siblings.first() };
        match target {
            Some(&target) => self.select(tree, &[target]),
            None => Ok(()),
        }
    }
}

/// Returns the sibling next to `elem` in the given direction.
fn sibling(tree: &Tree, elem: ElemId, direction: Direction) -> Option<ElemId> {
    let parent = tree.parent(elem)?;
    let siblings = tree.children(parent);
    let index = siblings.iter().position(|&s| s == elem)?;
    direction.step(index, siblings.len()).map(|i| siblings[i])
}

/// Turns a selection request into a valid selection.
fn validate(tree: &Tree, elems: &[ElemId]) -> Result<Vec<ElemId>, SelectError> {
    if elems.is_empty() {
        return Err(SelectError::Empty);
    }
    if elems.iter().any(|&elem| !tree.contains(elem) || !tree.is_reachable(elem)) {
        return Err(SelectError::Detached);
    }

    let mut candidates = elems.to_vec();
    candidates.sort_by(|&a, &b| tree.document_order(a, b));
    candidates.dedup();

    // an element inside another selected element adds nothing to the selection
    let candidates = candidates.iter()
        .copied()
        .filter(|&elem| !candidates.iter().any(|&other| tree.is_ancestor_of(other, elem)))
        .collect::<Vec<_>>();

    let [first, rest @ ..] = candidates.as_slice() else {
        unreachable!("filtering cannot remove every element");
    };
    if rest.is_empty() {
        return Ok(candidates);
    }

    let parent = tree.parent(*first);
    if rest.iter().any(|&elem| tree.parent(elem) != parent) {
        return Err(SelectError::DifferentParents);
    }
    let Some(parent) = parent else {
        // only the root has no parent, and it cannot have siblings
        unreachable!("two parentless elements in one tree");
    };

    // candidates are in child order, so the run is contiguous if the indices are consecutive
    let siblings = tree.children(parent);
    let indices = candidates.iter()
        .map(|&elem| siblings.iter().position(|&s| s == elem))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_else(|| panic!("{:?} does not list all of its children", parent));
    if indices.windows(2).any(|pair| pair[0] + 1 != pair[1]) {
        return Err(SelectError::NotAdjacent);
    }

    if candidates.len() == siblings.len() {
        Ok(vec![parent])
    } else {
        Ok(candidates)
    }
}

/// Grows the selection one sibling at a time, as when holding a modifier key while moving.
///
/// While active, the grow mode remembers an anchor (the end of the selection that stays put)
/// and a moving end. Each step moves the moving end by one sibling and selects the run between
/// the anchor and the moving end, so repeated steps in one direction grow the selection in that
/// direction, and steps in the other direction shrink it back.
///
/// Any change to the selection made outside of the grow mode makes it forget its anchor; the
/// next step starts from the new selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrowMode {
    active: bool,
    state: Option<GrowState>,
}

/// The ends of the run selected by the last grow step, and the selection it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GrowState {
    anchor: ElemId,
    moving: ElemId,
    produced: Vec<ElemId>,
}

impl GrowMode {
    /// Creates an inactive grow mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates the grow mode. Does nothing if it is already active.
    pub fn begin(&mut self) {
        self.active = true;
    }

    /// Deactivates the grow mode and forgets the anchor.
    pub fn end(&mut self) {
        self.active = false;
        self.state = None;
    }

    /// Returns true if the grow mode is active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Moves one sibling in the given direction. If the grow mode is active, the selection is
    /// grown (or shrunk) instead of replaced.
    pub fn select_previous_or_next_sibling(
        &mut self,
        selection: &mut Selection,
        tree: &Tree,
        direction: Direction,
    ) -> Result<(), SelectError> {
        if !self.active {
            return selection.select_previous_or_next_sibling(tree, direction);
        }

        let (anchor, moving) = match &self.state {
            Some(state) if state.produced == selection.selected() && state.produced.contains(&state.anchor) => {
                (state.anchor, state.moving)
            },
            _ => match direction {
                Direction::Previous => (selection.last(), selection.first()),
                Direction::Next => (selection.first(), selection.last()),
            },
        };

        let Some(moved) = sibling(tree, moving, direction) else {
            debug!(elem = ?moving, ?direction, "cannot grow the selection any further");
            return Ok(());
        };

        // the moving end only ever moves among the siblings of the anchor
        let siblings = tree.parent(moved).map(|parent| tree.children(parent)).unwrap_or_default();
        let position = |elem| siblings.iter().position(|&s| s == elem);
        let (Some(a), Some(b)) = (position(anchor), position(moved)) else {
            panic!("grow anchor {:?} is not a sibling of {:?}", anchor, moved);
        };
        let run = &siblings[a.min(b)..=a.max(b)];

        selection.select(tree, run)?;
        self.state = Some(GrowState {
            anchor,
            moving: moved,
            produced: selection.selected().to_vec(),
        });
        Ok(())
    }
}

//! An editing session: one expression tree, its selection, and the actions run on them.

use crate::{
    action::{rules::edit_as_text, Action},
    catalog::CATALOG,
    selection::{Direction, GrowMode, SelectError, Selection},
};
use mathedit_error::Error;
use mathedit_parser::parse;
use mathedit_tree::{ElemId, Tree};
use tracing::{debug, warn};

/// Owns an expression tree and tracks what is selected in it.
#[derive(Debug)]
pub struct Session {
    tree: Tree,
    selection: Selection,
    grow: GrowMode,
}

impl Session {
    /// Creates a session editing the given tree, with the root selected.
    pub fn new(tree: Tree) -> Self {
        let selection = Selection::new(&tree);
        Self { tree, selection, grow: GrowMode::new() }
    }

    /// Creates a session editing the parsed expression.
    pub fn parse(source: &str) -> Result<Self, Error> {
        let mut tree = Tree::new();
        let content = parse(&mut tree, source)?;
        tree.set_content(content);
        tree.sweep();
        Ok(Self::new(tree))
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns the selected elements, in child order.
    pub fn selected(&self) -> &[ElemId] {
        self.selection.selected()
    }

    /// Returns true if the selection is being grown.
    pub fn is_growing(&self) -> bool {
        self.grow.is_active()
    }

    /// Runs the action on the selected elements, then selects its result.
    ///
    /// Returns false if the action did nothing. If the action leaves nothing to select, or its
    /// result cannot be selected, the root is selected instead.
    pub fn run(&mut self, action: &Action) -> bool {
        self.grow.end();
        let selected = self.selection.selected().to_vec();
        let result = action.run(&mut self.tree, &selected);

        let done = match result {
            Some(result) if result.is_empty() => {
                self.select_root();
                true
            },
            Some(result) => {
                if let Err(err) = self.selection.select(&self.tree, &result) {
                    warn!(action = action.name, ?result, %err, "cannot select the result of the action");
                    self.select_root();
                }
                true
            },
            None => false,
        };

        let removed = self.tree.sweep();
        debug!(action = action.name, done, removed, "swept the tree");
        self.tree.check_invariants();
        done
    }

    /// Runs the built-in action bound to the given key label. Returns [`None`] if no action is
    /// bound to it.
    pub fn run_binding(&mut self, key_binding: &str) -> Option<bool> {
        CATALOG.get(key_binding).map(|action| self.run(action))
    }

    /// Selects the given elements. Ends growing the selection.
    pub fn select(&mut self, elems: &[ElemId]) -> Result<(), SelectError> {
        self.grow.end();
        self.selection.select(&self.tree, elems)
    }

    pub fn select_parent(&mut self) -> Result<(), SelectError> {
        self.grow.end();
        self.selection.select_parent(&self.tree)
    }

    pub fn select_child(&mut self) -> Result<(), SelectError> {
        self.grow.end();
        self.selection.select_child(&self.tree)
    }

    pub fn select_previous_or_next_sibling(&mut self, direction: Direction) -> Result<(), SelectError> {
        self.grow.end();
        self.selection.select_previous_or_next_sibling(&self.tree, direction)
    }

    pub fn select_first_or_last_sibling(&mut self, last: bool) -> Result<(), SelectError> {
        self.grow.end();
        self.selection.select_first_or_last_sibling(&self.tree, last)
    }

    /// Grows (or shrinks) the selection by one sibling in the given direction.
    pub fn grow(&mut self, direction: Direction) -> Result<(), SelectError> {
        self.grow.begin();
        self.grow.select_previous_or_next_sibling(&mut self.selection, &self.tree, direction)
    }

    /// Parses the text and replaces the selected element with it. The tree is left untouched if
    /// the text cannot be parsed.
    ///
    /// Returns false if the replacement did not happen, which is the case when more than one
    /// element is selected.
    pub fn edit_selected_as_text(&mut self, text: &str) -> Result<bool, Error> {
        let new = parse(&mut self.tree, text)?;
        Ok(self.run(&edit_as_text(new)))
    }

    /// Replaces the whole expression with the parsed text, and selects the root.
    pub fn set_expression(&mut self, text: &str) -> Result<(), Error> {
        let content = parse(&mut self.tree, text)?;
        self.tree.set_content(content);
        self.select_root();
        self.tree.sweep();
        self.tree.check_invariants();
        Ok(())
    }

    fn select_root(&mut self) {
        self.grow.end();
        self.selection = Selection::new(&self.tree);
    }
}

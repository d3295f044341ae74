//! The built-in actions, looked up by key binding.

use crate::action::{rules, Action};
use once_cell::sync::Lazy;

/// An ordered list of actions with unique key bindings.
#[derive(Debug)]
pub struct Catalog {
    actions: Vec<Action>,
}

impl Catalog {
    /// Creates a catalog of the given actions.
    ///
    /// # Panics
    ///
    /// Panics if two actions share a key binding.
    pub fn new(actions: Vec<Action>) -> Self {
        for (i, action) in actions.iter().enumerate() {
            if let Some(other) = actions[..i].iter().find(|other| other.key_binding == action.key_binding) {
                panic!(
                    "`{}` and `{}` are both bound to `{}`",
                    other.name,
                    action.name,
                    action.key_binding,
                );
            }
        }
        Self { actions }
    }

    /// Returns the action bound to the given key label.
    pub fn get(&self, key_binding: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.key_binding == key_binding)
    }

    /// Returns an iterator over the actions, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }
}

/// The built-in actions.
pub static CATALOG: Lazy<Catalog> = Lazy::new(|| Catalog::new(vec![
    Action::single("Expand", "E", rules::expand),
    Action::single("Unnest", "U", rules::unnest),
    Action::single("Bring minus to front", "B", rules::bring_minus_to_front),
    Action::single("Undo bringing minus to front", "Shift+B", rules::bring_minus_inside),
    Action::fixed("Swap", "S", 2, rules::swap),
    Action::fixed("Cancel", "C", 2, rules::cancel),
    Action::grouped("Factor", "F", rules::factor),
    Action::single("Factor all terms", "Shift+F", rules::factor_all_terms),
]));

use crate::action::Action;
use mathedit_tree::{ElemId, Tree};

/// Creates an action replacing the selected element with `new`, an unattached element of the
/// same tree, typically parsed from text typed by the user. Selecting the root replaces the
/// whole expression.
pub fn edit_as_text(new: ElemId) -> Action {
    Action::single_strict("Edit as text", "Enter", move |tree: &mut Tree, elem| {
        match tree.parent(elem) {
            Some(parent) => tree.replace(parent, elem, new),
            None => {
                tree.set_content(new);
            },
        }
        Some(vec![new])
    })
}

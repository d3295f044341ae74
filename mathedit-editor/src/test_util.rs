//! Helpers shared by the tests of this crate.

use mathedit_parser::parse;
use mathedit_tree::{ElemId, Tree};

/// Parses the source into a new tree, as its content.
pub fn tree_of(source: &str) -> Tree {
    let mut tree = Tree::new();
    let content = parse(&mut tree, source).unwrap();
    tree.set_content(content);
    tree
}

/// Returns the text of the content of the tree.
pub fn text(tree: &Tree) -> String {
    tree.display(tree.content()).to_string()
}

/// Returns the children of the element, which must have exactly `N` of them.
pub fn children<const N: usize>(tree: &Tree, elem: ElemId) -> [ElemId; N] {
    tree.children(elem)
        .try_into()
        .unwrap_or_else(|children: Vec<_>| panic!("expected {} children, found {}", N, children.len()))
}

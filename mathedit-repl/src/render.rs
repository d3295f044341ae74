use mathedit_tree::{Elem, ElemId, ParenPurpose, Tree};

/// Writes the expression of a tree on one line, with the selected elements wrapped in `[` `]`.
///
/// Parentheses follow the display rules, so exponents are never parenthesized; exponents that
/// are not a single symbol or integer are wrapped in `{` `}` instead.
struct Renderer<'a> {
    tree: &'a Tree,
    selected: &'a [ElemId],
    out: String,
}

impl Renderer<'_> {
    /// Returns true if the element is the only selected element.
    fn is_single(&self, id: ElemId) -> bool {
        self.selected == [id]
    }

    /// Returns true if a run of two or more selected siblings starts at the element.
    fn opens_run(&self, id: ElemId) -> bool {
        self.selected.len() > 1 && self.selected[0] == id
    }

    /// Returns true if a run of two or more selected siblings ends at the element.
    fn closes_run(&self, id: ElemId) -> bool {
        self.selected.len() > 1 && self.selected[self.selected.len() - 1] == id
    }

    fn child(&mut self, parent: ElemId, child: ElemId) {
        let parens = self.tree.child_needs_parens(parent, child, ParenPurpose::Display);
        let marked = self.is_single(child);
        if marked {
            self.out.push('[');
        }
        if parens {
            self.out.push('(');
        }
        self.elem(child);
        if parens {
            self.out.push(')');
        }
        if marked {
            self.out.push(']');
        }
    }

    fn elem(&mut self, id: ElemId) {
        let tree = self.tree;
        match tree.get(id) {
            Elem::Symbol(name) => self.out.push_str(name),
            Elem::IntConstant(value) => self.out.push_str(&value.to_string()),
            &Elem::Negation { inner } => {
                self.out.push('-');
                self.child(id, inner);
            },
            &Elem::Fraction { numer, denom } => {
                self.child(id, numer);
                self.out.push('/');
                self.child(id, denom);
            },
            &Elem::Power { base, exponent } => {
                self.child(id, base);
                self.out.push('^');
                if tree.kind(exponent).is_leaf() {
                    self.child(id, exponent);
                } else {
                    self.out.push('{');
                    self.child(id, exponent);
                    self.out.push('}');
                }
            },
            Elem::Product(factors) => {
                for (i, &factor) in factors.iter().enumerate() {
                    if i > 0 {
                        self.out.push('*');
                    }
                    if self.opens_run(factor) {
                        self.out.push('[');
                    }
                    self.child(id, factor);
                    if self.closes_run(factor) {
                        self.out.push(']');
                    }
                }
            },
            Elem::Sum(terms) => {
                for (i, &term) in terms.iter().enumerate() {
                    let marked = self.opens_run(term) || self.is_single(term);
                    match tree.as_negation(term) {
                        // a selected negated term keeps its sign inside the brackets
                        Some(inner) if !marked => {
                            self.out.push_str(if i == 0 { "-" } else { " - " });
                            self.child(term, inner);
                        },
                        _ => {
                            if i > 0 {
                                self.out.push_str(" + ");
                            }
                            if self.opens_run(term) {
                                self.out.push('[');
                            }
                            self.child(id, term);
                        },
                    }
                    if self.closes_run(term) {
                        self.out.push(']');
                    }
                }
            },
            &Elem::Root { inner } => self.child(id, inner),
        }
    }
}

/// Renders the content of the tree, marking the selected elements.
pub fn render(tree: &Tree, selected: &[ElemId]) -> String {
    let mut renderer = Renderer { tree, selected, out: String::new() };
    let root = tree.root();
    let marked = renderer.is_single(root);
    if marked {
        renderer.out.push('[');
    }
    renderer.elem(root);
    if marked {
        renderer.out.push(']');
    }
    renderer.out
}

pub mod error;
pub mod op;

use error::{ExpectedEof, ExpectedExpr, IntegerTooLarge, UnexpectedEof, UnexpectedToken};
use mathedit_error::{Error, ErrorKind};
use mathedit_tree::{ElemId, Tree};
use op::{BinOp, OpClass};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// An operand collected while parsing one expression, before operators are reduced.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Operand {
    /// A parsed atom, or the result of a reduction.
    Elem(ElemId),

    /// The zero added in front of a leading `-`, so that `-x^2-y` reads as `0 - x^2 - y`. It
    /// is dropped when the sum it belongs to is built.
    SyntheticZero,
}

impl Operand {
    /// Returns the element of this operand.
    ///
    /// The synthetic zero is always followed by a `-`, so only the sum reduction can see it.
    fn elem(self) -> ElemId {
        match self {
            Self::Elem(id) => id,
            Self::SyntheticZero => panic!("synthetic zero used outside of a sum"),
        }
    }
}

/// A parser for the linear notation of expressions. Parsed elements are created in the given
/// [`Tree`], unattached.
///
/// If parsing fails, the elements created so far are left unattached in the tree, where
/// [`Tree::sweep`] reclaims them; the reachable part of the tree is never modified.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source, tokenizing it eagerly.
    pub fn new(source: &'source str) -> Result<Self, Error> {
        Ok(Self {
            tokens: tokenize_complete(source)?,
            cursor: 0,
        })
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the next token to be parsed, then advances the cursor.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        let token = self.tokens
            .get(self.cursor)
            .cloned()
            .ok_or_else(|| self.error(UnexpectedEof))?;
        self.cursor += 1;
        Ok(token)
    }

    /// Parses one expression. All the tokens must be consumed by the parser; if not, an error is
    /// returned.
    pub fn parse_full(&mut self, tree: &mut Tree) -> Result<ElemId, Error> {
        let elem = self.parse_expr(tree)?;
        if self.cursor == self.tokens.len() {
            Ok(elem)
        } else {
            Err(Error::new(vec![self.span().start..self.eof_span().end], ExpectedEof))
        }
    }

    /// Parses an atom: a variable, an integer, or a parenthesized expression.
    fn parse_atom(&mut self, tree: &mut Tree) -> Result<ElemId, Error> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Var => Ok(tree.symbol(token.lexeme)),
            TokenKind::Int => token.lexeme
                .parse::<u64>()
                .map(|value| tree.unsigned_constant(value))
                .map_err(|_| Error::new(vec![token.span], IntegerTooLarge)),
            TokenKind::OpenParen => {
                let inner = self.parse_expr(tree)?;
                let close = self.next_token()?;
                if close.kind == TokenKind::CloseParen {
                    Ok(inner)
                } else {
                    Err(Error::new(vec![close.span], UnexpectedToken {
                        found: close.lexeme.to_string(),
                    }))
                }
            },
            _ => Err(Error::new(vec![token.span], UnexpectedToken {
                found: token.lexeme.to_string(),
            })),
        }
    }

    /// Parses an expression: an optional sign, then atoms separated by binary operators or
    /// written next to each other (implicit multiplication).
    fn parse_expr(&mut self, tree: &mut Tree) -> Result<ElemId, Error> {
        let start = self.span();
        let mut operands = Vec::new();
        let mut ops = Vec::new();

        match self.current_token().map(|token| token.kind) {
            Some(TokenKind::Add) => self.cursor += 1,
            Some(TokenKind::Sub) => {
                self.cursor += 1;
                operands.push(Operand::SyntheticZero);
                ops.push(BinOp::Sub);
            },
            _ => (),
        }
        operands.push(Operand::Elem(self.parse_atom(tree)?));

        while let Some(kind) = self.current_token().map(|token| token.kind) {
            let op = match BinOp::from_token(kind) {
                Some(op) => {
                    self.cursor += 1;
                    op
                },
                None if kind.starts_atom() => BinOp::Mul,
                None => break,
            };
            ops.push(op);
            operands.push(Operand::Elem(self.parse_atom(tree)?));
        }

        let span = start.start..self.tokens
            .get(self.cursor.saturating_sub(1))
            .map_or(start.end, |token| token.span.end);
        reduce(tree, operands, ops, span)
    }
}

/// Reduces the flat sequence `operands[0] ops[0] operands[1] ops[1] ...` into a single element,
/// one operator class at a time, in [`OpClass::REDUCTION_ORDER`].
fn reduce(
    tree: &mut Tree,
    mut operands: Vec<Operand>,
    mut ops: Vec<BinOp>,
    span: Range<usize>,
) -> Result<ElemId, Error> {
    for class in OpClass::REDUCTION_ORDER {
        while let Some(first) = ops.iter().position(|op| op.class() == class) {
            let last = if class.reduces_runs() {
                first + ops[first..].iter().take_while(|op| op.class() == class).count() - 1
            } else {
                first
            };

            // ops[first..=last] sit between operands[first..=last + 1]
            let run_ops = ops.drain(first..=last).collect::<Vec<_>>();
            let run = operands.drain(first..=last + 1).collect::<Vec<_>>();
            let result = match class {
                OpClass::Exp => tree.power(run[0].elem(), run[1].elem()),
                OpClass::Div => tree.fraction(run[0].elem(), run[1].elem()),
                OpClass::Mul => {
                    let factors = run.into_iter().map(Operand::elem).collect();
                    tree.product(factors)
                },
                OpClass::Term => {
                    let mut terms = Vec::with_capacity(run.len());
                    for (i, operand) in run.into_iter().enumerate() {
                        let Operand::Elem(term) = operand else {
                            continue;
                        };
                        if i > 0 && run_ops[i - 1] == BinOp::Sub {
                            terms.push(tree.negation(term));
                        } else {
                            terms.push(term);
                        }
                    }

                    // a synthetic zero is always followed by a parsed atom, so this only fires if
                    // parse_expr stops guaranteeing that
                    if terms.is_empty() {
                        return Err(Error::new(vec![span], ExpectedExpr));
                    }
                    tree.sum(terms)
                },
            };
            operands.insert(first, Operand::Elem(result));
        }
    }

    match operands.as_slice() {
        [Operand::Elem(id)] => Ok(*id),
        _ => panic!("operands left after reducing all operators: {:?}", operands),
    }
}

#[cfg(test)]
mod tests {
    use mathedit_tree::ParenPurpose;
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use super::*;

    /// Parses the source into a fresh tree.
    fn parse_new(source: &str) -> (Tree, ElemId) {
        let mut tree = Tree::new();
        let elem = Parser::new(source)
            .and_then(|mut parser| parser.parse_full(&mut tree))
            .unwrap();
        (tree, elem)
    }

    /// Parses the source and returns the spans of the resulting error.
    fn parse_err(source: &str) -> Vec<Range<usize>> {
        let mut tree = Tree::new();
        Parser::new(source)
            .and_then(|mut parser| parser.parse_full(&mut tree))
            .unwrap_err()
            .spans
    }

    /// Asserts that the parsed source is structurally equal to the element built by `expected`.
    fn assert_parses_to(source: &str, expected: impl FnOnce(&mut Tree) -> ElemId) {
        let (tree, elem) = parse_new(source);
        let mut expected_tree = Tree::new();
        let expected_elem = expected(&mut expected_tree);
        assert!(
            tree.equals_in(elem, &expected_tree, expected_elem),
            "`{}` parsed to `{}`, expected `{}`",
            source,
            tree.display(elem),
            expected_tree.display(expected_elem),
        );
    }

    #[test]
    fn atoms() {
        assert_parses_to("x", |tree| tree.symbol("x"));
        assert_parses_to("144", |tree| tree.unsigned_constant(144));
        assert_parses_to("((y))", |tree| tree.symbol("y"));
    }

    #[test]
    fn signed_sum() {
        assert_parses_to("-x^2-y", |tree| {
            let x = tree.symbol("x");
            let two = tree.unsigned_constant(2);
            let square = tree.power(x, two);
            let neg_square = tree.negation(square);
            let y = tree.symbol("y");
            let neg_y = tree.negation(y);
            tree.sum(vec![neg_square, neg_y])
        });
    }

    #[test]
    fn leading_sign() {
        assert_parses_to("-x", |tree| {
            let x = tree.symbol("x");
            tree.negation(x)
        });
        assert_parses_to("+x", |tree| tree.symbol("x"));
        assert_parses_to("-x*y", |tree| {
            let x = tree.symbol("x");
            let y = tree.symbol("y");
            let product = tree.product(vec![x, y]);
            tree.negation(product)
        });
    }

    #[test]
    fn sums_and_products_are_flat() {
        assert_parses_to("a + b - c + d", |tree| {
            let [a, b, c, d] = ["a", "b", "c", "d"].map(|name| tree.symbol(name));
            let neg_c = tree.negation(c);
            tree.sum(vec![a, b, neg_c, d])
        });
        assert_parses_to("a*b*c + d", |tree| {
            let [a, b, c, d] = ["a", "b", "c", "d"].map(|name| tree.symbol(name));
            let product = tree.product(vec![a, b, c]);
            tree.sum(vec![product, d])
        });
    }

    #[test]
    fn implicit_multiplication() {
        assert_parses_to("2x y(z+1)", |tree| {
            let two = tree.unsigned_constant(2);
            let x = tree.symbol("x");
            let y = tree.symbol("y");
            let z = tree.symbol("z");
            let one = tree.unsigned_constant(1);
            let sum = tree.sum(vec![z, one]);
            tree.product(vec![two, x, y, sum])
        });

        // implicit multiplication joins the same run as explicit `*`
        assert_parses_to("a*b c", |tree| {
            let [a, b, c] = ["a", "b", "c"].map(|name| tree.symbol(name));
            tree.product(vec![a, b, c])
        });
    }

    #[test]
    fn powers_and_fractions_bind_tighter() {
        assert_parses_to("a*b/c^d", |tree| {
            let [a, b, c, d] = ["a", "b", "c", "d"].map(|name| tree.symbol(name));
            let power = tree.power(c, d);
            let fraction = tree.fraction(b, power);
            tree.product(vec![a, fraction])
        });
    }

    #[test]
    fn binary_operators_are_left_associative() {
        assert_parses_to("a/b/c", |tree| {
            let [a, b, c] = ["a", "b", "c"].map(|name| tree.symbol(name));
            let inner = tree.fraction(a, b);
            tree.fraction(inner, c)
        });
        assert_parses_to("a^b^c", |tree| {
            let [a, b, c] = ["a", "b", "c"].map(|name| tree.symbol(name));
            let inner = tree.power(a, b);
            tree.power(inner, c)
        });
    }

    #[test]
    fn bracket_styles_are_interchangeable() {
        assert_parses_to("[a+b]/{c-d)", |tree| {
            let [a, b, c, d] = ["a", "b", "c", "d"].map(|name| tree.symbol(name));
            let numer = tree.sum(vec![a, b]);
            let neg_d = tree.negation(d);
            let denom = tree.sum(vec![c, neg_d]);
            tree.fraction(numer, denom)
        });
    }

    #[test]
    fn sign_inside_parens() {
        assert_parses_to("x^(-2)", |tree| {
            let x = tree.symbol("x");
            let minus_two = tree.int_constant(-2);
            tree.power(x, minus_two)
        });
    }

    #[test]
    fn parsed_elements_are_unattached() {
        let (tree, elem) = parse_new("a + b");
        assert_eq!(tree.parent(elem), None);
        assert_eq!(tree.content(), tree.children(tree.root())[0]);
        assert_eq!(tree.as_int(tree.content()), Some(0));
    }

    #[test]
    fn unexpected_token() {
        assert_eq!(parse_err("x + * y"), vec![4..5]);
        assert_eq!(parse_err(")"), vec![0..1]);
        assert_eq!(parse_err("(x + y]z +)"), vec![10..11]);
    }

    #[test]
    fn unexpected_eof() {
        assert_eq!(parse_err("x +"), vec![3..3]);
        assert_eq!(parse_err("(x"), vec![2..2]);
        assert_eq!(parse_err(""), vec![0..0]);
    }

    #[test]
    fn trailing_input() {
        assert_eq!(parse_err("x + y) - z"), vec![5..10]);
    }

    #[test]
    fn unknown_character_is_reported_first() {
        assert_eq!(parse_err("(x + y $"), vec![7..8]);
    }

    #[test]
    fn integer_too_large() {
        assert_eq!(parse_err("2 * 99999999999999999999"), vec![4..24]);
    }

    /// Parses the source and renders the resulting error report without colors.
    fn report_of(source: &str) -> String {
        let mut tree = Tree::new();
        let err = Parser::new(source)
            .and_then(|mut parser| parser.parse_full(&mut tree))
            .unwrap_err();

        let mut buf = Vec::new();
        err.write_report("input", source, &mut buf).unwrap();
        String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap()
    }

    #[test]
    fn error_report_names_the_token() {
        assert!(report_of("x + * y").contains("unexpected token: `*`"));
    }

    #[test]
    fn lone_sign_fails_on_the_missing_atom() {
        assert_eq!(parse_err("-"), vec![1..1]);
        assert_eq!(parse_err("(-)"), vec![2..3]);
        assert_eq!(parse_err("- )"), vec![2..3]);

        for source in ["-", "(-)", "- )", "x*(-)"] {
            let report = report_of(source);
            assert!(!report.contains("expected an expression"), "{}", report);
        }
        assert!(report_of("-").contains("unexpected end of input"));
        assert!(report_of("(-)").contains("unexpected token: `)`"));
    }

    #[test]
    fn serialize_then_parse_gives_equal_tree() {
        let sources = [
            "(x^2)^(y^2) - 2*x - (x^2 - 1^(-2)) + (x + y)*(x - y)",
            "a*(b + c)*d",
            "-(a + b) - (-c)",
            "(a/b)/(c/d)",
            "(-x)^2*y/z",
            "x - y - z",
            "-(-(-x))",
        ];
        for source in sources {
            let (mut tree, elem) = parse_new(source);
            let text = tree.display(elem).to_string();
            let reparsed = Parser::new(&text)
                .and_then(|mut parser| parser.parse_full(&mut tree))
                .unwrap();
            assert!(tree.equals(elem, reparsed), "`{}` serialized to `{}`", source, text);
        }
    }

    /// Builds a random unattached element using the variables `x`, `y` and `z`.
    fn random_elem(tree: &mut Tree, rng: &mut StdRng, depth: usize) -> ElemId {
        let choice = if depth == 0 { rng.gen_range(0..2) } else { rng.gen_range(0..7) };
        let sub = |tree: &mut Tree, rng: &mut StdRng| random_elem(tree, rng, depth - 1);
        match choice {
            0 => tree.symbol(["x", "y", "z"][rng.gen_range(0..3)]),
            1 => tree.unsigned_constant(rng.gen_range(0..100)),
            2 => {
                let inner = sub(tree, rng);
                tree.negation(inner)
            },
            3 => {
                let (numer, denom) = (sub(tree, rng), sub(tree, rng));
                tree.fraction(numer, denom)
            },
            4 => {
                let (base, exponent) = (sub(tree, rng), sub(tree, rng));
                tree.power(base, exponent)
            },
            kind => {
                let children = (0..rng.gen_range(2..5)).map(|_| sub(tree, rng)).collect();
                if kind == 5 { tree.product(children) } else { tree.sum(children) }
            },
        }
    }

    #[test]
    fn random_trees_survive_serialization() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..300 {
            let mut tree = Tree::new();
            let elem = random_elem(&mut tree, &mut rng, 4);
            let text = tree.display(elem).to_string();
            let reparsed = Parser::new(&text)
                .and_then(|mut parser| parser.parse_full(&mut tree))
                .unwrap_or_else(|err| panic!("`{}` failed to parse: {:?}", text, err));
            assert!(tree.equals(elem, reparsed), "`{}` did not round trip", text);

            // display only ever drops parentheses
            let display = tree.display_for(elem, ParenPurpose::Display).to_string();
            assert!(display.len() <= text.len());
            let strip = |s: &str| s.chars().filter(|c| !matches!(c, '(' | ')')).collect::<String>();
            assert_eq!(strip(&display), strip(&text));
        }
    }
}

pub mod token;

use crate::parser::error::UnknownCharacter;
use logos::{Lexer, Logos};
use mathedit_error::Error;
pub use token::{Token, TokenKind};

/// Lexes the input lazily, whitespace included.
pub fn tokenize(input: &str) -> Lexer<'_, TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the non-whitespace tokens produced by the
/// tokenizer, so that the parser can look ahead freely.
///
/// Returns an error pointing at the first character that does not begin any token.
pub fn tokenize_complete(input: &str) -> Result<Box<[Token<'_>]>, Error> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let Ok(kind) = result else {
            return Err(Error::new(vec![lexer.span()], UnknownCharacter {
                character: lexer.slice().to_string(),
            }));
        };

        if !kind.is_whitespace() {
            tokens.push(Token {
                span: lexer.span(),
                kind,
                lexeme: lexer.slice(),
            });
        }
    }

    Ok(tokens.into_boxed_slice())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Asserts that lexing the input produces exactly the given tokens, whitespace included.
    fn assert_lexes<const N: usize>(input: &str, expected: [(TokenKind, &str); N]) {
        let mut lexer = tokenize(input);
        let mut lexed = Vec::new();
        while let Some(kind) = lexer.next() {
            lexed.push((kind, lexer.slice()));
        }
        assert_eq!(lexed, expected.map(|(kind, lexeme)| (Ok(kind), lexeme)));
    }

    #[test]
    fn basic_expr() {
        assert_lexes(
            "1 + 2",
            [
                (TokenKind::Int, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn variables_are_single_letters() {
        assert_lexes(
            "xy^12",
            [
                (TokenKind::Var, "x"),
                (TokenKind::Var, "y"),
                (TokenKind::Exp, "^"),
                (TokenKind::Int, "12"),
            ],
        );
    }

    #[test]
    fn brackets_are_parens() {
        assert_lexes(
            "[a]{b}",
            [
                (TokenKind::OpenParen, "["),
                (TokenKind::Var, "a"),
                (TokenKind::CloseParen, "]"),
                (TokenKind::OpenParen, "{"),
                (TokenKind::Var, "b"),
                (TokenKind::CloseParen, "}"),
            ],
        );
    }

    #[test]
    fn complete_drops_whitespace() {
        let tokens = tokenize_complete(" 3\tx -\n( y )").unwrap();
        let kinds = tokens.iter().map(|token| token.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![
            TokenKind::Int,
            TokenKind::Var,
            TokenKind::Sub,
            TokenKind::OpenParen,
            TokenKind::Var,
            TokenKind::CloseParen,
        ]);
        assert_eq!(tokens[1].span, 3..4);
        assert_eq!(tokens[1].lexeme, "x");
    }

    #[test]
    fn unknown_character() {
        let err = tokenize_complete("x + $").unwrap_err();
        assert_eq!(err.spans, vec![4..5]);
    }
}

//! Tokenizer for Science IR text.
//!
//! Lexing is per line: the grammar is line-oriented and line numbers are
//! the unit of every diagnostic.

use std::fmt;

use logos::Logos;
use thiserror::Error;

use super::attributes::{quote, unquote};
use super::types::{IrType, Symbol};

/// IR tokens.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    /// `%name`
    #[regex(r"%[A-Za-z0-9_]+", |lex| Symbol::from_raw(&lex.slice()[1..]))]
    Symbol(Symbol),

    /// `!science.name<params>`, lexed whole.
    #[regex(r"![A-Za-z_][A-Za-z0-9_]*\.[A-Za-z_][A-Za-z0-9_]*<[^<>\n]*>", |lex| IrType::parse(lex.slice()))]
    Type(IrType),

    /// `#science.name`, stored without the `#`.
    #[regex(r"#[A-Za-z_][A-Za-z0-9_]*\.[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice()[1..].to_string())]
    AttrName(String),

    /// Bare or dotted identifiers: `module`, `constant`, `at`, `science.bind`, `cell_type`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*", |lex| lex.slice().to_string())]
    Ident(String),

    /// Decimal number; the integer part may be omitted (`.5`).
    #[regex(r"-?([0-9]+(\.[0-9]+)?|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// String literal, unescaped.
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| unquote(lex.slice()))]
    Str(String),

    #[token("=")]
    Eq,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("->")]
    Arrow,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,
}

impl Token {
    /// Returns true if this is the identifier `word`.
    #[must_use]
    pub fn is_ident(&self, word: &str) -> bool {
        matches!(self, Self::Ident(s) if s == word)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(sym) => write!(f, "{sym}"),
            Self::Type(ty) => write!(f, "{ty}"),
            Self::AttrName(name) => write!(f, "#{name}"),
            Self::Ident(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(&quote(s)),
            Self::Eq => f.write_str("="),
            Self::Comma => f.write_str(","),
            Self::Colon => f.write_str(":"),
            Self::Arrow => f.write_str("->"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::LBrace => f.write_str("{"),
            Self::RBrace => f.write_str("}"),
            Self::LAngle => f.write_str("<"),
            Self::RAngle => f.write_str(">"),
        }
    }
}

/// A lexing failure within one line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected input at column {column}: '{snippet}'")]
pub struct LexError {
    /// 1-based column of the offending input.
    pub column: usize,
    pub snippet: String,
}

/// Tokenizes one line, returning each token with its byte offset.
///
/// # Errors
///
/// Returns `LexError` at the first input that matches no token.
pub fn tokenize(line: &str) -> Result<Vec<(Token, usize)>, LexError> {
    match tokenize_prefix(line) {
        (tokens, None) => Ok(tokens),
        (_, Some(err)) => Err(err),
    }
}

/// Tokenizes one line up to the first input that matches no token.
///
/// Returns the tokens before that point together with the error, if any.
#[must_use]
pub fn tokenize_prefix(line: &str) -> (Vec<(Token, usize)>, Option<LexError>) {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(line);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span.start)),
            Err(()) => {
                let err = LexError {
                    column: line[..span.start].chars().count() + 1,
                    snippet: line[span].to_string(),
                };
                return (tokens, Some(err));
            }
        }
    }

    (tokens, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<Token> {
        tokenize(line).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_declaration_tokens() {
        let tokens = kinds("%q1 = constant !science.protein<Q1>");
        assert_eq!(
            tokens,
            vec![
                Token::Symbol(Symbol::from_raw("q1")),
                Token::Eq,
                Token::Ident("constant".to_string()),
                Token::Type(IrType::new("protein", ["Q1"])),
            ]
        );
    }

    #[test]
    fn test_operation_head_tokens() {
        let tokens = kinds("%r = science.activate %a, %b at \"S15\"");
        assert_eq!(tokens[2], Token::Ident("science.activate".to_string()));
        assert_eq!(tokens[3], Token::Symbol(Symbol::from_raw("a")));
        assert_eq!(tokens[4], Token::Comma);
        assert!(tokens[6].is_ident("at"));
        assert_eq!(tokens[7], Token::Str("S15".to_string()));
    }

    #[test]
    fn test_attribute_tokens() {
        let tokens = kinds("{evidence = #science.evidence<\"1\", \"unknown\", 0.25, \"reach\">}");
        assert_eq!(tokens[0], Token::LBrace);
        assert!(tokens[1].is_ident("evidence"));
        assert_eq!(tokens[3], Token::AttrName("science.evidence".to_string()));
        assert_eq!(tokens[4], Token::LAngle);
        assert_eq!(tokens[9], Token::Number(0.25));
        assert_eq!(tokens[12], Token::RAngle);
        assert_eq!(*tokens.last().unwrap(), Token::RBrace);
    }

    #[test]
    fn test_signature_tokens() {
        let tokens = kinds(": (!science.protein<A>) -> !science.cellstate<\"inhibited\">");
        assert_eq!(tokens[0], Token::Colon);
        assert_eq!(tokens[3], Token::RParen);
        assert_eq!(tokens[4], Token::Arrow);
        assert_eq!(tokens[5], Token::Type(IrType::inhibited_state()));
    }

    #[test]
    fn test_comments_and_blank() {
        assert!(kinds("   // Entity declarations").is_empty());
        assert!(kinds("").is_empty());
        assert_eq!(kinds("module { // open"), vec![Token::Ident("module".to_string()), Token::LBrace]);
    }

    #[test]
    fn test_lex_error_column() {
        let err = tokenize("%a = constant @oops").unwrap_err();
        assert_eq!(err.column, 15);
        assert_eq!(err.snippet, "@");
    }

    #[test]
    fn test_numbers_without_integer_part() {
        assert_eq!(kinds(".5"), vec![Token::Number(0.5)]);
        assert_eq!(kinds("-.25"), vec![Token::Number(-0.25)]);
        assert_eq!(kinds("1e-3"), vec![Token::Number(0.001)]);
    }

    #[test]
    fn test_prefix_before_lex_error() {
        let (tokens, err) = tokenize_prefix("%a, %b $ %c");
        assert_eq!(tokens.len(), 3);
        assert_eq!(err.unwrap().column, 8);
        assert!(tokenize_prefix("%a, %b").1.is_none());
    }

    #[test]
    fn test_foreign_type_namespace_rejected() {
        assert!(tokenize("%a = constant !llvm.ptr<i8>").is_err());
    }
}

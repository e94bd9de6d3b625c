//! Literal inference for binding expressions without a declared schema.

use logos::Logos;

use super::lattice::{LatticeType, PrimitiveKind};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum LiteralToken {
    #[token("true")]
    #[token("false")]
    Boolean,

    #[regex(r"-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    #[regex(r"`([^`\\]|\\.)*`")]
    Quoted,
}

/// Infer a lattice type from a literal token.
///
/// `true`/`false` → boolean, numbers → number, quoted text → string,
/// `{...}` → object, `[...]` → array. Anything else (identifiers, calls,
/// operators, partial tokens) is unknown.
pub fn infer_from_literal(text: &str) -> LatticeType {
    let trimmed = text.trim();
    if trimmed.len() >= 2 {
        if trimmed.starts_with('{') && trimmed.ends_with('}') {
            return LatticeType::object();
        }
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            return LatticeType::array(LatticeType::unknown());
        }
    }

    let mut lexer = LiteralToken::lexer(trimmed);
    let token = match lexer.next() {
        Some(Ok(token)) => token,
        _ => return LatticeType::unknown(),
    };
    // The single token must cover the whole text.
    if lexer.span() != (0..trimmed.len()) || lexer.next().is_some() {
        return LatticeType::unknown();
    }

    let kind = match token {
        LiteralToken::Boolean => PrimitiveKind::Boolean,
        LiteralToken::Number => PrimitiveKind::Number,
        LiteralToken::Quoted => PrimitiveKind::String,
    };
    LatticeType::Primitive(kind)
}

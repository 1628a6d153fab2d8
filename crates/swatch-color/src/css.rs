//! Error reporting helpers shared by the `cssparser`-based parsers.

use cssparser::{BasicParseErrorKind, ParseError, ParseErrorKind, ToCss, Token};

pub(crate) fn describe_token(token: &Token<'_>) -> String {
    format!("'{}'", token.to_css_string())
}

pub(crate) fn describe_basic(kind: &BasicParseErrorKind<'_>) -> String {
    match kind {
        BasicParseErrorKind::UnexpectedToken(token) => {
            format!("unexpected {}", describe_token(token))
        }
        BasicParseErrorKind::EndOfInput => "unexpected end of input".to_string(),
        other => format!("{other:?}"),
    }
}

/// Message for a parse error whose custom payload is already a message.
pub(crate) fn error_reason(error: ParseError<'_, String>) -> String {
    match error.kind {
        ParseErrorKind::Custom(reason) => reason,
        ParseErrorKind::Basic(kind) => describe_basic(&kind),
    }
}

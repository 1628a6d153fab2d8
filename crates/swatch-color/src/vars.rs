//! `var()` substitution for CSS color expressions.
//!
//! Custom-property references are replaced before parsing, the same way a
//! style engine substitutes them at computed-value time. Substituted values
//! may themselves contain `var()` references. Everything outside a `var()`
//! is copied through verbatim.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, Token};

use crate::css::{describe_basic, describe_token};
use crate::error::{ColorError, Result};

/// Maximum `var()` nesting before a reference chain is treated as a cycle.
pub const MAX_VAR_DEPTH: usize = 16;

type VarResult<'i, T> = std::result::Result<T, ParseError<'i, ColorError>>;

/// Source of custom-property values used during `var()` substitution.
pub trait PropertyLookup {
    /// Raw value of the `--`-prefixed property `name`, if defined.
    fn lookup_property(&self, name: &str) -> Option<String>;
}

impl<S: BuildHasher> PropertyLookup for HashMap<String, String, S> {
    fn lookup_property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl PropertyLookup for BTreeMap<String, String> {
    fn lookup_property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Replace every `var(--name[, fallback])` in `input` with its value.
///
/// # Errors
///
/// Returns [`ColorError::Parse`] for malformed references, references to
/// undefined properties without a fallback, and chains deeper than
/// [`MAX_VAR_DEPTH`].
pub fn substitute_vars(input: &str, lookup: &dyn PropertyLookup) -> Result<String> {
    let substitution = Substitution {
        lookup,
        depth: 0,
        original: input,
    };
    substitution.run(input)
}

/// Names of the custom properties referenced by `var()` anywhere in `text`,
/// fallbacks included, in source order.
pub fn referenced_properties(text: &str) -> Vec<String> {
    let mut parser_input = ParserInput::new(text);
    let mut parser = Parser::new(&mut parser_input);
    let mut names = Vec::new();
    collect_references(&mut parser, &mut names);
    names
}

fn collect_references(input: &mut Parser<'_, '_>, names: &mut Vec<String>) {
    loop {
        let (is_var, opens_block) = match input.next() {
            Ok(token) => (
                matches!(token, Token::Function(name) if name.eq_ignore_ascii_case("var")),
                matches!(
                    token,
                    Token::Function(_)
                        | Token::ParenthesisBlock
                        | Token::SquareBracketBlock
                        | Token::CurlyBracketBlock
                ),
            ),
            Err(_) => break,
        };
        if !opens_block {
            continue;
        }
        let nested: std::result::Result<(), ParseError<'_, ()>> =
            input.parse_nested_block(|block| {
                if is_var
                    && let Ok(Token::Ident(name)) = block.next()
                    && name.starts_with("--")
                {
                    names.push(name.to_string());
                }
                collect_references(block, names);
                Ok(())
            });
        if nested.is_err() {
            break;
        }
    }
}

struct Substitution<'a> {
    lookup: &'a dyn PropertyLookup,
    depth: usize,
    original: &'a str,
}

impl Substitution<'_> {
    fn error(&self, reason: impl Into<String>) -> ColorError {
        ColorError::parse(self.original, reason)
    }

    fn run(&self, text: &str) -> Result<String> {
        if self.depth > MAX_VAR_DEPTH {
            return Err(self.error("var() references are cyclic or nested too deeply"));
        }
        let mut parser_input = ParserInput::new(text);
        let mut parser = Parser::new(&mut parser_input);
        let mut out = String::with_capacity(text.len());
        self.copy_tokens(&mut parser, &mut out)
            .map_err(|error| match error.kind {
                ParseErrorKind::Custom(error) => error,
                ParseErrorKind::Basic(kind) => self.error(describe_basic(&kind)),
            })?;
        Ok(out)
    }

    /// Copy `input` into `out`, replacing `var()` functions at any depth.
    fn copy_tokens<'i>(&self, input: &mut Parser<'i, '_>, out: &mut String) -> VarResult<'i, ()> {
        let mut chunk = input.position();
        loop {
            let before = input.position();
            let token = match input.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };
            let closing = match token {
                Token::Function(ref name) if name.eq_ignore_ascii_case("var") => {
                    out.push_str(input.slice(chunk..before));
                    let value = input.parse_nested_block(|block| self.resolve(block))?;
                    out.push_str(&value);
                    chunk = input.position();
                    continue;
                }
                Token::Function(_) | Token::ParenthesisBlock => ')',
                Token::SquareBracketBlock => ']',
                Token::CurlyBracketBlock => '}',
                _ => continue,
            };
            out.push_str(input.slice_from(chunk));
            input.parse_nested_block(|block| self.copy_tokens(block, out))?;
            out.push(closing);
            chunk = input.position();
        }
        out.push_str(input.slice_from(chunk));
        Ok(())
    }

    /// Resolve the inside of one `var(...)` to its substituted value.
    fn resolve<'i>(&self, input: &mut Parser<'i, '_>) -> VarResult<'i, String> {
        let location = input.current_source_location();
        let name = match input.next()?.clone() {
            Token::Ident(name) if name.starts_with("--") => name.to_string(),
            other => {
                let found = describe_token(&other);
                return Err(location.new_custom_error(
                    self.error(format!("var() expects a custom property, found {found}")),
                ));
            }
        };
        let fallback = if input.try_parse(|input| input.expect_comma()).is_ok() {
            let start = input.position();
            while input.next_including_whitespace_and_comments().is_ok() {}
            Some(input.slice_from(start).trim().to_string())
        } else {
            None
        };

        let value = self
            .lookup
            .lookup_property(&name)
            .filter(|value| !value.trim().is_empty())
            .or(fallback)
            .ok_or_else(|| {
                location.new_custom_error(self.error(format!("undefined custom property {name}")))
            })?;
        let nested = Substitution {
            lookup: self.lookup,
            depth: self.depth + 1,
            original: self.original,
        };
        nested
            .run(value.trim())
            .map_err(|error| location.new_custom_error(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_simple() {
        let lookup = props(&[("--color-primary", "#3366cc")]);
        assert_eq!(
            substitute_vars("oklch(from var(--color-primary) l c h)", &lookup).unwrap(),
            "oklch(from #3366cc l c h)"
        );
    }

    #[test]
    fn test_substitute_nested_chain() {
        let lookup = props(&[
            ("--a", "var(--b)"),
            ("--b", "rgb(1 2 3)"),
        ]);
        assert_eq!(substitute_vars("var(--a)", &lookup).unwrap(), "rgb(1 2 3)");
    }

    #[test]
    fn test_substitute_fallback() {
        let lookup = props(&[]);
        assert_eq!(
            substitute_vars("var(--missing, rgb(0 0 0))", &lookup).unwrap(),
            "rgb(0 0 0)"
        );
    }

    #[test]
    fn test_substitute_undefined() {
        let lookup = props(&[]);
        assert!(substitute_vars("var(--missing)", &lookup).is_err());
    }

    #[test]
    fn test_substitute_cycle() {
        let lookup = props(&[("--a", "var(--b)"), ("--b", "var(--a)")]);
        let err = substitute_vars("var(--a)", &lookup).unwrap_err();
        assert!(err.to_string().contains("cyclic"));
    }

    #[test]
    fn test_substitute_ignores_identifier_suffix() {
        let lookup = props(&[]);
        assert_eq!(substitute_vars("novar(1)", &lookup).unwrap(), "novar(1)");
    }

    #[test]
    fn test_substitute_keeps_surrounding_text() {
        let lookup = props(&[("--turn", "120")]);
        assert_eq!(
            substitute_vars("oklch(from #000 l c calc(h + var(--turn)) / 50%)", &lookup).unwrap(),
            "oklch(from #000 l c calc(h + 120) / 50%)"
        );
    }

    #[test]
    fn test_substitute_fallback_with_reference() {
        let lookup = props(&[("--b", "red")]);
        assert_eq!(
            substitute_vars("var(--a, var(--b))", &lookup).unwrap(),
            "red"
        );
    }

    #[test]
    fn test_substitute_rejects_plain_name() {
        let lookup = props(&[]);
        assert!(substitute_vars("var(color)", &lookup).is_err());
    }

    #[test]
    fn test_referenced_properties() {
        assert_eq!(
            referenced_properties("oklch(from var(--color-primary) l c calc(h + var( --turn, 0)))"),
            vec!["--color-primary".to_string(), "--turn".to_string()]
        );
        assert_eq!(
            referenced_properties("var(--a, var(--b))"),
            vec!["--a".to_string(), "--b".to_string()]
        );
        assert!(referenced_properties("#3366cc").is_empty());
    }
}

//! Stylesheet and declaration-list parsing on top of `cssparser`.
//!
//! Only custom-property bookkeeping is needed here, so declaration values are
//! kept as raw text and only `:root`/`html` rules contribute declarations.
//! Blocks left open at the end of the input are closed implicitly, as in CSS.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, ParseErrorKind, Parser, ParserInput,
    ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser,
    ToCss, Token,
};

use crate::error::{EnvError, Result};

/// A `(name, raw value)` declaration.
pub(crate) type Declaration = (String, String);

/// Declarations of every `:root` or `html` rule in `css`, in source order.
///
/// Text without any rule block is read as a bare declaration list.
pub(crate) fn parse_stylesheet(css: &str) -> Result<Vec<Declaration>> {
    if !has_rule_blocks(css) {
        return parse_declaration_list(css);
    }

    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = RootRules;
    let mut declarations = Vec::new();
    for rule in StyleSheetParser::new(&mut parser, &mut rules) {
        match rule {
            Ok(rule) => declarations.extend(rule),
            Err((error, slice)) => {
                return Err(match error.kind {
                    ParseErrorKind::Custom(error) => error,
                    ParseErrorKind::Basic(_) => EnvError::MalformedDeclaration {
                        declaration: slice.trim().to_string(),
                        reason: "invalid rule",
                    },
                });
            }
        }
    }
    Ok(declarations)
}

/// Parse `name: value; ...` text.
pub(crate) fn parse_declaration_list(css: &str) -> Result<Vec<Declaration>> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_declarations(&mut parser)
}

fn parse_declarations(input: &mut Parser<'_, '_>) -> Result<Vec<Declaration>> {
    let mut collector = DeclarationCollector;
    let mut declarations = Vec::new();
    for item in RuleBodyParser::new(input, &mut collector) {
        match item {
            Ok(declaration) => declarations.push(declaration),
            Err((error, slice)) => {
                let reason = match error.kind {
                    ParseErrorKind::Custom(reason) => reason,
                    ParseErrorKind::Basic(_) => "expected 'name: value'",
                };
                return Err(EnvError::MalformedDeclaration {
                    declaration: slice.trim().to_string(),
                    reason,
                });
            }
        }
    }
    Ok(declarations)
}

fn has_rule_blocks(css: &str) -> bool {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    loop {
        match parser.next() {
            Ok(Token::CurlyBracketBlock) => return true,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

fn is_root_selector(selector: &str) -> bool {
    matches!(selector, ":root" | "html")
}

// =============================================================================
// PARSERS
// =============================================================================

/// Keeps raw declaration values.
struct DeclarationCollector;

impl<'i> DeclarationParser<'i> for DeclarationCollector {
    type Declaration = Declaration;
    type Error = &'static str;

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Declaration, ParseError<'i, &'static str>> {
        let mut span = None;
        loop {
            let before = input.position();
            let is_content = match input.next_including_whitespace_and_comments() {
                Ok(token) => !matches!(token, Token::WhiteSpace(_) | Token::Comment(_)),
                Err(_) => break,
            };
            if is_content {
                let start = span.map_or(before, |(start, _)| start);
                span = Some((start, input.position()));
            }
        }
        let value = span.map_or("", |(start, end)| input.slice(start..end));
        Ok((name.to_string(), value.to_string()))
    }
}

impl<'i> AtRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = &'static str;
}

impl<'i> QualifiedRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = &'static str;
}

impl<'i> RuleBodyItemParser<'i, Declaration, &'static str> for DeclarationCollector {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Collects declarations from `:root`/`html` rules and skips everything else.
struct RootRules;

impl<'i> QualifiedRuleParser<'i> for RootRules {
    /// Whether the selector list names the root element.
    type Prelude = bool;
    type QualifiedRule = Vec<Declaration>;
    type Error = EnvError;

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<bool, ParseError<'i, EnvError>> {
        let mut is_root = false;
        let mut selector = String::new();
        loop {
            match input.next() {
                Ok(Token::Comma) => {
                    is_root |= is_root_selector(&selector);
                    selector.clear();
                }
                Ok(token) => selector.push_str(&token.to_css_string()),
                Err(_) => break,
            }
        }
        Ok(is_root || is_root_selector(&selector))
    }

    fn parse_block<'t>(
        &mut self,
        is_root: bool,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Vec<Declaration>, ParseError<'i, EnvError>> {
        if !is_root {
            while input.next().is_ok() {}
            return Ok(Vec::new());
        }
        match parse_declarations(input) {
            Ok(declarations) => Ok(declarations),
            Err(error) => Err(input.new_custom_error(error)),
        }
    }
}

impl<'i> AtRuleParser<'i> for RootRules {
    type Prelude = ();
    type AtRule = Vec<Declaration>;
    type Error = EnvError;

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<(), ParseError<'i, EnvError>> {
        while input.next().is_ok() {}
        Ok(())
    }

    fn rule_without_block(
        &mut self,
        _prelude: (),
        _start: &ParserState,
    ) -> std::result::Result<Vec<Declaration>, ()> {
        Ok(Vec::new())
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: (),
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Vec<Declaration>, ParseError<'i, EnvError>> {
        while input.next().is_ok() {}
        Ok(Vec::new())
    }
}

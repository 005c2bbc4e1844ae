//! Recursive-descent parser for selectors carrying custom pseudo-classes.
//!
//! ```text
//! list   := expr ("," expr)*
//! expr   := [">"] base clause* [tail]
//! clause := ":contains(" text ")" | ":text(" text ")"
//!         | ":has(" list ")"      | ":nth-match(" digits ")"
//!         | native-fragment
//! tail   := expr                    (after whitespace or ">")
//! ```
//!
//! The base is any native selector text up to the first top-level custom
//! pseudo-class. A leading `>` is only accepted inside `:has()` and in tails.

use super::ast::{Combinator, Pseudo, PseudoClause, SelectorExpr, SelectorList};
use super::scan;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unclosed parenthesis in {pseudo}")]
    Unclosed { pseudo: Pseudo },

    #[error("Empty argument in {pseudo}")]
    EmptyArgument { pseudo: Pseudo },

    #[error("Malformed argument '{argument}' in {pseudo}")]
    Malformed { pseudo: Pseudo, argument: String },

    #[error("Invalid :nth-match() index '{0}': must be a positive integer")]
    InvalidIndex(String),

    #[error("Unexpected combinator '{0}'")]
    UnexpectedCombinator(char),

    #[error("Empty selector")]
    EmptySelector,
}

impl ParseError {
    /// Diagnostic marker reported in `ResolutionResult::effective_selector`.
    pub fn marker(&self) -> String {
        match self {
            ParseError::Unclosed { pseudo }
            | ParseError::EmptyArgument { pseudo }
            | ParseError::Malformed { pseudo, .. } => {
                format!("INVALID_{}_SYNTAX", pseudo.marker_stem())
            }
            ParseError::InvalidIndex(_) => "INVALID_NTH_MATCH_INDEX".to_string(),
            ParseError::UnexpectedCombinator(_) | ParseError::EmptySelector => {
                "UNSUPPORTED".to_string()
            }
        }
    }
}

/// Parse a complete selector.
pub fn parse(selector: &str) -> Result<SelectorList, ParseError> {
    parse_list(selector, false)
}

/// Parse a selector relative to an implicit scope, as found inside `:has()`.
pub fn parse_relative(selector: &str) -> Result<SelectorList, ParseError> {
    parse_list(selector, true)
}

fn parse_list(selector: &str, relative: bool) -> Result<SelectorList, ParseError> {
    if selector.trim().is_empty() {
        return Err(ParseError::EmptySelector);
    }

    scan::split_top_level(selector, ',')
        .into_iter()
        .map(|branch| {
            let branch = branch.trim();
            if branch.is_empty() {
                return Err(ParseError::EmptySelector);
            }
            parse_expr(branch, 0, relative)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(SelectorList)
}

fn skip_whitespace(s: &str, mut pos: usize) -> usize {
    while let Some(c) = s[pos..].chars().next() {
        if !c.is_whitespace() {
            break;
        }
        pos += c.len_utf8();
    }
    pos
}

fn parse_expr(branch: &str, start: usize, allow_leading: bool) -> Result<SelectorExpr, ParseError> {
    let mut pos = skip_whitespace(branch, start);
    let mut leading = Combinator::Descendant;

    match branch[pos..].chars().next() {
        Some('>') if allow_leading => {
            leading = Combinator::Child;
            pos = skip_whitespace(branch, pos + 1);
        }
        Some(c @ ('>' | '+' | '~')) => return Err(ParseError::UnexpectedCombinator(c)),
        _ => {}
    }

    let Some((offset, _)) = scan::find_custom_pseudo(&branch[pos..]) else {
        let base = branch[pos..].trim_end();
        if base.is_empty() {
            return Err(ParseError::EmptySelector);
        }
        return Ok(SelectorExpr {
            leading,
            base: base.to_string(),
            clauses: Vec::new(),
            tail: None,
        });
    };

    let base = branch[pos..pos + offset].to_string();
    let mut clauses = Vec::new();
    let mut cursor = pos + offset;

    loop {
        if let Some(pseudo) = Pseudo::starting(&branch[cursor..]) {
            let open = cursor + pseudo.token().len();
            let close =
                scan::find_closing_paren(branch, open).ok_or(ParseError::Unclosed { pseudo })?;
            clauses.push(parse_clause(pseudo, &branch[open..close], &branch[..cursor])?);
            cursor = close + 1;
            continue;
        }

        match branch[cursor..].chars().next() {
            None => break,
            Some(c) if c.is_whitespace() || matches!(c, '>' | '+' | '~') => break,
            Some(_) => {
                let end = scan::fragment_end(branch, cursor);
                clauses.push(PseudoClause::Native(branch[cursor..end].to_string()));
                cursor = end;
            }
        }
    }

    let tail = if branch[cursor..].trim().is_empty() {
        None
    } else {
        Some(Box::new(parse_expr(branch, cursor, true)?))
    };

    Ok(SelectorExpr {
        leading,
        base,
        clauses,
        tail,
    })
}

fn parse_clause(pseudo: Pseudo, argument: &str, prefix: &str) -> Result<PseudoClause, ParseError> {
    match pseudo {
        Pseudo::Contains => parse_text_argument(pseudo, argument).map(PseudoClause::Contains),
        Pseudo::Text => parse_text_argument(pseudo, argument).map(PseudoClause::Text),
        Pseudo::Has => {
            if argument.trim().is_empty() {
                return Err(ParseError::EmptyArgument { pseudo });
            }
            parse_relative(argument).map(PseudoClause::Has)
        }
        Pseudo::NthMatch => {
            let raw = parse_text_argument(pseudo, argument)?;
            if !raw.chars().all(|c| c.is_ascii_digit()) {
                return Err(ParseError::Malformed {
                    pseudo,
                    argument: raw,
                });
            }
            match raw.parse::<usize>() {
                Ok(index) if index >= 1 => Ok(PseudoClause::NthMatch {
                    index,
                    prefix: prefix.trim().to_string(),
                }),
                _ => Err(ParseError::InvalidIndex(raw)),
            }
        }
    }
}

/// Accepts `text`, `"text"` or `'text'`; backslash escapes are honoured inside quotes.
fn parse_text_argument(pseudo: Pseudo, argument: &str) -> Result<String, ParseError> {
    let trimmed = argument.trim();
    let Some(quote) = trimmed.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
        if trimmed.is_empty() {
            return Err(ParseError::EmptyArgument { pseudo });
        }
        return Ok(trimmed.to_string());
    };

    let inner = trimmed
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
        .filter(|inner| !ends_with_escape(inner))
        .ok_or_else(|| ParseError::Malformed {
            pseudo,
            argument: trimmed.to_string(),
        })?;

    let text = unescape(inner);
    if text.trim().is_empty() {
        return Err(ParseError::EmptyArgument { pseudo });
    }
    Ok(text)
}

fn ends_with_escape(s: &str) -> bool {
    s.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Undo CSS string escapes: `\"` becomes `"`, and `\a ` (up to six hex
/// digits plus one optional space) becomes the code point it names.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut hex = String::new();
        while hex.len() < 6 {
            match chars.peek() {
                Some(d) if d.is_ascii_hexdigit() => {
                    hex.push(*d);
                    chars.next();
                }
                _ => break,
            }
        }
        if hex.is_empty() {
            if let Some(next) = chars.next() {
                out.push(next);
            }
            continue;
        }
        chars.next_if(|c| c.is_whitespace());
        let decoded = u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .filter(|c| *c != '\0')
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        out.push(decoded);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(selector: &str) -> SelectorExpr {
        let mut list = parse(selector).unwrap();
        assert_eq!(list.0.len(), 1);
        list.0.remove(0)
    }

    #[test]
    fn test_plain_selector_has_no_clauses() {
        let expr = single("div.card > span");
        assert_eq!(expr.base, "div.card > span");
        assert!(expr.clauses.is_empty());
        assert!(expr.tail.is_none());
    }

    #[test]
    fn test_contains_argument_forms() {
        for input in [
            r#"button:contains("Save")"#,
            "button:contains('Save')",
            "button:contains(Save)",
            "button:contains(  Save  )",
        ] {
            let expr = single(input);
            assert_eq!(expr.base, "button");
            assert_eq!(expr.clauses, vec![PseudoClause::Contains("Save".into())], "{input}");
        }
    }

    #[test]
    fn test_quoted_argument_keeps_parens_and_escapes() {
        let expr = single(r#"p:contains("a (b) \"c\"")"#);
        assert_eq!(expr.clauses, vec![PseudoClause::Contains(r#"a (b) "c""#.into())]);
    }

    #[test]
    fn test_hex_escapes_decode() {
        let expr = single(r#"span:contains("two\a lines\26 more")"#);
        assert_eq!(expr.clauses, vec![PseudoClause::Contains("two\nlines&more".into())]);
        assert_eq!(unescape(r"\0"), "\u{fffd}");
    }

    #[test]
    fn test_nested_has_with_contains() {
        let expr = single(r#"div[data-cy="wb-list-item"]:has(p:contains("checkoutservice"))"#);
        assert_eq!(expr.base, r#"div[data-cy="wb-list-item"]"#);
        let [PseudoClause::Has(inner)] = expr.clauses.as_slice() else {
            panic!("expected one :has clause, got {:?}", expr.clauses);
        };
        assert_eq!(inner.0[0].base, "p");
        assert_eq!(
            inner.0[0].clauses,
            vec![PseudoClause::Contains("checkoutservice".into())]
        );
    }

    #[test]
    fn test_chained_clauses_and_tail() {
        let expr = single(
            r#"div[data-x]:has(p:contains("adaptive-logs-api")):nth-match(1) button:nth-of-type(4)"#,
        );
        assert_eq!(expr.clauses.len(), 2);
        assert!(matches!(
            &expr.clauses[1],
            PseudoClause::NthMatch { index: 1, prefix } if prefix.starts_with("div[data-x]:has(")
        ));
        let tail = expr.tail.unwrap();
        assert_eq!(tail.leading, Combinator::Descendant);
        assert_eq!(tail.base, "button:nth-of-type(4)");
    }

    #[test]
    fn test_child_tail_and_attached_native_fragment() {
        let expr = single("li:contains(x).active > a");
        assert_eq!(
            expr.clauses,
            vec![
                PseudoClause::Contains("x".into()),
                PseudoClause::Native(".active".into())
            ]
        );
        let tail = expr.tail.unwrap();
        assert_eq!(tail.leading, Combinator::Child);
        assert_eq!(tail.base, "a");
    }

    #[test]
    fn test_relative_has_argument() {
        let expr = single("ul:has(> li.selected)");
        let [PseudoClause::Has(inner)] = expr.clauses.as_slice() else {
            panic!("expected :has clause");
        };
        assert_eq!(inner.0[0].leading, Combinator::Child);
        assert_eq!(inner.0[0].base, "li.selected");
    }

    #[test]
    fn test_union_of_branches() {
        let list = parse(r#"a:contains(x), [data-testid="y"]"#).unwrap();
        assert_eq!(list.0.len(), 2);
        assert!(list.has_custom_clauses());
        assert!(!list.only_has_clauses());
    }

    #[test]
    fn test_only_has_clauses() {
        assert!(parse("div:has(span)").unwrap().only_has_clauses());
        assert!(!parse("div:has(span:contains(x))").unwrap().only_has_clauses());
        assert!(!parse("div.plain").unwrap().only_has_clauses());
    }

    #[test]
    fn test_markers() {
        let cases = [
            ("div:has(p:contains(x)", "INVALID_HAS_SYNTAX"),
            ("div:has()", "INVALID_HAS_SYNTAX"),
            ("p:contains(", "INVALID_CONTAINS_SYNTAX"),
            (r#"p:contains("open)"#, "INVALID_CONTAINS_SYNTAX"),
            ("p:contains()", "INVALID_CONTAINS_SYNTAX"),
            ("p:text('')", "INVALID_TEXT_SYNTAX"),
            ("li:nth-match(abc)", "INVALID_NTH_MATCH_SYNTAX"),
            ("li:nth-match(-1)", "INVALID_NTH_MATCH_SYNTAX"),
            ("li:nth-match(0)", "INVALID_NTH_MATCH_INDEX"),
            ("> li:contains(x)", "UNSUPPORTED"),
            ("li:contains(x) + li", "UNSUPPORTED"),
            ("a:contains(x),", "UNSUPPORTED"),
        ];
        for (input, marker) in cases {
            let err = parse(input).unwrap_err();
            assert_eq!(err.marker(), marker, "{input}: {err}");
        }
    }

    #[test]
    fn test_base_selector_normalization() {
        assert_eq!(single(":contains(x)").base_selector(), "*");
        assert_eq!(single("div :contains(x)").base_selector(), "div *");
        assert_eq!(single("div > :contains(x)").base_selector(), "div > *");
    }
}

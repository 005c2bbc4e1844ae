//! Quote and nesting aware scanning over raw selector text.
//!
//! Every helper here treats text inside quotes, `[...]` and `(...)` as opaque,
//! so `[aria-label="a > b"]` or `:has(p:contains(")"))` never split early.

use super::ast::Pseudo;

#[derive(Debug, Default)]
struct Nesting {
    quote: Option<char>,
    escaped: bool,
    brackets: usize,
    parens: usize,
}

impl Nesting {
    fn at_top(&self) -> bool {
        self.quote.is_none() && !self.escaped && self.brackets == 0 && self.parens == 0
    }

    fn step(&mut self, c: char) {
        if self.escaped {
            self.escaped = false;
            return;
        }
        if c == '\\' {
            self.escaped = true;
            return;
        }
        if let Some(q) = self.quote {
            if c == q {
                self.quote = None;
            }
            return;
        }
        match c {
            '"' | '\'' => self.quote = Some(c),
            '[' => self.brackets += 1,
            ']' => self.brackets = self.brackets.saturating_sub(1),
            '(' => self.parens += 1,
            ')' => self.parens = self.parens.saturating_sub(1),
            _ => {}
        }
    }
}

/// Index of the `)` closing a group whose content starts at `open`.
pub fn find_closing_paren(s: &str, open: usize) -> Option<usize> {
    let mut nesting = Nesting::default();
    for (i, c) in s[open..].char_indices() {
        if c == ')' && nesting.at_top() {
            return Some(open + i);
        }
        nesting.step(c);
    }
    None
}

/// Split on `sep` wherever it appears outside quotes and groups.
pub fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut nesting = Nesting::default();
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if c == sep && nesting.at_top() {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }
        nesting.step(c);
    }
    parts.push(&s[start..]);
    parts
}

/// First top-level custom pseudo-class in `s`, with its byte offset.
pub fn find_custom_pseudo(s: &str) -> Option<(usize, Pseudo)> {
    let mut nesting = Nesting::default();
    for (i, c) in s.char_indices() {
        if c == ':' && nesting.at_top() {
            if let Some(pseudo) = Pseudo::starting(&s[i..]) {
                return Some((i, pseudo));
            }
        }
        nesting.step(c);
    }
    None
}

/// End of a native compound fragment starting at `from`.
///
/// Stops at whitespace, a combinator, a comma or the next custom pseudo-class.
pub fn fragment_end(s: &str, from: usize) -> usize {
    let mut nesting = Nesting::default();
    for (i, c) in s[from..].char_indices() {
        if nesting.at_top() {
            if c.is_whitespace() || matches!(c, '>' | '+' | '~' | ',') {
                return from + i;
            }
            if i > 0 && c == ':' && Pseudo::starting(&s[from + i..]).is_some() {
                return from + i;
            }
        }
        nesting.step(c);
    }
    s.len()
}

pub fn has_top_level(s: &str, target: char) -> bool {
    let mut nesting = Nesting::default();
    for c in s.chars() {
        if c == target && nesting.at_top() {
            return true;
        }
        nesting.step(c);
    }
    false
}

/// True when `s` has no top-level combinator, e.g. `li.active[title="a b"]`.
pub fn is_compound(s: &str) -> bool {
    let s = s.trim();
    let mut nesting = Nesting::default();
    for c in s.chars() {
        if nesting.at_top() && (c.is_whitespace() || matches!(c, '>' | '+' | '~')) {
            return false;
        }
        nesting.step(c);
    }
    true
}

/// Rewrite every top-level `>` (with surrounding whitespace) into a single space.
pub fn relax_child_combinators(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut nesting = Nesting::default();
    let mut skipping = false;
    for c in s.chars() {
        if skipping && c.is_whitespace() {
            continue;
        }
        skipping = false;
        if c == '>' && nesting.at_top() {
            while out.ends_with(char::is_whitespace) {
                out.pop();
            }
            out.push(' ');
            skipping = true;
            continue;
        }
        nesting.step(c);
        out.push(c);
    }
    out
}

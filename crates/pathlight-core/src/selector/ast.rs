use std::fmt;

/// Pseudo-classes evaluated by the resolver rather than the native engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pseudo {
    Contains,
    Has,
    Text,
    NthMatch,
}

impl Pseudo {
    pub const ALL: [Pseudo; 4] = [Pseudo::Contains, Pseudo::Has, Pseudo::Text, Pseudo::NthMatch];

    /// Opening token including the leading colon and parenthesis.
    pub fn token(&self) -> &'static str {
        match self {
            Pseudo::Contains => ":contains(",
            Pseudo::Has => ":has(",
            Pseudo::Text => ":text(",
            Pseudo::NthMatch => ":nth-match(",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pseudo::Contains => "contains",
            Pseudo::Has => "has",
            Pseudo::Text => "text",
            Pseudo::NthMatch => "nth-match",
        }
    }

    /// Upper-case stem used in diagnostic markers (`INVALID_<STEM>_SYNTAX`).
    pub fn marker_stem(&self) -> &'static str {
        match self {
            Pseudo::Contains => "CONTAINS",
            Pseudo::Has => "HAS",
            Pseudo::Text => "TEXT",
            Pseudo::NthMatch => "NTH_MATCH",
        }
    }

    /// The pseudo-class whose token `s` starts with.
    pub fn starting(s: &str) -> Option<Pseudo> {
        Self::ALL.into_iter().find(|p| s.starts_with(p.token()))
    }
}

impl fmt::Display for Pseudo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}()", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClause {
    /// Full text content includes the argument.
    Contains(String),
    /// Direct text-node children include the argument.
    Text(String),
    Has(SelectorList),
    /// 1-indexed position in the current match set. `prefix` is the selector
    /// text preceding the clause, kept for diagnostics.
    NthMatch { index: usize, prefix: String },
    /// Native fragment attached after a custom clause, e.g. `.active`.
    Native(String),
}

impl PseudoClause {
    pub fn pseudo(&self) -> Option<Pseudo> {
        match self {
            PseudoClause::Contains(_) => Some(Pseudo::Contains),
            PseudoClause::Text(_) => Some(Pseudo::Text),
            PseudoClause::Has(_) => Some(Pseudo::Has),
            PseudoClause::NthMatch { .. } => Some(Pseudo::NthMatch),
            PseudoClause::Native(_) => None,
        }
    }
}

/// One compound-ish step: a native base, filters applied to its matches, and
/// an optional selector evaluated inside each survivor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorExpr {
    pub leading: Combinator,
    pub base: String,
    pub clauses: Vec<PseudoClause>,
    pub tail: Option<Box<SelectorExpr>>,
}

impl SelectorExpr {
    /// Base text ready for native evaluation. A missing subject becomes `*`.
    pub fn base_selector(&self) -> String {
        let trimmed = self.base.trim_end();
        let dangling = trimmed.is_empty()
            || trimmed.ends_with(['>', '+', '~'])
            || trimmed.len() != self.base.len();
        if dangling {
            format!("{trimmed} *").trim_start().to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Every custom pseudo-class used anywhere in this expression, in source order.
    pub fn pseudos(&self) -> Vec<Pseudo> {
        let mut out = Vec::new();
        self.collect_pseudos(&mut out);
        out
    }

    fn collect_pseudos(&self, out: &mut Vec<Pseudo>) {
        for clause in &self.clauses {
            if let Some(p) = clause.pseudo() {
                out.push(p);
            }
            if let PseudoClause::Has(inner) = clause {
                for expr in &inner.0 {
                    expr.collect_pseudos(out);
                }
            }
        }
        if let Some(tail) = &self.tail {
            tail.collect_pseudos(out);
        }
    }
}

/// Comma-separated alternatives; matches are the union in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(pub Vec<SelectorExpr>);

impl SelectorList {
    pub fn pseudos(&self) -> Vec<Pseudo> {
        self.0.iter().flat_map(SelectorExpr::pseudos).collect()
    }

    pub fn has_custom_clauses(&self) -> bool {
        !self.pseudos().is_empty()
    }

    /// True when `:has()` is the only custom pseudo-class present, at any depth.
    pub fn only_has_clauses(&self) -> bool {
        let pseudos = self.pseudos();
        !pseudos.is_empty() && pseudos.iter().all(|p| *p == Pseudo::Has)
    }
}

impl fmt::Display for SelectorExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.leading == Combinator::Child {
            f.write_str("> ")?;
        }
        f.write_str(&self.base_selector())?;
        for clause in &self.clauses {
            match clause {
                PseudoClause::Contains(text) => write!(f, " (text contains \"{text}\")")?,
                PseudoClause::Text(text) => write!(f, " (direct text contains \"{text}\")")?,
                PseudoClause::Has(inner) => write!(f, " (has descendant: {inner})")?,
                PseudoClause::NthMatch { index, .. } => write!(f, " (match #{index})")?,
                PseudoClause::Native(fragment) => write!(f, " ({fragment})")?,
            }
        }
        if let Some(tail) = &self.tail {
            write!(f, " {tail}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, expr) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{expr}")?;
        }
        Ok(())
    }
}

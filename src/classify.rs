//! Heuristic detection of the syntax a piece of math is written in.
//!
//! ```
//! use typtex::classify::{classify, MathType};
//!
//! assert_eq!(classify(r"\frac{1}{2}"), MathType::Latex);
//! assert_eq!(classify("sum_(i=1)^n i"), MathType::Typst);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// The syntax of a math expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathType {
    /// LaTeX math, as typeset by KaTeX.
    Latex,
    /// Typst math.
    Typst,
}

impl MathType {
    /// The lowercase name, as used in tags and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            MathType::Latex => "latex",
            MathType::Typst => "typst",
        }
    }
}

impl fmt::Display for MathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MathType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latex" => Ok(MathType::Latex),
            "typst" => Ok(MathType::Typst),
            _ => Err(format!("unknown math type: {}", s)),
        }
    }
}

/// The rule that decided a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// A backslash directly followed by a non-whitespace character.
    Command,
    /// A `\begin{name}` environment opener.
    Environment,
    /// A backslash followed by a well-known LaTeX symbol name.
    Symbol,
    /// Nothing LaTeX-like was found.
    Default,
}

/// Names that, after a backslash, identify LaTeX. Append to extend.
static LATEX_SYMBOLS: phf::Set<&'static str> = phf::phf_set! {
    "frac", "sum", "int", "prod", "sqrt",
    "alpha", "beta", "gamma", "delta", "theta", "lambda", "mu",
    "pi", "sigma", "phi", "psi", "omega",
};

static COMMAND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\\S").unwrap());

static ENVIRONMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\begin\{[^}]+\}").unwrap());

fn has_command(text: &str) -> bool {
    COMMAND.is_match(text)
}

fn opens_environment(text: &str) -> bool {
    ENVIRONMENT.is_match(text)
}

fn mentions_symbol(text: &str) -> bool {
    text.split('\\')
        .skip(1)
        .any(|after| LATEX_SYMBOLS.iter().any(|symbol| after.starts_with(symbol)))
}

/// Ordered rules; the first predicate that holds decides.
const RULES: [(Rule, fn(&str) -> bool); 3] = [
    (Rule::Command, has_command),
    (Rule::Environment, opens_environment),
    (Rule::Symbol, mentions_symbol),
];

/// Decide whether `text` is LaTeX or Typst math.
///
/// Total and pure: any input, including the empty string, gets an answer.
/// LaTeX written without backslashes reads as Typst.
pub fn classify(text: &str) -> MathType {
    classify_with_rule(text).0
}

/// Like [`classify`], also reporting which rule fired.
pub fn classify_with_rule(text: &str) -> (MathType, Rule) {
    let decided = RULES
        .iter()
        .find(|(_, holds)| holds(text))
        .map_or((MathType::Typst, Rule::Default), |(rule, _)| {
            (MathType::Latex, *rule)
        });
    tracing::trace!(math_type = %decided.0, rule = ?decided.1, "classified math");
    decided
}

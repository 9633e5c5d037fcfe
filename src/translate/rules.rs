//! Ordered rewrite rules that turn an informal phrase into arithmetic text.
//!
//! Rules are applied top to bottom and each one sees the output of the
//! previous one, so longer phrases sit above the words they contain.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::error::CalcError;
use crate::format::number_to_string;

/// Marker left by "squared": square whatever precedes it.
pub const SQUARED: &str = "^2";
/// Marker left by "cubed": cube whatever precedes it.
pub const CUBED: &str = "^3";
/// Opens a square root argument.
pub const SQRT_OPEN: &str = "sqrt(";
/// Opens a power whose default exponent is 2.
pub const SQUARE_OPEN: &str = "sq(";
/// Opens a power whose default exponent is 3.
pub const CUBE_OPEN: &str = "cube(";

/// A single `(matcher, rewrite)` step of the pipeline.
pub struct Rule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Rule {
            name,
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    /// Rewrites every match in `text`.
    pub fn apply(&self, text: &str) -> String {
        let rewritten = self.pattern.replace_all(text, self.replacement);
        if rewritten != text {
            trace!(rule = self.name, %rewritten, "rule matched");
        }
        rewritten.into_owned()
    }
}

lazy_static! {
    /// Phrase and operator-word substitutions, highest priority first.
    pub static ref PHRASE_RULES: Vec<Rule> = vec![
        Rule::new("half of", r"half of", "0.5 *"),
        Rule::new("double of", r"double of", "2 *"),
        Rule::new("square of", r"square of", SQUARE_OPEN),
        Rule::new("squared", r"squared", SQUARED),
        Rule::new("cube of", r"cube of", CUBE_OPEN),
        Rule::new("cubed", r"cubed", CUBED),
        Rule::new("square root of", r"square root of", SQRT_OPEN),
        Rule::new("plus", r"plus", "+"),
        Rule::new("minus", r"minus", "-"),
        Rule::new("times", r"times", "*"),
        Rule::new("multiplied by", r"multiplied by", "*"),
        Rule::new("divided by", r"divided by", "/"),
        Rule::new("percent of", r"percent of", "* 0.01 *"),
        Rule::new("percent", r"percent", "* 0.01"),
    ];

    /// Leftover connective words, applied after tax extraction.
    pub static ref CONNECTIVE_RULES: Vec<Rule> = vec![
        Rule::new("of", r"\bof\b", "*"),
        Rule::new("to", r"\bto\b", "+"),
    ];

    /// `<base> plus tax at <rate>%`; "plus" may already have become `+`.
    static ref TAX_PHRASE: Regex = Regex::new(
        r"^(.*?)\s*(?:plus|\+)\s*tax\s+at\s+([0-9]+(?:\.[0-9]+)?)\s*%"
    ).unwrap();

    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref SPLIT_NUMBER: Regex = Regex::new(r"([0-9])\s+([0-9])").unwrap();
    static ref SPACE_AFTER_OPERATOR: Regex = Regex::new(r"([+\-*/^])\s+").unwrap();
    static ref SPACE_BEFORE_OPERATOR: Regex = Regex::new(r"\s+([+\-*/^])").unwrap();
}

/// Rewrites a tax phrase into `(<base>) * (1 + <rate / 100>)`.
///
/// Anything after the `%` is dropped. Text without a tax phrase is returned
/// unchanged. The rate must be written with ASCII digits.
pub fn extract_tax(text: &str) -> Result<String, CalcError> {
    let Some(captures) = TAX_PHRASE.captures(text) else {
        return Ok(text.to_string());
    };

    let base = captures[1].trim();
    let rate = captures[2].parse::<f64>().map_err(|_| {
        CalcError::TranslationFailure(format!("invalid tax rate '{}'", &captures[2]))
    })? / 100.0;
    let rewritten = format!("({}) * (1 + {})", base, number_to_string(rate));
    trace!(%rewritten, "tax phrase extracted");
    Ok(rewritten)
}

/// Collapses whitespace, glues digits separated only by whitespace into one
/// number, and removes whitespace around operator symbols.
///
/// The digit gluing is deliberate: "1 000 plus 5" reads as `1000+5`.
pub fn normalize_whitespace(text: &str) -> String {
    let mut normalized = WHITESPACE_RUN.replace_all(text, " ").into_owned();
    while SPLIT_NUMBER.is_match(&normalized) {
        normalized = SPLIT_NUMBER.replace_all(&normalized, "${1}${2}").into_owned();
    }
    let normalized = SPACE_AFTER_OPERATOR.replace_all(&normalized, "${1}");
    let normalized = SPACE_BEFORE_OPERATOR.replace_all(&normalized, "${1}");
    normalized.trim().to_string()
}

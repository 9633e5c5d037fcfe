//! Natural-language mode.
//!
//! Turns phrases like "half of 24 plus tax at 8%" into a number by rewriting
//! them through an ordered list of rules and evaluating what is left.

mod eval;
pub mod rules;

use tracing::debug;

use crate::error::CalcError;
use crate::format::format_result;

use eval::evaluate_rewritten;

/// Runs the full rewrite pipeline without evaluating.
///
/// Persian and Arabic-Indic digits are folded to ASCII first, the same way
/// the keypad reads them.
pub fn rewrite(phrase: &str) -> Result<String, CalcError> {
    let lowered: String = phrase
        .to_lowercase()
        .chars()
        .map(crate::unicode_to_ascii)
        .collect();
    let expression = rules::PHRASE_RULES
        .iter()
        .fold(lowered, |text, rule| rule.apply(&text));
    let expression = rules::extract_tax(&expression)?;
    let expression = rules::CONNECTIVE_RULES
        .iter()
        .fold(expression, |text, rule| rule.apply(&text));
    Ok(rules::normalize_whitespace(&expression))
}

/// Translates a phrase into a display-formatted result.
pub fn translate(phrase: &str) -> Result<String, CalcError> {
    if phrase.trim().is_empty() {
        return Err(CalcError::EmptyPhrase);
    }

    let expression = rewrite(phrase)?;
    debug!(phrase, %expression, "phrase rewritten");

    let value = evaluate_rewritten(&expression)?;
    if value.is_nan() {
        return Err(CalcError::TranslationFailure(format!(
            "'{}' does not reduce to a number",
            expression
        )));
    }
    Ok(format_result(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_tax_phrase() {
        assert_eq!(
            rewrite("Half of 24 plus tax at 8%").unwrap(),
            "(0.5*24)*(1+0.08)"
        );
    }

    #[test]
    fn test_native_digits_in_phrases() {
        assert_eq!(translate("100 plus tax at ٥%").unwrap(), "105");
        assert_eq!(translate("۱۲ times ۲").unwrap(), "24");
        assert_eq!(translate("half of ٢٤ plus tax at 8%").unwrap(), "12.96");
    }

    #[test]
    fn test_long_sign_chain_phrase() {
        let even = format!("{}5", "minus ".repeat(20_000));
        assert_eq!(translate(&even).unwrap(), "5");
        let odd = format!("{}5", "minus ".repeat(20_001));
        assert_eq!(translate(&odd).unwrap(), "-5");
    }

    #[test]
    fn test_translate_examples() {
        assert_eq!(translate("half of 24 plus tax at 8%").unwrap(), "12.96");
        assert_eq!(translate("square root of 16").unwrap(), "4");
        assert_eq!(translate("5 squared").unwrap(), "25");
        assert_eq!(translate("2 cubed").unwrap(), "8");
        assert_eq!(translate("square of 9").unwrap(), "81");
        assert_eq!(translate("cube of 4").unwrap(), "64");
        assert_eq!(translate("double of 21").unwrap(), "42");
        assert_eq!(translate("20 percent of 50").unwrap(), "10");
        assert_eq!(translate("10 divided by 4").unwrap(), "2.5");
        assert_eq!(translate("7 times 6 minus 2").unwrap(), "40");
        assert_eq!(translate("1 000 plus 5").unwrap(), "1005");
        assert_eq!(translate("1 divided by 3").unwrap(), "0.3333333333");
    }

    #[test]
    fn test_negative_radicand() {
        assert_eq!(
            translate("square root of -4"),
            Err(CalcError::NegativeRadicand)
        );
    }

    #[test]
    fn test_failures() {
        assert_eq!(translate("   "), Err(CalcError::EmptyPhrase));
        assert!(matches!(
            translate("what is the meaning of life"),
            Err(CalcError::TranslationFailure(_))
        ));
    }

    #[test]
    fn test_division_by_zero_formats_as_infinity() {
        assert_eq!(translate("5 divided by 0").unwrap(), "Infinity");
    }
}

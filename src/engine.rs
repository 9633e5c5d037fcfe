//! The running calculator state and the transitions applied to it.
//!
//! Every user action is one call to [`dispatch`]. Nothing here renders; the
//! caller keeps the state and redraws from [`EngineState::display`].

use tracing::{debug, info, warn};

use super::format::{format_result, number_to_string, parse_display};
use super::unary::UnaryKey;
use super::{CalcError, binary, special};

/// Operator keys, including `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equals,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Remainder => "%",
            Operator::Equals => "=",
        }
    }

    /// True for everything except `=`.
    pub fn is_binary(self) -> bool {
        self != Operator::Equals
    }
}

/// One user action on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Digit(char),
    Decimal,
    Operator(Operator),
    ClearEntry,
    ClearAll,
    Backspace,
    ToggleSign,
    Square,
    SquareRoot,
    MemorySave,
    MemoryRecall,
    MemoryClear,
}

/// A finished computation, as reported to history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    pub expression: String,
    pub result: String,
}

/// What a successful dispatch produced besides the new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action was a no-op.
    Unchanged,
    Updated,
    /// `=` or a unary key completed a computation.
    Finalized(Calculation),
    /// Informational message for the user, e.g. "Memory cleared".
    Notice(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    /// Text typed since the last operator; empty when no entry has begun.
    pub pending_operand: String,
    /// Formatted result of the last completed operation.
    pub accumulated_result: String,
    /// `None` when no operation is pending.
    pub last_operator: Option<Operator>,
    pub memory: Option<f64>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            pending_operand: String::new(),
            accumulated_result: "0".to_string(),
            last_operator: None,
            memory: None,
        }
    }
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value the calculator is currently showing.
    pub fn display(&self) -> &str {
        if self.pending_operand.is_empty() {
            &self.accumulated_result
        } else {
            &self.pending_operand
        }
    }

    pub(crate) fn active_value(&self) -> f64 {
        parse_display(self.display())
    }

    /// True right after `=` or a unary key.
    pub fn is_finished(&self) -> bool {
        self.last_operator == Some(Operator::Equals)
    }

    /// Back to `0` with nothing pending. Memory is kept.
    pub fn clear_all(&mut self) {
        self.pending_operand.clear();
        self.accumulated_result = "0".to_string();
        self.last_operator = None;
    }

    /// Shows an externally computed result as if `=` had just been pressed.
    pub fn load_result(&mut self, result: &str) {
        self.accumulated_result = result.to_string();
        self.pending_operand.clear();
        self.last_operator = Some(Operator::Equals);
    }
}

/// Applies one action to the state.
///
/// Errors are recovered here: `DivisionByZero` leaves the state all-clear,
/// every other error leaves it untouched.
pub fn dispatch(state: &mut EngineState, action: Action) -> Result<Outcome, CalcError> {
    debug!(?action, display = state.display(), "dispatch");

    match action {
        Action::Digit(digit) => append_digit(state, digit),
        Action::Decimal => Ok(append_decimal(state)),
        Action::Operator(op) => apply_operator(state, op),
        Action::ClearEntry => {
            state.pending_operand.clear();
            Ok(Outcome::Updated)
        }
        Action::ClearAll => {
            state.clear_all();
            Ok(Outcome::Updated)
        }
        Action::Backspace => Ok(match state.pending_operand.pop() {
            Some(_) => Outcome::Updated,
            None => Outcome::Unchanged,
        }),
        Action::ToggleSign => Ok(toggle_sign(state)),
        Action::Square => apply_unary(state, UnaryKey::Square),
        Action::SquareRoot => apply_unary(state, UnaryKey::SquareRoot),
        Action::MemorySave => special::memory_save(state),
        Action::MemoryRecall => special::memory_recall(state),
        Action::MemoryClear => special::memory_clear(state),
    }
}

fn append_digit(state: &mut EngineState, digit: char) -> Result<Outcome, CalcError> {
    if !digit.is_ascii_digit() {
        return Err(CalcError::UnknownKey(digit.to_string()));
    }

    if state.is_finished() && state.accumulated_result != "0" {
        state.accumulated_result = "0".to_string();
        state.last_operator = None;
        state.pending_operand = digit.to_string();
    } else if state.display() == "0" {
        state.pending_operand = digit.to_string();
    } else {
        state.pending_operand.push(digit);
    }
    Ok(Outcome::Updated)
}

fn append_decimal(state: &mut EngineState) -> Outcome {
    if state.is_finished() {
        state.pending_operand = "0.".to_string();
        state.accumulated_result = "0".to_string();
        state.last_operator = None;
        return Outcome::Updated;
    }

    if state.pending_operand.contains('.') {
        return Outcome::Unchanged;
    }
    if state.pending_operand.is_empty() {
        state.pending_operand = "0.".to_string();
    } else {
        state.pending_operand.push('.');
    }
    Outcome::Updated
}

fn apply_operator(state: &mut EngineState, op: Operator) -> Result<Outcome, CalcError> {
    if state.pending_operand.is_empty() && state.accumulated_result == "0" {
        return Ok(Outcome::Unchanged);
    }

    let (value, expression) = match state.last_operator {
        Some(prior) if prior.is_binary() && !state.pending_operand.is_empty() => {
            let lhs = parse_display(&state.accumulated_result);
            let rhs = parse_display(&state.pending_operand);
            let value = match binary::calculate(prior, lhs, rhs) {
                Ok(value) => value,
                Err(err) => {
                    warn!(%err, "calculation failed, clearing");
                    state.clear_all();
                    return Err(err);
                }
            };
            let expression = format!(
                "{} {} {}",
                number_to_string(lhs),
                prior.symbol(),
                number_to_string(rhs)
            );
            (value, expression)
        }
        _ => (state.active_value(), state.display().to_string()),
    };

    let result = format_result(value);
    state.accumulated_result = result.clone();
    state.last_operator = Some(op);
    state.pending_operand.clear();

    if op == Operator::Equals {
        info!(%expression, %result, "calculation finalized");
        Ok(Outcome::Finalized(Calculation { expression, result }))
    } else {
        Ok(Outcome::Updated)
    }
}

fn negate(text: &str) -> String {
    match text.strip_prefix('-') {
        Some(positive) => positive.to_string(),
        None => format!("-{}", text),
    }
}

fn toggle_sign(state: &mut EngineState) -> Outcome {
    if !state.pending_operand.is_empty() {
        state.pending_operand = negate(&state.pending_operand);
    } else if state.accumulated_result != "0"
        && !parse_display(&state.accumulated_result).is_nan()
    {
        state.accumulated_result = negate(&state.accumulated_result);
    } else {
        return Outcome::Unchanged;
    }
    Outcome::Updated
}

fn apply_unary(state: &mut EngineState, key: UnaryKey) -> Result<Outcome, CalcError> {
    let operand = state.active_value();
    let value = key.calculate(operand).inspect_err(|err| {
        warn!(%err, operand, "unary key rejected");
    })?;

    let expression = key.describe(&number_to_string(operand));
    let result = format_result(value);
    state.load_result(&result);

    info!(%expression, %result, "calculation finalized");
    Ok(Outcome::Finalized(Calculation { expression, result }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut EngineState, actions: &[Action]) -> Vec<Result<Outcome, CalcError>> {
        actions.iter().map(|a| dispatch(state, *a)).collect()
    }

    #[test]
    fn test_negate() {
        assert_eq!(negate("12"), "-12");
        assert_eq!(negate("-12"), "12");
    }

    #[test]
    fn test_chained_operators_accumulate() {
        let mut state = EngineState::new();
        // 2 + 3 * 4 = evaluates left to right: (2 + 3) * 4
        let outcomes = press(
            &mut state,
            &[
                Action::Digit('2'),
                Action::Operator(Operator::Add),
                Action::Digit('3'),
                Action::Operator(Operator::Multiply),
                Action::Digit('4'),
                Action::Operator(Operator::Equals),
            ],
        );
        assert_eq!(
            outcomes.last().cloned().unwrap(),
            Ok(Outcome::Finalized(Calculation {
                expression: "5 * 4".to_string(),
                result: "20".to_string(),
            }))
        );
    }

    #[test]
    fn test_operator_without_operand_passes_through() {
        let mut state = EngineState::new();
        press(
            &mut state,
            &[
                Action::Digit('9'),
                Action::Operator(Operator::Add),
                Action::Operator(Operator::Subtract),
            ],
        );
        assert_eq!(state.accumulated_result, "9");
        assert_eq!(state.last_operator, Some(Operator::Subtract));
    }

    #[test]
    fn test_zero_is_replaced_not_extended() {
        let mut state = EngineState::new();
        press(&mut state, &[Action::Digit('0'), Action::Digit('0'), Action::Digit('7')]);
        assert_eq!(state.pending_operand, "7");
    }
}

use super::{BinaryHandler, CalcError, Operator};

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}
pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}
pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}
pub fn divide(a: f64, b: f64) -> f64 {
    a / b
}
/// Truncating remainder: the sign follows the dividend, `x % 0` is NaN.
pub fn remainder(a: f64, b: f64) -> f64 {
    a % b
}

fn handler(op: Operator) -> Option<BinaryHandler> {
    match op {
        Operator::Add => Some(add),
        Operator::Subtract => Some(subtract),
        Operator::Multiply => Some(multiply),
        Operator::Divide => Some(divide),
        Operator::Remainder => Some(remainder),
        Operator::Equals => None,
    }
}

/// Applies a pending operator to the accumulated value (a) and the newly
/// entered operand (b).
pub fn calculate(op: Operator, a: f64, b: f64) -> Result<f64, CalcError> {
    let handler = handler(op).ok_or(CalcError::NotBinary(op.symbol()))?;

    if op == Operator::Divide && b == 0.0 {
        return Err(CalcError::DivisionByZero);
    }

    Ok(handler(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate() {
        assert_eq!(calculate(Operator::Add, 2.0, 3.0), Ok(5.0));
        assert_eq!(calculate(Operator::Remainder, -10.0, 3.0), Ok(-1.0));
        assert_eq!(
            calculate(Operator::Divide, 1.0, 0.0),
            Err(CalcError::DivisionByZero)
        );
    }

    #[test]
    fn test_equals_is_not_arithmetic() {
        assert_eq!(
            calculate(Operator::Equals, 2.0, 3.0),
            Err(CalcError::NotBinary("="))
        );
    }
}

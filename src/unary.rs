use super::CalcError;

pub fn square(n: f64) -> f64 {
    n * n
}

pub fn cube(n: f64) -> f64 {
    n * n * n
}

pub fn power(base: f64, exponent: f64) -> f64 {
    base.powf(exponent)
}

/// Square root that refuses negative input instead of returning NaN.
pub fn square_root(n: f64) -> Result<f64, CalcError> {
    if n < 0.0 {
        return Err(CalcError::NegativeRadicand);
    }
    Ok(n.sqrt())
}

/// The unary keys on the calculator pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryKey {
    Square,
    SquareRoot,
}

impl UnaryKey {
    /// Applies the key to a single operand.
    pub fn calculate(self, operand: f64) -> Result<f64, CalcError> {
        match self {
            UnaryKey::Square => Ok(square(operand)),
            UnaryKey::SquareRoot => square_root(operand),
        }
    }

    /// Expression text recorded in history, e.g. `9²` or `√9`.
    pub fn describe(self, operand: &str) -> String {
        match self {
            UnaryKey::Square => format!("{}²", operand),
            UnaryKey::SquareRoot => format!("√{}", operand),
        }
    }
}

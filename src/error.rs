use thiserror::Error;

/// Everything the engine or the translator can report back to the caller.
///
/// None of these are fatal: each is recovered where it is detected and the
/// engine stays usable afterwards.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Cannot calculate square root of negative number")]
    NegativeRadicand,

    #[error("Could not process that calculation: {0}")]
    TranslationFailure(String),

    #[error("Memory is empty")]
    EmptyMemory,

    #[error("Please enter a calculation in natural language")]
    EmptyPhrase,

    #[error("Unrecognized key '{0}'. Type 'help' for a full list.")]
    UnknownKey(String),

    #[error("'{0}' does not combine two values")]
    NotBinary(&'static str),
}

impl CalcError {
    /// Informational conditions are shown to the user but are not failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, CalcError::EmptyMemory | CalcError::EmptyPhrase)
    }
}

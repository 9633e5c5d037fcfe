//! Memory keys (MS / MR / MC).
//!
//! The slot holds a single number and survives every clear action.

use tracing::debug;

use super::format::number_to_string;
use super::{CalcError, EngineState, Outcome};

/// Stores the active display value into the memory slot.
pub fn memory_save(state: &mut EngineState) -> Result<Outcome, CalcError> {
    let value = state.active_value();
    state.memory = Some(value);
    debug!(value, "memory saved");
    Ok(Outcome::Notice("Value saved to memory"))
}

/// Loads the memory slot into the pending operand.
///
/// After `=` the recalled value starts a fresh entry. An empty slot is
/// reported as `EmptyMemory` and leaves the state alone.
pub fn memory_recall(state: &mut EngineState) -> Result<Outcome, CalcError> {
    let value = state.memory.ok_or(CalcError::EmptyMemory)?;

    if state.is_finished() {
        state.accumulated_result = "0".to_string();
        state.last_operator = None;
    }
    state.pending_operand = number_to_string(value);
    Ok(Outcome::Updated)
}

/// Unsets the memory slot.
pub fn memory_clear(state: &mut EngineState) -> Result<Outcome, CalcError> {
    state.memory = None;
    Ok(Outcome::Notice("Memory cleared"))
}

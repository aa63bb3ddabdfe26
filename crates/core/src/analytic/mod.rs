//! Analytic lines and their draft/valid state machine.
//!
//! - `types` - Analytic line records, inputs and state changes
//! - `state` - Balance-driven state transitions per move line
//! - `checks` - Save-time checks for lines linked to move lines

pub mod checks;
pub mod state;
pub mod types;

#[cfg(test)]
mod state_props;

pub use checks::{check_analytic_account, check_linked_line};
pub use state::AnalyticStateMachine;
pub use types::{AnalyticLine, AnalyticLinePatch, AnalyticLineState, NewAnalyticLine, StateChange};

//! Moves and the posting validator.
//!
//! - `types` - Moves, move lines, journals, periods and origins
//! - `validator` - Required-root checks run before a move is posted

pub mod types;
pub mod validator;

#[cfg(test)]
mod validator_props;

pub use types::{JournalKind, Move, MoveLine, MoveOrigin, MoveState, OriginKind, PeriodType};
pub use validator::{PostingLine, PostingValidator};

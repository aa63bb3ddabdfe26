//! In-memory move and analytic line lifecycle manager.
//!
//! - `types` - Inputs, patches and mutation results
//! - `store` - The [`AnalyticBook`] applying mutations and recomputing states

pub mod store;
pub mod types;

pub use store::AnalyticBook;
pub use types::{MoveLinePatch, MutationResult, NewMove, NewMoveLine};

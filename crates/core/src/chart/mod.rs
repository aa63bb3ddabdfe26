//! Analytic chart and per-account constraint store.
//!
//! - `types` - Companies, general ledger accounts, analytic roots and accounts
//! - `constraint` - Required/forbidden/optional classification per (account, root)
//! - `store` - Registry of the chart plus constraint maintenance
//! - `resolver` - Classification of an analytic account against a ledger account

pub mod constraint;
pub mod resolver;
pub mod store;
pub mod types;

#[cfg(test)]
mod store_props;

pub use constraint::{
    AccountConstraints, AnalyticConstraint, Classification, ConstraintOverlap, ConstraintSets,
};
pub use resolver::classify;
pub use store::AnalyticChart;
pub use types::{
    Account, AccountKind, AnalyticAccount, AnalyticAccountKind, AnalyticRoot, Company, Statement,
};

//! Analytic accounting rules for Centra.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! It decides which analytic hierarchies each general ledger account requires,
//! keeps analytic line states consistent with their move lines, and guards
//! move posting.
//!
//! # Modules
//!
//! - `chart` - Analytic roots, accounts and the per-account constraint store
//! - `analytic` - Analytic lines and the draft/valid state machine
//! - `posting` - Moves, move lines and the posting validator
//! - `rules` - Rule-based analytic assignment (assets, customer invoices)
//! - `book` - In-memory lifecycle manager wiring everything together
//! - `error` - Validation errors surfaced to users

pub mod analytic;
pub mod book;
pub mod chart;
pub mod error;
pub mod posting;
pub mod rules;

pub use error::AnalyticError;

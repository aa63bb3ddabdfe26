//! Rule-based analytic assignment.
//!
//! - `entry` - (root, analytic account) pairs carried by source documents
//! - `requirement` - Whether a move line must carry analytic lines
//! - `asset` - Analytic entries for asset depreciation lines
//! - `invoice` - Analytic lines for customer invoice move lines

pub mod asset;
pub mod entry;
pub mod invoice;
pub mod requirement;

pub use asset::AssetDepreciation;
pub use entry::AnalyticEntry;
pub use invoice::{Invoice, InvoiceKind};
pub use requirement::must_have_analytic;

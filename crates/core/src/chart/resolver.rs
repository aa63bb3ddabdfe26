//! Analytic constraint resolver.

use super::constraint::Classification;
use super::types::{Account, AnalyticAccount};

/// Classifies `analytic_account` against `account` through its root.
///
/// Pure lookup: the analytic account's root is checked against the account's
/// required, forbidden and optional roots.
#[must_use]
pub fn classify(account: &Account, analytic_account: &AnalyticAccount) -> Classification {
    account.analytic.classify_root(analytic_account.root)
}

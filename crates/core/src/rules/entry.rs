//! Analytic entries.

use centra_shared::types::{AnalyticAccountId, AnalyticRootId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytic::NewAnalyticLine;

/// An analytic account chosen for one root on a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalyticEntry {
    /// The root the entry covers.
    pub root: AnalyticRootId,
    /// The analytic account to book on.
    pub account: AnalyticAccountId,
}

impl AnalyticEntry {
    /// Creates an entry.
    #[must_use]
    pub const fn new(root: AnalyticRootId, account: AnalyticAccountId) -> Self {
        Self { root, account }
    }

    /// Builds an analytic line mirroring a move line amount.
    #[must_use]
    pub fn analytic_line(
        &self,
        debit: Decimal,
        credit: Decimal,
        date: Option<NaiveDate>,
    ) -> NewAnalyticLine {
        let line = NewAnalyticLine::new(self.account).debit(debit).credit(credit);
        match date {
            Some(date) => line.dated(date),
            None => line,
        }
    }
}

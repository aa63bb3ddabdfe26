//! Analytic lines for customer invoices.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entry::AnalyticEntry;
use crate::book::NewMoveLine;

/// Invoice direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceKind {
    /// Supplier invoice.
    In,
    /// Customer invoice.
    Out,
}

/// An invoice line with the analytic entries chosen on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice direction.
    pub kind: InvoiceKind,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Accounting date, when different from the invoice date.
    pub accounting_date: Option<NaiveDate>,
    /// Analytic entries of the invoice line.
    pub entries: Vec<AnalyticEntry>,
}

impl Invoice {
    /// Returns the date analytic lines are booked on.
    #[must_use]
    pub fn analytic_date(&self) -> NaiveDate {
        self.accounting_date.unwrap_or(self.invoice_date)
    }

    /// Copies the entries onto the generated move lines.
    ///
    /// Each line of a customer invoice gets one analytic line per entry,
    /// mirroring its debit and credit. Supplier invoices are left alone.
    pub fn apply(&self, lines: &mut [NewMoveLine]) {
        if self.kind != InvoiceKind::Out || self.entries.is_empty() {
            return;
        }
        let date = self.analytic_date();
        for line in lines {
            line.analytic_lines = self
                .entries
                .iter()
                .map(|entry| entry.analytic_line(line.debit, line.credit, Some(date)))
                .collect();
        }
    }
}

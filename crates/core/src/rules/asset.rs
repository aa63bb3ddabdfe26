//! Analytic entries for asset depreciation moves.

use std::collections::BTreeSet;

use centra_shared::types::AccountId;
use serde::{Deserialize, Serialize};

use super::entry::AnalyticEntry;
use crate::book::NewMoveLine;
use crate::chart::AnalyticChart;
use crate::error::AnalyticError;

/// An asset with the analytic entries its depreciation is booked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDepreciation {
    /// Asset number.
    pub number: String,
    /// Analytic entries of the asset.
    pub entries: Vec<AnalyticEntry>,
}

impl AssetDepreciation {
    /// Creates an asset rule.
    #[must_use]
    pub fn new(number: impl Into<String>, entries: Vec<AnalyticEntry>) -> Self {
        Self {
            number: number.into(),
            entries,
        }
    }

    /// Returns the entries to book on a line of `account`.
    ///
    /// Returns `None` when the asset has no entries or the account has no
    /// required roots. Otherwise the entries are filtered to the required
    /// roots, which must all be covered.
    ///
    /// # Errors
    ///
    /// Returns `MissingRootOnAsset` when a required root has no entry.
    pub fn entries_for(
        &self,
        chart: &AnalyticChart,
        account: AccountId,
    ) -> Result<Option<Vec<AnalyticEntry>>, AnalyticError> {
        if self.entries.is_empty() {
            return Ok(None);
        }
        let account = chart.account(account)?;
        let required = account.analytic.required();
        if required.is_empty() {
            return Ok(None);
        }

        let covered: BTreeSet<_> = self.entries.iter().map(|entry| entry.root).collect();
        let missing: BTreeSet<_> = required.difference(&covered).copied().collect();
        if !missing.is_empty() {
            return Err(AnalyticError::MissingRootOnAsset {
                asset: self.number.clone(),
                account: account.code.clone(),
                roots: chart.root_names(&missing),
            });
        }

        Ok(Some(
            self.entries
                .iter()
                .filter(|entry| required.contains(&entry.root))
                .copied()
                .collect(),
        ))
    }

    /// Adds the asset's analytic lines to generated depreciation lines.
    ///
    /// Lines whose account has no required roots are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `MissingRootOnAsset` when a line's account requires a root the
    /// asset does not cover. No line is changed in that case.
    pub fn apply(
        &self,
        chart: &AnalyticChart,
        lines: &mut [NewMoveLine],
    ) -> Result<(), AnalyticError> {
        let mut planned = Vec::with_capacity(lines.len());
        for line in lines.iter() {
            planned.push(self.entries_for(chart, line.account)?);
        }

        for (line, entries) in lines.iter_mut().zip(planned) {
            if let Some(entries) = entries {
                line.analytic_lines = entries
                    .iter()
                    .map(|entry| entry.analytic_line(line.debit, line.credit, None))
                    .collect();
            }
        }
        Ok(())
    }
}

//! Posting validator.
//!
//! Runs before a move transitions to posted. For each move line, every root
//! the account requires must be covered by an analytic line, and analytic
//! lines on required roots must be valid. Moves of adjustment periods are
//! not checked.

use std::collections::BTreeSet;

use centra_shared::AnalyticConfig;
use centra_shared::types::AnalyticRootId;

use super::types::{Move, MoveLine};
use crate::analytic::{AnalyticLine, AnalyticLineState};
use crate::chart::{AnalyticChart, Classification};
use crate::error::AnalyticError;

/// A move line together with its linked analytic lines.
#[derive(Debug, Clone)]
pub struct PostingLine<'a> {
    /// The move line.
    pub line: &'a MoveLine,
    /// Analytic lines linked to it.
    pub analytic_lines: Vec<&'a AnalyticLine>,
}

/// Stateless service validating moves against analytic constraints.
pub struct PostingValidator;

impl PostingValidator {
    /// Checks that `lines` of `move_` satisfy their accounts' required roots.
    ///
    /// Stops at the first failing line.
    pub fn validate_post(
        chart: &AnalyticChart,
        move_: &Move,
        lines: &[PostingLine<'_>],
    ) -> Result<(), AnalyticError> {
        if move_.is_adjustment() {
            return Ok(());
        }
        for posting_line in lines {
            Self::validate_line(chart, move_, posting_line)?;
        }
        Ok(())
    }

    fn validate_line(
        chart: &AnalyticChart,
        move_: &Move,
        posting_line: &PostingLine<'_>,
    ) -> Result<(), AnalyticError> {
        let line = posting_line.line;
        let account = chart.account(line.account)?;
        let mut required = account.analytic.required();

        let missing = |roots: &BTreeSet<AnalyticRootId>| AnalyticError::MissingAnalyticLines {
            move_id: move_.id,
            move_name: move_.name.clone(),
            line_id: line.id,
            account: account.label(),
            roots: chart.root_names(roots),
            origin: move_.origin.clone(),
        };

        if posting_line.analytic_lines.is_empty() && !required.is_empty() {
            return Err(missing(&required));
        }

        for analytic_line in &posting_line.analytic_lines {
            let root = chart.root_of(analytic_line.account)?;
            required.remove(&root.id);
            if account.analytic.classify_root(root.id) == Classification::Required
                && analytic_line.state != AnalyticLineState::Valid
            {
                return Err(AnalyticError::InvalidAnalyticToPost {
                    move_id: move_.id,
                    move_name: move_.name.clone(),
                    line_id: line.id,
                    line: line
                        .description
                        .clone()
                        .unwrap_or_else(|| account.label()),
                    root: root.name.clone(),
                });
            }
        }

        if required.is_empty() {
            Ok(())
        } else {
            Err(missing(&required))
        }
    }

    /// Checks a move line against the strict configuration policy.
    ///
    /// When `validate_analytic` is enabled, the line's account must classify
    /// every analytic root of its company.
    pub fn check_line_configuration(
        chart: &AnalyticChart,
        config: &AnalyticConfig,
        line: &MoveLine,
    ) -> Result<(), AnalyticError> {
        if !config.validate_analytic {
            return Ok(());
        }
        let pending = chart.pending_roots(line.account)?;
        if pending.is_empty() {
            return Ok(());
        }
        Err(AnalyticError::AccountAnalyticNotConfigured {
            line_id: line.id,
            account: chart.account(line.account)?.label(),
            pending: pending.into_iter().map(|root| root.name.clone()).collect(),
        })
    }
}

//! Save-time checks for analytic lines.

use tracing::warn;

use super::types::AnalyticLine;
use crate::chart::{Account, AnalyticAccountKind, AnalyticChart, Classification};
use crate::error::AnalyticError;

/// Checks that the line books on a normal analytic account.
pub fn check_analytic_account(
    chart: &AnalyticChart,
    line: &AnalyticLine,
) -> Result<(), AnalyticError> {
    let account = chart.analytic_account(line.account)?;
    if account.kind == AnalyticAccountKind::View {
        return Err(AnalyticError::ViewAnalyticAccount {
            line: line.name.clone(),
            account: account.name.clone(),
        });
    }
    Ok(())
}

/// Checks a line against the account of the move line it is linked to.
///
/// The analytic account must be a normal account of the same company, the
/// line currency must match the account currency, and the root must not be
/// forbidden.
pub fn check_linked_line(
    chart: &AnalyticChart,
    line: &AnalyticLine,
    move_line_account: &Account,
) -> Result<(), AnalyticError> {
    check_analytic_account(chart, line)?;

    let root = chart.root_of(line.account)?;
    if root.company != move_line_account.company {
        warn!(line = %line.id, root = %root.id, "analytic hierarchy of another company");
        return Err(AnalyticError::CompanyMismatch {
            account: move_line_account.label(),
            root: root.name.clone(),
        });
    }

    if line.currency != move_line_account.currency {
        warn!(
            line = %line.id,
            expected = %move_line_account.currency,
            actual = %line.currency,
            "analytic line currency mismatch"
        );
        return Err(AnalyticError::CurrencyMismatch {
            line_id: line.id,
            line: line.name.clone(),
            expected: move_line_account.currency.clone(),
            actual: line.currency.clone(),
        });
    }

    if move_line_account.analytic.classify_root(root.id) == Classification::Forbidden {
        warn!(line = %line.id, root = %root.id, "forbidden analytic hierarchy used");
        return Err(AnalyticError::ForbiddenAnalyticUsed {
            line_id: line.id,
            line: line.name.clone(),
            account: move_line_account.label(),
            root: root.name.clone(),
        });
    }
    Ok(())
}

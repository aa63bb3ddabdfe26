//! Analytic requirement of a move line.

use crate::chart::{Account, Statement};
use crate::posting::{JournalKind, Move, OriginKind, PeriodType};

/// Returns true if a line of `move_` on `account` must carry analytic lines.
///
/// Accounts with required roots always do. Otherwise income statement
/// accounts do, except for the balance moves of a fiscal year closing
/// (situation journal, adjustment period, fiscal year origin).
#[must_use]
pub fn must_have_analytic(account: &Account, move_: &Move) -> bool {
    if account.analytic.has_required() {
        return true;
    }
    if account.statement != Some(Statement::Income) {
        return false;
    }
    let closing_balance = move_.journal == JournalKind::Situation
        && move_.period == PeriodType::Adjustment
        && move_
            .origin
            .as_ref()
            .is_some_and(|origin| origin.kind == OriginKind::FiscalYear);
    !closing_balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{AccountKind, AnalyticChart, AnalyticRoot, Company};
    use crate::posting::{MoveOrigin, MoveState};
    use centra_shared::types::{CompanyId, MoveId};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn new_move(
        company: CompanyId,
        journal: JournalKind,
        period: PeriodType,
        origin: Option<OriginKind>,
    ) -> Move {
        Move {
            id: MoveId::new(),
            company,
            name: "CLOSE/2025".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            description: None,
            journal,
            period,
            origin: origin.map(|kind| MoveOrigin::new(kind, "FY2025")),
            state: MoveState::Draft,
        }
    }

    #[rstest]
    #[case(AccountKind::Revenue, JournalKind::Revenue, PeriodType::Standard, None, true)]
    #[case(AccountKind::Expense, JournalKind::General, PeriodType::Standard, None, true)]
    #[case(AccountKind::Receivable, JournalKind::Revenue, PeriodType::Standard, None, false)]
    #[case(AccountKind::View, JournalKind::General, PeriodType::Standard, None, false)]
    #[case(
        AccountKind::Revenue,
        JournalKind::Situation,
        PeriodType::Adjustment,
        Some(OriginKind::FiscalYear),
        false
    )]
    #[case(
        AccountKind::Revenue,
        JournalKind::Situation,
        PeriodType::Adjustment,
        Some(OriginKind::Other),
        true
    )]
    #[case(
        AccountKind::Revenue,
        JournalKind::General,
        PeriodType::Adjustment,
        Some(OriginKind::FiscalYear),
        true
    )]
    fn test_must_have_analytic_without_required(
        #[case] kind: AccountKind,
        #[case] journal: JournalKind,
        #[case] period: PeriodType,
        #[case] origin: Option<OriginKind>,
        #[case] expected: bool,
    ) {
        let company = CompanyId::new();
        let account = Account::new(company, "4000", "Account", kind, "USD".parse().unwrap());
        let m = new_move(company, journal, period, origin);
        assert_eq!(must_have_analytic(&account, &m), expected);
    }

    #[test]
    fn test_required_roots_always_need_analytic() {
        let mut chart = AnalyticChart::new();
        let company = chart.add_company(Company::new("Dunder Mifflin", "USD".parse().unwrap()));
        let receivable = chart
            .add_account(Account::new(
                company,
                "1200",
                "Receivable",
                AccountKind::Receivable,
                "USD".parse().unwrap(),
            ))
            .unwrap();
        let projects = chart.add_root(AnalyticRoot::new(company, "Projects")).unwrap();
        chart.set_required(receivable, [projects]).unwrap();

        let m = new_move(
            company,
            JournalKind::Situation,
            PeriodType::Adjustment,
            Some(OriginKind::FiscalYear),
        );
        assert!(must_have_analytic(chart.account(receivable).unwrap(), &m));
    }
}

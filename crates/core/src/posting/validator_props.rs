//! Property-based tests for the posting validator.
//!
//! A move posts exactly when every required root of each line is covered by
//! valid analytic lines.

use centra_shared::types::{AnalyticAccountId, AnalyticLineId, MoveId, MoveLineId};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::{JournalKind, Move, MoveLine, MoveState, PeriodType};
use super::validator::{PostingLine, PostingValidator};
use crate::analytic::{AnalyticLine, AnalyticLineState};
use crate::chart::{
    Account, AccountKind, AnalyticAccount, AnalyticChart, AnalyticConstraint, AnalyticRoot,
    Company,
};
use crate::error::AnalyticError;

const ROOTS: usize = 4;

/// How a root is covered on the move line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coverage {
    None,
    Valid,
    Draft,
}

fn constraint() -> impl Strategy<Value = Option<AnalyticConstraint>> {
    prop_oneof![
        Just(None),
        Just(Some(AnalyticConstraint::Required)),
        Just(Some(AnalyticConstraint::Optional)),
    ]
}

fn coverage() -> impl Strategy<Value = Coverage> {
    prop_oneof![Just(Coverage::None), Just(Coverage::Valid), Just(Coverage::Draft)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_posting_iff_required_roots_valid(
        constraints in proptest::collection::vec(constraint(), ROOTS),
        coverages in proptest::collection::vec(coverage(), ROOTS),
    ) {
        let mut chart = AnalyticChart::new();
        let company = chart.add_company(Company::new("Dunder Mifflin", "USD".parse().unwrap()));
        let account = chart
            .add_account(Account::new(
                company,
                "4000",
                "Revenue",
                AccountKind::Revenue,
                "USD".parse().unwrap(),
            ))
            .unwrap();
        let mut analytic_accounts: Vec<AnalyticAccountId> = Vec::new();
        for i in 0..ROOTS {
            let root = chart.add_root(AnalyticRoot::new(company, format!("Root {i}"))).unwrap();
            analytic_accounts.push(
                chart
                    .add_analytic_account(AnalyticAccount::new(root, format!("Leaf {i}")))
                    .unwrap(),
            );
            if let Some(c) = constraints[i] {
                let mut sets = chart.account(account).unwrap().analytic.to_sets();
                sets.get_mut(c).insert(root);
                chart.save_constraints(account, sets).unwrap();
            }
        }

        let move_ = Move {
            id: MoveId::new(),
            company,
            name: "MISC/0001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
            description: None,
            journal: JournalKind::General,
            period: PeriodType::Standard,
            origin: None,
            state: MoveState::Draft,
        };
        let line = MoveLine {
            id: MoveLineId::new(),
            move_id: move_.id,
            account,
            debit: Decimal::ONE_HUNDRED,
            credit: Decimal::ZERO,
            description: None,
        };
        let analytic_lines: Vec<AnalyticLine> = coverages
            .iter()
            .zip(&analytic_accounts)
            .filter(|(c, _)| **c != Coverage::None)
            .map(|(c, account)| AnalyticLine {
                id: AnalyticLineId::new(),
                name: "Allocation".to_string(),
                account: *account,
                move_line: Some(line.id),
                debit: Decimal::ONE_HUNDRED,
                credit: Decimal::ZERO,
                currency: "USD".parse().unwrap(),
                date: move_.date,
                state: if *c == Coverage::Valid {
                    AnalyticLineState::Valid
                } else {
                    AnalyticLineState::Draft
                },
            })
            .collect();

        let result = PostingValidator::validate_post(
            &chart,
            &move_,
            &[PostingLine { line: &line, analytic_lines: analytic_lines.iter().collect() }],
        );

        let required: Vec<Coverage> = constraints
            .iter()
            .zip(&coverages)
            .filter(|(c, _)| **c == Some(AnalyticConstraint::Required))
            .map(|(_, coverage)| *coverage)
            .collect();

        if required.iter().all(|c| *c == Coverage::Valid) {
            prop_assert!(result.is_ok());
        } else if required.contains(&Coverage::Draft) {
            let is_invalid = matches!(result, Err(AnalyticError::InvalidAnalyticToPost { .. }));
            prop_assert!(is_invalid);
        } else {
            let is_missing = matches!(result, Err(AnalyticError::MissingAnalyticLines { .. }));
            prop_assert!(is_missing);
        }
    }
}

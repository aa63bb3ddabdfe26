//! Property-based tests for analytic line state computation.

use centra_shared::types::{AnalyticAccountId, AnalyticLineId, AnalyticRootId, MoveLineId};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::state::AnalyticStateMachine;
use super::types::{AnalyticLine, AnalyticLineState};

const ROOTS: usize = 3;

/// Strategy for amounts in cents, 0 to 10,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn line(debit: Decimal, credit: Decimal) -> AnalyticLine {
    AnalyticLine {
        id: AnalyticLineId::new(),
        name: "Analytic".to_string(),
        account: AnalyticAccountId::new(),
        move_line: Some(MoveLineId::new()),
        debit,
        credit,
        currency: "USD".parse().unwrap(),
        date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        state: AnalyticLineState::Draft,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A line is valid exactly when its root group balances with the move line.
    #[test]
    fn prop_valid_iff_group_balances(
        entries in proptest::collection::vec((0..ROOTS, amount(), amount()), 0..12),
        move_line_balance in amount(),
    ) {
        let roots: Vec<AnalyticRootId> = (0..ROOTS).map(|_| AnalyticRootId::new()).collect();
        let lines: Vec<(AnalyticLine, AnalyticRootId)> = entries
            .iter()
            .map(|(root, debit, credit)| (line(*debit, *credit), roots[*root]))
            .collect();

        let states = AnalyticStateMachine::target_states(
            move_line_balance,
            lines.iter().map(|(l, root)| (l, *root)),
        );
        prop_assert_eq!(states.len(), lines.len());

        for ((l, root), (stated, state)) in lines.iter().zip(&states) {
            prop_assert_eq!(l.id, stated.id);
            let group: Decimal = lines
                .iter()
                .filter(|(_, r)| r == root)
                .map(|(other, _)| other.balance())
                .sum();
            let expected = if group == move_line_balance {
                AnalyticLineState::Valid
            } else {
                AnalyticLineState::Draft
            };
            prop_assert_eq!(*state, expected);
        }
    }

    /// Applying the transitions once leaves nothing to change.
    #[test]
    fn prop_transitions_are_idempotent(
        entries in proptest::collection::vec((0..ROOTS, amount()), 1..8),
        move_line_balance in amount(),
    ) {
        let roots: Vec<AnalyticRootId> = (0..ROOTS).map(|_| AnalyticRootId::new()).collect();
        let mut lines: Vec<(AnalyticLine, AnalyticRootId)> = entries
            .iter()
            .map(|(root, debit)| (line(*debit, Decimal::ZERO), roots[*root]))
            .collect();

        let changes = AnalyticStateMachine::transitions(
            move_line_balance,
            lines.iter().map(|(l, root)| (l, *root)),
        );
        for change in &changes {
            if let Some((l, _)) = lines.iter_mut().find(|(l, _)| l.id == change.line) {
                l.state = change.to;
            }
        }

        let again = AnalyticStateMachine::transitions(
            move_line_balance,
            lines.iter().map(|(l, root)| (l, *root)),
        );
        prop_assert!(again.is_empty());
    }
}

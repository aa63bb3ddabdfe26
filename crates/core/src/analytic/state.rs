//! Analytic line state machine.
//!
//! The analytic lines of one move line are grouped by root. A group whose
//! balance equals the move line balance is valid; every other group is draft.
//! Comparison is exact decimal equality.

use std::collections::BTreeMap;

use centra_shared::types::AnalyticRootId;
use rust_decimal::Decimal;

use super::types::{AnalyticLine, AnalyticLineState, StateChange};

/// Stateless service computing analytic line state transitions.
pub struct AnalyticStateMachine;

impl AnalyticStateMachine {
    /// Computes the target state of every line linked to one move line.
    ///
    /// `linked` pairs each analytic line with the root of its account.
    /// Returns the target state of every line, in input order.
    pub fn target_states<'a>(
        move_line_balance: Decimal,
        linked: impl IntoIterator<Item = (&'a AnalyticLine, AnalyticRootId)>,
    ) -> Vec<(&'a AnalyticLine, AnalyticLineState)> {
        let linked: Vec<_> = linked.into_iter().collect();

        let mut balances: BTreeMap<AnalyticRootId, Decimal> = BTreeMap::new();
        for (line, root) in &linked {
            *balances.entry(*root).or_default() += line.balance();
        }

        linked
            .into_iter()
            .map(|(line, root)| {
                let state = if balances.get(&root) == Some(&move_line_balance) {
                    AnalyticLineState::Valid
                } else {
                    AnalyticLineState::Draft
                };
                (line, state)
            })
            .collect()
    }

    /// Computes the transitions needed for the lines linked to one move line.
    ///
    /// Lines already in their target state produce no change.
    pub fn transitions<'a>(
        move_line_balance: Decimal,
        linked: impl IntoIterator<Item = (&'a AnalyticLine, AnalyticRootId)>,
    ) -> Vec<StateChange> {
        Self::target_states(move_line_balance, linked)
            .into_iter()
            .filter(|(line, state)| line.state != *state)
            .map(|(line, state)| StateChange {
                line: line.id,
                from: line.state,
                to: state,
            })
            .collect()
    }

    /// Computes the transitions forcing unlinked lines back to draft.
    pub fn unlinked_transitions<'a>(
        lines: impl IntoIterator<Item = &'a AnalyticLine>,
    ) -> Vec<StateChange> {
        lines
            .into_iter()
            .filter(|line| line.state != AnalyticLineState::Draft)
            .map(|line| StateChange {
                line: line.id,
                from: line.state,
                to: AnalyticLineState::Draft,
            })
            .collect()
    }
}

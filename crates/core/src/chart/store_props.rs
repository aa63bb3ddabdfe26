//! Property-based tests for the constraint store.
//!
//! Stored constraints are always pairwise disjoint, and saving overlapping
//! sets is rejected without touching the stored state.

use std::collections::BTreeSet;

use centra_shared::types::{AccountId, AnalyticRootId};
use proptest::prelude::*;

use super::constraint::{AnalyticConstraint, Classification, ConstraintSets};
use super::store::AnalyticChart;
use super::types::{Account, AccountKind, AnalyticRoot, Company};
use crate::error::AnalyticError;

const ROOTS: usize = 6;

fn chart_with_roots() -> (AnalyticChart, AccountId, Vec<AnalyticRootId>) {
    let mut chart = AnalyticChart::new();
    let company = chart.add_company(Company::new("Dunder Mifflin", "USD".parse().unwrap()));
    let account = chart
        .add_account(Account::new(
            company,
            "6000",
            "Expenses",
            AccountKind::Expense,
            "USD".parse().unwrap(),
        ))
        .unwrap();
    let roots = (0..ROOTS)
        .map(|i| {
            chart
                .add_root(AnalyticRoot::new(company, format!("Root {i}")))
                .unwrap()
        })
        .collect();
    (chart, account, roots)
}

/// Strategy for a subset of root indexes.
fn subset() -> impl Strategy<Value = BTreeSet<usize>> {
    proptest::collection::btree_set(0..ROOTS, 0..=ROOTS)
}

fn pick(roots: &[AnalyticRootId], indexes: &BTreeSet<usize>) -> BTreeSet<AnalyticRootId> {
    indexes.iter().map(|i| roots[*i]).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Saving succeeds exactly when the three sets are pairwise disjoint.
    #[test]
    fn prop_save_accepts_iff_disjoint(
        required in subset(),
        forbidden in subset(),
        optional in subset(),
    ) {
        let (mut chart, account, roots) = chart_with_roots();
        let sets = ConstraintSets {
            required: pick(&roots, &required),
            forbidden: pick(&roots, &forbidden),
            optional: pick(&roots, &optional),
        };
        let disjoint = required.is_disjoint(&forbidden)
            && required.is_disjoint(&optional)
            && forbidden.is_disjoint(&optional);

        let result = chart.save_constraints(account, sets.clone());
        if disjoint {
            prop_assert!(result.is_ok());
            let stored = &chart.account(account).unwrap().analytic;
            prop_assert_eq!(stored.to_sets(), sets);
        } else {
            let is_conflict = matches!(result, Err(AnalyticError::ConstraintConflict { .. }));
            prop_assert!(is_conflict);
            prop_assert!(chart.account(account).unwrap().analytic.is_empty());
        }
    }

    /// Every root is classified at most once and pending roots are the rest.
    #[test]
    fn prop_classification_partitions_roots(
        required in subset(),
        forbidden in subset(),
    ) {
        let (mut chart, account, roots) = chart_with_roots();
        let forbidden: BTreeSet<usize> = forbidden.difference(&required).copied().collect();
        chart.set_required(account, pick(&roots, &required)).unwrap();
        chart.set_forbidden(account, pick(&roots, &forbidden)).unwrap();

        let pending: BTreeSet<AnalyticRootId> = chart
            .pending_roots(account)
            .unwrap()
            .into_iter()
            .map(|root| root.id)
            .collect();

        for (i, root) in roots.iter().enumerate() {
            let class = chart.account(account).unwrap().analytic.classify_root(*root);
            let expected = if required.contains(&i) {
                Classification::Required
            } else if forbidden.contains(&i) {
                Classification::Forbidden
            } else {
                Classification::Undefined
            };
            prop_assert_eq!(class, expected);
            prop_assert_eq!(pending.contains(root), expected == Classification::Undefined);
        }
    }

    /// Moving a root from one class to another requires removing it first.
    #[test]
    fn prop_reclassification_conflicts(index in 0..ROOTS) {
        let (mut chart, account, roots) = chart_with_roots();
        chart.set_optional(account, [roots[index]]).unwrap();

        let err = chart.set_required(account, [roots[index]]).unwrap_err();
        let is_required_optional = matches!(
            err,
            AnalyticError::ConstraintConflict {
                first: AnalyticConstraint::Required,
                second: AnalyticConstraint::Optional,
                ..
            }
        );
        prop_assert!(is_required_optional);

        chart.set_optional(account, std::iter::empty::<AnalyticRootId>()).unwrap();
        prop_assert!(chart.set_required(account, [roots[index]]).is_ok());
    }
}

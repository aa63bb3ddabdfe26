//! Analytic constraint classification.
//!
//! Each (account, root) pair carries at most one [`AnalyticConstraint`], so the
//! stored form is disjoint by construction. [`ConstraintSets`] is the raw
//! three-set form (required, forbidden, optional) that callers edit; it is
//! checked for overlaps before it can replace an account's constraints.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use centra_shared::types::AnalyticRootId;
use serde::{Deserialize, Serialize};

/// Policy of an account towards one analytic root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticConstraint {
    /// Lines of the account must carry a valid analytic line for the root.
    Required,
    /// Lines of the account must not carry analytic lines for the root.
    Forbidden,
    /// Analytic lines for the root are allowed but not enforced.
    Optional,
}

impl AnalyticConstraint {
    /// Returns the string representation of the constraint.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Forbidden => "forbidden",
            Self::Optional => "optional",
        }
    }
}

impl fmt::Display for AnalyticConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying an analytic account against a ledger account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// The root is required.
    Required,
    /// The root is forbidden.
    Forbidden,
    /// The root is optional.
    Optional,
    /// The account does not classify the root yet.
    Undefined,
}

impl From<Option<AnalyticConstraint>> for Classification {
    fn from(constraint: Option<AnalyticConstraint>) -> Self {
        match constraint {
            Some(AnalyticConstraint::Required) => Self::Required,
            Some(AnalyticConstraint::Forbidden) => Self::Forbidden,
            Some(AnalyticConstraint::Optional) => Self::Optional,
            None => Self::Undefined,
        }
    }
}

/// Roots found in two classifications at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintOverlap {
    /// First classification.
    pub first: AnalyticConstraint,
    /// Second classification.
    pub second: AnalyticConstraint,
    /// Roots present in both.
    pub roots: BTreeSet<AnalyticRootId>,
}

/// Raw required/forbidden/optional sets of one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSets {
    /// Required roots.
    pub required: BTreeSet<AnalyticRootId>,
    /// Forbidden roots.
    pub forbidden: BTreeSet<AnalyticRootId>,
    /// Optional roots.
    pub optional: BTreeSet<AnalyticRootId>,
}

impl ConstraintSets {
    /// Returns the set for one classification.
    #[must_use]
    pub fn get(&self, constraint: AnalyticConstraint) -> &BTreeSet<AnalyticRootId> {
        match constraint {
            AnalyticConstraint::Required => &self.required,
            AnalyticConstraint::Forbidden => &self.forbidden,
            AnalyticConstraint::Optional => &self.optional,
        }
    }

    /// Returns the set for one classification, mutably.
    pub fn get_mut(&mut self, constraint: AnalyticConstraint) -> &mut BTreeSet<AnalyticRootId> {
        match constraint {
            AnalyticConstraint::Required => &mut self.required,
            AnalyticConstraint::Forbidden => &mut self.forbidden,
            AnalyticConstraint::Optional => &mut self.optional,
        }
    }

    /// Returns every root mentioned in any set.
    #[must_use]
    pub fn all_roots(&self) -> BTreeSet<AnalyticRootId> {
        self.required
            .iter()
            .chain(&self.forbidden)
            .chain(&self.optional)
            .copied()
            .collect()
    }

    /// Finds the first overlapping pair.
    ///
    /// Pairs are checked as required/forbidden, required/optional, then
    /// forbidden/optional.
    #[must_use]
    pub fn first_overlap(&self) -> Option<ConstraintOverlap> {
        use AnalyticConstraint::{Forbidden, Optional, Required};

        [(Required, Forbidden), (Required, Optional), (Forbidden, Optional)]
            .into_iter()
            .find_map(|(first, second)| {
                let roots: BTreeSet<_> = self
                    .get(first)
                    .intersection(self.get(second))
                    .copied()
                    .collect();
                (!roots.is_empty()).then_some(ConstraintOverlap {
                    first,
                    second,
                    roots,
                })
            })
    }

    /// Converts the sets into stored constraints.
    ///
    /// # Errors
    ///
    /// Returns the first overlap if the sets are not pairwise disjoint.
    pub fn into_constraints(self) -> Result<AccountConstraints, ConstraintOverlap> {
        if let Some(overlap) = self.first_overlap() {
            return Err(overlap);
        }

        let mut entries = BTreeMap::new();
        for (constraint, roots) in [
            (AnalyticConstraint::Required, self.required),
            (AnalyticConstraint::Forbidden, self.forbidden),
            (AnalyticConstraint::Optional, self.optional),
        ] {
            entries.extend(roots.into_iter().map(|root| (root, constraint)));
        }
        Ok(AccountConstraints { entries })
    }
}

/// Analytic constraints of one account, one entry per root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountConstraints {
    entries: BTreeMap<AnalyticRootId, AnalyticConstraint>,
}

impl AccountConstraints {
    /// Returns the constraint stored for `root`.
    #[must_use]
    pub fn get(&self, root: AnalyticRootId) -> Option<AnalyticConstraint> {
        self.entries.get(&root).copied()
    }

    /// Classifies `root`; unclassified roots are `Undefined`.
    #[must_use]
    pub fn classify_root(&self, root: AnalyticRootId) -> Classification {
        self.get(root).into()
    }

    /// Returns the roots carrying `constraint`, in id order.
    #[must_use]
    pub fn roots(&self, constraint: AnalyticConstraint) -> BTreeSet<AnalyticRootId> {
        self.entries
            .iter()
            .filter(|(_, c)| **c == constraint)
            .map(|(root, _)| *root)
            .collect()
    }

    /// Returns the required roots.
    #[must_use]
    pub fn required(&self) -> BTreeSet<AnalyticRootId> {
        self.roots(AnalyticConstraint::Required)
    }

    /// Returns true if at least one root is required.
    #[must_use]
    pub fn has_required(&self) -> bool {
        self.entries
            .values()
            .any(|c| *c == AnalyticConstraint::Required)
    }

    /// Returns true if `root` is classified at all.
    #[must_use]
    pub fn is_classified(&self, root: AnalyticRootId) -> bool {
        self.entries.contains_key(&root)
    }

    /// Returns every classified root.
    pub fn classified_roots(&self) -> impl Iterator<Item = AnalyticRootId> + '_ {
        self.entries.keys().copied()
    }

    /// Returns true if no root is classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Splits the constraints back into three sets.
    #[must_use]
    pub fn to_sets(&self) -> ConstraintSets {
        let mut sets = ConstraintSets::default();
        for (root, constraint) in &self.entries {
            sets.get_mut(*constraint).insert(*root);
        }
        sets
    }
}

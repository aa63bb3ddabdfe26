//! Analytic chart registry and constraint store.
//!
//! The chart owns companies, general ledger accounts, analytic roots and
//! analytic accounts. Constraint edits go through [`AnalyticChart::save_constraints`],
//! which validates the three sets before replacing the stored classification.

use std::collections::BTreeMap;

use centra_shared::types::{AccountId, AnalyticAccountId, AnalyticRootId, CompanyId};
use tracing::debug;

use super::constraint::{AnalyticConstraint, Classification, ConstraintOverlap, ConstraintSets};
use super::resolver;
use super::types::{Account, AnalyticAccount, AnalyticRoot, Company};
use crate::error::AnalyticError;

/// Registry of accounts and analytic hierarchies.
#[derive(Debug, Clone, Default)]
pub struct AnalyticChart {
    companies: BTreeMap<CompanyId, Company>,
    accounts: BTreeMap<AccountId, Account>,
    roots: BTreeMap<AnalyticRootId, AnalyticRoot>,
    analytic_accounts: BTreeMap<AnalyticAccountId, AnalyticAccount>,
}

impl AnalyticChart {
    /// Creates an empty chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Registration ==========

    /// Registers a company.
    pub fn add_company(&mut self, company: Company) -> CompanyId {
        let id = company.id;
        self.companies.insert(id, company);
        id
    }

    /// Registers a general ledger account.
    ///
    /// Constraints carried by `account` are validated like any other save.
    pub fn add_account(&mut self, account: Account) -> Result<AccountId, AnalyticError> {
        self.company(account.company)?;
        let id = account.id;
        if self.accounts.contains_key(&id) {
            return Err(AnalyticError::Duplicate {
                kind: "account",
                id: id.to_string(),
            });
        }
        let sets = account.analytic.to_sets();
        self.accounts.insert(id, account);
        if let Err(err) = self.validate(id, &sets) {
            self.accounts.remove(&id);
            return Err(err);
        }
        Ok(id)
    }

    /// Registers an analytic root.
    pub fn add_root(&mut self, root: AnalyticRoot) -> Result<AnalyticRootId, AnalyticError> {
        self.company(root.company)?;
        let id = root.id;
        if self.roots.contains_key(&id) {
            return Err(AnalyticError::Duplicate {
                kind: "analytic hierarchy",
                id: id.to_string(),
            });
        }
        self.roots.insert(id, root);
        Ok(id)
    }

    /// Registers an analytic account below an existing root.
    ///
    /// The parent, when set, must belong to the same root.
    pub fn add_analytic_account(
        &mut self,
        account: AnalyticAccount,
    ) -> Result<AnalyticAccountId, AnalyticError> {
        self.root(account.root)?;
        let id = account.id;
        if self.analytic_accounts.contains_key(&id) {
            return Err(AnalyticError::Duplicate {
                kind: "analytic account",
                id: id.to_string(),
            });
        }
        if let Some(parent) = account.parent {
            let parent = self.analytic_account(parent)?;
            if parent.root != account.root {
                return Err(AnalyticError::ParentRootMismatch {
                    account: account.name,
                    parent: parent.name.clone(),
                    parent_root: self.root(parent.root)?.name.clone(),
                });
            }
        }
        self.analytic_accounts.insert(id, account);
        Ok(id)
    }

    // ========== Lookups ==========

    /// Returns a company.
    pub fn company(&self, id: CompanyId) -> Result<&Company, AnalyticError> {
        self.companies
            .get(&id)
            .ok_or(AnalyticError::UnknownCompany(id))
    }

    /// Returns a general ledger account.
    pub fn account(&self, id: AccountId) -> Result<&Account, AnalyticError> {
        self.accounts
            .get(&id)
            .ok_or(AnalyticError::UnknownAccount(id))
    }

    /// Returns an analytic root.
    pub fn root(&self, id: AnalyticRootId) -> Result<&AnalyticRoot, AnalyticError> {
        self.roots
            .get(&id)
            .ok_or(AnalyticError::UnknownAnalyticRoot(id))
    }

    /// Returns an analytic account.
    pub fn analytic_account(
        &self,
        id: AnalyticAccountId,
    ) -> Result<&AnalyticAccount, AnalyticError> {
        self.analytic_accounts
            .get(&id)
            .ok_or(AnalyticError::UnknownAnalyticAccount(id))
    }

    /// Returns the root of an analytic account.
    pub fn root_of(&self, id: AnalyticAccountId) -> Result<&AnalyticRoot, AnalyticError> {
        let account = self.analytic_account(id)?;
        self.root(account.root)
    }

    /// Returns the names of `roots`, sorted.
    pub fn root_names<'a>(&self, roots: impl IntoIterator<Item = &'a AnalyticRootId>) -> Vec<String> {
        let mut names: Vec<String> = roots
            .into_iter()
            .map(|id| {
                self.roots
                    .get(id)
                    .map_or_else(|| id.to_string(), |root| root.name.clone())
            })
            .collect();
        names.sort();
        names
    }

    // ========== Constraint Store ==========

    /// Replaces the required roots of an account.
    pub fn set_required(
        &mut self,
        account: AccountId,
        roots: impl IntoIterator<Item = AnalyticRootId>,
    ) -> Result<(), AnalyticError> {
        self.set_constraint(account, AnalyticConstraint::Required, roots)
    }

    /// Replaces the forbidden roots of an account.
    pub fn set_forbidden(
        &mut self,
        account: AccountId,
        roots: impl IntoIterator<Item = AnalyticRootId>,
    ) -> Result<(), AnalyticError> {
        self.set_constraint(account, AnalyticConstraint::Forbidden, roots)
    }

    /// Replaces the optional roots of an account.
    pub fn set_optional(
        &mut self,
        account: AccountId,
        roots: impl IntoIterator<Item = AnalyticRootId>,
    ) -> Result<(), AnalyticError> {
        self.set_constraint(account, AnalyticConstraint::Optional, roots)
    }

    /// Replaces one classification of an account, keeping the other two.
    pub fn set_constraint(
        &mut self,
        account: AccountId,
        constraint: AnalyticConstraint,
        roots: impl IntoIterator<Item = AnalyticRootId>,
    ) -> Result<(), AnalyticError> {
        let mut sets = self.account(account)?.analytic.to_sets();
        *sets.get_mut(constraint) = roots.into_iter().collect();
        self.save_constraints(account, sets)
    }

    /// Validates and stores the three constraint sets of an account.
    ///
    /// Nothing changes when validation fails.
    pub fn save_constraints(
        &mut self,
        account: AccountId,
        sets: ConstraintSets,
    ) -> Result<(), AnalyticError> {
        self.validate(account, &sets)?;
        let constraints = sets
            .into_constraints()
            .map_err(|overlap| self.conflict(account, &overlap))?;

        let entry = self
            .accounts
            .get_mut(&account)
            .ok_or(AnalyticError::UnknownAccount(account))?;
        entry.analytic = constraints;
        debug!(account = %account, "saved analytic constraints");
        Ok(())
    }

    /// Checks candidate constraint sets for `account`.
    ///
    /// The sets must be pairwise disjoint, reference known roots of the
    /// account's company, and the account must not be a view account.
    pub fn validate(&self, account: AccountId, sets: &ConstraintSets) -> Result<(), AnalyticError> {
        let record = self.account(account)?;

        if let Some(overlap) = sets.first_overlap() {
            return Err(self.conflict(account, &overlap));
        }

        let roots = sets.all_roots();
        if roots.is_empty() {
            return Ok(());
        }
        if record.is_view() {
            return Err(AnalyticError::ViewAccountConstraint {
                account: record.label(),
            });
        }
        for root_id in &roots {
            let root = self.root(*root_id)?;
            if root.company != record.company {
                return Err(AnalyticError::CompanyMismatch {
                    account: record.label(),
                    root: root.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Returns the roots of the account's company it does not classify yet,
    /// sorted by name.
    pub fn pending_roots(&self, account: AccountId) -> Result<Vec<&AnalyticRoot>, AnalyticError> {
        let record = self.account(account)?;
        let mut pending: Vec<&AnalyticRoot> = self
            .roots
            .values()
            .filter(|root| root.company == record.company)
            .filter(|root| !record.analytic.is_classified(root.id))
            .collect();
        pending.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(pending)
    }

    /// Returns the non-view accounts of the root's company that do not
    /// classify it yet, sorted by code.
    pub fn pending_accounts(&self, root: AnalyticRootId) -> Result<Vec<&Account>, AnalyticError> {
        let record = self.root(root)?;
        let mut pending: Vec<&Account> = self
            .accounts
            .values()
            .filter(|account| account.company == record.company && !account.is_view())
            .filter(|account| !account.analytic.is_classified(root))
            .collect();
        pending.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(pending)
    }

    /// Classifies an analytic account against a general ledger account.
    pub fn classify(
        &self,
        account: AccountId,
        analytic_account: AnalyticAccountId,
    ) -> Result<Classification, AnalyticError> {
        Ok(resolver::classify(
            self.account(account)?,
            self.analytic_account(analytic_account)?,
        ))
    }

    fn conflict(&self, account: AccountId, overlap: &ConstraintOverlap) -> AnalyticError {
        AnalyticError::ConstraintConflict {
            account_id: account,
            account: self
                .accounts
                .get(&account)
                .map_or_else(|| account.to_string(), Account::label),
            first: overlap.first,
            second: overlap.second,
            roots: self.root_names(&overlap.roots),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use crate::chart::types::{AccountKind, AnalyticAccountKind};

    struct Fixture {
        chart: AnalyticChart,
        company: CompanyId,
        revenue: AccountId,
        receivable: AccountId,
        projects: AnalyticRootId,
        departments: AnalyticRootId,
        project1: AnalyticAccountId,
    }

    fn fixture() -> Fixture {
        let mut chart = AnalyticChart::new();
        let company = chart.add_company(Company::new("Dunder Mifflin", "USD".parse().unwrap()));
        let revenue = chart
            .add_account(Account::new(
                company,
                "4000",
                "Revenue",
                AccountKind::Revenue,
                "USD".parse().unwrap(),
            ))
            .unwrap();
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
        let departments = chart
            .add_root(AnalyticRoot::new(company, "Departments"))
            .unwrap();
        let project1 = chart
            .add_analytic_account(AnalyticAccount::new(projects, "Project 1").with_code("P1"))
            .unwrap();

        Fixture {
            chart,
            company,
            revenue,
            receivable,
            projects,
            departments,
            project1,
        }
    }

    #[test]
    fn test_set_and_classify() {
        let mut f = fixture();
        f.chart.set_required(f.revenue, [f.projects]).unwrap();
        f.chart.set_forbidden(f.receivable, [f.projects]).unwrap();

        assert_eq!(
            f.chart.classify(f.revenue, f.project1).unwrap(),
            Classification::Required
        );
        assert_eq!(
            f.chart.classify(f.receivable, f.project1).unwrap(),
            Classification::Forbidden
        );
    }

    #[test]
    fn test_unclassified_is_undefined() {
        let f = fixture();
        assert_eq!(
            f.chart.classify(f.revenue, f.project1).unwrap(),
            Classification::Undefined
        );
    }

    #[test]
    fn test_overlapping_set_is_rejected_and_unchanged() {
        let mut f = fixture();
        f.chart.set_required(f.revenue, [f.projects]).unwrap();

        let err = f
            .chart
            .set_forbidden(f.revenue, [f.projects, f.departments])
            .unwrap_err();
        assert_eq!(
            err,
            AnalyticError::ConstraintConflict {
                account_id: f.revenue,
                account: "[4000] Revenue".to_string(),
                first: AnalyticConstraint::Required,
                second: AnalyticConstraint::Forbidden,
                roots: vec!["Projects".to_string()],
            }
        );

        let account = f.chart.account(f.revenue).unwrap();
        assert_eq!(account.analytic.required(), BTreeSet::from([f.projects]));
        assert!(!account.analytic.is_classified(f.departments));
    }

    #[test]
    fn test_save_raw_sets_checks_pairs_in_order() {
        let mut f = fixture();
        let sets = ConstraintSets {
            required: BTreeSet::new(),
            forbidden: BTreeSet::from([f.departments]),
            optional: BTreeSet::from([f.departments, f.projects]),
        };
        let err = f.chart.save_constraints(f.revenue, sets).unwrap_err();
        assert!(matches!(
            err,
            AnalyticError::ConstraintConflict {
                first: AnalyticConstraint::Forbidden,
                second: AnalyticConstraint::Optional,
                ..
            }
        ));
    }

    #[test]
    fn test_pending_roots_and_accounts() {
        let mut f = fixture();
        let names = |roots: Vec<&AnalyticRoot>| -> Vec<String> {
            roots.into_iter().map(|r| r.name.clone()).collect()
        };
        assert_eq!(
            names(f.chart.pending_roots(f.revenue).unwrap()),
            vec!["Departments", "Projects"]
        );

        f.chart.set_optional(f.revenue, [f.departments]).unwrap();
        assert_eq!(
            names(f.chart.pending_roots(f.revenue).unwrap()),
            vec!["Projects"]
        );

        let pending: Vec<_> = f
            .chart
            .pending_accounts(f.departments)
            .unwrap()
            .into_iter()
            .map(|a| a.code.clone())
            .collect();
        assert_eq!(pending, vec!["1200"]);
    }

    #[test]
    fn test_pending_roots_scoped_to_company() {
        let mut f = fixture();
        let other = f
            .chart
            .add_company(Company::new("Vance Refrigeration", "USD".parse().unwrap()));
        f.chart.add_root(AnalyticRoot::new(other, "Trucks")).unwrap();

        let pending = f.chart.pending_roots(f.revenue).unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|r| r.company == f.company));
    }

    #[test]
    fn test_foreign_root_rejected() {
        let mut f = fixture();
        let other = f
            .chart
            .add_company(Company::new("Vance Refrigeration", "USD".parse().unwrap()));
        let trucks = f.chart.add_root(AnalyticRoot::new(other, "Trucks")).unwrap();

        let err = f.chart.set_required(f.revenue, [trucks]).unwrap_err();
        assert_eq!(err.error_code(), "COMPANY_MISMATCH");
    }

    #[test]
    fn test_view_account_cannot_be_configured() {
        let mut f = fixture();
        let view = f
            .chart
            .add_account(Account::new(
                f.company,
                "4",
                "Income",
                AccountKind::View,
                "USD".parse().unwrap(),
            ))
            .unwrap();

        let err = f.chart.set_optional(view, [f.projects]).unwrap_err();
        assert_eq!(err.error_code(), "VIEW_ACCOUNT_CONSTRAINT");
        assert!(f.chart.set_optional(view, std::iter::empty::<AnalyticRootId>()).is_ok());
        assert!(f.chart.pending_accounts(f.projects).unwrap().iter().all(|a| a.id != view));
    }

    #[test]
    fn test_unknown_root_and_parent() {
        let mut f = fixture();
        let missing = AnalyticRootId::new();
        assert_eq!(
            f.chart.set_required(f.revenue, [missing]).unwrap_err(),
            AnalyticError::UnknownAnalyticRoot(missing)
        );

        let orphan = AnalyticAccount::new(f.projects, "Orphan")
            .with_parent(AnalyticAccountId::new())
            .with_kind(AnalyticAccountKind::Normal);
        assert!(matches!(
            f.chart.add_analytic_account(orphan),
            Err(AnalyticError::UnknownAnalyticAccount(_))
        ));
    }

    #[test]
    fn test_parent_must_share_root() {
        let mut f = fixture();
        let sales = f
            .chart
            .add_analytic_account(AnalyticAccount::new(f.departments, "Sales"))
            .unwrap();

        let stray = AnalyticAccount::new(f.projects, "Project 2").with_parent(sales);
        let stray_id = stray.id;
        let err = f.chart.add_analytic_account(stray).unwrap_err();
        assert_eq!(
            err,
            AnalyticError::ParentRootMismatch {
                account: "Project 2".to_string(),
                parent: "Sales".to_string(),
                parent_root: "Departments".to_string(),
            }
        );
        assert!(f.chart.analytic_account(stray_id).is_err());

        let child = AnalyticAccount::new(f.departments, "Inside Sales").with_parent(sales);
        assert!(f.chart.add_analytic_account(child).is_ok());
    }

    #[test]
    fn test_duplicate_account_keeps_original() {
        let mut f = fixture();
        let mut clash = Account::new(
            f.company,
            "4100",
            "Other Revenue",
            AccountKind::Revenue,
            "USD".parse().unwrap(),
        );
        clash.id = f.revenue;
        f.chart.set_required(f.revenue, [f.projects]).unwrap();

        let err = f.chart.add_account(clash).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE");
        let kept = f.chart.account(f.revenue).unwrap();
        assert_eq!(kept.code, "4000");
        assert_eq!(
            f.chart.classify(f.revenue, f.project1).unwrap(),
            Classification::Required
        );
    }

    #[test]
    fn test_root_of() {
        let f = fixture();
        assert_eq!(f.chart.root_of(f.project1).unwrap().name, "Projects");
    }
}

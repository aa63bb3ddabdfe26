//! Chart domain types.

use centra_shared::types::{AccountId, AnalyticAccountId, AnalyticRootId, CompanyId, CurrencyCode};
use serde::{Deserialize, Serialize};

use super::constraint::AccountConstraints;

/// A company owning accounts and analytic hierarchies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier.
    pub id: CompanyId,
    /// Company name.
    pub name: String,
    /// Company currency, used as default for unlinked analytic lines.
    pub currency: CurrencyCode,
}

impl Company {
    /// Creates a company with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, currency: CurrencyCode) -> Self {
        Self {
            id: CompanyId::new(),
            name: name.into(),
            currency,
        }
    }
}

/// General ledger account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Grouping account, never posted to.
    View,
    /// Customer receivable.
    Receivable,
    /// Supplier payable.
    Payable,
    /// Revenue.
    Revenue,
    /// Expense.
    Expense,
    /// Anything else (bank, stock, taxes...).
    Other,
}

impl AccountKind {
    /// Default financial statement for accounts of this kind.
    #[must_use]
    pub const fn default_statement(self) -> Option<Statement> {
        match self {
            Self::View => None,
            Self::Revenue | Self::Expense => Some(Statement::Income),
            Self::Receivable | Self::Payable | Self::Other => Some(Statement::Balance),
        }
    }
}

/// Financial statement an account reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statement {
    /// Balance sheet.
    Balance,
    /// Income statement.
    Income,
}

/// A general ledger account and its analytic constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Owning company.
    pub company: CompanyId,
    /// Account code (e.g., "4000").
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account kind.
    pub kind: AccountKind,
    /// Statement the account reports on.
    pub statement: Option<Statement>,
    /// Currency of the account.
    pub currency: CurrencyCode,
    /// Analytic root classification.
    pub analytic: AccountConstraints,
}

impl Account {
    /// Creates an account without analytic constraints.
    #[must_use]
    pub fn new(
        company: CompanyId,
        code: impl Into<String>,
        name: impl Into<String>,
        kind: AccountKind,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            id: AccountId::new(),
            company,
            code: code.into(),
            name: name.into(),
            kind,
            statement: kind.default_statement(),
            currency,
            analytic: AccountConstraints::default(),
        }
    }

    /// Returns the display label, `"[code] name"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("[{}] {}", self.code, self.name)
    }

    /// Returns true for grouping accounts.
    #[must_use]
    pub fn is_view(&self) -> bool {
        self.kind == AccountKind::View
    }
}

/// Top-level node of an analytic hierarchy.
///
/// Constraints are always expressed against roots even though analytic lines
/// reference leaf accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticRoot {
    /// Unique identifier.
    pub id: AnalyticRootId,
    /// Owning company.
    pub company: CompanyId,
    /// Root name (e.g., "Projects").
    pub name: String,
}

impl AnalyticRoot {
    /// Creates a root with a fresh id.
    #[must_use]
    pub fn new(company: CompanyId, name: impl Into<String>) -> Self {
        Self {
            id: AnalyticRootId::new(),
            company,
            name: name.into(),
        }
    }
}

/// Analytic account kind below the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticAccountKind {
    /// Grouping node; lines cannot be booked on it.
    View,
    /// Leaf account lines are booked on.
    Normal,
}

/// An analytic account inside a root hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticAccount {
    /// Unique identifier.
    pub id: AnalyticAccountId,
    /// The root ancestor.
    pub root: AnalyticRootId,
    /// Direct parent, if not attached to the root itself.
    pub parent: Option<AnalyticAccountId>,
    /// Account name.
    pub name: String,
    /// Optional code (e.g., "P1").
    pub code: Option<String>,
    /// Account kind.
    pub kind: AnalyticAccountKind,
}

impl AnalyticAccount {
    /// Creates a normal analytic account directly under `root`.
    #[must_use]
    pub fn new(root: AnalyticRootId, name: impl Into<String>) -> Self {
        Self {
            id: AnalyticAccountId::new(),
            root,
            parent: None,
            name: name.into(),
            code: None,
            kind: AnalyticAccountKind::Normal,
        }
    }

    /// Sets the account code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the parent account.
    #[must_use]
    pub const fn with_parent(mut self, parent: AnalyticAccountId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the account kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: AnalyticAccountKind) -> Self {
        self.kind = kind;
        self
    }
}

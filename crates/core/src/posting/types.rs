//! Move domain types.

use std::fmt;

use centra_shared::types::{AccountId, CompanyId, MoveId, MoveLineId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Move state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveState {
    /// Editable.
    #[default]
    Draft,
    /// Posted to the ledger; lines are frozen.
    Posted,
}

impl MoveState {
    /// Returns the string representation of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
        }
    }
}

impl fmt::Display for MoveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of accounting period a move belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Regular period.
    #[default]
    Standard,
    /// Closing/opening bookkeeping period, exempt from analytic checks.
    Adjustment,
}

/// Journal kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalKind {
    /// Miscellaneous operations.
    #[default]
    General,
    /// Customer invoices.
    Revenue,
    /// Supplier invoices.
    Expense,
    /// Bank and cash.
    Cash,
    /// Opening and closing balances.
    Situation,
}

/// Kind of document a move was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginKind {
    /// Fiscal year closing.
    FiscalYear,
    /// Invoice.
    Invoice,
    /// Asset depreciation.
    Asset,
    /// Bank statement.
    Statement,
    /// Any other document.
    Other,
}

impl OriginKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FiscalYear => "fiscal year",
            Self::Invoice => "invoice",
            Self::Asset => "asset",
            Self::Statement => "statement",
            Self::Other => "document",
        }
    }
}

impl fmt::Display for OriginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document a move was generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOrigin {
    /// Document kind.
    pub kind: OriginKind,
    /// Document name or number.
    pub name: String,
}

impl MoveOrigin {
    /// Creates an origin.
    #[must_use]
    pub fn new(kind: OriginKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for MoveOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// An accounting move (journal entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Unique identifier.
    pub id: MoveId,
    /// Owning company.
    pub company: CompanyId,
    /// Move number or reference.
    pub name: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: Option<String>,
    /// Journal kind.
    pub journal: JournalKind,
    /// Period kind.
    pub period: PeriodType,
    /// Source document.
    pub origin: Option<MoveOrigin>,
    /// Current state.
    pub state: MoveState,
}

impl Move {
    /// Returns true if the move is posted.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        self.state == MoveState::Posted
    }

    /// Returns true if the move belongs to an adjustment period.
    #[must_use]
    pub fn is_adjustment(&self) -> bool {
        self.period == PeriodType::Adjustment
    }
}

/// One debit or credit entry of a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLine {
    /// Unique identifier.
    pub id: MoveLineId,
    /// Owning move.
    pub move_id: MoveId,
    /// General ledger account.
    pub account: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line description.
    pub description: Option<String>,
}

impl MoveLine {
    /// Returns debit minus credit.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.debit - self.credit
    }
}

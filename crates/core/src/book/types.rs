//! Lifecycle inputs and results.

use centra_shared::types::{AccountId, CompanyId};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::analytic::{NewAnalyticLine, StateChange};
use crate::posting::{JournalKind, MoveOrigin, PeriodType};

/// Input for a new move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMove {
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
    /// Lines of the move.
    pub lines: Vec<NewMoveLine>,
}

impl NewMove {
    /// Creates a general journal move in a standard period without lines.
    #[must_use]
    pub fn new(company: CompanyId, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            company,
            name: name.into(),
            date,
            description: None,
            journal: JournalKind::General,
            period: PeriodType::Standard,
            origin: None,
            lines: Vec::new(),
        }
    }

    /// Sets the journal kind.
    #[must_use]
    pub const fn journal(mut self, journal: JournalKind) -> Self {
        self.journal = journal;
        self
    }

    /// Sets the period kind.
    #[must_use]
    pub const fn period(mut self, period: PeriodType) -> Self {
        self.period = period;
        self
    }

    /// Sets the source document.
    #[must_use]
    pub fn origin(mut self, origin: MoveOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a line.
    #[must_use]
    pub fn line(mut self, line: NewMoveLine) -> Self {
        self.lines.push(line);
        self
    }
}

/// Input for a new move line.
///
/// Nested analytic lines are linked to the created line; their `move_line`
/// field is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMoveLine {
    /// General ledger account.
    pub account: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line description.
    pub description: Option<String>,
    /// Analytic lines to create with the line.
    pub analytic_lines: Vec<NewAnalyticLine>,
}

impl NewMoveLine {
    /// Creates a line without description or analytic lines.
    #[must_use]
    pub const fn new(account: AccountId, debit: Decimal, credit: Decimal) -> Self {
        Self {
            account,
            debit,
            credit,
            description: None,
            analytic_lines: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends an analytic line.
    #[must_use]
    pub fn analytic(mut self, line: NewAnalyticLine) -> Self {
        self.analytic_lines.push(line);
        self
    }
}

/// Field changes for existing move lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveLinePatch {
    /// New account.
    pub account: Option<AccountId>,
    /// New debit.
    pub debit: Option<Decimal>,
    /// New credit.
    pub credit: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
}

/// Outcome of a mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResult<T> {
    /// Operation result (created ids, ...).
    pub value: T,
    /// Analytic lines whose state changed.
    pub state_changes: Vec<StateChange>,
}

impl<T> MutationResult<T> {
    /// Wraps a value with the state changes it caused.
    pub const fn new(value: T, state_changes: Vec<StateChange>) -> Self {
        Self {
            value,
            state_changes,
        }
    }
}
